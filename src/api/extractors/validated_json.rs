//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// JSON body deserialized and then checked with `validator`.
///
/// # Example
///
/// ```rust,ignore
/// use pos_backend::api::extractors::ValidatedJson;
/// use pos_backend::domain::CreateStore;
///
/// async fn create_store(ValidatedJson(input): ValidatedJson<CreateStore>) {
///     // name and code lengths already checked
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Join field messages, falling back to `<field> is invalid`.
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Sample {
        #[validate(length(min = 2, message = "Code must be at least 2 characters"))]
        code: String,
        #[validate(range(min = 1))]
        quantity: i32,
    }

    #[test]
    fn messages_fall_back_to_field_name() {
        let sample = Sample {
            code: "X".into(),
            quantity: 0,
        };
        let message = format_validation_errors(&sample.validate().unwrap_err());
        assert!(message.contains("Code must be at least 2 characters"));
        assert!(message.contains("quantity is invalid"));
    }
}

//! Client of the external membership / loyalty service.
//!
//! The service is an opaque collaborator: we report paid member orders and
//! it answers with the points earned. Wallet payments never leave this
//! backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::config::{Config, LOYALTY_CONNECT_TIMEOUT_SECS, LOYALTY_REQUEST_TIMEOUT_SECS};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const EARN_POINTS_PATH: &str = "/api/v1/points/earn";

/// A paid member order reported to the loyalty service
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnPointsRequest {
    pub brand_id: Uuid,
    pub member_id: Uuid,
    pub member_phone: Option<String>,
    pub order_id: Uuid,
    pub invoice_id: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnPointsResponse {
    pub points: i64,
    #[serde(default)]
    pub membership_level: Option<String>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait LoyaltyClient: Send + Sync {
    /// False when no loyalty service is configured.
    fn is_enabled(&self) -> bool;

    async fn earn_points(&self, request: EarnPointsRequest) -> AppResult<EarnPointsResponse>;
}

/// Build the client matching the configuration.
pub fn client_from_config(config: &Config) -> AppResult<std::sync::Arc<dyn LoyaltyClient>> {
    match &config.loyalty_api_url {
        Some(url) => Ok(std::sync::Arc::new(HttpLoyaltyClient::new(
            url,
            config.loyalty_api_key().map(str::to_string),
        )?)),
        None => {
            tracing::warn!("LOYALTY_API_URL not set, loyalty sync disabled");
            Ok(std::sync::Arc::new(DisabledLoyaltyClient))
        }
    }
}

// =============================================================================
// HTTP client
// =============================================================================

pub struct HttpLoyaltyClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpLoyaltyClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(LOYALTY_REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(LOYALTY_CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Loyalty client build failed: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl LoyaltyClient for HttpLoyaltyClient {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn earn_points(&self, request: EarnPointsRequest) -> AppResult<EarnPointsResponse> {
        let mut builder = self
            .http
            .post(format!("{}{}", self.base_url, EARN_POINTS_PATH))
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.header("x-api-key", key);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(AppError::external(format!(
                "earn points returned {}: {}",
                status.as_u16(),
                text
            )));
        }

        parse_earn_response(&text)
    }
}

fn parse_earn_response(body: &str) -> AppResult<EarnPointsResponse> {
    let parsed: EarnPointsResponse = serde_json::from_str(body)
        .map_err(|e| AppError::external(format!("Malformed earn points response: {}", e)))?;
    if parsed.points < 0 {
        return Err(AppError::external("Loyalty service returned negative points"));
    }
    Ok(parsed)
}

// =============================================================================
// Disabled client
// =============================================================================

/// Used when no loyalty service is configured.
pub struct DisabledLoyaltyClient;

#[async_trait]
impl LoyaltyClient for DisabledLoyaltyClient {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn earn_points(&self, _request: EarnPointsRequest) -> AppResult<EarnPointsResponse> {
        Err(AppError::external("Loyalty service is not configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_points() {
        let parsed = parse_earn_response(r#"{"points": 12, "membershipLevel": "GOLD"}"#).unwrap();
        assert_eq!(parsed.points, 12);
        assert_eq!(parsed.membership_level.as_deref(), Some("GOLD"));
    }

    #[test]
    fn membership_level_is_optional() {
        let parsed = parse_earn_response(r#"{"points": 0}"#).unwrap();
        assert_eq!(parsed.points, 0);
        assert!(parsed.membership_level.is_none());
    }

    #[test]
    fn rejects_malformed_and_negative_bodies() {
        assert!(matches!(
            parse_earn_response("not json"),
            Err(AppError::External(_))
        ));
        assert!(matches!(
            parse_earn_response(r#"{"points": -3}"#),
            Err(AppError::External(_))
        ));
    }

    #[test]
    fn request_serializes_camel_case() {
        let request = EarnPointsRequest {
            brand_id: Uuid::nil(),
            member_id: Uuid::nil(),
            member_phone: Some("0901234567".to_string()),
            order_id: Uuid::nil(),
            invoice_id: "HCM01240101120000".to_string(),
            amount: 100_000.0,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["invoiceId"], "HCM01240101120000");
        assert_eq!(json["memberPhone"], "0901234567");
    }

    #[tokio::test]
    async fn disabled_client_refuses() {
        let client = DisabledLoyaltyClient;
        assert!(!client.is_enabled());
        let request = EarnPointsRequest {
            brand_id: Uuid::nil(),
            member_id: Uuid::nil(),
            member_phone: None,
            order_id: Uuid::nil(),
            invoice_id: String::new(),
            amount: 0.0,
        };
        assert!(client.earn_points(request).await.is_err());
    }
}

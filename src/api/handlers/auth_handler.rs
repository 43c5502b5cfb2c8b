//! Authentication handlers.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{SignUpUser, UserLogin, UserResponse};
use crate::errors::AppResult;
use crate::services::{LoginRequest, TokenResponse};

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/members/login", post(member_login))
        .route("/members/sign-up", post(sign_up))
}

/// Staff login
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account deactivated")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .services
        .auth()
        .login(payload.username, payload.password)
        .await?;

    Ok(Json(token))
}

/// Member login with brand code and phone number
#[utoipa::path(
    post,
    path = "/auth/members/login",
    tag = "Authentication",
    request_body = UserLogin,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn member_login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UserLogin>,
) -> AppResult<Json<TokenResponse>> {
    let token = state.services.auth().member_login(payload).await?;
    Ok(Json(token))
}

/// Register a member of a brand
#[utoipa::path(
    post,
    path = "/auth/members/sign-up",
    tag = "Authentication",
    request_body = SignUpUser,
    responses(
        (status = 201, description = "Member registered", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Unknown brand"),
        (status = 409, description = "Phone number already registered")
    )
)]
pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignUpUser>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state.services.users().sign_up(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

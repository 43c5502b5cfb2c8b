//! Application route configuration.

use axum::{extract::State, http::StatusCode, middleware, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    account_routes, auth_routes, blog_post_routes, brand_routes, category_routes,
    collection_routes, menu_routes, order_routes, product_routes, promotion_routes,
    public_routes, session_routes, store_routes, transaction_routes, user_routes,
    variant_routes,
};
use super::middleware::{auth_middleware, rate_limit_auth_middleware, rate_limit_middleware};
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    // Everything behind a bearer token
    let protected = Router::new()
        .nest("/accounts", account_routes())
        .nest("/brands", brand_routes())
        .nest("/stores", store_routes())
        .nest("/sessions", session_routes())
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/collections", collection_routes())
        .nest("/variants", variant_routes())
        .nest("/menus", menu_routes())
        .nest("/promotions", promotion_routes())
        .nest("/orders", order_routes())
        .nest("/users", user_routes())
        .nest("/transactions", transaction_routes())
        .nest("/blog-posts", blog_post_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        // Health check (no rate limiting)
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Logins and member sign-up (stricter rate limiting)
        .nest(
            "/auth",
            auth_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit_auth_middleware,
            )),
        )
        .nest(
            "/public",
            public_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit_middleware,
            )),
        )
        .merge(protected)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

/// Individual service health status
#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
    redis: ServiceStatus,
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServiceStatus {
    fn from_check<E: std::fmt::Display>(check: Option<Result<(), E>>) -> Self {
        match check {
            Some(Ok(())) => Self {
                status: "healthy",
                error: None,
            },
            Some(Err(e)) => Self {
                status: "unhealthy",
                error: Some(e.to_string()),
            },
            None => Self {
                status: "not_configured",
                error: None,
            },
        }
    }

    fn is_unhealthy(&self) -> bool {
        self.status == "unhealthy"
    }
}

/// Health check endpoint with database and Redis connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match &state.database {
        Some(database) => Some(database.ping().await),
        None => None,
    };
    let redis = match &state.cache {
        Some(cache) => Some(cache.ping().await),
        None => None,
    };

    let services = ServiceHealth {
        database: ServiceStatus::from_check(database),
        redis: ServiceStatus::from_check(redis),
    };
    let degraded = services.database.is_unhealthy() || services.redis.is_unhealthy();

    let response = HealthResponse {
        status: if degraded { "degraded" } else { "healthy" },
        services,
    };

    let status_code = if degraded {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (status_code, Json(response))
}

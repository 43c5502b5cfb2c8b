//! Integration tests for API endpoints.
//!
//! The router runs over mock services, so no database or Redis is needed.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use pos_backend::api::{create_router, AppState};
use pos_backend::domain::{
    Order, OrderStatus, OrderType, OrderWithDetails, PaymentType, Role,
};
use pos_backend::errors::AppError;
use pos_backend::services::{
    AuthService, Claims, MockAuthService, MockOrderService, MockServiceContainer, OrderService,
    TokenResponse,
};

const VALID_TOKEN: &str = "valid-test-token";

// =============================================================================
// Test Helpers
// =============================================================================

fn staff_claims(store_id: Uuid) -> Claims {
    Claims {
        sub: Uuid::new_v4(),
        username: "cashier".to_string(),
        role: Role::Staff.to_string(),
        brand_id: Some(Uuid::new_v4()),
        store_id: Some(store_id),
        exp: Utc::now().timestamp() + 3600,
        iat: Utc::now().timestamp(),
    }
}

/// Auth service accepting only `VALID_TOKEN`
fn auth_service(store_id: Uuid) -> MockAuthService {
    let mut auth = MockAuthService::new();
    auth.expect_verify_token().returning(move |token| {
        if token == VALID_TOKEN {
            Ok(staff_claims(store_id))
        } else {
            Err(AppError::Unauthorized)
        }
    });
    auth
}

fn sample_order(id: Uuid, store_id: Uuid) -> Order {
    let now = Utc::now();
    Order {
        id,
        brand_id: Uuid::new_v4(),
        store_id,
        session_id: Uuid::new_v4(),
        invoice_id: "HCM0124050120303001".to_string(),
        order_type: OrderType::EatIn,
        payment_type: PaymentType::Cash,
        status: OrderStatus::Pending,
        total_amount: 90_000.0,
        line_discount: 0.0,
        promotion_discount: 0.0,
        discount: 0.0,
        vat_rate: 0.08,
        vat_amount: 6_666.67,
        final_amount: 90_000.0,
        number_of_guests: 2,
        note: None,
        created_by: Uuid::new_v4(),
        checkin_date: now,
        created_at: now,
        updated_at: now,
    }
}

fn router(auth: MockAuthService, orders: MockOrderService) -> Router {
    let auth: Arc<dyn AuthService> = Arc::new(auth);
    let orders: Arc<dyn OrderService> = Arc::new(orders);

    let mut container = MockServiceContainer::new();
    container.expect_auth().returning(move || auth.clone());
    container.expect_orders().returning(move || orders.clone());

    create_router(AppState::with_services(Arc::new(container)))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_without_infrastructure_reports_not_configured() {
    let app = router(MockAuthService::new(), MockOrderService::new());

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "not_configured");
    assert_eq!(body["services"]["redis"]["status"], "not_configured");
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = router(auth_service(Uuid::new_v4()), MockOrderService::new());

    let response = app
        .oneshot(
            Request::get(format!("/orders/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_protected_route_rejects_unknown_token() {
    let app = router(auth_service(Uuid::new_v4()), MockOrderService::new());

    let response = app
        .oneshot(
            Request::get(format!("/orders/{}", Uuid::new_v4()))
                .header(header::AUTHORIZATION, "Bearer forged")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_validates_payload() {
    // Validation fails before the service is reached
    let app = router(MockAuthService::new(), MockOrderService::new());

    let response = app
        .oneshot(
            Request::post("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"username": "", "password": "x"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_returns_token() {
    let mut auth = MockAuthService::new();
    auth.expect_login()
        .withf(|username, password| username == "cashier" && password == "SecurePass123!")
        .returning(|_, _| {
            Ok(TokenResponse {
                access_token: "issued".to_string(),
                token_type: "Bearer".to_string(),
                expires_in: 86400,
                role: Role::Staff,
            })
        });
    let app = router(auth, MockOrderService::new());

    let response = app
        .oneshot(
            Request::post("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"username": "cashier", "password": "SecurePass123!"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["access_token"], "issued");
    assert_eq!(body["role"], "STAFF");
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_get_order_passes_caller_to_service() {
    let store_id = Uuid::new_v4();
    let order_id = Uuid::new_v4();

    let mut orders = MockOrderService::new();
    orders
        .expect_get_order()
        .withf(move |actor, id| {
            actor.role == Role::Staff && actor.store_id == Some(store_id) && *id == order_id
        })
        .returning(move |_, id| {
            Ok(OrderWithDetails {
                order: sample_order(id, store_id),
                details: vec![],
                promotions: vec![],
                customer: None,
                history: vec![],
            })
        });
    let app = router(auth_service(store_id), orders);

    let response = app
        .oneshot(
            Request::get(format!("/orders/{}", order_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", VALID_TOKEN))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], order_id.to_string());
    assert_eq!(body["status"], "PENDING");
    assert_eq!(body["order_type"], "EAT_IN");
}

#[tokio::test]
async fn test_business_rule_maps_to_unprocessable_entity() {
    let store_id = Uuid::new_v4();

    let mut orders = MockOrderService::new();
    orders
        .expect_update_order()
        .returning(|_, _, _| Err(AppError::rule("Order cannot go from PAID to PAID")));
    let app = router(auth_service(store_id), orders);

    let response = app
        .oneshot(
            Request::put(format!("/orders/{}", Uuid::new_v4()))
                .header(header::AUTHORIZATION, format!("Bearer {}", VALID_TOKEN))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"status": "PAID"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BUSINESS_RULE_VIOLATION");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = router(MockAuthService::new(), MockOrderService::new());

    let response = app
        .oneshot(
            Request::get("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["paths"]["/stores/{id}/orders"].is_object());
}

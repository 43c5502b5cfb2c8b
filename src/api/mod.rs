//! HTTP surface of the POS backend.
//!
//! Handlers stay thin: they extract the caller, validate the body and hand
//! off to a service from [`AppState`]. Routing and the OpenAPI document
//! live next to them.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;

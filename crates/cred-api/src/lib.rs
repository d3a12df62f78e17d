//! # cred-api: Axum Service for the Credential Registry
//!
//! HTTP surface over the credential domain model. Requests are parsed into
//! DTOs, converted to domain objects by per-type assemblers, and handed to
//! the application services, which persist through the repositories in
//! `cred-store`.
//!
//! ## API Surface
//!
//! | Route                                                  | Method | Auth      |
//! |--------------------------------------------------------|--------|-----------|
//! | `/credentials/{issuing_country}/{credential_id}`       | GET    | none      |
//! | `/credentials/validate/{issuing_country}/{credential_id}` | GET | none      |
//! | `/credentials`                                         | POST   | `X-API-Key` |
//! | `/credentials/{issuing_country}/{credential_id}`       | PATCH  | `X-API-Key` |
//! | `/api-keys`                                            | POST   | Admin bearer token |
//! | `/heartbeat`, `/health/liveness`, `/health/readiness`  | GET    | none      |
//! | `/metrics`, `/openapi.json`                            | GET    | none      |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → [route auth guard] → Handler
//! ```

pub mod assembler;
pub mod auth;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod service;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::credentials::router(state.clone()))
        .merge(routes::api_keys::router(state.clone()))
        .merge(routes::health::router())
        .merge(openapi::router())
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

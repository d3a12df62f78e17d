//! # Authentication Middleware
//!
//! Two guards, applied per route in [`crate::routes`]:
//!
//! - [`require_api_key`]: credential writes. Reads the `X-API-Key` header,
//!   looks the key up by digest and injects an [`AuthenticatedIssuer`] into
//!   the request extensions.
//! - [`require_admin_token`]: API key administration. Checks
//!   `Authorization: Bearer <token>` against the configured admin token.
//!   When no admin token is configured every request passes.

use axum::extract::{Request, State};
use axum::http::{header, HeaderName};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::ConstantTimeEq;

use cred_core::IssuerCategory;
use cred_state::ApiKeySecret;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

/// Issuer identity of the API key a write request was authenticated with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIssuer {
    pub issuer_category: Option<IssuerCategory>,
}

// ── Token comparison ────────────────────────────────────────────────

/// Constant-time comparison of bearer tokens.
///
/// On a length mismatch a dummy comparison still runs.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

// ── Middleware ──────────────────────────────────────────────────────

/// Require a known `X-API-Key`.
pub async fn require_api_key(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(provided) = request
        .headers()
        .get(&API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
    else {
        tracing::warn!("request without api key rejected");
        return AppError::Unauthorized("missing API key".into()).into_response();
    };

    let secret = ApiKeySecret::new(provided);
    match state.api_keys.validate(&secret).await {
        Ok(Some(api_key)) => {
            request.extensions_mut().insert(AuthenticatedIssuer {
                issuer_category: api_key.issuer_category,
            });
            next.run(request).await
        }
        Ok(None) => {
            tracing::warn!("request with unknown api key rejected");
            AppError::Unauthorized("invalid API key".into()).into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Require the admin bearer token, if one is configured.
pub async fn require_admin_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.config.admin_token.as_deref() else {
        return next.run(request).await;
    };

    let rejection = match request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        Some(token) if constant_time_token_eq(token, expected) => None,
        Some(_) => Some("invalid bearer token"),
        None => Some("missing or malformed Authorization header"),
    };

    match rejection {
        None => next.run(request).await,
        Some(message) => {
            tracing::warn!(reason = message, "admin request rejected");
            AppError::Unauthorized(message.into()).into_response()
        }
    }
}

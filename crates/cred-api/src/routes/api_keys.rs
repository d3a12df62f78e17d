//! # API Key Administration
//!
//! `POST /api-keys` issues a new key. The plaintext is returned once and
//! never stored.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::routing::post;
use axum::{Json, Router};

use crate::auth::require_admin_token;
use crate::dto::{ApiKeyDto, GenerateApiKeyDto};
use crate::error::AppError;
use crate::extractors::extract_validated_json;
use crate::state::AppState;

/// Build the API key router, guarded by the admin token.
pub fn router(state: AppState) -> Router<AppState> {
    Router::new().route(
        "/api-keys",
        post(generate_api_key).route_layer(from_fn_with_state(state, require_admin_token)),
    )
}

/// POST /api-keys: Generate an API key.
#[utoipa::path(
    post,
    path = "/api-keys",
    request_body = GenerateApiKeyDto,
    responses(
        (status = 201, description = "Key generated; `key` is shown only once", body = ApiKeyDto),
        (status = 400, description = "Invalid request body", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid admin token", body = crate::error::ErrorBody),
    ),
    security(("admin_token" = [])),
    tag = "api_keys"
)]
pub(crate) async fn generate_api_key(
    State(state): State<AppState>,
    body: Result<Json<GenerateApiKeyDto>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiKeyDto>), AppError> {
    let req = extract_validated_json(body)?;
    let generated = state
        .api_keys
        .generate(req.description, req.issuer_category)
        .await?;

    let api_key = generated.api_key;
    Ok((
        StatusCode::CREATED,
        Json(ApiKeyDto {
            key: generated.secret.expose().to_string(),
            description: api_key.description,
            issuer_category: api_key.issuer_category,
            created_at: api_key.created_at.to_iso8601(),
            last_used: api_key.last_used.map(|t| t.to_iso8601()),
        }),
    ))
}

//! # Credential Endpoints
//!
//! Every route takes `?credential_type=` and resolves it through the
//! assembler registry before touching the body, so an unknown type is
//! reported as unsupported whatever the payload looks like.
//!
//! ## Endpoints
//!
//! - `GET /credentials/{issuing_country}/{credential_id}`: Fetch.
//! - `GET /credentials/validate/{issuing_country}/{credential_id}`: Current status.
//! - `POST /credentials`: Create (API key required).
//! - `PATCH /credentials/{issuing_country}/{credential_id}`: Status transition (API key required).

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, patch, post};
use axum::{Extension, Json, Router};
use serde_json::Value;

use cred_core::{CredentialId, IssuingCountry};

use crate::auth::{require_api_key, AuthenticatedIssuer};
use crate::dto::{CredentialDto, MessageResponse, StatusUpdateDto, ValidationResponse};
use crate::error::AppError;
use crate::extractors::{extract_json, extract_query, CredentialTypeQuery};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the credentials router. Write routes carry the API key guard;
/// reads are open.
pub fn router(state: AppState) -> Router<AppState> {
    let api_key = from_fn_with_state(state, require_api_key);
    Router::new()
        .route(
            "/credentials",
            post(create_credential).route_layer(api_key.clone()),
        )
        .route(
            "/credentials/{issuing_country}/{credential_id}",
            get(get_credential).merge(patch(update_credential).route_layer(api_key)),
        )
        .route(
            "/credentials/validate/{issuing_country}/{credential_id}",
            get(validate_credential),
        )
}

fn parse_key(
    issuing_country: &str,
    credential_id: &str,
) -> Result<(IssuingCountry, CredentialId), AppError> {
    Ok((
        IssuingCountry::new(issuing_country)?,
        CredentialId::new(credential_id)?,
    ))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /credentials/{issuing_country}/{credential_id}: Fetch a credential.
#[utoipa::path(
    get,
    path = "/credentials/{issuing_country}/{credential_id}",
    params(
        ("issuing_country" = String, Path, description = "Issuing country (case-insensitive)"),
        ("credential_id" = String, Path, description = "License or passport number"),
        CredentialTypeQuery,
    ),
    responses(
        (status = 200, description = "Credential found", body = CredentialDto),
        (status = 400, description = "Unsupported type or malformed identifier", body = crate::error::ErrorBody),
        (status = 404, description = "Credential not found", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
pub(crate) async fn get_credential(
    State(state): State<AppState>,
    Path((issuing_country, credential_id)): Path<(String, String)>,
    query: Result<Query<CredentialTypeQuery>, QueryRejection>,
) -> Result<Json<CredentialDto>, AppError> {
    let query = extract_query(query)?;
    let (credential_type, assembler) = state.assemblers.resolve(&query.credential_type)?;
    let (issuing_country, credential_id) = parse_key(&issuing_country, &credential_id)?;

    let credential = state
        .credentials
        .get_credential(&credential_id, credential_type, &issuing_country)
        .await?;
    Ok(Json(assembler.to_dto(&credential)?))
}

/// GET /credentials/validate/{issuing_country}/{credential_id}: Report the
/// stored status.
#[utoipa::path(
    get,
    path = "/credentials/validate/{issuing_country}/{credential_id}",
    params(
        ("issuing_country" = String, Path, description = "Issuing country (case-insensitive)"),
        ("credential_id" = String, Path, description = "License or passport number"),
        CredentialTypeQuery,
    ),
    responses(
        (status = 200, description = "Current status", body = ValidationResponse),
        (status = 400, description = "Unsupported type or malformed identifier", body = crate::error::ErrorBody),
        (status = 404, description = "Credential not found", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
pub(crate) async fn validate_credential(
    State(state): State<AppState>,
    Path((issuing_country, credential_id)): Path<(String, String)>,
    query: Result<Query<CredentialTypeQuery>, QueryRejection>,
) -> Result<Json<ValidationResponse>, AppError> {
    let query = extract_query(query)?;
    let (credential_type, _) = state.assemblers.resolve(&query.credential_type)?;
    let (issuing_country, credential_id) = parse_key(&issuing_country, &credential_id)?;

    let status = state
        .credentials
        .validate_credential(&credential_id, credential_type, &issuing_country)
        .await?;
    Ok(Json(ValidationResponse {
        id: credential_id.to_string(),
        status,
    }))
}

/// POST /credentials: Create a credential from a type-specific payload.
///
/// The new credential always starts `active`.
#[utoipa::path(
    post,
    path = "/credentials",
    params(CredentialTypeQuery),
    request_body = CredentialDto,
    responses(
        (status = 201, description = "Credential created", body = MessageResponse),
        (status = 400, description = "Unsupported type or invalid payload", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid API key", body = crate::error::ErrorBody),
        (status = 403, description = "Issuer not authorized for this type", body = crate::error::ErrorBody),
    ),
    security(("api_key" = [])),
    tag = "credentials"
)]
pub(crate) async fn create_credential(
    State(state): State<AppState>,
    Extension(issuer): Extension<AuthenticatedIssuer>,
    query: Result<Query<CredentialTypeQuery>, QueryRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let query = extract_query(query)?;
    let (_, assembler) = state.assemblers.resolve(&query.credential_type)?;
    let payload = extract_json(body)?;

    let credential = assembler.to_domain(&payload)?;
    state
        .credentials
        .create_credential(credential, issuer.issuer_category)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Credential created")),
    ))
}

/// PATCH /credentials/{issuing_country}/{credential_id}: Suspend, reinstate
/// or revoke. Echoes the request on success.
#[utoipa::path(
    patch,
    path = "/credentials/{issuing_country}/{credential_id}",
    params(
        ("issuing_country" = String, Path, description = "Issuing country (case-insensitive)"),
        ("credential_id" = String, Path, description = "License or passport number"),
        CredentialTypeQuery,
    ),
    request_body = StatusUpdateDto,
    responses(
        (status = 200, description = "Status updated", body = StatusUpdateDto),
        (status = 400, description = "Transition not allowed or missing reason", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid API key", body = crate::error::ErrorBody),
        (status = 404, description = "Credential not found", body = crate::error::ErrorBody),
    ),
    security(("api_key" = [])),
    tag = "credentials"
)]
pub(crate) async fn update_credential(
    State(state): State<AppState>,
    Path((issuing_country, credential_id)): Path<(String, String)>,
    query: Result<Query<CredentialTypeQuery>, QueryRejection>,
    body: Result<Json<StatusUpdateDto>, JsonRejection>,
) -> Result<Json<StatusUpdateDto>, AppError> {
    let query = extract_query(query)?;
    let (credential_type, _) = state.assemblers.resolve(&query.credential_type)?;
    let update = extract_json(body)?;
    let (issuing_country, credential_id) = parse_key(&issuing_country, &credential_id)?;

    state
        .credentials
        .update_credential(
            &credential_id,
            &issuing_country,
            credential_type,
            update.status,
            update.reason.as_deref(),
        )
        .await?;
    Ok(Json(update))
}

//! # OpenAPI Specification Assembly
//!
//! Collects the utoipa-documented routes into one OpenAPI document served
//! at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Credential Registry API",
        version = "0.1.0",
        description = "Issue, look up, validate, suspend, reinstate and revoke identity credentials (drivers licenses, passports).",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::credentials::get_credential,
        crate::routes::credentials::validate_credential,
        crate::routes::credentials::create_credential,
        crate::routes::credentials::update_credential,
        crate::routes::api_keys::generate_api_key,
        crate::routes::health::heartbeat,
    ),
    components(schemas(
        crate::dto::CommonCredentialDto,
        crate::dto::DriversLicenseDto,
        crate::dto::PassportDto,
        crate::dto::CredentialDto,
        crate::dto::StatusUpdateDto,
        crate::dto::ValidationResponse,
        crate::dto::MessageResponse,
        crate::dto::GenerateApiKeyDto,
        crate::dto::ApiKeyDto,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    modifiers(&SecuritySchemes),
    tags(
        (name = "credentials", description = "Credential lifecycle"),
        (name = "api_keys", description = "API key administration"),
        (name = "health", description = "Service probes"),
    )
)]
pub struct ApiDoc;

/// Registers the `X-API-Key` and admin bearer schemes referenced by the
/// write endpoints.
struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
            );
            components.add_security_scheme(
                "admin_token",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

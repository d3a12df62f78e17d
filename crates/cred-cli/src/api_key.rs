//! # API Key Subcommand
//!
//! Bootstraps API keys straight into the database, for deployments where the
//! HTTP administration endpoint is locked down or not yet reachable.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use cred_api::dto::ApiKeyDto;
use cred_api::service::ApiKeyService;
use cred_core::IssuerCategory;
use cred_store::{KvApiKeyRepository, PgStore};

/// Arguments for the `credctl api-key` subcommand.
#[derive(Args, Debug)]
pub struct ApiKeyArgs {
    #[command(subcommand)]
    pub command: ApiKeyCommand,
}

#[derive(Subcommand, Debug)]
pub enum ApiKeyCommand {
    /// Generate a key and print it. The plaintext is not recoverable later.
    Generate {
        /// Free-form note on who the key is for.
        #[arg(long)]
        description: Option<String>,

        /// Issuer category bound to the key (`provincial` or `federal`).
        #[arg(long, value_parser = parse_issuer_category)]
        issuer_category: Option<IssuerCategory>,

        /// PostgreSQL connection string.
        #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
        database_url: String,
    },
}

fn parse_issuer_category(raw: &str) -> Result<IssuerCategory, String> {
    raw.parse::<IssuerCategory>().map_err(|e| e.to_string())
}

/// Execute the api-key subcommand.
pub fn run_api_key(args: &ApiKeyArgs) -> Result<u8> {
    match &args.command {
        ApiKeyCommand::Generate {
            description,
            issuer_category,
            database_url,
        } => {
            let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
            let dto = runtime.block_on(generate(
                database_url,
                description.clone(),
                *issuer_category,
            ))?;
            println!("{}", serde_json::to_string_pretty(&dto)?);
            Ok(0)
        }
    }
}

async fn generate(
    database_url: &str,
    description: Option<String>,
    issuer_category: Option<IssuerCategory>,
) -> Result<ApiKeyDto> {
    let pool = cred_store::postgres::init_pool(database_url)
        .await
        .context("failed to connect to database")?;
    let store = Arc::new(PgStore::new(pool));
    let service = ApiKeyService::new(Arc::new(KvApiKeyRepository::new(store)));

    let generated = service
        .generate(description, issuer_category)
        .await
        .context("failed to store api key")?;
    tracing::info!(key_digest = %generated.api_key.key_digest, "api key stored");

    let api_key = generated.api_key;
    Ok(ApiKeyDto {
        key: generated.secret.expose().to_string(),
        description: api_key.description,
        issuer_category: api_key.issuer_category,
        created_at: api_key.created_at.to_iso8601(),
        last_used: None,
    })
}

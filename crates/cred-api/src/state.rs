//! # Application State & Configuration
//!
//! [`AppConfig`] is parsed from flags and environment variables at startup.
//! [`AppState`] is the shared, cheaply cloneable context handed to every
//! handler: the services, the assembler registry and the storage backend
//! they sit on.

use std::sync::Arc;

use clap::{ArgAction, Parser, ValueEnum};
use metrics_exporter_prometheus::PrometheusHandle;

use cred_state::IssuerPolicy;
use cred_store::{KeyValueStore, KvApiKeyRepository, KvCredentialRepository, MemoryStore};

use crate::assembler::AssemblerRegistry;
use crate::service::{ApiKeyService, CredentialService};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Server configuration.
///
/// Custom `Debug` redacts the database URL and admin token.
#[derive(Clone, Parser)]
#[command(name = "cred-api", version, about = "Credential registry HTTP service")]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// PostgreSQL connection string. Without one, credentials are kept in
    /// memory and lost on restart.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Bearer token guarding API key administration. Without one, the
    /// administration endpoints are open.
    #[arg(long, env = "ADMIN_TOKEN")]
    pub admin_token: Option<String>,

    /// Whether API key issuer categories are checked on creation
    /// (`off` or `enforce`).
    #[arg(long, env = "ISSUER_AUTHORIZATION", default_value_t = IssuerPolicy::Disabled)]
    pub issuer_authorization: IssuerPolicy,

    /// Install the Prometheus recorder and serve `/metrics`.
    #[arg(
        long = "metrics",
        env = "METRICS_ENABLED",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub metrics_enabled: bool,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "admin_token",
                &self.admin_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("issuer_authorization", &self.issuer_authorization)
            .field("metrics_enabled", &self.metrics_enabled)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            database_url: None,
            admin_token: None,
            issuer_authorization: IssuerPolicy::Disabled,
            metrics_enabled: true,
            log_format: LogFormat::Text,
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub credentials: CredentialService,
    pub api_keys: ApiKeyService,
    pub assemblers: Arc<AssemblerRegistry>,
    pub store: Arc<dyn KeyValueStore>,
    /// Present when the Prometheus recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Default configuration over a fresh in-memory store.
    pub fn new() -> Self {
        Self::with_store(AppConfig::default(), Arc::new(MemoryStore::new()))
    }

    /// Wire services and repositories over `store`.
    pub fn with_store(config: AppConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let credentials = CredentialService::new(
            Arc::new(KvCredentialRepository::new(Arc::clone(&store))),
            config.issuer_authorization,
        );
        let api_keys = ApiKeyService::new(Arc::new(KvApiKeyRepository::new(Arc::clone(&store))));
        Self {
            config: Arc::new(config),
            credentials,
            api_keys,
            assemblers: Arc::new(AssemblerRegistry::with_defaults()),
            store,
            metrics: None,
        }
    }

    /// Attach an installed Prometheus recorder.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("assemblers", &self.assemblers)
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError};

use crate::seed::SeedTimeouts;

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 10;
const CONFIG_DIR: &str = "config";

/// Name of the variable the dashboard deployment uses for its database
pub const POSTGRES_URL_VAR: &str = "POSTGRES_URL";

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    #[validate(range(min = 1, message = "port must be non-zero"))]
    pub port: u16,

    /// Application environment
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Postgres connection string. Absence is reported per seed request,
    /// not at startup.
    #[serde(default)]
    pub postgres_url: Option<String>,

    /// DB timeouts (seconds)
    #[serde(default = "default_db_timeout_secs")]
    #[validate(range(min = 1, message = "db_connect_timeout_secs must be at least 1"))]
    pub db_connect_timeout_secs: u64,
    #[serde(default = "default_db_timeout_secs")]
    #[validate(range(min = 1, message = "db_acquire_timeout_secs must be at least 1"))]
    pub db_acquire_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            log_level: default_log_level(),
            log_json: false,
            postgres_url: None,
            db_connect_timeout_secs: default_db_timeout_secs(),
            db_acquire_timeout_secs: default_db_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Default configuration pointing at the given database
    pub fn with_postgres_url(postgres_url: Option<String>) -> Self {
        Self {
            postgres_url,
            ..Default::default()
        }
    }

    pub fn postgres_url(&self) -> Option<&str> {
        self.postgres_url.as_deref()
    }

    /// Checks if running in development environment
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn seed_timeouts(&self) -> SeedTimeouts {
        SeedTimeouts {
            connect: Duration::from_secs(self.db_connect_timeout_secs),
            acquire: Duration::from_secs(self.db_acquire_timeout_secs),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Default value functions
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_db_timeout_secs() -> u64 {
    DEFAULT_DB_TIMEOUT_SECS
}

/// Validates log level values
fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!(
        "invoice_dashboard_api={level},seed_data={level},tower_http=debug",
        level = level
    );
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let filter = EnvFilter::new(filter_directive);
    if json {
        let _ = fmt().with_env_filter(filter).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter).try_init();
    }
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Default config (config/default.toml)
/// 2. Environment-specific config (config/{env}.toml)
/// 3. Environment variables (APP__*)
/// 4. `POSTGRES_URL`, when set
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    // Support both RUN_ENV and APP_ENV for selecting config profile
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());

    load_config_from(
        Path::new(CONFIG_DIR),
        &run_env,
        env::var(POSTGRES_URL_VAR).ok(),
    )
}

pub fn load_config_from(
    config_dir: &Path,
    run_env: &str,
    postgres_url: Option<String>,
) -> Result<AppConfig, AppConfigError> {
    info!("Loading configuration for environment: {}", run_env);

    if !config_dir.exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            config_dir.display()
        );
    }

    let postgres_url = postgres_url.filter(|url| !url.trim().is_empty());

    let config = Config::builder()
        .set_default("host", DEFAULT_HOST)?
        .set_default("port", i64::from(DEFAULT_PORT))?
        .set_default("environment", run_env)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::from(config_dir.join("default")).required(false))
        .add_source(File::from(config_dir.join(run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .set_override_option("postgres_url", postgres_url)?
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    if app_config.postgres_url.is_none() {
        info!(
            "{} is not set; seed requests will fail until it is configured",
            POSTGRES_URL_VAR
        );
    }

    info!("Configuration loaded successfully");
    Ok(app_config)
}

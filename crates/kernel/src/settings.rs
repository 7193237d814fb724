use std::path::PathBuf;

use anyhow::{anyhow, Context};
use secrecy::Secret;
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "BOOKLIST_ENV";
const CONFIG_DIR_ENV: &str = "BOOKLIST_CONFIG_DIR";

/// Plain environment variables honoured on top of the layered sources.
/// These are the names operators already use when deploying the catalog.
const LEGACY_OVERRIDES: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_NAME", "database.name"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_CONNECTION_LIMIT", "database.max_connections"),
    ("DB_ACQUIRE_TIMEOUT_MS", "database.acquire_timeout_ms"),
    ("API_KEY", "reviews.api_key"),
    ("API_ENDPOINT", "reviews.endpoint"),
    ("RUST_LOG", "telemetry.filter"),
];

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub reviews: ReviewSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay,
    /// `BOOKLIST_*` variables and finally the plain legacy variables.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .map(|cwd| cwd.join("config"))
                .with_context(|| "unable to resolve current directory")?,
        };

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let mut builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix("BOOKLIST")
                    .prefix_separator("_")
                    .separator("__"),
            );

        for (var, key) in LEGACY_OVERRIDES {
            builder = builder
                .set_override_option(*key, std::env::var(var).ok())
                .with_context(|| format!("failed to apply {} override", var))?;
        }

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        settings.environment = parse_environment(&environment)?;

        Ok(settings)
    }

    /// Address the HTTP listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_environment(name: &str) -> anyhow::Result<Environment> {
    match name {
        "local" => Ok(Environment::Local),
        "staging" => Ok(Environment::Staging),
        "production" => Ok(Environment::Production),
        other => Err(anyhow!(
            "unsupported environment '{}'; expected local/staging/production",
            other
        )),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        3000
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}

/// Connection and pool parameters for the MySQL catalog database.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "DatabaseSettings::default_host")]
    pub host: String,
    #[serde(default = "DatabaseSettings::default_port")]
    pub port: u16,
    #[serde(default = "DatabaseSettings::default_name")]
    pub name: String,
    #[serde(default = "DatabaseSettings::default_user")]
    pub user: String,
    #[serde(default = "DatabaseSettings::default_password")]
    pub password: Secret<String>,
    /// Hard upper bound on simultaneously leased connections.
    #[serde(default = "DatabaseSettings::default_max_connections")]
    pub max_connections: u32,
    /// How long a request waits for a free connection before failing.
    #[serde(default = "DatabaseSettings::default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
    #[serde(default = "DatabaseSettings::default_timezone")]
    pub timezone: Option<String>,
}

impl DatabaseSettings {
    fn default_host() -> String {
        "localhost".to_string()
    }

    fn default_port() -> u16 {
        3306
    }

    fn default_name() -> String {
        "goodreads".to_string()
    }

    fn default_user() -> String {
        "goodread".to_string()
    }

    fn default_password() -> Secret<String> {
        Secret::new("goodread".to_string())
    }

    fn default_max_connections() -> u32 {
        4
    }

    fn default_acquire_timeout_ms() -> u64 {
        30000
    }

    fn default_timezone() -> Option<String> {
        Some("+08:00".to_string())
    }

    /// Connection target without credentials, safe to log.
    pub fn endpoint(&self) -> String {
        format!("mysql://{}:{}/{}", self.host, self.port, self.name)
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            name: Self::default_name(),
            user: Self::default_user(),
            password: Self::default_password(),
            max_connections: Self::default_max_connections(),
            acquire_timeout_ms: Self::default_acquire_timeout_ms(),
            timezone: Self::default_timezone(),
        }
    }
}

/// Credentials and endpoint for the external book review API.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewSettings {
    #[serde(default = "ReviewSettings::default_api_key")]
    pub api_key: Secret<String>,
    #[serde(default = "ReviewSettings::default_endpoint")]
    pub endpoint: String,
    #[serde(default = "ReviewSettings::default_timeout_ms")]
    pub timeout_ms: u64,
}

impl ReviewSettings {
    fn default_api_key() -> Secret<String> {
        Secret::new(String::new())
    }

    fn default_endpoint() -> String {
        "https://api.nytimes.com/svc/books/v3".to_string()
    }

    fn default_timeout_ms() -> u64 {
        10000
    }
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            api_key: Self::default_api_key(),
            endpoint: Self::default_endpoint(),
            timeout_ms: Self::default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default = "TelemetrySettings::default_filter")]
    pub filter: String,
}

impl TelemetrySettings {
    fn default_filter() -> String {
        "booklist=info,booklist_app=info,tower_http=info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            filter: Self::default_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

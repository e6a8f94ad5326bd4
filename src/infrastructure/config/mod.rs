use serde::{Deserialize, Serialize};
use std::{
    net::{AddrParseError, SocketAddr},
    time::Duration,
};

/// Deployment environment for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Test => write!(f, "test"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            _ => Err(format!(
                "Invalid environment: {s}. Valid values: development, production, test"
            )),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    pub rate_limit: RateLimitSettings,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Clash Royale API connection settings
#[derive(Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_ms: u64,
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Token verification settings
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Per-client request limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window_seconds: u64,
    pub trust_forwarded_headers: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

/// Environment variables mapped onto configuration keys
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("HOST", "server.host"),
    ("PORT", "server.port"),
    ("CLASH_ROYALE_API_KEY", "upstream.api_key"),
    ("CLASH_ROYALE_BASE_URL", "upstream.base_url"),
    ("REQUEST_TIMEOUT", "upstream.timeout_ms"),
    ("JWT_SECRET", "auth.jwt_secret"),
    ("RATE_LIMIT_MAX_REQUESTS", "rate_limit.max_requests"),
    ("RATE_LIMIT_WINDOW_SECONDS", "rate_limit.window_seconds"),
    ("TRUST_PROXY", "rate_limit.trust_forwarded_headers"),
    ("LOG_LEVEL", "logging.level"),
];

const REQUIRED_VARIABLES: &[(&str, &str)] = &[("CLASH_ROYALE_API_KEY", "upstream.api_key")];

impl AppConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    /// Returns an error if required variables are missing or a value cannot be parsed
    pub fn load_from<F>(lookup: F) -> Result<Self, config::ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let missing: Vec<&str> = REQUIRED_VARIABLES
            .iter()
            .filter(|(var, _)| lookup(*var).is_none())
            .map(|(var, _)| *var)
            .collect();
        if !missing.is_empty() {
            return Err(config::ConfigError::Message(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let environment = lookup("NODE_ENV")
            .or_else(|| lookup("APP_ENV"))
            .map_or(Ok(Environment::Development), |value| value.parse::<Environment>())
            .map_err(config::ConfigError::Message)?;

        let (log_level, log_format) = match environment {
            Environment::Production => ("info", "json"),
            Environment::Development | Environment::Test => ("debug", "pretty"),
        };

        let mut builder = config::Config::builder()
            .set_default("environment", environment.to_string())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("upstream.api_key", "")?
            .set_default("upstream.base_url", "https://api.clashroyale.com/v1")?
            .set_default("upstream.timeout_ms", 10_000)?
            .set_default("rate_limit.max_requests", 100)?
            .set_default("rate_limit.window_seconds", 15 * 60)?
            .set_default("rate_limit.trust_forwarded_headers", false)?
            .set_default("logging.level", log_level)?
            .set_default("logging.format", log_format)?;

        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, lookup(*var))?;
        }

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.upstream.base_url = config.upstream.base_url.trim_end_matches('/').to_string();
        config.logging.format = lookup("LOG_FORMAT")
            .map_or(Ok(config.logging.format), |value| value.parse::<LogFormat>())
            .map_err(config::ConfigError::Message)?;

        Ok(config)
    }

    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(format!("Invalid log format: {s}. Valid values: pretty, json, compact")),
        }
    }
}

impl ServerConfig {
    /// Get the socket address for binding
    ///
    /// # Errors
    /// Returns an error if the host/port pair is not a valid socket address
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

impl UpstreamConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl RateLimitSettings {
    #[must_use]
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }
}

//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `potbot.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use axum::http::HeaderValue;
use serde::Deserialize;

use potbot_app::secret::{MAX_COST, MIN_COST};
use potbot_app::session::{DEFAULT_SESSION_TTL_SECS, MAX_SESSION_TTL_SECS};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
    pub frontend: FrontendConfig,
    /// Password hashing and sessions.
    pub auth: AuthConfig,
    /// Device command queue.
    pub queue: QueueConfig,
    pub mail: MailConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origin of the web frontend. Empty disables CORS.
    pub allowed_origin: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Built frontend served for every non-API path.
    pub static_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// bcrypt work factor for passwords and device secrets.
    pub bcrypt_cost: u32,
    /// Lifetime of a browser session, in seconds.
    pub session_ttl_secs: i64,
    /// Mark the session cookie `Secure`.
    pub secure_cookies: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Keep at most this many pending commands per plant, dropping the oldest.
    /// Unbounded when unset.
    pub max_pending_per_plant: Option<usize>,
}

/// SMTP relay for owner notifications.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Sender address of owner notifications, also the SMTP login.
    pub from: Option<String>,
    pub password: Option<String>,
    /// Relay host name.
    pub server: Option<String>,
    pub port: Option<u16>,
    /// Write notifications to the log instead of sending them.
    pub log_only: bool,
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("from", &self.from)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("server", &self.server)
            .field("port", &self.port)
            .field("log_only", &self.log_only)
            .finish()
    }
}

impl Config {
    /// Load configuration from `potbot.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("potbot.toml")?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("POTBOT_HOST") {
            self.server.host = val;
        }
        for key in ["PORT", "POTBOT_PORT"] {
            if let Some(port) = var(key).and_then(|val| val.parse().ok()) {
                self.server.port = port;
            }
        }
        if let Some(val) = var("POTBOT_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("POTBOT_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("POTBOT_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("POTBOT_CORS_ORIGIN") {
            self.cors.allowed_origin = val;
        }
        if let Some(val) = var("POTBOT_STATIC_DIR") {
            self.frontend.static_dir = PathBuf::from(val);
        }
        if let Some(cost) = var("POTBOT_BCRYPT_COST").and_then(|val| val.parse().ok()) {
            self.auth.bcrypt_cost = cost;
        }
        if let Some(val) = var("POTBOT_SECURE_COOKIES") {
            self.auth.secure_cookies = matches!(val.as_str(), "1" | "true" | "yes");
        }
        if let Some(max) = var("POTBOT_QUEUE_MAX_PENDING").and_then(|val| val.parse().ok()) {
            self.queue.max_pending_per_plant = Some(max);
        }
        if let Some(val) = var("POTBOT_EMAIL_ADDRESS") {
            self.mail.from = Some(val);
        }
        if let Some(val) = var("POTBOT_EMAIL_PASSWORD") {
            self.mail.password = Some(val);
        }
        if let Some(val) = var("POTBOT_MAIL_SERVER") {
            self.mail.server = Some(val);
        }
        if let Some(port) = var("POTBOT_MAIL_PORT").and_then(|val| val.parse().ok()) {
            self.mail.port = Some(port);
        }
        if let Some(val) = var("POTBOT_MAIL_LOG_ONLY") {
            self.mail.log_only = matches!(val.as_str(), "1" | "true" | "yes");
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if !(MIN_COST..=MAX_COST).contains(&self.auth.bcrypt_cost) {
            return Err(ConfigError::Validation(format!(
                "bcrypt_cost must be between {MIN_COST} and {MAX_COST}"
            )));
        }
        if !(1..=MAX_SESSION_TTL_SECS).contains(&self.auth.session_ttl_secs) {
            return Err(ConfigError::Validation(format!(
                "session_ttl_secs must be between 1 and {MAX_SESSION_TTL_SECS}"
            )));
        }
        if self.queue.max_pending_per_plant == Some(0) {
            return Err(ConfigError::Validation(
                "max_pending_per_plant must be non-zero".to_string(),
            ));
        }
        if self.mail.port == Some(0) {
            return Err(ConfigError::Validation(
                "mail port must be non-zero".to_string(),
            ));
        }
        if !self.cors.allowed_origin.is_empty()
            && HeaderValue::from_str(&self.cors.allowed_origin).is_err()
        {
            return Err(ConfigError::Validation(format!(
                "invalid CORS origin {:?}",
                self.cors.allowed_origin
            )));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// CORS origin as a header value, `None` when CORS is disabled.
    #[must_use]
    pub fn cors_origin(&self) -> Option<HeaderValue> {
        if self.cors.allowed_origin.is_empty() {
            return None;
        }
        HeaderValue::from_str(&self.cors.allowed_origin).ok()
    }

    #[must_use]
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.auth.session_ttl_secs)
    }

    #[must_use]
    pub fn max_pending(&self) -> Option<NonZeroUsize> {
        self.queue.max_pending_per_plant.and_then(NonZeroUsize::new)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:potbot.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "potbotd=info,potbot=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "http://localhost:3000".to_string(),
        }
    }
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("../frontend/build"),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: 12,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            secure_cookies: false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

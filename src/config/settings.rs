//! Run configuration
//!
//! Everything a run needs besides the rule document: database credentials,
//! statement timeout, generator locale. It is built once at process start,
//! either by the CLI (flags with environment fallbacks) or by
//! [`RunConfig::from_lookup`], and passed down explicitly. Nothing inside the
//! engine reads the environment.

use super::secret::{secret_string, SecretString};
use crate::core::generator::Locale;
use crate::domain::errors::AnonymizerError;
use crate::domain::result::Result;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Environment variable holding the rule document path
pub const ENV_CONFIG: &str = "ANONYMIZER_CONFIG";
/// Database host
pub const ENV_HOSTNAME: &str = "ANONYMIZER_LOCAL_HOSTNAME";
/// Database port
pub const ENV_PORT: &str = "ANONYMIZER_LOCAL_PORT";
/// Database (schema) name
pub const ENV_DATABASE: &str = "ANONYMIZER_LOCAL_DATABASE";
/// Database user
pub const ENV_USERNAME: &str = "ANONYMIZER_LOCAL_USERNAME";
/// Database password
pub const ENV_PASSWORD: &str = "ANONYMIZER_LOCAL_PASSWORD";
/// Per-operation timeout in seconds
pub const ENV_TIMEOUT: &str = "ANONYMIZER_LOCAL_CONNECTION_TIMEOUT";
/// Generator locale
pub const ENV_LOCALE: &str = "FAKER_LOCALE";
/// Optional RNG seed
pub const ENV_SEED: &str = "ANONYMIZER_SEED";

/// Default database host
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default MySQL port
pub const DEFAULT_PORT: u16 = 3306;
/// Default per-operation timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// Default generator locale
pub const DEFAULT_LOCALE: &str = "en";

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// Host name or address
    pub host: String,
    /// TCP port
    pub port: u16,
    /// Database (schema) to anonymize
    pub database: String,
    /// User name
    pub username: String,
    /// Password, zeroized on drop
    pub password: SecretString,
    /// Timeout applied to every connection operation
    pub timeout_secs: u64,
}

impl DatabaseSettings {
    /// Timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `user@host:port/database`, safe to log
    pub fn display_safe(&self) -> String {
        format!(
            "{}@{}:{}/{}",
            self.username, self.host, self.port, self.database
        )
    }

    /// Validates the settings
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid setting.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("database host must not be empty".to_string());
        }
        if self.port == 0 {
            return Err("database port must be greater than 0".to_string());
        }
        if self.database.trim().is_empty() {
            return Err("database name must not be empty".to_string());
        }
        if self.username.trim().is_empty() {
            return Err("database username must not be empty".to_string());
        }
        if self.password.expose_secret().is_empty() {
            return Err("database password must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("connection timeout must be greater than 0 seconds".to_string());
        }
        Ok(())
    }
}

/// Configuration for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Database connection settings
    pub database: DatabaseSettings,
    /// Locale used by the value generators unless a column overrides it
    pub locale: Locale,
    /// Seed for reproducible values
    pub seed: Option<u64>,
    /// Render progress bars on stderr
    pub show_progress: bool,
}

impl RunConfig {
    /// Creates a run configuration with progress rendering enabled
    pub fn new(database: DatabaseSettings, locale: Locale) -> Self {
        Self {
            database,
            locale,
            seed: None,
            show_progress: true,
        }
    }

    /// Sets the generator seed
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Enables or disables progress rendering
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Reads the configuration from the process environment
    ///
    /// # Errors
    ///
    /// See [`RunConfig::from_lookup`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from a variable lookup
    ///
    /// Host defaults to `127.0.0.1`, port to `3306`, timeout to 60 seconds
    /// and locale to `en`. Database, username and password are required.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming every missing required variable,
    /// or the first variable holding an unparsable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = get(ENV_HOSTNAME).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_var(ENV_PORT, get(ENV_PORT), DEFAULT_PORT)?;
        let timeout_secs = parse_var(ENV_TIMEOUT, get(ENV_TIMEOUT), DEFAULT_TIMEOUT_SECS)?;

        let database = get(ENV_DATABASE);
        let username = get(ENV_USERNAME);
        let password = get(ENV_PASSWORD);
        let (database, username, password) = match (database, username, password) {
            (Some(d), Some(u), Some(p)) => (d, u, p),
            _ => {
                return Err(AnonymizerError::Configuration(format!(
                    "Could not find the environment variable for one of the following: {ENV_DATABASE}, {ENV_USERNAME}, {ENV_PASSWORD}"
                )))
            }
        };

        let locale_name = get(ENV_LOCALE).unwrap_or_else(|| DEFAULT_LOCALE.to_string());
        let locale = Locale::from_str(&locale_name)?;

        let seed = match get(ENV_SEED) {
            Some(raw) => Some(parse_var(ENV_SEED, Some(raw), 0u64)?),
            None => None,
        };

        let config = Self {
            database: DatabaseSettings {
                host,
                port,
                database,
                username,
                password: secret_string(password),
                timeout_secs,
            },
            locale,
            seed,
            show_progress: true,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any database setting is invalid.
    pub fn validate(&self) -> Result<()> {
        self.database
            .validate()
            .map_err(|e| AnonymizerError::Configuration(format!("Invalid run configuration: {e}")))
    }
}

fn parse_var<T: FromStr>(name: &str, raw: Option<String>, default: T) -> Result<T> {
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            AnonymizerError::Configuration(format!(
                "Environment variable {name} has an invalid value '{raw}'"
            ))
        }),
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to a rolling file
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation: daily, hourly or never
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

impl LoggingConfig {
    /// Console-only logging
    pub fn console() -> Self {
        Self::default()
    }

    /// Console logging plus JSON files under `path`
    pub fn with_file(path: impl Into<String>) -> Self {
        Self {
            local_enabled: true,
            local_path: path.into(),
            ..Self::default()
        }
    }
}

fn default_log_path() -> String {
    "./logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

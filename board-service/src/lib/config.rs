use std::env;

use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    /// Empty means any origin is allowed.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

/// Longest accepted token lifetime: one year.
pub const MAX_EXPIRATION_HOURS: i64 = 24 * 365;

fn default_max_connections() -> u32 {
    5
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(
                Environment::with_prefix("")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins"),
            )
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the authentication core cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".to_string()));
        }
        if self.jwt.expiration_hours < 1 {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_hours must be at least 1, got {}",
                self.jwt.expiration_hours
            )));
        }
        if self.jwt.expiration_hours > MAX_EXPIRATION_HOURS {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_hours must be at most {}, got {}",
                MAX_EXPIRATION_HOURS, self.jwt.expiration_hours
            )));
        }
        self.jwt.token_lifetime()?;
        Ok(())
    }
}

impl JwtConfig {
    /// `expiration_hours` as a duration.
    pub fn token_lifetime(&self) -> Result<Duration, ConfigError> {
        Duration::try_hours(self.expiration_hours).ok_or_else(|| {
            ConfigError::Message(format!(
                "jwt.expiration_hours is out of range: {}",
                self.expiration_hours
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str, expiration_hours: i64) -> Config {
        Config {
            database: DatabaseConfig {
                url: "postgresql://localhost/board".to_string(),
                max_connections: 5,
            },
            server: ServerConfig {
                http_port: 8080,
                allowed_origins: Vec::new(),
            },
            jwt: JwtConfig {
                secret: secret.to_string(),
                expiration_hours,
            },
        }
    }

    #[test]
    fn test_validate_accepts_sane_settings() {
        assert!(config("secret", 1).validate().is_ok());
        assert!(config("secret", 24).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_secret() {
        assert!(config("", 24).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_short_lifetime() {
        assert!(config("secret", 0).validate().is_err());
        assert!(config("secret", -3).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_long_lifetime() {
        assert!(config("secret", MAX_EXPIRATION_HOURS).validate().is_ok());
        assert!(config("secret", MAX_EXPIRATION_HOURS + 1).validate().is_err());
        assert!(config("secret", 10_000_000_000).validate().is_err());
        assert!(config("secret", 3_000_000_000_000).validate().is_err());
        assert!(config("secret", i64::MAX).validate().is_err());
    }

    #[test]
    fn test_token_lifetime() {
        let lifetime = config("secret", 24).jwt.token_lifetime().unwrap();
        assert_eq!(lifetime, Duration::hours(24));

        assert!(config("secret", i64::MAX).jwt.token_lifetime().is_err());
    }
}

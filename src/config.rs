//! # Configuration
//!
//! JSON configuration file with every field defaulted, followed by
//! environment overrides:
//!
//! - `FOODLOVERS_PORT`: listen port
//! - `FOODLOVERS_JWT_SECRET`: bearer token signing secret

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::JwtConfig;

pub const ENV_PORT: &str = "FOODLOVERS_PORT";
pub const ENV_JWT_SECRET: &str = "FOODLOVERS_JWT_SECRET";

/// Upper bound for `auth.token_ttl_secs` (one year)
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for {var}: {value}")]
    InvalidOverride { var: &'static str, value: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    pub host: String,

    /// Port to bind to (default: 3000)
    pub port: u16,

    /// CORS allowed origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Bearer token verification settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,

    /// Lifetime of tokens minted by `foodlovers token`
    pub token_ttl_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let jwt = JwtConfig::default();
        Self {
            secret: jwt.secret,
            issuer: jwt.issuer,
            audience: jwt.audience,
            token_ttl_secs: jwt.token_ttl.num_seconds(),
        }
    }
}

impl AuthConfig {
    /// Reject token lifetimes that are non-positive or beyond one year
    pub fn validate(&self) -> ConfigResult<()> {
        if self.token_ttl_secs <= 0 || self.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::InvalidValue {
                field: "auth.token_ttl_secs",
                value: self.token_ttl_secs.to_string(),
                reason: "must be between 1 and 31536000 seconds",
            });
        }
        Ok(())
    }
}

impl From<&AuthConfig> for JwtConfig {
    fn from(auth: &AuthConfig) -> Self {
        let token_ttl = chrono::Duration::try_seconds(auth.token_ttl_secs)
            .unwrap_or_else(|| JwtConfig::default().token_ttl);

        JwtConfig {
            secret: auth.secret.clone(),
            token_ttl,
            issuer: auth.issuer.clone(),
            audience: auth.audience.clone(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "foodlovers=info,tower_http=info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Load from `path` (or defaults when `None`), then apply process
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON config file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.auth.validate()
    }

    /// Apply overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidOverride {
                var: ENV_PORT,
                value: port.clone(),
            })?;
        }

        if let Some(secret) = lookup(ENV_JWT_SECRET).filter(|s| !s.is_empty()) {
            self.auth.secret = secret;
        }

        Ok(())
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::from(&self.auth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.socket_addr(), "0.0.0.0:3000");
        assert!(config.server.cors_origins.is_empty());
        assert_eq!(config.logging.format, LogFormat::Text);
        assert_eq!(config.auth.token_ttl_secs, 3600);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"server": {{"port": 8080}}, "logging": {{"format": "json"}}}}"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.auth, AuthConfig::default());
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_out_of_range_token_ttl_is_rejected() {
        for ttl in ["9223372036854775807", "0", "-5"] {
            let mut file = NamedTempFile::new().unwrap();
            write!(file, r#"{{"auth": {{"token_ttl_secs": {ttl}}}}}"#).unwrap();

            let err = Config::from_file(file.path()).unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidValue {
                    field: "auth.token_ttl_secs",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_huge_token_ttl_never_panics_when_converted() {
        let auth = AuthConfig {
            token_ttl_secs: i64::MAX,
            ..AuthConfig::default()
        };
        assert_eq!(JwtConfig::from(&auth).token_ttl, JwtConfig::default().token_ttl);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> =
            HashMap::from([(ENV_PORT, "9090"), (ENV_JWT_SECRET, "s3cret")]);

        let mut config = Config::default();
        config
            .apply_overrides(|var| env.get(var).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.jwt_config().secret, "s3cret");
    }

    #[test]
    fn test_invalid_port_override() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(|var| (var == ENV_PORT).then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOverride { var: ENV_PORT, .. }));
    }
}

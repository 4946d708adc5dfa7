//! API server configuration.

use haulyard_core::auth::session::SessionConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {name}: {reason}")]
    InvalidVar { name: &'static str, reason: String },
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3400").
    pub bind_addr: String,
    /// Token signing secrets and lifetimes.
    pub session: SessionConfig,
    /// Whether auth cookies carry the Secure attribute.
    pub cookie_secure: bool,
}

impl ApiConfig {
    /// Reads configuration from environment variables.
    ///
    /// Token secrets and TTLs have no defaults; a missing value is a fatal
    /// startup error, never a runtime fallback.
    ///
    /// | Variable                 | Default            |
    /// |--------------------------|--------------------|
    /// | `BIND_ADDR`              | `127.0.0.1:3400`   |
    /// | `ACCESS_TOKEN_SECRET`    | required           |
    /// | `ACCESS_TOKEN_TTL_SECS`  | required           |
    /// | `REFRESH_TOKEN_SECRET`   | required           |
    /// | `REFRESH_TOKEN_TTL_SECS` | required           |
    /// | `COOKIE_SECURE`          | `false`            |
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_secret = required("ACCESS_TOKEN_SECRET")?;
        let access_ttl_secs = required_secs("ACCESS_TOKEN_TTL_SECS")?;
        let refresh_secret = required("REFRESH_TOKEN_SECRET")?;
        let refresh_ttl_secs = required_secs("REFRESH_TOKEN_TTL_SECS")?;

        // A shared secret would let a refresh token replay as an access token.
        if access_secret == refresh_secret {
            return Err(ConfigError::InvalidVar {
                name: "REFRESH_TOKEN_SECRET",
                reason: "must differ from ACCESS_TOKEN_SECRET".into(),
            });
        }

        let cookie_secure = match std::env::var("COOKIE_SECURE") {
            Ok(raw) => raw.parse::<bool>().map_err(|_| ConfigError::InvalidVar {
                name: "COOKIE_SECURE",
                reason: format!("expected true or false, got '{raw}'"),
            })?,
            Err(_) => false,
        };

        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3400".into()),
            session: SessionConfig::new(
                access_secret,
                access_ttl_secs,
                refresh_secret,
                refresh_ttl_secs,
            ),
            cookie_secure,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

fn required_secs(name: &'static str) -> Result<i64, ConfigError> {
    let raw = required(name)?;
    let secs = raw.parse::<i64>().map_err(|e| ConfigError::InvalidVar {
        name,
        reason: e.to_string(),
    })?;
    if secs <= 0 {
        return Err(ConfigError::InvalidVar {
            name,
            reason: format!("must be a positive number of seconds, got {secs}"),
        });
    }
    Ok(secs)
}

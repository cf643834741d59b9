//! Gateway Configuration
//! Mission: Resolve signing and listener settings from the environment

use chrono::{TimeDelta, Utc};
use jsonwebtoken::Algorithm;
use std::env::VarError;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_SECRET_KEY: &str = "my-super-secret-key";
pub const DEFAULT_ALGORITHM: &str = "HS256";
pub const DEFAULT_EXPIRE_MINUTES: i64 = 30;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

const CONFIG_VARS: &[&str] = &[
    "SECRET_KEY",
    "ALGORITHM",
    "ACCESS_TOKEN_EXPIRE_MINUTES",
    "BIND_ADDR",
    "API_PREFIX",
];

/// Startup configuration errors. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer within the supported range, got {value:?}")]
    InvalidInteger { var: &'static str, value: String },

    #[error("{0} is not valid unicode")]
    NotUnicode(&'static str),

    #[error("ALGORITHM must be one of HS256, HS384, HS512, got {0:?}")]
    InvalidAlgorithm(String),

    #[error("BIND_ADDR is not a valid socket address: {0:?}")]
    InvalidBindAddress(String),
}

/// Runtime settings for the gateway
#[derive(Clone)]
pub struct Config {
    pub secret_key: String,
    pub algorithm: Algorithm,
    pub access_token_expire_minutes: i64,
    pub bind_addr: SocketAddr,
    /// Path prefix the auth routes are nested under, empty for the root
    pub api_prefix: String,
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        for &var in CONFIG_VARS {
            read_var(var, std::env::var(var))?;
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = lookup("SECRET_KEY").unwrap_or_else(|| DEFAULT_SECRET_KEY.to_string());

        let algorithm = parse_algorithm(
            &lookup("ALGORITHM").unwrap_or_else(|| DEFAULT_ALGORITHM.to_string()),
        )?;

        let access_token_expire_minutes = match lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Some(raw) => parse_expire_minutes(raw)?,
            None => DEFAULT_EXPIRE_MINUTES,
        };

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddress(bind_raw.clone()))?;

        let api_prefix = normalize_prefix(&lookup("API_PREFIX").unwrap_or_default());

        Ok(Self {
            secret_key,
            algorithm,
            access_token_expire_minutes,
            bind_addr,
            api_prefix,
        })
    }

    /// True when tokens are signed with the built-in development secret
    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            algorithm: Algorithm::HS256,
            access_token_expire_minutes: DEFAULT_EXPIRE_MINUTES,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            api_prefix: String::new(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("secret_key", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field(
                "access_token_expire_minutes",
                &self.access_token_expire_minutes,
            )
            .field("bind_addr", &self.bind_addr)
            .field("api_prefix", &self.api_prefix)
            .finish()
    }
}

/// A set variable that is not unicode is an error, not "unset".
fn read_var(
    var: &'static str,
    value: Result<String, VarError>,
) -> Result<Option<String>, ConfigError> {
    match value {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(var)),
    }
}

/// The lifetime must be positive and `now + lifetime` must be representable.
fn parse_expire_minutes(raw: String) -> Result<i64, ConfigError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|&v| v > 0)
        .filter(|&v| {
            TimeDelta::try_minutes(v)
                .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
                .is_some()
        })
        .ok_or(ConfigError::InvalidInteger {
            var: "ACCESS_TOKEN_EXPIRE_MINUTES",
            value: raw,
        })
}

/// Only HMAC algorithms work with a shared secret key.
fn parse_algorithm(raw: &str) -> Result<Algorithm, ConfigError> {
    let algorithm = Algorithm::from_str(raw.trim())
        .map_err(|_| ConfigError::InvalidAlgorithm(raw.to_string()))?;

    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        _ => Err(ConfigError::InvalidAlgorithm(raw.to_string())),
    }
}

/// "api/v1/" -> "/api/v1", "" or "/" -> ""
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

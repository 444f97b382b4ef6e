//! Runtime settings from environment variables (optionally loaded from `.env` by the binary).

use crate::error::ConfigError;
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// How a POST applies its table replacements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// One transaction per request: either every named table is replaced or none is.
    #[default]
    Atomic,
    /// Each statement commits on its own; a failure leaves earlier tables replaced.
    PerStatement,
}

impl FromStr for WriteMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "atomic" => Ok(WriteMode::Atomic),
            "per_statement" | "per-statement" => Ok(WriteMode::PerStatement),
            _ => Err(ConfigError::Invalid {
                key: "SYNC_WRITE_MODE",
                value: s.to_string(),
                reason: "expected atomic or per_statement".into(),
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    /// Absent or blank means offline mode.
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub write_mode: WriteMode,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: None,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            write_mode: WriteMode::default(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr: SocketAddr = bind_raw.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind_raw.clone(),
            reason: e.to_string(),
        })?;

        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => parse_positive("DB_MAX_CONNECTIONS", &v)?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        let max_body_bytes = match get("MAX_BODY_BYTES") {
            Some(v) => parse_positive("MAX_BODY_BYTES", &v)?,
            None => DEFAULT_MAX_BODY_BYTES,
        };
        let write_mode = match get("SYNC_WRITE_MODE") {
            Some(v) => v.parse()?,
            None => WriteMode::default(),
        };

        Ok(Settings {
            database_url: get("DATABASE_URL"),
            bind_addr,
            max_connections,
            write_mode,
            max_body_bytes,
        })
    }
}

fn parse_positive<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
    T::Err: std::fmt::Display,
{
    let n: T = value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    if n <= T::default() {
        return Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "must be greater than zero".into(),
        });
    }
    Ok(n)
}

use std::{env, fmt::Display, net::SocketAddr, str::FromStr};

use thiserror::Error;
use tracing::info;

pub const DATABASE_URL_KEY: &str = "RSVP_DATABASE_URL";
pub const DATABASE_PATH_KEY: &str = "RSVP_DATABASE_PATH";
pub const BIND_ADDR_KEY: &str = "RSVP_BIND_ADDR";

const DEFAULT_DATABASE_PATH: &str = "rsvps";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Realtime database root URL; records stay in memory when unset.
    pub database_url: Option<String>,
    pub database_path: String,
    pub bind_addr: SocketAddr,
}

impl Settings {
    /// Reads the process environment, after loading `.env` when one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            info!("loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = non_blank(DATABASE_URL_KEY).map(|url| url.trim().to_string());
        let database_path = non_blank(DATABASE_PATH_KEY)
            .map(|path| path.trim().trim_matches('/').to_string())
            .unwrap_or_else(|| {
                info!("{DATABASE_PATH_KEY} not set, using default: {DEFAULT_DATABASE_PATH}");
                DEFAULT_DATABASE_PATH.to_string()
            });
        if database_path.is_empty() {
            return Err(ConfigError::Invalid {
                key: DATABASE_PATH_KEY,
                value: database_path,
                reason: "path must name a child of the database root".to_string(),
            });
        }
        let bind_addr = try_load(BIND_ADDR_KEY, non_blank(BIND_ADDR_KEY), DEFAULT_BIND_ADDR)?;

        Ok(Self {
            database_url,
            database_path,
            bind_addr,
        })
    }
}

fn try_load<T: FromStr>(key: &'static str, value: Option<String>, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = value.unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value: raw,
    })
}

//! Process configuration, read from the environment.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `PORT` | `8080` | listen port on all interfaces |
//! | `CORS_ALLOWED_ORIGINS` | empty (any origin) | comma-separated allow-list, `*` for any |

use std::net::{Ipv4Addr, SocketAddr};

use crate::cors::CorsPolicy;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT {value:?}: {source}")]
    InvalidPort {
        value: String,
        source: std::num::ParseIntError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub cors: CorsPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            cors: CorsPolicy::allow_any(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset for `PORT`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT").filter(|value| !value.is_empty()) {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => DEFAULT_PORT,
        };
        let cors = CorsPolicy::from_list(&lookup("CORS_ALLOWED_ORIGINS").unwrap_or_default());
        Ok(Self { port, cors })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

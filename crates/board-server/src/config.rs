use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::info;

use board_db::DEFAULT_READER_POOL_SIZE;

/// Process configuration, read once at startup and handed to constructors.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub db_readers: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let default_readers = DEFAULT_READER_POOL_SIZE.to_string();
        Ok(Self {
            db_path: try_load(&lookup, "BOARD_DB_PATH", "chat.db")?,
            host: try_load(&lookup, "BOARD_HOST", "0.0.0.0")?,
            port: try_load(&lookup, "BOARD_PORT", "5000")?,
            db_readers: try_load::<usize>(&lookup, "BOARD_DB_READERS", &default_readers)?.max(1),
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T>
where
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.parse()
        .map_err(|e| anyhow::anyhow!("Invalid {key} value {raw:?}: {e}"))
}

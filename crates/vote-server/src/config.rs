//! Configuration for the vote server.
//!
//! Defaults can be overridden via environment variables:
//!
//! - `PORT`               (default: "3000")
//! - `VOTE_BIND_ADDR`     (default: "0.0.0.0")
//! - `VOTE_MAX_CLIENTS`   (default: "1024")
//! - `VOTE_IDENTITY_MODE` (default: "color"; or "connection")
//! - `VOTE_LOG_JSON`      (default: off; "1"/"true" for JSON logs)
//!
//! Log filtering itself goes through `RUST_LOG`.

use std::env;
use std::str::FromStr;

use anyhow::{bail, Context};
use vote_core::IdentityMode;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Maximum number of simultaneously connected clients.
    pub max_clients: usize,

    /// Whose votes are whose: per connection or per color.
    pub identity_mode: IdentityMode,

    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "0.0.0.0".to_string(),
            port: 3000,
            max_clients: 1024,
            identity_mode: IdentityMode::default(),
            json_logs: false,
        }
    }
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        Ok(Config {
            bind_addr: lookup("VOTE_BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: read_or_default(&lookup, "PORT", defaults.port)?,
            max_clients: read_or_default(&lookup, "VOTE_MAX_CLIENTS", defaults.max_clients)?,
            identity_mode: read_or_default(&lookup, "VOTE_IDENTITY_MODE", defaults.identity_mode)?,
            json_logs: match lookup("VOTE_LOG_JSON") {
                Some(val) => parse_flag("VOTE_LOG_JSON", &val)?,
                None => defaults.json_logs,
            },
        })
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn read_or_default<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(val) => val
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value {:?} for {}", val, key)),
        None => Ok(default),
    }
}

fn parse_flag(key: &str, val: &str) -> anyhow::Result<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => bail!("invalid value {:?} for {} (expected true or false)", val, key),
    }
}

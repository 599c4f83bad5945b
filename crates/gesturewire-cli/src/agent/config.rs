//! Agent address resolution.
//!
//! Priority for each field:
//! 1. Command-line flag (`--host`, `--port`)
//! 2. `GESTUREWIRE_HOST` / `GESTUREWIRE_PORT` (empty values are ignored)
//! 3. Defaults: `127.0.0.1`, port `12345` (the agent's fixed listen port)

use std::env;
use std::fmt;
use std::num::ParseIntError;

pub const HOST_ENV: &str = "GESTUREWIRE_HOST";
pub const PORT_ENV: &str = "GESTUREWIRE_PORT";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 12345;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid agent port '{value}' in {source_name}")]
    InvalidPort {
        value: String,
        source_name: &'static str,
        #[source]
        source: ParseIntError,
    },
    #[error("agent host must not be blank")]
    BlankHost,
}

/// Where the in-app agent listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentAddress {
    pub host: String,
    pub port: u16,
}

impl Default for AgentAddress {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl fmt::Display for AgentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl AgentAddress {
    /// Resolve the address from flags, then environment, then defaults.
    pub fn resolve(host: Option<&str>, port: Option<u16>) -> Result<Self, ConfigError> {
        let host = match host {
            Some(h) if h.trim().is_empty() => return Err(ConfigError::BlankHost),
            Some(h) => h.trim().to_string(),
            None => non_empty_env(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
        };

        let port = match port {
            Some(p) => p,
            None => match non_empty_env(PORT_ENV) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|source| ConfigError::InvalidPort {
                        value: raw.clone(),
                        source_name: PORT_ENV,
                        source,
                    })?,
                None => DEFAULT_PORT,
            },
        };

        Ok(Self { host, port })
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

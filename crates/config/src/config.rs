//! Centralized configuration management for dsec
//!
//! The `Config` struct is the single source of truth for where the local
//! agent and server sockets live. It is immutable after construction and is
//! handed to the flow objects that need it, never read from global state at
//! call time.

use dsec_core::{
    constants::{
        AGENT_SOCKET_VAR, CALL_TIMEOUT_VAR, DEFAULT_AGENT_SOCKET, DEFAULT_SERVER_SOCKET,
        SERVER_SOCKET_VAR,
    },
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Immutable transport configuration.
///
/// An unset socket address is legal here; the flow that needs it reports the
/// peer as unreachable when it is asked to connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Socket of the credential-issuing agent
    pub agent_socket: Option<PathBuf>,

    /// Socket of the credential-validating server
    pub server_socket: Option<PathBuf>,

    /// Read/write timeout applied to each transport call, in milliseconds
    pub call_timeout_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            agent_socket: Some(PathBuf::from(DEFAULT_AGENT_SOCKET)),
            server_socket: Some(PathBuf::from(DEFAULT_SERVER_SOCKET)),
            call_timeout_ms: None,
        }
    }
}

impl Config {
    /// Start building a configuration with no addresses set
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Default configuration with overrides taken from the process environment
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Read a JSON configuration file
    ///
    /// Fields missing from the file keep their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::file_system(path, "read config", e))?;
        let config: Config = serde_json::from_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Apply overrides from a variable lookup
    ///
    /// An empty value unsets the corresponding address.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(AGENT_SOCKET_VAR) {
            self.agent_socket = non_empty_path(value);
        }
        if let Some(value) = lookup(SERVER_SOCKET_VAR) {
            self.server_socket = non_empty_path(value);
        }
        if let Some(value) = lookup(CALL_TIMEOUT_VAR) {
            let value = value.trim();
            self.call_timeout_ms = if value.is_empty() {
                None
            } else {
                Some(value.parse::<u64>().map_err(|e| {
                    Error::configuration(format!("{CALL_TIMEOUT_VAR} must be milliseconds: {e}"))
                })?)
            };
        }
        Ok(self)
    }

    /// Per-call transport timeout, if one is configured
    #[must_use]
    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

fn non_empty_path(value: String) -> Option<PathBuf> {
    if value.trim().is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

/// Builder for [`Config`]
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    agent_socket: Option<PathBuf>,
    server_socket: Option<PathBuf>,
    call_timeout: Option<Duration>,
}

impl ConfigBuilder {
    /// Set the agent socket address
    pub fn agent_socket(mut self, path: impl Into<PathBuf>) -> Self {
        self.agent_socket = Some(path.into());
        self
    }

    /// Set the server socket address
    pub fn server_socket(mut self, path: impl Into<PathBuf>) -> Self {
        self.server_socket = Some(path.into());
        self
    }

    /// Set the per-call timeout
    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        Config {
            agent_socket: self.agent_socket,
            server_socket: self.server_socket,
            call_timeout_ms: self.call_timeout.map(|t| t.as_millis() as u64),
        }
    }
}

//! HTTP server configuration for `noteset serve`.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_bind() -> String {
    "127.0.0.1:8787".to_string()
}

/// Default request body cap (1 MiB).
const fn default_max_body_bytes() -> usize {
    1024 * 1024
}

fn default_list_path() -> String {
    "/notes".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Listen address (`host:port`).
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Largest accepted request body, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Path serving the note list (GET) and accepting submissions (POST).
    #[serde(default = "default_list_path")]
    pub list_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
            list_path: default_list_path(),
        }
    }
}

impl ServerConfig {
    /// Parsed listen address.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `bind` is not `host:port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|e| ConfigError::invalid("server.bind", format!("'{}': {e}", self.bind)))
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.max_body_bytes == 0 {
            return Err(ConfigError::invalid(
                "server.max_body_bytes",
                "must be greater than zero",
            ));
        }
        if !self.list_path.starts_with('/') {
            return Err(ConfigError::invalid(
                "server.list_path",
                format!("'{}' must start with '/'", self.list_path),
            ));
        }
        Ok(())
    }
}

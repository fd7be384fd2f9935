//! Server and service identity configuration.

use serde::{Deserialize, Serialize};

/// Service identity settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfoConfig {
    /// Service name, also used as the access token issuer.
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Deployment environment (`local`, `dev`, `production`, ...).
    #[serde(default)]
    pub env: String,
}

impl Default for AppInfoConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            env: String::new(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Seconds to wait for background tasks during shutdown.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout_seconds: default_shutdown_timeout(),
        }
    }
}

fn default_service_name() -> String {
    "warden".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_shutdown_timeout() -> u64 {
    10
}

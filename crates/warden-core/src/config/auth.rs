//! Authentication configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Token signing and lifetime configuration.
///
/// Key material is the base64 encoding of a PEM document: PKCS#8 for the
/// Ed25519 private key, SPKI for the public key.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Base64-encoded PEM of the Ed25519 private key.
    #[serde(default)]
    pub private_key_base64: String,
    /// Base64-encoded PEM of the Ed25519 public key.
    #[serde(default)]
    pub public_key_base64: String,
    /// Access token lifetime in seconds.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_seconds: u64,
    /// Refresh token lifetime in seconds.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_seconds: u64,
    /// Clock skew tolerated when checking `exp`/`nbf`.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
    /// Expose the credential-less dev login endpoint.
    #[serde(default)]
    pub dev_login_enabled: bool,
    /// Argon2id memory cost in KiB for password hashes.
    #[serde(default = "default_password_memory_kib")]
    pub password_memory_kib: u32,
    /// Argon2id iteration count.
    #[serde(default = "default_password_iterations")]
    pub password_iterations: u32,
    /// Argon2id lanes.
    #[serde(default = "default_password_parallelism")]
    pub password_parallelism: u32,
}

impl AuthConfig {
    /// Access token lifetime.
    pub fn access_ttl(&self) -> Duration {
        Duration::from_secs(self.access_ttl_seconds)
    }

    /// Refresh token lifetime.
    pub fn refresh_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_ttl_seconds)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            private_key_base64: String::new(),
            public_key_base64: String::new(),
            access_ttl_seconds: default_access_ttl(),
            refresh_ttl_seconds: default_refresh_ttl(),
            leeway_seconds: default_leeway(),
            dev_login_enabled: false,
            password_memory_kib: default_password_memory_kib(),
            password_iterations: default_password_iterations(),
            password_parallelism: default_password_parallelism(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("private_key_base64", &"<redacted>")
            .field("public_key_base64", &self.public_key_base64)
            .field("access_ttl_seconds", &self.access_ttl_seconds)
            .field("refresh_ttl_seconds", &self.refresh_ttl_seconds)
            .field("leeway_seconds", &self.leeway_seconds)
            .field("dev_login_enabled", &self.dev_login_enabled)
            .field("password_memory_kib", &self.password_memory_kib)
            .field("password_iterations", &self.password_iterations)
            .field("password_parallelism", &self.password_parallelism)
            .finish()
    }
}

fn default_access_ttl() -> u64 {
    15 * 60
}

fn default_refresh_ttl() -> u64 {
    7 * 24 * 3600
}

fn default_password_memory_kib() -> u32 {
    19 * 1024
}

fn default_password_iterations() -> u32 {
    2
}

fn default_password_parallelism() -> u32 {
    1
}

fn default_leeway() -> u64 {
    5
}

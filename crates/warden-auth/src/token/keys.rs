//! Ed25519 signing key material.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use jsonwebtoken::{DecodingKey, EncodingKey};

use warden_core::config::AuthConfig;
use warden_core::error::{AppError, ErrorKind};

/// The process-wide Ed25519 key pair, fixed at startup.
///
/// The private half signs access tokens; the public half verifies them.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys").finish_non_exhaustive()
    }
}

impl TokenKeys {
    /// Loads the key pair from PEM documents (PKCS#8 private, SPKI public).
    pub fn from_pem(private_pem: &[u8], public_pem: &[u8]) -> Result<Self, AppError> {
        let encoding = EncodingKey::from_ed_pem(private_pem).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid Ed25519 private key", e)
        })?;
        let decoding = DecodingKey::from_ed_pem(public_pem).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid Ed25519 public key", e)
        })?;

        Ok(Self { encoding, decoding })
    }

    /// Loads the key pair from base64-encoded PEM in the auth configuration.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AppError> {
        if config.private_key_base64.is_empty() || config.public_key_base64.is_empty() {
            return Err(AppError::configuration(
                "auth.private_key_base64 and auth.public_key_base64 are required",
            ));
        }

        let private_pem = decode_base64("auth.private_key_base64", &config.private_key_base64)?;
        let public_pem = decode_base64("auth.public_key_base64", &config.public_key_base64)?;

        Self::from_pem(&private_pem, &public_pem)
    }

    /// Key used to sign access tokens.
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    /// Key used to verify access tokens.
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

fn decode_base64(field: &str, value: &str) -> Result<Vec<u8>, AppError> {
    STANDARD
        .decode(value.trim())
        .map_err(|e| AppError::with_source(ErrorKind::Configuration, format!("{field} is not valid base64"), e))
}

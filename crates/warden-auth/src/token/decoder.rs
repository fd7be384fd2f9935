//! Access token verification.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use warden_core::error::{AppError, ErrorKind};

use super::claims::AccessClaims;
use super::keys::TokenKeys;

/// Verifies access tokens against the Ed25519 public key.
#[derive(Clone)]
pub struct JwtDecoder {
    /// Ed25519 public key.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a decoder accepting only EdDSA tokens issued by `issuer`.
    pub fn new(keys: &TokenKeys, issuer: &str, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = leeway_seconds;
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "nbf", "iat", "iss", "sub"]);

        Self {
            decoding_key: keys.decoding_key().clone(),
            validation,
        }
    }

    /// Verifies the signature and time bounds of `token` and returns its claims.
    ///
    /// Every verification failure is `Unauthorized`; a token whose header
    /// names any algorithm other than EdDSA is rejected before the
    /// signature is examined.
    pub fn parse_access(&self, token: &str) -> Result<AccessClaims, AppError> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| {
                let message = match e.kind() {
                    JwtErrorKind::ExpiredSignature => "Token has expired",
                    JwtErrorKind::ImmatureSignature => "Token is not yet valid",
                    JwtErrorKind::InvalidSignature => "Invalid token signature",
                    JwtErrorKind::InvalidAlgorithm => "Unexpected token signing method",
                    JwtErrorKind::InvalidIssuer => "Invalid token issuer",
                    JwtErrorKind::InvalidToken => "Invalid token format",
                    JwtErrorKind::InvalidKeyFormat => {
                        return AppError::with_source(
                            ErrorKind::Internal,
                            "Verification key is unusable",
                            e,
                        );
                    }
                    _ => "Token validation failed",
                };
                AppError::with_source(ErrorKind::Unauthorized, message, e)
            },
        )?;

        Ok(data.claims)
    }
}

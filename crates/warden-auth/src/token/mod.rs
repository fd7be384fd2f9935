//! Access token encoding, decoding, claims, and key material.

pub mod claims;
pub mod decoder;
pub mod encoder;
pub mod keys;

pub use claims::AccessClaims;
pub use decoder::JwtDecoder;
pub use encoder::JwtEncoder;
pub use keys::TokenKeys;

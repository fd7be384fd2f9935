//! Session store key builders.
//!
//! Backend-level prefixes (e.g. the Redis `key_prefix`) are applied by the
//! provider, not here.

/// Key of the refresh record for `token`; holds `"{user_id}:{role_id}"`.
pub fn refresh_token(token: &str) -> String {
    format!("refreshToken:{token}")
}

/// Key of the session pointer for `user_id`; holds the current refresh token.
pub fn refresh_session(user_id: u64) -> String {
    format!("refreshSession:{user_id}")
}

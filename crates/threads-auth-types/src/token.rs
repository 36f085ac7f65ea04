//! Opaque token generation and format validation.

use rand::RngExt;
use subtle::ConstantTimeEq;

use threads_domain::id::UserId;

/// Random bytes in an auth token (32 hex chars).
pub const AUTH_TOKEN_RANDOM_BYTES: usize = 16;

/// Total length of an auth token: 32 random hex chars + 13-char padded user id.
pub const AUTH_TOKEN_LEN: usize = 45;

/// Random bytes in a session bearer token (64 hex chars).
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Reasons a submitted auth token is rejected before any store access.
///
/// Messages are shown to the user verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenFormatError {
    #[error("Token is required.")]
    Empty,
    #[error("Token must only contain lowercase letters (a-f) and numbers.")]
    Charset,
    #[error("Token must be exactly 45 characters long.")]
    Length,
}

/// Draw `byte_length` bytes from the thread-local CSPRNG and hex-encode them.
///
/// `rand::rng()` is a ChaCha-based generator seeded and periodically reseeded
/// from the operating system.
pub fn generate_token(byte_length: usize) -> String {
    let mut bytes = vec![0u8; byte_length];
    rand::rng().fill(bytes.as_mut_slice());
    hex::encode(bytes)
}

/// Build a fresh one-time auth token for `user_id`.
///
/// The padded user id suffix keeps tokens unique across users; it is never
/// decoded when a token is redeemed.
pub fn generate_auth_token(user_id: &UserId) -> String {
    let mut token = generate_token(AUTH_TOKEN_RANDOM_BYTES);
    token.push_str(&user_id.padded());
    token
}

/// Build a fresh session bearer secret.
pub fn generate_session_token() -> String {
    generate_token(SESSION_TOKEN_BYTES)
}

/// Check that `token` matches `^[0-9a-f]{45}$`.
///
/// ```
/// use threads_auth_types::token::{validate_auth_token, TokenFormatError};
///
/// assert_eq!(validate_auth_token("short"), Err(TokenFormatError::Charset));
/// assert_eq!(validate_auth_token("abc"), Err(TokenFormatError::Length));
/// assert!(validate_auth_token(&"a".repeat(45)).is_ok());
/// ```
pub fn validate_auth_token(token: &str) -> Result<&str, TokenFormatError> {
    if token.is_empty() {
        return Err(TokenFormatError::Empty);
    }
    if !token.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return Err(TokenFormatError::Charset);
    }
    if token.len() != AUTH_TOKEN_LEN {
        return Err(TokenFormatError::Length);
    }
    Ok(token)
}

/// Compare two secrets without leaking the position of the first mismatch.
pub fn secrets_match(expected: &str, provided: &str) -> bool {
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

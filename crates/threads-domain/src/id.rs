//! Newtype wrappers for domain identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Largest chat id representable in 13 hex digits (52 significant bits).
///
/// Telegram guarantees user/chat ids fit in 52 bits, which keeps the hex form
/// short enough for the fixed-width auth-token suffix.
pub const MAX_CHAT_ID: u64 = (1 << 52) - 1;

/// Width of a zero-padded [`UserId`] inside an auth token.
pub const USER_ID_PAD: usize = 13;

/// Identifies a user account.
///
/// Derived deterministically from the Telegram chat id: lowercase hex without
/// leading zeros, so chat `291` becomes user `"123"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserIdError {
    #[error("user id must be 1-13 lowercase hex digits")]
    Malformed,
}

impl UserId {
    /// Returns `None` for chat ids that are zero, negative or wider than 52 bits
    /// (group chats and channels use negative ids).
    pub fn from_chat_id(chat_id: i64) -> Option<Self> {
        let id = u64::try_from(chat_id).ok()?;
        if id == 0 || id > MAX_CHAT_ID {
            return None;
        }
        Some(Self(format!("{id:x}")))
    }

    /// Recover the chat id used to message this user.
    pub fn chat_id(&self) -> i64 {
        // Construction guarantees at most 13 hex digits, so this never overflows.
        i64::from_str_radix(&self.0, 16).unwrap_or_default()
    }

    /// Zero-padded form embedded at the end of auth tokens.
    pub fn padded(&self) -> String {
        format!("{:0>width$}", self.0, width = USER_ID_PAD)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for UserId {
    type Err = UserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = !s.is_empty()
            && s.len() <= USER_ID_PAD
            && !s.starts_with('0')
            && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if valid {
            Ok(Self(s.to_owned()))
        } else {
            Err(UserIdError::Malformed)
        }
    }
}

/// Identifies a login session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Uuid> for SessionId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use threads_domain::id::{SessionId, UserId};

use crate::domain::types::{AuthToken, OutgoingMessage, Session, SessionWithUser, User};
use crate::error::AuthServiceError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    /// Create the user unless one with this id already exists. Existing rows are untouched.
    async fn insert_ignore(&self, id: &UserId, name: &str) -> Result<(), AuthServiceError>;

    /// Create the user, or overwrite the display name of an existing one.
    async fn upsert_name(&self, id: &UserId, name: &str) -> Result<(), AuthServiceError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthServiceError>;
}

/// Repository for one-time auth tokens, keyed by user.
pub trait AuthTokenRepository: Send + Sync {
    /// Store `token` as the user's only token, replacing any previous one.
    async fn upsert(&self, token: &AuthToken) -> Result<(), AuthServiceError>;

    /// Atomically look up an unexpired token and delete it.
    ///
    /// Returns the owning user only to the caller whose delete removed the row,
    /// so two concurrent redemptions of the same token cannot both succeed.
    async fn consume(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, AuthServiceError>;

    /// Delete the token if it still exists. Returns `true` if a row was removed.
    async fn delete_by_token(&self, token: &str) -> Result<bool, AuthServiceError>;
}

/// Repository for login sessions.
pub trait SessionRepository: Send + Sync {
    async fn insert(&self, session: &Session) -> Result<(), AuthServiceError>;

    async fn find_with_user(
        &self,
        id: SessionId,
    ) -> Result<Option<SessionWithUser>, AuthServiceError>;

    /// Refresh `last_active` and the device description. Missing sessions are ignored.
    async fn touch(
        &self,
        id: SessionId,
        device: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AuthServiceError>;

    /// Returns `true` if the session existed.
    async fn delete(&self, id: SessionId) -> Result<bool, AuthServiceError>;

    /// Delete a session only if it belongs to `user_id`. Returns `true` if deleted.
    async fn delete_for_user(
        &self,
        id: SessionId,
        user_id: &UserId,
    ) -> Result<bool, AuthServiceError>;

    /// Returns the number of sessions removed.
    async fn delete_all_for_user(&self, user_id: &UserId) -> Result<u64, AuthServiceError>;

    /// Most recently active first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Session>, AuthServiceError>;
}

/// Outbound chat messages (Telegram Bot API in production).
pub trait MessagingGateway: Send + Sync {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), AuthServiceError>;
}

use chrono::Utc;

use threads_domain::id::UserId;

use crate::domain::repository::AuthTokenRepository;
use crate::domain::types::{AuthToken, User};
use crate::error::AuthServiceError;

/// Issues, redeems and revokes one-time login tokens.
pub struct TokenLifecycle<T>
where
    T: AuthTokenRepository,
{
    pub tokens: T,
}

impl<T> TokenLifecycle<T>
where
    T: AuthTokenRepository,
{
    /// Replace the user's outstanding token with a fresh one valid for ten minutes.
    pub async fn issue(&self, user_id: &UserId) -> Result<AuthToken, AuthServiceError> {
        let token = AuthToken::issue(user_id, Utc::now());
        self.tokens.upsert(&token).await?;
        Ok(token)
    }

    /// Exchange a token for its owner. Each token succeeds at most once.
    ///
    /// Callers must check the token format first; this always hits the store.
    pub async fn redeem(&self, token: &str) -> Result<Option<User>, AuthServiceError> {
        self.tokens.consume(token, Utc::now()).await
    }

    /// Idempotent: revoking an unknown or already-consumed token succeeds.
    pub async fn revoke(&self, token: &str) -> Result<(), AuthServiceError> {
        self.tokens.delete_by_token(token).await?;
        Ok(())
    }
}

use chrono::Utc;

use threads_auth_types::cookie::SessionCookies;
use threads_domain::id::{SessionId, UserId};

use crate::domain::repository::SessionRepository;
use crate::domain::types::{Session, SessionWithUser};
use crate::error::AuthServiceError;

/// Creates, resolves and ends login sessions.
pub struct SessionManager<S>
where
    S: SessionRepository,
{
    pub sessions: S,
}

impl<S> SessionManager<S>
where
    S: SessionRepository,
{
    pub async fn create(&self, user_id: &UserId, device: &str) -> Result<Session, AuthServiceError> {
        let session = Session::start(user_id, device, Utc::now());
        self.sessions.insert(&session).await?;
        Ok(session)
    }

    /// Resolve the session named by the request cookies.
    ///
    /// Without both cookies the store is not consulted. A stored session only
    /// counts when its secret matches the cookie in constant time.
    pub async fn current(
        &self,
        cookies: Option<&SessionCookies>,
    ) -> Result<Option<SessionWithUser>, AuthServiceError> {
        let Some(cookies) = cookies else {
            return Ok(None);
        };
        let found = self.sessions.find_with_user(cookies.id).await?;
        Ok(found.filter(|s| s.session.token_matches(&cookies.token)))
    }

    pub async fn touch(&self, id: SessionId, device: &str) -> Result<(), AuthServiceError> {
        self.sessions.touch(id, device, Utc::now()).await
    }

    /// Returns `true` if the session existed.
    pub async fn destroy(&self, id: SessionId) -> Result<bool, AuthServiceError> {
        self.sessions.delete(id).await
    }

    /// End one of `user_id`'s sessions. Sessions of other users are reported as missing.
    pub async fn destroy_owned(
        &self,
        id: SessionId,
        user_id: &UserId,
    ) -> Result<(), AuthServiceError> {
        if self.sessions.delete_for_user(id, user_id).await? {
            Ok(())
        } else {
            Err(AuthServiceError::SessionNotFound)
        }
    }

    pub async fn destroy_all(&self, user_id: &UserId) -> Result<u64, AuthServiceError> {
        self.sessions.delete_all_for_user(user_id).await
    }

    pub async fn list(&self, user_id: &UserId) -> Result<Vec<Session>, AuthServiceError> {
        self.sessions.list_for_user(user_id).await
    }
}

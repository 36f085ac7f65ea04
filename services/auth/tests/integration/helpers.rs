use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use threads_auth::domain::repository::{
    AuthTokenRepository, MessagingGateway, SessionRepository, UserRepository,
};
use threads_auth::domain::types::{
    AuthToken, LoginContext, OutgoingMessage, Session, SessionWithUser, User,
};
use threads_auth::error::AuthServiceError;
use threads_auth::usecase::session::SessionManager;
use threads_auth::usecase::token::TokenLifecycle;
use threads_domain::id::{SessionId, UserId};

// ── MockStore ────────────────────────────────────────────────────────────────

/// Shared in-memory tables backing every mock repository.
#[derive(Clone, Default)]
pub struct MockStore {
    pub users: Arc<Mutex<Vec<User>>>,
    pub tokens: Arc<Mutex<Vec<AuthToken>>>,
    pub sessions: Arc<Mutex<Vec<Session>>>,
    calls: Arc<AtomicUsize>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user derived from `chat_id` and return it.
    pub fn with_user(&self, chat_id: i64, name: &str) -> User {
        let user = User {
            id: UserId::from_chat_id(chat_id).unwrap(),
            name: name.to_owned(),
            created_at: Utc::now(),
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }

    /// Number of repository calls made through any mock.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn user_repo(&self) -> MockUserRepo {
        MockUserRepo {
            store: self.clone(),
        }
    }

    pub fn token_repo(&self) -> MockTokenRepo {
        MockTokenRepo {
            store: self.clone(),
        }
    }

    pub fn session_repo(&self) -> MockSessionRepo {
        MockSessionRepo {
            store: self.clone(),
        }
    }

    pub fn token_lifecycle(&self) -> TokenLifecycle<MockTokenRepo> {
        TokenLifecycle {
            tokens: self.token_repo(),
        }
    }

    pub fn session_manager(&self) -> SessionManager<MockSessionRepo> {
        SessionManager {
            sessions: self.session_repo(),
        }
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn user(&self, id: &UserId) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| &u.id == id).cloned()
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

pub struct MockUserRepo {
    store: MockStore,
}

impl UserRepository for MockUserRepo {
    async fn insert_ignore(&self, id: &UserId, name: &str) -> Result<(), AuthServiceError> {
        self.store.hit();
        let mut users = self.store.users.lock().unwrap();
        if !users.iter().any(|u| &u.id == id) {
            users.push(User {
                id: id.clone(),
                name: name.to_owned(),
                created_at: Utc::now(),
            });
        }
        Ok(())
    }

    async fn upsert_name(&self, id: &UserId, name: &str) -> Result<(), AuthServiceError> {
        self.store.hit();
        let mut users = self.store.users.lock().unwrap();
        match users.iter_mut().find(|u| &u.id == id) {
            Some(user) => user.name = name.to_owned(),
            None => users.push(User {
                id: id.clone(),
                name: name.to_owned(),
                created_at: Utc::now(),
            }),
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthServiceError> {
        self.store.hit();
        Ok(self.store.user(id))
    }
}

// ── MockTokenRepo ────────────────────────────────────────────────────────────

pub struct MockTokenRepo {
    store: MockStore,
}

impl AuthTokenRepository for MockTokenRepo {
    async fn upsert(&self, token: &AuthToken) -> Result<(), AuthServiceError> {
        self.store.hit();
        let mut tokens = self.store.tokens.lock().unwrap();
        tokens.retain(|t| t.user_id != token.user_id);
        tokens.push(token.clone());
        Ok(())
    }

    async fn consume(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, AuthServiceError> {
        self.store.hit();
        let mut tokens = self.store.tokens.lock().unwrap();
        let Some(pos) = tokens
            .iter()
            .position(|t| t.token == token && t.is_valid_at(now))
        else {
            return Ok(None);
        };
        let consumed = tokens.remove(pos);
        drop(tokens);
        Ok(self.store.user(&consumed.user_id))
    }

    async fn delete_by_token(&self, token: &str) -> Result<bool, AuthServiceError> {
        self.store.hit();
        let mut tokens = self.store.tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|t| t.token != token);
        Ok(tokens.len() != before)
    }
}

// ── MockSessionRepo ──────────────────────────────────────────────────────────

pub struct MockSessionRepo {
    store: MockStore,
}

impl SessionRepository for MockSessionRepo {
    async fn insert(&self, session: &Session) -> Result<(), AuthServiceError> {
        self.store.hit();
        self.store.sessions.lock().unwrap().push(session.clone());
        Ok(())
    }

    async fn find_with_user(
        &self,
        id: SessionId,
    ) -> Result<Option<SessionWithUser>, AuthServiceError> {
        self.store.hit();
        let session = self
            .store
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned();
        Ok(session.and_then(|session| {
            let user = self.store.user(&session.user_id)?;
            Some(SessionWithUser { session, user })
        }))
    }

    async fn touch(
        &self,
        id: SessionId,
        device: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AuthServiceError> {
        self.store.hit();
        if let Some(s) = self
            .store
            .sessions
            .lock()
            .unwrap()
            .iter_mut()
            .find(|s| s.id == id)
        {
            s.last_active = now;
            s.device = device.to_owned();
        }
        Ok(())
    }

    async fn delete(&self, id: SessionId) -> Result<bool, AuthServiceError> {
        self.store.hit();
        let mut sessions = self.store.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        Ok(sessions.len() != before)
    }

    async fn delete_for_user(
        &self,
        id: SessionId,
        user_id: &UserId,
    ) -> Result<bool, AuthServiceError> {
        self.store.hit();
        let mut sessions = self.store.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| !(s.id == id && &s.user_id == user_id));
        Ok(sessions.len() != before)
    }

    async fn delete_all_for_user(&self, user_id: &UserId) -> Result<u64, AuthServiceError> {
        self.store.hit();
        let mut sessions = self.store.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| &s.user_id != user_id);
        Ok((before - sessions.len()) as u64)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Session>, AuthServiceError> {
        self.store.hit();
        let mut sessions: Vec<Session> = self
            .store
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| &s.user_id == user_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.last_active.cmp(&a.last_active));
        Ok(sessions)
    }
}

// ── MockGateway ──────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockGateway {
    pub sent: Arc<Mutex<Vec<OutgoingMessage>>>,
    pub failing: bool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Returns a shared handle to sent messages for post-execution inspection.
    pub fn sent_handle(&self) -> Arc<Mutex<Vec<OutgoingMessage>>> {
        Arc::clone(&self.sent)
    }
}

impl MessagingGateway for MockGateway {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), AuthServiceError> {
        if self.failing {
            return Err(AuthServiceError::Delivery("mock failure".to_owned()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub fn test_context() -> LoginContext {
    LoginContext {
        device: "Apple iPhone · iOS 17.5 · Safari 17.5".to_owned(),
        ip: Some("203.0.113.7".to_owned()),
        city: Some("Berlin".to_owned()),
        region: Some("BE".to_owned()),
        country: Some("DE".to_owned()),
    }
}

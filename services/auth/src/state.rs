use sea_orm::DatabaseConnection;

use threads_core::deferred::Deferred;

use crate::infra::db::{DbAuthTokenRepository, DbSessionRepository, DbUserRepository};
use crate::infra::telegram::TelegramGateway;
use crate::usecase::session::SessionManager;
use crate::usecase::token::TokenLifecycle;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub telegram: TelegramGateway,
    pub deferred: Deferred,
    pub bot_secret: String,
    /// Site root without trailing slash.
    pub website_url: String,
    pub cookie_secure: bool,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn token_repo(&self) -> DbAuthTokenRepository {
        DbAuthTokenRepository {
            db: self.db.clone(),
        }
    }

    pub fn session_repo(&self) -> DbSessionRepository {
        DbSessionRepository {
            db: self.db.clone(),
        }
    }

    pub fn token_lifecycle(&self) -> TokenLifecycle<DbAuthTokenRepository> {
        TokenLifecycle {
            tokens: self.token_repo(),
        }
    }

    pub fn session_manager(&self) -> SessionManager<DbSessionRepository> {
        SessionManager {
            sessions: self.session_repo(),
        }
    }
}

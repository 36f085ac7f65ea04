//! Concurrent redemption of one token against a pooled, file-backed SQLite database.

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tempfile::TempDir;

use threads_auth::domain::repository::{AuthTokenRepository, SessionRepository, UserRepository};
use threads_auth::error::AuthServiceError;
use threads_auth::infra::db::{DbAuthTokenRepository, DbSessionRepository, DbUserRepository};
use threads_auth::usecase::session::SessionManager;
use threads_auth::usecase::sign_in::{SignInInput, SignInUseCase};
use threads_auth::usecase::token::TokenLifecycle;
use threads_auth_migration::{Migrator, MigratorTrait};
use threads_domain::id::UserId;

use crate::helpers::test_context;

const ROUNDS: usize = 8;

/// Several connections so both redemptions really run on separate handles.
async fn pooled_db(dir: &TempDir) -> DatabaseConnection {
    let path = dir.path().join("threads.db");
    let mut opts = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path.display()));
    opts.max_connections(4).min_connections(2).sqlx_logging(false);
    let db = Database::connect(opts).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

async fn seeded_user(db: &DatabaseConnection) -> UserId {
    let user_id = UserId::from_chat_id(291).unwrap();
    DbUserRepository { db: db.clone() }
        .insert_ignore(&user_id, "Ada")
        .await
        .unwrap();
    user_id
}

fn lifecycle(db: &DatabaseConnection) -> TokenLifecycle<DbAuthTokenRepository> {
    TokenLifecycle {
        tokens: DbAuthTokenRepository { db: db.clone() },
    }
}

fn sign_in(db: &DatabaseConnection) -> SignInUseCase<DbAuthTokenRepository, DbSessionRepository> {
    SignInUseCase {
        tokens: lifecycle(db),
        sessions: SessionManager {
            sessions: DbSessionRepository { db: db.clone() },
        },
    }
}

/// A losing racer either sees no token or is refused by the database lock.
fn lost<T>(result: &Result<Option<T>, AuthServiceError>) -> bool {
    matches!(result, Ok(None) | Err(AuthServiceError::Internal(_)))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn should_let_only_one_concurrent_redemption_win() {
    let dir = TempDir::new().unwrap();
    let db = pooled_db(&dir).await;
    let user_id = seeded_user(&db).await;
    let first = lifecycle(&db);
    let second = lifecycle(&db);

    for _ in 0..ROUNDS {
        let token = first.issue(&user_id).await.unwrap().token;

        let (a, b) = tokio::join!(first.redeem(&token), second.redeem(&token));

        let winners = [&a, &b]
            .into_iter()
            .filter(|r| matches!(r, Ok(Some(user)) if user.id == user_id))
            .count();
        assert_eq!(winners, 1, "results: {a:?} / {b:?}");
        assert!(lost(&a) || lost(&b));
        assert_eq!(first.redeem(&token).await.unwrap(), None);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn should_open_one_session_when_sign_ins_race() {
    let dir = TempDir::new().unwrap();
    let db = pooled_db(&dir).await;
    let user_id = seeded_user(&db).await;
    let first = sign_in(&db);
    let second = sign_in(&db);

    for round in 1..=ROUNDS {
        let token = first.tokens.issue(&user_id).await.unwrap().token;
        let input = || SignInInput {
            token: token.clone(),
            context: test_context(),
        };

        let (a, b) = tokio::join!(first.execute(input()), second.execute(input()));

        let outcomes = [a.is_ok(), b.is_ok()];
        assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
        for err in [a.err(), b.err()].into_iter().flatten() {
            assert!(matches!(
                err,
                AuthServiceError::InvalidOrExpiredToken | AuthServiceError::Internal(_)
            ));
        }

        let sessions = DbSessionRepository { db: db.clone() }
            .list_for_user(&user_id)
            .await
            .unwrap();
        assert_eq!(sessions.len(), round);
    }
}

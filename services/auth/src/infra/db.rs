use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
    sea_query::{Expr, OnConflict},
};

use threads_auth_schema::{sessions, tokens, users};
use threads_domain::id::{SessionId, UserId};

use crate::domain::repository::{AuthTokenRepository, SessionRepository, UserRepository};
use crate::domain::types::{AuthToken, Session, SessionWithUser, User};
use crate::error::AuthServiceError;

// ── User repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn insert_ignore(&self, id: &UserId, name: &str) -> Result<(), AuthServiceError> {
        users::Entity::insert(new_user(id, name))
            .on_conflict(OnConflict::column(users::Column::Id).do_nothing().to_owned())
            .exec_without_returning(&self.db)
            .await
            .context("insert user if absent")?;
        Ok(())
    }

    async fn upsert_name(&self, id: &UserId, name: &str) -> Result<(), AuthServiceError> {
        users::Entity::insert(new_user(id, name))
            .on_conflict(
                OnConflict::column(users::Column::Id)
                    .update_column(users::Column::Name)
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("upsert user name")?;
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find_by_id(id.as_str())
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model).transpose()?)
    }
}

fn new_user(id: &UserId, name: &str) -> users::ActiveModel {
    users::ActiveModel {
        id: Set(id.as_str().to_owned()),
        name: Set(name.to_owned()),
        created_at: Set(Utc::now()),
    }
}

fn user_from_model(model: users::Model) -> anyhow::Result<User> {
    Ok(User {
        id: model.id.parse().context("stored user id is malformed")?,
        name: model.name,
        created_at: model.created_at,
    })
}

// ── Auth token repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAuthTokenRepository {
    pub db: DatabaseConnection,
}

impl AuthTokenRepository for DbAuthTokenRepository {
    async fn upsert(&self, token: &AuthToken) -> Result<(), AuthServiceError> {
        let model = tokens::ActiveModel {
            id: Set(token.user_id.as_str().to_owned()),
            token: Set(token.token.clone()),
            expires_at: Set(token.expires_at),
        };
        tokens::Entity::insert(model)
            .on_conflict(
                OnConflict::column(tokens::Column::Id)
                    .update_columns([tokens::Column::Token, tokens::Column::ExpiresAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("upsert auth token")?;
        Ok(())
    }

    async fn consume(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, AuthServiceError> {
        let token = token.to_owned();
        let user = self
            .db
            .transaction::<_, Option<users::Model>, sea_orm::DbErr>(move |txn| {
                Box::pin(async move {
                    let found = tokens::Entity::find()
                        .filter(tokens::Column::Token.eq(token.as_str()))
                        .filter(tokens::Column::ExpiresAt.gt(now))
                        .find_also_related(users::Entity)
                        .one(txn)
                        .await?;
                    let Some((row, Some(user))) = found else {
                        return Ok(None);
                    };
                    // The token predicate guards against a reissue racing this redemption.
                    let deleted = tokens::Entity::delete_many()
                        .filter(tokens::Column::Id.eq(row.id))
                        .filter(tokens::Column::Token.eq(token.as_str()))
                        .exec(txn)
                        .await?;
                    Ok((deleted.rows_affected == 1).then_some(user))
                })
            })
            .await
            .context("consume auth token")?;
        Ok(user.map(user_from_model).transpose()?)
    }

    async fn delete_by_token(&self, token: &str) -> Result<bool, AuthServiceError> {
        let result = tokens::Entity::delete_many()
            .filter(tokens::Column::Token.eq(token))
            .exec(&self.db)
            .await
            .context("delete auth token")?;
        Ok(result.rows_affected > 0)
    }
}

// ── Session repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSessionRepository {
    pub db: DatabaseConnection,
}

impl SessionRepository for DbSessionRepository {
    async fn insert(&self, session: &Session) -> Result<(), AuthServiceError> {
        sessions::ActiveModel {
            id: Set(session.id.0),
            user_id: Set(session.user_id.as_str().to_owned()),
            token: Set(session.token.clone()),
            device: Set(session.device.clone()),
            last_active: Set(session.last_active),
            created_at: Set(session.created_at),
        }
        .insert(&self.db)
        .await
        .context("insert session")?;
        Ok(())
    }

    async fn find_with_user(
        &self,
        id: SessionId,
    ) -> Result<Option<SessionWithUser>, AuthServiceError> {
        let found = sessions::Entity::find_by_id(id.0)
            .find_also_related(users::Entity)
            .one(&self.db)
            .await
            .context("find session with user")?;
        let Some((session, Some(user))) = found else {
            return Ok(None);
        };
        Ok(Some(SessionWithUser {
            session: session_from_model(session)?,
            user: user_from_model(user)?,
        }))
    }

    async fn touch(
        &self,
        id: SessionId,
        device: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AuthServiceError> {
        sessions::Entity::update_many()
            .col_expr(sessions::Column::LastActive, Expr::value(now))
            .col_expr(sessions::Column::Device, Expr::value(device))
            .filter(sessions::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .context("touch session")?;
        Ok(())
    }

    async fn delete(&self, id: SessionId) -> Result<bool, AuthServiceError> {
        let result = sessions::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete session")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_for_user(
        &self,
        id: SessionId,
        user_id: &UserId,
    ) -> Result<bool, AuthServiceError> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::Id.eq(id.0))
            .filter(sessions::Column::UserId.eq(user_id.as_str()))
            .exec(&self.db)
            .await
            .context("delete session for user")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_all_for_user(&self, user_id: &UserId) -> Result<u64, AuthServiceError> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::UserId.eq(user_id.as_str()))
            .exec(&self.db)
            .await
            .context("delete all sessions for user")?;
        Ok(result.rows_affected)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Session>, AuthServiceError> {
        let models = sessions::Entity::find()
            .filter(sessions::Column::UserId.eq(user_id.as_str()))
            .order_by_desc(sessions::Column::LastActive)
            .all(&self.db)
            .await
            .context("list sessions by user")?;
        let sessions = models
            .into_iter()
            .map(session_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(sessions)
    }
}

fn session_from_model(model: sessions::Model) -> anyhow::Result<Session> {
    Ok(Session {
        id: SessionId(model.id),
        user_id: model.user_id.parse().context("stored session user id is malformed")?,
        token: model.token,
        device: model.device,
        last_active: model.last_active,
        created_at: model.created_at,
    })
}

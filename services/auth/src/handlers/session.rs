use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
};
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Utc};
use serde::Serialize;

use threads_auth_types::cookie::clear_session_cookies;
use threads_domain::id::{SessionId, UserId};

use crate::domain::types::{Session, SessionWithUser};
use crate::error::AuthServiceError;
use crate::handlers::extract::{MaybeSession, RequireSession};
use crate::state::AppState;

#[derive(Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub id: SessionId,
    pub device: String,
    pub last_active: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub current: bool,
}

impl SessionResponse {
    fn from_session(session: Session, current: SessionId) -> Self {
        Self {
            current: session.id == current,
            id: session.id,
            device: session.device,
            last_active: session.last_active,
            created_at: session.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct CurrentSessionResponse {
    pub user: UserResponse,
    pub session: SessionResponse,
}

impl From<SessionWithUser> for CurrentSessionResponse {
    fn from(current: SessionWithUser) -> Self {
        let id = current.session.id;
        Self {
            user: UserResponse {
                id: current.user.id,
                name: current.user.name,
                created_at: current.user.created_at,
            },
            session: SessionResponse::from_session(current.session, id),
        }
    }
}

// ── GET /auth/session ─────────────────────────────────────────────────────────

pub async fn current_session(
    session: MaybeSession,
) -> Result<Json<CurrentSessionResponse>, AuthServiceError> {
    Ok(Json(session.require()?.into()))
}

// ── GET /auth/sessions ────────────────────────────────────────────────────────

pub async fn list_sessions(
    State(state): State<AppState>,
    session: MaybeSession,
) -> Result<Json<Vec<SessionResponse>>, AuthServiceError> {
    let current = session.require()?;
    let sessions = state.session_manager().list(&current.user.id).await?;
    let body = sessions
        .into_iter()
        .map(|s| SessionResponse::from_session(s, current.session.id))
        .collect();
    Ok(Json(body))
}

// ── DELETE /auth/sessions/{session_id} ────────────────────────────────────────

pub async fn delete_session(
    State(state): State<AppState>,
    session: MaybeSession,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AuthServiceError> {
    let current = session.require()?;
    let id = session_id
        .parse::<SessionId>()
        .map_err(|_| AuthServiceError::SessionNotFound)?;
    state
        .session_manager()
        .destroy_owned(id, &current.user.id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /auth/sessions ─────────────────────────────────────────────────────

pub async fn delete_all_sessions(
    State(state): State<AppState>,
    session: MaybeSession,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar), AuthServiceError> {
    let current = session.require()?;
    let removed = state.session_manager().destroy_all(&current.user.id).await?;
    tracing::info!(user_id = %current.user.id, removed, "ended all sessions");
    Ok((
        StatusCode::NO_CONTENT,
        clear_session_cookies(jar, state.cookie_secure),
    ))
}

// ── GET /home, GET /profile ───────────────────────────────────────────────────

/// Landing page after login. Renders the signed-in identity as JSON.
pub async fn home(RequireSession(current): RequireSession) -> Json<CurrentSessionResponse> {
    Json(current.into())
}

pub async fn profile(RequireSession(current): RequireSession) -> Redirect {
    Redirect::to(&format!("/user/{}", current.user.id))
}

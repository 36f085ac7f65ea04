//! Session extractors for protected routes.

use std::future::Future;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use threads_auth_types::cookie::SessionCookies;

use crate::domain::device::describe_device;
use crate::domain::types::SessionWithUser;
use crate::error::AuthServiceError;
use crate::handlers::context::user_agent;
use crate::state::AppState;

/// The authenticated session, if the request carries a valid cookie pair.
///
/// A successful lookup schedules a deferred `last_active` refresh.
pub struct MaybeSession(pub Option<SessionWithUser>);

impl MaybeSession {
    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }

    pub fn require(self) -> Result<SessionWithUser, AuthServiceError> {
        self.0.ok_or(AuthServiceError::Unauthenticated)
    }
}

impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = AuthServiceError;

    // Extract synchronously and return a 'static future so it does not borrow `parts`.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let cookies = SessionCookies::from_jar(&CookieJar::from_headers(&parts.headers));
        let device = describe_device(user_agent(&parts.headers));
        let state = state.clone();

        async move {
            let sessions = state.session_manager();
            let current = sessions.current(cookies.as_ref()).await?;
            if let Some(current) = &current {
                let id = current.session.id;
                state.deferred.spawn("touch_session", async move {
                    sessions.touch(id, &device).await
                });
            }
            Ok(Self(current))
        }
    }
}

/// Like [`MaybeSession`], but redirects to the login page when unauthenticated.
///
/// The original path and query are carried in `to` so login can return there.
pub struct RequireSession(pub SessionWithUser);

impl FromRequestParts<AppState> for RequireSession {
    type Rejection = Response;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let target = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_owned())
            .unwrap_or_else(|| "/".to_owned());
        let maybe = MaybeSession::from_request_parts(parts, state);

        async move {
            match maybe.await.map_err(IntoResponse::into_response)? {
                MaybeSession(Some(current)) => Ok(Self(current)),
                MaybeSession(None) => Err(login_redirect(&target).into_response()),
            }
        }
    }
}

pub fn login_redirect(target: &str) -> Redirect {
    Redirect::to(&format!("/login?to={}", urlencoding::encode(target)))
}

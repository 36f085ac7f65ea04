use axum::{
    Form,
    extract::{Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use threads_auth_types::{
    cookie::{SessionCookies, clear_session_cookies, set_session_cookies},
    token::validate_auth_token,
};

use crate::domain::repository::MessagingGateway;
use crate::error::AuthServiceError;
use crate::handlers::context::login_context;
use crate::handlers::extract::MaybeSession;
use crate::state::AppState;
use crate::usecase::sign_in::{SignInInput, SignInUseCase, SignOutUseCase};

const DEFAULT_LANDING: &str = "/home";

/// Only same-site absolute paths are honoured; anything else lands on `/home`.
///
/// Browsers strip tab, CR and LF while parsing a URL, so `/\t/host` would
/// become `//host`. Control characters are rejected outright.
pub fn safe_redirect_target(to: Option<&str>) -> &str {
    match to {
        Some(path) if is_same_site_path(path) => path,
        _ => DEFAULT_LANDING,
    }
}

fn is_same_site_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && !path.chars().any(|c| c.is_ascii_control())
}

// ── GET /login ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginQuery {
    pub token: Option<String>,
    pub to: Option<String>,
}

pub async fn login_page(
    session: MaybeSession,
    Query(query): Query<LoginQuery>,
) -> Response {
    let to = safe_redirect_target(query.to.as_deref());
    if session.is_authenticated() {
        return Redirect::to(to).into_response();
    }
    // Prefill only well-formed tokens so arbitrary query text never reaches the page.
    let token = query
        .token
        .as_deref()
        .and_then(|t| validate_auth_token(t).ok())
        .unwrap_or_default();
    Html(render_login_page(token, to)).into_response()
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn render_login_page(token: &str, to: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Log in to Threads</title></head>
<body>
<form method="post" action="/login">
<label for="token">Login token</label>
<input id="token" name="token" value="{token}" maxlength="45" autocomplete="off" required>
<input type="hidden" name="to" value="{to}">
<button type="submit">Log in</button>
</form>
<p>Send /auth to the Threads Telegram bot to get a token.</p>
</body>
</html>
"#,
        token = escape_attr(token),
        to = escape_attr(to),
    )
}

// ── POST /login ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub token: String,
    pub to: Option<String>,
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), AuthServiceError> {
    let usecase = SignInUseCase {
        tokens: state.token_lifecycle(),
        sessions: state.session_manager(),
    };
    let output = usecase
        .execute(SignInInput {
            token: form.token.clone(),
            context: login_context(&headers),
        })
        .await?;

    tracing::info!(
        user_id = %output.user.id,
        session_id = %output.session.id,
        "signed in"
    );

    let jar = set_session_cookies(
        jar,
        &output.session.id,
        output.session.token,
        state.cookie_secure,
    );

    let gateway = state.telegram.clone();
    let notification = output.notification;
    state.deferred.spawn("login_notification", async move {
        gateway.send(&notification).await
    });

    let tokens = state.token_lifecycle();
    let token = form.token;
    state.deferred.spawn("revoke_token", async move {
        tokens.revoke(&token).await
    });

    Ok((jar, Redirect::to(safe_redirect_target(form.to.as_deref()))))
}

// ── POST /logout ──────────────────────────────────────────────────────────────

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let cookies = SessionCookies::from_jar(&jar);
    let usecase = SignOutUseCase {
        sessions: state.session_manager(),
    };
    // Cookies are cleared even when the store is unavailable.
    match usecase.execute(cookies.as_ref()).await {
        Ok(destroyed) => tracing::info!(destroyed, "signed out"),
        Err(e) => tracing::error!(error = %e, "failed to destroy session on logout"),
    }
    (
        clear_session_cookies(jar, state.cookie_secure),
        Redirect::to("/login"),
    )
}

//! Cookie builders for the session credential pair.
//!
//! A session is carried by two host-only, http-only cookies: the session id
//! and the session bearer secret. Both must be present and match a stored
//! record for a request to be authenticated.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use threads_domain::id::SessionId;

/// Cookie name for the session id.
pub const SESSION_ID: &str = "session_id";

/// Cookie name for the session bearer secret.
pub const SESSION_TOKEN: &str = "session_token";

/// Cookie Max-Age for both session cookies in seconds (30 days).
pub const SESSION_COOKIE_MAX_AGE: i64 = 2_592_000;

fn session_cookie(
    name: &'static str,
    value: String,
    max_age: Duration,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .max_age(max_age)
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

/// Set both session cookies on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use threads_auth_types::cookie::{set_session_cookies, SESSION_ID, SESSION_TOKEN};
/// use threads_domain::id::SessionId;
///
/// let id = SessionId::new();
/// let jar = set_session_cookies(CookieJar::new(), &id, "secret".to_string(), true);
/// let cookie = jar.get(SESSION_TOKEN).unwrap();
/// assert_eq!(cookie.value(), "secret");
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(2_592_000)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// assert_eq!(jar.get(SESSION_ID).unwrap().value(), id.to_string());
/// ```
pub fn set_session_cookies(
    jar: CookieJar,
    id: &SessionId,
    token: String,
    secure: bool,
) -> CookieJar {
    let max_age = Duration::seconds(SESSION_COOKIE_MAX_AGE);
    jar.add(session_cookie(SESSION_ID, id.to_string(), max_age, secure))
        .add(session_cookie(SESSION_TOKEN, token, max_age, secure))
}

/// Clear both session cookies by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use threads_auth_types::cookie::{clear_session_cookies, SESSION_ID, SESSION_TOKEN};
///
/// let jar = clear_session_cookies(CookieJar::new(), true);
/// assert_eq!(jar.get(SESSION_ID).unwrap().max_age(), Some(time::Duration::ZERO));
/// assert_eq!(jar.get(SESSION_TOKEN).unwrap().max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_session_cookies(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(session_cookie(SESSION_ID, String::new(), Duration::ZERO, secure))
        .add(session_cookie(SESSION_TOKEN, String::new(), Duration::ZERO, secure))
}

/// The credential pair read back from a request's cookies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookies {
    pub id: SessionId,
    pub token: String,
}

impl SessionCookies {
    /// Returns `None` when either cookie is missing, empty, or the id is not a UUID.
    pub fn from_jar(jar: &CookieJar) -> Option<Self> {
        let id = jar.get(SESSION_ID)?.value().parse::<SessionId>().ok()?;
        let token = jar.get(SESSION_TOKEN)?.value();
        if token.is_empty() {
            return None;
        }
        Some(Self {
            id,
            token: token.to_owned(),
        })
    }
}

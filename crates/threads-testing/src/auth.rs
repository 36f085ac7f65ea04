//! Session cookie helpers for integration tests.

use http::{HeaderName, HeaderValue, header::COOKIE};

use threads_auth_types::cookie::{SESSION_ID, SESSION_TOKEN};

/// A `Cookie` request header carrying the session credential pair.
pub fn session_cookie_header(session_id: &str, session_token: &str) -> (HeaderName, HeaderValue) {
    let value = format!("{SESSION_ID}={session_id}; {SESSION_TOKEN}={session_token}");
    (COOKIE, HeaderValue::from_str(&value).unwrap())
}

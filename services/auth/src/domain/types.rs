use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use threads_auth_types::token::{generate_auth_token, generate_session_token, secrets_match};
use threads_domain::id::{SessionId, UserId};

/// Auth token time-to-live in seconds.
pub const AUTH_TOKEN_TTL_SECS: i64 = 600;

/// A registered account, created the first time a chat asks for a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// One-time login token. At most one exists per user.
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub user_id: UserId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthToken {
    pub fn issue(user_id: &UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.clone(),
            token: generate_auth_token(user_id),
            expires_at: now + Duration::seconds(AUTH_TOKEN_TTL_SECS),
        }
    }

    /// A token is redeemable strictly before its expiry instant.
    ///
    /// The database repository enforces the same rule as an `expires_at > now`
    /// filter inside `consume`; that filter is what redemption relies on.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// A logged-in device.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub token: String,
    pub device: String,
    pub last_active: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn start(user_id: &UserId, device: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::new(),
            user_id: user_id.clone(),
            token: generate_session_token(),
            device: device.to_owned(),
            last_active: now,
            created_at: now,
        }
    }

    pub fn token_matches(&self, provided: &str) -> bool {
        secrets_match(&self.token, provided)
    }
}

#[derive(Debug, Clone)]
pub struct SessionWithUser {
    pub session: Session,
    pub user: User,
}

/// Request metadata captured once at sign-in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginContext {
    pub device: String,
    pub ip: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

impl LoginContext {
    /// "City, Region, CC 🇨🇨", or "Unknown 🌎" when no geo headers were present.
    pub fn location(&self) -> String {
        let parts: Vec<&str> = [&self.city, &self.region, &self.country]
            .into_iter()
            .filter_map(|p| p.as_deref().filter(|s| !s.is_empty()))
            .collect();
        let place = if parts.is_empty() {
            "Unknown".to_owned()
        } else {
            parts.join(", ")
        };
        format!("{place} {}", country_flag(self.country.as_deref()))
    }
}

/// Regional-indicator flag for a two-letter country code, 🌎 otherwise.
pub fn country_flag(country: Option<&str>) -> String {
    match country {
        Some(cc) if cc.len() == 2 && cc.bytes().all(|b| b.is_ascii_alphabetic()) => cc
            .to_ascii_uppercase()
            .chars()
            .filter_map(|c| char::from_u32(c as u32 + 127_397))
            .collect(),
        _ => "🌎".to_owned(),
    }
}

/// Button rendered under a bot message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub text: String,
    pub url: String,
}

/// An HTML-formatted Telegram message waiting to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub chat_id: i64,
    pub text: String,
    pub buttons: Vec<InlineButton>,
}

impl OutgoingMessage {
    pub fn new(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    pub fn with_button(mut self, text: impl Into<String>, url: impl Into<String>) -> Self {
        self.buttons.push(InlineButton {
            text: text.into(),
            url: url.into(),
        });
        self
    }
}

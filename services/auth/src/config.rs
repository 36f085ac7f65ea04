use serde::Deserialize;

use threads_core::config::Config;

/// Auth service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// Telegram Bot API token. Env var: `BOT_TOKEN`.
    pub bot_token: String,
    /// Shared secret Telegram echoes in `X-Telegram-Bot-Api-Secret-Token`.
    /// Env var: `BOT_SECRET`.
    pub bot_secret: String,
    /// Public site URL used in bot login links (e.g. "https://threads.example").
    /// Env var: `WEBSITE_URL`.
    pub website_url: String,
    /// TCP port to listen on (default 3000). Env var: `PORT`.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bot API base URL (default "https://api.telegram.org"). Env var: `TELEGRAM_API_URL`.
    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,
    /// Mark session cookies `Secure` (default true). Env var: `COOKIE_SECURE`.
    #[serde(default = "default_true")]
    pub cookie_secure: bool,
    /// Apply pending migrations at startup (default false). Env var: `RUN_MIGRATIONS`.
    #[serde(default)]
    pub run_migrations: bool,
}

impl Config for AuthConfig {}

fn default_port() -> u16 {
    3000
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_owned()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("BOT_TOKEN must not be empty")]
    EmptyBotToken,
    #[error("BOT_SECRET must be 1-255 characters of A-Z, a-z, 0-9, _ or -")]
    InvalidBotSecret,
    #[error("WEBSITE_URL must start with http:// or https://")]
    InvalidWebsiteUrl,
}

impl AuthConfig {
    /// Check values Telegram or the browser would otherwise reject at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot_token.is_empty() {
            return Err(ConfigError::EmptyBotToken);
        }
        let secret_ok = (1..=255).contains(&self.bot_secret.len())
            && self
                .bot_secret
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if !secret_ok {
            return Err(ConfigError::InvalidBotSecret);
        }
        if !(self.website_url.starts_with("https://") || self.website_url.starts_with("http://")) {
            return Err(ConfigError::InvalidWebsiteUrl);
        }
        Ok(())
    }

    /// Website URL without a trailing slash, ready for path concatenation.
    pub fn website_base(&self) -> String {
        self.website_url.trim_end_matches('/').to_owned()
    }
}

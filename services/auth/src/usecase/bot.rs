use threads_domain::id::UserId;

use crate::domain::format::{bold, code, escape_html};
use crate::domain::repository::{
    AuthTokenRepository, MessagingGateway, SessionRepository, UserRepository,
};
use crate::domain::types::OutgoingMessage;
use crate::error::AuthServiceError;
use crate::usecase::session::SessionManager;
use crate::usecase::token::TokenLifecycle;

/// Commands the bot understands. Matching is exact; anything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Help,
    Auth,
    Sync,
    Quit,
}

impl BotCommand {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "/start" | "/help" => Some(Self::Help),
            // `/start auth` arrives from the t.me/<bot>?start=auth deep link.
            "/auth" | "/start auth" => Some(Self::Auth),
            "/sync" => Some(Self::Sync),
            "/quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

pub struct BotCommandInput {
    pub user_id: UserId,
    /// Display name composed from the chat's first and last name.
    pub name: String,
    pub command: BotCommand,
}

pub struct HandleBotCommandUseCase<U, T, S, G>
where
    U: UserRepository,
    T: AuthTokenRepository,
    S: SessionRepository,
    G: MessagingGateway,
{
    pub users: U,
    pub tokens: TokenLifecycle<T>,
    pub sessions: SessionManager<S>,
    pub gateway: G,
    /// Site root without trailing slash.
    pub website_url: String,
}

impl<U, T, S, G> HandleBotCommandUseCase<U, T, S, G>
where
    U: UserRepository,
    T: AuthTokenRepository,
    S: SessionRepository,
    G: MessagingGateway,
{
    pub async fn execute(&self, input: BotCommandInput) -> Result<(), AuthServiceError> {
        let chat_id = input.user_id.chat_id();
        let reply = match input.command {
            BotCommand::Help => help_message(chat_id),
            BotCommand::Auth => {
                self.users.insert_ignore(&input.user_id, &input.name).await?;
                let token = self.tokens.issue(&input.user_id).await?;
                token_message(chat_id, &token.token, &self.website_url)
            }
            BotCommand::Sync => {
                self.users.upsert_name(&input.user_id, &input.name).await?;
                OutgoingMessage::new(
                    chat_id,
                    "✅ Your profile info has been synced with Threads.",
                )
            }
            BotCommand::Quit => self.quit(&input.user_id).await,
        };
        self.gateway.send(&reply).await
    }

    async fn quit(&self, user_id: &UserId) -> OutgoingMessage {
        let chat_id = user_id.chat_id();
        match self.sessions.destroy_all(user_id).await {
            Ok(0) => OutgoingMessage::new(chat_id, "ℹ️ You have no active sessions."),
            Ok(n) => OutgoingMessage::new(
                chat_id,
                format!("✅ Logged out of {n} session(s) on Threads."),
            ),
            Err(e) => {
                tracing::error!(error = %e, user_id = %user_id, "failed to end sessions");
                OutgoingMessage::new(
                    chat_id,
                    "❌ Could not log you out right now. Please try again later.",
                )
            }
        }
    }
}

pub fn help_message(chat_id: i64) -> OutgoingMessage {
    let text = format!(
        "👋 Welcome to {}!\n\n\
         Available commands:\n\
         /auth - 🔐 Get your login token\n\
         /sync - 🔄 Sync your profile with Threads\n\
         /quit - 🚪 Log out of all devices\n\
         /help - 📄 Show this message\n\n\
         {}",
        bold("Threads"),
        escape_html("Start posting, replying, and connecting, all through Threads."),
    );
    OutgoingMessage::new(chat_id, text)
}

pub fn token_message(chat_id: i64, token: &str, website_url: &str) -> OutgoingMessage {
    let text = format!(
        "🔑 Your one-time login token:\n\n\
         {}\n\n\
         Paste it in the login form, or simply tap the button below.\n\n\
         ⚠️ Token expires in 10 minutes. Do {} share it with anyone.",
        code(token),
        bold("not"),
    );
    OutgoingMessage::new(chat_id, text)
        .with_button("Login to Threads", format!("{website_url}/login?token={token}"))
}

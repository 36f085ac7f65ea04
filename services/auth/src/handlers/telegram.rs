//! `POST /telegram`: Bot API webhook.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;

use threads_auth_types::token::secrets_match;
use threads_domain::{id::UserId, user::display_name};

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::bot::{BotCommand, BotCommandInput, HandleBotCommandUseCase};

pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

#[derive(Debug, Deserialize)]
pub struct Update {
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub text: Option<String>,
    pub chat: Chat,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub first_name: String,
    pub last_name: Option<String>,
}

/// Reduce an update to a bot command, or `None` if it should be ignored.
///
/// Only text messages in private chats with a recognised command qualify.
pub fn command_from_update(update: Update) -> Option<BotCommandInput> {
    let message = update.message?;
    let chat = message.chat;
    if chat.kind != "private" {
        return None;
    }
    let command = BotCommand::parse(message.text.as_deref()?)?;
    Some(BotCommandInput {
        user_id: UserId::from_chat_id(chat.id)?,
        name: display_name(&chat.first_name, chat.last_name.as_deref()),
        command,
    })
}

pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, &'static str), AuthServiceError> {
    let secret = headers
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if secret.is_empty() || !secrets_match(&state.bot_secret, secret) {
        return Err(AuthServiceError::Forbidden);
    }

    // Telegram retries non-2xx responses, so unusable updates are acknowledged.
    let Ok(update) = serde_json::from_slice::<Update>(&body) else {
        tracing::debug!("ignoring unparseable update");
        return Ok((StatusCode::OK, "Ignored"));
    };
    let Some(input) = command_from_update(update) else {
        return Ok((StatusCode::OK, "Ignored"));
    };

    tracing::info!(user_id = %input.user_id, command = ?input.command, "bot command");
    let usecase = HandleBotCommandUseCase {
        users: state.user_repo(),
        tokens: state.token_lifecycle(),
        sessions: state.session_manager(),
        gateway: state.telegram.clone(),
        website_url: state.website_url.clone(),
    };
    match usecase.execute(input).await {
        Ok(()) => Ok((StatusCode::OK, "OK")),
        // State is committed; a retried update would only reissue the token.
        Err(AuthServiceError::Delivery(reason)) => {
            tracing::warn!(reason = %reason, "bot reply not delivered");
            Ok((StatusCode::OK, "OK"))
        }
        Err(e) => Err(e),
    }
}

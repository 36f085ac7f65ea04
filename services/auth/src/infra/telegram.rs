//! Telegram Bot API client for outbound messages.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::domain::repository::MessagingGateway;
use crate::domain::types::{InlineButton, OutgoingMessage};
use crate::error::AuthServiceError;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct TelegramGateway {
    client: Client,
    /// `{api_url}/bot{token}`. Contains the bot token; never log it.
    endpoint: String,
}

impl TelegramGateway {
    pub fn new(api_url: &str, bot_token: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/bot{bot_token}", api_url.trim_end_matches('/')),
        }
    }
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<ReplyMarkup<'a>>,
}

#[derive(Serialize)]
struct ReplyMarkup<'a> {
    inline_keyboard: Vec<Vec<KeyboardButton<'a>>>,
}

#[derive(Serialize)]
struct KeyboardButton<'a> {
    text: &'a str,
    url: &'a str,
}

impl<'a> From<&'a InlineButton> for KeyboardButton<'a> {
    fn from(button: &'a InlineButton) -> Self {
        Self {
            text: &button.text,
            url: &button.url,
        }
    }
}

impl<'a> SendMessageRequest<'a> {
    fn from_message(message: &'a OutgoingMessage) -> Self {
        let reply_markup = (!message.buttons.is_empty()).then(|| ReplyMarkup {
            // One button per row.
            inline_keyboard: message.buttons.iter().map(|b| vec![b.into()]).collect(),
        });
        Self {
            chat_id: message.chat_id,
            text: &message.text,
            parse_mode: "HTML",
            reply_markup,
        }
    }
}

impl MessagingGateway for TelegramGateway {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), AuthServiceError> {
        let response = self
            .client
            .post(format!("{}/sendMessage", self.endpoint))
            .timeout(SEND_TIMEOUT)
            .json(&SendMessageRequest::from_message(message))
            .send()
            .await
            .map_err(|e| AuthServiceError::Delivery(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthServiceError::Delivery(format!(
                "sendMessage returned {status}"
            )));
        }
        Ok(())
    }
}

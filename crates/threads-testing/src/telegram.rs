//! In-process stand-in for the Telegram Bot API.
//!
//! `MockTelegram::start()` binds an ephemeral port and records every
//! `sendMessage` body. Point the service's `TELEGRAM_API_URL` at `base_url`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

#[derive(Clone, Default)]
struct Recorder {
    sent: Arc<Mutex<Vec<Value>>>,
    failing: Arc<AtomicBool>,
}

pub struct MockTelegram {
    pub base_url: String,
    recorder: Recorder,
    server: JoinHandle<()>,
}

impl MockTelegram {
    pub async fn start() -> Self {
        let recorder = Recorder::default();
        let app = Router::new()
            .route("/{bot}/sendMessage", post(send_message))
            .with_state(recorder.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{addr}"),
            recorder,
            server,
        }
    }

    /// Every `sendMessage` body received so far, oldest first.
    pub fn sent(&self) -> Vec<Value> {
        self.recorder.sent.lock().unwrap().clone()
    }

    /// Bodies sent to `chat_id`.
    pub fn sent_to(&self, chat_id: i64) -> Vec<Value> {
        self.sent()
            .into_iter()
            .filter(|m| m["chat_id"] == chat_id)
            .collect()
    }

    /// When set, every call answers 429 and nothing is recorded.
    pub fn set_failing(&self, failing: bool) {
        self.recorder.failing.store(failing, Ordering::SeqCst);
    }
}

impl Drop for MockTelegram {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn send_message(
    State(recorder): State<Recorder>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if recorder.failing.load(Ordering::SeqCst) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "ok": false, "error_code": 429 })),
        );
    }
    recorder.sent.lock().unwrap().push(body);
    (StatusCode::OK, Json(json!({ "ok": true, "result": {} })))
}

/// Webhook update for a text message in a private chat.
pub fn private_text(chat_id: i64, first_name: &str, last_name: Option<&str>, text: &str) -> Value {
    let mut chat = json!({ "id": chat_id, "type": "private", "first_name": first_name });
    if let Some(last) = last_name {
        chat["last_name"] = json!(last);
    }
    json!({
        "update_id": 1,
        "message": { "message_id": 1, "date": 0, "text": text, "chat": chat }
    })
}

/// Webhook update for a text message in a group chat.
pub fn group_text(chat_id: i64, text: &str) -> Value {
    json!({
        "update_id": 1,
        "message": {
            "message_id": 1,
            "date": 0,
            "text": text,
            "chat": { "id": chat_id, "type": "group", "title": "Group" }
        }
    })
}

/// Webhook update for a private message without text.
pub fn private_sticker(chat_id: i64) -> Value {
    json!({
        "update_id": 1,
        "message": {
            "message_id": 1,
            "date": 0,
            "sticker": { "file_id": "x" },
            "chat": { "id": chat_id, "type": "private", "first_name": "Ada" }
        }
    })
}

use axum::{
    Router,
    routing::{delete, get, post},
};

use threads_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    health::{healthz, readyz},
    login::{login, login_page, logout},
    session::{
        current_session, delete_all_sessions, delete_session, home, list_sessions, profile,
    },
    telegram::webhook,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Telegram bot webhook
        .route("/telegram", post(webhook))
        // Login
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
        // Sessions
        .route("/auth/session", get(current_session))
        .route("/auth/sessions", get(list_sessions).delete(delete_all_sessions))
        .route("/auth/sessions/{session_id}", delete(delete_session))
        // Protected pages
        .route("/home", get(home))
        .route("/profile", get(profile))
        .with_state(state)
        // Layers run bottom-up on requests: the id is set before the span reads it.
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use threads_auth_types::token::TokenFormatError;

/// Auth service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("forbidden")]
    Forbidden,
    #[error("{0}")]
    InvalidTokenFormat(#[from] TokenFormatError),
    #[error("Invalid or expired token.")]
    InvalidOrExpiredToken,
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("session not found")]
    SessionNotFound,
    #[error("message delivery failed: {0}")]
    Delivery(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Forbidden => "FORBIDDEN",
            Self::InvalidTokenFormat(_) => "INVALID_TOKEN_FORMAT",
            Self::InvalidOrExpiredToken => "INVALID_OR_EXPIRED_TOKEN",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::Delivery(_) => "DELIVERY",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InvalidTokenFormat(_) => StatusCode::BAD_REQUEST,
            Self::InvalidOrExpiredToken | Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::SessionNotFound => StatusCode::NOT_FOUND,
            Self::Delivery(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // TraceLayer already records every status; only server-side faults need their cause.
        match &self {
            Self::Internal(e) => tracing::error!(error = %e, kind = "INTERNAL", "internal error"),
            Self::Delivery(reason) => {
                tracing::error!(reason = %reason, kind = "DELIVERY", "delivery failed")
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

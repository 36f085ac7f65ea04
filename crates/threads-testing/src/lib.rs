//! Test utilities for Threads services.
//!
//! Provides a mock Telegram Bot API server, webhook update builders and
//! session cookie helpers. Use from dev-dependencies only.

pub mod auth;
pub mod telegram;

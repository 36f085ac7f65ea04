//! Domain types shared across all Threads services.
//!
//! Identifiers and naming rules only; no framework dependencies. Every layer
//! of a service, from handlers to persistence, speaks in these types.

pub mod id;
pub mod user;

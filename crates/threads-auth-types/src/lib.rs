//! Auth types shared across Threads services.
//!
//! Provides the token codec (generation, format checks, constant-time
//! comparison) and the session cookie builders.

pub mod cookie;
pub mod token;

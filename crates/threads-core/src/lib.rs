//! Service plumbing shared by Threads services: configuration loading,
//! tracing, HTTP middleware and deferred background work.

pub mod config;
pub mod deferred;
pub mod middleware;
pub mod tracing;

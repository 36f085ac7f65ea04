//! sea-orm entities owned by the auth service.

pub mod sessions;
pub mod tokens;
pub mod users;

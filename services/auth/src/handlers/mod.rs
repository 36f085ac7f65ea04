pub mod context;
pub mod extract;
pub mod health;
pub mod login;
pub mod session;
pub mod telegram;

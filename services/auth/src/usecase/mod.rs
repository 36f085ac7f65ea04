pub mod bot;
pub mod session;
pub mod sign_in;
pub mod token;

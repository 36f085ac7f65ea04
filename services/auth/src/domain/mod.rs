pub mod device;
pub mod format;
pub mod repository;
pub mod types;

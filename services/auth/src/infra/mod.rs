pub mod db;
pub mod telegram;

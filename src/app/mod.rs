pub mod admin;
pub mod config;
pub mod state;
pub mod time;

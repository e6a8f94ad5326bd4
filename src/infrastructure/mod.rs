pub mod clash_royale;
pub mod config;
pub mod http;

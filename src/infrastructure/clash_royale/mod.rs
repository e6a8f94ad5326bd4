//! Client for the Clash Royale public API

pub mod client;
pub mod error;
pub mod models;

pub use client::ClashRoyaleClient;
pub use error::UpstreamError;
pub use models::UpstreamErrorBody;

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
// Allow some overly strict pedantic lints for middleware code
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::missing_errors_doc)]

//! Clash Royale API Proxy
//!
//! An authenticated HTTP proxy in front of the Clash Royale public API.
//! Player tags are validated and normalized, callers authenticate with JWT
//! bearer tokens, each client is held to a fixed-window request limit, and
//! upstream failures are reported through one JSON error envelope.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use application::dto::*;
pub use domain::value_objects::*;

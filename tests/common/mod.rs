#![allow(dead_code)]

pub mod test_app;

pub use test_app::{TestApp, TestResponse, TEST_API_KEY, TEST_JWT_SECRET};

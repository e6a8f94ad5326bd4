//! Middleware modules for HTTP request processing
//!
//! - Authentication (JWT bearer tokens)
//! - Fixed-window rate limiting
//! - Security headers
//! - Request/response logging
//! - Error envelope formatting
//! - Client address resolution

pub mod auth;
pub mod client_ip;
pub mod error;
pub mod logging;
pub mod rate_limit;
pub mod security;

// Re-export commonly used types
pub use auth::{auth_middleware, Claims, JwtError, JwtService, UserContext};
pub use error::{handle_timeout_error, not_found_handler, ApiError, ErrorResponse};
pub use logging::{logging_middleware, LoggingConfig as RequestLoggingConfig};
pub use rate_limit::{
    rate_limit_middleware, FixedWindowRateLimiter, RateLimitConfig, RateLimitInfo,
};
pub use security::{
    development_security_config, production_security_config, security_headers_middleware,
};

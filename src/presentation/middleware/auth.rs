use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use super::error::ApiError;

/// JWT token claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String, // Subject (caller identifier)
    pub exp: u64,    // Expiration time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>, // Issued at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>, // JWT ID
}

impl Claims {
    /// Create claims for `subject` that expire after `ttl`
    #[must_use]
    pub fn new(subject: impl Into<String>, ttl: Duration) -> Self {
        let now = chrono::Utc::now().timestamp().max(0) as u64;

        Self {
            sub: subject.into(),
            exp: now + ttl.as_secs(),
            iat: Some(now),
            jti: Some(Uuid::new_v4().to_string()),
        }
    }
}

/// Caller identity extracted from a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub subject: String,
    pub token_id: Option<String>,
    pub expires_at: u64,
}

impl From<Claims> for UserContext {
    fn from(claims: Claims) -> Self {
        Self { subject: claims.sub, token_id: claims.jti, expires_at: claims.exp }
    }
}

impl fmt::Display for UserContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserContext(subject={}, token_id={:?})", self.subject, self.token_id)
    }
}

/// JWT service for token operations
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    /// Create new HS256 JWT service with secret
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            validation,
        }
    }

    /// Encode claims into JWT token
    pub fn encode_claims(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::default(), claims, &self.encoding_key).map_err(|e| {
            error!("Failed to encode JWT: {}", e);
            JwtError::EncodingError(e.to_string())
        })
    }

    /// Decode JWT token and extract claims
    pub fn decode_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| {
                debug!("Failed to decode JWT: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                    jsonwebtoken::errors::ErrorKind::InvalidToken => JwtError::InvalidToken,
                    _ => JwtError::DecodingError(e.to_string()),
                }
            })
    }

    /// Issue a token for `subject` valid for `ttl`
    pub fn create_token(&self, subject: &str, ttl: Duration) -> Result<String, JwtError> {
        self.encode_claims(&Claims::new(subject, ttl))
    }
}

/// JWT-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum JwtError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Invalid token format")]
    InvalidToken,

    #[error("Missing authorization header")]
    MissingHeader,

    #[error("Empty bearer token")]
    EmptyToken,

    #[error("JWT secret is not configured")]
    NotConfigured,

    #[error("Token encoding error: {0}")]
    EncodingError(String),

    #[error("Token decoding error: {0}")]
    DecodingError(String),
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => ApiError::unauthorized("Token expired."),
            JwtError::InvalidSignature | JwtError::InvalidToken | JwtError::DecodingError(_) => {
                ApiError::unauthorized("Invalid token.")
            }
            JwtError::MissingHeader => ApiError::unauthorized("Access denied. No token provided."),
            JwtError::EmptyToken => ApiError::unauthorized("Access denied. Invalid token format."),
            JwtError::NotConfigured => ApiError::internal(
                "Internal server error. Authentication configuration missing.",
            ),
            JwtError::EncodingError(msg) => {
                ApiError::internal(format!("JWT processing error: {msg}"))
            }
        }
    }
}

/// Pull the bearer token out of an `Authorization` header value
fn bearer_token(header: Option<&str>) -> Result<&str, JwtError> {
    let token = header.and_then(|h| h.strip_prefix("Bearer ")).ok_or(JwtError::MissingHeader)?;

    // Only the first space-separated segment counts as the token
    match token.split(' ').next() {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(JwtError::EmptyToken),
    }
}

/// Extract the caller identity placed in request extensions by `auth_middleware`
impl<S> FromRequestParts<S> for UserContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserContext>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Access denied. No token provided."))
    }
}

/// Authentication middleware that validates JWT bearer tokens.
///
/// The state is `None` when no JWT secret is configured, in which case every
/// request carrying a bearer token is answered with a 500.
pub async fn auth_middleware(
    State(jwt): State<Option<JwtService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request.headers().get(AUTHORIZATION).and_then(|h| h.to_str().ok());
    let token = bearer_token(header)?;

    let Some(jwt) = jwt else {
        error!("JWT secret is not defined in configuration");
        return Err(JwtError::NotConfigured.into());
    };

    let claims = jwt.decode_token(token)?;
    let user_context = UserContext::from(claims);

    debug!("Authenticated caller: {}", user_context);
    request.extensions_mut().insert(user_context);

    Ok(next.run(request).await)
}

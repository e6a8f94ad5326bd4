use serde::{Deserialize, Serialize};
use std::fmt;

/// Public identifier of a player in the upstream game API (`#` + alphanumerics)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct PlayerTag(String);

impl PlayerTag {
    /// Parse a raw tag as received from a client.
    ///
    /// Surrounding whitespace is trimmed and a missing leading `#` is added
    /// before the canonical form is validated.
    ///
    /// # Errors
    /// Returns an error if the tag is empty or contains anything other than
    /// ASCII alphanumerics after the `#`
    pub fn parse(raw: &str) -> Result<Self, PlayerTagError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PlayerTagError::Required);
        }

        let tag = if trimmed.starts_with('#') { trimmed.to_string() } else { format!("#{trimmed}") };

        Self::validate(&tag)?;
        Ok(Self(tag))
    }

    /// Validate a tag that is expected to already be in canonical form
    ///
    /// # Errors
    /// Returns the first format rule the tag violates
    pub fn validate(tag: &str) -> Result<(), PlayerTagError> {
        if tag.is_empty() {
            return Err(PlayerTagError::Required);
        }

        let Some(body) = tag.strip_prefix('#') else {
            return Err(PlayerTagError::MissingHash);
        };

        if body.is_empty() {
            return Err(PlayerTagError::OnlyHash);
        }

        if !body.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(PlayerTagError::InvalidCharacters);
        }

        Ok(())
    }

    /// Canonical tag, including the leading `#`
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encoded form suitable for a URL path segment (`#` becomes `%23`)
    #[must_use]
    pub fn encoded(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PlayerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PlayerTag {
    type Err = PlayerTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PlayerTag {
    type Error = PlayerTagError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

/// Reasons a player tag is rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayerTagError {
    #[error("Player tag is required")]
    Required,
    #[error("Player tag must start with # character")]
    MissingHash,
    #[error("Player tag cannot be just #")]
    OnlyHash,
    #[error("Player tag can only contain alphanumeric characters after #")]
    InvalidCharacters,
}

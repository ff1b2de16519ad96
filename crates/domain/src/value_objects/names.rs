//! Validated name newtypes for session identities
//!
//! These newtypes ensure that identifiers are valid by construction:
//! - Non-empty
//! - Within length limits
//! - Trimmed of leading/trailing whitespace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for game and player identifiers
const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for a locale code (e.g. "en", "pt-BR")
const MAX_LOCALE_LENGTH: usize = 35;

/// Locale used when nothing else is configured.
pub const DEFAULT_LOCALE: &str = "en";

fn validated_name(kind: &str, value: String) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{} cannot be empty", kind)));
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(DomainError::validation(format!(
            "{} cannot exceed {} characters",
            kind, MAX_NAME_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// GameId
// ============================================================================

/// Identifier of one game session (the caller's `gameId` cookie)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GameId(String);

impl GameId {
    /// Create a new validated game id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the id is empty after trimming
    /// or exceeds 200 characters.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        validated_name("Game id", id.into()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for GameId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<GameId> for String {
    fn from(id: GameId) -> String {
        id.0
    }
}

// ============================================================================
// PlayerName
// ============================================================================

/// A player identifier as it appears in the roster and in rendered text
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

impl PlayerName {
    /// Create a new validated player name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is empty after trimming
    /// or exceeds 200 characters.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        validated_name("Player name", name.into()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PlayerName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<PlayerName> for String {
    fn from(name: PlayerName) -> String {
        name.0
    }
}

// ============================================================================
// Locale
// ============================================================================

/// A locale code such as `en`, `sk` or `pt-BR`
///
/// Only ASCII letters, digits, `-` and `_` are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    pub fn new(code: impl Into<String>) -> Result<Self, DomainError> {
        let code = code.into();
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Locale cannot be empty"));
        }
        if trimmed.len() > MAX_LOCALE_LENGTH {
            return Err(DomainError::validation(format!(
                "Locale cannot exceed {} characters",
                MAX_LOCALE_LENGTH
            )));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::validation(format!(
                "Invalid locale code: '{}'",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self(DEFAULT_LOCALE.to_string())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Locale {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> String {
        locale.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed() {
        let name = PlayerName::new("  player1  ").unwrap();
        assert_eq!(name.as_str(), "player1");
    }

    #[test]
    fn empty_names_are_rejected() {
        assert!(matches!(
            GameId::new("   "),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(PlayerName::new(""), Err(DomainError::Validation(_))));
    }

    #[test]
    fn overlong_names_are_rejected() {
        let long = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(PlayerName::new(long).is_err());
    }

    #[test]
    fn locale_rejects_spaces_and_punctuation() {
        assert!(Locale::new("en us").is_err());
        assert!(Locale::new("en/us").is_err());
        assert_eq!(Locale::new("pt-BR").unwrap().as_str(), "pt-BR");
    }

    #[test]
    fn default_locale_is_english() {
        assert_eq!(Locale::default().as_str(), DEFAULT_LOCALE);
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let ok: PlayerName = serde_json::from_str("\"p1\"").unwrap();
        assert_eq!(ok.as_str(), "p1");
        let bad: Result<PlayerName, _> = serde_json::from_str("\"  \"");
        assert!(bad.is_err());
    }
}

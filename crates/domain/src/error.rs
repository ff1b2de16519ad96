//! Unified error types for the domain layer
//!
//! Provides a common error type that can be used across all domain operations,
//! enabling consistent error handling without forcing adapters to use String or anyhow.

use thiserror::Error;

use crate::value_objects::{PlayerName, TemplateError};

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// State transition not allowed
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// Use this when domain invariants or constraints are violated:
    /// - Required fields are empty or missing
    /// - Values are outside allowed ranges
    /// - Business rules are not satisfied
    ///
    /// # Example
    /// ```ignore
    /// if frequency == 0 {
    ///     return Err(DomainError::validation("Task frequency must be at least 1"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid state transition error
    pub fn invalid_state_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }
}

/// Errors raised while building a resolution context or rendering a template.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The current player is not part of the supplied roster
    #[error("Player {player} can not be found between all players")]
    PlayerNotInRoster { player: PlayerName },

    /// The request did not name the player the task is for
    #[error("Resolution context has no current player")]
    MissingCurrentPlayer,

    /// The roster lists the same player twice
    #[error("Player {player} appears more than once in the roster")]
    DuplicatePlayer { player: PlayerName },

    /// The template references more other players than the roster provides
    #[error("Not enough players to resolve this task: needs {required} other players, {available} available")]
    InsufficientPlayers { required: usize, available: usize },

    /// The template text is corrupt (should have been rejected at catalog load)
    #[error("Malformed template: {0}")]
    MalformedTemplate(#[from] TemplateError),
}

impl ResolutionError {
    /// Whether the failure is caused by the request rather than by catalog data.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::MalformedTemplate(_))
    }
}

impl From<TemplateError> for DomainError {
    fn from(err: TemplateError) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("frequency must be at least 1");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Validation failed: frequency must be at least 1"
        );
    }

    #[test]
    fn test_not_found_error() {
        let err = DomainError::not_found("Task", "123e4567-e89b-12d3-a456-426614174000");
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(err.to_string().contains("Task"));
        assert!(err.to_string().contains("123e4567"));
    }

    #[test]
    fn test_resolution_error_classification() {
        let insufficient = ResolutionError::InsufficientPlayers {
            required: 2,
            available: 1,
        };
        assert!(insufficient.is_client_error());
        assert!(insufficient.to_string().contains("needs 2"));

        let malformed: ResolutionError = TemplateError::UnknownPlaceholder("x".into()).into();
        assert!(!malformed.is_client_error());
    }

    #[test]
    fn test_from_template_error() {
        let template_err = TemplateError::Unterminated { position: 3 };
        let domain_err: DomainError = template_err.into();
        assert!(matches!(domain_err, DomainError::Parse(_)));
        assert!(domain_err.to_string().contains("position 3"));
    }
}

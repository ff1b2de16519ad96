//! Game task operation errors.

use taskgame_domain::{DomainError, QueueError, ResolutionError};

use crate::entities::CatalogError;
use crate::infrastructure::ports::RepoError;

/// Errors that can occur while generating or serving game tasks.
///
/// "Pool exhausted" is not an error; operations return `Ok(None)` for it.
#[derive(Debug, thiserror::Error)]
pub enum GameTaskError {
    #[error("Resolution failed: {0}")]
    Resolution(#[from] ResolutionError),
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl From<QueueError> for GameTaskError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::Resolution(e) => Self::Resolution(e),
            QueueError::Domain(e) => Self::Validation(e),
        }
    }
}

impl GameTaskError {
    /// Whether the caller's request was at fault (reject, don't retry).
    ///
    /// Malformed templates, broken queue state and storage failures are internal.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Resolution(e) => e.is_client_error(),
            Self::Validation(e) => {
                matches!(e, DomainError::Validation(_) | DomainError::Parse(_))
            }
            Self::Catalog(CatalogError::UnknownEntries(_)) => true,
            Self::Catalog(CatalogError::Repo(_)) | Self::Repo(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskgame_domain::{PlayerName, TemplateError};

    #[test]
    fn roster_problems_are_client_errors() {
        let err: GameTaskError = ResolutionError::PlayerNotInRoster {
            player: PlayerName::new("Zed").unwrap(),
        }
        .into();
        assert!(err.is_client_error());

        let err: GameTaskError = ResolutionError::InsufficientPlayers {
            required: 3,
            available: 1,
        }
        .into();
        assert!(err.is_client_error());
    }

    #[test]
    fn malformed_template_is_internal() {
        let err: GameTaskError =
            ResolutionError::MalformedTemplate(TemplateError::UnknownPlaceholder("x".into()))
                .into();
        assert!(!err.is_client_error());
    }

    #[test]
    fn queue_errors_map_onto_variants() {
        let err: GameTaskError = QueueError::Domain(DomainError::not_found("Task", "1")).into();
        assert!(matches!(err, GameTaskError::Validation(DomainError::NotFound { .. })));
        assert!(!err.is_client_error());

        let err: GameTaskError = QueueError::Domain(DomainError::validation("wrong game")).into();
        assert!(err.is_client_error());
    }

    #[test]
    fn storage_failures_are_internal() {
        let err: GameTaskError = RepoError::database("lookup_locale_text", "down").into();
        assert!(!err.is_client_error());
    }
}

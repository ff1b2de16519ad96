//! Repository port traits for catalog access.

use async_trait::async_trait;
use taskgame_domain::{GameId, Locale, Task, TaskId, Template};

use super::error::RepoError;

// =============================================================================
// Catalog Storage
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepo: Send + Sync {
    /// Entries selected for a game, in catalog order.
    async fn load_catalog(&self, game_id: &GameId) -> Result<Vec<Task>, RepoError>;

    /// Entries with the given ids. Unknown ids are simply absent from the result.
    async fn get_by_ids(&self, ids: &[TaskId]) -> Result<Vec<Task>, RepoError>;
}

// =============================================================================
// Locale Texts
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocaleTextRepo: Send + Sync {
    /// Dedicated variant of an entry for `locale`, or `None` when untranslated.
    async fn lookup_locale_text(
        &self,
        task_id: TaskId,
        locale: &Locale,
    ) -> Result<Option<Template>, RepoError>;
}

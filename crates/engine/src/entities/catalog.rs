//! Catalog entity module.
//!
//! Loads catalog entries through the catalog port and rejects entries that
//! break the catalog invariants before they can reach a game queue.

use std::collections::HashSet;
use std::sync::Arc;

use taskgame_domain::{GameId, Task, TaskId};

use crate::infrastructure::ports::{CatalogRepo, RepoError};

/// Errors that can occur while loading catalog entries.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Unknown catalog entries: {}", format_ids(.0))]
    UnknownEntries(Vec<TaskId>),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

fn format_ids(ids: &[TaskId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Catalog entity - validated access to catalog entries.
pub struct Catalog {
    repo: Arc<dyn CatalogRepo>,
}

impl Catalog {
    pub fn new(repo: Arc<dyn CatalogRepo>) -> Self {
        Self { repo }
    }

    /// Entries selected for a game.
    pub async fn load_for_game(&self, game_id: &GameId) -> Result<Vec<Task>, CatalogError> {
        let entries = self.repo.load_catalog(game_id).await?;
        Ok(Self::accept_valid(entries))
    }

    /// Entries with the given ids, in request order. Repeated ids load once.
    ///
    /// Fails with `UnknownEntries` if any id is not in the catalog.
    pub async fn load_by_ids(&self, ids: &[TaskId]) -> Result<Vec<Task>, CatalogError> {
        let mut seen = HashSet::with_capacity(ids.len());
        let unique: Vec<TaskId> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        let found = self.repo.get_by_ids(&unique).await?;
        let missing: Vec<TaskId> = unique
            .iter()
            .copied()
            .filter(|id| !found.iter().any(|t| t.id == *id))
            .collect();
        if !missing.is_empty() {
            return Err(CatalogError::UnknownEntries(missing));
        }

        let ordered = unique
            .iter()
            .filter_map(|id| found.iter().find(|t| t.id == *id).cloned())
            .collect();
        Ok(Self::accept_valid(ordered))
    }

    /// Drop entries that violate catalog invariants, logging each rejection.
    ///
    /// Ids must be unique; a repeated id keeps the first entry.
    pub fn accept_valid(entries: Vec<Task>) -> Vec<Task> {
        let mut seen = HashSet::with_capacity(entries.len());
        entries
            .into_iter()
            .filter(|entry| match entry.validate() {
                Ok(()) if seen.insert(entry.id) => true,
                Ok(()) => {
                    tracing::warn!(task_id = %entry.id, "Rejected catalog entry with duplicate id");
                    false
                }
                Err(e) => {
                    tracing::warn!(
                        task_id = %entry.id,
                        error = %e,
                        "Rejected catalog entry"
                    );
                    false
                }
            })
            .collect()
    }
}

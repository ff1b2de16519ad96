//! In-memory catalog storage.
//!
//! Serves both catalog ports. Entries keep insertion order; a game either has
//! an explicit selection of entries or sees the whole catalog.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use taskgame_domain::{GameId, Locale, Task, TaskId, Template};

use crate::infrastructure::ports::{CatalogRepo, LocaleTextRepo, RepoError};

#[derive(Default)]
struct CatalogState {
    entries: Vec<Task>,
    games: HashMap<GameId, Vec<TaskId>>,
}

impl CatalogState {
    fn find(&self, id: TaskId) -> Option<&Task> {
        self.entries.iter().find(|t| t.id == id)
    }

    fn find_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.entries.iter_mut().find(|t| t.id == id)
    }
}

/// Catalog held in memory.
#[derive(Default)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog pre-filled with `entries`.
    pub fn with_entries(entries: Vec<Task>) -> Self {
        Self {
            state: RwLock::new(CatalogState {
                entries,
                games: HashMap::new(),
            }),
        }
    }

    /// Add or replace an entry.
    pub async fn insert(&self, task: Task) -> Result<TaskId, RepoError> {
        task.validate()
            .map_err(|e| RepoError::constraint(e.to_string()))?;
        let id = task.id;
        let mut state = self.state.write().await;
        match state.find_mut(id) {
            Some(existing) => *existing = task,
            None => state.entries.push(task),
        }
        Ok(id)
    }

    /// Register a locale variant for an existing entry.
    ///
    /// The text follows the same token rules as the fallback text.
    pub async fn create_locale(
        &self,
        task_id: TaskId,
        locale: Locale,
        fragments: Vec<String>,
    ) -> Result<(), RepoError> {
        let template = Template::from_fragments(fragments)
            .map_err(|e| RepoError::constraint(format!("Invalid {} text for {}: {}", locale, task_id, e)))?;
        let mut state = self.state.write().await;
        let task = state
            .find_mut(task_id)
            .ok_or_else(|| RepoError::not_found("Task", task_id))?;
        task.add_locale(locale, template);
        Ok(())
    }

    /// Restrict the catalog seen by one game to `ids`.
    pub async fn assign_to_game(&self, game_id: GameId, ids: Vec<TaskId>) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        if let Some(missing) = ids.iter().find(|id| state.find(**id).is_none()) {
            return Err(RepoError::not_found("Task", missing));
        }
        state.games.insert(game_id, ids);
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }
}

#[async_trait]
impl CatalogRepo for InMemoryCatalog {
    async fn load_catalog(&self, game_id: &GameId) -> Result<Vec<Task>, RepoError> {
        let state = self.state.read().await;
        let entries = match state.games.get(game_id) {
            Some(ids) => ids.iter().filter_map(|id| state.find(*id)).cloned().collect(),
            None => state.entries.clone(),
        };
        Ok(entries)
    }

    async fn get_by_ids(&self, ids: &[TaskId]) -> Result<Vec<Task>, RepoError> {
        let state = self.state.read().await;
        Ok(ids.iter().filter_map(|id| state.find(*id)).cloned().collect())
    }
}

#[async_trait]
impl LocaleTextRepo for InMemoryCatalog {
    async fn lookup_locale_text(
        &self,
        task_id: TaskId,
        locale: &Locale,
    ) -> Result<Option<Template>, RepoError> {
        let state = self.state.read().await;
        let task = state
            .find(task_id)
            .ok_or_else(|| RepoError::not_found("Task", task_id))?;
        if !task.templates.has_variant(locale) {
            return Ok(None);
        }
        Ok(Some(task.templates.select(locale).0.clone()))
    }
}

//! Generate game tasks use case.
//!
//! Expands catalog entries into a game's task pool, replacing whatever the
//! game had before.

use std::sync::Arc;

use taskgame_domain::{GameId, GameTaskId};

use crate::entities::Catalog;
use crate::infrastructure::ports::{ClockPort, RandomPort};
use crate::stores::GameTaskQueueStore;

use super::error::GameTaskError;
use super::types::TaskSource;

pub struct GenerateGameTasks {
    catalog: Arc<Catalog>,
    queues: Arc<GameTaskQueueStore>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
}

impl GenerateGameTasks {
    pub fn new(
        catalog: Arc<Catalog>,
        queues: Arc<GameTaskQueueStore>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            catalog,
            queues,
            clock,
            random,
        }
    }

    /// Regenerate the game's task pool.
    ///
    /// Catalog entries are loaded before the game's queue is locked.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of task instances created
    /// * `Err(GameTaskError)` - Catalog could not be loaded
    pub async fn execute(&self, game_id: &GameId, source: TaskSource) -> Result<usize, GameTaskError> {
        let entries = match source {
            TaskSource::GameCatalog => self.catalog.load_for_game(game_id).await?,
            TaskSource::Ids(ids) => self.catalog.load_by_ids(&ids).await?,
            TaskSource::Entries(entries) => Catalog::accept_valid(entries),
        };
        let entry_count = entries.len();

        let random = Arc::clone(&self.random);
        let created = self
            .queues
            .generate(
                game_id,
                entries,
                move || GameTaskId::from_uuid(random.gen_uuid()),
                self.clock.now(),
            )
            .await;

        tracing::info!(
            game_id = %game_id,
            entries = entry_count,
            instances = created,
            "Generated game tasks"
        );
        Ok(created)
    }
}

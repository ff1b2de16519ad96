//! Game task use cases.
//!
//! Generating a game's task pool and serving tasks from it. This is the
//! boundary a transport layer calls.

use std::sync::Arc;

use taskgame_domain::{GameId, QueueError, ResolutionContext, ResolutionError};

use crate::stores::{GameTaskQueueStore, QueueSnapshot};

mod advance;
mod current;
mod error;
mod generate;
mod locale;
mod types;

pub use advance::AdvanceGameTask;
pub use current::CurrentGameTask;
pub use error::GameTaskError;
pub use generate::GenerateGameTasks;
pub use locale::LocaleVariants;
pub use types::{TaskRequest, TaskSource};

/// Container for game task use cases.
pub struct GameTaskUseCases {
    pub generate: Arc<GenerateGameTasks>,
    pub current: Arc<CurrentGameTask>,
    pub advance: Arc<AdvanceGameTask>,
    queues: Arc<GameTaskQueueStore>,
}

impl GameTaskUseCases {
    pub fn new(
        generate: Arc<GenerateGameTasks>,
        current: Arc<CurrentGameTask>,
        advance: Arc<AdvanceGameTask>,
        queues: Arc<GameTaskQueueStore>,
    ) -> Self {
        Self {
            generate,
            current,
            advance,
            queues,
        }
    }

    /// Number of instances left in a game's pool.
    pub async fn pool_size(&self, game_id: &GameId) -> usize {
        self.queues.pool_size(game_id).await
    }

    /// States of every instance in a game's pool.
    pub async fn snapshot(&self, game_id: &GameId) -> QueueSnapshot {
        self.queues.snapshot(game_id).await
    }
}

/// Log a failed queue operation at the level its cause deserves.
fn log_queue_error(context: &ResolutionContext, err: &QueueError) {
    match err {
        QueueError::Resolution(ResolutionError::MalformedTemplate(e)) => tracing::warn!(
            game_id = %context.game_id(),
            player = %context.current_player(),
            error = %e,
            "Catalog template failed to resolve"
        ),
        QueueError::Resolution(e) => tracing::debug!(
            game_id = %context.game_id(),
            player = %context.current_player(),
            error = %e,
            "Task could not be rendered for request"
        ),
        QueueError::Domain(e) => tracing::error!(
            game_id = %context.game_id(),
            error = %e,
            "Game task queue rejected operation"
        ),
    }
}

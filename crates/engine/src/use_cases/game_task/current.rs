//! Current game task use case.
//!
//! Returns the task currently in play for a game, selecting one at random
//! when nothing is in play yet. Repeated calls return the same instance.

use std::sync::Arc;

use taskgame_domain::{Locale, RenderedTask};

use crate::infrastructure::ports::RandomPort;
use crate::stores::GameTaskQueueStore;

use super::error::GameTaskError;
use super::locale::LocaleVariants;
use super::types::TaskRequest;

pub struct CurrentGameTask {
    queues: Arc<GameTaskQueueStore>,
    locales: Arc<LocaleVariants>,
    random: Arc<dyn RandomPort>,
    default_locale: Locale,
}

impl CurrentGameTask {
    pub fn new(
        queues: Arc<GameTaskQueueStore>,
        locales: Arc<LocaleVariants>,
        random: Arc<dyn RandomPort>,
        default_locale: Locale,
    ) -> Self {
        Self {
            queues,
            locales,
            random,
            default_locale,
        }
    }

    /// Execute the current task use case.
    ///
    /// # Returns
    /// * `Ok(Some(RenderedTask))` - The task in play
    /// * `Ok(None)` - Nothing left for this player
    /// * `Err(GameTaskError)` - Invalid request or broken catalog data
    pub async fn execute(&self, request: TaskRequest) -> Result<Option<RenderedTask>, GameTaskError> {
        let context = request.build_context(&self.default_locale, self.random.as_ref())?;
        self.locales
            .prepare(context.game_id(), context.locale())
            .await?;

        let random = Arc::clone(&self.random);
        let result = self
            .queues
            .current(&context, move |upper| random.gen_index(upper))
            .await;

        match &result {
            Ok(Some(task)) => tracing::debug!(
                game_id = %context.game_id(),
                player = %context.current_player(),
                instance_id = %task.instance_id,
                task_id = %task.task_id,
                locale = %task.locale,
                "Serving current task"
            ),
            Ok(None) => tracing::debug!(
                game_id = %context.game_id(),
                player = %context.current_player(),
                "No task available"
            ),
            Err(e) => super::log_queue_error(&context, e),
        }
        Ok(result?)
    }
}

//! Advance game task use case.
//!
//! Retires the task in play according to its repeat policy and moves the
//! game on to the next one.

use std::sync::Arc;

use taskgame_domain::{Locale, RenderedTask, RetiredInstance};

use crate::infrastructure::ports::RandomPort;
use crate::stores::GameTaskQueueStore;

use super::error::GameTaskError;
use super::locale::LocaleVariants;
use super::types::TaskRequest;

pub struct AdvanceGameTask {
    queues: Arc<GameTaskQueueStore>,
    locales: Arc<LocaleVariants>,
    random: Arc<dyn RandomPort>,
    default_locale: Locale,
}

impl AdvanceGameTask {
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

    /// Execute the advance use case.
    ///
    /// A failed render leaves the game exactly as it was, including the task in play.
    ///
    /// # Returns
    /// * `Ok(Some(RenderedTask))` - The next task
    /// * `Ok(None)` - Nothing left for this player
    /// * `Err(GameTaskError)` - Invalid request or broken catalog data
    pub async fn execute(&self, request: TaskRequest) -> Result<Option<RenderedTask>, GameTaskError> {
        let context = request.build_context(&self.default_locale, self.random.as_ref())?;
        self.locales
            .prepare(context.game_id(), context.locale())
            .await?;

        let random = Arc::clone(&self.random);
        let outcome = match self
            .queues
            .advance(&context, move |upper| random.gen_index(upper))
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                super::log_queue_error(&context, &e);
                return Err(e.into());
            }
        };

        match outcome.retired {
            Some(RetiredInstance::Removed(id)) => tracing::info!(
                game_id = %context.game_id(),
                player = %context.current_player(),
                instance_id = %id,
                "Task instance consumed and removed"
            ),
            Some(RetiredInstance::Returned(id)) => tracing::info!(
                game_id = %context.game_id(),
                player = %context.current_player(),
                instance_id = %id,
                "Task instance returned to pool"
            ),
            None => {}
        }

        match &outcome.next {
            Some(task) => tracing::debug!(
                game_id = %context.game_id(),
                player = %context.current_player(),
                instance_id = %task.instance_id,
                task_id = %task.task_id,
                "Selected next task"
            ),
            None => tracing::debug!(
                game_id = %context.game_id(),
                player = %context.current_player(),
                "Task pool exhausted for player"
            ),
        }
        Ok(outcome.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use taskgame_domain::{
        GameId, GameTaskId, PlayerName, RepeatPolicy, ResolutionError, Task, Template,
    };

    use crate::infrastructure::clock::FixedRandom;
    use crate::infrastructure::ports::MockLocaleTextRepo;

    fn game() -> GameId {
        GameId::new("game").unwrap()
    }

    fn request(player: &str, roster: &[&str]) -> TaskRequest {
        TaskRequest::new(
            game(),
            PlayerName::new(player).unwrap(),
            roster.iter().map(|p| PlayerName::new(*p).unwrap()).collect(),
        )
    }

    fn task(text: &str, repeat: RepeatPolicy) -> Task {
        Task::builder(Locale::default(), Template::parse(text).unwrap())
            .repeat(repeat)
            .build()
            .unwrap()
    }

    async fn setup(tasks: Vec<Task>) -> (Arc<GameTaskQueueStore>, AdvanceGameTask) {
        let queues = Arc::new(GameTaskQueueStore::new());
        queues.generate(&game(), tasks, GameTaskId::new, Utc::now()).await;
        let locales = Arc::new(LocaleVariants::new(
            Arc::new(MockLocaleTextRepo::new()),
            Arc::clone(&queues),
        ));
        let advance = AdvanceGameTask::new(
            Arc::clone(&queues),
            locales,
            Arc::new(FixedRandom::new(0)),
            Locale::default(),
        );
        (queues, advance)
    }

    #[tokio::test]
    async fn never_task_is_deleted_after_next() {
        let (queues, advance) = setup(vec![task("only once", RepeatPolicy::Never)]).await;
        let roster = ["p1", "p2"];

        let first = advance.execute(request("p1", &roster)).await.unwrap();
        assert_eq!(first.map(|t| t.text), Some("only once".to_string()));
        assert_eq!(queues.pool_size(&game()).await, 1);

        assert_eq!(advance.execute(request("p1", &roster)).await.unwrap(), None);
        assert_eq!(queues.pool_size(&game()).await, 0);
        assert_eq!(advance.execute(request("p2", &roster)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn always_task_keeps_coming_back() {
        let (queues, advance) = setup(vec![task("again", RepeatPolicy::Always)]).await;
        let roster = ["p1", "p2"];
        for player in ["p1", "p2", "p1", "p2"] {
            let next = advance.execute(request(player, &roster)).await.unwrap();
            assert_eq!(next.map(|t| t.text), Some("again".to_string()));
        }
        assert_eq!(queues.pool_size(&game()).await, 1);
    }

    #[tokio::test]
    async fn insufficient_players_is_client_error_and_keeps_state() {
        let (queues, advance) = setup(vec![
            task("warm up", RepeatPolicy::Never),
            task("{player_1}, {player_2} and {player_3} dance", RepeatPolicy::Never),
        ])
        .await;
        let roster = ["p1", "p2"];

        let first = advance.execute(request("p1", &roster)).await.unwrap().unwrap();
        assert_eq!(first.text, "warm up");
        let before = queues.snapshot(&game()).await;

        let err = advance.execute(request("p1", &roster)).await.unwrap_err();
        assert!(matches!(
            err,
            GameTaskError::Resolution(ResolutionError::InsufficientPlayers {
                required: 3,
                available: 1
            })
        ));
        assert!(err.is_client_error());
        assert_eq!(queues.snapshot(&game()).await, before);
    }

    #[tokio::test]
    async fn duplicate_roster_is_rejected() {
        let (_, advance) = setup(vec![task("x", RepeatPolicy::Never)]).await;
        let err = advance
            .execute(request("p1", &["p1", "p2", "p2"]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GameTaskError::Resolution(ResolutionError::DuplicatePlayer { .. })
        ));
    }
}

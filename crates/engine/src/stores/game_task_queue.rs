//! Per-game task queue storage.
//!
//! One `RwLock` per game, so games never contend with each other. Mutations
//! (`generate`, selecting or advancing the current task) take the write lock;
//! re-rendering an already bound task only needs the read lock. No I/O is
//! performed while a lock is held.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::RwLock;

use taskgame_domain::{
    AdvanceOutcome, GameId, GameTask, GameTaskId, GameTaskQueue, Locale, QueueError,
    RenderedTask, ResolutionContext, Task, TaskId, Template,
};

/// Point-in-time copy of one game's queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSnapshot {
    pub game_id: GameId,
    pub generated_at: Option<DateTime<Utc>>,
    pub current: Option<GameTaskId>,
    pub instances: Vec<GameTask>,
}

impl QueueSnapshot {
    fn empty(game_id: GameId) -> Self {
        Self {
            game_id,
            generated_at: None,
            current: None,
            instances: Vec::new(),
        }
    }
}

/// In-memory store of every game's task queue.
pub struct GameTaskQueueStore {
    queues: DashMap<GameId, Arc<RwLock<GameTaskQueue>>>,
}

impl GameTaskQueueStore {
    pub fn new() -> Self {
        Self {
            queues: DashMap::new(),
        }
    }

    /// Lock handle for a game, created on first use.
    ///
    /// The map guard is released before the caller awaits the lock.
    fn queue_or_create(&self, game_id: &GameId) -> Arc<RwLock<GameTaskQueue>> {
        self.queues
            .entry(game_id.clone())
            .or_insert_with(|| Arc::new(RwLock::new(GameTaskQueue::new(game_id.clone()))))
            .clone()
    }

    fn queue(&self, game_id: &GameId) -> Option<Arc<RwLock<GameTaskQueue>>> {
        self.queues.get(game_id).map(|entry| Arc::clone(entry.value()))
    }

    /// Replace every instance of the game with fresh ones built from `entries`.
    pub async fn generate(
        &self,
        game_id: &GameId,
        entries: Vec<Task>,
        next_id: impl FnMut() -> GameTaskId,
        now: DateTime<Utc>,
    ) -> usize {
        let queue = self.queue_or_create(game_id);
        let mut queue = queue.write().await;
        queue.generate(entries, next_id, now)
    }

    /// Current task of the game, binding a new one if none is in play.
    pub async fn current(
        &self,
        context: &ResolutionContext,
        pick: impl FnMut(usize) -> usize + Send,
    ) -> Result<Option<RenderedTask>, QueueError> {
        let Some(queue) = self.queue(context.game_id()) else {
            return Ok(None);
        };

        {
            let queue = queue.read().await;
            if let Some(rendered) = queue.render_current(context.locale())? {
                return Ok(Some(rendered));
            }
        }

        // Another request may have bound a task between the two locks;
        // `GameTaskQueue::current` checks again under the write lock.
        let mut queue = queue.write().await;
        queue.current(context, pick)
    }

    /// Retire the current task and bind the next one.
    pub async fn advance(
        &self,
        context: &ResolutionContext,
        pick: impl FnMut(usize) -> usize + Send,
    ) -> Result<AdvanceOutcome, QueueError> {
        let Some(queue) = self.queue(context.game_id()) else {
            return Ok(AdvanceOutcome {
                retired: None,
                next: None,
            });
        };
        let mut queue = queue.write().await;
        queue.advance(context, pick)
    }

    /// Entries of the game's queue that still need a lookup for `locale`.
    pub async fn entries_missing_locale(&self, game_id: &GameId, locale: &Locale) -> Vec<TaskId> {
        match self.queue(game_id) {
            Some(queue) => queue.read().await.entries_missing_locale(locale),
            None => Vec::new(),
        }
    }

    /// Store locale lookup results in the game's queue.
    pub async fn register_locale_variants(
        &self,
        game_id: &GameId,
        locale: &Locale,
        variants: Vec<(TaskId, Option<Template>)>,
    ) {
        if let Some(queue) = self.queue(game_id) {
            queue.write().await.register_locale_variants(locale, variants);
        }
    }

    /// Number of instances left in the game's pool.
    pub async fn pool_size(&self, game_id: &GameId) -> usize {
        match self.queue(game_id) {
            Some(queue) => queue.read().await.pool_size(),
            None => 0,
        }
    }

    pub async fn snapshot(&self, game_id: &GameId) -> QueueSnapshot {
        let Some(queue) = self.queue(game_id) else {
            return QueueSnapshot::empty(game_id.clone());
        };
        let queue = queue.read().await;
        QueueSnapshot {
            game_id: game_id.clone(),
            generated_at: queue.generated_at(),
            current: queue.current_instance().map(|instance| instance.id),
            instances: queue.instances().to_vec(),
        }
    }

    /// Drop a game's queue entirely. Returns whether it existed.
    pub fn remove(&self, game_id: &GameId) -> bool {
        self.queues.remove(game_id).is_some()
    }

    pub fn game_count(&self) -> usize {
        self.queues.len()
    }
}

impl Default for GameTaskQueueStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskgame_domain::{GameTaskState, PlayerName, RepeatPolicy};

    fn game(id: &str) -> GameId {
        GameId::new(id).unwrap()
    }

    fn task(text: &str, repeat: RepeatPolicy) -> Task {
        Task::builder(Locale::default(), Template::parse(text).unwrap())
            .repeat(repeat)
            .build()
            .unwrap()
    }

    fn ctx(game_id: &GameId, player: &str) -> ResolutionContext {
        let players = ["A", "B", "C"]
            .iter()
            .map(|p| PlayerName::new(*p).unwrap())
            .collect();
        ResolutionContext::build(
            game_id.clone(),
            PlayerName::new(player).unwrap(),
            players,
            Locale::default(),
            |_| 0,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn unknown_game_has_no_content_and_is_not_created() {
        let store = GameTaskQueueStore::new();
        let id = game("nobody");
        assert_eq!(store.current(&ctx(&id, "A"), |_| 0).await.unwrap(), None);
        assert_eq!(store.advance(&ctx(&id, "A"), |_| 0).await.unwrap().next, None);
        assert_eq!(store.pool_size(&id).await, 0);
        assert_eq!(store.game_count(), 0);
    }

    #[tokio::test]
    async fn games_are_independent() {
        let store = GameTaskQueueStore::new();
        let (one, two) = (game("one"), game("two"));
        store
            .generate(&one, vec![task("x", RepeatPolicy::Never)], GameTaskId::new, Utc::now())
            .await;
        store
            .generate(
                &two,
                vec![task("y", RepeatPolicy::Never), task("z", RepeatPolicy::Never)],
                GameTaskId::new,
                Utc::now(),
            )
            .await;

        store.advance(&ctx(&one, "A"), |_| 0).await.unwrap();
        store.advance(&ctx(&one, "A"), |_| 0).await.unwrap();
        assert_eq!(store.pool_size(&one).await, 0);
        assert_eq!(store.pool_size(&two).await, 2);
    }

    #[tokio::test]
    async fn snapshot_reports_current_instance() {
        let store = GameTaskQueueStore::new();
        let id = game("g");
        store
            .generate(&id, vec![task("x", RepeatPolicy::Always)], GameTaskId::new, Utc::now())
            .await;

        let before = store.snapshot(&id).await;
        assert_eq!(before.current, None);
        assert!(before.generated_at.is_some());

        let served = store.current(&ctx(&id, "A"), |_| 0).await.unwrap().unwrap();
        let after = store.snapshot(&id).await;
        assert_eq!(after.current, Some(served.instance_id));
        assert_eq!(after.instances[0].state, GameTaskState::Current);
    }

    #[tokio::test]
    async fn remove_drops_game() {
        let store = GameTaskQueueStore::new();
        let id = game("g");
        store
            .generate(&id, vec![task("x", RepeatPolicy::Never)], GameTaskId::new, Utc::now())
            .await;
        assert!(store.remove(&id));
        assert!(!store.remove(&id));
        assert_eq!(store.snapshot(&id).await, QueueSnapshot::empty(id));
    }
}

//! E2E test helpers for constructing the full application stack.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use taskgame_domain::{
    GameId, Locale, PlayerName, RenderedTask, RepeatPolicy, Task, Template,
};

use crate::app::App;
use crate::infrastructure::catalog::InMemoryCatalog;
use crate::infrastructure::clock::{FixedClock, SystemRandom};
use crate::infrastructure::ports::RandomPort;
use crate::infrastructure::settings::EngineSettings;
use crate::use_cases::game_task::{GameTaskError, TaskRequest, TaskSource};

pub const E2E_GAME: &str = "e2e-game";

/// Catalog entry with the catalog defaults.
pub fn task(text: &str) -> Task {
    task_with(text, RepeatPolicy::Never, 1)
}

pub fn task_with(text: &str, repeat: RepeatPolicy, frequency: u16) -> Task {
    Task::builder(Locale::default(), Template::parse(text).unwrap())
        .repeat(repeat)
        .frequency(frequency)
        .build()
        .unwrap()
}

pub fn roster(names: &[&str]) -> Vec<PlayerName> {
    names.iter().map(|n| PlayerName::new(*n).unwrap()).collect()
}

/// A composed app with one game and a fixed roster.
pub struct E2EContext {
    pub app: App,
    pub catalog: Arc<InMemoryCatalog>,
    pub game_id: GameId,
    pub players: Vec<PlayerName>,
}

impl E2EContext {
    /// App over `entries` with real randomness.
    pub fn new(entries: Vec<Task>, players: &[&str]) -> Self {
        Self::with_random(entries, players, Arc::new(SystemRandom::new()))
    }

    pub fn with_random(entries: Vec<Task>, players: &[&str], random: Arc<dyn RandomPort>) -> Self {
        let catalog = Arc::new(InMemoryCatalog::with_entries(entries));
        let clock = Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap(),
        ));
        let app = App::with_ports(
            catalog.clone(),
            catalog.clone(),
            clock,
            random,
            EngineSettings::default(),
        );
        Self {
            app,
            catalog,
            game_id: GameId::new(E2E_GAME).unwrap(),
            players: roster(players),
        }
    }

    /// Generate the game's pool from the whole catalog.
    pub async fn generate(&self) -> usize {
        self.app
            .use_cases
            .game_tasks
            .generate
            .execute(&self.game_id, TaskSource::GameCatalog)
            .await
            .unwrap()
    }

    pub fn request(&self, player: &str) -> TaskRequest {
        TaskRequest::new(
            self.game_id.clone(),
            PlayerName::new(player).unwrap(),
            self.players.clone(),
        )
    }

    pub async fn try_current(&self, request: TaskRequest) -> Result<Option<RenderedTask>, GameTaskError> {
        self.app.use_cases.game_tasks.current.execute(request).await
    }

    pub async fn try_advance(&self, request: TaskRequest) -> Result<Option<RenderedTask>, GameTaskError> {
        self.app.use_cases.game_tasks.advance.execute(request).await
    }

    pub async fn current(&self, player: &str) -> Option<RenderedTask> {
        self.try_current(self.request(player)).await.unwrap()
    }

    pub async fn advance(&self, player: &str) -> Option<RenderedTask> {
        self.try_advance(self.request(player)).await.unwrap()
    }

    pub async fn pool_size(&self) -> usize {
        self.app.use_cases.game_tasks.pool_size(&self.game_id).await
    }
}

//! Request and source types for game task use cases.

use taskgame_domain::{
    GameId, Locale, PlayerName, ResolutionContext, ResolutionError, Task, TaskId,
};

use crate::infrastructure::ports::RandomPort;

/// Who is asking for a task, and in which game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRequest {
    pub game_id: GameId,
    pub player: PlayerName,
    pub players: Vec<PlayerName>,
    /// `None` uses the configured default locale
    pub locale: Option<Locale>,
}

impl TaskRequest {
    pub fn new(game_id: GameId, player: PlayerName, players: Vec<PlayerName>) -> Self {
        Self {
            game_id,
            player,
            players,
            locale: None,
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    /// Build a fresh resolution context with its own shuffle of the other players.
    pub fn build_context(
        &self,
        default_locale: &Locale,
        random: &dyn RandomPort,
    ) -> Result<ResolutionContext, ResolutionError> {
        ResolutionContext::builder(self.game_id.clone())
            .player(self.player.clone())
            .players(self.players.clone())
            .locale(self.locale.clone().unwrap_or_else(|| default_locale.clone()))
            .build(|upper| random.gen_index(upper))
    }
}

/// Which catalog entries a game's queue is generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSource {
    /// Everything the catalog selects for the game
    GameCatalog,
    /// Specific catalog entries
    Ids(Vec<TaskId>),
    /// Entries supplied by the caller
    Entries(Vec<Task>),
}

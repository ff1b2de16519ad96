//! Engine settings loaded from the process environment.
//!
//! | Variable                  | Default                     |
//! |---------------------------|-----------------------------|
//! | `TASKGAME_DEFAULT_LOCALE` | `en`                        |
//! | `TASKGAME_CATALOG_PATH`   | `catalog.json`              |
//! | `TASKGAME_PLAYERS`        | `player1,player2,player3`   |
//! | `TASKGAME_ROUNDS`         | `5`                         |
//!
//! Invalid values are logged and replaced by their default.

use std::path::PathBuf;

use taskgame_domain::{Locale, PlayerName};

pub const DEFAULT_LOCALE_VAR: &str = "TASKGAME_DEFAULT_LOCALE";
pub const CATALOG_PATH_VAR: &str = "TASKGAME_CATALOG_PATH";
pub const PLAYERS_VAR: &str = "TASKGAME_PLAYERS";
pub const ROUNDS_VAR: &str = "TASKGAME_ROUNDS";

const DEFAULT_CATALOG_PATH: &str = "catalog.json";
const DEFAULT_PLAYERS: [&str; 3] = ["player1", "player2", "player3"];
const DEFAULT_ROUNDS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Locale for requests that carry none, and the locale reported for fallback texts
    pub default_locale: Locale,
    pub catalog_path: PathBuf,
    /// Roster used by the demo binary
    pub players: Vec<PlayerName>,
    /// Number of `advance` calls the demo binary performs
    pub rounds: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_locale: Locale::default(),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            players: default_players(),
            rounds: DEFAULT_ROUNDS,
        }
    }
}

impl EngineSettings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(raw) = non_empty(lookup(DEFAULT_LOCALE_VAR)) {
            match Locale::new(&raw) {
                Ok(locale) => settings.default_locale = locale,
                Err(e) => tracing::warn!(
                    variable = DEFAULT_LOCALE_VAR,
                    value = %raw,
                    error = %e,
                    "Invalid locale, using default"
                ),
            }
        }

        if let Some(raw) = non_empty(lookup(CATALOG_PATH_VAR)) {
            settings.catalog_path = PathBuf::from(raw);
        }

        if let Some(raw) = non_empty(lookup(PLAYERS_VAR)) {
            match parse_players(&raw) {
                Some(players) => settings.players = players,
                None => tracing::warn!(
                    variable = PLAYERS_VAR,
                    value = %raw,
                    "Invalid player list, using default roster"
                ),
            }
        }

        if let Some(raw) = non_empty(lookup(ROUNDS_VAR)) {
            match raw.trim().parse::<u32>() {
                Ok(rounds) => settings.rounds = rounds,
                Err(e) => tracing::warn!(
                    variable = ROUNDS_VAR,
                    value = %raw,
                    error = %e,
                    "Invalid round count, using default"
                ),
            }
        }

        settings
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Comma separated, unique, non-empty names.
fn parse_players(raw: &str) -> Option<Vec<PlayerName>> {
    let mut players: Vec<PlayerName> = Vec::new();
    for part in raw.split(',') {
        let player = PlayerName::new(part).ok()?;
        if players.contains(&player) {
            return None;
        }
        players.push(player);
    }
    Some(players)
}

fn default_players() -> Vec<PlayerName> {
    DEFAULT_PLAYERS
        .iter()
        .filter_map(|name| PlayerName::new(*name).ok())
        .collect()
}

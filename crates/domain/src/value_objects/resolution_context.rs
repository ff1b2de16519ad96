//! Resolution context - per-request view of a game session
//!
//! A context names the player a task is rendered for, the full roster and the
//! locale, and fixes a random ordering of the *other* players at construction.
//! Every `{player_<n>}` resolved against the same context therefore names the
//! same person, while two contexts built for the same request differ.
//!
//! Randomness is injected as a closure `pick(upper) -> index in 0..upper` so the
//! domain stays free of RNG dependencies.

use std::collections::{BTreeSet, HashSet};

use crate::error::ResolutionError;

use super::{GameId, Locale, PlayerName};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionContext {
    game_id: GameId,
    current_player: PlayerName,
    players: Vec<PlayerName>,
    locale: Locale,
    other_players_shuffled: Vec<PlayerName>,
}

impl ResolutionContext {
    pub fn builder(game_id: GameId) -> ResolutionContextBuilder {
        ResolutionContextBuilder::new(game_id)
    }

    /// Validate the roster and shuffle the other players.
    ///
    /// # Errors
    ///
    /// - `PlayerNotInRoster` if `current_player` is not in `players`
    /// - `DuplicatePlayer` if `players` contains a name twice
    pub fn build(
        game_id: GameId,
        current_player: PlayerName,
        players: Vec<PlayerName>,
        locale: Locale,
        mut pick: impl FnMut(usize) -> usize,
    ) -> Result<Self, ResolutionError> {
        let mut seen = HashSet::with_capacity(players.len());
        for player in &players {
            if !seen.insert(player) {
                return Err(ResolutionError::DuplicatePlayer {
                    player: player.clone(),
                });
            }
        }
        if !seen.contains(&current_player) {
            return Err(ResolutionError::PlayerNotInRoster {
                player: current_player,
            });
        }

        let mut others: Vec<PlayerName> = players
            .iter()
            .filter(|player| **player != current_player)
            .cloned()
            .collect();
        // Fisher-Yates
        for i in (1..others.len()).rev() {
            let j = pick(i + 1) % (i + 1);
            others.swap(i, j);
        }

        Ok(Self {
            game_id,
            current_player,
            players,
            locale,
            other_players_shuffled: others,
        })
    }

    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    pub fn current_player(&self) -> &PlayerName {
        &self.current_player
    }

    pub fn players(&self) -> &[PlayerName] {
        &self.players
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn other_players_shuffled(&self) -> &[PlayerName] {
        &self.other_players_shuffled
    }

    /// The player bound to `{player_<n>}` (1-based).
    pub fn other_player(&self, n: usize) -> Result<&PlayerName, ResolutionError> {
        n.checked_sub(1)
            .and_then(|index| self.other_players_shuffled.get(index))
            .ok_or(ResolutionError::InsufficientPlayers {
                required: n,
                available: self.other_players_shuffled.len(),
            })
    }

    /// Same players and shuffle, rendered in another locale.
    pub fn with_locale(&self, locale: Locale) -> Self {
        Self {
            locale,
            ..self.clone()
        }
    }

    /// Whether every player of this roster appears in `answered_by`.
    pub fn is_roster_covered_by(&self, answered_by: &BTreeSet<PlayerName>) -> bool {
        self.players.iter().all(|player| answered_by.contains(player))
    }
}

/// Builder mirroring how callers assemble a context from request data.
#[derive(Debug, Clone)]
pub struct ResolutionContextBuilder {
    game_id: GameId,
    player: Option<PlayerName>,
    players: Vec<PlayerName>,
    locale: Locale,
}

impl ResolutionContextBuilder {
    fn new(game_id: GameId) -> Self {
        Self {
            game_id,
            player: None,
            players: Vec::new(),
            locale: Locale::default(),
        }
    }

    pub fn player(mut self, player: PlayerName) -> Self {
        self.player = Some(player);
        self
    }

    pub fn players(mut self, players: Vec<PlayerName>) -> Self {
        self.players = players;
        self
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Build the context, shuffling the other players with `pick`.
    pub fn build(self, pick: impl FnMut(usize) -> usize) -> Result<ResolutionContext, ResolutionError> {
        let player = self
            .player
            .ok_or(ResolutionError::MissingCurrentPlayer)?;
        ResolutionContext::build(self.game_id, player, self.players, self.locale, pick)
    }
}

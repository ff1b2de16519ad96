//! Game task entity - one materialized copy of a catalog entry inside a game
//!
//! ## State machine
//!
//! ```text
//! UNRESOLVED --mark_current--> CURRENT --return_to_pool--> UNRESOLVED
//!                                  \------(removed from the queue)
//! ```
//!
//! Which way a `CURRENT` instance leaves is decided by the queue from the
//! entry's repeat policy; the entity only guards the legal transitions.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entities::RepeatPolicy;
use crate::error::DomainError;
use crate::ids::{GameTaskId, TaskId};
use crate::value_objects::{GameId, PlayerName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameTaskState {
    Unresolved,
    Current,
    Resolved,
}

impl fmt::Display for GameTaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved => write!(f, "UNRESOLVED"),
            Self::Current => write!(f, "CURRENT"),
            Self::Resolved => write!(f, "RESOLVED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameTask {
    pub game_id: GameId,
    pub id: GameTaskId,
    /// Weak reference to the catalog entry
    pub task_id: TaskId,
    pub state: GameTaskState,
    /// Players already served this instance (PER_PLAYER entries only)
    pub answered_by: BTreeSet<PlayerName>,
}

impl GameTask {
    pub fn new(game_id: GameId, id: GameTaskId, task_id: TaskId) -> Self {
        Self {
            game_id,
            id,
            task_id,
            state: GameTaskState::Unresolved,
            answered_by: BTreeSet::new(),
        }
    }

    /// Whether this instance may be served to `player`.
    pub fn is_eligible_for(&self, player: &PlayerName, repeat: RepeatPolicy) -> bool {
        self.state == GameTaskState::Unresolved
            && !(repeat == RepeatPolicy::PerPlayer && self.answered_by.contains(player))
    }

    pub fn mark_current(&mut self) -> Result<(), DomainError> {
        if self.state != GameTaskState::Unresolved {
            return Err(DomainError::invalid_state_transition(format!(
                "Game task {} is {} and cannot become CURRENT",
                self.id, self.state
            )));
        }
        self.state = GameTaskState::Current;
        Ok(())
    }

    /// Put a played instance back into the pool.
    pub fn return_to_pool(&mut self) -> Result<(), DomainError> {
        if self.state != GameTaskState::Current {
            return Err(DomainError::invalid_state_transition(format!(
                "Game task {} is {} and cannot return to the pool",
                self.id, self.state
            )));
        }
        self.state = GameTaskState::Unresolved;
        Ok(())
    }

    /// Mark a played instance as finished; the queue drops it afterwards.
    pub fn resolve(&mut self) -> Result<(), DomainError> {
        if self.state != GameTaskState::Current {
            return Err(DomainError::invalid_state_transition(format!(
                "Game task {} is {} and cannot be resolved",
                self.id, self.state
            )));
        }
        self.state = GameTaskState::Resolved;
        Ok(())
    }
}

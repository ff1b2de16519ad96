//! Aggregate roots - domain objects that own their related data
//!
//! The game task queue owns every task instance of a single game and is the
//! only place where instance states change.

pub mod game_task_queue;

pub use game_task_queue::{AdvanceOutcome, GameTaskQueue, QueueError, RetiredInstance};

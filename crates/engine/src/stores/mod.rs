//! In-memory state storage modules.
//!
//! Stores manage runtime state that is not owned by the catalog:
//! - `GameTaskQueueStore` - per-game task queues behind per-game locks

pub mod game_task_queue;

pub use game_task_queue::{GameTaskQueueStore, QueueSnapshot};

//! Domain entities - Core business objects with identity

mod game_task;
mod task;

pub use game_task::{GameTask, GameTaskState};
pub use task::{Price, RepeatPolicy, Task, TaskBuilder, TaskKey, TaskType, Timer};

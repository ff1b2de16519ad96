//! Task game domain
//!
//! Pure types and state machines for serving party-game tasks:
//! placeholder templates and their resolution, catalog entries, per-game
//! task instances and the queue that serves them. No I/O lives here; the
//! engine crate supplies storage, randomness and time through ports.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod ids;
pub mod resolver;
pub mod value_objects;

pub use aggregates::{AdvanceOutcome, GameTaskQueue, QueueError, RetiredInstance};

pub use entities::{
    GameTask, GameTaskState, Price, RepeatPolicy, Task, TaskBuilder, TaskKey, TaskType, Timer,
};

pub use error::{DomainError, ResolutionError};

pub use ids::{GameTaskId, TaskId};

pub use resolver::{render, render_source, render_template, RenderedText};

pub use value_objects::{
    GameId, Locale, LocalizedTemplates, Placeholder, PlayerName, RenderedTask,
    ResolutionContext, ResolutionContextBuilder, Segment, Template, TemplateError,
    DEFAULT_LOCALE,
};

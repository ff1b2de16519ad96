//! Task game engine library.
//!
//! Serves party-game tasks from per-game queues built out of a task catalog.
//!
//! ## Structure
//!
//! - `entities/` - Entity modules wrapping domain operations
//! - `use_cases/` - User story orchestration across entities
//! - `stores/` - In-memory per-game queue state
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `app` - Application composition

pub mod app;
pub mod entities;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

/// End-to-end flow tests over the in-memory adapters.
#[cfg(test)]
mod e2e_tests;

pub use app::App;

//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Catalog storage (entries and their locale variants)
//! - Clock/Random (for testing)

mod error;
mod repos;
mod testing;

pub use error::RepoError;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{CatalogRepo, LocaleTextRepo};

#[cfg(test)]
pub use repos::{MockCatalogRepo, MockLocaleTextRepo};

// =============================================================================
// Testability Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

#[cfg(test)]
pub use testing::MockClockPort;

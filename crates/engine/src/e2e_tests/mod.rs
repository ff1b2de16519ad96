//! End-to-end flow tests.
//!
//! These tests drive a fully composed `App` over the in-memory catalog:
//! - Generating game pools from the catalog
//! - Serving and advancing tasks for several players
//! - Concurrent requests against one game
//!
//! # Running E2E Tests
//!
//! ```bash
//! cargo test -p taskgame-engine --lib e2e_tests
//! ```

mod e2e_helpers;
mod gameplay_flow_tests;

pub use e2e_helpers::*;

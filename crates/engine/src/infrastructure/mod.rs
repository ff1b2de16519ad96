//! Infrastructure - port traits and their implementations.

pub mod catalog;
pub mod clock;
pub mod ports;
pub mod settings;

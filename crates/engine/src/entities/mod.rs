//! Entity modules wrapping domain operations.

pub mod catalog;

pub use catalog::{Catalog, CatalogError};

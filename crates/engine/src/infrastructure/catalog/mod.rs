//! Catalog adapters.
//!
//! - `InMemoryCatalog` - catalog entries and locale variants held in process
//! - `json` - loading catalog entries from a JSON file

pub mod json;
mod memory;

pub use json::{load_catalog_file, parse_catalog};
pub use memory::InMemoryCatalog;

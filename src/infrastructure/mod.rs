//! Infrastructure layer
//!
//! Catalog sources: TOML file loading and the in-memory repository.

pub mod catalog;

pub use catalog::{load_catalog, parse_catalog, InMemoryCatalog};

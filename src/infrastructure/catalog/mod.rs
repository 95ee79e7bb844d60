pub mod loader;
pub mod memory;

pub use loader::{load_catalog, parse_catalog};
pub use memory::InMemoryCatalog;

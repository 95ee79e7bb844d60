//! Catalog aggregate
//!
//! Plans and plugins offered for subscription, with their raw prices.

pub mod model;
pub mod repository;

pub use model::{Catalog, Plan, Plugin};
pub use repository::CatalogRepository;

//! Catalog module: plans and plugins with display pricing

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;

//! Pricing module: subscription quotes and price normalization

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;

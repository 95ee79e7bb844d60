//! HTTP REST API
//!
//! - `common`: response envelope, error mapping, validated JSON extractor
//! - `modules`: handlers and DTOs per resource, plus middleware
//! - `router`: route table with Swagger documentation

pub mod common;
pub mod modules;
pub mod router;

pub use router::create_api_router;

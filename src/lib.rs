//! # ERP Subscription Pricing
//!
//! Price previews for the subscription checkout of a multi-store ERP:
//! plan tier, additional stores and plugins, billed monthly or yearly,
//! with VAT on top.
//!
//! ## Architecture
//!
//! - **domain**: the pure pricing engine (`normalize_pricing`,
//!   `calculate_total`) and catalog entities
//! - **application**: `PricingService`, resolving selections against the catalog
//! - **infrastructure**: catalog loading (TOML) and the in-memory repository
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime bootstrap shared by the service binary and the CLI

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use application::{PricingService, Quote, QuoteRequest};
pub use config::{default_config_path, AppConfig};
pub use domain::{
    calculate_total, normalize_pricing, BillingPeriod, DerivedPricing, PlanPricing,
    PriceableUnit, TotalBreakdown, TotalCalculationInput,
};
pub use interfaces::http::create_api_router;
pub use shared::errors::{AppError, DomainError, InfraError};

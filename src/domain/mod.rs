//! Domain layer: pricing engine and catalog entities

pub mod catalog;
pub mod pricing;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogRepository, Plan, Plugin};
pub use pricing::{
    calculate_total, normalize_pricing, BillingPeriod, DerivedPricing, PlanPricing,
    PriceableUnit, TotalBreakdown, TotalCalculationInput, DEFAULT_VAT_PERCENT,
};

pub use crate::shared::errors::{DomainError, DomainResult};

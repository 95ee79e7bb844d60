//! Subscription pricing engine
//!
//! Pure functions over immutable values: [`normalize_pricing`] for catalog
//! display and [`calculate_total`] for checkout previews.

pub mod model;
pub mod normalize;
pub mod total;

pub use model::{
    round_money, BillingPeriod, DerivedPricing, PlanPricing, PriceableUnit, TotalBreakdown,
    TotalCalculationInput, DEFAULT_VAT_PERCENT, MONEY_DECIMAL_PLACES,
};
pub use normalize::normalize_pricing;
pub use total::{calculate_total, plugins_subtotal};

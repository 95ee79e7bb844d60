//! Application services

mod pricing;

pub use pricing::{
    CatalogOverview, PlanOffer, PluginOffer, PricingService, Quote, QuoteLine, QuoteLineKind,
    QuoteRequest,
};

//! Catalog DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::services::{CatalogOverview, PlanOffer, PluginOffer};
use crate::interfaces::http::modules::pricing::DerivedPricingResponse;

/// Plan card on the pricing page
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlanOfferResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub included_stores: u32,
    pub is_active: bool,
    pub allows_extra_stores: bool,
    /// `null` for a plan without prices
    pub pricing: Option<DerivedPricingResponse>,
    /// Per-store price beyond `included_stores`
    pub extra_store_pricing: Option<DerivedPricingResponse>,
}

impl From<PlanOffer> for PlanOfferResponse {
    fn from(offer: PlanOffer) -> Self {
        let allows_extra_stores = offer.plan.allows_extra_stores();
        Self {
            id: offer.plan.id,
            name: offer.plan.name,
            description: offer.plan.description,
            included_stores: offer.plan.included_stores,
            is_active: offer.plan.is_active,
            allows_extra_stores,
            pricing: offer.pricing.map(Into::into),
            extra_store_pricing: offer.extra_store_pricing.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PluginOfferResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub pricing: Option<DerivedPricingResponse>,
}

impl From<PluginOffer> for PluginOfferResponse {
    fn from(offer: PluginOffer) -> Self {
        Self {
            id: offer.plugin.id,
            name: offer.plugin.name,
            description: offer.plugin.description,
            pricing: offer.pricing.map(Into::into),
        }
    }
}

/// Everything currently on sale
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CatalogResponse {
    pub currency: String,
    /// VAT rate applied when a quote does not override it
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 24)]
    pub default_vat_percent: Decimal,
    pub plans: Vec<PlanOfferResponse>,
    pub plugins: Vec<PluginOfferResponse>,
}

impl CatalogResponse {
    pub fn new(overview: CatalogOverview, default_vat_percent: Decimal) -> Self {
        Self {
            currency: overview.currency,
            default_vat_percent,
            plans: overview.plans.into_iter().map(Into::into).collect(),
            plugins: overview.plugins.into_iter().map(Into::into).collect(),
        }
    }
}

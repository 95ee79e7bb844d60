//! Pricing service: subscription quotes and catalog display pricing

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::pricing::round_money;
use crate::domain::{
    calculate_total, normalize_pricing, BillingPeriod, CatalogRepository, DerivedPricing,
    DomainError, DomainResult, Plan, Plugin, PriceableUnit, TotalBreakdown,
    TotalCalculationInput,
};

/// What the checkout screen asks a quote for
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub plan_id: String,
    pub billing_period: BillingPeriod,
    pub extra_stores: i32,
    pub plugin_ids: Vec<String>,
    /// Overrides the configured default VAT rate
    pub vat_percent: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteLineKind {
    Plan,
    ExtraStores,
    Plugin,
    /// Difference between the per-line cent amounts and the subtotal
    RoundingAdjustment,
}

/// One itemized row of a quote
#[derive(Debug, Clone, Serialize)]
pub struct QuoteLine {
    pub kind: QuoteLineKind,
    pub reference_id: String,
    pub description: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    /// `unit_price * quantity`, rounded to cents
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Subscription price preview.
///
/// Advisory only: the billing backend recomputes and persists the amount
/// actually charged.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub quote_id: Uuid,
    pub plan_id: String,
    pub billing_period: BillingPeriod,
    pub currency: String,
    pub lines: Vec<QuoteLine>,
    pub breakdown: TotalBreakdown,
    pub preview_only: bool,
    pub generated_at: DateTime<Utc>,
}

/// A plan as shown on the pricing page
#[derive(Debug, Clone, Serialize)]
pub struct PlanOffer {
    pub plan: Plan,
    pub pricing: Option<DerivedPricing>,
    pub extra_store_pricing: Option<DerivedPricing>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PluginOffer {
    pub plugin: Plugin,
    pub pricing: Option<DerivedPricing>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogOverview {
    pub currency: String,
    pub plans: Vec<PlanOffer>,
    pub plugins: Vec<PluginOffer>,
}

/// Service for quoting subscriptions against the catalog
pub struct PricingService {
    catalog: Arc<dyn CatalogRepository>,
    default_vat_percent: Decimal,
}

impl PricingService {
    pub fn new(catalog: Arc<dyn CatalogRepository>, default_vat_percent: Decimal) -> Self {
        Self {
            catalog,
            default_vat_percent,
        }
    }

    pub fn default_vat_percent(&self) -> Decimal {
        self.default_vat_percent
    }

    pub fn currency(&self) -> &str {
        self.catalog.currency()
    }

    /// Resolve the request against the catalog and price it.
    pub async fn quote(&self, request: QuoteRequest) -> DomainResult<Quote> {
        let period = request.billing_period;

        let plan = self
            .catalog
            .find_plan(&request.plan_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Plan", request.plan_id.as_str()))?;

        if !plan.is_active {
            return Err(DomainError::Inactive {
                entity: "Plan",
                id: plan.id,
            });
        }

        let pricing = plan.pricing();
        ensure_offered("Plan", &plan.id, &pricing.tier(), period)?;

        if request.extra_stores > 0 && pricing.extra_store_price_for(period).is_none() {
            return Err(DomainError::Validation(format!(
                "plan '{}' does not offer extra stores on {} billing",
                plan.id, period
            )));
        }

        let vat_percent = request.vat_percent.unwrap_or(self.default_vat_percent);
        if vat_percent < Decimal::ZERO || vat_percent > Decimal::ONE_HUNDRED {
            return Err(DomainError::Validation(format!(
                "vat_percent must be within 0..=100, got {}",
                vat_percent
            )));
        }

        let plugins = self.resolve_plugins(&request.plugin_ids, period).await?;

        let input = TotalCalculationInput {
            plan: pricing,
            billing_period: period,
            extra_stores: request.extra_stores,
            plugins: plugins.iter().map(Plugin::unit).collect(),
            vat_percent: Some(vat_percent),
        };
        let breakdown = calculate_total(&input);
        let lines = quote_lines(&plan, request.extra_stores, &plugins, period, breakdown.subtotal);

        let quote = Quote {
            quote_id: Uuid::new_v4(),
            plan_id: plan.id.clone(),
            billing_period: period,
            currency: self.catalog.currency().to_string(),
            lines,
            breakdown,
            preview_only: true,
            generated_at: Utc::now(),
        };

        metrics::counter!("pricing_quotes_total", "billing_period" => period.as_str())
            .increment(1);

        info!(
            quote_id = %quote.quote_id,
            plan_id = quote.plan_id.as_str(),
            billing_period = period.as_str(),
            extra_stores = request.extra_stores,
            plugins = plugins.len(),
            subtotal = %breakdown.subtotal,
            vat_amount = %breakdown.vat_amount,
            total = %breakdown.total,
            currency = quote.currency.as_str(),
            "Subscription quote calculated"
        );

        Ok(quote)
    }

    /// Active plans and plugins with their display pricing.
    pub async fn catalog_overview(&self) -> DomainResult<CatalogOverview> {
        let plans = self
            .catalog
            .list_plans()
            .await?
            .into_iter()
            .filter(|p| p.is_active)
            .map(plan_offer)
            .collect();

        let plugins = self
            .catalog
            .list_plugins()
            .await?
            .into_iter()
            .filter(|p| p.is_active)
            .map(|plugin| PluginOffer {
                pricing: normalize_pricing(plugin.price_monthly, plugin.price_yearly),
                plugin,
            })
            .collect();

        Ok(CatalogOverview {
            currency: self.catalog.currency().to_string(),
            plans,
            plugins,
        })
    }

    /// One plan with its display pricing, active or not.
    pub async fn plan_offer(&self, plan_id: &str) -> DomainResult<PlanOffer> {
        let plan = self
            .catalog
            .find_plan(plan_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Plan", plan_id))?;
        Ok(plan_offer(plan))
    }

    pub fn normalize(&self, monthly: Option<Decimal>, yearly: Option<Decimal>) -> Option<DerivedPricing> {
        normalize_pricing(monthly, yearly)
    }

    async fn resolve_plugins(
        &self,
        plugin_ids: &[String],
        period: BillingPeriod,
    ) -> DomainResult<Vec<Plugin>> {
        let mut seen = HashSet::new();
        let mut plugins = Vec::with_capacity(plugin_ids.len());

        for id in plugin_ids {
            if !seen.insert(id.as_str()) {
                return Err(DomainError::Validation(format!(
                    "plugin '{}' selected more than once",
                    id
                )));
            }

            let plugin = self
                .catalog
                .find_plugin(id)
                .await?
                .ok_or_else(|| DomainError::not_found("Plugin", id.as_str()))?;

            if !plugin.is_active {
                return Err(DomainError::Inactive {
                    entity: "Plugin",
                    id: plugin.id,
                });
            }
            ensure_offered("Plugin", &plugin.id, &plugin.unit(), period)?;

            debug!(plugin_id = plugin.id.as_str(), "Plugin resolved for quote");
            plugins.push(plugin);
        }

        Ok(plugins)
    }
}

fn plan_offer(plan: Plan) -> PlanOffer {
    PlanOffer {
        pricing: normalize_pricing(plan.price_monthly, plan.price_yearly),
        extra_store_pricing: normalize_pricing(
            plan.extra_store_price_monthly,
            plan.extra_store_price_yearly,
        ),
        plan,
    }
}

/// A unit priced for one period only cannot be billed on the other.
/// Units with no price at all are free and always offered.
fn ensure_offered(
    entity: &'static str,
    id: &str,
    unit: &PriceableUnit,
    period: BillingPeriod,
) -> DomainResult<()> {
    let has_any_price = unit.price_monthly.is_some() || unit.price_yearly.is_some();
    if has_any_price && unit.price_for(period).is_none() {
        return Err(DomainError::Validation(format!(
            "{} '{}' is not offered on {} billing",
            entity.to_lowercase(),
            id,
            period
        )));
    }
    Ok(())
}

/// Itemize a quote. Line amounts are rounded to cents one by one, so a
/// `RoundingAdjustment` line is appended whenever their sum differs from
/// `subtotal`; the lines always add up to it.
fn quote_lines(
    plan: &Plan,
    extra_stores: i32,
    plugins: &[Plugin],
    period: BillingPeriod,
    subtotal: Decimal,
) -> Vec<QuoteLine> {
    let line = |kind, reference_id: &str, description: String, quantity: i32, unit_price: Decimal| {
        QuoteLine {
            kind,
            reference_id: reference_id.to_string(),
            description,
            quantity,
            unit_price,
            amount: round_money(unit_price.saturating_mul(Decimal::from(quantity))),
        }
    };

    let mut lines = Vec::with_capacity(plugins.len() + 3);
    let pricing = plan.pricing();

    lines.push(line(
        QuoteLineKind::Plan,
        &plan.id,
        format!("{} plan ({})", plan.name, period),
        1,
        pricing.price_for(period).unwrap_or(Decimal::ZERO),
    ));

    if extra_stores > 0 {
        lines.push(line(
            QuoteLineKind::ExtraStores,
            &plan.id,
            format!("Additional stores beyond {} included", plan.included_stores),
            extra_stores,
            pricing.extra_store_price_for(period).unwrap_or(Decimal::ZERO),
        ));
    }

    for plugin in plugins {
        lines.push(line(
            QuoteLineKind::Plugin,
            &plugin.id,
            plugin.name.clone(),
            1,
            plugin.unit().price_for(period).unwrap_or(Decimal::ZERO),
        ));
    }

    let itemized = lines
        .iter()
        .map(|l| l.amount)
        .fold(Decimal::ZERO, Decimal::saturating_add);
    let adjustment = subtotal.saturating_sub(itemized);
    if !adjustment.is_zero() {
        lines.push(line(
            QuoteLineKind::RoundingAdjustment,
            &plan.id,
            "Rounding adjustment".to_string(),
            1,
            adjustment,
        ));
    }

    lines
}

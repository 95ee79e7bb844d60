//! Plan & plugin catalog entities

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::pricing::{normalize_pricing, PlanPricing, PriceableUnit};
use crate::shared::errors::{DomainError, DomainResult};

fn default_true() -> bool {
    true
}

fn default_included_stores() -> u32 {
    1
}

fn default_currency() -> String {
    "EUR".to_string()
}

/// Subscription plan tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price_monthly: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price_yearly: Option<Decimal>,
    /// Price of one store beyond `included_stores`; absent when the plan
    /// cannot be extended.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub extra_store_price_monthly: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub extra_store_price_yearly: Option<Decimal>,
    #[serde(default = "default_included_stores")]
    pub included_stores: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Plan {
    pub fn pricing(&self) -> PlanPricing {
        PlanPricing {
            price_monthly: self.price_monthly,
            price_yearly: self.price_yearly,
            extra_store_price_monthly: self.extra_store_price_monthly,
            extra_store_price_yearly: self.extra_store_price_yearly,
        }
    }

    pub fn allows_extra_stores(&self) -> bool {
        self.extra_store_price_monthly.is_some() || self.extra_store_price_yearly.is_some()
    }
}

/// Optional add-on module billed on top of a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugin {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price_monthly: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price_yearly: Option<Decimal>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Plugin {
    pub fn unit(&self) -> PriceableUnit {
        PriceableUnit::new(self.price_monthly, self.price_yearly)
    }
}

/// Complete price list: currency plus every plan and plugin on offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub plans: Vec<Plan>,
    #[serde(default)]
    pub plugins: Vec<Plugin>,
}

impl Catalog {
    /// Reject catalogs a lookup by id could not serve unambiguously, or
    /// whose price pairs have no representable yearly discount.
    pub fn validate(&self) -> DomainResult<()> {
        if self.currency.trim().is_empty() {
            return Err(DomainError::Validation(
                "catalog currency must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for plan in &self.plans {
            if plan.id.trim().is_empty() {
                return Err(DomainError::Validation("plan id must not be empty".to_string()));
            }
            if !seen.insert(plan.id.as_str()) {
                return Err(DomainError::Validation(format!(
                    "duplicate plan id '{}'",
                    plan.id
                )));
            }
            check_discount_range("plan", &plan.id, plan.price_monthly, plan.price_yearly)?;
        }

        let mut seen = HashSet::new();
        for plugin in &self.plugins {
            if plugin.id.trim().is_empty() {
                return Err(DomainError::Validation(
                    "plugin id must not be empty".to_string(),
                ));
            }
            if !seen.insert(plugin.id.as_str()) {
                return Err(DomainError::Validation(format!(
                    "duplicate plugin id '{}'",
                    plugin.id
                )));
            }
            check_discount_range("plugin", &plugin.id, plugin.price_monthly, plugin.price_yearly)?;
        }

        Ok(())
    }
}

/// Both prices set, yet the discount overflowed (`monthly * 12` or the
/// percent fell outside the `Decimal` / `i64` range).
fn check_discount_range(
    entity: &str,
    id: &str,
    monthly: Option<Decimal>,
    yearly: Option<Decimal>,
) -> DomainResult<()> {
    let both_present = matches!((monthly, yearly), (Some(m), Some(y)) if !m.is_zero() && !y.is_zero());
    let discount = normalize_pricing(monthly, yearly).and_then(|p| p.yearly_discount_percent);

    if both_present && discount.is_none() {
        return Err(DomainError::Validation(format!(
            "{} '{}': monthly and yearly prices are too far apart to derive a yearly discount",
            entity, id
        )));
    }
    Ok(())
}

impl Default for Catalog {
    /// Built-in price list used when no catalog file is configured.
    fn default() -> Self {
        let plan = |id: &str, name: &str, m: i64, y: i64, sm: i64, sy: i64, stores: u32| Plan {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            price_monthly: Some(Decimal::from(m)),
            price_yearly: Some(Decimal::from(y)),
            extra_store_price_monthly: Some(Decimal::from(sm)),
            extra_store_price_yearly: Some(Decimal::from(sy)),
            included_stores: stores,
            is_active: true,
        };
        let plugin = |id: &str, name: &str, m: i64, y: i64| Plugin {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            price_monthly: Some(Decimal::from(m)),
            price_yearly: Some(Decimal::from(y)),
            is_active: true,
        };

        Self {
            currency: default_currency(),
            plans: vec![
                plan("starter", "Starter", 29, 290, 10, 100, 1),
                plan("business", "Business", 59, 590, 15, 150, 3),
                plan("enterprise", "Enterprise", 129, 1290, 20, 200, 10),
            ],
            plugins: vec![
                plugin("pos", "Point of Sale", 15, 150),
                plugin("e-invoicing", "E-Invoicing", 10, 100),
                plugin("loyalty", "Customer Loyalty", 5, 50),
                plugin("warehouse", "Multi-Warehouse", 20, 200),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_valid() {
        let catalog = Catalog::default();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.currency, "EUR");
        assert!(catalog.plans.iter().all(Plan::allows_extra_stores));
    }

    #[test]
    fn duplicate_plan_ids_are_rejected() {
        let mut catalog = Catalog::default();
        let dup = catalog.plans[0].clone();
        catalog.plans.push(dup);

        let err = catalog.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate plan id 'starter'"));
    }

    #[test]
    fn empty_plugin_id_is_rejected() {
        let mut catalog = Catalog::default();
        catalog.plugins[0].id = "  ".to_string();
        assert!(matches!(catalog.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn empty_currency_is_rejected() {
        let catalog = Catalog {
            currency: String::new(),
            plans: vec![],
            plugins: vec![],
        };
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn plan_pricing_copies_all_columns() {
        let plan = &Catalog::default().plans[1];
        let pricing = plan.pricing();
        assert_eq!(pricing.price_monthly, Some(Decimal::from(59)));
        assert_eq!(pricing.extra_store_price_yearly, Some(Decimal::from(150)));
    }

    #[test]
    fn plan_price_that_cannot_be_annualized_is_rejected() {
        let mut catalog = Catalog::default();
        catalog.plans[0].price_monthly = Some(Decimal::MAX);

        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(err.to_string().contains("plan 'starter'"));
    }

    #[test]
    fn plugin_discount_beyond_i64_is_rejected() {
        let mut catalog = Catalog::default();
        catalog.plugins[0].price_monthly = Some(Decimal::new(1, 10));
        catalog.plugins[0].price_yearly = Some(Decimal::from(1_000_000_000_000i64));

        let err = catalog.validate().unwrap_err();
        assert!(err.to_string().contains("plugin 'pos'"));
    }

    #[test]
    fn single_huge_price_is_accepted() {
        let mut catalog = Catalog::default();
        catalog.plans[0].price_monthly = Some(Decimal::MAX);
        catalog.plans[0].price_yearly = None;
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn plan_without_extra_store_prices_cannot_be_extended() {
        let mut plan = Catalog::default().plans[0].clone();
        plan.extra_store_price_monthly = None;
        plan.extra_store_price_yearly = None;
        assert!(!plan.allows_extra_stores());
    }
}

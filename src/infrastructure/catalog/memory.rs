//! In-memory catalog implementation

use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;

use crate::domain::{Catalog, CatalogRepository, DomainResult, Plan, Plugin};

/// Catalog held in memory, loaded once at startup
pub struct InMemoryCatalog {
    currency: String,
    plans: DashMap<String, Plan>,
    plugins: DashMap<String, Plugin>,
}

impl InMemoryCatalog {
    /// Build from an already validated catalog.
    pub fn new(catalog: Catalog) -> Self {
        let plans = DashMap::new();
        for plan in catalog.plans {
            plans.insert(plan.id.clone(), plan);
        }

        let plugins = DashMap::new();
        for plugin in catalog.plugins {
            plugins.insert(plugin.id.clone(), plugin);
        }

        Self {
            currency: catalog.currency,
            plans,
            plugins,
        }
    }

    /// Seeded with the built-in price list.
    pub fn with_defaults() -> Self {
        Self::new(Catalog::default())
    }

    pub fn plan_count(&self) -> usize {
        self.plans.len()
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn find_plan(&self, id: &str) -> DomainResult<Option<Plan>> {
        Ok(self.plans.get(id).map(|p| p.value().clone()))
    }

    /// Cheapest monthly price first.
    async fn list_plans(&self) -> DomainResult<Vec<Plan>> {
        let mut plans: Vec<Plan> = self.plans.iter().map(|p| p.value().clone()).collect();
        plans.sort_by(|a, b| {
            a.price_monthly
                .unwrap_or(Decimal::ZERO)
                .cmp(&b.price_monthly.unwrap_or(Decimal::ZERO))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(plans)
    }

    async fn find_plugin(&self, id: &str) -> DomainResult<Option<Plugin>> {
        Ok(self.plugins.get(id).map(|p| p.value().clone()))
    }

    /// Alphabetical by display name.
    async fn list_plugins(&self) -> DomainResult<Vec<Plugin>> {
        let mut plugins: Vec<Plugin> = self.plugins.iter().map(|p| p.value().clone()).collect();
        plugins.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(plugins)
    }

    fn currency(&self) -> &str {
        &self.currency
    }
}

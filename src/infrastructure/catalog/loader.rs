//! Catalog file loading
//!
//! The price list is a TOML document:
//!
//! ```toml
//! currency = "EUR"
//!
//! [[plans]]
//! id = "starter"
//! name = "Starter"
//! price_monthly = 29
//! price_yearly = 290
//! extra_store_price_monthly = 10
//! extra_store_price_yearly = 100
//!
//! [[plugins]]
//! id = "pos"
//! name = "Point of Sale"
//! price_monthly = 15
//! price_yearly = 150
//! ```

use std::path::Path;

use tracing::info;

use crate::domain::Catalog;
use crate::shared::errors::InfraError;

/// Parse and validate a catalog document.
pub fn parse_catalog(content: &str) -> Result<Catalog, InfraError> {
    let catalog: Catalog = toml::from_str(content)?;
    catalog
        .validate()
        .map_err(|e| InfraError::Config(e.to_string()))?;
    Ok(catalog)
}

/// Read, parse and validate a catalog file.
pub fn load_catalog(path: &Path) -> Result<Catalog, InfraError> {
    let content = std::fs::read_to_string(path)?;
    let catalog = parse_catalog(&content)?;

    info!(
        path = %path.display(),
        plans = catalog.plans.len(),
        plugins = catalog.plugins.len(),
        currency = catalog.currency.as_str(),
        "Catalog loaded"
    );

    Ok(catalog)
}

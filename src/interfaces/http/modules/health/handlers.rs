//! Health check handler

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::services::PricingService;

#[derive(Clone)]
pub struct HealthState {
    pub service: Arc<PricingService>,
    pub started_at: Arc<Instant>,
}

/// Service health response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub catalog: CatalogHealth,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CatalogHealth {
    pub status: String,
    pub currency: String,
    pub active_plans: usize,
    pub active_plugins: usize,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Catalog unavailable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let uptime = state.started_at.elapsed().as_secs();
    let currency = state.service.currency().to_string();

    let catalog = match state.service.catalog_overview().await {
        Ok(overview) if !overview.plans.is_empty() => CatalogHealth {
            status: "ok".to_string(),
            currency,
            active_plans: overview.plans.len(),
            active_plugins: overview.plugins.len(),
        },
        // Nothing can be quoted without an active plan
        Ok(overview) => CatalogHealth {
            status: "empty".to_string(),
            currency,
            active_plans: 0,
            active_plugins: overview.plugins.len(),
        },
        Err(_) => CatalogHealth {
            status: "error".to_string(),
            currency,
            active_plans: 0,
            active_plugins: 0,
        },
    };

    let (http_status, overall) = if catalog.status == "ok" {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        http_status,
        Json(HealthResponse {
            status: overall.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: uptime,
            catalog,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Catalog;
    use crate::infrastructure::InMemoryCatalog;
    use rust_decimal::Decimal;

    fn state(catalog: Catalog) -> HealthState {
        HealthState {
            service: Arc::new(PricingService::new(
                Arc::new(InMemoryCatalog::new(catalog)),
                Decimal::from(24),
            )),
            started_at: Arc::new(Instant::now()),
        }
    }

    #[tokio::test]
    async fn default_catalog_is_healthy() {
        let (status, Json(body)) = health_check(State(state(Catalog::default()))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.catalog.currency, "EUR");
        assert_eq!(body.catalog.active_plans, 3);
        assert_eq!(body.catalog.active_plugins, 4);
    }

    #[tokio::test]
    async fn catalog_without_plans_is_degraded() {
        let empty = Catalog {
            currency: "USD".to_string(),
            plans: vec![],
            plugins: vec![],
        };
        let (status, Json(body)) = health_check(State(state(empty))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "degraded");
        assert_eq!(body.catalog.status, "empty");
        assert_eq!(body.catalog.currency, "USD");
    }
}

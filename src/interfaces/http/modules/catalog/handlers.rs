//! Catalog REST API handlers

use axum::{
    extract::{Path, State},
    Json,
};

use super::dto::{CatalogResponse, PlanOfferResponse};
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse};
use crate::interfaces::http::modules::pricing::PricingState;

/// Active plans and plugins with their monthly/yearly display pricing
#[utoipa::path(
    get,
    path = "/api/v1/catalog",
    tag = "Catalog",
    responses(
        (status = 200, description = "Current catalog", body = ApiResponse<CatalogResponse>)
    )
)]
pub async fn get_catalog(
    State(state): State<PricingState>,
) -> Result<Json<ApiResponse<CatalogResponse>>, ApiError> {
    let overview = state
        .service
        .catalog_overview()
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(CatalogResponse::new(
        overview,
        state.service.default_vat_percent(),
    ))))
}

/// One plan by id, including retired plans
#[utoipa::path(
    get,
    path = "/api/v1/catalog/plans/{id}",
    tag = "Catalog",
    params(("id" = String, Path, description = "Plan ID")),
    responses(
        (status = 200, description = "Plan found", body = ApiResponse<PlanOfferResponse>),
        (status = 404, description = "Plan not found")
    )
)]
pub async fn get_plan(
    State(state): State<PricingState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PlanOfferResponse>>, ApiError> {
    let offer = state.service.plan_offer(&id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(offer.into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    use crate::application::services::PricingService;
    use crate::domain::{Catalog, Plan};
    use crate::infrastructure::InMemoryCatalog;

    fn app_with(catalog: Catalog) -> Router {
        let service = PricingService::new(Arc::new(InMemoryCatalog::new(catalog)), Decimal::from(24));
        Router::new()
            .route("/catalog", get(get_catalog))
            .route("/catalog/plans/{id}", get(get_plan))
            .with_state(PricingState {
                service: Arc::new(service),
            })
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn retired_catalog() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.plans.push(Plan {
            id: "legacy".to_string(),
            name: "Legacy".to_string(),
            description: None,
            price_monthly: Some(Decimal::from(19)),
            price_yearly: None,
            extra_store_price_monthly: None,
            extra_store_price_yearly: None,
            included_stores: 1,
            is_active: false,
        });
        catalog
    }

    #[tokio::test]
    async fn catalog_lists_active_plans_with_pricing() {
        let (status, body) = get_json(app_with(retired_catalog()), "/catalog").await;

        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["currency"], "EUR");
        assert_eq!(data["default_vat_percent"], serde_json::json!(24.0));

        let plans = data["plans"].as_array().unwrap();
        assert_eq!(plans.len(), 3);
        assert!(plans.iter().all(|p| p["id"] != "legacy"));
        assert_eq!(plans[0]["id"], "starter");
        // 290 / 12 and 1 - 290 / 348
        assert_eq!(plans[0]["pricing"]["display_monthly_from_yearly"], serde_json::json!(24.17));
        assert_eq!(plans[0]["pricing"]["yearly_discount_percent"], 17);
        assert_eq!(plans[0]["allows_extra_stores"], true);

        assert_eq!(data["plugins"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn retired_plan_is_still_readable_by_id() {
        let (status, body) = get_json(app_with(retired_catalog()), "/catalog/plans/legacy").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["is_active"], false);
        assert_eq!(body["data"]["pricing"]["monthly"], serde_json::json!(19.0));
        assert!(body["data"]["pricing"]["yearly_discount_percent"].is_null());
        assert!(body["data"]["extra_store_pricing"].is_null());
    }

    #[tokio::test]
    async fn unknown_plan_is_404() {
        let (status, body) = get_json(app_with(Catalog::default()), "/catalog/plans/nope").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Not found: Plan with id=nope");
    }
}

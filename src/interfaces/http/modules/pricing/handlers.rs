//! Pricing REST API handlers

use std::sync::Arc;

use axum::{extract::State, Json};

use super::dto::{DerivedPricingResponse, NormalizeRequest, QuoteRequestDto, QuoteResponse};
use crate::application::services::PricingService;
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse, ValidatedJson};

/// State shared by the pricing and catalog routes
#[derive(Clone)]
pub struct PricingState {
    pub service: Arc<PricingService>,
}

/// Price a subscription
///
/// Resolves the plan and plugins against the catalog and returns the
/// subtotal / VAT / total breakdown with itemized lines. The result is a
/// preview for the checkout screen; billing recomputes the charged amount.
#[utoipa::path(
    post,
    path = "/api/v1/pricing/quote",
    tag = "Pricing",
    request_body = QuoteRequestDto,
    responses(
        (status = 200, description = "Quote calculated", body = ApiResponse<QuoteResponse>),
        (status = 400, description = "Malformed JSON"),
        (status = 404, description = "Unknown plan or plugin"),
        (status = 409, description = "Plan or plugin no longer offered"),
        (status = 422, description = "Invalid selection")
    )
)]
pub async fn quote(
    State(state): State<PricingState>,
    ValidatedJson(req): ValidatedJson<QuoteRequestDto>,
) -> Result<Json<ApiResponse<QuoteResponse>>, ApiError> {
    let quote = state.service.quote(req.into()).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(quote.into())))
}

/// Normalize a monthly/yearly price pair
///
/// Returns the monthly equivalent of the yearly price and the yearly
/// discount. `data` is `null` when neither price is set.
#[utoipa::path(
    post,
    path = "/api/v1/pricing/normalize",
    tag = "Pricing",
    request_body = NormalizeRequest,
    responses(
        (status = 200, description = "Derived pricing", body = ApiResponse<DerivedPricingResponse>),
        (status = 400, description = "Malformed JSON")
    )
)]
pub async fn normalize(
    State(state): State<PricingState>,
    ValidatedJson(req): ValidatedJson<NormalizeRequest>,
) -> Json<ApiResponse<Option<DerivedPricingResponse>>> {
    let derived = state
        .service
        .normalize(req.price_monthly, req.price_yearly)
        .map(Into::into);

    match derived {
        Some(pricing) => Json(ApiResponse::success(Some(pricing))),
        None => Json(ApiResponse {
            success: true,
            data: None,
            error: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryCatalog;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    fn app() -> Router {
        let service = PricingService::new(Arc::new(InMemoryCatalog::with_defaults()), Decimal::from(24));
        Router::new()
            .route("/quote", post(quote))
            .route("/normalize", post(normalize))
            .with_state(PricingState {
                service: Arc::new(service),
            })
    }

    async fn post_json(uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn quote_returns_breakdown() {
        let (status, body) = post_json(
            "/quote",
            serde_json::json!({
                "plan_id": "starter",
                "billing_period": "monthly",
                "extra_stores": 2,
                "plugin_ids": ["pos", "loyalty"]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        // 29 + 2 * 10 + 15 + 5
        assert_eq!(data["breakdown"]["subtotal"], serde_json::json!(69.0));
        assert_eq!(data["breakdown"]["vat_amount"], serde_json::json!(16.56));
        assert_eq!(data["breakdown"]["total"], serde_json::json!(85.56));
        assert_eq!(data["formatted_total"], "85.56 EUR");
        assert_eq!(data["preview_only"], true);
        assert_eq!(data["lines"].as_array().unwrap().len(), 4);
        assert_eq!(data["lines"][1]["kind"], "extra_stores");
    }

    #[tokio::test]
    async fn quote_for_unknown_plan_is_404() {
        let (status, body) = post_json(
            "/quote",
            serde_json::json!({"plan_id": "platinum", "billing_period": "yearly"}),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn quote_with_too_many_stores_is_422() {
        let (status, body) = post_json(
            "/quote",
            serde_json::json!({
                "plan_id": "starter",
                "billing_period": "yearly",
                "extra_stores": 5000
            }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("extra_stores"));
    }

    #[tokio::test]
    async fn quote_with_out_of_range_vat_is_422() {
        let (status, body) = post_json(
            "/quote",
            serde_json::json!({
                "plan_id": "starter",
                "billing_period": "monthly",
                "vat_percent": 7e27
            }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("vat_percent"));
    }

    #[tokio::test]
    async fn normalize_returns_derived_pricing() {
        let (status, body) = post_json(
            "/normalize",
            serde_json::json!({"price_monthly": 100, "price_yearly": 1000}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["yearly_discount_percent"], 17);
        assert_eq!(body["data"]["display_monthly_from_yearly"], serde_json::json!(83.33));
        assert_eq!(body["data"]["monthly"], serde_json::json!(100.0));
    }

    #[tokio::test]
    async fn normalize_without_prices_returns_null_data() {
        let (status, body) = post_json("/normalize", serde_json::json!({})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["data"].is_null());
    }
}

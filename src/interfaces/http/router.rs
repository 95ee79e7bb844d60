//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::services::PricingService;
use crate::interfaces::http::modules::catalog::{
    self, CatalogResponse, PlanOfferResponse, PluginOfferResponse,
};
use crate::interfaces::http::modules::health::{self, CatalogHealth, HealthResponse, HealthState};
use crate::interfaces::http::modules::metrics::{
    http_metrics_middleware, prometheus_metrics, MetricsState,
};
use crate::interfaces::http::modules::pricing::{
    self, BillingPeriodDto, BreakdownResponse, DerivedPricingResponse, NormalizeRequest,
    PricingState, QuoteLineResponse, QuoteRequestDto, QuoteResponse,
};
use crate::interfaces::http::modules::request_id::request_id_middleware;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        catalog::get_catalog,
        catalog::get_plan,
        pricing::quote,
        pricing::normalize,
    ),
    components(
        schemas(
            HealthResponse,
            CatalogHealth,
            CatalogResponse,
            PlanOfferResponse,
            PluginOfferResponse,
            BillingPeriodDto,
            QuoteRequestDto,
            QuoteResponse,
            QuoteLineResponse,
            BreakdownResponse,
            NormalizeRequest,
            DerivedPricingResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Catalog", description = "Plans and plugins with monthly/yearly display pricing"),
        (name = "Pricing", description = "Subscription quotes and price normalization"),
    ),
    info(
        title = "ERP Subscription Pricing API",
        version = "1.0.0",
        description = "Price previews for ERP subscription checkout: plan, extra stores, plugins and VAT",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the HTTP router.
pub fn create_api_router(service: Arc<PricingService>, prometheus_handle: PrometheusHandle) -> Router {
    let pricing_state = PricingState {
        service: service.clone(),
    };

    let pricing_routes = Router::new()
        .route("/quote", post(pricing::quote))
        .route("/normalize", post(pricing::normalize))
        .with_state(pricing_state.clone());

    let catalog_routes = Router::new()
        .route("/", get(catalog::get_catalog))
        .route("/plans/{id}", get(catalog::get_plan))
        .with_state(pricing_state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(HealthState {
            service,
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState {
            handle: prometheus_handle,
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .nest("/api/v1/pricing", pricing_routes)
        .nest("/api/v1/catalog", catalog_routes)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

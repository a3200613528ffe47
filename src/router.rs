use crate::handlers::{
    applications::{apply_to_campaign, submit_application},
    campaigns::{create_campaign, get_campaign, list_campaigns, update_campaign},
    dashboard::get_dashboard,
    health::health_check,
    profiles::{create_profile, get_my_profile, update_my_profile},
    review::{get_campaign_stats, get_review_applications, review_application},
};
use crate::helpers::errors::{middleware_error, not_found};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    error_handling::HandleErrorLayer,
    routing::{get, post},
    Router,
};
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let request_timeout = state.request_timeout;

    let router = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Catalog and authoring
        .route("/api/v1/campaigns", get(list_campaigns).post(create_campaign))
        .route("/api/v1/campaigns/:campaign_id", get(get_campaign).put(update_campaign))
        // Submission
        .route("/api/v1/campaigns/:campaign_id/apply", post(apply_to_campaign))
        .route("/api/v1/applications", post(submit_application))
        // Review
        .route("/api/v1/review/applications", get(get_review_applications))
        .route("/api/v1/review/campaigns", get(get_campaign_stats))
        .route("/api/v1/applications/:application_id/review", post(review_application))
        // Profiles and dashboard
        .route("/api/v1/profiles", post(create_profile))
        .route("/api/v1/profiles/me", get(get_my_profile).put(update_my_profile))
        .route("/api/v1/dashboard", get(get_dashboard))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(not_found);

    // The Prometheus recorder is process-global, so tests build routers without it
    #[cfg(not(test))]
    let router = {
        let (prometheus_layer, metric_handle) = axum_prometheus::PrometheusMetricLayer::pair();
        router
            .route("/metrics", get(move || async move { metric_handle.render() }))
            .layer(prometheus_layer)
    };

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(HandleErrorLayer::new(middleware_error))
                .layer(TimeoutLayer::new(request_timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

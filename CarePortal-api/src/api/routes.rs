use std::sync::Arc;
use axum::{
    extract::FromRef,
    routing::{get, post},
    Extension, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

use care_portal_domain::health::HealthServiceTrait;
use care_portal_domain::services::{
    create_default_services, AlertServiceTrait, InsightServiceTrait, MetricServiceTrait, PortalServices,
};
use care_portal_domain::PortalConfig;

use crate::api::handlers::{alerts, dashboard, health, insights, readings, sustainability};
use crate::openapi::configure_swagger_routes;

/// Service handle for reading and trend endpoints
pub type MetricServiceHandle = Arc<dyn MetricServiceTrait + Send + Sync>;

/// Service handle for alert feed endpoints
pub type AlertServiceHandle = Arc<dyn AlertServiceTrait + Send + Sync>;

/// Service handle for insight endpoints
pub type InsightServiceHandle = Arc<dyn InsightServiceTrait + Send + Sync>;

/// Shared state for the API handlers
#[derive(Clone, FromRef)]
pub struct AppState {
    pub metrics: MetricServiceHandle,
    pub alerts: AlertServiceHandle,
    pub insights: InsightServiceHandle,
    pub config: PortalConfig,
}

impl AppState {
    pub fn new(services: PortalServices, config: PortalConfig) -> Self {
        Self {
            metrics: services.metrics,
            alerts: services.alerts,
            insights: services.insights,
            config,
        }
    }
}

/// Create the application router from environment configuration
pub async fn create_app() -> Router {
    debug!("Creating application router");

    let config = PortalConfig::from_env();
    let services = create_default_services(config.clone());

    create_app_with_state(AppState::new(services, config), health::create_health_service())
}

/// Create the application router over explicit services
pub fn create_app_with_state(
    state: AppState,
    health_service: Arc<dyn HealthServiceTrait + Send + Sync>,
) -> Router {
    let patient_routes = Router::new()
        .route(
            "/patients/:patient_id/readings",
            get(readings::get_readings).post(readings::record_reading),
        )
        .route("/patients/:patient_id/trends", get(insights::get_trends))
        .route("/patients/:patient_id/insights", get(insights::get_insights))
        .route("/patients/:patient_id/alerts", get(alerts::get_alerts))
        .route("/patients/:patient_id/alerts/read-all", post(alerts::mark_all_alerts_read))
        // Static segment before the parametrized one
        .route("/alerts/evaluate", post(alerts::evaluate_alert))
        .route("/alerts/:id/read", post(alerts::mark_alert_read))
        .route("/dashboard", post(dashboard::select_dashboard))
        .route("/sustainability/carbon", post(sustainability::calculate_carbon));

    debug!("API routes configured");

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .layer(Extension(health_service));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(public_routes)
        .nest("/api/v1", patient_routes)
        .with_state(state);

    debug!("API routes nested");

    // Configure the Swagger UI using the helper function
    let app = add_swagger_ui(app)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Initialize health check service startup time
    health::initialize_server_start_time();
    debug!("Health check service initialized");

    app
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    app.merge(configure_swagger_routes())
}

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Reading endpoints
        crate::api::handlers::readings::record_reading,
        crate::api::handlers::readings::get_readings,

        // Trend and insight endpoints
        crate::api::handlers::insights::get_trends,
        crate::api::handlers::insights::get_insights,

        // Alert endpoints
        crate::api::handlers::alerts::get_alerts,
        crate::api::handlers::alerts::mark_alert_read,
        crate::api::handlers::alerts::mark_all_alerts_read,
        crate::api::handlers::alerts::evaluate_alert,

        // Dashboard and sustainability endpoints
        crate::api::handlers::dashboard::select_dashboard,
        crate::api::handlers::sustainability::calculate_carbon,
    ),
    components(
        schemas(
            // Public entities
            crate::entities::common::ErrorResponse,
            crate::entities::readings::RecordReadingRequest,
            crate::entities::readings::ReadingListResponse,
            crate::entities::readings::TrendListResponse,
            crate::entities::alerts::AlertListResponse,
            crate::entities::alerts::EvaluateAlertRequest,
            crate::entities::alerts::EvaluateAlertResponse,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,

            // Domain entities
            care_portal_domain::entities::MetricType,
            care_portal_domain::entities::Reading,
            care_portal_domain::entities::ReadingValue,
            care_portal_domain::entities::RecordedReading,
            care_portal_domain::entities::AlertSeverity,
            care_portal_domain::entities::Alert,
            care_portal_domain::entities::MarkAllReadOutcome,
            care_portal_domain::entities::TrendTag,
            care_portal_domain::entities::MetricTrend,
            care_portal_domain::entities::SeverityCounts,
            care_portal_domain::entities::TrendBreakdown,
            care_portal_domain::entities::BloodPressureCategory,
            care_portal_domain::entities::InsightSummary,
            care_portal_domain::entities::Persona,
            care_portal_domain::entities::SessionFlags,
            care_portal_domain::entities::Session,
            care_portal_domain::entities::Widget,
            care_portal_domain::entities::DashboardLayout,
            care_portal_domain::entities::CarbonComparisonRequest,
            care_portal_domain::entities::CarbonCalculation,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "readings", description = "Recording and listing health readings"),
        (name = "insights", description = "Trends and dashboard insight summaries"),
        (name = "alerts", description = "Alert feed and threshold evaluation"),
        (name = "dashboard", description = "Persona dashboard selection"),
        (name = "sustainability", description = "Carbon and water savings lookup")
    ),
    info(
        title = "CarePortal API",
        version = "0.1.0",
        description = "Health metric trends, alerts and insights for patients, caregivers and providers",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;

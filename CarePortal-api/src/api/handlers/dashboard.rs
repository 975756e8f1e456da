use axum::extract::Json;
use tracing::{debug, instrument};

use care_portal_domain::entities::{DashboardLayout, Session};
use care_portal_domain::services::dashboard;

/// Choose the dashboard layout for a session
#[utoipa::path(
    post,
    path = "/api/v1/dashboard",
    request_body = Session,
    responses(
        (status = 200, description = "Layout for the session's persona", body = DashboardLayout),
    ),
    tag = "dashboard"
)]
#[instrument]
pub async fn select_dashboard(Json(session): Json<Session>) -> Json<DashboardLayout> {
    let layout = dashboard::select_dashboard(&session);
    debug!("Selected {} widgets", layout.widgets.len());
    Json(layout)
}

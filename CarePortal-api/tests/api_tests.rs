use std::sync::{Arc, Once};
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use care_portal_api::api::{create_app_with_state, AppState};
use care_portal_data::database::{create_in_memory_pool, DatabaseConfig};
use care_portal_data::repository::{AlertRepository, MetricRepository};
use care_portal_domain::health::HealthService;
use care_portal_domain::services::PortalServices;
use care_portal_domain::PortalConfig;

// Ensure tracing is initialized only once
static INIT: Once = Once::new();

fn initialize() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// Router over a private in-memory SQLite database
fn sqlite_app() -> Router {
    initialize();
    let pool = create_in_memory_pool(&DatabaseConfig::default()).expect("in-memory pool");
    let config = PortalConfig::default();
    let services = PortalServices::from_repositories(
        MetricRepository::with_pool(pool.clone()),
        AlertRepository::with_pool(pool),
        config.clone(),
    );
    create_app_with_state(AppState::new(services, config), Arc::new(HealthService::new()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(json) => request.body(Body::from(json.to_string())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

#[tokio::test]
async fn test_patient_journey_on_sqlite() {
    let app = sqlite_app();
    let now = chrono::Utc::now();

    // Seven systolic readings: four at 100, then three at 120
    for (i, systolic) in [100, 100, 100, 100, 120, 120, 120].iter().enumerate() {
        let recorded_at = now - chrono::Duration::days(7 - i as i64);
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/patients/p1/readings",
            Some(json!({
                "metric_type": "blood_pressure",
                "value": { "systolic": systolic, "diastolic": 70 },
                "recorded_at": recorded_at.to_rfc3339(),
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, Method::GET, "/api/v1/patients/p1/trends", None).await;
    assert_eq!(status, StatusCode::OK);
    let systolic = body["trends"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["metric_type"] == "blood_pressure_systolic")
        .cloned()
        .expect("systolic trend");
    assert_eq!(systolic["tag"], "up");
    assert_eq!(systolic["reading_count"], 7);

    // Nothing crossed a threshold yet
    let (_, body) = send(&app, Method::GET, "/api/v1/patients/p1/insights", None).await;
    assert_eq!(body["unread_count"], 0);
    assert_eq!(body["has_urgent_unread"], false);
    assert_eq!(body["blood_pressure_category"], "Elevated");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/patients/p1/readings",
        Some(json!({ "metric_type": "blood_pressure", "value": { "systolic": 185, "diastolic": 100 } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["alert"]["severity"], "critical");

    let (_, body) = send(&app, Method::GET, "/api/v1/patients/p1/insights", None).await;
    assert_eq!(body["unread_count"], 1);
    assert_eq!(body["has_urgent_unread"], true);
    assert_eq!(body["blood_pressure_category"], "HypertensiveCrisis");

    let (status, body) = send(&app, Method::POST, "/api/v1/patients/p1/alerts/read-all", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"].as_array().unwrap().len(), 1);

    let (_, body) = send(&app, Method::GET, "/api/v1/patients/p1/insights", None).await;
    assert_eq!(body["unread_count"], 0);
    assert_eq!(body["alerts"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_patients_are_isolated() {
    let app = sqlite_app();
    send(
        &app,
        Method::POST,
        "/api/v1/patients/p1/readings",
        Some(json!({ "metric_type": "heart_rate", "value": 155 })),
    )
    .await;

    let (_, body) = send(&app, Method::GET, "/api/v1/patients/p2/alerts", None).await;
    assert_eq!(body["unread_count"], 0);
    let (_, body) = send(&app, Method::GET, "/api/v1/patients/p2/readings", None).await;
    assert!(body["readings"].as_array().unwrap().is_empty());
}


use std::sync::Arc;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use care_portal_data::repository::{AlertRepository, InMemoryStorage, MetricRepository};
use care_portal_domain::health::HealthService;
use care_portal_domain::services::PortalServices;
use care_portal_domain::PortalConfig;

use crate::api::routes::{create_app_with_state, AppState};

/// Router over fresh in-memory stores
pub(crate) fn in_memory_app() -> Router {
    let config = PortalConfig::default();
    let storage = InMemoryStorage::new();
    let services = PortalServices::from_repositories(
        MetricRepository::in_memory(storage.clone()),
        AlertRepository::in_memory(storage),
        config.clone(),
    );
    app_with_services(services)
}

pub(crate) fn app_with_services(services: PortalServices) -> Router {
    let config = PortalConfig::default();
    create_app_with_state(AppState::new(services, config), Arc::new(HealthService::new()))
}

/// Send one request and decode the JSON body, `Null` when empty
pub(crate) async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", mime::APPLICATION_JSON.as_ref());
    let request = match body {
        Some(json) => request.body(Body::from(json.to_string())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

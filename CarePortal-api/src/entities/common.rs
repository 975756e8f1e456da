use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::{IntoParams, ToSchema};

use care_portal_domain::PortalError;

/// Error response format for API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a not found error response
    pub fn not_found(resource: &str) -> Self {
        Self {
            error: "not_found".to_string(),
            message: format!("The requested {} could not be found", resource),
            details: None,
        }
    }

    /// Create a validation error response
    pub fn validation_error(message: &str, details: Option<serde_json::Value>) -> Self {
        Self {
            error: "validation_error".to_string(),
            message: message.to_string(),
            details,
        }
    }

    /// Create a bad request error response
    pub fn bad_request(message: &str) -> Self {
        Self {
            error: "bad_request".to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    /// Stores unreachable; clients should render their empty state
    pub fn unavailable(message: &str) -> Self {
        Self {
            error: "service_unavailable".to_string(),
            message: message.to_string(),
            details: Some(serde_json::json!({ "empty_state": true })),
        }
    }

    /// Create an internal error response
    pub fn internal_error() -> Self {
        Self {
            error: "internal_error".to_string(),
            message: "An unexpected error occurred".to_string(),
            details: None,
        }
    }
}

impl From<PortalError> for ErrorResponse {
    fn from(err: PortalError) -> Self {
        match err {
            PortalError::FetchFailure(msg) => {
                warn!("Health data unavailable: {}", msg);
                ErrorResponse::unavailable("Health data is temporarily unavailable")
            }
            PortalError::Validation(msg) => ErrorResponse::validation_error(&msg, None),
            PortalError::NotFound(msg) => ErrorResponse {
                message: msg,
                ..ErrorResponse::not_found("resource")
            },
            PortalError::UnrecognizedMetric(name) => {
                ErrorResponse::bad_request(&format!("Unrecognized metric: {}", name))
            }
            other => {
                error!("Unexpected pipeline error: {}", other);
                ErrorResponse::internal_error()
            }
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = match self.error.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" => StatusCode::BAD_REQUEST,
            "bad_request" => StatusCode::BAD_REQUEST,
            "service_unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

/// Query parameters selecting the lookback window
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct WindowQueryParams {
    /// Lookback window in days (default: 30, max: 365)
    pub days: Option<u32>,
}

/// Query parameters for the insight summary
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct InsightQueryParams {
    /// Lookback window in days (default: 30, max: 365)
    pub days: Option<u32>,

    /// Serve the last summary built for this window when one is kept
    pub cached: Option<bool>,
}

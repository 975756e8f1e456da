use thiserror::Error;
use care_portal_data::repository::RepositoryError;

/// Errors produced by the trend, alert and insight pipeline.
///
/// Only `FetchFailure`, `Validation` and `NotFound` leave the services;
/// the remaining kinds are recovered locally by omitting the affected entry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PortalError {
    /// Metric or alert store unreachable, failing or timed out
    #[error("Fetch failure: {0}")]
    FetchFailure(String),

    /// Not enough readings to classify a trend
    #[error("Undefined trend: {0}")]
    UndefinedTrend(String),

    /// Metric type missing from the threshold table or unknown to the store
    #[error("Unrecognized metric: {0}")]
    UnrecognizedMetric(String),

    /// Baseline average of zero
    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    /// Invalid input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Record does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<RepositoryError> for PortalError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => PortalError::NotFound(msg),
            RepositoryError::Validation(msg) => PortalError::Validation(msg),
            other => PortalError::FetchFailure(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_errors_map_to_portal_errors() {
        let not_found: PortalError = RepositoryError::NotFound("alert 1".to_string()).into();
        assert_eq!(not_found, PortalError::NotFound("alert 1".to_string()));

        let lock: PortalError = RepositoryError::Lock("poisoned".to_string()).into();
        assert!(matches!(lock, PortalError::FetchFailure(msg) if msg.contains("poisoned")));
    }
}

// Domain services
// This module contains business logic implementations.
pub mod advisor;
pub mod alerts;
pub mod dashboard;
pub mod insight_service;
pub mod insights;
pub mod metrics;
pub mod refresh;
pub mod thresholds;
pub mod trends;

use std::sync::Arc;
use care_portal_data::repository::{AlertRepository, AlertRepositoryTrait, MetricRepository, MetricRepositoryTrait};

use crate::config::PortalConfig;

// Re-export service traits
pub use alerts::{AlertService, AlertServiceTrait};
pub use insight_service::{InsightService, InsightServiceTrait};
pub use metrics::{MetricService, MetricServiceTrait};
pub use refresh::{RefreshSlot, RefreshTicket};

/// The services behind the patient endpoints
#[derive(Clone)]
pub struct PortalServices {
    pub metrics: Arc<dyn MetricServiceTrait + Send + Sync>,
    pub alerts: Arc<dyn AlertServiceTrait + Send + Sync>,
    pub insights: Arc<dyn InsightServiceTrait + Send + Sync>,
}

impl PortalServices {
    /// Wire services over the given repositories.
    ///
    /// The alert repository is shared so alerts raised while recording
    /// readings show up in the alert feed.
    pub fn from_repositories<M, A>(metrics: M, alerts: A, config: PortalConfig) -> Self
    where
        M: MetricRepositoryTrait + Send + Sync + 'static,
        A: AlertRepositoryTrait + Clone + Send + Sync + 'static,
    {
        let metric_service: Arc<dyn MetricServiceTrait + Send + Sync> =
            Arc::new(MetricService::new(metrics, alerts.clone(), config.clone()));
        let alert_service: Arc<dyn AlertServiceTrait + Send + Sync> =
            Arc::new(AlertService::new(alerts, config.clone()));
        let insight_service = Arc::new(InsightService::new(
            metric_service.clone(),
            alert_service.clone(),
            config,
        ));

        Self {
            metrics: metric_service,
            alerts: alert_service,
            insights: insight_service,
        }
    }
}

/// Create services backed by the global database pool, or in-memory storage without one
pub fn create_default_services(config: PortalConfig) -> PortalServices {
    PortalServices::from_repositories(MetricRepository::new(), AlertRepository::new(), config)
}

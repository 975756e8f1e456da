use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use tracing::{debug, info};

use crate::config::PortalConfig;
use crate::entities::insights::InsightSummary;
use crate::errors::PortalError;
use crate::services::alerts::AlertServiceTrait;
use crate::services::insights::{aggregate_insights, latest_blood_pressure_category};
use crate::services::metrics::MetricServiceTrait;
use crate::services::refresh::RefreshSlot;
use crate::services::trends::analyze_trends;

/// Trait for the per-patient insight summary
#[async_trait]
pub trait InsightServiceTrait {
    /// Fetch readings and alerts, then build a fresh summary
    async fn get_insights(&self, patient_id: &str, lookback_days: Option<u32>) -> Result<InsightSummary, PortalError>;

    /// Last summary kept for the patient and window, if any
    fn cached_insights(&self, patient_id: &str, lookback_days: Option<u32>) -> Option<InsightSummary>;

    /// Forget the patient's summaries and discard refreshes still running for them
    fn invalidate(&self, patient_id: &str);

    /// Forget every summary
    fn invalidate_all(&self);
}

/// (patient, lookback days)
type SlotKey = (String, u32);

type InsightSlot = Arc<RefreshSlot<InsightSummary>>;

/// Refresh slots bounded by capacity, evicting the oldest entry first
#[derive(Default)]
struct SlotCache {
    slots: HashMap<SlotKey, InsightSlot>,
    order: VecDeque<SlotKey>,
}

impl SlotCache {
    fn get(&self, key: &SlotKey) -> Option<InsightSlot> {
        self.slots.get(key).cloned()
    }

    fn get_or_insert(&mut self, key: SlotKey, capacity: usize) -> InsightSlot {
        if let Some(slot) = self.slots.get(&key) {
            return slot.clone();
        }
        while self.slots.len() >= capacity.max(1) {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.slots.remove(&oldest);
                }
                None => break,
            }
        }
        let slot: InsightSlot = Arc::new(RefreshSlot::new());
        self.slots.insert(key.clone(), slot.clone());
        self.order.push_back(key);
        slot
    }

    fn remove_patient(&mut self, patient_id: &str) -> Vec<InsightSlot> {
        self.order.retain(|(patient, _)| patient != patient_id);
        let keys: Vec<SlotKey> = self
            .slots
            .keys()
            .filter(|(patient, _)| patient == patient_id)
            .cloned()
            .collect();
        keys.iter().filter_map(|key| self.slots.remove(key)).collect()
    }

    fn drain(&mut self) -> Vec<InsightSlot> {
        self.order.clear();
        self.slots.drain().map(|(_, slot)| slot).collect()
    }

    fn len(&self) -> usize {
        self.slots.len()
    }
}

/// Combines the metric and alert services into dashboard summaries
pub struct InsightService {
    metrics: Arc<dyn MetricServiceTrait + Send + Sync>,
    alerts: Arc<dyn AlertServiceTrait + Send + Sync>,
    config: PortalConfig,
    cache: Mutex<SlotCache>,
}

impl InsightService {
    pub fn new(
        metrics: Arc<dyn MetricServiceTrait + Send + Sync>,
        alerts: Arc<dyn AlertServiceTrait + Send + Sync>,
        config: PortalConfig,
    ) -> Self {
        Self {
            metrics,
            alerts,
            config,
            cache: Mutex::new(SlotCache::default()),
        }
    }

    // The cache only holds slots, which stay consistent across a panic
    fn cache(&self) -> MutexGuard<'_, SlotCache> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl InsightServiceTrait for InsightService {
    async fn get_insights(&self, patient_id: &str, lookback_days: Option<u32>) -> Result<InsightSummary, PortalError> {
        let days = self.config.resolve_lookback(lookback_days);
        let window_start = Utc::now() - Duration::days(days as i64);

        let slot = self
            .cache()
            .get_or_insert((patient_id.to_string(), days), self.config.insight_cache_capacity);
        let ticket = slot.begin();

        let (readings, alerts) = futures::join!(
            self.metrics.get_readings(patient_id, Some(days)),
            self.alerts.get_active_alerts(patient_id),
        );
        let readings = readings?;
        let alerts = alerts?;

        let trends = analyze_trends(&readings, window_start);
        let mut summary = aggregate_insights(&trends, &alerts);
        summary.blood_pressure_category = latest_blood_pressure_category(&readings);

        if slot.complete(ticket, summary.clone()) {
            info!(
                "Insights for patient {}: {} unread alerts, {} trends",
                patient_id,
                summary.unread_count,
                summary.trends.len()
            );
        } else {
            debug!("Discarded superseded insight refresh for patient {}", patient_id);
        }

        Ok(summary)
    }

    fn cached_insights(&self, patient_id: &str, lookback_days: Option<u32>) -> Option<InsightSummary> {
        let key = (patient_id.to_string(), self.config.resolve_lookback(lookback_days));
        self.cache().get(&key).and_then(|slot| slot.latest())
    }

    fn invalidate(&self, patient_id: &str) {
        let removed = self.cache().remove_patient(patient_id);
        for slot in &removed {
            slot.invalidate();
        }
        debug!("Invalidated {} insight summaries for patient {}", removed.len(), patient_id);
    }

    fn invalidate_all(&self) {
        let removed = self.cache().drain();
        for slot in &removed {
            slot.invalidate();
        }
        debug!("Invalidated {} insight summaries", removed.len());
    }
}

//! Trend classification over a patient's readings.

use std::collections::BTreeMap;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::entities::insights::{MetricTrend, TrendTag};
use crate::entities::metric::{MetricType, Reading};
use crate::errors::PortalError;

/// Changes smaller than this, in percent, count as stable
pub const STABLE_THRESHOLD_PERCENT: f64 = 5.0;

/// Number of most recent readings averaged against the rest
pub const RECENT_WINDOW: usize = 3;

/// Intermediate figures behind a trend tag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendComputation {
    pub tag: TrendTag,
    pub change_percent: f64,
    pub recent_average: f64,
    pub baseline_average: f64,
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Compare the mean of the last three values with the mean of the earlier ones.
///
/// `values` must be ordered oldest first.
pub fn compute_trend(values: &[f64]) -> Result<TrendComputation, PortalError> {
    if values.len() < 2 {
        return Err(PortalError::UndefinedTrend(format!(
            "need at least 2 readings, got {}",
            values.len()
        )));
    }

    let k = RECENT_WINDOW.min(values.len());
    let (older, recent) = values.split_at(values.len() - k);
    if older.is_empty() {
        return Err(PortalError::UndefinedTrend(format!(
            "no baseline readings before the last {}",
            k
        )));
    }

    let recent_average = mean(recent);
    let baseline_average = mean(older);
    if baseline_average == 0.0 {
        return Err(PortalError::DivisionByZero("baseline average is zero".to_string()));
    }

    let change_percent = (recent_average - baseline_average) / baseline_average * 100.0;
    if !change_percent.is_finite() {
        return Err(PortalError::UndefinedTrend("change is not a finite number".to_string()));
    }

    let tag = if change_percent.abs() < STABLE_THRESHOLD_PERCENT {
        TrendTag::Stable
    } else if change_percent > 0.0 {
        TrendTag::Up
    } else {
        TrendTag::Down
    };

    Ok(TrendComputation {
        tag,
        change_percent,
        recent_average,
        baseline_average,
    })
}

/// Classify an oldest-first series of values
pub fn classify_trend(values: &[f64]) -> Result<TrendTag, PortalError> {
    compute_trend(values).map(|computation| computation.tag)
}

/// Per-metric trends for readings recorded at or after `window_start`.
///
/// Metrics without a defined trend are left out. Output is ordered by metric type.
pub fn analyze_trends(readings: &[Reading], window_start: DateTime<Utc>) -> Vec<MetricTrend> {
    let mut in_window: Vec<&Reading> = readings
        .iter()
        .filter(|reading| reading.recorded_at() >= window_start)
        .collect();
    in_window.sort_by_key(|reading| reading.recorded_at());

    let mut series: BTreeMap<MetricType, Vec<f64>> = BTreeMap::new();
    for reading in in_window {
        for (metric_type, value) in reading.samples() {
            series.entry(metric_type).or_default().push(value);
        }
    }

    series
        .into_iter()
        .filter_map(|(metric_type, values)| match compute_trend(&values) {
            Ok(computation) => Some(MetricTrend {
                metric_type,
                tag: computation.tag,
                change_percent: computation.change_percent,
                recent_average: computation.recent_average,
                baseline_average: computation.baseline_average,
                reading_count: values.len(),
            }),
            Err(PortalError::DivisionByZero(msg)) => {
                warn!("Omitting {} trend: {}", metric_type, msg);
                None
            }
            Err(e) => {
                debug!("No {} trend: {}", metric_type, e);
                None
            }
        })
        .collect()
}

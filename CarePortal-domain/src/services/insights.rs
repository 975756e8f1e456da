use crate::entities::alert::{Alert, AlertSeverity};
use crate::entities::insights::{
    BloodPressureCategory, InsightSummary, MetricTrend, SeverityCounts, TrendBreakdown, TrendTag,
};
use crate::entities::metric::Reading;

/// Categorize blood pressure based on measurements
pub fn categorize_blood_pressure(systolic: f64, diastolic: f64) -> BloodPressureCategory {
    if systolic >= 180.0 || diastolic >= 120.0 {
        BloodPressureCategory::HypertensiveCrisis
    } else if systolic >= 140.0 || diastolic >= 90.0 {
        BloodPressureCategory::Hypertension2
    } else if systolic >= 130.0 || diastolic >= 80.0 {
        BloodPressureCategory::Hypertension1
    } else if systolic >= 120.0 {
        BloodPressureCategory::Elevated
    } else {
        BloodPressureCategory::Normal
    }
}

/// Category of the most recent blood pressure reading, if there is one
pub fn latest_blood_pressure_category(readings: &[Reading]) -> Option<BloodPressureCategory> {
    readings
        .iter()
        .filter_map(|reading| match reading {
            Reading::BloodPressure { systolic, diastolic, recorded_at } => {
                Some((*recorded_at, *systolic, *diastolic))
            }
            Reading::Scalar { .. } => None,
        })
        .max_by_key(|(recorded_at, _, _)| *recorded_at)
        .map(|(_, systolic, diastolic)| categorize_blood_pressure(systolic, diastolic))
}

fn breakdown(trends: &[MetricTrend]) -> TrendBreakdown {
    let mut result = TrendBreakdown::default();
    for trend in trends {
        match trend.tag {
            TrendTag::Up => result.up += 1,
            TrendTag::Down => result.down += 1,
            TrendTag::Stable => result.stable += 1,
        }
    }
    if !trends.is_empty() {
        result.stable_percent = result.stable as f64 / trends.len() as f64 * 100.0;
    }
    result
}

/// Fold trends and alerts into a dashboard summary.
///
/// Counts consider unread alerts only. The alert list is sorted most severe
/// first with a stable sort, so alerts of equal severity keep the input order.
pub fn aggregate_insights(trends: &[MetricTrend], alerts: &[Alert]) -> InsightSummary {
    let mut severity_counts = SeverityCounts::default();
    for alert in alerts.iter().filter(|alert| !alert.is_read) {
        match alert.severity {
            AlertSeverity::Critical => severity_counts.critical += 1,
            AlertSeverity::High => severity_counts.high += 1,
            AlertSeverity::Medium => severity_counts.medium += 1,
            AlertSeverity::Low => severity_counts.low += 1,
        }
    }
    let unread_count =
        severity_counts.critical + severity_counts.high + severity_counts.medium + severity_counts.low;

    let mut ordered = alerts.to_vec();
    ordered.sort_by(|a, b| b.severity.cmp(&a.severity));

    InsightSummary {
        unread_count,
        severity_counts,
        has_urgent_unread: alerts.iter().any(|alert| !alert.is_read && alert.severity.is_urgent()),
        alerts: ordered,
        trends: trends.to_vec(),
        trend_breakdown: breakdown(trends),
        blood_pressure_category: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use crate::entities::metric::MetricType;

    fn alert(id: &str, severity: AlertSeverity, is_read: bool) -> Alert {
        Alert {
            id: id.to_string(),
            patient_id: "p1".to_string(),
            severity,
            title: format!("{} alert", severity),
            message: "Reading outside normal range".to_string(),
            metric_type: Some(MetricType::HeartRate),
            is_read,
            created_at: Utc::now(),
            expires_at: None,
        }
    }

    fn trend(metric_type: MetricType, tag: TrendTag) -> MetricTrend {
        MetricTrend {
            metric_type,
            tag,
            change_percent: 0.0,
            recent_average: 100.0,
            baseline_average: 100.0,
            reading_count: 4,
        }
    }

    #[test]
    fn test_bp_category_normal() {
        assert_eq!(categorize_blood_pressure(110.0, 75.0), BloodPressureCategory::Normal);
    }

    #[test]
    fn test_bp_category_elevated() {
        assert_eq!(categorize_blood_pressure(125.0, 75.0), BloodPressureCategory::Elevated);
    }

    #[test]
    fn test_bp_category_hypertension() {
        // Diastolic alone is enough
        assert_eq!(categorize_blood_pressure(120.0, 85.0), BloodPressureCategory::Hypertension1);
        assert_eq!(categorize_blood_pressure(145.0, 75.0), BloodPressureCategory::Hypertension2);
        assert_eq!(categorize_blood_pressure(120.0, 125.0), BloodPressureCategory::HypertensiveCrisis);
    }

    #[test]
    fn test_latest_blood_pressure_category_uses_newest_reading() {
        let now = Utc::now();
        let readings = vec![
            Reading::BloodPressure { systolic: 185.0, diastolic: 100.0, recorded_at: now - Duration::days(3) },
            Reading::BloodPressure { systolic: 115.0, diastolic: 75.0, recorded_at: now - Duration::days(1) },
            Reading::Scalar { metric_type: MetricType::Weight, value: 80.0, recorded_at: now },
        ];
        assert_eq!(latest_blood_pressure_category(&readings), Some(BloodPressureCategory::Normal));
        assert_eq!(latest_blood_pressure_category(&readings[2..]), None);
    }

    #[test]
    fn test_no_alerts() {
        let summary = aggregate_insights(&[], &[]);
        assert_eq!(summary.unread_count, 0);
        assert!(!summary.has_urgent_unread);
        assert!(summary.alerts.is_empty());
        assert_eq!(summary.trend_breakdown.stable_percent, 0.0);
    }

    #[test]
    fn test_critical_sorted_first() {
        let alerts = vec![alert("a1", AlertSeverity::Low, false), alert("a2", AlertSeverity::Critical, false)];
        let summary = aggregate_insights(&[], &alerts);
        assert_eq!(summary.unread_count, 2);
        assert!(summary.has_urgent_unread);
        assert_eq!(summary.alerts[0].id, "a2");
        assert_eq!(summary.severity_counts.critical, 1);
        assert_eq!(summary.severity_counts.low, 1);
    }

    #[test]
    fn test_read_alerts_are_listed_but_not_counted() {
        let alerts = vec![
            alert("a1", AlertSeverity::High, true),
            alert("a2", AlertSeverity::Medium, false),
            alert("a3", AlertSeverity::Medium, false),
        ];
        let summary = aggregate_insights(&[], &alerts);
        assert_eq!(summary.unread_count, 2);
        assert!(!summary.has_urgent_unread);
        let ids: Vec<&str> = summary.alerts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "a3"]);
    }

    #[test]
    fn test_trend_breakdown() {
        let trends = vec![
            trend(MetricType::BloodPressureSystolic, TrendTag::Up),
            trend(MetricType::BloodPressureDiastolic, TrendTag::Stable),
            trend(MetricType::HeartRate, TrendTag::Stable),
            trend(MetricType::Weight, TrendTag::Down),
        ];
        let summary = aggregate_insights(&trends, &[]);
        assert_eq!(summary.trend_breakdown.up, 1);
        assert_eq!(summary.trend_breakdown.down, 1);
        assert_eq!(summary.trend_breakdown.stable, 2);
        assert_eq!(summary.trend_breakdown.stable_percent, 50.0);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let alerts = vec![
            alert("a1", AlertSeverity::Medium, false),
            alert("a2", AlertSeverity::Critical, true),
            alert("a3", AlertSeverity::High, false),
        ];
        let trends = vec![trend(MetricType::HeartRate, TrendTag::Up)];
        assert_eq!(aggregate_insights(&trends, &alerts), aggregate_insights(&trends, &alerts));
    }
}

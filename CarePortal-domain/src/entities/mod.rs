// Domain entities and value objects
pub mod advisor;
pub mod alert;
pub mod conversions;
pub mod insights;
pub mod metric;
pub mod session;

// Re-export common types for easier imports
pub use advisor::{CarbonCalculation, CarbonComparisonRequest};
pub use alert::{Alert, AlertSeverity, MarkAllReadOutcome};
pub use insights::{BloodPressureCategory, InsightSummary, MetricTrend, SeverityCounts, TrendBreakdown, TrendTag};
pub use metric::{CreateReadingRequest, MetricType, Reading, ReadingValue, RecordedReading};
pub use session::{DashboardLayout, Persona, Session, SessionFlags, Widget};

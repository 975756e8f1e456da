use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Who is using the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    Patient,
    Caregiver,
    Provider,
}

/// Per-user flags carried with the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct SessionFlags {
    #[serde(default)]
    pub seen_onboarding: bool,
}

/// Explicit session passed to dashboard selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Session {
    pub persona: Persona,
    #[serde(default)]
    pub flags: SessionFlags,
}

/// Dashboard building blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    VitalsChart,
    Alerts,
    HealthInsights,
    Medications,
    Appointments,
    CareRecipients,
    PatientRoster,
    ClinicalAlerts,
    SustainabilityAdvisor,
    Onboarding,
}

/// Layout chosen for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct DashboardLayout {
    pub persona: Persona,
    /// Widgets in render order
    pub widgets: Vec<Widget>,
    pub show_onboarding: bool,
}

use crate::entities::session::{DashboardLayout, Persona, Session, Widget};

fn persona_widgets(persona: Persona) -> &'static [Widget] {
    match persona {
        Persona::Patient => &[
            Widget::Alerts,
            Widget::VitalsChart,
            Widget::HealthInsights,
            Widget::Medications,
            Widget::Appointments,
            Widget::SustainabilityAdvisor,
        ],
        Persona::Caregiver => &[
            Widget::CareRecipients,
            Widget::Alerts,
            Widget::VitalsChart,
            Widget::Medications,
            Widget::Appointments,
        ],
        Persona::Provider => &[
            Widget::ClinicalAlerts,
            Widget::PatientRoster,
            Widget::HealthInsights,
            Widget::Appointments,
        ],
    }
}

/// Pick the dashboard for a session.
///
/// Users who have not finished onboarding get the onboarding widget first.
pub fn select_dashboard(session: &Session) -> DashboardLayout {
    let show_onboarding = !session.flags.seen_onboarding;
    let mut widgets = Vec::with_capacity(persona_widgets(session.persona).len() + 1);
    if show_onboarding {
        widgets.push(Widget::Onboarding);
    }
    widgets.extend_from_slice(persona_widgets(session.persona));

    DashboardLayout {
        persona: session.persona,
        widgets,
        show_onboarding,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::session::SessionFlags;

    #[test]
    fn test_returning_patient() {
        let session = Session { persona: Persona::Patient, flags: SessionFlags { seen_onboarding: true } };
        let layout = select_dashboard(&session);
        assert!(!layout.show_onboarding);
        assert_eq!(layout.widgets[0], Widget::Alerts);
        assert!(!layout.widgets.contains(&Widget::Onboarding));
    }

    #[test]
    fn test_new_provider_sees_onboarding() {
        let session = Session { persona: Persona::Provider, flags: SessionFlags::default() };
        let layout = select_dashboard(&session);
        assert!(layout.show_onboarding);
        assert_eq!(layout.widgets[0], Widget::Onboarding);
        assert!(layout.widgets.contains(&Widget::PatientRoster));
        assert_eq!(layout.persona, Persona::Provider);
    }

    #[test]
    fn test_caregiver_layout() {
        let session = Session { persona: Persona::Caregiver, flags: SessionFlags { seen_onboarding: true } };
        let layout = select_dashboard(&session);
        assert_eq!(layout.widgets[0], Widget::CareRecipients);
        assert!(!layout.widgets.contains(&Widget::PatientRoster));
    }
}

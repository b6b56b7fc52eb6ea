//! Transient alert shapes. Each alert owns one fixed id, except event alerts
//! which carry the caller's id.

use beacon_core::{Category, Content, LinkTarget, NotificationId, PlatformCapabilities};

use crate::presentation::Presentation;

/// Crash alert, linking to the diagnostic log.
pub fn crash(title: &str) -> Presentation {
    Presentation::alert(
        NotificationId::Crash,
        Content::Crash {
            title: title.to_string(),
        },
        LinkTarget::LogView,
    )
}

/// Restart-pending alert. Alerts once; tapping triggers the restart.
pub fn restart() -> Presentation {
    let mut p = Presentation::alert(NotificationId::Restart, Content::Restart, LinkTarget::RestartAction);
    p.alert_once = true;
    p
}

/// Warning that background execution was revoked.
pub fn background_disabled(caps: &PlatformCapabilities) -> Presentation {
    let mut p = Presentation::alert(
        NotificationId::StopBackgroundWarning,
        Content::BackgroundDisabledWarning,
        LinkTarget::MainView,
    );
    p.long_text = true;
    p.ticker = true;
    p.category = caps.supports_category_metadata.then_some(Category::Error);
    p
}

/// Ad hoc sync event under a caller-chosen id.
pub fn event(text: &str, target: LinkTarget, id: i32) -> Presentation {
    let mut p = Presentation::alert(
        NotificationId::Event(id),
        Content::Event {
            text: text.to_string(),
        },
        target,
    );
    p.long_text = true;
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restart_alerts_once_and_auto_cancels() {
        let p = restart();
        assert_eq!(p.id, NotificationId::Restart);
        assert!(p.alert_once && p.auto_cancel);
        assert_eq!(p.target, LinkTarget::RestartAction);
    }

    #[test]
    fn crash_links_to_log_view() {
        let p = crash("Sync crashed");
        assert_eq!(p.id, NotificationId::Crash);
        assert_eq!(p.target, LinkTarget::LogView);
        assert!(p.auto_cancel);
    }

    #[test]
    fn background_warning_category_is_gated() {
        let with = background_disabled(&PlatformCapabilities {
            supports_category_metadata: true,
            ..Default::default()
        });
        assert_eq!(with.category, Some(Category::Error));

        let without = background_disabled(&PlatformCapabilities::default());
        assert_eq!(without.category, None);
        assert!(without.long_text);
    }

    #[test]
    fn event_uses_caller_id() {
        let p = event("done", LinkTarget::Custom("folder/photos".into()), 1042);
        assert_eq!(p.id, NotificationId::Event(1042));
        assert!(p.long_text && p.auto_cancel);
    }
}

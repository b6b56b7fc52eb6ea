//! Domain types shared by the policy, the renderer and the host.
//!
//! Every type here is a plain value: no I/O, no interior mutability.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Service lifecycle
// ---------------------------------------------------------------------------

/// Lifecycle state reported by the sync service. Read-only to Beacon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    #[default]
    Stopped,
    Starting,
    Active,
    Error,
    Disabled,
}

impl ServiceState {
    /// Every state in declaration order.
    pub fn all() -> &'static [ServiceState] {
        &[
            ServiceState::Stopped,
            ServiceState::Starting,
            ServiceState::Active,
            ServiceState::Error,
            ServiceState::Disabled,
        ]
    }

    /// Only `Starting` and `Active` count as running for presentation.
    pub fn is_running(self) -> bool {
        matches!(self, ServiceState::Starting | ServiceState::Active)
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceState::Stopped => write!(f, "stopped"),
            ServiceState::Starting => write!(f, "starting"),
            ServiceState::Active => write!(f, "active"),
            ServiceState::Error => write!(f, "error"),
            ServiceState::Disabled => write!(f, "disabled"),
        }
    }
}

impl FromStr for ServiceState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stopped" => Ok(ServiceState::Stopped),
            "starting" => Ok(ServiceState::Starting),
            "active" => Ok(ServiceState::Active),
            "error" => Ok(ServiceState::Error),
            "disabled" => Ok(ServiceState::Disabled),
            other => Err(format!(
                "unknown service state '{other}'; expected: stopped, starting, active, error, disabled"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Notification preferences
// ---------------------------------------------------------------------------

/// User preference for the persistent indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    None,
    Default,
    #[default]
    LowPriority,
}

impl NotificationType {
    /// Stored string form, as written to the preference file.
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationType::None => "none",
            NotificationType::Default => "default",
            NotificationType::LowPriority => "low_priority",
        }
    }

    /// Parse a stored value; `None` when the string is not recognised.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "none" => Some(NotificationType::None),
            "default" => Some(NotificationType::Default),
            "low_priority" => Some(NotificationType::LowPriority),
            _ => None,
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display priority handed to the presentation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Default,
    Min,
}

/// Alert category metadata, only attached when the platform supports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Error,
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Stable identifier for each presentation purpose.
///
/// Event ids are caller-supplied and live in their own namespace: `Event(1)`
/// and `Persistent` are distinct entries even though both carry raw id 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationId {
    Persistent,
    Restart,
    StopBackgroundWarning,
    Crash,
    Event(i32),
}

impl NotificationId {
    /// Numeric id as the host presentation layer knows it.
    pub fn raw(self) -> i32 {
        match self {
            NotificationId::Persistent => 1,
            NotificationId::Restart => 2,
            NotificationId::StopBackgroundWarning => 3,
            NotificationId::Crash => 9,
            NotificationId::Event(id) => id,
        }
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationId::Persistent => write!(f, "persistent"),
            NotificationId::Restart => write!(f, "restart"),
            NotificationId::StopBackgroundWarning => write!(f, "stop_background_warning"),
            NotificationId::Crash => write!(f, "crash"),
            NotificationId::Event(id) => write!(f, "event#{id}"),
        }
    }
}

/// What tapping a notification opens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LinkTarget {
    /// Entry screen; may request permissions before showing the main view.
    #[default]
    FirstStart,
    LogView,
    MainView,
    RestartAction,
    Custom(String),
}

impl fmt::Display for LinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkTarget::FirstStart => write!(f, "first_start"),
            LinkTarget::LogView => write!(f, "log_view"),
            LinkTarget::MainView => write!(f, "main_view"),
            LinkTarget::RestartAction => write!(f, "restart_action"),
            LinkTarget::Custom(target) => write!(f, "custom:{target}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// Host constraints, probed per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PlatformCapabilities {
    /// The host refuses background service starts unless the service is
    /// foreground-privileged.
    pub requires_foreground_for_background_start: bool,
    /// Alerts may carry a [`Category`].
    pub supports_category_metadata: bool,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_starting_and_active_are_running() {
        let running: Vec<_> = ServiceState::all()
            .iter()
            .copied()
            .filter(|s| s.is_running())
            .collect();
        assert_eq!(running, vec![ServiceState::Starting, ServiceState::Active]);
    }

    #[test]
    fn service_state_parses_case_insensitively() {
        assert_eq!("ACTIVE".parse::<ServiceState>(), Ok(ServiceState::Active));
        assert!("paused".parse::<ServiceState>().is_err());
    }

    #[test]
    fn notification_type_parse_rejects_unknown() {
        assert_eq!(NotificationType::parse("default"), Some(NotificationType::Default));
        assert_eq!(NotificationType::parse("loud"), None);
        assert_eq!(NotificationType::default(), NotificationType::LowPriority);
    }

    #[test]
    fn fixed_ids_match_host_numbers() {
        assert_eq!(NotificationId::Persistent.raw(), 1);
        assert_eq!(NotificationId::Restart.raw(), 2);
        assert_eq!(NotificationId::StopBackgroundWarning.raw(), 3);
        assert_eq!(NotificationId::Crash.raw(), 9);
        assert_eq!(NotificationId::Event(42).raw(), 42);
    }

    #[test]
    fn event_ids_do_not_alias_fixed_ids() {
        assert_ne!(NotificationId::Event(1), NotificationId::Persistent);
        assert_eq!(NotificationId::Event(7).to_string(), "event#7");
    }
}

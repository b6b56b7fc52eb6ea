//! Persistent-indicator policy.
//!
//! Decision order:
//! 1. Platform override: `always_run_in_background` on a host that refuses
//!    background starts forces foreground mode.
//! 2. Foreground mode needs a visible indicator, so `none` becomes `low_priority`.
//! 3. Show iff foreground, or running with a type other than `none`.
//! 4. A withdrawal under the platform override is a no-op.
//!
//! Everything here is pure; [`crate::presenter`] applies the result.

use serde::{Deserialize, Serialize};

use beacon_core::{
    Content, LinkTarget, NotificationId, NotificationType, PersistentContent,
    PlatformCapabilities, Preferences, Priority, ServiceState,
};

use crate::presentation::Presentation;

/// Effective notification settings for one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPolicy {
    pub kind: NotificationType,
    pub foreground: bool,
    /// `foreground` was set by the platform override, not by the user.
    pub forced_foreground: bool,
}

impl NotificationPolicy {
    pub fn derive(prefs: &Preferences, caps: &PlatformCapabilities) -> Self {
        let forced_foreground =
            caps.requires_foreground_for_background_start && prefs.always_run_in_background;
        let foreground = prefs.foreground_service || forced_foreground;

        let kind = match prefs.notification_type {
            NotificationType::None if foreground => NotificationType::LowPriority,
            kind => kind,
        };

        NotificationPolicy {
            kind,
            foreground,
            forced_foreground,
        }
    }

    pub fn shows_indicator(&self, running: bool) -> bool {
        self.foreground || (running && self.kind != NotificationType::None)
    }

    pub fn priority(&self) -> Priority {
        match self.kind {
            NotificationType::LowPriority => Priority::Min,
            _ => Priority::Default,
        }
    }
}

/// Shape of a shown persistent indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    pub priority: Priority,
    pub content: PersistentContent,
}

impl Indicator {
    pub fn presentation(&self) -> Presentation {
        Presentation {
            id: NotificationId::Persistent,
            content: Content::Persistent {
                variant: self.content,
            },
            priority: self.priority,
            target: LinkTarget::FirstStart,
            ongoing: true,
            auto_cancel: false,
            alert_once: false,
            long_text: false,
            ticker: false,
            category: None,
        }
    }
}

/// What to do with the persistent indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PersistentCommand {
    /// Promote to foreground privilege with the indicator.
    Foreground { indicator: Indicator },
    /// Drop foreground privilege, then post or update the indicator.
    Background { indicator: Indicator },
    /// Drop foreground privilege, then cancel the indicator.
    Withdraw,
    /// Platform override active: leave the foreground indicator in place.
    Retain,
}

impl PersistentCommand {
    pub fn indicator(&self) -> Option<&Indicator> {
        match self {
            PersistentCommand::Foreground { indicator }
            | PersistentCommand::Background { indicator } => Some(indicator),
            PersistentCommand::Withdraw | PersistentCommand::Retain => None,
        }
    }

    pub fn shows(&self) -> bool {
        self.indicator().is_some()
    }

    pub fn label(&self) -> &'static str {
        match self {
            PersistentCommand::Foreground { .. } => "foreground",
            PersistentCommand::Background { .. } => "background",
            PersistentCommand::Withdraw => "withdraw",
            PersistentCommand::Retain => "retain",
        }
    }
}

/// A full decision, kept together for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub state: ServiceState,
    pub running: bool,
    pub policy: NotificationPolicy,
    pub command: PersistentCommand,
}

/// Decide the persistent indicator for the given inputs.
pub fn decide(state: ServiceState, prefs: &Preferences, caps: &PlatformCapabilities) -> Decision {
    let policy = NotificationPolicy::derive(prefs, caps);
    let running = state.is_running();

    let command = if policy.shows_indicator(running) {
        let indicator = Indicator {
            priority: policy.priority(),
            content: PersistentContent::for_state(running, policy.foreground),
        };
        if policy.foreground {
            PersistentCommand::Foreground { indicator }
        } else {
            PersistentCommand::Background { indicator }
        }
    } else {
        withdrawal(&policy)
    };

    Decision {
        state,
        running,
        policy,
        command,
    }
}

/// Command for an explicit withdrawal request.
pub fn withdrawal(policy: &NotificationPolicy) -> PersistentCommand {
    if policy.forced_foreground {
        PersistentCommand::Retain
    } else {
        PersistentCommand::Withdraw
    }
}

//! Semantic content descriptors.
//!
//! The policy never produces display strings. It emits a [`Content`] value and
//! a text resolver turns that into a title and body. [`Content::fallback_text`]
//! is the built-in English rendering used when no resolver output is available.

use serde::{Deserialize, Serialize};

/// Application label used as the title of generic alerts.
pub const APP_NAME: &str = "Beacon";

/// Which variant of the persistent indicator to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistentContent {
    /// Service running, best-effort indicator.
    Running,
    /// Service running under foreground privilege.
    RunningForeground,
    /// Service not running, indicator kept for foreground privilege.
    DisabledForeground,
}

impl PersistentContent {
    /// Pick the descriptor for a shown indicator.
    ///
    /// A non-foreground indicator is only ever shown while running, so
    /// `(false, false)` maps to `Running` as well.
    pub fn for_state(running: bool, foreground: bool) -> Self {
        match (running, foreground) {
            (true, true) => PersistentContent::RunningForeground,
            (false, true) => PersistentContent::DisabledForeground,
            (_, false) => PersistentContent::Running,
        }
    }

    pub fn is_running(self) -> bool {
        !matches!(self, PersistentContent::DisabledForeground)
    }

    pub fn is_foreground(self) -> bool {
        !matches!(self, PersistentContent::Running)
    }
}

/// Everything Beacon can put on screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Content {
    Persistent { variant: PersistentContent },
    Crash { title: String },
    Restart,
    BackgroundDisabledWarning,
    Event { text: String },
}

/// Title and optional body, already in display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackText {
    pub title: String,
    pub body: Option<String>,
}

impl Content {
    /// Stable key naming the template family for this descriptor.
    pub fn key(&self) -> &'static str {
        match self {
            Content::Persistent { variant } => match variant {
                PersistentContent::Running => "persistent_running",
                PersistentContent::RunningForeground => "persistent_running_foreground",
                PersistentContent::DisabledForeground => "persistent_disabled_foreground",
            },
            Content::Crash { .. } => "crash",
            Content::Restart => "restart",
            Content::BackgroundDisabledWarning => "background_disabled",
            Content::Event { .. } => "event",
        }
    }

    /// Built-in English text for this descriptor. Matches the embedded
    /// templates rendered with [`APP_NAME`].
    pub fn fallback_text(&self) -> FallbackText {
        let (title, body) = match self {
            Content::Persistent { variant } => {
                let title = if variant.is_running() {
                    format!("{APP_NAME} is syncing")
                } else {
                    format!("{APP_NAME} is disabled")
                };
                let body = variant.is_foreground().then(|| {
                    "Running with foreground priority so the system keeps it alive".to_string()
                });
                (title, body)
            }
            Content::Crash { title } => (
                title.clone(),
                Some("The sync service stopped unexpectedly. Tap to view the log.".to_string()),
            ),
            Content::Restart => (
                "Restart required".to_string(),
                Some(format!("Tap to restart {APP_NAME} and apply the new settings.")),
            ),
            Content::BackgroundDisabledWarning => (
                APP_NAME.to_string(),
                Some(format!(
                    "Background execution was revoked by the system. \
                     Sync stays paused until {APP_NAME} is opened."
                )),
            ),
            Content::Event { text } => (APP_NAME.to_string(), Some(text.clone())),
        };
        FallbackText { title, body }
    }
}

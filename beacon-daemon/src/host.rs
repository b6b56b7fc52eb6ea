//! The daemon's single presenter and the events that drive it.
//!
//! [`PresenterHost`] is owned by one task; every callback reaches it through
//! that task's queue, so presenter calls never overlap.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use beacon_core::{prefs, LinkTarget, PreferenceMap, ServiceState};
use beacon_presenter::{ApiLevelProbe, CapabilityProbe, RecordingBackend, StatusPresenter};
use beacon_renderer::TemplateResolver;

use crate::error::DaemonError;
use crate::paths::{preferences_path, socket_path, templates_dir};

/// API level assumed when none is given on the command line.
pub const DEFAULT_API_LEVEL: u32 = 26;

/// One callback from the sync service or the preference layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    StateChanged {
        state: ServiceState,
    },
    PreferencesChanged,
    Crash {
        title: String,
        #[serde(default)]
        force: bool,
    },
    RestartScheduled,
    RestartFinished,
    BackgroundRevoked,
    SyncEvent {
        text: String,
        id: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<LinkTarget>,
    },
    ServiceStopped,
}

impl HostEvent {
    pub fn label(&self) -> &'static str {
        match self {
            HostEvent::StateChanged { .. } => "state_changed",
            HostEvent::PreferencesChanged => "preferences_changed",
            HostEvent::Crash { .. } => "crash",
            HostEvent::RestartScheduled => "restart_scheduled",
            HostEvent::RestartFinished => "restart_finished",
            HostEvent::BackgroundRevoked => "background_revoked",
            HostEvent::SyncEvent { .. } => "sync_event",
            HostEvent::ServiceStopped => "service_stopped",
        }
    }
}

pub struct PresenterHost {
    home: PathBuf,
    api_level: u32,
    started_at: DateTime<Utc>,
    state: ServiceState,
    presenter: StatusPresenter<RecordingBackend>,
}

impl PresenterHost {
    /// Build the host from `<home>/.beacon/`.
    ///
    /// An unreadable preference file is logged and treated as empty; broken
    /// template overrides are an error.
    pub fn load(home: &Path, api_level: u32) -> Result<Self, DaemonError> {
        let resolver = load_resolver(home)?;
        let presenter = StatusPresenter::new(
            RecordingBackend::new(),
            load_preferences_or_default(home),
            ApiLevelProbe::new(api_level),
        )
        .with_resolver(resolver);

        Ok(PresenterHost {
            home: home.to_path_buf(),
            api_level,
            started_at: Utc::now(),
            state: ServiceState::Stopped,
            presenter,
        })
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    pub fn presenter(&self) -> &StatusPresenter<RecordingBackend> {
        &self.presenter
    }

    /// Apply the indicator for the current state.
    pub fn reconcile(&mut self) -> Value {
        let command = self.presenter.reconcile(self.state);
        json!({ "state": self.state, "command": command })
    }

    /// Route one event to the presenter and describe what happened.
    pub fn handle(&mut self, event: HostEvent) -> Result<Value, DaemonError> {
        let label = event.label();
        tracing::debug!(event = label, "handling host event");

        let outcome = match event {
            HostEvent::StateChanged { state } => {
                self.state = state;
                self.reconcile()
            }
            HostEvent::PreferencesChanged => {
                let map = prefs::load_at(&self.home)?;
                self.presenter.replace_preferences(map);
                self.reconcile()
            }
            HostEvent::Crash { title, force } => {
                let shown = force || self.presenter.preferences().notify_crashes;
                self.presenter.show_crash_alert(&title, force)?;
                json!({ "shown": shown })
            }
            HostEvent::RestartScheduled => {
                self.presenter.show_restart_alert()?;
                json!({ "shown": true })
            }
            HostEvent::RestartFinished => {
                self.presenter.cancel_restart_alert()?;
                json!({ "cancelled": true })
            }
            HostEvent::BackgroundRevoked => {
                self.presenter.show_background_disabled_warning()?;
                json!({ "shown": true })
            }
            HostEvent::SyncEvent { text, id, target } => {
                let target = target.unwrap_or(LinkTarget::MainView);
                self.presenter.show_event_alert(&text, target, id)?;
                json!({ "shown": true, "id": id })
            }
            HostEvent::ServiceStopped => {
                self.state = ServiceState::Stopped;
                let command = self.presenter.cancel_persistent();
                json!({ "state": self.state, "command": command })
            }
        };

        Ok(json!({ "event": label, "outcome": outcome }))
    }

    pub fn status(&self) -> Value {
        let backend = self.presenter.backend();
        let displayed: Vec<Value> = backend
            .displayed()
            .map(|d| {
                json!({
                    "id": d.id,
                    "host_id": d.id.raw(),
                    "spec": d.spec,
                    "posted_at": d.posted_at,
                    "updated_at": d.updated_at,
                })
            })
            .collect();
        json!({
            "running": true,
            "version": env!("CARGO_PKG_VERSION"),
            "started_at": self.started_at.to_rfc3339(),
            "api_level": self.api_level,
            "capabilities": ApiLevelProbe::new(self.api_level).capabilities(),
            "state": self.state,
            "last_persistent": self.presenter.last_persistent(),
            "foreground": backend.foreground(),
            "displayed": displayed,
            "socket": socket_path(&self.home).display().to_string(),
            "preferences": preferences_path(&self.home).display().to_string(),
        })
    }
}

/// Embedded templates plus any overrides under `<home>/.beacon/templates/`.
pub fn load_resolver(home: &Path) -> Result<TemplateResolver, DaemonError> {
    let overrides = templates_dir(home);
    let resolver = if overrides.is_dir() {
        TemplateResolver::with_overrides(&overrides)?
    } else {
        TemplateResolver::new()?
    };
    Ok(resolver)
}

fn load_preferences_or_default(home: &Path) -> PreferenceMap {
    match prefs::load_at(home) {
        Ok(map) => map,
        Err(err) => {
            tracing::warn!(error = %err, "ignoring unreadable preferences at startup");
            PreferenceMap::new()
        }
    }
}

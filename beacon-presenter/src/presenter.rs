//! [`StatusPresenter`]: applies the policy to a presentation backend.
//!
//! The presenter owns its backend handle. Callers serialize invocations; no
//! method blocks or locks.

use beacon_core::{
    Content, LinkTarget, NotificationId, PlatformCapabilities, PreferenceStore, Preferences,
    ServiceState,
};
use beacon_renderer::{FallbackResolver, ResolvedText, TextResolver};

use crate::alerts;
use crate::backend::PresentationBackend;
use crate::error::BackendError;
use crate::platform::CapabilityProbe;
use crate::policy::{self, Decision, NotificationPolicy, PersistentCommand};
use crate::presentation::{NotificationSpec, Presentation};

/// Status-to-presentation policy bound to its collaborators.
pub struct StatusPresenter<B: PresentationBackend> {
    backend: B,
    preferences: Box<dyn PreferenceStore + Send>,
    probe: Box<dyn CapabilityProbe>,
    resolver: Box<dyn TextResolver>,
    last_persistent: Option<PersistentCommand>,
}

impl<B: PresentationBackend> StatusPresenter<B> {
    /// Build a presenter with the built-in English text.
    pub fn new(
        backend: B,
        preferences: impl PreferenceStore + Send + 'static,
        probe: impl CapabilityProbe + 'static,
    ) -> Self {
        StatusPresenter {
            backend,
            preferences: Box::new(preferences),
            probe: Box::new(probe),
            resolver: Box::new(FallbackResolver),
            last_persistent: None,
        }
    }

    pub fn with_resolver(mut self, resolver: impl TextResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Swap the preference source, e.g. after the preference file changed.
    pub fn replace_preferences(&mut self, preferences: impl PreferenceStore + Send + 'static) {
        self.preferences = Box::new(preferences);
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Last command applied to the persistent indicator.
    pub fn last_persistent(&self) -> Option<PersistentCommand> {
        self.last_persistent
    }

    /// Current preference snapshot.
    pub fn preferences(&self) -> Preferences {
        if let Some(raw) = Preferences::unrecognized_notification_type(self.preferences.as_ref()) {
            tracing::warn!("unrecognized notification_type '{raw}', using low_priority");
        }
        Preferences::read(self.preferences.as_ref())
    }

    pub fn capabilities(&self) -> PlatformCapabilities {
        self.probe.capabilities()
    }

    // -----------------------------------------------------------------------
    // Persistent indicator
    // -----------------------------------------------------------------------

    /// Decide without touching the backend.
    pub fn plan(&self, state: ServiceState) -> Decision {
        policy::decide(state, &self.preferences(), &self.capabilities())
    }

    /// Show, update or withdraw the persistent indicator for `state`.
    ///
    /// Backend failures are logged, never returned: the command is the
    /// decision, whether or not the backend accepted it.
    pub fn reconcile(&mut self, state: ServiceState) -> PersistentCommand {
        let decision = self.plan(state);
        if self.last_persistent == Some(decision.command) {
            tracing::debug!(
                "persistent indicator unchanged for state {state}: {}",
                decision.command.label()
            );
        } else {
            tracing::info!(
                "persistent indicator for state {state}: {} (type {}, foreground {})",
                decision.command.label(),
                decision.policy.kind,
                decision.policy.foreground
            );
        }
        self.apply(decision.command);
        decision.command
    }

    /// Withdraw the persistent indicator, unless the platform override pins it.
    pub fn cancel_persistent(&mut self) -> PersistentCommand {
        let policy = NotificationPolicy::derive(&self.preferences(), &self.capabilities());
        let command = policy::withdrawal(&policy);
        if command == PersistentCommand::Retain {
            tracing::info!("always-run-in-background pins the foreground indicator; not withdrawing");
        }
        self.apply(command);
        command
    }

    fn apply(&mut self, command: PersistentCommand) {
        match command {
            PersistentCommand::Foreground { indicator } => {
                let spec = self.build_spec(&indicator.presentation());
                let result = self
                    .backend
                    .promote_foreground(NotificationId::Persistent, &spec);
                log_failure("promote persistent indicator", result);
            }
            PersistentCommand::Background { indicator } => {
                let spec = self.build_spec(&indicator.presentation());
                log_failure("demote foreground", self.backend.demote_foreground());
                let result = self.backend.post(NotificationId::Persistent, &spec);
                log_failure("post persistent indicator", result);
            }
            PersistentCommand::Withdraw => {
                log_failure("demote foreground", self.backend.demote_foreground());
                let result = self.backend.cancel(NotificationId::Persistent);
                log_failure("cancel persistent indicator", result);
            }
            PersistentCommand::Retain => {}
        }
        self.last_persistent = Some(command);
    }

    // -----------------------------------------------------------------------
    // Transient alerts
    // -----------------------------------------------------------------------

    /// Crash alert; shown when forced or when `notify_crashes` is enabled.
    pub fn show_crash_alert(&mut self, title: &str, force: bool) -> Result<(), BackendError> {
        if !force && !self.preferences().notify_crashes {
            tracing::debug!("crash alert suppressed: notify_crashes is off");
            return Ok(());
        }
        self.post(&alerts::crash(title))
    }

    pub fn show_restart_alert(&mut self) -> Result<(), BackendError> {
        self.post(&alerts::restart())
    }

    pub fn cancel_restart_alert(&mut self) -> Result<(), BackendError> {
        self.backend.cancel(NotificationId::Restart)
    }

    pub fn show_background_disabled_warning(&mut self) -> Result<(), BackendError> {
        let caps = self.capabilities();
        self.post(&alerts::background_disabled(&caps))
    }

    /// Event alert under the caller's id; distinct ids coexist.
    pub fn show_event_alert(
        &mut self,
        text: &str,
        target: LinkTarget,
        id: i32,
    ) -> Result<(), BackendError> {
        self.post(&alerts::event(text, target, id))
    }

    fn post(&mut self, presentation: &Presentation) -> Result<(), BackendError> {
        let spec = self.build_spec(presentation);
        self.backend.post(presentation.id, &spec).map_err(|err| {
            tracing::warn!("failed to post {}: {err}", presentation.id);
            err
        })
    }

    fn build_spec(&self, presentation: &Presentation) -> NotificationSpec {
        NotificationSpec::build(presentation, self.resolve(&presentation.content))
    }

    fn resolve(&self, content: &Content) -> ResolvedText {
        self.resolver.resolve(content).unwrap_or_else(|err| {
            tracing::warn!("text resolution failed for {}: {err}; using fallback", content.key());
            let text = content.fallback_text();
            ResolvedText {
                title: text.title,
                body: text.body,
            }
        })
    }
}

fn log_failure(what: &str, result: Result<(), BackendError>) {
    if let Err(err) = result {
        tracing::warn!("{what} failed: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCall, RecordingBackend};
    use beacon_core::prefs::{KEY_FOREGROUND_SERVICE, KEY_NOTIFICATION_TYPE};
    use beacon_core::{PrefValue, PreferenceMap, Priority};
    use beacon_renderer::RenderError;

    struct BrokenResolver;

    impl TextResolver for BrokenResolver {
        fn resolve(&self, _content: &Content) -> Result<ResolvedText, RenderError> {
            Err(RenderError::Io {
                path: "missing.tera".into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            })
        }
    }

    fn presenter(map: PreferenceMap) -> StatusPresenter<RecordingBackend> {
        let _ = env_logger::builder().is_test(true).try_init();
        StatusPresenter::new(RecordingBackend::new(), map, PlatformCapabilities::default())
    }

    #[test]
    fn background_command_demotes_then_posts() {
        let mut p = presenter(PreferenceMap::new());
        let command = p.reconcile(ServiceState::Active);
        assert!(matches!(command, PersistentCommand::Background { .. }));
        assert_eq!(
            p.backend().calls(),
            &[
                BackendCall::DemoteForeground,
                BackendCall::Post(NotificationId::Persistent)
            ]
        );
    }

    #[test]
    fn resolver_failure_falls_back_to_builtin_text() {
        let mut p = presenter(PreferenceMap::new()).with_resolver(BrokenResolver);
        p.reconcile(ServiceState::Active);
        let shown = p.backend().get(NotificationId::Persistent).expect("indicator");
        assert_eq!(shown.spec.title, "Beacon is syncing");
    }

    #[test]
    fn backend_failure_does_not_change_decision() {
        let mut p = presenter(PreferenceMap::new());
        p.backend_mut().reject_next(2);
        let command = p.reconcile(ServiceState::Active);
        assert!(command.shows());
        assert_eq!(p.last_persistent(), Some(command));
        assert!(!p.backend().is_displayed(NotificationId::Persistent));
    }

    #[test]
    fn replace_preferences_takes_effect_on_next_reconcile() {
        let mut p = presenter(PreferenceMap::new());
        p.reconcile(ServiceState::Active);
        assert!(p.backend().is_displayed(NotificationId::Persistent));

        p.replace_preferences(
            PreferenceMap::new().with(KEY_NOTIFICATION_TYPE, PrefValue::Text("none".into())),
        );
        assert_eq!(p.reconcile(ServiceState::Active), PersistentCommand::Withdraw);
        assert!(!p.backend().is_displayed(NotificationId::Persistent));
    }

    #[test]
    fn foreground_indicator_uses_default_priority_for_default_type() {
        let map = PreferenceMap::new()
            .with(KEY_NOTIFICATION_TYPE, PrefValue::Text("default".into()))
            .with(KEY_FOREGROUND_SERVICE, PrefValue::Bool(true));
        let mut p = presenter(map);
        p.reconcile(ServiceState::Starting);
        let shown = p.backend().get(NotificationId::Persistent).expect("indicator");
        assert_eq!(shown.spec.priority, Priority::Default);
        assert!(shown.spec.ongoing);
        assert_eq!(p.backend().foreground(), Some(NotificationId::Persistent));
    }
}

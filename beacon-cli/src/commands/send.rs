//! `beacon send`: forward service callbacks to the daemon.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use beacon_core::ServiceState;
use beacon_daemon::{send_event, DaemonError, HostEvent};

use crate::LinkTargetArg;

#[derive(Subcommand, Debug)]
pub enum SendCommand {
    /// The service changed lifecycle state.
    State {
        /// stopped | starting | active | error | disabled
        state: ServiceState,
    },
    /// The preference file changed; reload and reconcile.
    PrefsChanged,
    /// The sync process crashed.
    Crash(CrashArgs),
    /// A restart is needed to apply settings.
    Restart,
    /// The pending restart happened.
    RestartDone,
    /// Background running was revoked by the host.
    BackgroundRevoked,
    /// A sync event worth telling the user about.
    Event(EventArgs),
    /// The service was stopped.
    Stopped,
}

#[derive(Args, Debug)]
pub struct CrashArgs {
    /// Alert title.
    #[arg(default_value = "Sync crashed")]
    pub title: String,

    /// Show even when crash notifications are turned off.
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct EventArgs {
    /// Caller-chosen id; reusing an id replaces that alert.
    pub id: i32,

    /// Alert text.
    pub text: String,

    /// What tapping the alert opens (first_start, log_view, main_view,
    /// restart_action or any custom name).
    #[arg(long)]
    pub target: Option<LinkTargetArg>,
}

impl From<SendCommand> for HostEvent {
    fn from(cmd: SendCommand) -> Self {
        match cmd {
            SendCommand::State { state } => HostEvent::StateChanged { state },
            SendCommand::PrefsChanged => HostEvent::PreferencesChanged,
            SendCommand::Crash(args) => HostEvent::Crash {
                title: args.title,
                force: args.force,
            },
            SendCommand::Restart => HostEvent::RestartScheduled,
            SendCommand::RestartDone => HostEvent::RestartFinished,
            SendCommand::BackgroundRevoked => HostEvent::BackgroundRevoked,
            SendCommand::Event(args) => HostEvent::SyncEvent {
                text: args.text,
                id: args.id,
                target: args.target.map(Into::into),
            },
            SendCommand::Stopped => HostEvent::ServiceStopped,
        }
    }
}

pub fn run(cmd: SendCommand) -> Result<()> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    let event = HostEvent::from(cmd);
    let label = event.label();

    match send_event(&home, event) {
        Ok(outcome) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&outcome).context("failed to render outcome JSON")?
            );
            Ok(())
        }
        Err(err @ DaemonError::DaemonNotRunning { .. }) => {
            Err(err).context("start it with `beacon daemon start`")
        }
        Err(err) => Err(err).with_context(|| format!("failed to send '{label}'")),
    }
}

//! Beacon: status presentation for a background sync service.
//!
//! # Usage
//!
//! ```text
//! beacon plan --state <stopped|starting|active|error|disabled> [--api-level N] [--json]
//! beacon prefs show [--json]
//! beacon prefs set <key> <value>
//! beacon prefs reset
//! beacon send <state|prefs-changed|crash|restart|restart-done|background-revoked|event|stopped> ...
//! beacon daemon start [--api-level N]|stop|status
//! ```

mod commands;

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};

use beacon_core::LinkTarget;
use commands::{daemon::DaemonCommand, plan::PlanArgs, prefs::PrefsCommand, send::SendCommand};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "beacon",
    version,
    about = "Decide and present sync-service status notifications",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show what the persistent indicator would do for a service state.
    Plan(PlanArgs),

    /// Inspect or edit ~/.beacon/preferences.yaml.
    Prefs {
        #[command(subcommand)]
        command: PrefsCommand,
    },

    /// Forward a service callback to the running daemon.
    Send {
        #[command(subcommand)]
        command: SendCommand,
    },

    /// Run or query the Beacon daemon.
    Daemon {
        #[command(subcommand)]
        command: DaemonCommand,
    },
}

// ---------------------------------------------------------------------------
// Shared LinkTarget argument
// ---------------------------------------------------------------------------

/// Thin wrapper so clap can parse `LinkTarget` from CLI args. Unknown names
/// become custom targets.
#[derive(Debug, Clone, Default)]
pub struct LinkTargetArg(pub LinkTarget);

impl FromStr for LinkTargetArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let target = match s.to_ascii_lowercase().as_str() {
            "" => return Err("link target must not be empty".to_string()),
            "first_start" => LinkTarget::FirstStart,
            "log_view" => LinkTarget::LogView,
            "main_view" => LinkTarget::MainView,
            "restart_action" => LinkTarget::RestartAction,
            _ => LinkTarget::Custom(s.to_string()),
        };
        Ok(Self(target))
    }
}

impl fmt::Display for LinkTargetArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<LinkTargetArg> for LinkTarget {
    fn from(t: LinkTargetArg) -> Self {
        t.0
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Plan(args) => args.run(),
        Commands::Prefs { command } => commands::prefs::run(command),
        Commands::Send { command } => commands::send::run(command),
        Commands::Daemon { command } => commands::daemon::run(command),
    }
}

//! `beacon plan`: dry-run the persistent-indicator decision.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use beacon_core::{prefs, NotificationId, PlatformCapabilities, Preferences, ServiceState};
use beacon_daemon::{load_resolver, DEFAULT_API_LEVEL};
use beacon_presenter::{
    ApiLevelProbe, BackendCall, Decision, NotificationSpec, PersistentCommand, RecordingBackend,
    StatusPresenter,
};

/// Arguments for `beacon plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Service state to plan for.
    #[arg(long)]
    pub state: ServiceState,

    /// Host API level used to probe platform capabilities.
    #[arg(long, default_value_t = DEFAULT_API_LEVEL)]
    pub api_level: u32,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct PlanReport {
    state: ServiceState,
    api_level: u32,
    capabilities: PlatformCapabilities,
    preferences: Preferences,
    decision: Decision,
    calls: Vec<BackendCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    indicator: Option<NotificationSpec>,
}

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "field")]
    field: String,
    #[tabled(rename = "value")]
    value: String,
}

impl PlanArgs {
    pub fn run(self) -> Result<()> {
        let home = dirs::home_dir().context("could not determine home directory")?;
        let map = prefs::load_at(&home).context("failed to load preferences")?;
        let resolver = load_resolver(&home).context("failed to load notification templates")?;

        let mut presenter = StatusPresenter::new(
            RecordingBackend::new(),
            map,
            ApiLevelProbe::new(self.api_level),
        )
        .with_resolver(resolver);

        let preferences = presenter.preferences();
        let capabilities = presenter.capabilities();
        let decision = presenter.plan(self.state);
        presenter.reconcile(self.state);

        let report = PlanReport {
            state: self.state,
            api_level: self.api_level,
            capabilities,
            preferences,
            decision,
            calls: presenter.backend().calls().to_vec(),
            indicator: presenter
                .backend()
                .get(NotificationId::Persistent)
                .map(|shown| shown.spec.clone()),
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize plan JSON")?
            );
            return Ok(());
        }

        print_table(&report);
        Ok(())
    }
}

fn print_table(report: &PlanReport) {
    let decision = &report.decision;
    println!(
        "Beacon v{} | state {} | api level {}",
        env!("CARGO_PKG_VERSION"),
        report.state,
        report.api_level,
    );

    let mut rows = vec![
        row("running", decision.running.to_string()),
        row("notification type", decision.policy.kind.to_string()),
        row("foreground", decision.policy.foreground.to_string()),
        row(
            "forced by platform",
            decision.policy.forced_foreground.to_string(),
        ),
        row("command", command_label(&decision.command)),
    ];
    if let Some(spec) = &report.indicator {
        rows.push(row("title", spec.title.clone()));
        if let Some(body) = &spec.body {
            rows.push(row("body", body.clone()));
        }
        rows.push(row("priority", format!("{:?}", spec.priority).to_lowercase()));
    }
    let calls: Vec<String> = report.calls.iter().map(call_label).collect();
    rows.push(row("backend calls", calls.join(", ")));

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn row(field: &str, value: String) -> PlanRow {
    PlanRow {
        field: field.to_string(),
        value,
    }
}

fn command_label(command: &PersistentCommand) -> String {
    let label = command.label().to_uppercase();
    match command {
        PersistentCommand::Foreground { .. } => label.green().bold().to_string(),
        PersistentCommand::Background { .. } => label.cyan().bold().to_string(),
        PersistentCommand::Withdraw => label.bright_black().bold().to_string(),
        PersistentCommand::Retain => label.yellow().bold().to_string(),
    }
}

fn call_label(call: &BackendCall) -> String {
    match call {
        BackendCall::Post(id) => format!("post {id}"),
        BackendCall::Cancel(id) => format!("cancel {id}"),
        BackendCall::PromoteForeground(id) => format!("promote {id}"),
        BackendCall::DemoteForeground => "demote".to_string(),
    }
}

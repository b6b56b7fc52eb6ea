//! `beacon prefs show|set|reset`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use serde_json::json;
use tabled::{settings::Style, Table, Tabled};

use beacon_core::{prefs, PreferenceMap, Preferences};

/// Inspect or edit the preference file.
#[derive(Subcommand, Debug)]
pub enum PrefsCommand {
    /// Print stored values and the effective preferences.
    Show(ShowArgs),

    /// Store one preference. `true`/`false` are stored as booleans.
    Set(SetArgs),

    /// Overwrite the file with every preference at its default.
    Reset,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Preference key, e.g. `notification_type`.
    pub key: String,

    /// New value.
    pub value: String,
}

#[derive(Tabled)]
struct PrefRow {
    #[tabled(rename = "key")]
    key: String,
    #[tabled(rename = "stored")]
    stored: String,
    #[tabled(rename = "effective")]
    effective: String,
}

pub fn run(cmd: PrefsCommand) -> Result<()> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    match cmd {
        PrefsCommand::Show(args) => show(&home, args),
        PrefsCommand::Set(args) => set(&home, args),
        PrefsCommand::Reset => {
            prefs::save_at(&home, &PreferenceMap::defaults())
                .context("failed to write preferences")?;
            println!("✓ Preferences reset to defaults");
            Ok(())
        }
    }
}

fn show(home: &std::path::Path, args: ShowArgs) -> Result<()> {
    let map = prefs::load_at(home).context("failed to load preferences")?;
    let effective = Preferences::read(&map);

    if args.json {
        let payload = json!({
            "path": prefs::path_at(home).display().to_string(),
            "stored": map,
            "effective": effective,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).context("failed to serialize preferences")?
        );
        return Ok(());
    }

    println!("{}", prefs::path_at(home).display());
    let effective_map = PreferenceMap::from(&effective);
    let rows: Vec<PrefRow> = prefs::KNOWN_KEYS
        .iter()
        .map(|key| PrefRow {
            key: key.to_string(),
            stored: map
                .0
                .get(*key)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string()),
            effective: effective_map
                .0
                .get(*key)
                .map(|v| v.to_string())
                .unwrap_or_default(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if let Some(raw) = Preferences::unrecognized_notification_type(&map) {
        println!(
            "{} notification_type '{}' is not recognised; low_priority is used",
            "warning:".yellow().bold(),
            raw
        );
    }
    Ok(())
}

fn set(home: &std::path::Path, args: SetArgs) -> Result<()> {
    let mut map = prefs::load_at(home).context("failed to load preferences")?;
    map.set_from_str(&args.key, &args.value)
        .with_context(|| format!("cannot set '{}'", args.key))?;
    prefs::save_at(home, &map).context("failed to write preferences")?;
    println!("✓ {} = {}", args.key, args.value.trim());
    Ok(())
}

mod bootstrap;

use std::io::Write;

use analyzer_core::settings::{Command, Settings};
use analyzer_runtime::data_manager::DataManager;
use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

fn main() -> Result<()> {
    let settings = Settings::parse();

    bootstrap::setup_logging(settings.effective_log_level())?;

    tracing::info!("Running Analyzer v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        "Raw: {}, Canonical: {}",
        settings.raw_path.display(),
        settings.canonical_path.display()
    );

    let manager = DataManager::new(settings.store_paths());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    run(&manager, &settings.command, &mut out)
}

/// Execute one command against `manager` and print its result as JSON.
fn run<W: Write>(manager: &DataManager, command: &Command, out: &mut W) -> Result<()> {
    match command {
        Command::Process => {
            let report = manager
                .reprocess()
                .context("failed to process raw activity data")?;
            write_json(out, &report)
        }
        Command::Stats => write_json(out, &manager.get_stats().context(UNAVAILABLE)?),
        Command::Activities { limit } => write_json(
            out,
            &manager.get_latest_activities(*limit).context(UNAVAILABLE)?,
        ),
        Command::Pace => write_json(out, &manager.get_pace_data().context(UNAVAILABLE)?),
        Command::Volume => write_json(out, &manager.get_volume_data().context(UNAVAILABLE)?),
        Command::Monthly => write_json(out, &manager.get_monthly_volume().context(UNAVAILABLE)?),
        Command::Efficiency => {
            write_json(out, &manager.get_efficiency_data().context(UNAVAILABLE)?)
        }
        Command::Cadence => write_json(out, &manager.get_cadence_data().context(UNAVAILABLE)?),
    }
}

const UNAVAILABLE: &str = "running data unavailable";

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use serde_json::Value;
use tracing::{debug, info};

use cdiff_engine::{enrich_with_id_labels, sample_report, Comparator};
use cdiff_types::{decode_remote_value, is_remote_response, DiffReport, Snapshot, SnapshotError};

use crate::cli::*;
use crate::config::{load_asset_labels, CliConfig};
use crate::render::render_text;

/// Fallback name for the other environment.
const DEFAULT_REMOTE_LABEL: &str = "Remote";

pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    if cli.no_color {
        colored::control::set_override(false);
    }
    let config = CliConfig::resolve(cli.config.as_deref())?;
    match cli.command {
        Command::Compare(args) => cmd_compare(args, config, &cli.format),
        Command::Sample(args) => cmd_sample(args, &cli.format),
    }
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Load the remote side, which may be a saved diff endpoint response.
///
/// A response carrying an error message fails here rather than comparing
/// against an empty snapshot.
pub fn load_remote(text: &str, label: &str) -> anyhow::Result<Snapshot> {
    let value: Value = serde_json::from_str(text).map_err(SnapshotError::from)?;
    if is_remote_response(&value) {
        let payload = decode_remote_value(value, Some(label))?;
        debug!(
            site_url = payload.site_url.as_deref().unwrap_or(""),
            environment = payload.environment.map(|e| e.as_str()).unwrap_or(""),
            "decoded remote response"
        );
        Ok(payload.entries_by_section)
    } else {
        Ok(Snapshot::from_value(value)?)
    }
}

pub fn compare_files(
    current: &Path,
    remote: &Path,
    comparator: &Comparator,
    remote_label: &str,
) -> anyhow::Result<DiffReport> {
    let current = Snapshot::from_json_str(&read_file(current)?)
        .with_context(|| format!("loading current snapshot {}", current.display()))?;
    let remote = load_remote(&read_file(remote)?, remote_label)
        .with_context(|| format!("loading remote snapshot {}", remote.display()))?;
    info!(
        current_entries = current.entry_count(),
        remote_entries = remote.entry_count(),
        "comparing snapshots"
    );
    Ok(comparator.compare(&current, &remote))
}

fn print_report(report: &DiffReport, format: &OutputFormat, remote_label: &str) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Text => print!("{}", render_text(report, remote_label)),
    }
    Ok(())
}

fn cmd_compare(args: CompareArgs, config: CliConfig, format: &OutputFormat) -> anyhow::Result<ExitCode> {
    let mut options = config.engine;
    if let Some(depth) = args.depth {
        options.max_block_depth = depth;
    }
    let remote_label = args
        .remote_label
        .or(config.remote_label)
        .unwrap_or_else(|| DEFAULT_REMOTE_LABEL.to_string());

    let mut report = compare_files(&args.current, &args.remote, &Comparator::new(options), &remote_label)?;

    if let Some(path) = args.asset_labels.or(config.asset_labels) {
        let resolver = load_asset_labels(&path)?;
        enrich_with_id_labels(&mut report, &resolver);
    }

    print_report(&report, format, &remote_label)?;

    if args.exit_code && !report.is_empty() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_sample(args: SampleArgs, format: &OutputFormat) -> anyhow::Result<ExitCode> {
    print_report(&sample_report(&args.section), format, DEFAULT_REMOTE_LABEL)?;
    Ok(ExitCode::SUCCESS)
}

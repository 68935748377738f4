use std::env;
use std::path::PathBuf;

use anyhow::{bail, Result};
use tracing::info;

use preheatkit::{init_logging, GcodeRewriter, PreheatConfig, BUILD_DATE, VERSION};

/// Default preheat lead time in seconds when no numeric argument is given.
const DEFAULT_LEAD_TIME_SECS: u64 = 40;

fn main() -> Result<()> {
    init_logging()?;
    info!("preheatkit {} (built {})", VERSION, BUILD_DATE);

    let args: Vec<String> = env::args().skip(1).collect();

    // The input file is the first argument naming an existing file, the lead
    // time is the first purely-numeric argument; both may appear anywhere.
    let input: Option<PathBuf> = args.iter().map(PathBuf::from).find(|p| p.is_file());
    let lead_time_secs = args
        .iter()
        .find(|a| !a.is_empty() && a.chars().all(|c| c.is_ascii_digit()))
        .and_then(|a| a.parse::<u64>().ok())
        .unwrap_or(DEFAULT_LEAD_TIME_SECS);

    let Some(path) = input else {
        bail!("no input file given (usage: preheatkit <gcode-file> [lead-seconds])");
    };

    let config = PreheatConfig {
        lead_time_secs: lead_time_secs as f64,
        ..PreheatConfig::default()
    };

    let report = GcodeRewriter::new(config).process_file(&path)?;
    info!(
        "rewrote {}: {} toolchange(s), {} preheat(s) inserted, {} cooldown(s) inhibited",
        path.display(),
        report.toolchanges,
        report.insertions,
        report.inhibited
    );

    Ok(())
}

//! Two-pass rewrite orchestration and persistence.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::config::PreheatConfig;
use crate::error::{PreheatError, Result};
use crate::estimator::{MachineState, MoveTimeEstimator};
use crate::inhibitor::CooldownInhibitor;
use crate::line::{classify, LineKind};
use crate::scanner::scan;
use crate::scheduler::InsertionScheduler;

/// Counters describing what one run changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteReport {
    /// Toolchange events with a resolved tool.
    pub toolchanges: usize,
    /// Preheat commands inserted (one per resolved event).
    pub insertions: usize,
    /// Cooldown lines rewritten as annotated no-ops.
    pub inhibited: usize,
}

/// Orchestrates the scan and emission passes over one G-code file.
pub struct GcodeRewriter {
    config: PreheatConfig,
}

impl GcodeRewriter {
    pub fn new(config: PreheatConfig) -> Self {
        Self { config }
    }

    /// Rewrite the file at `path` in place.
    ///
    /// The whole input is loaded into memory and the final buffer overwrites
    /// the input path directly; there is no temporary file or atomic rename,
    /// so a failure mid-write can leave a partially written file.
    pub fn process_file(&self, path: &Path) -> Result<RewriteReport> {
        if !path.exists() {
            return Err(PreheatError::InputNotFound(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(PreheatError::NotAFile(path.to_path_buf()));
        }

        let input = fs::read_to_string(path)?;
        let (output, report) = self.rewrite(&input);
        fs::write(path, output)?;

        info!(
            "{}: {} toolchange(s), {} insertion(s), {} inhibition(s)",
            path.display(),
            report.toolchanges,
            report.insertions,
            report.inhibited
        );
        Ok(report)
    }

    /// Rewrite G-code text, returning the new text and the run counters.
    pub fn rewrite(&self, input: &str) -> (String, RewriteReport) {
        let lines: Vec<String> = input.lines().map(str::to_string).collect();

        // Pass 1: read-only scan.
        let scan_result = scan(&lines, &self.config);

        // Pass 2: emission.
        let estimator = MoveTimeEstimator::new(self.config.accel_compensation);
        let inhibitor =
            CooldownInhibitor::new(&scan_result.time_table, &scan_result.events, &self.config);
        let scheduler = InsertionScheduler::new(&self.config);

        let mut output: Vec<String> = Vec::with_capacity(lines.len() + scan_result.events.len());
        let mut state = MachineState::default();
        let mut last_usage: HashMap<u32, usize> = HashMap::new();
        let mut region_output_index: Option<usize> = None;
        let mut next_event = 0;
        let mut report = RewriteReport {
            toolchanges: scan_result.events.len(),
            ..RewriteReport::default()
        };

        for (i, line) in lines.iter().enumerate() {
            let gate_open = scan_result.region_start.map_or(false, |r| i >= r);

            if region_output_index.is_none() && scan_result.region_start == Some(i) {
                region_output_index = Some(output.len());
            }

            // Insert the preheat for any event anchored on this line before
            // the line itself is appended.
            if let Some(region_index) = region_output_index {
                while next_event < scan_result.events.len()
                    && scan_result.events[next_event].line_index == i
                {
                    let event = &scan_result.events[next_event];
                    let usage_index = last_usage.get(&event.tool).copied();
                    let at = scheduler.plan(&output, region_index, usage_index, state);
                    output.insert(at, scheduler.heat_command(event));
                    debug!(
                        "inserted preheat for T{} at output line {} (anchor line {})",
                        event.tool,
                        at + 1,
                        i + 1
                    );
                    // Earlier-referenced positions at or past the insertion
                    // point have shifted by one.
                    for index in last_usage.values_mut() {
                        if *index >= at {
                            *index += 1;
                        }
                    }
                    report.insertions += 1;
                    next_event += 1;
                }
            }

            let emitted = if gate_open {
                match inhibitor.check(i, line) {
                    Some(replacement) => {
                        report.inhibited += 1;
                        replacement
                    }
                    None => line.clone(),
                }
            } else {
                line.clone()
            };

            match classify(line) {
                LineKind::Motion(fields) => {
                    let (_, new_state) = estimator.estimate(fields, state);
                    state = new_state;
                }
                LineKind::ToolSelect(tool) => {
                    last_usage.insert(tool, output.len());
                }
                LineKind::SetTemp(fields) => {
                    if let Some(tool) = fields.tool {
                        last_usage.insert(tool, output.len());
                    }
                }
                _ => {}
            }

            output.push(emitted);
        }

        let mut text = output.join("\n");
        if input.ends_with('\n') {
            text.push('\n');
        }
        (text, report)
    }
}

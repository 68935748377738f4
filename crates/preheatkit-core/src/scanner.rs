//! Forward scan: per-line time table and ordered toolchange event list.

use tracing::{debug, warn};

use crate::config::PreheatConfig;
use crate::estimator::{MachineState, MoveTimeEstimator};
use crate::line::{classify, tool_token, LineKind};

/// Print temperature assumed when a tool resolves but no qualifying
/// set-temperature command appears in the lookahead window.
const DEFAULT_PRINT_TEMP: f64 = 220.0;

/// One detected tool change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolchangeEvent {
    /// Index of the toolchange marker line in the original file. Insertion
    /// planning works backward from this anchor.
    pub line_index: usize,
    /// Resolved incoming tool id.
    pub tool: u32,
    /// Resolved print temperature, always above the standby threshold.
    pub temp: f64,
}

/// Result of the read-only scan pass.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Elapsed-time estimate per input line, indexed by original position.
    /// Non-motion lines contribute zero; every entry is >= 0.
    pub time_table: Vec<f64>,
    /// Toolchange events ordered by anchor line index, at most one per
    /// detected block.
    pub events: Vec<ToolchangeEvent>,
    /// Index of the first region-start marker line, if any.
    pub region_start: Option<usize>,
}

/// Run the scan pass over the raw input lines.
///
/// Machine state spans the whole file, so the time table is populated for
/// preamble lines too; the region gate only suppresses marker matching and
/// event recording (thumbnail payload must never be interpreted).
pub fn scan(lines: &[String], config: &PreheatConfig) -> ScanResult {
    let estimator = MoveTimeEstimator::new(config.accel_compensation);
    let mut state = MachineState::default();
    let mut time_table = vec![0.0; lines.len()];
    let mut events = Vec::new();
    let mut region_start = None;

    for (i, line) in lines.iter().enumerate() {
        match classify(line) {
            LineKind::Motion(fields) => {
                let (time, new_state) = estimator.estimate(fields, state);
                time_table[i] = time;
                state = new_state;
            }
            LineKind::RegionStart if region_start.is_none() => {
                region_start = Some(i);
            }
            LineKind::ToolchangeMarker if region_start.is_some() => {
                match resolve_event(lines, i, config) {
                    Some(event) => {
                        debug!(
                            "toolchange at line {}: T{} -> {}C",
                            i + 1,
                            event.tool,
                            event.temp
                        );
                        events.push(event);
                    }
                    None => {
                        warn!(
                            "toolchange at line {}: no tool resolved within {} lines, skipping",
                            i + 1,
                            config.lookahead_lines
                        );
                    }
                }
            }
            _ => {}
        }
    }

    ScanResult {
        time_table,
        events,
        region_start,
    }
}

/// Resolve the incoming tool and its true print temperature for one block.
///
/// The window is bounded; the tool id tracks the latest selection token seen,
/// and the first targeted temperature above the standby threshold wins.
/// Standby setpoints do not terminate the search. No tool id means no event.
fn resolve_event(
    lines: &[String],
    marker_index: usize,
    config: &PreheatConfig,
) -> Option<ToolchangeEvent> {
    let end = (marker_index + config.lookahead_lines).min(lines.len());
    let mut tool: Option<u32> = None;

    for line in &lines[marker_index..end] {
        if let Some(t) = tool_token(line) {
            tool = Some(t);
        }
        if let Some(t) = tool {
            if let LineKind::SetTemp(fields) = classify(line) {
                if fields.tool == Some(t) && fields.temp > config.standby_temp {
                    return Some(ToolchangeEvent {
                        line_index: marker_index,
                        tool: t,
                        temp: fields.temp,
                    });
                }
            }
        }
    }

    tool.map(|t| ToolchangeEvent {
        line_index: marker_index,
        tool: t,
        temp: DEFAULT_PRINT_TEMP,
    })
}

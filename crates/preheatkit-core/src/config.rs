//! Configuration for a single rewrite run.

use serde::{Deserialize, Serialize};

/// Settings controlling preheat scheduling and cooldown inhibition.
///
/// One value is built per invocation; nothing is persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreheatConfig {
    /// Requested preheat lead time in seconds. The scheduler tries to place
    /// each heat command this far (in estimated machine time) ahead of its
    /// tool change.
    pub lead_time_secs: f64,

    /// Apply the slow-move acceleration correction (moves under 30 units/s
    /// take ~25% longer than distance/speed suggests).
    pub accel_compensation: bool,

    /// Temperatures at or below this are standby/soften setpoints, not print
    /// temperatures.
    pub standby_temp: f64,

    /// Extra margin (seconds) added to the lead time when deciding whether a
    /// cooldown would turn a tool cold too close to its next use.
    pub safety_margin_secs: f64,

    /// Number of lines scanned after a toolchange marker when resolving the
    /// incoming tool and its print temperature.
    pub lookahead_lines: usize,
}

impl Default for PreheatConfig {
    fn default() -> Self {
        Self {
            lead_time_secs: 40.0,
            accel_compensation: true,
            standby_temp: 150.0,
            safety_margin_secs: 10.0,
            lookahead_lines: 80,
        }
    }
}

impl PreheatConfig {
    /// Default configuration with the given lead time.
    pub fn with_lead_time(lead_time_secs: f64) -> Self {
        Self {
            lead_time_secs,
            ..Self::default()
        }
    }

    /// Lead time plus safety margin: the minimum idle gap below which a
    /// cooldown is inhibited.
    pub fn inhibit_budget_secs(&self) -> f64 {
        self.lead_time_secs + self.safety_margin_secs
    }
}

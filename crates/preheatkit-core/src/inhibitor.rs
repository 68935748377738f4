//! Cooldown inhibition: suppress standby setpoints issued too close to the
//! tool's next use.

use tracing::debug;

use crate::config::PreheatConfig;
use crate::line::{classify, LineKind};
use crate::scanner::ToolchangeEvent;

/// Decides, per heating line, whether a cooldown would turn a tool cold only
/// to re-heat it moments later.
pub struct CooldownInhibitor<'a> {
    time_table: &'a [f64],
    events: &'a [ToolchangeEvent],
    config: &'a PreheatConfig,
}

impl<'a> CooldownInhibitor<'a> {
    pub fn new(
        time_table: &'a [f64],
        events: &'a [ToolchangeEvent],
        config: &'a PreheatConfig,
    ) -> Self {
        Self {
            time_table,
            events,
            config,
        }
    }

    /// Check the line at `index`. Returns the annotated no-op replacement if
    /// the cooldown must be suppressed, `None` if the line passes through.
    ///
    /// Only targeted set-temperature commands at or below the standby
    /// threshold qualify; the gap is the summed time table strictly between
    /// the cooldown line and the tool's next toolchange anchor.
    pub fn check(&self, index: usize, line: &str) -> Option<String> {
        let LineKind::SetTemp(fields) = classify(line) else {
            return None;
        };
        let tool = fields.tool?;
        if fields.temp > self.config.standby_temp {
            return None;
        }

        let event = self
            .events
            .iter()
            .find(|e| e.tool == tool && e.line_index > index)?;

        let gap: f64 = self.time_table[index + 1..event.line_index].iter().sum();
        let budget = self.config.inhibit_budget_secs();
        if gap >= budget {
            return None;
        }

        debug!(
            "inhibiting cooldown at line {}: T{} needed again in {:.1}s",
            index + 1,
            tool,
            gap
        );
        Some(format!(
            "; cooldown inhibited: T{} needed again in {:.1}s (< {}s) ; was: {}",
            tool, gap, budget, line
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PreheatConfig {
        PreheatConfig::default()
    }

    fn event_at(line_index: usize, tool: u32) -> ToolchangeEvent {
        ToolchangeEvent {
            line_index,
            tool,
            temp: 220.0,
        }
    }

    #[test]
    fn test_short_gap_is_suppressed() {
        // 5 seconds of moves between cooldown (line 0) and anchor (line 6)
        let time_table = vec![0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0];
        let events = vec![event_at(6, 0)];
        let cfg = config();
        let inhibitor = CooldownInhibitor::new(&time_table, &events, &cfg);

        let replacement = inhibitor.check(0, "M104 S0 T0").expect("should suppress");
        assert!(replacement.starts_with("; cooldown inhibited"));
        assert!(replacement.contains("5.0s"));
        assert!(replacement.contains("M104 S0 T0"));
    }

    #[test]
    fn test_sufficient_gap_passes() {
        let time_table = vec![1.0; 62];
        let events = vec![event_at(61, 0)];
        let cfg = config();
        let inhibitor = CooldownInhibitor::new(&time_table, &events, &cfg);
        // Gap of 60s >= 40 + 10
        assert!(inhibitor.check(0, "M104 S0 T0").is_none());
    }

    #[test]
    fn test_gap_exactly_at_budget_passes() {
        // 50 one-second entries strictly between line 0 and line 51
        let time_table = vec![1.0; 52];
        let events = vec![event_at(51, 0)];
        let cfg = config();
        let inhibitor = CooldownInhibitor::new(&time_table, &events, &cfg);
        assert!(inhibitor.check(0, "M104 S0 T0").is_none());
    }

    #[test]
    fn test_other_tool_events_do_not_inhibit() {
        let time_table = vec![0.0, 1.0, 0.0];
        let events = vec![event_at(2, 1)];
        let cfg = config();
        let inhibitor = CooldownInhibitor::new(&time_table, &events, &cfg);
        assert!(inhibitor.check(0, "M104 S0 T0").is_none());
    }

    #[test]
    fn test_print_temps_and_untargeted_commands_pass() {
        let time_table = vec![0.0, 1.0, 0.0];
        let events = vec![event_at(2, 0)];
        let cfg = config();
        let inhibitor = CooldownInhibitor::new(&time_table, &events, &cfg);
        assert!(inhibitor.check(0, "M104 S220 T0").is_none());
        assert!(inhibitor.check(0, "M104 S0").is_none());
        assert!(inhibitor.check(0, "G1 X10").is_none());
    }

    #[test]
    fn test_no_following_event_passes() {
        let time_table = vec![0.0, 1.0, 0.0];
        let events = vec![event_at(0, 0)];
        let cfg = config();
        let inhibitor = CooldownInhibitor::new(&time_table, &events, &cfg);
        // The only event is behind the cooldown line
        assert!(inhibitor.check(1, "M104 S0 T0").is_none());
    }
}

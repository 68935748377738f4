//! Preheat insertion scheduling.
//!
//! For each toolchange event the scheduler walks backward through the output
//! emitted so far, accumulating estimated move time until the lead-time
//! budget is met or a bound is reached, and picks the insertion index.

use crate::config::PreheatConfig;
use crate::estimator::{MachineState, MoveTimeEstimator};
use crate::scanner::ToolchangeEvent;

/// Plans the position of one heating command per toolchange event.
pub struct InsertionScheduler<'a> {
    config: &'a PreheatConfig,
    estimator: MoveTimeEstimator,
}

impl<'a> InsertionScheduler<'a> {
    pub fn new(config: &'a PreheatConfig) -> Self {
        Self {
            config,
            estimator: MoveTimeEstimator::new(config.accel_compensation),
        }
    }

    /// Choose the insertion index in `buffer` for an event anchored at the
    /// end of the buffer.
    ///
    /// `region_index` is the output position of the region-start marker (the
    /// walk never crosses it) and `usage_index` the last output position at
    /// which the event's tool was actively referenced (the floor). The walk
    /// stops as soon as accumulated time reaches the lead budget, so the
    /// chosen index is the furthest-back position satisfying both bounds.
    ///
    /// Move times are recomputed on the buffer itself, seeded from the
    /// emission-time machine state; the original-position time table cannot
    /// be reused here because earlier insertions have shifted the buffer.
    pub fn plan(
        &self,
        buffer: &[String],
        region_index: usize,
        usage_index: Option<usize>,
        state: MachineState,
    ) -> usize {
        let floor = usage_index
            .map(|u| u + 1)
            .unwrap_or(0)
            .max(region_index + 1);

        let mut walk_state = state;
        let mut accumulated = 0.0;
        let mut insert_at = buffer.len();
        let mut k = buffer.len();

        while k > floor {
            k -= 1;
            let (time, next_state) = self.estimator.estimate_line(&buffer[k], walk_state);
            accumulated += time;
            walk_state = next_state;
            insert_at = k;
            if accumulated >= self.config.lead_time_secs {
                break;
            }
        }

        insert_at
    }

    /// Render the heating command for a resolved event.
    pub fn heat_command(&self, event: &ToolchangeEvent) -> String {
        format!(
            "M104 S{} T{} ; {}s preheat",
            event.temp, event.tool, self.config.lead_time_secs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moves(n: usize) -> Vec<String> {
        // Alternating 60-unit moves at 60 units/s: one second each
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    "G1 X60 F3600".to_string()
                } else {
                    "G1 X0".to_string()
                }
            })
            .collect()
    }

    fn event() -> ToolchangeEvent {
        ToolchangeEvent {
            line_index: 0,
            tool: 1,
            temp: 220.0,
        }
    }

    #[test]
    fn test_budget_stops_walk() {
        let config = PreheatConfig::with_lead_time(3.0);
        let scheduler = InsertionScheduler::new(&config);
        let mut buffer = vec![";----- End Start_gcode ------".to_string()];
        buffer.extend(moves(10));

        let state = MachineState {
            x: 0.0,
            feedrate: 3600.0,
            ..MachineState::default()
        };
        let index = scheduler.plan(&buffer, 0, None, state);
        // Walking back from the buffer end accumulates one second per move
        // line (the line nearest the anchor repeats the end position and
        // contributes zero), so the budget is met a few lines back.
        assert!(index > 0);
        assert!(index >= buffer.len() - 5);
        assert!(index < buffer.len());
    }

    #[test]
    fn test_region_bound_caps_walk() {
        let config = PreheatConfig::with_lead_time(500.0);
        let scheduler = InsertionScheduler::new(&config);
        let mut buffer = vec![
            "; thumbnail payload".to_string(),
            ";----- End Start_gcode ------".to_string(),
        ];
        buffer.extend(moves(5));

        let index = scheduler.plan(&buffer, 1, None, MachineState::default());
        // Budget unreachable: pinned directly after the region marker
        assert_eq!(index, 2);
    }

    #[test]
    fn test_usage_floor_caps_walk() {
        let config = PreheatConfig::with_lead_time(500.0);
        let scheduler = InsertionScheduler::new(&config);
        let mut buffer = vec![";----- End Start_gcode ------".to_string()];
        buffer.extend(moves(8));

        let index = scheduler.plan(&buffer, 0, Some(4), MachineState::default());
        // Never insert while the tool is still printing from its previous
        // assignment
        assert_eq!(index, 5);
    }

    #[test]
    fn test_empty_span_inserts_at_end() {
        let config = PreheatConfig::default();
        let scheduler = InsertionScheduler::new(&config);
        let buffer = vec![";----- End Start_gcode ------".to_string()];
        let index = scheduler.plan(&buffer, 0, None, MachineState::default());
        assert_eq!(index, 1);
    }

    #[test]
    fn test_heat_command_format() {
        let config = PreheatConfig::with_lead_time(40.0);
        let scheduler = InsertionScheduler::new(&config);
        assert_eq!(scheduler.heat_command(&event()), "M104 S220 T1 ; 40s preheat");
    }
}

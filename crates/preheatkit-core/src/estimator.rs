//! Kinematic time estimation for linear moves.
//!
//! State is threaded by value through every call: the estimator takes the
//! carried [`MachineState`], returns the updated one, and never holds
//! mutable state of its own.

use crate::line::{classify, LineKind, MotionFields};

/// Below this speed (units/s) the acceleration correction applies.
const SLOW_MOVE_SPEED: f64 = 30.0;

/// Slow moves spend a noticeable fraction of each segment accelerating and
/// decelerating instead of cruising at the commanded feedrate.
const SLOW_MOVE_FACTOR: f64 = 1.25;

/// Default feedrate (units/min) before any F word has been seen.
const DEFAULT_FEEDRATE: f64 = 1200.0;

/// Last-known motion state, carried across the entire file as one continuous
/// timeline (never reset per tool).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineState {
    /// Planar position.
    pub x: f64,
    pub y: f64,
    /// Extrusion position.
    pub e: f64,
    /// Feedrate in units per minute.
    pub feedrate: f64,
}

impl Default for MachineState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            e: 0.0,
            feedrate: DEFAULT_FEEDRATE,
        }
    }
}

/// Converts a single motion line plus carried state into an elapsed-time
/// contribution and updated state.
#[derive(Debug, Clone, Copy)]
pub struct MoveTimeEstimator {
    accel_compensation: bool,
}

impl MoveTimeEstimator {
    /// Create an estimator, optionally applying the slow-move acceleration
    /// correction.
    pub fn new(accel_compensation: bool) -> Self {
        Self { accel_compensation }
    }

    /// Estimate the time of one move and return the updated state.
    ///
    /// Any absent field inherits the prior state's value. Extrusion distance
    /// counts only when neither X nor Y is present (retract/prime moves);
    /// otherwise planar motion dominates.
    pub fn estimate(&self, fields: MotionFields, state: MachineState) -> (f64, MachineState) {
        let new_state = MachineState {
            x: fields.x.unwrap_or(state.x),
            y: fields.y.unwrap_or(state.y),
            e: fields.e.unwrap_or(state.e),
            feedrate: fields.f.unwrap_or(state.feedrate),
        };

        let dx = new_state.x - state.x;
        let dy = new_state.y - state.y;
        let dist_xy = (dx * dx + dy * dy).sqrt();
        let dist_e = if fields.x.is_none() && fields.y.is_none() {
            (new_state.e - state.e).abs()
        } else {
            0.0
        };
        let dist = if dist_xy > 0.0 { dist_xy } else { dist_e };

        let speed = new_state.feedrate / 60.0;
        let mut time = if speed > 0.0 { dist / speed } else { 0.0 };

        if self.accel_compensation && speed < SLOW_MOVE_SPEED && dist > 0.0 {
            time *= SLOW_MOVE_FACTOR;
        }

        (time, new_state)
    }

    /// Estimate a raw line: motion lines contribute time, everything else
    /// contributes zero and leaves the state untouched.
    pub fn estimate_line(&self, line: &str, state: MachineState) -> (f64, MachineState) {
        match classify(line) {
            LineKind::Motion(fields) => self.estimate(fields, state),
            _ => (0.0, state),
        }
    }
}

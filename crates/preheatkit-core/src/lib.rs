//! # Preheatkit Core
//!
//! This crate implements the processing pipeline behind the preheatkit
//! binary: it rewrites multi-tool G-code so every nozzle is hot exactly when
//! its tool change arrives.
//!
//! ## Pipeline
//!
//! - **Line classifier**: tags each raw line as a motion command, heating
//!   command, tool-change marker, region-start marker, tool selection, or
//!   other text, with typed optional fields
//! - **Time estimator**: converts motion lines plus carried machine state
//!   into elapsed-time estimates
//! - **Toolchange scanner**: one forward pass building the per-line time
//!   table and the ordered tool-change event list
//! - **Cooldown inhibitor**: suppresses standby/cooldown commands issued too
//!   close to a tool's next use
//! - **Insertion scheduler**: walks backward through emitted output to place
//!   each preheat command as early as budget and safety allow
//! - **Rewriter**: orchestrates the scan and emission passes and persists
//!   the result in place

pub mod config;
pub mod error;
pub mod estimator;
pub mod inhibitor;
pub mod line;
pub mod rewriter;
pub mod scanner;
pub mod scheduler;

pub use config::PreheatConfig;
pub use error::{PreheatError, Result};
pub use estimator::{MachineState, MoveTimeEstimator};
pub use inhibitor::CooldownInhibitor;
pub use line::{classify, LineKind, MotionFields, TempFields};
pub use rewriter::{GcodeRewriter, RewriteReport};
pub use scanner::{scan, ScanResult, ToolchangeEvent};
pub use scheduler::InsertionScheduler;

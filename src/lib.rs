//! # Preheatkit
//!
//! A G-code post-processor for multi-tool 3D printers. It rewrites a sliced
//! print file so that ahead of every tool change the next nozzle's heater is
//! commanded on early enough to reach temperature exactly when the tool is
//! needed, and premature cooldown commands that would force a re-heat are
//! suppressed.
//!
//! ## Architecture
//!
//! Preheatkit is organized as a workspace:
//!
//! 1. **preheatkit-core** - Line classification, kinematic time estimation,
//!    toolchange scanning, cooldown inhibition, and preheat scheduling
//! 2. **preheatkit** - Main binary: CLI argument selection, logging setup,
//!    exit codes
//!
//! The binary is thin glue; all processing lives in the core crate.

pub use preheatkit_core::{
    classify, scan, CooldownInhibitor, GcodeRewriter, InsertionScheduler, LineKind, MachineState,
    MotionFields, MoveTimeEstimator, PreheatConfig, PreheatError, Result, RewriteReport,
    ScanResult, TempFields, ToolchangeEvent,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output to stderr
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}

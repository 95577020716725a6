//! Structured logging plus the one wire-mandated message format
//! (SPEC_FULL.md §2). `tracing`/`tracing-subscriber` carry ambient spans and
//! events (the idiom used elsewhere in the retrieved pack); the per-chunk
//! warning line that spec.md §7 pins to an exact shape is produced by a
//! dedicated `chrono`-based formatter instead, since its format is an
//! interop requirement, not a style choice.

use chrono::Local;
use tracing_subscriber::EnvFilter;

use crate::unit::UnitError;

/// Initialize the global `tracing` subscriber. Verbosity is controlled by
/// `RUST_LOG`, defaulting to `warn` so a plain invocation stays quiet
/// (spec.md §6: `-Q` suppresses non-fatal warnings entirely; that is
/// layered on top of this, in the driver, not here).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Render a dropped-chunk warning in the exact format spec.md §7 mandates:
/// `(HH:MM:SS) failure in <unit>: <message>`.
pub fn format_unit_warning(err: &UnitError) -> String {
    format!("({}) {}", Local::now().format("%H:%M:%S"), err)
}

/// Emit the warning to stderr unless `-Q` is in effect, and also record it
/// as a `tracing` event so anything collecting structured logs still sees
/// the failure.
pub fn warn_dropped_chunk(err: &UnitError, path: &str, quiet: bool) {
    tracing::warn!(unit = %err.unit, path = %path, message = %err.message, "dropping chunk");
    if !quiet {
        eprintln!("{}", format_unit_warning(err));
    }
}

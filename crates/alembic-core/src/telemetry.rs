// SPDX-License-Identifier: Apache-2.0
//! Derivation observers.
//!
//! The closure reports pass-by-pass progress to a [`DerivationTelemetry`]
//! sink. Sinks are diagnostic only and must never influence derivation
//! results. The default sink is [`NullTelemetry`]; the `telemetry` feature
//! adds a JSONL sink writing one line per event to stdout.

/// Observer for derivation progress.
///
/// Implementations take `&self`; sinks that accumulate state use interior
/// mutability.
pub trait DerivationTelemetry {
    /// One frontier pass finished. `frontier_len` is the number of newly
    /// discovered values awaiting the next pass; `catalog_len` is the number
    /// of definitions derived so far.
    fn on_pass(&self, pass: usize, frontier_len: usize, catalog_len: usize);

    /// Derivation converged after `passes` passes.
    fn on_complete(&self, passes: usize, catalog_len: usize);

    /// The runaway guard tripped: `catalog_len` exceeded `cap`.
    fn on_runaway(&self, cap: usize, catalog_len: usize);
}

/// Sink that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullTelemetry;

impl DerivationTelemetry for NullTelemetry {
    fn on_pass(&self, _pass: usize, _frontier_len: usize, _catalog_len: usize) {}
    fn on_complete(&self, _passes: usize, _catalog_len: usize) {}
    fn on_runaway(&self, _cap: usize, _catalog_len: usize) {}
}

pub(crate) static NULL_TELEMETRY: NullTelemetry = NullTelemetry;

#[cfg(feature = "telemetry")]
fn ts_micros() -> u128 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros()
}

/// Sink that writes one JSON object per event to stdout.
///
/// JSON is assembled manually; every field is numeric, so no escaping is
/// needed and no serialization dependency is pulled in. Writes are
/// best-effort: I/O errors are ignored and timestamps fall back to 0 on
/// clock errors.
#[cfg(feature = "telemetry")]
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutTelemetry;

#[cfg(feature = "telemetry")]
impl DerivationTelemetry for StdoutTelemetry {
    fn on_pass(&self, pass: usize, frontier_len: usize, catalog_len: usize) {
        use std::io::Write as _;
        let mut out = std::io::stdout().lock();
        let _ = writeln!(
            out,
            r#"{{"timestamp_micros":{},"event":"pass","pass":{},"frontier":{},"catalog":{}}}"#,
            ts_micros(),
            pass,
            frontier_len,
            catalog_len
        );
    }

    fn on_complete(&self, passes: usize, catalog_len: usize) {
        use std::io::Write as _;
        let mut out = std::io::stdout().lock();
        let _ = writeln!(
            out,
            r#"{{"timestamp_micros":{},"event":"complete","passes":{},"catalog":{}}}"#,
            ts_micros(),
            passes,
            catalog_len
        );
    }

    fn on_runaway(&self, cap: usize, catalog_len: usize) {
        use std::io::Write as _;
        let mut out = std::io::stdout().lock();
        let _ = writeln!(
            out,
            r#"{{"timestamp_micros":{},"event":"runaway","cap":{},"catalog":{}}}"#,
            ts_micros(),
            cap,
            catalog_len
        );
    }
}

// SPDX-License-Identifier: Apache-2.0
//! Recording telemetry sink.

use std::sync::Mutex;

use alembic_core::DerivationTelemetry;

/// One observed derivation event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelemetryEvent {
    /// A frontier pass finished.
    Pass {
        /// Zero-based pass index.
        pass: usize,
        /// Newly discovered values awaiting the next pass.
        frontier_len: usize,
        /// Definitions derived so far.
        catalog_len: usize,
    },
    /// Derivation converged.
    Complete {
        /// Total passes run.
        passes: usize,
        /// Final catalog size.
        catalog_len: usize,
    },
    /// The runaway guard tripped.
    Runaway {
        /// Configured cap.
        cap: usize,
        /// Catalog size when the guard tripped.
        catalog_len: usize,
    },
}

/// Sink that records every event in order for later assertions.
#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl RecordingTelemetry {
    /// An empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events observed so far, in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn record(&self, event: TelemetryEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl DerivationTelemetry for RecordingTelemetry {
    fn on_pass(&self, pass: usize, frontier_len: usize, catalog_len: usize) {
        self.record(TelemetryEvent::Pass {
            pass,
            frontier_len,
            catalog_len,
        });
    }

    fn on_complete(&self, passes: usize, catalog_len: usize) {
        self.record(TelemetryEvent::Complete {
            passes,
            catalog_len,
        });
    }

    fn on_runaway(&self, cap: usize, catalog_len: usize) {
        self.record(TelemetryEvent::Runaway { cap, catalog_len });
    }
}

// SPDX-License-Identifier: Apache-2.0
//! Shared test doubles and fixtures for alembic crates.
//!
//! Provides small, deterministic stand-ins for the collaborators the
//! derivation engine is generic over, so tests across the workspace stop
//! redeclaring the same tables and counters.
//!
//! # Modules
//!
//! - [`elem`] - Minimal slot value type plus kind and reagent helpers
//! - [`domains`] - Reaction domain doubles (table-backed, counting, runaway)
//! - [`telemetry`] - Recording telemetry sink for asserting pass events
#![forbid(unsafe_code)]

pub mod domains;
pub mod elem;
pub mod telemetry;

// Re-export commonly used items at crate root for convenience
pub use domains::{RunawayDomain, TableDomain, TallyDomain};
pub use elem::{elem_kind, elem_reagent, Elem};
pub use telemetry::{RecordingTelemetry, TelemetryEvent};

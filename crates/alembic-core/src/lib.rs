// SPDX-License-Identifier: Apache-2.0
//! alembic-core: recipe discovery for function-defined transformations.
//!
//! A crafting-style device whose behaviour is a function rather than a table
//! cannot enumerate its own recipes. This crate derives them: a breadth-first
//! closure walks every state reachable from a seed set through a one-step
//! reaction function, packages each accepted reaction as a comparable
//! [`RecipeDefinition`], and memoizes the result for the life of the process.
//! Around that core it provides the predicate-based ingredient model, the
//! composite catalog, the handler contract, and the simulation adapter that
//! bridges declarative queries to the device's procedural routine.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::option_if_let_else,
    clippy::use_self
)]

mod catalog;
mod closure;
mod handler;
mod ident;
mod ingredient;
mod recipe;
mod schema;
mod simulate;
mod telemetry;

// Re-exports for stable public API
/// Composite catalogs and the process-lifetime memoization cell.
pub use catalog::{CatalogCell, RecipeCatalog};
/// Fixpoint derivation: domain seam, closure builder, and failure modes.
pub use closure::{DerivationError, Reagent, ReactionClosure, ReactionDomain, DEFAULT_RECIPE_CAP};
/// The public handler contract.
pub use handler::RecipeHandler;
/// Identifier types and their domain-separated constructors.
pub use ident::{make_component_kind, make_predicate_id, ComponentKind, Hash, PredicateId};
/// Slot predicates and ordered ingredient sequences.
pub use ingredient::{ExternalTest, Ingredient, Ingredients, SlotPredicate};
/// Recipe definitions as comparable values.
pub use recipe::RecipeDefinition;
/// Kind and slot-shape declarations backing handler validation.
pub use schema::{ComponentSchema, SlotShape};
/// Declarative-to-procedural simulation bridging.
pub use simulate::SimulationAdapter;
/// Derivation observers.
pub use telemetry::{DerivationTelemetry, NullTelemetry};
/// Stdout JSONL derivation observer (feature `telemetry`).
#[cfg(feature = "telemetry")]
pub use telemetry::StdoutTelemetry;

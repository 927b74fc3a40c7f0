// SPDX-License-Identifier: Apache-2.0
//! alembic-still: a five-slot infusion device over the alembic-core engine.
//!
//! The still brews by function, not by table lookup alone: a [`MixTable`]
//! defines one-step reactions between reagents and phials, and the handler
//! derives the catalog those steps span by reaction closure. An
//! [`InfusionRegistry`] lets externally written rules brew beside the table,
//! publishing predicate-tested definitions. [`StillRecipeHandler`] ties it
//! together behind the `alembic-core` handler contract: kind and size
//! validation, composite catalog, facing-sensitive port targets, and
//! simulation through the same brewing routine the device itself runs.
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

mod device;
mod handler;
mod mix;
mod registry;
mod stock;

// Re-exports for stable public API
/// The device: slots, facing, and port addressing.
pub use device::{
    Face, Heading, Still, StillTarget, CRADLE_SLOTS, FIREBOX_SLOT, PERCH_SLOT, PORT_SLOTS,
};
/// The still's recipe capability.
pub use handler::StillRecipeHandler;
/// One-step reactions and the builtin reaction domain.
pub use mix::{neutral_essence, MixTable, StillDomain};
/// Externally registered infusions.
pub use registry::{InfusionRegistry, InfusionRule, RegistryError, TableRule};
/// Stocks and their identifiers.
pub use stock::{
    make_essence_id, make_reagent_id, stock_kind, EssenceId, ReagentId, Stock, StockIdentity,
    Vessel,
};

// SPDX-License-Identifier: Apache-2.0
//! Stocks: the substances occupying a still's slots.
use std::fmt;
use std::sync::OnceLock;

use alembic_core::{make_component_kind, ComponentKind, Hash};
use blake3::Hasher;

/// Strongly typed identifier for a dry reagent.
///
/// Produced by [`make_reagent_id`] from a label, so equal labels yield equal
/// reagents in every process without a shared registry.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReagentId(pub Hash);

impl ReagentId {
    /// Returns the canonical byte representation of this id.
    #[must_use]
    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }
}

impl fmt::Debug for ReagentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReagentId({})", short_hex(&self.0))
    }
}

/// Strongly typed identifier for the essence carried by a phial.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EssenceId(pub Hash);

impl EssenceId {
    /// Returns the canonical byte representation of this id.
    #[must_use]
    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }
}

impl fmt::Debug for EssenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EssenceId({})", short_hex(&self.0))
    }
}

/// Produces a stable, domain-separated reagent identifier (prefix
/// `b"reagent:"`) using BLAKE3.
pub fn make_reagent_id(label: &str) -> ReagentId {
    let mut hasher = Hasher::new();
    hasher.update(b"reagent:");
    hasher.update(label.as_bytes());
    ReagentId(hasher.finalize().into())
}

/// Produces a stable, domain-separated essence identifier (prefix
/// `b"essence:"`) using BLAKE3.
pub fn make_essence_id(label: &str) -> EssenceId {
    let mut hasher = Hasher::new();
    hasher.update(b"essence:");
    hasher.update(label.as_bytes());
    EssenceId(hasher.finalize().into())
}

/// The vessel forms a phial can take.
///
/// Vessel conversions preserve the essence inside; see
/// [`MixTable::link_vessel`](crate::mix::MixTable::link_vessel).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Vessel {
    /// A drinkable draught.
    Draught,
    /// A throwable, shattering vessel.
    Volatile,
    /// A lingering, vaporous vessel.
    Miasmal,
}

/// What one slot of a still holds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stock {
    /// Nothing at all.
    #[default]
    Empty,
    /// A dry reagent waiting on the perch.
    Reagent(ReagentId),
    /// A filled phial: a vessel carrying an essence.
    Phial {
        /// The vessel form.
        vessel: Vessel,
        /// The essence inside.
        essence: EssenceId,
    },
}

impl Stock {
    /// A phial of `essence` in the given `vessel`.
    #[must_use]
    pub fn phial(vessel: Vessel, essence: EssenceId) -> Self {
        Self::Phial { vessel, essence }
    }

    /// Whether the slot holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The coarse identity of this stock, ignoring any carried essence.
    #[must_use]
    pub fn identity(&self) -> StockIdentity {
        match self {
            Self::Empty => StockIdentity::Empty,
            Self::Reagent(id) => StockIdentity::Reagent(*id),
            Self::Phial { vessel, .. } => StockIdentity::Phial(*vessel),
        }
    }

    /// The carried essence, if this stock is a phial.
    #[must_use]
    pub fn essence(&self) -> Option<EssenceId> {
        match self {
            Self::Phial { essence, .. } => Some(*essence),
            _ => None,
        }
    }
}

/// Coarse stock identity: which thing a slot holds, not what it carries.
///
/// Two phials of the same vessel share an identity even when their essences
/// differ. Output validity keys on this distinction: a reaction that changes
/// only the essence still counts, one that changes nothing does not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StockIdentity {
    /// An empty slot.
    Empty,
    /// A dry reagent.
    Reagent(ReagentId),
    /// A phial of the given vessel, essence disregarded.
    Phial(Vessel),
}

/// The component kind under which every still exposes its stocks.
pub fn stock_kind() -> ComponentKind {
    static KIND: OnceLock<ComponentKind> = OnceLock::new();
    *KIND.get_or_init(|| make_component_kind("alembic/stock"))
}

fn short_hex(hash: &Hash) -> String {
    hex::encode(&hash[..8])
}

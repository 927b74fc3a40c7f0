// SPDX-License-Identifier: Apache-2.0
//! Identifier and hashing utilities.
use std::fmt;

use blake3::Hasher;

/// Canonical 256-bit hash used throughout the engine for addressing component
/// kinds and external predicates.
pub type Hash = [u8; 32];

/// Strongly typed identifier for a family of matchable slot values.
///
/// `ComponentKind` values are produced by [`make_component_kind`], which hashes
/// a label with a domain-separation prefix (`blake3("component:" || label)`).
/// Equal labels therefore yield equal kinds in every process, so kinds can be
/// compared by value without a shared registry.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentKind(pub Hash);

impl ComponentKind {
    /// Returns the canonical byte representation of this kind.
    #[must_use]
    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }
}

impl fmt::Debug for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentKind({})", short_hex(&self.0))
    }
}

/// Strongly typed identifier naming one externally supplied predicate.
///
/// External predicates wrap opaque closures, which carry no usable notion of
/// equality. A `PredicateId` gives such a predicate a stable value-equality
/// key: two ingredients referring to the same declared external test compare
/// equal through their ids, never through the closures themselves.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PredicateId(pub Hash);

impl PredicateId {
    /// Returns the canonical byte representation of this id.
    #[must_use]
    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }
}

impl fmt::Debug for PredicateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PredicateId({})", short_hex(&self.0))
    }
}

/// Produces a stable, domain-separated component kind (prefix `b"component:"`)
/// using BLAKE3.
pub fn make_component_kind(label: &str) -> ComponentKind {
    let mut hasher = Hasher::new();
    hasher.update(b"component:");
    hasher.update(label.as_bytes());
    ComponentKind(hasher.finalize().into())
}

/// Produces a stable, domain-separated predicate identifier (prefix
/// `b"predicate:"`) using BLAKE3.
pub fn make_predicate_id(label: &str) -> PredicateId {
    let mut hasher = Hasher::new();
    hasher.update(b"predicate:");
    hasher.update(label.as_bytes());
    PredicateId(hasher.finalize().into())
}

fn short_hex(hash: &Hash) -> String {
    hex::encode(&hash[..8])
}

// SPDX-License-Identifier: Apache-2.0
//! Minimal slot value type for exercising the derivation engine.

use alembic_core::{make_component_kind, ComponentKind, Reagent};

/// A slot value with nothing but identity: two `Elem`s are the same state
/// iff their payloads are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Elem(pub u32);

/// The component kind shared by every `Elem` fixture.
pub fn elem_kind() -> ComponentKind {
    make_component_kind("testkit/elem")
}

/// An exact-match reagent over [`Elem`] with itself as exemplar.
pub fn elem_reagent(value: u32) -> Reagent<Elem> {
    Reagent::exact(elem_kind(), Elem(value))
}

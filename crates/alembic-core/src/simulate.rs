// SPDX-License-Identifier: Apache-2.0
//! Bridging declarative recipe queries to a procedural device routine.

use crate::ident::ComponentKind;
use crate::ingredient::{Ingredient, Ingredients};

/// Converts a declarative ingredient query into one concrete invocation of
/// an opaque transformation routine.
///
/// The adapter owns the shape of the exchange, not the routine itself: it
/// checks that the query names exactly one component kind and an acceptable
/// slot count, extracts one representative exemplar per slot (falling back
/// to the domain's neutral value when a predicate carries none), hands the
/// routine a fixed-width slot vector, and repackages whatever comes back as
/// [`Exact`](crate::ingredient::SlotPredicate::Exact) ingredients. It calls
/// the routine exactly once and never validates its output.
#[derive(Clone, Debug)]
pub struct SimulationAdapter<V> {
    kind: ComponentKind,
    vector_len: usize,
    neutral: V,
}

impl<V: Clone> SimulationAdapter<V> {
    /// An adapter for queries of `kind`, feeding the routine a vector of
    /// `vector_len` slots. Query slots beyond the query's own length are
    /// filled with `neutral`.
    pub fn new(kind: ComponentKind, vector_len: usize, neutral: V) -> Self {
        Self {
            kind,
            vector_len,
            neutral,
        }
    }

    /// Runs `routine` over the exemplars of `query`.
    ///
    /// Returns `None`, signalling "not simulatable", when the query spans
    /// more than one component kind, names a kind other than the adapter's,
    /// or proposes a slot count `size_ok` rejects. `routine` is not invoked
    /// in any of those cases. On success the returned sequence has exactly
    /// `vector_len` slots, one `Exact` ingredient per routine output slot.
    pub fn run<S, F>(&self, query: &Ingredients<V>, size_ok: S, routine: F) -> Option<Ingredients<V>>
    where
        S: FnOnce(usize) -> bool,
        F: FnOnce(&mut [V]),
    {
        let kinds = query.kinds();
        if kinds.len() != 1 || kinds[0] != self.kind {
            return None;
        }
        if !size_ok(query.len()) {
            return None;
        }
        debug_assert!(
            query.len() <= self.vector_len,
            "size gate admitted a query wider than the slot vector"
        );

        let mut slots = vec![self.neutral.clone(); self.vector_len];
        for (slot, ingredient) in slots.iter_mut().zip(query.iter()) {
            if let Some(exemplar) = ingredient.exemplars().first() {
                *slot = exemplar.clone();
            }
        }
        routine(&mut slots);

        Some(
            slots
                .into_iter()
                .map(|value| Ingredient::exact(self.kind, value))
                .collect(),
        )
    }
}

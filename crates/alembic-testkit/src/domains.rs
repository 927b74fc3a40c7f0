// SPDX-License-Identifier: Apache-2.0
//! Reaction domain doubles.
//!
//! Three stand-ins cover the behaviours derivation tests need: a
//! table-backed domain for finite, convergent reaction spaces, a counting
//! wrapper for asserting how often the reaction function runs, and a domain
//! that never converges for exercising the runaway guard.

use std::sync::atomic::{AtomicUsize, Ordering};

use alembic_core::ReactionDomain;
use rustc_hash::FxHashMap;

use crate::elem::Elem;

/// Finite reaction table over [`Elem`]: `(reagent, base) -> result`.
///
/// Pairs absent from the table have no effect. A link may map a base to
/// itself; the validity filter rejects such no-op reactions, which is how
/// "the reaction returned its input unchanged" scenarios are modelled.
#[derive(Clone, Debug, Default)]
pub struct TableDomain {
    links: FxHashMap<(Elem, Elem), Elem>,
}

impl TableDomain {
    /// An empty table; nothing reacts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding `((reagent, base), result)` links.
    #[must_use]
    pub fn from_links(links: &[((u32, u32), u32)]) -> Self {
        let mut domain = Self::new();
        for ((reagent, base), result) in links {
            domain.link(*reagent, *base, *result);
        }
        domain
    }

    /// Adds one link, replacing any previous result for the pair.
    pub fn link(&mut self, reagent: u32, base: u32, result: u32) {
        self.links
            .insert((Elem(reagent), Elem(base)), Elem(result));
    }
}

impl ReactionDomain for TableDomain {
    type Value = Elem;

    fn react(&self, reagent: &Elem, base: &Elem) -> Option<Elem> {
        self.links.get(&(*reagent, *base)).copied()
    }

    fn is_output_valid(&self, base: &Elem, result: &Elem) -> bool {
        base != result
    }
}

/// Wrapper counting every [`ReactionDomain::react`] invocation.
///
/// Used to prove that memoized catalogs perform no re-derivation: a second
/// catalog access must leave the count unchanged.
#[derive(Debug, Default)]
pub struct TallyDomain<D> {
    inner: D,
    calls: AtomicUsize,
}

impl<D> TallyDomain<D> {
    /// Wraps `inner`, starting the count at zero.
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `react` calls observed so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<D: ReactionDomain> ReactionDomain for TallyDomain<D> {
    type Value = D::Value;

    fn react(&self, reagent: &Self::Value, base: &Self::Value) -> Option<Self::Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.react(reagent, base)
    }

    fn is_output_valid(&self, base: &Self::Value, result: &Self::Value) -> bool {
        self.inner.is_output_valid(base, result)
    }
}

/// A reaction function that always produces a fresh, never-seen state.
///
/// Every reagent advances every base to its successor, so the frontier
/// never empties and only the runaway guard ends the derivation.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunawayDomain;

impl ReactionDomain for RunawayDomain {
    type Value = Elem;

    fn react(&self, _reagent: &Elem, base: &Elem) -> Option<Elem> {
        Some(Elem(base.0.wrapping_add(1)))
    }

    fn is_output_valid(&self, base: &Elem, result: &Elem) -> bool {
        base != result
    }
}

// SPDX-License-Identifier: Apache-2.0
//! Slot predicates and ordered ingredient sequences.
//!
//! An [`Ingredient`] matches the contents of one device slot: a predicate
//! tagged with the [`ComponentKind`] it applies to. Recipe deduplication
//! relies on ingredients being plain comparable values, so every predicate
//! variant defines value equality; external closures are identified by a
//! declared [`PredicateId`] rather than compared as code.

use std::fmt;
use std::hash::{Hash as StdHash, Hasher};
use std::sync::Arc;

use crate::ident::{ComponentKind, PredicateId};

/// An opaque slot test supplied by an external rule source.
///
/// The wrapped closure decides matching; the [`PredicateId`] decides identity.
/// Two `ExternalTest`s compare equal iff their ids are equal, so a rule source
/// that derives ids stably (for example by hashing the rule name and slot
/// role) produces value-comparable ingredients across calls.
pub struct ExternalTest<V> {
    id: PredicateId,
    test: Arc<dyn Fn(&V) -> bool + Send + Sync>,
}

impl<V> ExternalTest<V> {
    /// Wraps `test` under the identity `id`.
    pub fn new(id: PredicateId, test: impl Fn(&V) -> bool + Send + Sync + 'static) -> Self {
        Self {
            id,
            test: Arc::new(test),
        }
    }

    /// Returns the declared identity of this test.
    #[must_use]
    pub fn id(&self) -> PredicateId {
        self.id
    }

    /// Evaluates the wrapped predicate.
    pub fn matches(&self, value: &V) -> bool {
        (self.test)(value)
    }
}

impl<V> Clone for ExternalTest<V> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            test: Arc::clone(&self.test),
        }
    }
}

impl<V> fmt::Debug for ExternalTest<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExternalTest").field(&self.id).finish()
    }
}

impl<V> PartialEq for ExternalTest<V> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<V> Eq for ExternalTest<V> {}

impl<V> StdHash for ExternalTest<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// The matching behaviour of one slot.
///
/// Four variants cover every slot role the engine needs:
///
/// - [`Exact`](SlotPredicate::Exact) accepts one concrete value by structural
///   equality and exposes it as the sole exemplar.
/// - [`Always`](SlotPredicate::Always) accepts anything ("don't care").
/// - [`Never`](SlotPredicate::Never) accepts nothing ("must be empty").
/// - [`External`](SlotPredicate::External) defers to an opaque test.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SlotPredicate<V> {
    /// Matches exactly one value by structural equality.
    Exact(V),
    /// Matches every value; carries no exemplar.
    Always,
    /// Matches no value; carries no exemplar.
    Never,
    /// Matches whatever the wrapped external test accepts.
    External(ExternalTest<V>),
}

/// One typed slot matcher: a [`SlotPredicate`] tagged with its
/// [`ComponentKind`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ingredient<V> {
    kind: ComponentKind,
    predicate: SlotPredicate<V>,
}

impl<V> Ingredient<V> {
    /// An ingredient accepting exactly `value`.
    pub fn exact(kind: ComponentKind, value: V) -> Self {
        Self {
            kind,
            predicate: SlotPredicate::Exact(value),
        }
    }

    /// A wildcard ingredient accepting any value of `kind`.
    pub fn always(kind: ComponentKind) -> Self {
        Self {
            kind,
            predicate: SlotPredicate::Always,
        }
    }

    /// An ingredient accepting nothing; used for slots that must stay empty.
    pub fn never(kind: ComponentKind) -> Self {
        Self {
            kind,
            predicate: SlotPredicate::Never,
        }
    }

    /// An ingredient deferring to an external test identified by `id`.
    pub fn external(
        kind: ComponentKind,
        id: PredicateId,
        test: impl Fn(&V) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            predicate: SlotPredicate::External(ExternalTest::new(id, test)),
        }
    }

    /// The component kind this ingredient applies to.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// The matching behaviour of this slot.
    #[must_use]
    pub fn predicate(&self) -> &SlotPredicate<V> {
        &self.predicate
    }

    /// Representative accepted values, used when derivation or simulation
    /// needs a concrete exemplar to feed onward.
    ///
    /// The slice is finite and possibly empty; empty means "predicate-only,
    /// no concrete exemplar" and is legal for every variant except
    /// [`SlotPredicate::Exact`], which always exposes its value. Exemplars
    /// are never required to enumerate the full accepted set.
    #[must_use]
    pub fn exemplars(&self) -> &[V] {
        match &self.predicate {
            SlotPredicate::Exact(value) => std::slice::from_ref(value),
            SlotPredicate::Always | SlotPredicate::Never | SlotPredicate::External(_) => &[],
        }
    }
}

impl<V: PartialEq> Ingredient<V> {
    /// Whether `value` is accepted by this slot. Pure and side-effect-free;
    /// external tests are assumed total by contract.
    pub fn matches(&self, value: &V) -> bool {
        match &self.predicate {
            SlotPredicate::Exact(expected) => expected == value,
            SlotPredicate::Always => true,
            SlotPredicate::Never => false,
            SlotPredicate::External(test) => test.matches(value),
        }
    }
}

/// An ordered sequence of ingredients, one per slot.
///
/// Slot positions are meaningful: the sequence on one side of a recipe shares
/// position semantics with the sibling sequence on the other side.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ingredients<V> {
    slots: Vec<Ingredient<V>>,
}

impl<V> Ingredients<V> {
    /// Wraps an ordered slot sequence.
    pub fn new(slots: Vec<Ingredient<V>>) -> Self {
        Self { slots }
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the sequence has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The ingredient at `slot`, if present.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&Ingredient<V>> {
        self.slots.get(slot)
    }

    /// All slots in order.
    #[must_use]
    pub fn slots(&self) -> &[Ingredient<V>] {
        &self.slots
    }

    /// Iterates the slots in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Ingredient<V>> {
        self.slots.iter()
    }

    /// The distinct component kinds appearing in this sequence, in
    /// first-appearance order.
    #[must_use]
    pub fn kinds(&self) -> Vec<ComponentKind> {
        let mut kinds = Vec::new();
        for ingredient in &self.slots {
            if !kinds.contains(&ingredient.kind()) {
                kinds.push(ingredient.kind());
            }
        }
        kinds
    }

    /// Iterates the slots whose ingredient applies to `kind`.
    pub fn of_kind(&self, kind: ComponentKind) -> impl Iterator<Item = &Ingredient<V>> + '_ {
        self.slots
            .iter()
            .filter(move |ingredient| ingredient.kind() == kind)
    }
}

impl<V> FromIterator<Ingredient<V>> for Ingredients<V> {
    fn from_iter<I: IntoIterator<Item = Ingredient<V>>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

impl<'a, V> IntoIterator for &'a Ingredients<V> {
    type Item = &'a Ingredient<V>;
    type IntoIter = std::slice::Iter<'a, Ingredient<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::{make_component_kind, make_predicate_id};

    #[test]
    fn exact_matches_structural_equality_and_exposes_exemplar() {
        let kind = make_component_kind("test/elem");
        let ingredient = Ingredient::exact(kind, 7u32);
        assert!(ingredient.matches(&7));
        assert!(!ingredient.matches(&8));
        assert_eq!(ingredient.exemplars(), &[7]);
    }

    #[test]
    fn always_and_never_have_no_exemplars() {
        let kind = make_component_kind("test/elem");
        let any: Ingredient<u32> = Ingredient::always(kind);
        let empty: Ingredient<u32> = Ingredient::never(kind);
        assert!(any.matches(&42));
        assert!(!empty.matches(&42));
        assert!(any.exemplars().is_empty());
        assert!(empty.exemplars().is_empty());
    }

    #[test]
    fn external_tests_compare_by_id_not_by_closure() {
        let kind = make_component_kind("test/elem");
        let id = make_predicate_id("rule/even");
        let other = make_predicate_id("rule/odd");
        let a = Ingredient::external(kind, id, |v: &u32| v % 2 == 0);
        let b = Ingredient::external(kind, id, |v: &u32| v % 2 == 1);
        let c = Ingredient::external(kind, other, |v: &u32| v % 2 == 0);
        assert_eq!(a, b, "same id must compare equal regardless of closure");
        assert_ne!(a, c, "distinct ids must compare unequal");
        assert!(a.matches(&2));
        assert!(!a.matches(&3));
    }

    #[test]
    fn kinds_preserve_first_appearance_order() {
        let stock = make_component_kind("test/stock");
        let aura = make_component_kind("test/aura");
        let slots = Ingredients::new(vec![
            Ingredient::exact(stock, 1u32),
            Ingredient::exact(aura, 2),
            Ingredient::exact(stock, 3),
        ]);
        assert_eq!(slots.kinds(), vec![stock, aura]);
        assert_eq!(slots.of_kind(stock).count(), 2);
        assert_eq!(slots.of_kind(aura).count(), 1);
    }
}

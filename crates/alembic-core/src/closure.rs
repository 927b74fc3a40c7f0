// SPDX-License-Identifier: Apache-2.0
//! Breadth-first derivation of every recipe reachable from a seed set.
//!
//! The underlying transformation logic of a device is often a function, not
//! an enumerable table. [`ReactionClosure`] recovers the table: starting from
//! a small seed set it applies every reagent to every reachable value,
//! packages each accepted reaction as a [`RecipeDefinition`], and repeats on
//! the newly discovered values until a fixpoint. Deduplication by value
//! equality is what guarantees termination on finite domains; a hard cap on
//! catalog growth turns a non-terminating reaction function into a loud,
//! typed error instead of an infinite loop.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::ident::ComponentKind;
use crate::ingredient::{Ingredient, Ingredients};
use crate::recipe::RecipeDefinition;
use crate::telemetry::{DerivationTelemetry, NULL_TELEMETRY};

/// Default ceiling on derived catalog size.
///
/// An order of magnitude above the state count of any well-behaved reaction
/// domain this engine has been pointed at; crossing it means the reaction
/// function keeps producing fresh states and will never converge.
pub const DEFAULT_RECIPE_CAP: usize = 7_500;

/// The reaction behaviour of one value domain.
///
/// Both operations must be pure and deterministic. The closure calls them
/// in arbitrary interleavings and caches nothing about them.
pub trait ReactionDomain {
    /// The slot value type recipes range over.
    type Value: Clone + Eq + std::hash::Hash;

    /// Applies one mixing step: the effect of `reagent` on `base`.
    ///
    /// Returns `None` when the reagent has no effect on this base. A
    /// returned value is still subject to [`Self::is_output_valid`];
    /// domains that signal "no effect" by echoing the base back are
    /// filtered there.
    fn react(&self, reagent: &Self::Value, base: &Self::Value) -> Option<Self::Value>;

    /// Whether a reaction from `base` to `result` is materially a change.
    ///
    /// Must be `false` whenever `result` is the same state as `base`,
    /// otherwise no-op reactions would be admitted as recipes and re-enqueue
    /// their own input forever.
    fn is_output_valid(&self, base: &Self::Value, result: &Self::Value) -> bool;
}

/// One expansion rule for the closure: a reagent ingredient together with a
/// concrete exemplar to feed into the reaction function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reagent<V> {
    /// The ingredient recipes will carry in their reagent slot.
    pub ingredient: Ingredient<V>,
    /// The concrete value handed to the reaction function.
    pub exemplar: V,
}

impl<V> Reagent<V> {
    /// Pairs an arbitrary reagent ingredient with its exemplar.
    pub fn new(ingredient: Ingredient<V>, exemplar: V) -> Self {
        Self {
            ingredient,
            exemplar,
        }
    }
}

impl<V: Clone> Reagent<V> {
    /// The common case: a reagent matched exactly, with itself as exemplar.
    pub fn exact(kind: ComponentKind, value: V) -> Self {
        Self {
            ingredient: Ingredient::exact(kind, value.clone()),
            exemplar: value,
        }
    }
}

/// Errors emitted by the derivation closure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DerivationError {
    /// The catalog exceeded the configured cap without reaching a fixpoint.
    ///
    /// Fatal: the whole derivation is aborted rather than truncated, since a
    /// partial catalog would silently drop valid recipes.
    #[error(
        "reaction closure exceeded {cap} recipes without converging \
         ({catalog_len} derived); the reaction function or reagent set \
         is non-terminating"
    )]
    NonTerminating {
        /// The configured catalog cap.
        cap: usize,
        /// Catalog size when the guard tripped.
        catalog_len: usize,
    },
}

/// Fixpoint recipe derivation over a [`ReactionDomain`].
///
/// Construction is cheap; all work happens in [`derive`](Self::derive). The
/// domain, reagent table, and seeds are injected by the caller, so the same
/// builder works against production tables and test doubles alike.
pub struct ReactionClosure<'a, D: ReactionDomain> {
    domain: &'a D,
    kind: ComponentKind,
    batch_slots: usize,
    recipe_cap: usize,
    telemetry: &'a dyn DerivationTelemetry,
}

impl<'a, D: ReactionDomain> ReactionClosure<'a, D> {
    /// A closure over `domain` producing recipes of `kind`.
    ///
    /// `batch_slots` is the number of parallel base slots one derived rule
    /// covers: inputs are packaged as `[reagent, base x batch_slots]` and
    /// outputs as `[never, result x batch_slots]`. The cap defaults to
    /// [`DEFAULT_RECIPE_CAP`] and telemetry to the null sink.
    pub fn new(domain: &'a D, kind: ComponentKind, batch_slots: usize) -> Self {
        Self {
            domain,
            kind,
            batch_slots,
            recipe_cap: DEFAULT_RECIPE_CAP,
            telemetry: &NULL_TELEMETRY,
        }
    }

    /// Overrides the runaway cap. The cap is a tuning knob for the expected
    /// state count of the domain, not a result limit.
    #[must_use]
    pub fn with_recipe_cap(mut self, recipe_cap: usize) -> Self {
        self.recipe_cap = recipe_cap;
        self
    }

    /// Attaches a telemetry sink observing derivation passes.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: &'a dyn DerivationTelemetry) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Derives every recipe reachable from `seeds` through `reagents`.
    ///
    /// Breadth-first with an explicit frontier: each pass applies every
    /// reagent to every frontier value, keeps reactions the domain accepts,
    /// and enqueues a result for the next pass only when its definition was
    /// not already in the catalog. A value that has been explored along
    /// every reagent is therefore never re-enqueued, which is what makes
    /// the loop terminate on finite domains.
    ///
    /// The returned catalog contains no duplicate definitions and is
    /// expensive to compute; callers are expected to memoize it for the
    /// life of the process (see [`CatalogCell`](crate::catalog::CatalogCell)).
    ///
    /// # Errors
    ///
    /// [`DerivationError::NonTerminating`] if the catalog outgrows the cap,
    /// which indicates a reaction function that never reaches a fixpoint.
    pub fn derive(
        &self,
        seeds: &[D::Value],
        reagents: &[Reagent<D::Value>],
    ) -> Result<Vec<RecipeDefinition<D::Value>>, DerivationError> {
        let mut catalog: Vec<RecipeDefinition<D::Value>> = Vec::new();
        let mut seen: FxHashSet<RecipeDefinition<D::Value>> = FxHashSet::default();
        let mut frontier: Vec<D::Value> = seeds.to_vec();
        let mut pass = 0usize;

        while !frontier.is_empty() {
            let mut discovered: Vec<D::Value> = Vec::new();
            for base in &frontier {
                for reagent in reagents {
                    let Some(result) = self.domain.react(&reagent.exemplar, base) else {
                        continue;
                    };
                    if !self.domain.is_output_valid(base, &result) {
                        continue;
                    }
                    let definition = self.package(reagent, base, &result);
                    if seen.contains(&definition) {
                        continue;
                    }
                    seen.insert(definition.clone());
                    catalog.push(definition);
                    discovered.push(result);
                }
                if catalog.len() > self.recipe_cap {
                    self.telemetry.on_runaway(self.recipe_cap, catalog.len());
                    return Err(DerivationError::NonTerminating {
                        cap: self.recipe_cap,
                        catalog_len: catalog.len(),
                    });
                }
            }
            self.telemetry.on_pass(pass, discovered.len(), catalog.len());
            pass += 1;
            frontier = discovered;
        }

        self.telemetry.on_complete(pass, catalog.len());
        Ok(catalog)
    }

    fn package(
        &self,
        reagent: &Reagent<D::Value>,
        base: &D::Value,
        result: &D::Value,
    ) -> RecipeDefinition<D::Value> {
        let mut inputs = Vec::with_capacity(self.batch_slots + 1);
        inputs.push(reagent.ingredient.clone());
        for _ in 0..self.batch_slots {
            inputs.push(Ingredient::exact(self.kind, base.clone()));
        }
        let mut outputs = Vec::with_capacity(self.batch_slots + 1);
        outputs.push(Ingredient::never(self.kind));
        for _ in 0..self.batch_slots {
            outputs.push(Ingredient::exact(self.kind, result.clone()));
        }
        RecipeDefinition::new(Ingredients::new(inputs), Ingredients::new(outputs))
    }
}

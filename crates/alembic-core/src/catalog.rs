// SPDX-License-Identifier: Apache-2.0
//! Composite recipe catalogs and process-lifetime memoization.

use std::sync::{Arc, OnceLock};

use crate::closure::DerivationError;
use crate::recipe::RecipeDefinition;

/// A read-only recipe list composed of one or more segments.
///
/// Handlers merge recipe sources of different lifetimes, typically a derived
/// segment memoized for the whole process next to a registry segment rebuilt
/// per call. Segments are concatenated, never deduplicated against each
/// other: sources are expected to be disjoint by construction. Cloning a
/// catalog clones segment handles, not definitions.
#[derive(Clone, Debug)]
pub struct RecipeCatalog<V> {
    segments: Vec<Arc<[RecipeDefinition<V>]>>,
}

impl<V> RecipeCatalog<V> {
    /// A catalog over the given segments, addressed in order.
    pub fn from_segments(segments: Vec<Arc<[RecipeDefinition<V>]>>) -> Self {
        Self { segments }
    }

    /// A single-segment catalog owning `definitions`.
    pub fn from_definitions(definitions: Vec<RecipeDefinition<V>>) -> Self {
        Self {
            segments: vec![Arc::from(definitions)],
        }
    }

    /// Total number of definitions across all segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.iter().map(|segment| segment.len()).sum()
    }

    /// Whether the catalog holds no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|segment| segment.is_empty())
    }

    /// The definition at `index`, counting across segment boundaries.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RecipeDefinition<V>> {
        let mut remaining = index;
        for segment in &self.segments {
            if remaining < segment.len() {
                return Some(&segment[remaining]);
            }
            remaining -= segment.len();
        }
        None
    }

    /// Iterates every definition, segment by segment.
    pub fn iter(&self) -> impl Iterator<Item = &RecipeDefinition<V>> + '_ {
        self.segments.iter().flat_map(|segment| segment.iter())
    }
}

/// Guarded once-per-process memoization of a derived recipe segment.
///
/// Derivation is combinatorial in the seed and reagent counts, so its result
/// is computed exactly once and shared for the remaining process lifetime.
/// First access under concurrency is safe: one caller runs the derivation,
/// every other caller blocks and observes the same outcome. Failures are
/// memoized as well, so a tripped runaway guard is re-surfaced to every
/// subsequent caller instead of re-running the derivation. There is no
/// invalidation path; the reaction function and reagent table are assumed
/// fixed for the life of the program.
#[derive(Debug, Default)]
pub struct CatalogCell<V> {
    cell: OnceLock<Result<Arc<[RecipeDefinition<V>]>, DerivationError>>,
}

impl<V> CatalogCell<V> {
    /// An empty cell, usable in `static` position.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Returns the memoized segment, running `derive` on first access.
    ///
    /// # Errors
    ///
    /// The error produced by `derive` on first access; the same error on
    /// every later access.
    pub fn get_or_derive(
        &self,
        derive: impl FnOnce() -> Result<Vec<RecipeDefinition<V>>, DerivationError>,
    ) -> Result<Arc<[RecipeDefinition<V>]>, DerivationError> {
        self.cell.get_or_init(|| derive().map(Arc::from)).clone()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ident::make_component_kind;
    use crate::ingredient::{Ingredient, Ingredients};

    fn definition(tag: u32) -> RecipeDefinition<u32> {
        let kind = make_component_kind("test/elem");
        RecipeDefinition::new(
            Ingredients::new(vec![Ingredient::exact(kind, tag)]),
            Ingredients::new(vec![Ingredient::never(kind)]),
        )
    }

    #[test]
    fn indexing_crosses_segment_boundaries() {
        let catalog = RecipeCatalog::from_segments(vec![
            Arc::from(vec![definition(0), definition(1)]),
            Arc::from(Vec::<RecipeDefinition<u32>>::new()),
            Arc::from(vec![definition(2)]),
        ]);
        assert_eq!(catalog.len(), 3);
        assert!(!catalog.is_empty());
        assert_eq!(catalog.get(0), Some(&definition(0)));
        assert_eq!(catalog.get(2), Some(&definition(2)));
        assert_eq!(catalog.get(3), None);
        assert_eq!(catalog.iter().count(), 3);
    }

    #[test]
    fn cell_runs_the_derivation_exactly_once() {
        let cell: CatalogCell<u32> = CatalogCell::new();
        let mut runs = 0;
        let first = cell
            .get_or_derive(|| {
                runs += 1;
                Ok(vec![definition(7)])
            })
            .expect("derivation succeeds");
        assert_eq!(first.len(), 1);

        let second = cell
            .get_or_derive(|| {
                runs += 1;
                Ok(vec![])
            })
            .expect("memoized result is reused");
        assert_eq!(second.len(), 1, "second access sees the first result");
        assert_eq!(runs, 1, "the derivation closure must run exactly once");
    }

    #[test]
    fn cell_memoizes_failures_loudly() {
        let cell: CatalogCell<u32> = CatalogCell::new();
        let err = DerivationError::NonTerminating {
            cap: 4,
            catalog_len: 5,
        };
        let first = cell.get_or_derive(|| Err(err.clone()));
        assert_eq!(first.unwrap_err(), err);

        let second = cell.get_or_derive(|| Ok(vec![definition(1)]));
        assert_eq!(
            second.unwrap_err(),
            err,
            "a failed derivation is never retried"
        );
    }
}

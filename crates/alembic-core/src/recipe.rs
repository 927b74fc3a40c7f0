// SPDX-License-Identifier: Apache-2.0
//! Recipe definitions: one transformation rule as a comparable value.

use crate::ingredient::Ingredients;

/// One transformation rule: an ordered input slot sequence paired with an
/// ordered output slot sequence.
///
/// Two definitions are equal iff every corresponding input and output
/// predicate has an identical discriminant and payload. The derivation
/// closure depends on this: deduplication of freshly derived rules is plain
/// value equality, never object identity. Definitions are constructed once
/// during catalog build and are immutable thereafter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecipeDefinition<V> {
    inputs: Ingredients<V>,
    outputs: Ingredients<V>,
}

impl<V> RecipeDefinition<V> {
    /// Pairs `inputs` with `outputs`.
    pub fn new(inputs: Ingredients<V>, outputs: Ingredients<V>) -> Self {
        Self { inputs, outputs }
    }

    /// The input slot sequence.
    #[must_use]
    pub fn inputs(&self) -> &Ingredients<V> {
        &self.inputs
    }

    /// The output slot sequence.
    #[must_use]
    pub fn outputs(&self) -> &Ingredients<V> {
        &self.outputs
    }
}

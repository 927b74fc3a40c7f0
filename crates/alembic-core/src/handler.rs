// SPDX-License-Identifier: Apache-2.0
//! The public recipe handler contract.

use crate::catalog::RecipeCatalog;
use crate::closure::DerivationError;
use crate::ident::ComponentKind;
use crate::recipe::RecipeDefinition;

/// The outward-facing contract of one device's recipe capability.
///
/// A handler exposes the device's recipe catalog, validates proposed query
/// shapes, maps component kinds to concrete device slots, and simulates the
/// device's native transformation. Catalog state is immutable for the life
/// of the process; target resolution is the one operation that consults live
/// device state.
pub trait RecipeHandler {
    /// The slot value type this handler's recipes range over.
    type Value;

    /// The addressable device slot type returned by target queries.
    type Target;

    /// The component kinds accepted as recipe inputs. The same immutable
    /// set on every call.
    fn input_kinds(&self) -> &[ComponentKind];

    /// The component kinds produced as recipe outputs. The same immutable
    /// set on every call.
    fn output_kinds(&self) -> &[ComponentKind];

    /// Whether a query proposing `size` input slots of `kind` is
    /// shape-compatible with the device. Must reject unsupported kinds and
    /// slot counts outside the device's physical shape.
    fn is_valid_input_size(&self, kind: ComponentKind, size: usize) -> bool;

    /// The full recipe catalog: statically registered rules merged with the
    /// derived closure.
    ///
    /// The derived portion is computed on first access and memoized for the
    /// process lifetime.
    ///
    /// # Errors
    ///
    /// [`DerivationError`] when the derivation failed; the memoized failure
    /// is returned on every call, never retried.
    fn recipes(&self) -> Result<RecipeCatalog<Self::Value>, DerivationError>;

    /// The ordered device slots serving as inputs for `kind`, or `None` if
    /// the handler does not support the kind.
    ///
    /// Resolution consults the device's current orientation state and must
    /// happen on every call; implementations must not cache the result, as
    /// the device may change state between calls.
    fn input_targets(&self, kind: ComponentKind) -> Option<Vec<Self::Target>>;

    /// The ordered device slots serving as outputs for `kind`; same
    /// contract as [`Self::input_targets`].
    fn output_targets(&self, kind: ComponentKind) -> Option<Vec<Self::Target>>;

    /// Feeds the query's input exemplars through the device's native
    /// transformation routine once and returns the resulting recipe.
    ///
    /// Returns `None`, meaning "cannot simulate", when the query's inputs
    /// span more than one component kind or fail
    /// [`Self::is_valid_input_size`]. `None` is never an empty result.
    fn simulate(
        &self,
        query: &RecipeDefinition<Self::Value>,
    ) -> Option<RecipeDefinition<Self::Value>>;
}

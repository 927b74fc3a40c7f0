// SPDX-License-Identifier: Apache-2.0
//! Component schemas: which kinds a handler deals with, and in what shapes.

use crate::ident::ComponentKind;

/// The valid slot-count range for one input component kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotShape {
    /// Smallest accepted slot count, inclusive.
    pub min: usize,
    /// Largest accepted slot count, inclusive.
    pub max: usize,
}

impl SlotShape {
    /// A shape accepting slot counts in `min..=max`.
    #[must_use]
    pub fn new(min: usize, max: usize) -> Self {
        debug_assert!(min <= max, "slot shape range must not be empty");
        Self { min, max }
    }

    /// Whether `size` falls inside this shape.
    #[must_use]
    pub fn contains(&self, size: usize) -> bool {
        size >= self.min && size <= self.max
    }
}

/// Declares the component kinds a handler accepts as inputs and produces as
/// outputs, together with the valid slot shape for each input kind.
///
/// The declaration is immutable once built; handlers answer kind and shape
/// queries by delegating here. Kinds keep registration order so that
/// `input_kinds`/`output_kinds` return stable sequences.
#[derive(Clone, Debug, Default)]
pub struct ComponentSchema {
    input_kinds: Vec<ComponentKind>,
    input_shapes: Vec<SlotShape>,
    output_kinds: Vec<ComponentKind>,
}

impl ComponentSchema {
    /// An empty schema; populate with [`with_input`](Self::with_input) and
    /// [`with_output`](Self::with_output).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `kind` as an input with the given valid slot shape.
    #[must_use]
    pub fn with_input(mut self, kind: ComponentKind, shape: SlotShape) -> Self {
        self.input_kinds.push(kind);
        self.input_shapes.push(shape);
        self
    }

    /// Declares `kind` as an output.
    #[must_use]
    pub fn with_output(mut self, kind: ComponentKind) -> Self {
        self.output_kinds.push(kind);
        self
    }

    /// The declared input kinds, in declaration order.
    #[must_use]
    pub fn input_kinds(&self) -> &[ComponentKind] {
        &self.input_kinds
    }

    /// The declared output kinds, in declaration order.
    #[must_use]
    pub fn output_kinds(&self) -> &[ComponentKind] {
        &self.output_kinds
    }

    /// Whether `kind` is a declared input.
    #[must_use]
    pub fn supports_input(&self, kind: ComponentKind) -> bool {
        self.input_kinds.contains(&kind)
    }

    /// Whether `kind` is a declared output.
    #[must_use]
    pub fn supports_output(&self, kind: ComponentKind) -> bool {
        self.output_kinds.contains(&kind)
    }

    /// Whether a query proposing `size` slots of `kind` is shape-compatible.
    ///
    /// Returns `false` for undeclared kinds and for sizes outside the
    /// declared range; both cases mean "reject the query", never "accept by
    /// default".
    #[must_use]
    pub fn is_valid_input_size(&self, kind: ComponentKind, size: usize) -> bool {
        self.input_kinds
            .iter()
            .position(|declared| *declared == kind)
            .is_some_and(|index| self.input_shapes[index].contains(size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::make_component_kind;

    #[test]
    fn undeclared_kinds_are_rejected() {
        let stock = make_component_kind("test/stock");
        let aura = make_component_kind("test/aura");
        let schema = ComponentSchema::new().with_input(stock, SlotShape::new(2, 4));
        assert!(!schema.is_valid_input_size(aura, 3));
        assert!(!schema.supports_input(aura));
    }

    #[test]
    fn sizes_outside_the_declared_range_are_rejected() {
        let stock = make_component_kind("test/stock");
        let schema = ComponentSchema::new().with_input(stock, SlotShape::new(2, 4));
        assert!(!schema.is_valid_input_size(stock, 1));
        assert!(schema.is_valid_input_size(stock, 2));
        assert!(schema.is_valid_input_size(stock, 3));
        assert!(schema.is_valid_input_size(stock, 4));
        assert!(!schema.is_valid_input_size(stock, 5));
    }

    #[test]
    fn outputs_do_not_grant_input_support() {
        let stock = make_component_kind("test/stock");
        let schema = ComponentSchema::new().with_output(stock);
        assert!(schema.supports_output(stock));
        assert!(!schema.supports_input(stock));
        assert!(!schema.is_valid_input_size(stock, 3));
    }
}

// SPDX-License-Identifier: Apache-2.0
//! The still's recipe handler: catalog, shape checks, targets, simulation.
use std::sync::{Arc, RwLock};

use alembic_core::{
    CatalogCell, ComponentKind, ComponentSchema, DerivationError, ReactionClosure, RecipeCatalog,
    RecipeDefinition, RecipeHandler, SimulationAdapter, SlotShape, DEFAULT_RECIPE_CAP,
};

use crate::device::{Face, Still, StillTarget, CRADLE_SLOTS, PORT_SLOTS};
use crate::mix::{neutral_essence, MixTable, StillDomain};
use crate::registry::InfusionRegistry;
use crate::stock::{stock_kind, EssenceId, Stock};

/// Process-wide memoization cell for the builtin table's derived catalog.
static TABLE_CATALOG: CatalogCell<Stock> = CatalogCell::new();

/// Recipe capability of one placed [`Still`].
///
/// The catalog has two segments. Table recipes are derived by reaction
/// closure from a neutral draught, once per process, shared by every handler
/// built with [`new`](Self::new). Extension definitions re-materialize from
/// the registry on every call, so late registrations show up without any
/// invalidation. Targets re-resolve against the device's current facing on
/// every call.
pub struct StillRecipeHandler {
    still: Arc<RwLock<Still>>,
    registry: Arc<InfusionRegistry>,
    table: &'static MixTable,
    neutral: EssenceId,
    schema: ComponentSchema,
    cache: &'static CatalogCell<Stock>,
    recipe_cap: usize,
}

impl StillRecipeHandler {
    /// A handler over `still` honouring `registry`, memoizing the derived
    /// table catalog in the process-wide cell.
    #[must_use]
    pub fn new(still: Arc<RwLock<Still>>, registry: Arc<InfusionRegistry>) -> Self {
        Self::with_cache(still, registry, &TABLE_CATALOG)
    }

    /// Routes derived-catalog memoization through a caller-owned cell.
    #[must_use]
    pub fn with_cache(
        still: Arc<RwLock<Still>>,
        registry: Arc<InfusionRegistry>,
        cache: &'static CatalogCell<Stock>,
    ) -> Self {
        let schema = ComponentSchema::new()
            .with_input(stock_kind(), SlotShape::new(2, 1 + CRADLE_SLOTS.len()))
            .with_output(stock_kind());
        Self {
            still,
            registry,
            table: MixTable::builtin(),
            neutral: neutral_essence(),
            schema,
            cache,
            recipe_cap: DEFAULT_RECIPE_CAP,
        }
    }

    /// Overrides the derivation runaway cap. Takes effect only if this
    /// handler is the one that populates its cell.
    #[must_use]
    pub fn with_recipe_cap(mut self, cap: usize) -> Self {
        self.recipe_cap = cap;
        self
    }

    fn table_segment(&self) -> Result<Arc<[RecipeDefinition<Stock>]>, DerivationError> {
        self.cache.get_or_derive(|| {
            let domain = StillDomain::new(self.table, self.neutral);
            ReactionClosure::new(&domain, stock_kind(), CRADLE_SLOTS.len())
                .with_recipe_cap(self.recipe_cap)
                .derive(&domain.seeds(), &domain.reagents())
        })
    }

    fn targets_for(face: Face) -> Vec<StillTarget> {
        PORT_SLOTS
            .iter()
            .map(|&slot| StillTarget { face, slot })
            .collect()
    }
}

impl RecipeHandler for StillRecipeHandler {
    type Value = Stock;
    type Target = StillTarget;

    fn input_kinds(&self) -> &[ComponentKind] {
        self.schema.input_kinds()
    }

    fn output_kinds(&self) -> &[ComponentKind] {
        self.schema.output_kinds()
    }

    fn is_valid_input_size(&self, kind: ComponentKind, size: usize) -> bool {
        self.schema.is_valid_input_size(kind, size)
    }

    fn recipes(&self) -> Result<RecipeCatalog<Stock>, DerivationError> {
        let table = self.table_segment()?;
        let extensions = self.registry.extension_definitions(CRADLE_SLOTS.len());
        Ok(RecipeCatalog::from_segments(vec![
            table,
            Arc::from(extensions),
        ]))
    }

    fn input_targets(&self, kind: ComponentKind) -> Option<Vec<StillTarget>> {
        if !self.schema.supports_input(kind) {
            return None;
        }
        let facing = self.still.read().ok()?.facing();
        Some(Self::targets_for(facing.face()))
    }

    fn output_targets(&self, kind: ComponentKind) -> Option<Vec<StillTarget>> {
        if !self.schema.supports_output(kind) {
            return None;
        }
        Some(Self::targets_for(Face::Down))
    }

    fn simulate(&self, query: &RecipeDefinition<Stock>) -> Option<RecipeDefinition<Stock>> {
        let adapter = SimulationAdapter::new(stock_kind(), 1 + CRADLE_SLOTS.len(), Stock::Empty);
        // Query vectors are recipe-ordered: the perch at 0, cradles after.
        let brewed = adapter.run(
            query.inputs(),
            |size| self.schema.is_valid_input_size(stock_kind(), size),
            |slots| self.registry.infuse(slots, 0, &[1, 2, 3]),
        )?;
        Some(RecipeDefinition::new(query.inputs().clone(), brewed))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::device::{FIREBOX_SLOT, PERCH_SLOT};
    use crate::stock::{make_reagent_id, Vessel};

    fn handler() -> StillRecipeHandler {
        StillRecipeHandler::new(
            Arc::new(RwLock::new(Still::new())),
            Arc::new(InfusionRegistry::with_native()),
        )
    }

    #[test]
    fn both_sides_speak_stocks_only() {
        let handler = handler();
        assert_eq!(handler.input_kinds(), &[stock_kind()]);
        assert_eq!(handler.output_kinds(), &[stock_kind()]);
    }

    #[test]
    fn query_sizes_outside_two_to_four_are_rejected() {
        let handler = handler();
        assert!(!handler.is_valid_input_size(stock_kind(), 1));
        for size in 2..=4 {
            assert!(handler.is_valid_input_size(stock_kind(), size));
        }
        assert!(!handler.is_valid_input_size(stock_kind(), 5));
        let foreign = alembic_core::make_component_kind("alembic/other");
        assert!(!handler.is_valid_input_size(foreign, 3));
    }

    #[test]
    fn input_targets_follow_the_facing_and_skip_the_firebox() {
        let still = Arc::new(RwLock::new(Still::new()));
        let handler = StillRecipeHandler::new(
            Arc::clone(&still),
            Arc::new(InfusionRegistry::with_native()),
        );

        let before = handler.input_targets(stock_kind()).expect("supported kind");
        assert_eq!(
            before.iter().map(|target| target.slot).collect::<Vec<_>>(),
            vec![PERCH_SLOT, 0, 1, 2]
        );
        assert!(before.iter().all(|target| target.face == Face::North));
        assert!(before.iter().all(|target| target.slot != FIREBOX_SLOT));

        still.write().unwrap().rotate();
        let after = handler.input_targets(stock_kind()).expect("supported kind");
        assert!(after.iter().all(|target| target.face == Face::East));
    }

    #[test]
    fn output_targets_always_hang_under_the_bottom_face() {
        let still = Arc::new(RwLock::new(Still::new()));
        let handler = StillRecipeHandler::new(
            Arc::clone(&still),
            Arc::new(InfusionRegistry::with_native()),
        );

        still.write().unwrap().rotate();
        let targets = handler.output_targets(stock_kind()).expect("supported kind");
        assert!(targets.iter().all(|target| target.face == Face::Down));
        assert_eq!(
            targets.iter().map(|target| target.slot).collect::<Vec<_>>(),
            vec![PERCH_SLOT, 0, 1, 2]
        );
    }

    #[test]
    fn targets_are_refused_for_unsupported_kinds() {
        let handler = handler();
        let foreign = alembic_core::make_component_kind("alembic/other");
        assert_eq!(handler.input_targets(foreign), None);
        assert_eq!(handler.output_targets(foreign), None);
    }

    #[test]
    fn simulation_brews_the_queried_cradles_and_consumes_the_perch() {
        let handler = handler();
        let query = RecipeDefinition::new(
            [
                Stock::Reagent(make_reagent_id("sourcap")),
                Stock::phial(Vessel::Draught, neutral_essence()),
            ]
            .into_iter()
            .map(|stock| alembic_core::Ingredient::exact(stock_kind(), stock))
            .collect(),
            [alembic_core::Ingredient::always(stock_kind())]
                .into_iter()
                .collect(),
        );

        let brewed = handler.simulate(&query).expect("well-shaped query");
        assert_eq!(brewed.inputs(), query.inputs());
        let outputs: Vec<_> = brewed
            .outputs()
            .iter()
            .map(|ingredient| ingredient.exemplars()[0].clone())
            .collect();
        assert_eq!(
            outputs,
            vec![
                Stock::Empty,
                Stock::phial(Vessel::Draught, crate::stock::make_essence_id("turbid")),
                Stock::Empty,
                Stock::Empty,
            ],
            "perch consumed, first cradle brewed, absent cradles stay empty"
        );
    }

    #[test]
    fn simulation_refuses_oversized_queries() {
        let handler = handler();
        let query = RecipeDefinition::new(
            (0..5)
                .map(|_| alembic_core::Ingredient::always(stock_kind()))
                .collect(),
            [alembic_core::Ingredient::always(stock_kind())]
                .into_iter()
                .collect(),
        );
        assert_eq!(handler.simulate(&query), None);
    }
}

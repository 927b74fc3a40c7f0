// SPDX-License-Identifier: Apache-2.0
//! The mix table: one-step reactions between reagents and phials.
use std::sync::OnceLock;

use alembic_core::{Reagent, ReactionDomain};
use rustc_hash::FxHashMap;

use crate::stock::{
    make_essence_id, make_reagent_id, stock_kind, EssenceId, ReagentId, Stock, Vessel,
};

/// Table of the one-step reactions a still's burner can drive.
///
/// Two disjoint families: vessel links convert the container and keep the
/// essence, essence links refine the essence and keep the container. When a
/// reagent carries links in both families, the vessel link is consulted
/// first. Relinking an existing pair replaces its product.
#[derive(Clone, Debug, Default)]
pub struct MixTable {
    vessel_mixes: FxHashMap<(ReagentId, Vessel), Vessel>,
    essence_mixes: FxHashMap<(ReagentId, EssenceId), EssenceId>,
    order: Vec<ReagentId>,
}

impl MixTable {
    /// An empty table with no reactions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Links `reagent` to a vessel conversion `from` -> `to`.
    pub fn link_vessel(&mut self, reagent: ReagentId, from: Vessel, to: Vessel) {
        self.vessel_mixes.insert((reagent, from), to);
        self.remember(reagent);
    }

    /// Links `reagent` to an essence refinement `from` -> `to`.
    pub fn link_essence(&mut self, reagent: ReagentId, from: EssenceId, to: EssenceId) {
        self.essence_mixes.insert((reagent, from), to);
        self.remember(reagent);
    }

    /// Every linked reagent, first-link order, each exactly once.
    #[must_use]
    pub fn reagents(&self) -> &[ReagentId] {
        &self.order
    }

    /// Whether `id` participates in any link of this table.
    #[must_use]
    pub fn is_reagent(&self, id: ReagentId) -> bool {
        self.order.contains(&id)
    }

    /// Applies one reaction step, or `None` when the pair does not react.
    ///
    /// Only a dry reagent acting on a phial can react; anything else is
    /// inert. The result is always a phial.
    #[must_use]
    pub fn react(&self, reagent: &Stock, base: &Stock) -> Option<Stock> {
        let Stock::Reagent(reagent) = reagent else {
            return None;
        };
        let Stock::Phial { vessel, essence } = base else {
            return None;
        };
        if let Some(&converted) = self.vessel_mixes.get(&(*reagent, *vessel)) {
            return Some(Stock::phial(converted, *essence));
        }
        self.essence_mixes
            .get(&(*reagent, *essence))
            .map(|&refined| Stock::phial(*vessel, refined))
    }

    /// The table every stock still ships with.
    ///
    /// Eleven reagents over a small essence graph: `sourcap` turns water
    /// turbid, five ingredients refine the turbid base into effect essences,
    /// `glimmerdust` and `saltpetre` strengthen or lengthen those, and
    /// `blastcap`/`wispbloom` walk the vessel chain draught -> volatile ->
    /// miasmal at any essence.
    pub fn builtin() -> &'static Self {
        static BUILTIN: OnceLock<MixTable> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let mut table = Self::new();
            let reagent = make_reagent_id;
            let essence = make_essence_id;
            let water = neutral_essence();
            let turbid = essence("turbid");

            table.link_vessel(reagent("blastcap"), Vessel::Draught, Vessel::Volatile);
            table.link_vessel(reagent("wispbloom"), Vessel::Volatile, Vessel::Miasmal);

            table.link_essence(reagent("sourcap"), water, turbid);
            table.link_essence(reagent("dewmoss"), water, essence("mundane"));
            table.link_essence(reagent("glimmerdust"), water, essence("thick"));
            table.link_essence(reagent("saltpetre"), water, essence("mundane"));

            table.link_essence(reagent("emberbloom"), turbid, essence("ember"));
            table.link_essence(reagent("glacierkelp"), turbid, essence("frost"));
            table.link_essence(reagent("marrowroot"), turbid, essence("vigor"));
            table.link_essence(reagent("nightcap"), turbid, essence("torpor"));
            table.link_essence(reagent("ashpetal"), turbid, essence("venom"));

            table.link_essence(
                reagent("glimmerdust"),
                essence("vigor"),
                essence("vigor/strong"),
            );
            table.link_essence(
                reagent("glimmerdust"),
                essence("venom"),
                essence("venom/strong"),
            );
            table.link_essence(
                reagent("glimmerdust"),
                essence("ember"),
                essence("ember/strong"),
            );
            table.link_essence(
                reagent("saltpetre"),
                essence("torpor"),
                essence("torpor/long"),
            );
            table.link_essence(
                reagent("saltpetre"),
                essence("frost"),
                essence("frost/long"),
            );
            table
        })
    }

    fn remember(&mut self, reagent: ReagentId) {
        if !self.order.contains(&reagent) {
            self.order.push(reagent);
        }
    }
}

/// Essence of the neutral draught the builtin catalog grows from.
#[must_use]
pub fn neutral_essence() -> EssenceId {
    make_essence_id("water")
}

/// A mix table and its neutral essence, as a reaction domain.
///
/// `react` delegates to the table. `is_output_valid` accepts a reaction when
/// the stock identity changed, or when only the essence changed to something
/// that is neither the neutral essence nor what the base already carried.
/// Reactions into or out of an empty slot are never valid.
pub struct StillDomain<'a> {
    table: &'a MixTable,
    neutral: EssenceId,
}

impl<'a> StillDomain<'a> {
    /// A domain over `table` whose no-op essence is `neutral`.
    #[must_use]
    pub fn new(table: &'a MixTable, neutral: EssenceId) -> Self {
        Self { table, neutral }
    }

    /// The essence treated as "nothing brewed yet".
    #[must_use]
    pub fn neutral(&self) -> EssenceId {
        self.neutral
    }

    /// The seed states closure derivation grows from: one neutral draught.
    #[must_use]
    pub fn seeds(&self) -> Vec<Stock> {
        vec![Stock::phial(Vessel::Draught, self.neutral)]
    }

    /// The table's reagents as exact-match derivation reagents.
    #[must_use]
    pub fn reagents(&self) -> Vec<Reagent<Stock>> {
        self.table
            .reagents()
            .iter()
            .map(|&id| Reagent::exact(stock_kind(), Stock::Reagent(id)))
            .collect()
    }
}

impl ReactionDomain for StillDomain<'_> {
    type Value = Stock;

    fn react(&self, reagent: &Stock, base: &Stock) -> Option<Stock> {
        self.table.react(reagent, base)
    }

    fn is_output_valid(&self, base: &Stock, result: &Stock) -> bool {
        if base.is_empty() || result.is_empty() {
            return false;
        }
        if base.identity() != result.identity() {
            return true;
        }
        match (base.essence(), result.essence()) {
            (Some(before), Some(after)) => after != self.neutral && after != before,
            _ => false,
        }
    }
}

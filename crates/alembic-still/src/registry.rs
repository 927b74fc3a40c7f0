// SPDX-License-Identifier: Apache-2.0
//! The infusion registry: externally registered reactions beside the table.
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use thiserror::Error;

use alembic_core::{make_predicate_id, Ingredient, Ingredients, RecipeDefinition};

use crate::mix::MixTable;
use crate::stock::{stock_kind, Stock};

/// One infusion the still can perform.
///
/// The two `accepts_*` predicates describe the rule declaratively and back
/// the ingredient tests of its published definition; [`output`] is the
/// procedural side actually consulted while brewing. A rule must return
/// [`Stock::Empty`] from `output` for any pair it does not apply to.
///
/// [`output`]: Self::output
pub trait InfusionRule: Send + Sync {
    /// Stable rule name. Registration rejects duplicates by this name, and
    /// the published ingredient tests derive their identity from it.
    fn name(&self) -> &str;

    /// Whether `stock` can sit on the perch for this rule.
    fn accepts_reagent(&self, stock: &Stock) -> bool;

    /// Whether `stock` can sit in a cradle for this rule.
    fn accepts_base(&self, stock: &Stock) -> bool;

    /// The brewed result, or [`Stock::Empty`] when the pair does not apply.
    fn output(&self, reagent: &Stock, base: &Stock) -> Stock;

    /// Whether this rule is the device's own table rather than an extension.
    ///
    /// Native rules brew like any other but publish no definitions here;
    /// their recipes are derived by closure instead.
    fn native(&self) -> bool {
        false
    }
}

/// The builtin mix table behind the [`InfusionRule`] seam.
pub struct TableRule {
    table: &'static MixTable,
}

impl TableRule {
    /// Wraps a process-lifetime table.
    #[must_use]
    pub fn new(table: &'static MixTable) -> Self {
        Self { table }
    }
}

impl InfusionRule for TableRule {
    fn name(&self) -> &str {
        "alembic/table"
    }

    fn accepts_reagent(&self, stock: &Stock) -> bool {
        matches!(stock, Stock::Reagent(id) if self.table.is_reagent(*id))
    }

    fn accepts_base(&self, stock: &Stock) -> bool {
        matches!(stock, Stock::Phial { .. })
    }

    fn output(&self, reagent: &Stock, base: &Stock) -> Stock {
        self.table.react(reagent, base).unwrap_or(Stock::Empty)
    }

    fn native(&self) -> bool {
        true
    }
}

/// Errors emitted by the infusion registry.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A rule with the same name is already registered.
    #[error("infusion rule {name:?} is already registered")]
    DuplicateRule {
        /// The conflicting rule name.
        name: String,
    },
}

/// Shared, ordered collection of every infusion a still honours.
///
/// Rules brew in registration order with the first applicable rule winning,
/// so a registry built by [`with_native`](Self::with_native) lets the builtin
/// table shadow later extensions for the pairs it already covers. The
/// registry is shared behind `Arc` and registration goes through `&self`, so
/// rules registered after a handler was built are honoured by it.
#[derive(Default)]
pub struct InfusionRegistry {
    rules: RwLock<Vec<(String, Arc<dyn InfusionRule>)>>,
}

impl InfusionRegistry {
    /// An empty registry honouring nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the builtin table already installed.
    #[must_use]
    pub fn with_native() -> Self {
        let rule: Arc<dyn InfusionRule> = Arc::new(TableRule::new(MixTable::builtin()));
        let name = rule.name().to_owned();
        Self {
            rules: RwLock::new(vec![(name, rule)]),
        }
    }

    /// Registers `rule` behind every rule registered so far.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateRule`] when a rule of the same name is
    /// already present; the registry is left unchanged.
    pub fn register(&self, rule: Arc<dyn InfusionRule>) -> Result<(), RegistryError> {
        let name = rule.name().to_owned();
        // Rule code never runs under the write lock; a poisoned lock is
        // recovered rather than propagated.
        let mut rules = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        if rules.iter().any(|(known, _)| *known == name) {
            return Err(RegistryError::DuplicateRule { name });
        }
        rules.push((name, rule));
        Ok(())
    }

    /// A snapshot of every rule in registration order.
    #[must_use]
    pub fn rules(&self) -> Vec<Arc<dyn InfusionRule>> {
        self.read_rules()
            .iter()
            .map(|(_, rule)| Arc::clone(rule))
            .collect()
    }

    /// Publishes each non-native rule as a predicate-tested definition.
    ///
    /// Inputs are the rule's reagent test on the perch slot followed by its
    /// base test on `batch_slots` cradles. The outputs of an external rule
    /// depend on what is actually brewed, so the definition promises none:
    /// a never-matching perch slot and unconstrained cradles.
    ///
    /// Materialized fresh on every call; rules registered since the last
    /// call are picked up without invalidating anything.
    #[must_use]
    pub fn extension_definitions(&self, batch_slots: usize) -> Vec<RecipeDefinition<Stock>> {
        self.read_rules()
            .iter()
            .filter(|(_, rule)| !rule.native())
            .map(|(name, rule)| {
                let reagent_rule = Arc::clone(rule);
                let base_rule = Arc::clone(rule);
                let reagent_test = Ingredient::external(
                    stock_kind(),
                    make_predicate_id(&format!("infusion/{name}/reagent")),
                    move |stock: &Stock| reagent_rule.accepts_reagent(stock),
                );
                let base_test = Ingredient::external(
                    stock_kind(),
                    make_predicate_id(&format!("infusion/{name}/base")),
                    move |stock: &Stock| base_rule.accepts_base(stock),
                );

                let mut inputs = Vec::with_capacity(batch_slots + 1);
                inputs.push(reagent_test);
                for _ in 0..batch_slots {
                    inputs.push(base_test.clone());
                }
                let mut outputs = Vec::with_capacity(batch_slots + 1);
                outputs.push(Ingredient::never(stock_kind()));
                for _ in 0..batch_slots {
                    outputs.push(Ingredient::always(stock_kind()));
                }
                RecipeDefinition::new(Ingredients::new(inputs), Ingredients::new(outputs))
            })
            .collect()
    }

    /// Brews one batch in place.
    ///
    /// Reads the reagent from `reagent_slot`, gives each cradle to the first
    /// rule producing a non-empty output for the pair, and consumes the
    /// reagent afterwards whether or not anything brewed. Cradles no rule
    /// applies to keep their stock. Out-of-range slots are skipped.
    pub fn infuse(&self, slots: &mut [Stock], reagent_slot: usize, cradle_slots: &[usize]) {
        let Some(reagent) = slots.get(reagent_slot).cloned() else {
            return;
        };
        let rules = self.read_rules();
        for &cradle in cradle_slots {
            let Some(base) = slots.get(cradle) else {
                continue;
            };
            let brewed = rules.iter().find_map(|(_, rule)| {
                let stock = rule.output(&reagent, base);
                (!stock.is_empty()).then_some(stock)
            });
            if let Some(stock) = brewed {
                if let Some(slot) = slots.get_mut(cradle) {
                    *slot = stock;
                }
            }
        }
        if let Some(slot) = slots.get_mut(reagent_slot) {
            *slot = Stock::Empty;
        }
    }

    fn read_rules(&self) -> RwLockReadGuard<'_, Vec<(String, Arc<dyn InfusionRule>)>> {
        self.rules.read().unwrap_or_else(PoisonError::into_inner)
    }
}

// SPDX-License-Identifier: Apache-2.0
#![allow(missing_docs)]
use std::sync::{Arc, RwLock};

use alembic_core::{make_component_kind, Ingredient, Ingredients, RecipeDefinition, RecipeHandler};
use alembic_still::{
    make_essence_id, make_reagent_id, neutral_essence, stock_kind, InfusionRegistry, Still,
    StillRecipeHandler, Stock, Vessel,
};

fn new_handler() -> StillRecipeHandler {
    StillRecipeHandler::new(
        Arc::new(RwLock::new(Still::new())),
        Arc::new(InfusionRegistry::with_native()),
    )
}

fn exact_query(stocks: &[Stock]) -> RecipeDefinition<Stock> {
    RecipeDefinition::new(
        stocks
            .iter()
            .map(|stock| Ingredient::exact(stock_kind(), stock.clone()))
            .collect(),
        Ingredients::new(vec![Ingredient::always(stock_kind())]),
    )
}

#[test]
fn every_derived_definition_simulates_to_its_own_outputs() {
    let handler = new_handler();
    let catalog = handler.recipes().expect("builtin table converges");

    for definition in catalog.iter() {
        let brewed = handler
            .simulate(definition)
            .expect("derived definitions are well-shaped queries");
        assert_eq!(brewed.inputs(), definition.inputs());
        for slot in 1..=3 {
            assert_eq!(
                brewed.outputs().get(slot),
                definition.outputs().get(slot),
                "each cradle brews what the catalog promised"
            );
        }
        let perch = brewed.outputs().get(0).expect("full-width result");
        assert_eq!(
            perch,
            &Ingredient::exact(stock_kind(), Stock::Empty),
            "the reagent is consumed"
        );
    }
}

#[test]
fn short_queries_brew_their_cradles_and_pad_with_empties() {
    let handler = new_handler();
    let query = exact_query(&[
        Stock::Reagent(make_reagent_id("marrowroot")),
        Stock::phial(Vessel::Draught, make_essence_id("turbid")),
        Stock::phial(Vessel::Draught, make_essence_id("turbid")),
    ]);

    let brewed = handler.simulate(&query).expect("three slots is a valid size");
    let vigor = Stock::phial(Vessel::Draught, make_essence_id("vigor"));
    let outputs: Vec<_> = brewed
        .outputs()
        .iter()
        .map(|ingredient| ingredient.exemplars()[0].clone())
        .collect();
    assert_eq!(
        outputs,
        vec![Stock::Empty, vigor.clone(), vigor, Stock::Empty]
    );
}

#[test]
fn queries_that_brew_nothing_still_simulate() {
    let handler = new_handler();
    let water = Stock::phial(Vessel::Draught, neutral_essence());
    let query = exact_query(&[Stock::Empty, water.clone()]);

    let brewed = handler.simulate(&query).expect("an idle batch is simulable");
    assert_eq!(
        brewed.outputs().get(1),
        Some(&Ingredient::exact(stock_kind(), water)),
        "no rule applies, the cradle echoes"
    );
}

#[test]
fn queries_spanning_more_than_one_kind_cannot_simulate() {
    let handler = new_handler();
    let foreign = make_component_kind("alembic/other");
    let query = RecipeDefinition::new(
        Ingredients::new(vec![
            Ingredient::exact(stock_kind(), Stock::Reagent(make_reagent_id("sourcap"))),
            Ingredient::always(foreign),
        ]),
        Ingredients::new(vec![Ingredient::always(stock_kind())]),
    );
    assert_eq!(handler.simulate(&query), None);
}

#[test]
fn queries_outside_the_device_shape_cannot_simulate() {
    let handler = new_handler();
    let water = Stock::phial(Vessel::Draught, neutral_essence());

    let lone_perch = exact_query(&[Stock::Reagent(make_reagent_id("sourcap"))]);
    assert_eq!(handler.simulate(&lone_perch), None);

    let overfull = exact_query(&[
        Stock::Reagent(make_reagent_id("sourcap")),
        water.clone(),
        water.clone(),
        water.clone(),
        water,
    ]);
    assert_eq!(handler.simulate(&overfull), None);
}

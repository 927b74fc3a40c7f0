// SPDX-License-Identifier: Apache-2.0
#![allow(missing_docs)]
use std::collections::HashSet;

use alembic_core::{CatalogCell, Ingredient, ReactionClosure, SlotPredicate};
use alembic_testkit::{
    elem_kind, elem_reagent, Elem, RecordingTelemetry, TableDomain, TallyDomain, TelemetryEvent,
};

const BATCH: usize = 3;

#[test]
fn one_reagent_one_step_derives_a_single_batched_recipe() {
    let domain = TableDomain::from_links(&[((10, 0), 1)]);
    let telemetry = RecordingTelemetry::new();
    let closure = ReactionClosure::new(&domain, elem_kind(), BATCH).with_telemetry(&telemetry);

    let catalog = closure
        .derive(&[Elem(0)], &[elem_reagent(10)])
        .expect("one-step domain converges");

    assert_eq!(catalog.len(), 1);
    let definition = &catalog[0];
    assert_eq!(
        definition.inputs().get(0).unwrap(),
        &Ingredient::exact(elem_kind(), Elem(10)),
        "first input slot carries the reagent"
    );
    for slot in 1..=BATCH {
        assert_eq!(
            definition.inputs().get(slot).unwrap(),
            &Ingredient::exact(elem_kind(), Elem(0))
        );
        assert_eq!(
            definition.outputs().get(slot).unwrap(),
            &Ingredient::exact(elem_kind(), Elem(1))
        );
    }
    assert!(matches!(
        definition.outputs().get(0).unwrap().predicate(),
        SlotPredicate::Never
    ));

    assert_eq!(
        telemetry.events(),
        vec![
            TelemetryEvent::Pass {
                pass: 0,
                frontier_len: 1,
                catalog_len: 1
            },
            TelemetryEvent::Pass {
                pass: 1,
                frontier_len: 0,
                catalog_len: 1
            },
            TelemetryEvent::Complete {
                passes: 2,
                catalog_len: 1
            },
        ],
        "the discovered state must enter the frontier for one more pass"
    );
}

#[test]
fn reaction_echoing_the_neutral_base_derives_nothing() {
    let domain = TableDomain::from_links(&[((10, 0), 0)]);
    let telemetry = RecordingTelemetry::new();
    let closure = ReactionClosure::new(&domain, elem_kind(), BATCH).with_telemetry(&telemetry);

    let catalog = closure
        .derive(&[Elem(0)], &[elem_reagent(10)])
        .expect("no-op domain converges immediately");

    assert!(catalog.is_empty(), "no-op reactions are not recipes");
    assert_eq!(
        telemetry.events(),
        vec![
            TelemetryEvent::Pass {
                pass: 0,
                frontier_len: 0,
                catalog_len: 0
            },
            TelemetryEvent::Complete {
                passes: 1,
                catalog_len: 0
            },
        ]
    );
}

#[test]
fn two_reagents_to_the_same_state_derive_distinct_recipes() {
    let domain = TableDomain::from_links(&[((10, 0), 1), ((11, 0), 1)]);
    let closure = ReactionClosure::new(&domain, elem_kind(), BATCH);

    let catalog = closure
        .derive(&[Elem(0)], &[elem_reagent(10), elem_reagent(11)])
        .expect("finite domain converges");

    assert_eq!(
        catalog.len(),
        2,
        "the reagent slot participates in definition equality"
    );
    assert_ne!(catalog[0], catalog[1]);
    assert_eq!(catalog[0].outputs(), catalog[1].outputs());
}

#[test]
fn memoized_catalog_is_not_rederived_on_second_access() {
    let domain = TallyDomain::new(TableDomain::from_links(&[((10, 0), 1), ((10, 1), 2)]));
    let cell: CatalogCell<Elem> = CatalogCell::new();
    let derive = |domain: &TallyDomain<TableDomain>| {
        ReactionClosure::new(domain, elem_kind(), BATCH).derive(&[Elem(0)], &[elem_reagent(10)])
    };

    let first = cell.get_or_derive(|| derive(&domain)).expect("converges");
    let calls_after_first = domain.calls();
    assert!(calls_after_first > 0, "first access must derive");

    let second = cell.get_or_derive(|| derive(&domain)).expect("memoized");
    assert_eq!(
        domain.calls(),
        calls_after_first,
        "second access must not invoke the reaction function"
    );

    let first_set: HashSet<_> = first.iter().collect();
    let second_set: HashSet<_> = second.iter().collect();
    assert_eq!(first_set, second_set, "both accesses see the same catalog");
}

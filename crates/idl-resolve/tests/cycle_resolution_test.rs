//! Cycle tolerance for the resolution pass
//!
//! Loading a library whose types reference themselves directly or
//! mutually must resolve without unbounded recursion, leaving both the
//! live pointer and the textual name intact.

use idl_model::{EntityData, EntityId, FieldRef, Library, Model, Reference, SimpleType};
use idl_resolve::{extension_chain, resolve_model};
use idl_version::SchemeRegistry;

fn simple_with_parent(parent: &str) -> EntityData {
    EntityData::Simple(SimpleType {
        parent_type: Reference::to(parent),
        ..SimpleType::default()
    })
}

fn parent_of(model: &Model, entity: EntityId) -> &Reference {
    model
        .reference(&FieldRef::SimpleParentType { entity })
        .unwrap()
}

#[test]
fn direct_self_reference_resolves_to_itself() {
    let mut model = Model::new();
    let schemes = SchemeRegistry::new();
    let lib = model.add_library(Library::new(
        "cycles",
        "http://example.org/cycles/v1",
        "cyc",
        "1.0.0",
        "default",
    ));
    let direct = model.add_entity(
        lib,
        "DirectCircularReferenceType",
        simple_with_parent("DirectCircularReferenceType"),
    );

    resolve_model(&mut model, &schemes);

    let reference = parent_of(&model, direct);
    assert_eq!(reference.resolved(), Some(direct));
    assert_eq!(reference.textual(), Some("DirectCircularReferenceType"));
}

#[test]
fn indirect_cycle_resolves_both_directions() {
    let mut model = Model::new();
    let schemes = SchemeRegistry::new();
    let lib = model.add_library(Library::new(
        "cycles",
        "http://example.org/cycles/v1",
        "cyc",
        "1.0.0",
        "default",
    ));
    let a = model.add_entity(lib, "IndirectA", simple_with_parent("IndirectB"));
    let b = model.add_entity(lib, "IndirectB", simple_with_parent("IndirectA"));

    resolve_model(&mut model, &schemes);

    assert_eq!(parent_of(&model, a).resolved(), Some(b));
    assert_eq!(parent_of(&model, a).textual(), Some("IndirectB"));
    assert_eq!(parent_of(&model, b).resolved(), Some(a));
    assert_eq!(parent_of(&model, b).textual(), Some("IndirectA"));
}

#[test]
fn chain_walks_over_cycles_terminate() {
    let mut model = Model::new();
    let schemes = SchemeRegistry::new();
    let lib = model.add_library(Library::new(
        "cycles",
        "http://example.org/cycles/v1",
        "cyc",
        "1.0.0",
        "default",
    ));
    let a = model.add_entity(lib, "IndirectA", simple_with_parent("IndirectB"));
    let b = model.add_entity(lib, "IndirectB", simple_with_parent("IndirectA"));

    resolve_model(&mut model, &schemes);

    // The visited-set guard stops the walk after one round of the cycle
    assert_eq!(extension_chain(&model, a), vec![a, b]);
    assert_eq!(extension_chain(&model, b), vec![b, a]);
}

#[test]
fn unresolved_names_stay_textual_only() {
    let mut model = Model::new();
    let schemes = SchemeRegistry::new();
    let lib = model.add_library(Library::new(
        "cycles",
        "http://example.org/cycles/v1",
        "cyc",
        "1.0.0",
        "default",
    ));
    let orphan = model.add_entity(lib, "Orphan", simple_with_parent("NoSuchType"));

    let bound = resolve_model(&mut model, &schemes);

    assert_eq!(bound, 0);
    let reference = parent_of(&model, orphan);
    assert_eq!(reference.resolved(), None);
    assert_eq!(reference.textual(), Some("NoSuchType"));
}

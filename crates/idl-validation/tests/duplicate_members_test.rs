//! Duplicate detection across the two independent uniqueness rules
//!
//! Sibling members sharing a name and a local member shadowing an
//! inherited one are separate rules with separate codes, and either can
//! fire without the other.

use idl_model::{
    Attribute, BusinessObject, CoreObject, Element, EntityData, FieldRef, Library, Model, Reference,
};
use idl_validation::checks::{ERROR_DUPLICATE_NAME, ERROR_NAME_UPA};
use idl_validation::{Findings, MessageFormat, Severity, ValidationEngine};
use idl_version::SchemeRegistry;
use std::rc::Rc;

fn library(name: &str, namespace: &str, prefix: &str) -> Library {
    Library::new(name, namespace, prefix, "1.0.0", "default")
}

fn engine() -> ValidationEngine {
    ValidationEngine::new(Rc::new(SchemeRegistry::new()))
}

fn codes(findings: &Findings) -> Vec<&'static str> {
    findings.iter().map(|f| f.code).collect()
}

#[test]
fn duplicate_library_members_reported_once_per_name() {
    let mut model = Model::new();
    let lib = model.add_library(library("orders", "http://example.org/orders/v1", "ord"));
    model.add_entity(lib, "Order", EntityData::CoreObject(CoreObject::default()));
    model.add_entity(lib, "Order", EntityData::BusinessObject(BusinessObject::default()));
    model.add_entity(lib, "Invoice", EntityData::CoreObject(CoreObject::default()));

    let findings = engine().validate_library(&model, lib);
    let duplicates: Vec<_> = findings
        .iter()
        .filter(|f| f.code == ERROR_DUPLICATE_NAME)
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].params, vec!["Order"]);
}

#[test]
fn mixed_member_kinds_collide_within_one_facet() {
    // An attribute and an element with the same name are still duplicates
    let mut model = Model::new();
    let lib = model.add_library(library("orders", "http://example.org/orders/v1", "ord"));

    let mut core = CoreObject::default();
    core.summary.attributes.push(Attribute::new("total", Reference::none()));
    core.summary.elements.push(Element::new("total", Reference::none()));
    let entity = model.add_entity(lib, "Order", EntityData::CoreObject(core));

    let findings = engine().validate_entity(&model, entity);
    assert!(codes(&findings).contains(&ERROR_DUPLICATE_NAME));
    assert!(!codes(&findings).contains(&ERROR_NAME_UPA));
}

#[test]
fn members_in_different_facets_do_not_collide() {
    let mut model = Model::new();
    let lib = model.add_library(library("orders", "http://example.org/orders/v1", "ord"));

    let mut core = CoreObject::default();
    core.summary.attributes.push(Attribute::new("total", Reference::none()));
    core.detail.attributes.push(Attribute::new("total", Reference::none()));
    let entity = model.add_entity(lib, "Order", EntityData::CoreObject(core));

    let findings = engine().validate_entity(&model, entity);
    assert!(!findings.has_severity(Severity::Error), "{findings:?}");
}

#[test]
fn inherited_collision_reported_across_extension_chain() {
    let mut model = Model::new();
    let lib = model.add_library(library("orders", "http://example.org/orders/v1", "ord"));

    let mut root = CoreObject::default();
    root.summary.attributes.push(Attribute::new("id", Reference::none()));
    let root_id = model.add_entity(lib, "Root", EntityData::CoreObject(root));

    let middle_id = model.add_entity(lib, "Middle", EntityData::CoreObject(CoreObject::default()));
    model.assign_reference(FieldRef::Extension { entity: middle_id }, Some(root_id));

    // The collision is two levels up the chain
    let mut leaf = CoreObject::default();
    leaf.summary.attributes.push(Attribute::new("id", Reference::none()));
    let leaf_id = model.add_entity(lib, "Leaf", EntityData::CoreObject(leaf));
    model.assign_reference(FieldRef::Extension { entity: leaf_id }, Some(middle_id));

    let findings = engine().validate_entity(&model, leaf_id);
    let upa: Vec<_> = findings.iter().filter(|f| f.code == ERROR_NAME_UPA).collect();
    assert_eq!(upa.len(), 1);
    assert_eq!(upa[0].params, vec!["id"]);

    // The middle object declares nothing of its own and stays clean
    let findings = engine().validate_entity(&model, middle_id);
    assert!(!codes(&findings).contains(&ERROR_NAME_UPA));
}

#[test]
fn inherited_collision_over_extension_cycle_terminates() {
    let mut model = Model::new();
    let lib = model.add_library(library("orders", "http://example.org/orders/v1", "ord"));

    let mut a = CoreObject::default();
    a.summary.attributes.push(Attribute::new("shared", Reference::none()));
    let a_id = model.add_entity(lib, "A", EntityData::CoreObject(a));

    let mut b = CoreObject::default();
    b.summary.attributes.push(Attribute::new("shared", Reference::none()));
    let b_id = model.add_entity(lib, "B", EntityData::CoreObject(b));

    model.assign_reference(FieldRef::Extension { entity: a_id }, Some(b_id));
    model.assign_reference(FieldRef::Extension { entity: b_id }, Some(a_id));

    // Both directions report the shadowed name exactly once
    for entity in [a_id, b_id] {
        let findings = engine().validate_entity(&model, entity);
        let upa: Vec<_> = findings.iter().filter(|f| f.code == ERROR_NAME_UPA).collect();
        assert_eq!(upa.len(), 1, "{:?}", findings.messages(MessageFormat::Identified));
    }
}

#[test]
fn identified_messages_carry_the_offending_element() {
    let mut model = Model::new();
    let lib = model.add_library(library("orders", "http://example.org/orders/v1", "ord"));

    let mut core = CoreObject::default();
    core.summary.attributes.push(Attribute::new("total", Reference::none()));
    core.summary.attributes.push(Attribute::new("total", Reference::none()));
    let entity = model.add_entity(lib, "Order", EntityData::CoreObject(core));

    let findings = engine().validate_entity(&model, entity);
    let messages = findings.messages(MessageFormat::Identified);
    assert!(messages.iter().any(|m| m.starts_with("[orders/Order]")), "{messages:?}");
}

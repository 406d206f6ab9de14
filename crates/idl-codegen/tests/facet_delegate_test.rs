//! Facet delegate selection through generated artifacts
//!
//! An empty summary facet must be skipped when picking the base of a
//! generated detail type, and a summary with content must be selected.

use idl_codegen::{CodegenContext, TargetFormat, TransformerFactory};
use idl_model::{
    Attribute, BusinessObject, EntityData, EntityId, FieldRef, Library, LibraryId, Model, Reference,
};
use idl_version::SchemeRegistry;
use std::rc::Rc;

fn setup() -> (Model, LibraryId, TransformerFactory) {
    let mut model = Model::new();
    let lib = model.add_library(Library::new(
        "orders",
        "http://example.org/orders/v1",
        "ord",
        "1.0.0",
        "default",
    ));
    let factory = TransformerFactory::new(Rc::new(SchemeRegistry::new()));
    (model, lib, factory)
}

fn add_business_object(
    model: &mut Model,
    lib: LibraryId,
    name: &str,
    summary_members: &[&str],
    detail_members: &[&str],
) -> EntityId {
    let mut bo = BusinessObject::default();
    for member in summary_members {
        bo.summary
            .attributes
            .push(Attribute::new(*member, Reference::to("xsd:string")));
    }
    for member in detail_members {
        bo.detail
            .attributes
            .push(Attribute::new(*member, Reference::to("xsd:string")));
    }
    model.add_entity(lib, name, EntityData::BusinessObject(bo))
}

#[test]
fn detail_with_empty_summary_generates_without_base() {
    let (mut model, lib, factory) = setup();
    let entity = add_business_object(&mut model, lib, "Order", &[], &["notes"]);

    let node = factory
        .transform_entity(&model, entity, &CodegenContext::new(TargetFormat::XsdTypes))
        .unwrap();

    // The empty summary generated no type and the detail has no base
    assert!(node.find_descendant("complexType", "Order_Summary").is_none());
    let detail = node.find_descendant("complexType", "Order_Detail").unwrap();
    assert!(!detail.attributes.contains_key("base"), "{detail:?}");
}

#[test]
fn detail_with_populated_summary_extends_it() {
    let (mut model, lib, factory) = setup();
    let entity = add_business_object(&mut model, lib, "Order", &["id"], &["notes"]);

    let node = factory
        .transform_entity(&model, entity, &CodegenContext::new(TargetFormat::XsdTypes))
        .unwrap();

    let detail = node.find_descendant("complexType", "Order_Detail").unwrap();
    assert_eq!(detail.attributes.get("base").map(String::as_str), Some("Order_Summary"));
}

#[test]
fn empty_ancestor_summary_is_skipped_in_favor_of_older_content() {
    let (mut model, lib, factory) = setup();
    let root = add_business_object(&mut model, lib, "Root", &["id"], &[]);
    let middle = add_business_object(&mut model, lib, "Middle", &[], &[]);
    let leaf = add_business_object(&mut model, lib, "Leaf", &["leafId"], &[]);
    model.assign_reference(FieldRef::Extension { entity: middle }, Some(root));
    model.assign_reference(FieldRef::Extension { entity: leaf }, Some(middle));

    let node = factory
        .transform_entity(&model, leaf, &CodegenContext::new(TargetFormat::XsdTypes))
        .unwrap();

    let summary = node.find_descendant("complexType", "Leaf_Summary").unwrap();
    assert_eq!(summary.attributes.get("base").map(String::as_str), Some("Root_Summary"));
}

#[test]
fn self_extending_object_generates_a_finite_tree() {
    let (mut model, lib, factory) = setup();
    let entity = add_business_object(&mut model, lib, "Recursive", &["id"], &["notes"]);
    model.assign_reference(FieldRef::Extension { entity }, Some(entity));

    // The chain walk's visited set keeps the delegate from looping
    let node = factory
        .transform_entity(&model, entity, &CodegenContext::new(TargetFormat::XsdTypes))
        .unwrap();
    let detail = node.find_descendant("complexType", "Recursive_Detail").unwrap();
    assert_eq!(
        detail.attributes.get("base").map(String::as_str),
        Some("Recursive_Summary")
    );
}

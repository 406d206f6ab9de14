//! Full pipeline over library documents: load, resolve, validate,
//! generate

use idl_codegen::{load_library_json, CodegenContext, TargetFormat, TransformerFactory};
use idl_model::Model;
use idl_resolve::resolve_model;
use idl_validation::{Severity, ValidationEngine};
use idl_version::SchemeRegistry;
use std::rc::Rc;

const COMMON: &str = r#"{
    "name": "common",
    "namespace": "http://example.org/common/v1",
    "prefix": "cmn",
    "version": "1.0.0",
    "members": [
        { "kind": "simple", "name": "Amount", "pattern": "[0-9]+\\.[0-9]{2}" }
    ]
}"#;

const ORDERS: &str = r#"{
    "name": "orders",
    "namespace": "http://example.org/orders/v1",
    "prefix": "ord",
    "version": "1.0.0",
    "imports": [
        { "prefix": "cmn", "namespace": "http://example.org/common/v1" }
    ],
    "members": [
        { "kind": "closedEnumeration", "name": "OrderStatus", "literals": ["OPEN", "SHIPPED"] },
        {
            "kind": "businessObject",
            "name": "Order",
            "id": { "attributes": [{ "name": "orderId", "type": "xsd:string", "mandatory": true }] },
            "summary": {
                "attributes": [{ "name": "status", "type": "OrderStatus" }],
                "elements": [{ "name": "total", "type": "cmn:Amount" }]
            },
            "detail": { "elements": [{ "name": "notes", "type": "xsd:string", "mandatory": false }] }
        },
        {
            "kind": "service",
            "name": "OrderService",
            "operations": [
                {
                    "name": "GetOrder",
                    "request": { "attributes": [{ "name": "orderId", "type": "xsd:string" }] },
                    "response": { "elements": [{ "name": "order", "type": "Order" }] }
                }
            ]
        }
    ]
}"#;

fn loaded() -> (Model, idl_model::LibraryId, idl_model::LibraryId) {
    let mut model = Model::new();
    let common = load_library_json(COMMON, &mut model).unwrap();
    let orders = load_library_json(ORDERS, &mut model).unwrap();
    let bound = resolve_model(&mut model, &SchemeRegistry::new());
    assert!(bound > 0);
    (model, common, orders)
}

#[test]
fn loaded_model_validates_clean() {
    let (model, _, _) = loaded();
    let engine = ValidationEngine::new(Rc::new(SchemeRegistry::new()));
    let findings = engine.validate_model(&model);
    // Built-in xsd: types are not library members and stay textual
    let unexpected: Vec<_> = findings
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .filter(|f| !f.params.iter().any(|p| p.starts_with("xsd:")))
        .collect();
    assert!(unexpected.is_empty(), "{unexpected:?}");
}

#[test]
fn cross_library_references_resolve_after_load() {
    let (model, common, orders) = loaded();
    let amount = model.find_member(common, "Amount").unwrap();
    let order = model.find_member(orders, "Order").unwrap();

    let field = idl_model::FieldRef::ElementType {
        facet: idl_model::FacetRef::Entity {
            entity: order,
            facet: idl_model::FacetType::Summary,
        },
        index: 0,
    };
    let reference = model.reference(&field).unwrap();
    assert_eq!(reference.resolved(), Some(amount));
    assert_eq!(reference.textual(), Some("cmn:Amount"));
}

#[test]
fn xsd_document_covers_type_members() {
    let (model, _, orders) = loaded();
    let factory = TransformerFactory::new(Rc::new(SchemeRegistry::new()));

    let doc = factory
        .transform_library(&model, orders, &CodegenContext::new(TargetFormat::XsdTypes))
        .unwrap();
    assert_eq!(doc.filename, "orders_1_0.xsd");
    assert!(doc.root.find_descendant("simpleType", "OrderStatus").is_some());
    assert!(doc.root.find_descendant("complexType", "Order_Summary").is_some());
    // The detail facet extends the populated summary
    let detail = doc.root.find_descendant("complexType", "Order_Detail").unwrap();
    assert_eq!(detail.attributes.get("base").map(String::as_str), Some("Order_Summary"));
}

#[test]
fn wsdl_document_carries_the_service_port() {
    let (model, _, orders) = loaded();
    let factory = TransformerFactory::new(Rc::new(SchemeRegistry::new()));

    let doc = factory
        .transform_library(
            &model,
            orders,
            &CodegenContext::service_trimmed(TargetFormat::WsdlPort),
        )
        .unwrap();
    assert_eq!(doc.filename, "OrderService_1.wsdl");
    let operation = doc.root.find_descendant("operation", "GetOrder").unwrap();
    assert!(operation.find_child("input").is_some());
    assert!(operation.find_child("output").is_some());
}

#[test]
fn json_schema_document_has_defs_per_member() {
    let (model, common, _) = loaded();
    let factory = TransformerFactory::new(Rc::new(SchemeRegistry::new()));

    let doc = factory
        .transform_library(&model, common, &CodegenContext::new(TargetFormat::JsonSchema))
        .unwrap();
    assert_eq!(doc.filename, "common_1_0.json");
    let defs = doc.root.find_child("$defs").unwrap();
    let amount = defs.find_descendant("def", "Amount").unwrap();
    assert_eq!(
        amount.attributes.get("pattern").map(String::as_str),
        Some("[0-9]+\\.[0-9]{2}")
    );
}

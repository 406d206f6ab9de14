//! JSON-schema generation transformers
//!
//! The library document is a schema with one `$defs` entry per member.
//! Scalar kinds map to string schemas with constraint attributes; the
//! facet-bearing kinds flatten their facets into one object definition.

use crate::artifact::ArtifactNode;
use crate::context::{TargetFormat, TransformContext};
use crate::factory::{ArtifactTransformer, LibraryTransformer, TransformerFactory};
use crate::Result;
use idl_model::{EntityData, EntityId, EntityKind, Facet, LibraryId, Model, Reference};
use idl_resolve::library_namespace;

const SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

pub(crate) fn register(factory: &mut TransformerFactory) {
    factory.register_library(TargetFormat::JsonSchema, Box::new(JsonLibraryTransformer));
    for kind in [
        EntityKind::Simple,
        EntityKind::ClosedEnumeration,
        EntityKind::OpenEnumeration,
        EntityKind::CoreObject,
        EntityKind::BusinessObject,
        EntityKind::ValueWithAttributes,
        EntityKind::ContextualFacet,
    ] {
        factory.register(kind, TargetFormat::JsonSchema, Box::new(JsonMemberTransformer));
    }
}

struct JsonLibraryTransformer;

impl LibraryTransformer for JsonLibraryTransformer {
    fn transform(
        &self,
        model: &Model,
        library: LibraryId,
        ctx: &mut TransformContext<'_>,
    ) -> Result<ArtifactNode> {
        let lib = model.library(library);
        let mut defs = ArtifactNode::new("$defs", &lib.name);
        for &member in model.library(library).members() {
            let entity = model.entity(member);
            if !ctx.covers(entity.kind()) || !ctx.codegen.includes(entity) {
                continue;
            }
            defs.push(ctx.dispatch(model, member)?);
        }
        Ok(ArtifactNode::new("schema", &lib.name)
            .attribute("$schema", SCHEMA_DIALECT)
            .attribute("$id", library_namespace(model, library, ctx.schemes))
            .child(defs))
    }
}

fn reference_attr(node: ArtifactNode, key: &str, reference: &Reference) -> ArtifactNode {
    match reference.textual() {
        Some(text) => node.attribute(key, text),
        None => node,
    }
}

fn object_def(name: &str, facets: &[&Facet]) -> ArtifactNode {
    let mut def = ArtifactNode::new("def", name).attribute("type", "object");
    for facet in facets {
        for attribute in &facet.attributes {
            let mut property = reference_attr(
                ArtifactNode::new("property", &attribute.name),
                "$ref",
                &attribute.type_ref,
            );
            if attribute.mandatory {
                property = property.attribute("required", "true");
            }
            def.push(property);
        }
        for element in &facet.elements {
            let mut property = reference_attr(
                ArtifactNode::new("property", &element.name),
                "$ref",
                &element.type_ref,
            );
            if element.repeat != 1 {
                property = property.attribute("type", "array");
            }
            if element.mandatory {
                property = property.attribute("required", "true");
            }
            def.push(property);
        }
        for indicator in &facet.indicators {
            def.push(ArtifactNode::new("property", &indicator.name).attribute("type", "boolean"));
        }
    }
    def
}

struct JsonMemberTransformer;

impl ArtifactTransformer for JsonMemberTransformer {
    fn transform(
        &self,
        model: &Model,
        source: EntityId,
        _ctx: &mut TransformContext<'_>,
    ) -> Result<ArtifactNode> {
        let entity = model.entity(source);
        let node = match &entity.data {
            EntityData::Simple(simple) => {
                let mut def = reference_attr(
                    ArtifactNode::new("def", entity.name()).attribute("type", "string"),
                    "$ref",
                    &simple.parent_type,
                );
                if let Some(pattern) = &simple.pattern {
                    def = def.attribute("pattern", pattern);
                }
                if let Some(min) = simple.min_length {
                    def = def.attribute("minLength", min.to_string());
                }
                if let Some(max) = simple.max_length {
                    def = def.attribute("maxLength", max.to_string());
                }
                def
            }
            EntityData::ClosedEnumeration(e) | EntityData::OpenEnumeration(e) => {
                let mut def = ArtifactNode::new("def", entity.name()).attribute("type", "string");
                for literal in &e.literals {
                    def.push(ArtifactNode::new("enum", &literal.literal));
                }
                def
            }
            EntityData::CoreObject(core) => {
                object_def(entity.name(), &[&core.summary, &core.detail])
            }
            EntityData::BusinessObject(bo) => {
                object_def(entity.name(), &[&bo.id, &bo.summary, &bo.detail])
            }
            EntityData::ValueWithAttributes(vwa) => object_def(entity.name(), &[&vwa.value]),
            EntityData::ContextualFacet(cf) => object_def(entity.name(), &[&cf.facet]),
            _ => ArtifactNode::new("def", entity.name()),
        };
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CodegenContext;
    use idl_model::{Attribute, BusinessObject, Library, Service, SimpleType};
    use idl_version::SchemeRegistry;
    use std::rc::Rc;

    fn factory() -> TransformerFactory {
        TransformerFactory::new(Rc::new(SchemeRegistry::new()))
    }

    #[test]
    fn test_defs_per_member_skipping_uncovered_kinds() {
        let mut model = Model::new();
        let lib = model.add_library(Library::new(
            "orders",
            "http://example.org/orders/v1",
            "ord",
            "1.0.0",
            "default",
        ));
        model.add_entity(
            lib,
            "OrderCode",
            EntityData::Simple(SimpleType {
                pattern: Some("[A-Z]+".to_string()),
                ..SimpleType::default()
            }),
        );
        let mut bo = BusinessObject::default();
        bo.summary.attributes.push(Attribute::new("code", Reference::to("OrderCode")));
        model.add_entity(lib, "Order", EntityData::BusinessObject(bo));
        model.add_entity(lib, "OrderService", EntityData::Service(Service::default()));

        let doc = factory()
            .transform_library(&model, lib, &CodegenContext::new(TargetFormat::JsonSchema))
            .unwrap();
        assert_eq!(doc.filename, "orders_1_0.json");
        assert_eq!(doc.root.attributes["$id"], "http://example.org/orders/v1");

        let defs = doc.root.find_child("$defs").unwrap();
        assert_eq!(defs.children.len(), 2);
        let order = defs.find_descendant("def", "Order").unwrap();
        assert_eq!(
            order.find_child("property").map(|p| p.attributes["$ref"].as_str()),
            Some("OrderCode")
        );
    }
}

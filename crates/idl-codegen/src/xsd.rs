//! XSD schema generation transformers
//!
//! Each transformer emits artifact nodes mirroring XSD structure:
//! `schema`, `simpleType`, `complexType`, `attribute`, `element`. Facet
//! types extend the base the delegate selects and close with their
//! extension point marker element.

use crate::artifact::ArtifactNode;
use crate::context::{TargetFormat, TransformContext};
use crate::delegate::{extension_point_name, facet_codegen_base, facet_type_name};
use crate::factory::{ArtifactTransformer, LibraryTransformer, TransformerFactory};
use crate::Result;
use idl_model::{
    EntityData, EntityId, EntityKind, Enumeration, Facet, FacetRef, FacetType, LibraryId, Model,
    Reference,
};
use idl_resolve::library_namespace;
use std::collections::HashSet;

pub(crate) fn register(factory: &mut TransformerFactory) {
    factory.register_library(TargetFormat::XsdTypes, Box::new(XsdLibraryTransformer));
    factory.register(EntityKind::Simple, TargetFormat::XsdTypes, Box::new(SimpleTransformer));
    factory.register(
        EntityKind::ClosedEnumeration,
        TargetFormat::XsdTypes,
        Box::new(EnumerationTransformer),
    );
    factory.register(
        EntityKind::OpenEnumeration,
        TargetFormat::XsdTypes,
        Box::new(EnumerationTransformer),
    );
    factory.register(
        EntityKind::ValueWithAttributes,
        TargetFormat::XsdTypes,
        Box::new(ValueWithAttributesTransformer),
    );
    factory.register(
        EntityKind::CoreObject,
        TargetFormat::XsdTypes,
        Box::new(FacetOwnerTransformer),
    );
    factory.register(
        EntityKind::BusinessObject,
        TargetFormat::XsdTypes,
        Box::new(FacetOwnerTransformer),
    );
    factory.register(
        EntityKind::ContextualFacet,
        TargetFormat::XsdTypes,
        Box::new(ContextualFacetTransformer),
    );
}

const FALLBACK_BASE: &str = "xsd:string";

fn type_name(reference: &Reference) -> String {
    reference.textual().unwrap_or(FALLBACK_BASE).to_string()
}

/// The complexType node for one facet, with its delegated base and
/// extension point
fn facet_node(model: &Model, facet_ref: FacetRef, facet: &Facet) -> ArtifactNode {
    let facet_type = match facet_ref {
        FacetRef::Entity { facet, .. } | FacetRef::Operation { facet, .. } => facet,
    };
    let mut node = ArtifactNode::new("complexType", facet_type_name(model, facet_ref));
    if let Some(base) = facet_codegen_base(model, facet_ref) {
        node = node.attribute("base", facet_type_name(model, base));
    }
    for attribute in &facet.attributes {
        let mut child =
            ArtifactNode::new("attribute", &attribute.name).attribute("type", type_name(&attribute.type_ref));
        if attribute.mandatory {
            child = child.attribute("use", "required");
        }
        node.push(child);
    }
    for element in &facet.elements {
        let mut child =
            ArtifactNode::new("element", &element.name).attribute("type", type_name(&element.type_ref));
        if !element.mandatory {
            child = child.attribute("minOccurs", "0");
        }
        if element.repeat != 1 {
            let max = if element.repeat == 0 {
                "unbounded".to_string()
            } else {
                element.repeat.to_string()
            };
            child = child.attribute("maxOccurs", max);
        }
        node.push(child);
    }
    for indicator in &facet.indicators {
        let kind = if indicator.publish_as_element {
            "element"
        } else {
            "attribute"
        };
        node.push(ArtifactNode::new(kind, &indicator.name).attribute("type", "xsd:boolean"));
    }
    node.push(ArtifactNode::new("element", extension_point_name(facet_type)));
    node
}

fn enumeration_node(name: &str, enumeration: &Enumeration, open: bool) -> ArtifactNode {
    let mut restriction = ArtifactNode::new("restriction", name).attribute("base", FALLBACK_BASE);
    for literal in &enumeration.literals {
        restriction.push(ArtifactNode::new("enumeration", &literal.literal));
    }
    if open {
        // Open enumerations accept values outside the declared set
        restriction.push(ArtifactNode::new("enumeration", "Other_"));
    }
    ArtifactNode::new("simpleType", name).child(restriction)
}

/// Entities reachable from the library's service through resolved
/// references
fn service_closure(model: &Model, library: LibraryId) -> HashSet<EntityId> {
    let mut keep = HashSet::new();
    let Some(service) = model.library(library).service() else {
        return keep;
    };
    let fields = model.reference_fields();
    let mut queue = vec![service];
    while let Some(entity) = queue.pop() {
        if !keep.insert(entity) {
            continue;
        }
        for field in &fields {
            if field.source_entity() != entity {
                continue;
            }
            if let Some(target) = model.reference(field).and_then(Reference::resolved) {
                queue.push(target);
            }
        }
    }
    keep
}

struct XsdLibraryTransformer;

impl LibraryTransformer for XsdLibraryTransformer {
    fn transform(
        &self,
        model: &Model,
        library: LibraryId,
        ctx: &mut TransformContext<'_>,
    ) -> Result<ArtifactNode> {
        let lib = model.library(library);
        let mut root = ArtifactNode::new("schema", &lib.name)
            .attribute("targetNamespace", library_namespace(model, library, ctx.schemes))
            .attribute("prefix", &lib.prefix);
        for import in &lib.imports {
            root.push(
                ArtifactNode::new("import", &import.prefix)
                    .attribute("namespace", &import.namespace),
            );
        }

        let trimmed = ctx
            .codegen
            .trim_to_service
            .then(|| service_closure(model, library));
        for &member in model.library(library).members() {
            let entity = model.entity(member);
            // Services generate WSDL documents; resources have no schema
            // artifact
            if matches!(entity.kind(), EntityKind::Service | EntityKind::Resource) {
                continue;
            }
            if !ctx.codegen.includes(entity) {
                continue;
            }
            if trimmed.as_ref().is_some_and(|keep| !keep.contains(&member)) {
                continue;
            }
            root.push(ctx.dispatch(model, member)?);
        }
        Ok(root)
    }
}

struct SimpleTransformer;

impl ArtifactTransformer for SimpleTransformer {
    fn transform(
        &self,
        model: &Model,
        source: EntityId,
        _ctx: &mut TransformContext<'_>,
    ) -> Result<ArtifactNode> {
        let entity = model.entity(source);
        let EntityData::Simple(simple) = &entity.data else {
            return Ok(ArtifactNode::new("simpleType", entity.name()));
        };
        let mut restriction = ArtifactNode::new("restriction", entity.name())
            .attribute("base", type_name(&simple.parent_type));
        if let Some(pattern) = &simple.pattern {
            restriction.push(ArtifactNode::new("pattern", entity.name()).value(pattern.clone()));
        }
        if let Some(min) = simple.min_length {
            restriction.push(ArtifactNode::new("minLength", entity.name()).value(min.to_string()));
        }
        if let Some(max) = simple.max_length {
            restriction.push(ArtifactNode::new("maxLength", entity.name()).value(max.to_string()));
        }
        Ok(ArtifactNode::new("simpleType", entity.name()).child(restriction))
    }
}

struct EnumerationTransformer;

impl ArtifactTransformer for EnumerationTransformer {
    fn transform(
        &self,
        model: &Model,
        source: EntityId,
        _ctx: &mut TransformContext<'_>,
    ) -> Result<ArtifactNode> {
        let entity = model.entity(source);
        let (enumeration, open) = match &entity.data {
            EntityData::ClosedEnumeration(e) => (e, false),
            EntityData::OpenEnumeration(e) => (e, true),
            _ => return Ok(ArtifactNode::new("simpleType", entity.name())),
        };
        Ok(enumeration_node(entity.name(), enumeration, open))
    }
}

struct ValueWithAttributesTransformer;

impl ArtifactTransformer for ValueWithAttributesTransformer {
    fn transform(
        &self,
        model: &Model,
        source: EntityId,
        _ctx: &mut TransformContext<'_>,
    ) -> Result<ArtifactNode> {
        let entity = model.entity(source);
        let EntityData::ValueWithAttributes(vwa) = &entity.data else {
            return Ok(ArtifactNode::new("complexType", entity.name()));
        };
        let mut extension = ArtifactNode::new("extension", entity.name())
            .attribute("base", type_name(&vwa.parent_type));
        for attribute in &vwa.value.attributes {
            extension.push(
                ArtifactNode::new("attribute", &attribute.name)
                    .attribute("type", type_name(&attribute.type_ref)),
            );
        }
        for indicator in &vwa.value.indicators {
            extension.push(
                ArtifactNode::new("attribute", &indicator.name).attribute("type", "xsd:boolean"),
            );
        }
        Ok(ArtifactNode::new("complexType", entity.name())
            .child(ArtifactNode::new("simpleContent", entity.name()).child(extension)))
    }
}

/// Shared transformer for the facet-bearing object kinds
///
/// Emits one complexType per facet that declares local content; empty
/// facets generate nothing, which is what lets the delegate skip them.
struct FacetOwnerTransformer;

impl FacetOwnerTransformer {
    const FACETS: [FacetType; 3] = [FacetType::Id, FacetType::Summary, FacetType::Detail];
}

impl ArtifactTransformer for FacetOwnerTransformer {
    fn transform(
        &self,
        model: &Model,
        source: EntityId,
        _ctx: &mut TransformContext<'_>,
    ) -> Result<ArtifactNode> {
        let mut group = ArtifactNode::new("typeGroup", model.entity(source).name());
        for facet_type in Self::FACETS {
            let facet_ref = FacetRef::Entity {
                entity: source,
                facet: facet_type,
            };
            let Some(facet) = model.facet(facet_ref) else {
                continue;
            };
            if !facet.has_local_content() {
                continue;
            }
            group.push(facet_node(model, facet_ref, facet));
        }
        Ok(group)
    }
}

struct ContextualFacetTransformer;

impl ArtifactTransformer for ContextualFacetTransformer {
    fn transform(
        &self,
        model: &Model,
        source: EntityId,
        _ctx: &mut TransformContext<'_>,
    ) -> Result<ArtifactNode> {
        let entity = model.entity(source);
        let EntityData::ContextualFacet(cf) = &entity.data else {
            return Ok(ArtifactNode::new("complexType", entity.name()));
        };
        let facet_ref = FacetRef::Entity {
            entity: source,
            facet: cf.facet_type,
        };
        let mut node = facet_node(model, facet_ref, &cf.facet);
        node.attributes.insert("context".to_string(), cf.context.clone());
        if let Some(owner) = cf.owner.textual() {
            node.attributes.insert("owner".to_string(), owner.to_string());
        }
        Ok(node)
    }
}

//! WSDL port-type generation transformers

use crate::artifact::ArtifactNode;
use crate::context::{TargetFormat, TransformContext};
use crate::factory::{ArtifactTransformer, LibraryTransformer, TransformerFactory};
use crate::{Error, Result};
use idl_model::{EntityData, EntityId, EntityKind, Facet, LibraryId, Model, Operation};
use idl_resolve::library_namespace;

pub(crate) fn register(factory: &mut TransformerFactory) {
    factory.register_library(TargetFormat::WsdlPort, Box::new(WsdlLibraryTransformer));
    factory.register(
        EntityKind::Service,
        TargetFormat::WsdlPort,
        Box::new(ServiceTransformer),
    );
}

struct WsdlLibraryTransformer;

impl LibraryTransformer for WsdlLibraryTransformer {
    fn transform(
        &self,
        model: &Model,
        library: LibraryId,
        ctx: &mut TransformContext<'_>,
    ) -> Result<ArtifactNode> {
        let lib = model.library(library);
        let Some(service) = lib.service() else {
            return Err(Error::MissingService(lib.name.clone()));
        };
        let mut root = ArtifactNode::new("definitions", &lib.name)
            .attribute("targetNamespace", library_namespace(model, library, ctx.schemes));
        root.push(ctx.dispatch(model, service)?);
        Ok(root)
    }
}

/// The message node for one operation facet, if the facet carries payload
fn message_node(service: &str, operation: &Operation, role: &str, facet: &Facet) -> Option<ArtifactNode> {
    if !facet.has_local_content() && !operation.extension.is_set() {
        return None;
    }
    Some(
        ArtifactNode::new(role, &operation.name)
            .attribute("message", format!("{service}_{}{role}", operation.name)),
    )
}

struct ServiceTransformer;

impl ArtifactTransformer for ServiceTransformer {
    fn transform(
        &self,
        model: &Model,
        source: EntityId,
        _ctx: &mut TransformContext<'_>,
    ) -> Result<ArtifactNode> {
        let entity = model.entity(source);
        let EntityData::Service(service) = &entity.data else {
            return Ok(ArtifactNode::new("portType", entity.name()));
        };
        let mut port = ArtifactNode::new("portType", entity.name());
        for operation in &service.operations {
            let mut node = ArtifactNode::new("operation", &operation.name);
            if let Some(extended) = operation.extension.textual() {
                node = node.attribute("extends", extended);
            }
            for (role, facet) in [
                ("input", &operation.request),
                ("output", &operation.response),
                ("notification", &operation.notification),
            ] {
                if let Some(message) = message_node(entity.name(), operation, role, facet) {
                    node.push(message);
                }
            }
            port.push(node);
        }
        Ok(port)
    }
}

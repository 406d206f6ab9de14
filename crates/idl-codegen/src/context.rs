//! Generation context, filename policies, and per-traversal state

use crate::artifact::ArtifactNode;
use crate::factory::TransformerFactory;
use crate::Result;
use idl_model::{Entity, EntityId, LibraryId, Model};
use idl_version::{parse_identifier, SchemeRegistry};
use std::collections::HashSet;
use tracing::trace;

/// The target grammar an artifact tree is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetFormat {
    /// XSD schema document carrying the library's type declarations
    XsdTypes,
    /// WSDL port-type document for the library's service
    WsdlPort,
    /// JSON-schema document with one `$defs` entry per member
    JsonSchema,
}

impl TargetFormat {
    pub fn extension(self) -> &'static str {
        match self {
            TargetFormat::XsdTypes => "xsd",
            TargetFormat::WsdlPort => "wsdl",
            TargetFormat::JsonSchema => "json",
        }
    }
}

/// Policy producing the output filename for a generated document
pub trait FilenameBuilder {
    fn filename(&self, model: &Model, library: LibraryId, format: TargetFormat) -> String;
}

/// `{name}_{major}_{minor}[_{patch}].{ext}`, with a zero patch elided
///
/// A library whose version identifier does not parse falls back to the
/// bare library name (the validator reports the identifier).
pub struct LibraryFilenameBuilder;

impl FilenameBuilder for LibraryFilenameBuilder {
    fn filename(&self, model: &Model, library: LibraryId, format: TargetFormat) -> String {
        let lib = model.library(library);
        let ext = format.extension();
        match parse_identifier(&lib.version) {
            Ok(v) if v.patch != 0 => {
                format!("{}_{}_{}_{}.{ext}", lib.name, v.major, v.minor, v.patch)
            }
            Ok(v) => format!("{}_{}_{}.{ext}", lib.name, v.major, v.minor),
            Err(_) => format!("{}.{ext}", lib.name),
        }
    }
}

/// `{service}_{major}.{ext}` for service-trimmed output
///
/// Falls back to the library policy when the library declares no service.
pub struct ServiceFilenameBuilder;

impl FilenameBuilder for ServiceFilenameBuilder {
    fn filename(&self, model: &Model, library: LibraryId, format: TargetFormat) -> String {
        let lib = model.library(library);
        let Some(service) = lib.service() else {
            return LibraryFilenameBuilder.filename(model, library, format);
        };
        let major = parse_identifier(&lib.version).map_or(0, |v| v.major);
        format!(
            "{}_{major}.{}",
            model.entity(service).name(),
            format.extension()
        )
    }
}

/// Caller-facing generation options
pub struct CodegenContext {
    pub target: TargetFormat,
    /// Optional member filter; entities rejected by it are left out of
    /// library-level documents
    pub filter: Option<Box<dyn Fn(&Entity) -> bool>>,
    pub filename_builder: Box<dyn FilenameBuilder>,
    /// Restrict library output to entities reachable from the service
    pub trim_to_service: bool,
}

impl CodegenContext {
    pub fn new(target: TargetFormat) -> Self {
        Self {
            target,
            filter: None,
            filename_builder: Box::new(LibraryFilenameBuilder),
            trim_to_service: false,
        }
    }

    /// A context producing service-trimmed output with service-derived
    /// filenames
    pub fn service_trimmed(target: TargetFormat) -> Self {
        Self {
            target,
            filter: None,
            filename_builder: Box::new(ServiceFilenameBuilder),
            trim_to_service: true,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Box<dyn Fn(&Entity) -> bool>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// True when the entity passes the member filter
    pub fn includes(&self, entity: &Entity) -> bool {
        self.filter.as_ref().is_none_or(|f| f(entity))
    }
}

/// Per-traversal transformer state: recursive dispatch plus a visited set
/// guarding self-referential structures
pub struct TransformContext<'a> {
    factory: &'a TransformerFactory,
    pub codegen: &'a CodegenContext,
    pub schemes: &'a SchemeRegistry,
    visited: HashSet<EntityId>,
}

impl<'a> TransformContext<'a> {
    pub(crate) fn new(
        factory: &'a TransformerFactory,
        codegen: &'a CodegenContext,
        schemes: &'a SchemeRegistry,
    ) -> Self {
        Self {
            factory,
            codegen,
            schemes,
            visited: HashSet::new(),
        }
    }

    /// True when the factory covers the kind for the active target format
    pub fn covers(&self, kind: idl_model::EntityKind) -> bool {
        self.factory.covers(kind, self.codegen.target)
    }

    /// Dispatch a nested entity through the factory
    ///
    /// An entity already on the current traversal path collapses to a
    /// `typeReference` leaf instead of recursing, so circular structures
    /// generate finite trees.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoTransformer`] when no transformer covers
    /// the entity's kind for the active target format.
    pub fn dispatch(&mut self, model: &Model, entity: EntityId) -> Result<ArtifactNode> {
        if !self.visited.insert(entity) {
            trace!(name = model.entity(entity).name(), "cycle collapsed to reference leaf");
            return Ok(ArtifactNode::new("typeReference", model.entity(entity).name()));
        }
        let transformer = self
            .factory
            .transformer(model.entity(entity).kind(), self.codegen.target)?;
        let node = transformer.transform(model, entity, self);
        self.visited.remove(&entity);
        node
    }
}

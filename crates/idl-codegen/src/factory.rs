//! The transformer registry and dispatch

use crate::artifact::{ArtifactDocument, ArtifactNode};
use crate::context::{CodegenContext, TargetFormat, TransformContext};
use crate::{jsonschema, wsdl, xsd, Error, Result};
use idl_model::{EntityId, EntityKind, LibraryId, Model};
use idl_version::SchemeRegistry;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// A generation-direction transformer for one (entity kind, format) pair
pub trait ArtifactTransformer {
    /// Produce the artifact subtree for one entity
    ///
    /// # Errors
    ///
    /// Propagates [`Error::NoTransformer`] from nested dispatch.
    fn transform(
        &self,
        model: &Model,
        source: EntityId,
        ctx: &mut TransformContext<'_>,
    ) -> Result<ArtifactNode>;
}

/// A transformer producing the document root for a whole library
pub trait LibraryTransformer {
    /// Produce the document root node for a library
    ///
    /// # Errors
    ///
    /// Propagates nested dispatch failures; the WSDL transformer returns
    /// [`Error::MissingService`] for a library without a service.
    fn transform(
        &self,
        model: &Model,
        library: LibraryId,
        ctx: &mut TransformContext<'_>,
    ) -> Result<ArtifactNode>;
}

/// Registry of generation transformers keyed by (source kind, target
/// format)
pub struct TransformerFactory {
    schemes: Rc<SchemeRegistry>,
    transformers: HashMap<(EntityKind, TargetFormat), Box<dyn ArtifactTransformer>>,
    library_transformers: HashMap<TargetFormat, Box<dyn LibraryTransformer>>,
}

impl TransformerFactory {
    /// A factory with the built-in transformer set registered
    pub fn new(schemes: Rc<SchemeRegistry>) -> Self {
        let mut factory = Self {
            schemes,
            transformers: HashMap::new(),
            library_transformers: HashMap::new(),
        };
        xsd::register(&mut factory);
        wsdl::register(&mut factory);
        jsonschema::register(&mut factory);
        factory
    }

    /// Register (or replace) a transformer for a (kind, format) pair
    pub fn register(
        &mut self,
        kind: EntityKind,
        format: TargetFormat,
        transformer: Box<dyn ArtifactTransformer>,
    ) {
        self.transformers.insert((kind, format), transformer);
    }

    /// Register (or replace) the library-level transformer for a format
    pub fn register_library(
        &mut self,
        format: TargetFormat,
        transformer: Box<dyn LibraryTransformer>,
    ) {
        self.library_transformers.insert(format, transformer);
    }

    /// True when a transformer covers the (kind, format) pair
    pub fn covers(&self, kind: EntityKind, format: TargetFormat) -> bool {
        self.transformers.contains_key(&(kind, format))
    }

    /// Look up the transformer for a (kind, format) pair
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoTransformer`] for an uncovered pair.
    pub fn transformer(
        &self,
        kind: EntityKind,
        format: TargetFormat,
    ) -> Result<&dyn ArtifactTransformer> {
        self.transformers
            .get(&(kind, format))
            .map(Box::as_ref)
            .ok_or(Error::NoTransformer { kind, format })
    }

    /// Generate the artifact subtree for a single entity
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoTransformer`] when the entity's kind is not
    /// covered for the requested format.
    pub fn transform_entity(
        &self,
        model: &Model,
        entity: EntityId,
        codegen: &CodegenContext,
    ) -> Result<ArtifactNode> {
        let mut ctx = TransformContext::new(self, codegen, &self.schemes);
        ctx.dispatch(model, entity)
    }

    /// Generate the full document for a library
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoTransformer`] when the target format has no
    /// library transformer, and propagates nested dispatch failures.
    pub fn transform_library(
        &self,
        model: &Model,
        library: LibraryId,
        codegen: &CodegenContext,
    ) -> Result<ArtifactDocument> {
        let transformer =
            self.library_transformers
                .get(&codegen.target)
                .ok_or(Error::NoTransformer {
                    kind: EntityKind::Service,
                    format: codegen.target,
                })?;
        let mut ctx = TransformContext::new(self, codegen, &self.schemes);
        let root = transformer.transform(model, library, &mut ctx)?;
        let filename = codegen
            .filename_builder
            .filename(model, library, codegen.target);
        debug!(
            library = %model.library(library).name,
            %filename,
            "library document generated"
        );
        Ok(ArtifactDocument { filename, root })
    }
}

#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # idl-codegen
//!
//! Transformer dispatch framework for the semantic model.
//!
//! Transformation runs in two directions. The load direction
//! deserializes library documents into model entities, leaving every
//! cross-entity reference textual for a later resolution pass. The
//! generation direction dispatches (entity kind, target format) pairs
//! through a [`TransformerFactory`] to produce format-neutral
//! [`ArtifactNode`] trees; serializing those trees into concrete XSD,
//! WSDL, or JSON-schema text is the caller's concern.

/// Format-neutral artifact trees produced by code generation.
pub mod artifact;
/// Generation context, filename policies, and the per-traversal state.
pub mod context;
/// Facet inheritance delegation for generated type bases.
pub mod delegate;
/// The transformer registry and dispatch.
pub mod factory;
/// JSON-schema generation transformers.
pub mod jsonschema;
/// Library document loading (parse tree into model entities).
pub mod load;
/// WSDL port-type generation transformers.
pub mod wsdl;
/// XSD schema generation transformers.
pub mod xsd;

pub use artifact::{ArtifactDocument, ArtifactNode};
pub use context::{
    CodegenContext, FilenameBuilder, LibraryFilenameBuilder, ServiceFilenameBuilder, TargetFormat,
    TransformContext,
};
pub use delegate::{extension_point_name, facet_codegen_base};
pub use factory::{ArtifactTransformer, LibraryTransformer, TransformerFactory};
pub use load::{load_library, load_library_json, ParseLibrary};

use idl_model::EntityKind;
use thiserror::Error;

/// Errors that can occur while loading documents or generating artifacts
#[derive(Error, Debug)]
pub enum Error {
    #[error("No transformer registered for {kind:?} -> {format:?}")]
    NoTransformer {
        kind: EntityKind,
        format: context::TargetFormat,
    },

    #[error("Library {0} declares no service")]
    MissingService(String),

    #[error("Malformed library document")]
    Load(#[from] serde_json::Error),

    #[error("Invalid library document {library}: {reason}")]
    Document { library: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

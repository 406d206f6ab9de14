#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # idl-model
//!
//! In-memory semantic model for schema libraries.
//!
//! The model is an arena of named entities owned by libraries. All
//! cross-entity edges (type assignments, extensions, payload references)
//! are non-owning [`EntityId`] lookups into the arena, so forward and
//! circular references are representable without lifetime hazards.
//! Every reference-bearing field is dual-represented by a [`Reference`]
//! that carries both the resolved entity id and the textual name it was
//! declared with; structural mutations broadcast [`ModelEvent`]s
//! synchronously to registered listeners.

/// Mutation events, listener trait, and subscription handling.
pub mod event;
/// Entity variants, facets, members, and the dual-representation reference.
pub mod entity;
/// Library container: namespace, version, imports, and member ownership.
pub mod library;
/// The model arena, factory operations, and event-firing mutators.
pub mod model;

pub use entity::{
    Action, ActionFacet, ActionRequest, ActionResponse, Attribute, BusinessObject,
    ContextualFacet, CoreObject, Element, Entity, EntityData, EntityKind, EnumLiteral,
    Enumeration, Equivalent, Facet, FacetRef, FacetType, FieldRef, Indicator, Operation,
    ParamGroup, Reference, Resource, Service, SimpleType, ValueWithAttributes,
};
pub use event::{EventKind, EventValue, ListenerToken, ModelEvent, ModelListener};
pub use library::{Include, Library, LibraryContext, LibraryStatus, NamespaceImport};
pub use model::Model;

/// Index of a library in the model arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LibraryId(pub u32);

/// Index of a named entity in the model arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

//! Named entities, facets, and structural members

use crate::event::EventKind;
use crate::{EntityId, LibraryId};

/// The dual live-pointer/textual-name representation of a cross-entity
/// reference
///
/// The two halves are kept consistent by the integrity maintainer: every
/// event-firing reassignment of the resolved half is followed by a
/// recomputed textual companion. Neither half is publicly writable, so the
/// representation cannot drift outside the model's mutation protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reference {
    pub(crate) resolved: Option<EntityId>,
    pub(crate) textual: Option<String>,
}

impl Reference {
    /// An absent reference
    pub fn none() -> Self {
        Self::default()
    }

    /// A textual-only reference awaiting resolution
    pub fn to(name: impl Into<String>) -> Self {
        Self {
            resolved: None,
            textual: Some(name.into()),
        }
    }

    /// The resolved entity, if resolution has happened
    pub fn resolved(&self) -> Option<EntityId> {
        self.resolved
    }

    /// The textual form of the reference, if one is recorded
    pub fn textual(&self) -> Option<&str> {
        self.textual.as_deref()
    }

    /// True when either half of the reference is present
    pub fn is_set(&self) -> bool {
        self.resolved.is_some() || self.textual.is_some()
    }
}

/// Kinds of facets attached to entities and operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetType {
    Id,
    Summary,
    Detail,
    /// The value facet of a value-with-attributes type
    Shared,
    Custom,
    Query,
    Request,
    Response,
    Notification,
}

/// A named grouping of attributes, elements, and indicators
#[derive(Debug, Clone, Default)]
pub struct Facet {
    /// Optional single base-type extension of this facet
    pub base_type: Reference,
    pub attributes: Vec<Attribute>,
    pub elements: Vec<Element>,
    pub indicators: Vec<Indicator>,
}

impl Facet {
    /// An empty facet
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the facet declares members of its own
    ///
    /// Empty facets are skipped when selecting code-generation inheritance
    /// bases.
    pub fn has_local_content(&self) -> bool {
        !self.attributes.is_empty() || !self.elements.is_empty() || !self.indicators.is_empty()
    }

    /// Local member names in declaration order (attributes, then elements,
    /// then indicators)
    pub fn member_names(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .map(|a| a.name.as_str())
            .chain(self.elements.iter().map(|e| e.name.as_str()))
            .chain(self.indicators.iter().map(|i| i.name.as_str()))
            .collect()
    }
}

/// A scalar member of a facet or value-with-attributes type
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    pub type_ref: Reference,
    pub mandatory: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>, type_ref: Reference) -> Self {
        Self {
            name: name.into(),
            type_ref,
            mandatory: false,
        }
    }
}

/// A structural (property) member of a facet
#[derive(Debug, Clone)]
pub struct Element {
    pub name: String,
    pub type_ref: Reference,
    pub mandatory: bool,
    /// Maximum repeat count; 0 means unbounded
    pub repeat: u32,
}

impl Element {
    pub fn new(name: impl Into<String>, type_ref: Reference) -> Self {
        Self {
            name: name.into(),
            type_ref,
            mandatory: false,
            repeat: 1,
        }
    }
}

/// A boolean flag member of a facet
#[derive(Debug, Clone)]
pub struct Indicator {
    pub name: String,
    pub publish_as_element: bool,
}

impl Indicator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            publish_as_element: false,
        }
    }
}

/// A restriction of another scalar type
#[derive(Debug, Clone, Default)]
pub struct SimpleType {
    pub parent_type: Reference,
    pub pattern: Option<String>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

/// A single literal of an enumeration
#[derive(Debug, Clone)]
pub struct EnumLiteral {
    pub literal: String,
    pub description: Option<String>,
}

/// An open or closed enumeration (openness is carried by the entity kind)
#[derive(Debug, Clone, Default)]
pub struct Enumeration {
    pub literals: Vec<EnumLiteral>,
}

/// A core object with summary/detail facets and role literals
#[derive(Debug, Clone, Default)]
pub struct CoreObject {
    pub extension: Reference,
    pub summary: Facet,
    pub detail: Facet,
    pub roles: Vec<String>,
}

/// A business object with id/summary/detail facets
#[derive(Debug, Clone, Default)]
pub struct BusinessObject {
    pub extension: Reference,
    pub id: Facet,
    pub summary: Facet,
    pub detail: Facet,
}

/// A scalar value carrying attributes and indicators
#[derive(Debug, Clone, Default)]
pub struct ValueWithAttributes {
    pub parent_type: Reference,
    pub value: Facet,
}

/// A library-level facet declared outside its owning entity
#[derive(Debug, Clone)]
pub struct ContextualFacet {
    /// The entity this facet contributes to
    pub owner: Reference,
    /// `Custom` or `Query`
    pub facet_type: FacetType,
    pub context: String,
    pub label: Option<String>,
    pub facet: Facet,
}

/// A named parameter group of a resource
#[derive(Debug, Clone)]
pub struct ParamGroup {
    pub name: String,
    pub id_group: bool,
}

/// An action facet contributing payload structure to a resource's actions
#[derive(Debug, Clone)]
pub struct ActionFacet {
    pub name: String,
    pub base_payload: Reference,
}

/// The request side of a resource action
#[derive(Debug, Clone, Default)]
pub struct ActionRequest {
    pub payload_type: Reference,
    /// Index of the assigned param group within the owning resource
    pub param_group: Option<usize>,
    /// Textual companion of the assigned param group (a plain name, not a
    /// named-entity reference)
    pub param_group_name: Option<String>,
}

/// The response side of a resource action
#[derive(Debug, Clone, Default)]
pub struct ActionResponse {
    pub payload_type: Reference,
}

/// A single action of a resource
#[derive(Debug, Clone)]
pub struct Action {
    pub name: String,
    pub request: ActionRequest,
    pub response: ActionResponse,
}

impl Action {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            request: ActionRequest::default(),
            response: ActionResponse::default(),
        }
    }
}

/// A REST-style resource bound to a business object
#[derive(Debug, Clone, Default)]
pub struct Resource {
    pub business_object: Reference,
    pub parent_resource: Reference,
    pub param_groups: Vec<ParamGroup>,
    pub action_facets: Vec<ActionFacet>,
    pub actions: Vec<Action>,
}

/// A per-context alternate description
#[derive(Debug, Clone)]
pub struct Equivalent {
    pub context: String,
    pub description: String,
}

/// An operation of a service
#[derive(Debug, Clone)]
pub struct Operation {
    pub name: String,
    pub extension: Reference,
    pub request: Facet,
    pub response: Facet,
    pub notification: Facet,
    pub equivalents: Vec<Equivalent>,
}

impl Operation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extension: Reference::none(),
            request: Facet::new(),
            response: Facet::new(),
            notification: Facet::new(),
            equivalents: Vec::new(),
        }
    }
}

/// A library's service: an ordered sequence of operations
#[derive(Debug, Clone, Default)]
pub struct Service {
    pub operations: Vec<Operation>,
}

/// The tagged-variant payload of a named entity
#[derive(Debug, Clone)]
pub enum EntityData {
    Simple(SimpleType),
    ClosedEnumeration(Enumeration),
    OpenEnumeration(Enumeration),
    CoreObject(CoreObject),
    BusinessObject(BusinessObject),
    ValueWithAttributes(ValueWithAttributes),
    ContextualFacet(ContextualFacet),
    Resource(Resource),
    Service(Service),
}

/// Runtime kind of an entity, used as the dispatch key for validators and
/// transformers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Simple,
    ClosedEnumeration,
    OpenEnumeration,
    CoreObject,
    BusinessObject,
    ValueWithAttributes,
    ContextualFacet,
    Resource,
    Service,
}

impl EntityData {
    /// The runtime kind of this payload
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityData::Simple(_) => EntityKind::Simple,
            EntityData::ClosedEnumeration(_) => EntityKind::ClosedEnumeration,
            EntityData::OpenEnumeration(_) => EntityKind::OpenEnumeration,
            EntityData::CoreObject(_) => EntityKind::CoreObject,
            EntityData::BusinessObject(_) => EntityKind::BusinessObject,
            EntityData::ValueWithAttributes(_) => EntityKind::ValueWithAttributes,
            EntityData::ContextualFacet(_) => EntityKind::ContextualFacet,
            EntityData::Resource(_) => EntityKind::Resource,
            EntityData::Service(_) => EntityKind::Service,
        }
    }
}

/// A library member addressable by (namespace, local name)
///
/// The owning library is set at creation and never changes.
#[derive(Debug, Clone)]
pub struct Entity {
    pub(crate) id: EntityId,
    pub(crate) library: LibraryId,
    pub(crate) name: String,
    pub(crate) documentation: Option<String>,
    pub data: EntityData,
}

impl Entity {
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The immutable owning-library link
    pub fn library(&self) -> LibraryId {
        self.library
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    pub fn kind(&self) -> EntityKind {
        self.data.kind()
    }
}

/// Location of a facet within the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetRef {
    /// A facet owned directly by an entity
    Entity { entity: EntityId, facet: FacetType },
    /// A facet owned by an operation of a service
    Operation {
        service: EntityId,
        op: usize,
        facet: FacetType,
    },
}

impl FacetRef {
    /// The entity that owns the facet (the service, for operation facets)
    pub fn owner(&self) -> EntityId {
        match *self {
            FacetRef::Entity { entity, .. } => entity,
            FacetRef::Operation { service, .. } => service,
        }
    }
}

/// The closed set of reference-bearing fields in the model
///
/// Integrity maintenance dispatches on this enum with a flat match: the
/// field kinds are closed by design, so the mapping from "field that
/// changed" to "how its textual companion is re-derived" stays in one
/// place instead of hiding behind polymorphism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRef {
    SimpleParentType { entity: EntityId },
    VwaParentType { entity: EntityId },
    AttributeType { facet: FacetRef, index: usize },
    ElementType { facet: FacetRef, index: usize },
    Extension { entity: EntityId },
    FacetBaseType { facet: FacetRef },
    ContextualFacetOwner { entity: EntityId },
    ResourceBusinessObject { entity: EntityId },
    ParentResource { entity: EntityId },
    ActionBasePayload { entity: EntityId, action_facet: usize },
    ActionRequestPayload { entity: EntityId, action: usize },
    ActionResponsePayload { entity: EntityId, action: usize },
    /// The narrower non-named-entity case: the textual companion is a
    /// param group's plain name, not a [`Reference`]
    ActionRequestParamGroup { entity: EntityId, action: usize },
    OperationExtension { service: EntityId, op: usize },
}

impl FieldRef {
    /// The entity whose field this is (the broadcast source of mutation
    /// events)
    pub fn source_entity(&self) -> EntityId {
        match *self {
            FieldRef::SimpleParentType { entity }
            | FieldRef::VwaParentType { entity }
            | FieldRef::Extension { entity }
            | FieldRef::ContextualFacetOwner { entity }
            | FieldRef::ResourceBusinessObject { entity }
            | FieldRef::ParentResource { entity }
            | FieldRef::ActionBasePayload { entity, .. }
            | FieldRef::ActionRequestPayload { entity, .. }
            | FieldRef::ActionResponsePayload { entity, .. }
            | FieldRef::ActionRequestParamGroup { entity, .. } => entity,
            FieldRef::AttributeType { facet, .. }
            | FieldRef::ElementType { facet, .. }
            | FieldRef::FacetBaseType { facet } => facet.owner(),
            FieldRef::OperationExtension { service, .. } => service,
        }
    }

    /// The event kind fired when this field is reassigned
    pub fn event_kind(&self) -> EventKind {
        match self {
            FieldRef::SimpleParentType { .. }
            | FieldRef::VwaParentType { .. }
            | FieldRef::AttributeType { .. }
            | FieldRef::ElementType { .. } => EventKind::TypeAssignmentModified,
            FieldRef::Extension { .. } | FieldRef::OperationExtension { .. } => {
                EventKind::ExtensionModified
            }
            FieldRef::FacetBaseType { .. } => EventKind::FacetBaseModified,
            FieldRef::ContextualFacetOwner { .. } => EventKind::FacetOwnerModified,
            FieldRef::ResourceBusinessObject { .. } => EventKind::BusinessObjectRefModified,
            FieldRef::ParentResource { .. } => EventKind::ParentResourceModified,
            FieldRef::ActionBasePayload { .. } => EventKind::BasePayloadModified,
            FieldRef::ActionRequestPayload { .. } | FieldRef::ActionResponsePayload { .. } => {
                EventKind::PayloadTypeModified
            }
            FieldRef::ActionRequestParamGroup { .. } => EventKind::ParamGroupModified,
        }
    }
}

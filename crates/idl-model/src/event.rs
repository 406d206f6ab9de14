//! Synchronous mutation events and listener subscriptions

use crate::entity::{EntityKind, FieldRef};
use crate::model::Model;
use crate::EntityId;
use std::collections::HashSet;
use std::rc::Rc;

/// Kinds of model mutation events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A type assignment (attribute/element/simple parent/VWA parent)
    /// changed
    TypeAssignmentModified,
    /// An entity or operation extension edge changed
    ExtensionModified,
    /// A facet's base-type reference changed
    FacetBaseModified,
    /// A contextual facet's owning entity changed
    FacetOwnerModified,
    /// A resource's business-object reference changed
    BusinessObjectRefModified,
    /// A resource's parent-resource reference changed
    ParentResourceModified,
    /// An action facet's base payload changed
    BasePayloadModified,
    /// An action request/response payload type changed
    PayloadTypeModified,
    /// An action request's param group changed (a plain name, not a
    /// named-entity reference)
    ParamGroupModified,
    MemberAdded,
    MemberRemoved,
    DocumentationModified,
}

/// Old/new value carried by an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValue {
    Entity(EntityId),
    Name(String),
    None,
}

impl EventValue {
    /// Wrap an optional entity id
    pub fn entity(id: Option<EntityId>) -> Self {
        id.map_or(EventValue::None, EventValue::Entity)
    }

    /// Wrap an optional plain name
    pub fn name(name: Option<&str>) -> Self {
        name.map_or(EventValue::None, |n| EventValue::Name(n.to_string()))
    }
}

/// A typed mutation event broadcast synchronously to listeners
#[derive(Debug, Clone)]
pub struct ModelEvent {
    pub kind: EventKind,
    /// The entity whose structure changed
    pub source: EntityId,
    /// The reference field that changed, for reference-reassignment kinds
    pub field: Option<FieldRef>,
    pub old_value: EventValue,
    pub new_value: EventValue,
}

impl ModelEvent {
    /// Build a reference-reassignment event
    pub fn reference(
        field: FieldRef,
        old_value: EventValue,
        new_value: EventValue,
    ) -> Self {
        Self {
            kind: field.event_kind(),
            source: field.source_entity(),
            field: Some(field),
            old_value,
            new_value,
        }
    }

    /// Build a non-reference structural event
    pub fn structural(
        kind: EventKind,
        source: EntityId,
        old_value: EventValue,
        new_value: EventValue,
    ) -> Self {
        Self {
            kind,
            source,
            field: None,
            old_value,
            new_value,
        }
    }
}

/// A listener invoked synchronously during mutation broadcast
///
/// Listeners may re-enter the model and trigger further mutations; the
/// model guards runaway reentrancy with a bounded dispatch depth. A
/// listener must not rely on a mid-dispatch subscribe/unsubscribe taking
/// effect for the event currently being delivered.
pub trait ModelListener {
    fn on_event(&self, model: &mut Model, event: &ModelEvent);
}

/// Handle returned by [`Model::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerToken(pub(crate) u64);

pub(crate) struct Subscription {
    pub(crate) token: ListenerToken,
    /// Empty set subscribes to every event kind
    pub(crate) kinds: HashSet<EventKind>,
    /// Empty set subscribes to events from every source entity kind
    pub(crate) sources: HashSet<EntityKind>,
    pub(crate) listener: Rc<dyn ModelListener>,
}

impl Subscription {
    pub(crate) fn wants(&self, kind: EventKind, source: EntityKind) -> bool {
        (self.kinds.is_empty() || self.kinds.contains(&kind))
            && (self.sources.is_empty() || self.sources.contains(&source))
    }
}

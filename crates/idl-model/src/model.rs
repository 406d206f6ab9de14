//! The model arena and its event-firing mutation protocol

use crate::entity::{
    Attribute, Element, Entity, EntityData, EntityKind, Facet, FacetRef, FacetType, FieldRef,
    Indicator, Operation, Reference,
};
use crate::event::{
    EventKind, EventValue, ListenerToken, ModelEvent, ModelListener, Subscription,
};
use crate::library::Library;
use crate::{EntityId, LibraryId};
use std::rc::Rc;
use tracing::trace;

/// Maximum reentrant event-dispatch depth before the model assumes a
/// listener loop and fails fast
const MAX_DISPATCH_DEPTH: usize = 32;

/// The in-memory semantic model: an arena of libraries and entities plus
/// the registered mutation listeners
///
/// Ownership is strictly library → member. Entities are created through
/// factory operations that set the immutable owning-library link first;
/// after creation, mutation is limited to reference reassignment, member
/// addition/removal, and documentation changes, all of which broadcast a
/// [`ModelEvent`] synchronously and in order.
#[derive(Default)]
pub struct Model {
    libraries: Vec<Library>,
    entities: Vec<Entity>,
    subscriptions: Vec<Subscription>,
    next_token: u64,
    dispatch_depth: usize,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    // ----- factories ------------------------------------------------------

    /// Add a library to the model
    pub fn add_library(&mut self, library: Library) -> LibraryId {
        let id = LibraryId(u32::try_from(self.libraries.len()).expect("library arena overflow"));
        self.libraries.push(library);
        id
    }

    /// Create a named entity owned by `library` and append it to the
    /// library's member list
    ///
    /// Duplicate local names are legal in-memory; they surface as
    /// validation findings, not mutation errors. Panics when `library` is
    /// not part of this model (contract violation).
    pub fn add_entity(
        &mut self,
        library: LibraryId,
        name: impl Into<String>,
        data: EntityData,
    ) -> EntityId {
        let id = EntityId(u32::try_from(self.entities.len()).expect("entity arena overflow"));
        let name = name.into();
        let is_service = matches!(data, EntityData::Service(_));
        self.entities.push(Entity {
            id,
            library,
            name: name.clone(),
            documentation: None,
            data,
        });
        let lib = self
            .libraries
            .get_mut(library.0 as usize)
            .expect("owning library does not exist");
        lib.members.push(id);
        if is_service {
            lib.service = Some(id);
        }
        self.fire(ModelEvent::structural(
            EventKind::MemberAdded,
            id,
            EventValue::None,
            EventValue::Name(name),
        ));
        id
    }

    /// Detach an entity from its owning library
    ///
    /// The arena slot is retained (ids stay stable) but the entity is no
    /// longer reachable through the library and disappears from symbol
    /// tables built afterwards.
    pub fn remove_member(&mut self, entity: EntityId) {
        let (library, name) = {
            let e = self.entity(entity);
            (e.library, e.name.clone())
        };
        let lib = &mut self.libraries[library.0 as usize];
        lib.members.retain(|m| *m != entity);
        if lib.service == Some(entity) {
            lib.service = None;
        }
        self.fire(ModelEvent::structural(
            EventKind::MemberRemoved,
            entity,
            EventValue::Name(name),
            EventValue::None,
        ));
    }

    // ----- accessors ------------------------------------------------------

    /// Panics when the id is not part of this model (contract violation).
    pub fn library(&self, id: LibraryId) -> &Library {
        &self.libraries[id.0 as usize]
    }

    pub fn library_mut(&mut self, id: LibraryId) -> &mut Library {
        &mut self.libraries[id.0 as usize]
    }

    /// Panics when the id is not part of this model (contract violation).
    pub fn entity(&self, id: EntityId) -> &Entity {
        &self.entities[id.0 as usize]
    }

    pub fn libraries(&self) -> impl Iterator<Item = (LibraryId, &Library)> {
        self.libraries
            .iter()
            .enumerate()
            .map(|(i, l)| (LibraryId(u32::try_from(i).expect("library arena overflow")), l))
    }

    /// Find a member of a library by local name (first match in
    /// declaration order)
    pub fn find_member(&self, library: LibraryId, local_name: &str) -> Option<EntityId> {
        self.library(library)
            .members
            .iter()
            .copied()
            .find(|id| self.entity(*id).name == local_name)
    }

    /// The validation identity of an entity: owning-library identity plus
    /// local name
    pub fn identity(&self, entity: EntityId) -> String {
        let e = self.entity(entity);
        format!("{}/{}", self.library(e.library).name, e.name)
    }

    /// Resolve a facet location to the live facet
    pub fn facet(&self, facet: FacetRef) -> Option<&Facet> {
        match facet {
            FacetRef::Entity { entity, facet } => {
                let e = self.entities.get(entity.0 as usize)?;
                entity_facet(&e.data, facet)
            }
            FacetRef::Operation { service, op, facet } => {
                let e = self.entities.get(service.0 as usize)?;
                operation_facet(&e.data, op, facet)
            }
        }
    }

    pub(crate) fn facet_mut(&mut self, facet: FacetRef) -> Option<&mut Facet> {
        match facet {
            FacetRef::Entity { entity, facet } => {
                let e = self.entities.get_mut(entity.0 as usize)?;
                entity_facet_mut(&mut e.data, facet)
            }
            FacetRef::Operation { service, op, facet } => {
                let e = self.entities.get_mut(service.0 as usize)?;
                operation_facet_mut(&mut e.data, op, facet)
            }
        }
    }

    /// Read a reference field
    pub fn reference(&self, field: &FieldRef) -> Option<&Reference> {
        match *field {
            FieldRef::SimpleParentType { entity } => match &self.entities.get(entity.0 as usize)?.data {
                EntityData::Simple(s) => Some(&s.parent_type),
                _ => None,
            },
            FieldRef::VwaParentType { entity } => match &self.entities.get(entity.0 as usize)?.data {
                EntityData::ValueWithAttributes(v) => Some(&v.parent_type),
                _ => None,
            },
            FieldRef::AttributeType { facet, index } => {
                self.facet(facet)?.attributes.get(index).map(|a| &a.type_ref)
            }
            FieldRef::ElementType { facet, index } => {
                self.facet(facet)?.elements.get(index).map(|e| &e.type_ref)
            }
            FieldRef::Extension { entity } => match &self.entities.get(entity.0 as usize)?.data {
                EntityData::CoreObject(c) => Some(&c.extension),
                EntityData::BusinessObject(b) => Some(&b.extension),
                _ => None,
            },
            FieldRef::FacetBaseType { facet } => self.facet(facet).map(|f| &f.base_type),
            FieldRef::ContextualFacetOwner { entity } => {
                match &self.entities.get(entity.0 as usize)?.data {
                    EntityData::ContextualFacet(f) => Some(&f.owner),
                    _ => None,
                }
            }
            FieldRef::ResourceBusinessObject { entity } => {
                match &self.entities.get(entity.0 as usize)?.data {
                    EntityData::Resource(r) => Some(&r.business_object),
                    _ => None,
                }
            }
            FieldRef::ParentResource { entity } => {
                match &self.entities.get(entity.0 as usize)?.data {
                    EntityData::Resource(r) => Some(&r.parent_resource),
                    _ => None,
                }
            }
            FieldRef::ActionBasePayload { entity, action_facet } => {
                match &self.entities.get(entity.0 as usize)?.data {
                    EntityData::Resource(r) => {
                        r.action_facets.get(action_facet).map(|f| &f.base_payload)
                    }
                    _ => None,
                }
            }
            FieldRef::ActionRequestPayload { entity, action } => {
                match &self.entities.get(entity.0 as usize)?.data {
                    EntityData::Resource(r) => {
                        r.actions.get(action).map(|a| &a.request.payload_type)
                    }
                    _ => None,
                }
            }
            FieldRef::ActionResponsePayload { entity, action } => {
                match &self.entities.get(entity.0 as usize)?.data {
                    EntityData::Resource(r) => {
                        r.actions.get(action).map(|a| &a.response.payload_type)
                    }
                    _ => None,
                }
            }
            // Not reference-bearing: the param group companion is a plain name
            FieldRef::ActionRequestParamGroup { .. } => None,
            FieldRef::OperationExtension { service, op } => {
                match &self.entities.get(service.0 as usize)?.data {
                    EntityData::Service(s) => s.operations.get(op).map(|o| &o.extension),
                    _ => None,
                }
            }
        }
    }

    fn reference_mut(&mut self, field: &FieldRef) -> Option<&mut Reference> {
        match *field {
            FieldRef::SimpleParentType { entity } => {
                match &mut self.entities.get_mut(entity.0 as usize)?.data {
                    EntityData::Simple(s) => Some(&mut s.parent_type),
                    _ => None,
                }
            }
            FieldRef::VwaParentType { entity } => {
                match &mut self.entities.get_mut(entity.0 as usize)?.data {
                    EntityData::ValueWithAttributes(v) => Some(&mut v.parent_type),
                    _ => None,
                }
            }
            FieldRef::AttributeType { facet, index } => self
                .facet_mut(facet)?
                .attributes
                .get_mut(index)
                .map(|a| &mut a.type_ref),
            FieldRef::ElementType { facet, index } => self
                .facet_mut(facet)?
                .elements
                .get_mut(index)
                .map(|e| &mut e.type_ref),
            FieldRef::Extension { entity } => {
                match &mut self.entities.get_mut(entity.0 as usize)?.data {
                    EntityData::CoreObject(c) => Some(&mut c.extension),
                    EntityData::BusinessObject(b) => Some(&mut b.extension),
                    _ => None,
                }
            }
            FieldRef::FacetBaseType { facet } => self.facet_mut(facet).map(|f| &mut f.base_type),
            FieldRef::ContextualFacetOwner { entity } => {
                match &mut self.entities.get_mut(entity.0 as usize)?.data {
                    EntityData::ContextualFacet(f) => Some(&mut f.owner),
                    _ => None,
                }
            }
            FieldRef::ResourceBusinessObject { entity } => {
                match &mut self.entities.get_mut(entity.0 as usize)?.data {
                    EntityData::Resource(r) => Some(&mut r.business_object),
                    _ => None,
                }
            }
            FieldRef::ParentResource { entity } => {
                match &mut self.entities.get_mut(entity.0 as usize)?.data {
                    EntityData::Resource(r) => Some(&mut r.parent_resource),
                    _ => None,
                }
            }
            FieldRef::ActionBasePayload { entity, action_facet } => {
                match &mut self.entities.get_mut(entity.0 as usize)?.data {
                    EntityData::Resource(r) => r
                        .action_facets
                        .get_mut(action_facet)
                        .map(|f| &mut f.base_payload),
                    _ => None,
                }
            }
            FieldRef::ActionRequestPayload { entity, action } => {
                match &mut self.entities.get_mut(entity.0 as usize)?.data {
                    EntityData::Resource(r) => r
                        .actions
                        .get_mut(action)
                        .map(|a| &mut a.request.payload_type),
                    _ => None,
                }
            }
            FieldRef::ActionResponsePayload { entity, action } => {
                match &mut self.entities.get_mut(entity.0 as usize)?.data {
                    EntityData::Resource(r) => r
                        .actions
                        .get_mut(action)
                        .map(|a| &mut a.response.payload_type),
                    _ => None,
                }
            }
            FieldRef::ActionRequestParamGroup { .. } => None,
            FieldRef::OperationExtension { service, op } => {
                match &mut self.entities.get_mut(service.0 as usize)?.data {
                    EntityData::Service(s) => s.operations.get_mut(op).map(|o| &mut o.extension),
                    _ => None,
                }
            }
        }
    }

    /// Every reference-bearing field currently present in the model, in
    /// library/member declaration order
    ///
    /// Used by the post-load resolution pass to bind textual references.
    pub fn reference_fields(&self) -> Vec<FieldRef> {
        let mut fields = Vec::new();
        for lib in &self.libraries {
            for &id in &lib.members {
                self.collect_entity_fields(id, &mut fields);
            }
        }
        fields
    }

    fn collect_entity_fields(&self, id: EntityId, fields: &mut Vec<FieldRef>) {
        let push_facet = |facet: FacetRef, f: &Facet, fields: &mut Vec<FieldRef>| {
            fields.push(FieldRef::FacetBaseType { facet });
            for index in 0..f.attributes.len() {
                fields.push(FieldRef::AttributeType { facet, index });
            }
            for index in 0..f.elements.len() {
                fields.push(FieldRef::ElementType { facet, index });
            }
        };
        let entity_facet_ref = |facet: FacetType| FacetRef::Entity { entity: id, facet };
        match &self.entity(id).data {
            EntityData::Simple(_) => fields.push(FieldRef::SimpleParentType { entity: id }),
            EntityData::ClosedEnumeration(_) | EntityData::OpenEnumeration(_) => {}
            EntityData::CoreObject(c) => {
                fields.push(FieldRef::Extension { entity: id });
                push_facet(entity_facet_ref(FacetType::Summary), &c.summary, fields);
                push_facet(entity_facet_ref(FacetType::Detail), &c.detail, fields);
            }
            EntityData::BusinessObject(b) => {
                fields.push(FieldRef::Extension { entity: id });
                push_facet(entity_facet_ref(FacetType::Id), &b.id, fields);
                push_facet(entity_facet_ref(FacetType::Summary), &b.summary, fields);
                push_facet(entity_facet_ref(FacetType::Detail), &b.detail, fields);
            }
            EntityData::ValueWithAttributes(v) => {
                fields.push(FieldRef::VwaParentType { entity: id });
                push_facet(entity_facet_ref(FacetType::Shared), &v.value, fields);
            }
            EntityData::ContextualFacet(f) => {
                fields.push(FieldRef::ContextualFacetOwner { entity: id });
                push_facet(entity_facet_ref(f.facet_type), &f.facet, fields);
            }
            EntityData::Resource(r) => {
                fields.push(FieldRef::ResourceBusinessObject { entity: id });
                fields.push(FieldRef::ParentResource { entity: id });
                for action_facet in 0..r.action_facets.len() {
                    fields.push(FieldRef::ActionBasePayload { entity: id, action_facet });
                }
                for action in 0..r.actions.len() {
                    fields.push(FieldRef::ActionRequestPayload { entity: id, action });
                    fields.push(FieldRef::ActionResponsePayload { entity: id, action });
                }
            }
            EntityData::Service(s) => {
                for (op, operation) in s.operations.iter().enumerate() {
                    fields.push(FieldRef::OperationExtension { service: id, op });
                    for facet in [FacetType::Request, FacetType::Response, FacetType::Notification]
                    {
                        let fr = FacetRef::Operation { service: id, op, facet };
                        let f = match facet {
                            FacetType::Request => &operation.request,
                            FacetType::Response => &operation.response,
                            _ => &operation.notification,
                        };
                        push_facet(fr, f, fields);
                    }
                }
            }
        }
    }

    // ----- mutators (event-firing) ----------------------------------------

    /// Reassign the resolved half of a reference field and broadcast the
    /// corresponding event
    ///
    /// The textual companion is rewritten by the integrity maintainer
    /// listening on the model; callers never touch it directly. Panics when
    /// `field` does not exist on its source entity (contract violation).
    pub fn assign_reference(&mut self, field: FieldRef, target: Option<EntityId>) {
        let old = {
            let r = self
                .reference_mut(&field)
                .expect("reference field does not exist on its source entity");
            let old = r.resolved;
            r.resolved = target;
            old
        };
        self.fire(ModelEvent::reference(
            field,
            EventValue::entity(old),
            EventValue::entity(target),
        ));
    }

    /// Bind the resolved half of a reference without firing events
    ///
    /// Used by the post-load resolution pass: binding a name that was
    /// already declared textually is not a semantic change.
    pub fn bind_reference(&mut self, field: &FieldRef, target: Option<EntityId>) {
        if let Some(r) = self.reference_mut(field) {
            r.resolved = target;
        }
    }

    /// Write the textual companion of a reference without firing events
    ///
    /// This is the integrity maintainer's write-back path; keeping it
    /// silent prevents infinite recursion through the listener it runs in.
    pub fn write_reference_text(&mut self, field: &FieldRef, text: Option<String>) {
        if let Some(r) = self.reference_mut(field) {
            r.textual = text;
        }
    }

    /// Assign an action request's param group by index into the owning
    /// resource's param-group list
    ///
    /// Fires [`EventKind::ParamGroupModified`] carrying the old and new
    /// group names; the textual `param_group_name` companion is written by
    /// the integrity maintainer.
    pub fn assign_param_group(
        &mut self,
        resource: EntityId,
        action: usize,
        group: Option<usize>,
    ) {
        let (old_name, new_name) = {
            let EntityData::Resource(r) = &mut self.entities[resource.0 as usize].data else {
                panic!("param-group assignment on a non-resource entity");
            };
            let group_name =
                |idx: Option<usize>, groups: &[crate::entity::ParamGroup]| -> Option<String> {
                    idx.and_then(|i| groups.get(i).map(|g| g.name.clone()))
                };
            let old = group_name(r.actions[action].request.param_group, &r.param_groups);
            r.actions[action].request.param_group = group;
            let new = group_name(group, &r.param_groups);
            (old, new)
        };
        let mut event = ModelEvent::structural(
            EventKind::ParamGroupModified,
            resource,
            EventValue::name(old_name.as_deref()),
            EventValue::name(new_name.as_deref()),
        );
        event.field = Some(FieldRef::ActionRequestParamGroup {
            entity: resource,
            action,
        });
        self.fire(event);
    }

    /// Silent write-back for the param-group textual companion
    pub fn write_param_group_name(
        &mut self,
        resource: EntityId,
        action: usize,
        name: Option<String>,
    ) {
        if let EntityData::Resource(r) = &mut self.entities[resource.0 as usize].data {
            if let Some(a) = r.actions.get_mut(action) {
                a.request.param_group_name = name;
            }
        }
    }

    /// Append an attribute to a facet and broadcast a member-added event
    pub fn add_facet_attribute(&mut self, facet: FacetRef, attribute: Attribute) {
        let name = attribute.name.clone();
        self.facet_mut(facet)
            .expect("facet does not exist on its owner")
            .attributes
            .push(attribute);
        self.fire_member_added(facet.owner(), name);
    }

    /// Append an element to a facet and broadcast a member-added event
    pub fn add_facet_element(&mut self, facet: FacetRef, element: Element) {
        let name = element.name.clone();
        self.facet_mut(facet)
            .expect("facet does not exist on its owner")
            .elements
            .push(element);
        self.fire_member_added(facet.owner(), name);
    }

    /// Append an indicator to a facet and broadcast a member-added event
    pub fn add_facet_indicator(&mut self, facet: FacetRef, indicator: Indicator) {
        let name = indicator.name.clone();
        self.facet_mut(facet)
            .expect("facet does not exist on its owner")
            .indicators
            .push(indicator);
        self.fire_member_added(facet.owner(), name);
    }

    /// Remove an indicator from a facet by index
    pub fn remove_facet_indicator(&mut self, facet: FacetRef, index: usize) {
        let removed = self
            .facet_mut(facet)
            .expect("facet does not exist on its owner")
            .indicators
            .remove(index);
        self.fire(ModelEvent::structural(
            EventKind::MemberRemoved,
            facet.owner(),
            EventValue::Name(removed.name),
            EventValue::None,
        ));
    }

    /// Append an operation to a service and broadcast a member-added event
    pub fn add_operation(&mut self, service: EntityId, operation: Operation) {
        let name = operation.name.clone();
        let EntityData::Service(s) = &mut self.entities[service.0 as usize].data else {
            panic!("operation added to a non-service entity");
        };
        s.operations.push(operation);
        self.fire_member_added(service, name);
    }

    /// Replace an entity's documentation and broadcast the change
    pub fn set_documentation(&mut self, entity: EntityId, documentation: Option<String>) {
        let old = {
            let e = &mut self.entities[entity.0 as usize];
            std::mem::replace(&mut e.documentation, documentation.clone())
        };
        self.fire(ModelEvent::structural(
            EventKind::DocumentationModified,
            entity,
            EventValue::name(old.as_deref()),
            EventValue::name(documentation.as_deref()),
        ));
    }

    fn fire_member_added(&mut self, owner: EntityId, name: String) {
        self.fire(ModelEvent::structural(
            EventKind::MemberAdded,
            owner,
            EventValue::None,
            EventValue::Name(name),
        ));
    }

    // ----- listeners ------------------------------------------------------

    /// Subscribe a listener for the given event kinds (an empty slice
    /// subscribes to all kinds)
    pub fn subscribe(
        &mut self,
        kinds: &[EventKind],
        listener: Rc<dyn ModelListener>,
    ) -> ListenerToken {
        self.subscribe_filtered(kinds, &[], listener)
    }

    /// Subscribe a listener keyed by event kind and source entity kind
    ///
    /// An empty `kinds` slice matches every event kind, an empty
    /// `sources` slice matches events from every entity kind. A listener
    /// only interested in, say, service mutations never sees the rest of
    /// the traffic.
    pub fn subscribe_filtered(
        &mut self,
        kinds: &[EventKind],
        sources: &[EntityKind],
        listener: Rc<dyn ModelListener>,
    ) -> ListenerToken {
        let token = ListenerToken(self.next_token);
        self.next_token += 1;
        self.subscriptions.push(Subscription {
            token,
            kinds: kinds.iter().copied().collect(),
            sources: sources.iter().copied().collect(),
            listener,
        });
        token
    }

    /// Remove a subscription; takes effect for events fired afterwards
    pub fn unsubscribe(&mut self, token: ListenerToken) {
        self.subscriptions.retain(|s| s.token != token);
    }

    /// Broadcast an event synchronously to every matching listener
    ///
    /// Dispatch iterates a snapshot of the subscription list, so listeners
    /// may mutate the model (and even the subscriptions) reentrantly; the
    /// depth guard turns unbounded listener recursion into a fail-fast
    /// panic.
    fn fire(&mut self, event: ModelEvent) {
        self.dispatch_depth += 1;
        assert!(
            self.dispatch_depth <= MAX_DISPATCH_DEPTH,
            "model event dispatch exceeded depth {MAX_DISPATCH_DEPTH}: listener loop"
        );
        trace!(kind = ?event.kind, source = ?event.source, "dispatching model event");
        let source_kind = self.entities[event.source.0 as usize].kind();
        let snapshot: Vec<Rc<dyn ModelListener>> = self
            .subscriptions
            .iter()
            .filter(|s| s.wants(event.kind, source_kind))
            .map(|s| Rc::clone(&s.listener))
            .collect();
        for listener in snapshot {
            listener.on_event(self, &event);
        }
        self.dispatch_depth -= 1;
    }
}

fn entity_facet(data: &EntityData, facet: FacetType) -> Option<&Facet> {
    match (data, facet) {
        (EntityData::CoreObject(c), FacetType::Summary) => Some(&c.summary),
        (EntityData::CoreObject(c), FacetType::Detail) => Some(&c.detail),
        (EntityData::BusinessObject(b), FacetType::Id) => Some(&b.id),
        (EntityData::BusinessObject(b), FacetType::Summary) => Some(&b.summary),
        (EntityData::BusinessObject(b), FacetType::Detail) => Some(&b.detail),
        (EntityData::ValueWithAttributes(v), FacetType::Shared) => Some(&v.value),
        (EntityData::ContextualFacet(f), ft) if ft == f.facet_type => Some(&f.facet),
        _ => None,
    }
}

fn entity_facet_mut(data: &mut EntityData, facet: FacetType) -> Option<&mut Facet> {
    match (data, facet) {
        (EntityData::CoreObject(c), FacetType::Summary) => Some(&mut c.summary),
        (EntityData::CoreObject(c), FacetType::Detail) => Some(&mut c.detail),
        (EntityData::BusinessObject(b), FacetType::Id) => Some(&mut b.id),
        (EntityData::BusinessObject(b), FacetType::Summary) => Some(&mut b.summary),
        (EntityData::BusinessObject(b), FacetType::Detail) => Some(&mut b.detail),
        (EntityData::ValueWithAttributes(v), FacetType::Shared) => Some(&mut v.value),
        (EntityData::ContextualFacet(f), ft) if ft == f.facet_type => Some(&mut f.facet),
        _ => None,
    }
}

fn operation_facet(data: &EntityData, op: usize, facet: FacetType) -> Option<&Facet> {
    let EntityData::Service(s) = data else {
        return None;
    };
    let operation = s.operations.get(op)?;
    match facet {
        FacetType::Request => Some(&operation.request),
        FacetType::Response => Some(&operation.response),
        FacetType::Notification => Some(&operation.notification),
        _ => None,
    }
}

fn operation_facet_mut(data: &mut EntityData, op: usize, facet: FacetType) -> Option<&mut Facet> {
    let EntityData::Service(s) = data else {
        return None;
    };
    let operation = s.operations.get_mut(op)?;
    match facet {
        FacetType::Request => Some(&mut operation.request),
        FacetType::Response => Some(&mut operation.response),
        FacetType::Notification => Some(&mut operation.notification),
        _ => None,
    }
}

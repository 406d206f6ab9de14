//! The integrity-maintainer model listener
//!
//! Keeps the textual companion of every reference field synchronized with
//! its live entity pointer. One maintainer instance is attached per model
//! for the model's full lifetime.

use crate::symbols::build_reference_name;
use idl_model::{
    EventKind, EventValue, FieldRef, ListenerToken, Model, ModelEvent, ModelListener,
};
use idl_version::SchemeRegistry;
use std::rc::Rc;
use tracing::trace;

/// Every event kind that reassigns a reference-bearing field, plus the
/// narrower param-group case
const MAINTAINED_KINDS: [EventKind; 9] = [
    EventKind::TypeAssignmentModified,
    EventKind::ExtensionModified,
    EventKind::FacetBaseModified,
    EventKind::FacetOwnerModified,
    EventKind::BusinessObjectRefModified,
    EventKind::ParentResourceModified,
    EventKind::BasePayloadModified,
    EventKind::PayloadTypeModified,
    EventKind::ParamGroupModified,
];

/// Listener that re-derives a reference field's textual name on every
/// reassignment
///
/// Dispatch is a flat match on the mutated [`FieldRef`]: the set of
/// reference-bearing field kinds is closed by design, so the mapping from
/// "field that changed" to "how its textual companion is re-derived" lives
/// here rather than behind entity polymorphism. Write-backs go through the
/// model's silent setters and therefore never re-fire as observable
/// events.
pub struct IntegrityMaintainer {
    schemes: Rc<SchemeRegistry>,
}

impl IntegrityMaintainer {
    /// Attach a maintainer to a model for the model's lifetime
    pub fn attach(model: &mut Model, schemes: Rc<SchemeRegistry>) -> ListenerToken {
        model.subscribe(&MAINTAINED_KINDS, Rc::new(Self { schemes }))
    }
}

impl ModelListener for IntegrityMaintainer {
    fn on_event(&self, model: &mut Model, event: &ModelEvent) {
        let Some(field) = event.field else {
            return;
        };

        if event.kind == EventKind::ParamGroupModified {
            let FieldRef::ActionRequestParamGroup { entity, action } = field else {
                return;
            };
            let name = match &event.new_value {
                EventValue::Name(n) => Some(n.clone()),
                _ => None,
            };
            trace!(?entity, action, ?name, "param group name write-back");
            model.write_param_group_name(entity, action, name);
            return;
        }

        let text = match event.new_value {
            EventValue::Entity(target) => Some(build_reference_name(
                model,
                &self.schemes,
                field.source_entity(),
                target,
            )),
            _ => None,
        };
        trace!(?field, ?text, "reference name write-back");
        model.write_reference_text(&field, text);
    }
}

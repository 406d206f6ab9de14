//! Facet inheritance delegation
//!
//! Generated facet types extend the nearest facet up the owner's
//! extension chain that actually declares content. Empty facets never
//! become bases; they are skipped, and a chain of nothing but empty
//! facets yields no base at all.

use idl_model::{Facet, FacetRef, FacetType, Model};
use idl_resolve::extension_chain;

/// The facet a generated facet type should extend, if any
///
/// A detail facet first considers its own entity's summary facet; other
/// facet types (and a detail whose summary is empty) walk the owner's
/// extension chain looking for the nearest same-type facet with local
/// content. Cycle-safe through the chain walk's visited set.
pub fn facet_codegen_base(model: &Model, facet: FacetRef) -> Option<FacetRef> {
    let FacetRef::Entity { entity, facet: facet_type } = facet else {
        // Operation facets inherit through the operation extension, not
        // through a facet base
        return None;
    };

    if facet_type == FacetType::Detail {
        let summary = FacetRef::Entity {
            entity,
            facet: FacetType::Summary,
        };
        if model.facet(summary).is_some_and(Facet::has_local_content) {
            return Some(summary);
        }
    }

    for ancestor in extension_chain(model, entity).into_iter().skip(1) {
        let candidate = FacetRef::Entity {
            entity: ancestor,
            facet: facet_type,
        };
        if model.facet(candidate).is_some_and(Facet::has_local_content) {
            return Some(candidate);
        }
    }
    None
}

/// The per-facet-type extension point marker element appended to
/// generated facet types
pub fn extension_point_name(facet_type: FacetType) -> &'static str {
    match facet_type {
        FacetType::Id => "ExtensionPoint_ID",
        FacetType::Summary => "ExtensionPoint_Summary",
        FacetType::Detail => "ExtensionPoint_Detail",
        FacetType::Shared => "ExtensionPoint_Shared",
        FacetType::Custom => "ExtensionPoint_Custom",
        FacetType::Query => "ExtensionPoint_Query",
        FacetType::Request | FacetType::Response | FacetType::Notification => "ExtensionPoint",
    }
}

/// The generated type name of a facet: `{entity}_{FacetLabel}`
pub fn facet_type_name(model: &Model, facet: FacetRef) -> String {
    let (owner, facet_type) = match facet {
        FacetRef::Entity { entity, facet } => (entity, facet),
        FacetRef::Operation { service, facet, .. } => (service, facet),
    };
    let label = match facet_type {
        FacetType::Id => "ID",
        FacetType::Summary => "Summary",
        FacetType::Detail => "Detail",
        FacetType::Shared => "Shared",
        FacetType::Custom => "Custom",
        FacetType::Query => "Query",
        FacetType::Request => "RQ",
        FacetType::Response => "RS",
        FacetType::Notification => "Notif",
    };
    format!("{}_{label}", model.entity(owner).name())
}

//! Built-in validators, one per entity kind, plus the library rules

use crate::checks::{
    FieldChecks, ERROR_DUPLICATE_NAME, ERROR_EMPTY_OPERATION, ERROR_INVALID_PATTERN,
    ERROR_INVALID_VERSION, ERROR_NAME_UPA, ERROR_SERVICE_NAME_CHANGED, ERROR_SERVICE_ON_PATCH,
    ERROR_UNKNOWN_PARAM_GROUP, ERROR_UNKNOWN_SCHEME, ERROR_UNRESOLVED_REFERENCE,
};
use crate::engine::{EntityValidator, ValidationContext, ValidationEngine};
use idl_model::{
    EntityData, EntityId, EntityKind, Facet, LibraryId, Model, Reference,
};
use idl_resolve::{extension_chain, library_namespace};
use idl_version::SchemeRegistry;
use regex::Regex;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::trace;

/// Register the built-in validator set on an engine
pub fn register_builtin_validators(engine: &mut ValidationEngine) {
    engine.register(EntityKind::Simple, Box::new(SimpleValidator));
    engine.register(EntityKind::ClosedEnumeration, Box::new(EnumerationValidator));
    engine.register(EntityKind::OpenEnumeration, Box::new(EnumerationValidator));
    engine.register(EntityKind::CoreObject, Box::new(CoreObjectValidator));
    engine.register(EntityKind::BusinessObject, Box::new(BusinessObjectValidator));
    engine.register(
        EntityKind::ValueWithAttributes,
        Box::new(ValueWithAttributesValidator),
    );
    engine.register(EntityKind::ContextualFacet, Box::new(ContextualFacetValidator));
    engine.register(EntityKind::Resource, Box::new(ResourceValidator));
    engine.register(EntityKind::Service, Box::new(ServiceValidator));
}

/// Library-level rules: identity fields, version scheme and identifier,
/// member name uniqueness, and context uniqueness
pub fn validate_library_fields(
    model: &Model,
    library: LibraryId,
    schemes: &SchemeRegistry,
    ctx: &mut ValidationContext,
) {
    let lib = model.library(library);
    let source = lib.name.clone();

    FieldChecks::new(&mut ctx.findings, source.clone(), "name")
        .not_null_or_blank(Some(&lib.name))
        .valid_xml_name(&lib.name);
    FieldChecks::new(&mut ctx.findings, source.clone(), "prefix")
        .not_null_or_blank(Some(&lib.prefix));
    FieldChecks::new(&mut ctx.findings, source.clone(), "namespace")
        .not_null_or_blank(Some(&lib.namespace));

    match schemes.get(&lib.version_scheme) {
        Err(_) => {
            FieldChecks::new(&mut ctx.findings, source.clone(), "versionScheme")
                .error(ERROR_UNKNOWN_SCHEME, vec![lib.version_scheme.clone()]);
        }
        Ok(scheme) => {
            if !scheme.is_valid_identifier(&lib.version) {
                FieldChecks::new(&mut ctx.findings, source.clone(), "version")
                    .error(ERROR_INVALID_VERSION, vec![lib.version.clone()]);
            }
        }
    }

    let member_names: Vec<String> = lib
        .members()
        .iter()
        .map(|&m| model.entity(m).name().to_string())
        .collect();
    FieldChecks::new(&mut ctx.findings, source.clone(), "members").no_duplicates(
        &member_names,
        |n| Some(n.clone()),
        ERROR_DUPLICATE_NAME,
    );

    FieldChecks::new(&mut ctx.findings, source, "contexts").no_duplicates(
        &lib.contexts,
        |c| Some(c.context_id.clone()),
        ERROR_DUPLICATE_NAME,
    );
}

/// Name checks shared by every entity validator
fn check_entity_name(model: &Model, entity: EntityId, ctx: &mut ValidationContext) {
    let name = model.entity(entity).name().to_string();
    FieldChecks::new(&mut ctx.findings, model.identity(entity), "name")
        .not_null_or_blank(Some(&name))
        .valid_xml_name(&name);
}

/// Report a reference that carries a textual name which never resolved
fn check_reference_resolved(
    model: &Model,
    entity: EntityId,
    field: &'static str,
    reference: &Reference,
    ctx: &mut ValidationContext,
) {
    if reference.resolved().is_none() {
        if let Some(text) = reference.textual() {
            FieldChecks::new(&mut ctx.findings, model.identity(entity), field)
                .error(ERROR_UNRESOLVED_REFERENCE, vec![text.to_string()]);
        }
    }
}

/// Local facet rules: member name validity, sibling-member uniqueness, and
/// member type resolution
fn check_facet(
    model: &Model,
    entity: EntityId,
    field: &'static str,
    facet: &Facet,
    ctx: &mut ValidationContext,
) {
    let source = model.identity(entity);
    for name in facet.member_names() {
        FieldChecks::new(&mut ctx.findings, source.clone(), field).valid_xml_name(name);
    }
    let names: Vec<String> = facet.member_names().iter().map(|n| (*n).to_string()).collect();
    FieldChecks::new(&mut ctx.findings, source, field).no_duplicates(
        &names,
        |n| Some(n.clone()),
        ERROR_DUPLICATE_NAME,
    );

    check_reference_resolved(model, entity, field, &facet.base_type, ctx);
    for attribute in &facet.attributes {
        check_reference_resolved(model, entity, field, &attribute.type_ref, ctx);
    }
    for element in &facet.elements {
        check_reference_resolved(model, entity, field, &element.type_ref, ctx);
    }
}

/// Member names an entity contributes to the given facet slot
fn facet_member_names(model: &Model, entity: EntityId, field: &str) -> Vec<String> {
    let facet = match (&model.entity(entity).data, field) {
        (EntityData::CoreObject(c), "summary") => &c.summary,
        (EntityData::CoreObject(c), "detail") => &c.detail,
        (EntityData::BusinessObject(b), "id") => &b.id,
        (EntityData::BusinessObject(b), "summary") => &b.summary,
        (EntityData::BusinessObject(b), "detail") => &b.detail,
        (EntityData::ValueWithAttributes(v), "value") => &v.value,
        (EntityData::ContextualFacet(f), "facet") => &f.facet,
        _ => return Vec::new(),
    };
    facet.member_names().iter().map(|n| (*n).to_string()).collect()
}

/// Upper-bound uniqueness across the extension chain: a local member name
/// that shadows an inherited one in the same facet slot
///
/// Independent of the sibling-duplicate check and reported under its own
/// code. Ancestor member lists are memoized per (namespace, name, slot).
fn check_inherited_duplicates(
    model: &Model,
    entity: EntityId,
    field: &'static str,
    schemes: &SchemeRegistry,
    ctx: &mut ValidationContext,
) {
    let local: HashSet<String> = facet_member_names(model, entity, field).into_iter().collect();
    if local.is_empty() {
        return;
    }

    let mut inherited: Vec<Rc<Vec<String>>> = Vec::new();
    for ancestor in extension_chain(model, entity).into_iter().skip(1) {
        let namespace = library_namespace(model, model.entity(ancestor).library(), schemes);
        let key = ValidationContext::cache_key(
            &namespace,
            model.entity(ancestor).name(),
            &format!("members:{field}"),
        );
        inherited.push(ctx.cached(key, || facet_member_names(model, ancestor, field)));
    }

    let mut reported: HashSet<&str> = HashSet::new();
    for names in &inherited {
        for name in names.iter() {
            if local.contains(name) && reported.insert(name) {
                trace!(%name, field, "inherited member collision");
                FieldChecks::new(&mut ctx.findings, model.identity(entity), field)
                    .error(ERROR_NAME_UPA, vec![name.clone()]);
            }
        }
    }
}

/// The inherited-member check for a contextual facet: local members
/// collide with the members of a same-type, same-context facet attached
/// further up the owner's extension chain (that facet is the base the
/// generated type extends)
fn check_contextual_inherited_duplicates(
    model: &Model,
    entity: EntityId,
    schemes: &SchemeRegistry,
    ctx: &mut ValidationContext,
) {
    let EntityData::ContextualFacet(cf) = &model.entity(entity).data else {
        return;
    };
    let local: HashSet<&str> = cf.facet.member_names().into_iter().collect();
    if local.is_empty() {
        return;
    }
    let Some(owner) = cf.owner.resolved() else {
        return;
    };

    let mut inherited: Vec<Rc<Vec<String>>> = Vec::new();
    for ancestor in extension_chain(model, owner).into_iter().skip(1) {
        for (_, lib) in model.libraries() {
            for &member in lib.members() {
                let EntityData::ContextualFacet(candidate) = &model.entity(member).data else {
                    continue;
                };
                if candidate.owner.resolved() != Some(ancestor)
                    || candidate.facet_type != cf.facet_type
                    || candidate.context != cf.context
                {
                    continue;
                }
                let namespace =
                    library_namespace(model, model.entity(member).library(), schemes);
                let key = ValidationContext::cache_key(
                    &namespace,
                    model.entity(member).name(),
                    "members:facet",
                );
                inherited.push(ctx.cached(key, || facet_member_names(model, member, "facet")));
            }
        }
    }

    let mut reported: HashSet<&str> = HashSet::new();
    for names in &inherited {
        for name in names.iter() {
            if local.contains(name.as_str()) && reported.insert(name) {
                trace!(%name, "inherited contextual member collision");
                FieldChecks::new(&mut ctx.findings, model.identity(entity), "facet")
                    .error(ERROR_NAME_UPA, vec![name.clone()]);
            }
        }
    }
}

struct SimpleValidator;

impl EntityValidator for SimpleValidator {
    fn validate_fields(
        &self,
        model: &Model,
        entity: EntityId,
        _schemes: &SchemeRegistry,
        ctx: &mut ValidationContext,
    ) {
        check_entity_name(model, entity, ctx);
        let EntityData::Simple(simple) = &model.entity(entity).data else {
            return;
        };
        check_reference_resolved(model, entity, "parentType", &simple.parent_type, ctx);
        if let Some(pattern) = &simple.pattern {
            if Regex::new(pattern).is_err() {
                FieldChecks::new(&mut ctx.findings, model.identity(entity), "pattern")
                    .error(ERROR_INVALID_PATTERN, vec![pattern.clone()]);
            }
        }
    }
}

struct EnumerationValidator;

impl EntityValidator for EnumerationValidator {
    fn validate_fields(
        &self,
        model: &Model,
        entity: EntityId,
        _schemes: &SchemeRegistry,
        ctx: &mut ValidationContext,
    ) {
        check_entity_name(model, entity, ctx);
        let data = &model.entity(entity).data;
        let (EntityData::ClosedEnumeration(e) | EntityData::OpenEnumeration(e)) = data else {
            return;
        };
        FieldChecks::new(&mut ctx.findings, model.identity(entity), "literals")
            .min_size(&e.literals, 1)
            .no_duplicates(&e.literals, |l| Some(l.literal.clone()), ERROR_DUPLICATE_NAME);
    }
}

struct CoreObjectValidator;

impl EntityValidator for CoreObjectValidator {
    fn validate_fields(
        &self,
        model: &Model,
        entity: EntityId,
        schemes: &SchemeRegistry,
        ctx: &mut ValidationContext,
    ) {
        check_entity_name(model, entity, ctx);
        let EntityData::CoreObject(core) = &model.entity(entity).data else {
            return;
        };
        check_reference_resolved(model, entity, "extension", &core.extension, ctx);
        FieldChecks::new(&mut ctx.findings, model.identity(entity), "roles").no_duplicates(
            &core.roles,
            |r| Some(r.clone()),
            ERROR_DUPLICATE_NAME,
        );
        check_facet(model, entity, "summary", &core.summary, ctx);
        check_facet(model, entity, "detail", &core.detail, ctx);
        check_inherited_duplicates(model, entity, "summary", schemes, ctx);
        check_inherited_duplicates(model, entity, "detail", schemes, ctx);
    }
}

struct BusinessObjectValidator;

impl EntityValidator for BusinessObjectValidator {
    fn validate_fields(
        &self,
        model: &Model,
        entity: EntityId,
        schemes: &SchemeRegistry,
        ctx: &mut ValidationContext,
    ) {
        check_entity_name(model, entity, ctx);
        let EntityData::BusinessObject(bo) = &model.entity(entity).data else {
            return;
        };
        check_reference_resolved(model, entity, "extension", &bo.extension, ctx);
        check_facet(model, entity, "id", &bo.id, ctx);
        check_facet(model, entity, "summary", &bo.summary, ctx);
        check_facet(model, entity, "detail", &bo.detail, ctx);
        check_inherited_duplicates(model, entity, "id", schemes, ctx);
        check_inherited_duplicates(model, entity, "summary", schemes, ctx);
        check_inherited_duplicates(model, entity, "detail", schemes, ctx);
    }
}

struct ValueWithAttributesValidator;

impl EntityValidator for ValueWithAttributesValidator {
    fn validate_fields(
        &self,
        model: &Model,
        entity: EntityId,
        schemes: &SchemeRegistry,
        ctx: &mut ValidationContext,
    ) {
        check_entity_name(model, entity, ctx);
        let EntityData::ValueWithAttributes(vwa) = &model.entity(entity).data else {
            return;
        };
        check_reference_resolved(model, entity, "parentType", &vwa.parent_type, ctx);
        check_facet(model, entity, "value", &vwa.value, ctx);
        check_inherited_duplicates(model, entity, "value", schemes, ctx);
    }
}

struct ContextualFacetValidator;

impl EntityValidator for ContextualFacetValidator {
    fn validate_fields(
        &self,
        model: &Model,
        entity: EntityId,
        schemes: &SchemeRegistry,
        ctx: &mut ValidationContext,
    ) {
        check_entity_name(model, entity, ctx);
        let EntityData::ContextualFacet(cf) = &model.entity(entity).data else {
            return;
        };
        if !cf.owner.is_set() {
            FieldChecks::new(&mut ctx.findings, model.identity(entity), "owner")
                .not_null::<EntityId>(None);
        }
        check_reference_resolved(model, entity, "owner", &cf.owner, ctx);
        FieldChecks::new(&mut ctx.findings, model.identity(entity), "context")
            .not_null_or_blank(Some(&cf.context));
        check_facet(model, entity, "facet", &cf.facet, ctx);
        check_contextual_inherited_duplicates(model, entity, schemes, ctx);
    }
}

struct ResourceValidator;

impl EntityValidator for ResourceValidator {
    fn validate_fields(
        &self,
        model: &Model,
        entity: EntityId,
        _schemes: &SchemeRegistry,
        ctx: &mut ValidationContext,
    ) {
        check_entity_name(model, entity, ctx);
        let EntityData::Resource(resource) = &model.entity(entity).data else {
            return;
        };
        let source = model.identity(entity);

        if !resource.business_object.is_set() {
            FieldChecks::new(&mut ctx.findings, source.clone(), "businessObject")
                .not_null::<EntityId>(None);
        }
        check_reference_resolved(model, entity, "businessObject", &resource.business_object, ctx);
        check_reference_resolved(model, entity, "parentResource", &resource.parent_resource, ctx);

        FieldChecks::new(&mut ctx.findings, source.clone(), "paramGroups").no_duplicates(
            &resource.param_groups,
            |g| Some(g.name.clone()),
            ERROR_DUPLICATE_NAME,
        );
        FieldChecks::new(&mut ctx.findings, source.clone(), "actionFacets").no_duplicates(
            &resource.action_facets,
            |f| Some(f.name.clone()),
            ERROR_DUPLICATE_NAME,
        );
        FieldChecks::new(&mut ctx.findings, source.clone(), "actions").no_duplicates(
            &resource.actions,
            |a| Some(a.name.clone()),
            ERROR_DUPLICATE_NAME,
        );

        for facet in &resource.action_facets {
            check_reference_resolved(model, entity, "basePayload", &facet.base_payload, ctx);
        }
        for action in &resource.actions {
            check_reference_resolved(model, entity, "requestPayload", &action.request.payload_type, ctx);
            check_reference_resolved(model, entity, "responsePayload", &action.response.payload_type, ctx);
            if let Some(group) = &action.request.param_group_name {
                let declared = resource.param_groups.iter().any(|g| &g.name == group);
                if !declared {
                    FieldChecks::new(&mut ctx.findings, source.clone(), "paramGroup").error(
                        ERROR_UNKNOWN_PARAM_GROUP,
                        vec![action.name.clone(), group.clone()],
                    );
                }
            }
        }
    }
}

struct ServiceValidator;

impl ServiceValidator {
    /// Locate the library publishing the immediately prior minor version
    ///
    /// The declared prior-version URI wins; without one the scheme's
    /// namespace arithmetic is used.
    fn prior_library(
        model: &Model,
        library: LibraryId,
        schemes: &SchemeRegistry,
    ) -> Option<LibraryId> {
        let lib = model.library(library);
        let prior_namespace = match &lib.prior_version_uri {
            Some(uri) => uri.clone(),
            None => schemes
                .get(&lib.version_scheme)
                .ok()?
                .prior_minor_version(&lib.namespace)?,
        };
        model
            .libraries()
            .find(|(id, l)| *id != library && l.namespace == prior_namespace)
            .map(|(id, _)| id)
    }
}

impl EntityValidator for ServiceValidator {
    fn validate_fields(
        &self,
        model: &Model,
        entity: EntityId,
        schemes: &SchemeRegistry,
        ctx: &mut ValidationContext,
    ) {
        check_entity_name(model, entity, ctx);
        let EntityData::Service(service) = &model.entity(entity).data else {
            return;
        };
        let source = model.identity(entity);

        FieldChecks::new(&mut ctx.findings, source.clone(), "operations")
            .min_size(&service.operations, 1)
            .no_duplicates(&service.operations, |o| Some(o.name.clone()), ERROR_DUPLICATE_NAME);

        for op in &service.operations {
            FieldChecks::new(&mut ctx.findings, source.clone(), "operations")
                .valid_xml_name(&op.name);
            check_reference_resolved(model, entity, "operations", &op.extension, ctx);
            let has_payload = op.request.has_local_content()
                || op.response.has_local_content()
                || op.notification.has_local_content()
                || op.extension.is_set();
            if !has_payload {
                FieldChecks::new(&mut ctx.findings, source.clone(), "operations")
                    .error(ERROR_EMPTY_OPERATION, vec![op.name.clone()]);
            }
        }

        let library = model.entity(entity).library();
        let lib = model.library(library);
        if let Ok(scheme) = schemes.get(&lib.version_scheme) {
            // The effective namespace counts: a patch level folds into the
            // declared namespace before the patch test
            let namespace = library_namespace(model, library, schemes);
            if scheme.is_patch_namespace(&namespace) {
                FieldChecks::new(&mut ctx.findings, source.clone(), "name")
                    .error(ERROR_SERVICE_ON_PATCH, vec![namespace]);
            }
        }

        // The service name is fixed across the minor-version chain of its
        // library
        let mut visited = HashSet::from([library]);
        let mut current = library;
        while let Some(prior) = Self::prior_library(model, current, schemes) {
            if !visited.insert(prior) {
                break;
            }
            if let Some(prior_service) = model.library(prior).service() {
                let prior_name = model.entity(prior_service).name();
                if prior_name != model.entity(entity).name() {
                    FieldChecks::new(&mut ctx.findings, source.clone(), "name").error(
                        ERROR_SERVICE_NAME_CHANGED,
                        vec![
                            model.entity(entity).name().to_string(),
                            prior_name.to_string(),
                        ],
                    );
                }
            }
            current = prior;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::Severity;
    use idl_model::{
        Attribute, BusinessObject, ContextualFacet, CoreObject, EnumLiteral, Enumeration,
        FacetType, FieldRef, Library, SimpleType,
    };

    fn contextual_facet(owner: &str, context: &str, member: &str) -> ContextualFacet {
        let mut facet = Facet::new();
        facet.attributes.push(Attribute::new(member, Reference::none()));
        ContextualFacet {
            owner: Reference::to(owner),
            facet_type: FacetType::Custom,
            context: context.to_string(),
            label: None,
            facet,
        }
    }

    fn library(name: &str, namespace: &str, prefix: &str) -> Library {
        Library::new(name, namespace, prefix, "1.0.0", "default")
    }

    fn engine() -> ValidationEngine {
        ValidationEngine::new(Rc::new(SchemeRegistry::new()))
    }

    fn codes(findings: &crate::Findings) -> Vec<&'static str> {
        findings.iter().map(|f| f.code).collect()
    }

    #[test]
    fn test_unknown_scheme_reported_at_library_level() {
        let mut model = Model::new();
        let mut lib = library("orders", "http://example.org/orders/v1", "ord");
        lib.version_scheme = "no-such-scheme".to_string();
        let lib = model.add_library(lib);

        let findings = engine().validate_library(&model, lib);
        assert!(codes(&findings).contains(&ERROR_UNKNOWN_SCHEME));
    }

    #[test]
    fn test_bad_version_identifier_reported() {
        let mut model = Model::new();
        let mut lib = library("orders", "http://example.org/orders/v1", "ord");
        lib.version = "not-a-version".to_string();
        let lib = model.add_library(lib);

        let findings = engine().validate_library(&model, lib);
        assert!(codes(&findings).contains(&ERROR_INVALID_VERSION));
    }

    #[test]
    fn test_simple_bad_pattern() {
        let mut model = Model::new();
        let lib = model.add_library(library("orders", "http://example.org/orders/v1", "ord"));
        let entity = model.add_entity(
            lib,
            "Code",
            EntityData::Simple(SimpleType {
                pattern: Some("[unclosed".to_string()),
                ..SimpleType::default()
            }),
        );

        let findings = engine().validate_entity(&model, entity);
        assert!(codes(&findings).contains(&ERROR_INVALID_PATTERN));
    }

    #[test]
    fn test_unresolved_reference_reported() {
        let mut model = Model::new();
        let lib = model.add_library(library("orders", "http://example.org/orders/v1", "ord"));
        let entity = model.add_entity(
            lib,
            "Code",
            EntityData::Simple(SimpleType {
                parent_type: Reference::to("missing:Type"),
                ..SimpleType::default()
            }),
        );

        let findings = engine().validate_entity(&model, entity);
        assert!(codes(&findings).contains(&ERROR_UNRESOLVED_REFERENCE));
    }

    #[test]
    fn test_empty_enumeration_reported() {
        let mut model = Model::new();
        let lib = model.add_library(library("orders", "http://example.org/orders/v1", "ord"));
        let entity = model.add_entity(
            lib,
            "Status",
            EntityData::ClosedEnumeration(Enumeration::default()),
        );

        let findings = engine().validate_entity(&model, entity);
        assert!(findings.has_severity(Severity::Error));
    }

    #[test]
    fn test_duplicate_enum_literals_reported() {
        let mut model = Model::new();
        let lib = model.add_library(library("orders", "http://example.org/orders/v1", "ord"));
        let literals = vec!["OPEN", "CLOSED", "OPEN"]
            .into_iter()
            .map(|l| EnumLiteral {
                literal: l.to_string(),
                description: None,
            })
            .collect();
        let entity = model.add_entity(
            lib,
            "Status",
            EntityData::OpenEnumeration(Enumeration { literals }),
        );

        let findings = engine().validate_entity(&model, entity);
        assert_eq!(codes(&findings), vec![ERROR_DUPLICATE_NAME]);
    }

    #[test]
    fn test_inherited_member_collision_uses_distinct_code() {
        let mut model = Model::new();
        let lib = model.add_library(library("orders", "http://example.org/orders/v1", "ord"));

        let mut base = CoreObject::default();
        base.summary.attributes.push(Attribute::new("total", Reference::none()));
        let base_id = model.add_entity(lib, "Base", EntityData::CoreObject(base));

        let mut derived = CoreObject::default();
        derived.summary.attributes.push(Attribute::new("total", Reference::none()));
        let derived_id = model.add_entity(lib, "Derived", EntityData::CoreObject(derived));
        model.assign_reference(
            idl_model::FieldRef::Extension { entity: derived_id },
            Some(base_id),
        );

        let findings = engine().validate_entity(&model, derived_id);
        let codes = codes(&findings);
        assert!(codes.contains(&ERROR_NAME_UPA), "{codes:?}");
        // The sibling-duplicate check is separate and stays quiet here
        assert!(!codes.contains(&ERROR_DUPLICATE_NAME));
    }

    #[test]
    fn test_sibling_duplicates_do_not_trigger_inherited_code() {
        let mut model = Model::new();
        let lib = model.add_library(library("orders", "http://example.org/orders/v1", "ord"));

        let mut core = CoreObject::default();
        core.summary.attributes.push(Attribute::new("total", Reference::none()));
        core.summary.attributes.push(Attribute::new("total", Reference::none()));
        let entity = model.add_entity(lib, "Order", EntityData::CoreObject(core));

        let findings = engine().validate_entity(&model, entity);
        let codes = codes(&findings);
        assert!(codes.contains(&ERROR_DUPLICATE_NAME));
        assert!(!codes.contains(&ERROR_NAME_UPA));
    }

    #[test]
    fn test_contextual_facet_inherited_member_collision() {
        let mut model = Model::new();
        let lib = model.add_library(library("orders", "http://example.org/orders/v1", "ord"));

        let base = model.add_entity(lib, "Base", EntityData::BusinessObject(BusinessObject::default()));
        let derived = model.add_entity(lib, "Order", EntityData::BusinessObject(BusinessObject::default()));
        model.assign_reference(FieldRef::Extension { entity: derived }, Some(base));

        let base_cf = model.add_entity(
            lib,
            "Base_Sales",
            EntityData::ContextualFacet(contextual_facet("Base", "Sales", "code")),
        );
        model.assign_reference(FieldRef::ContextualFacetOwner { entity: base_cf }, Some(base));
        let derived_cf = model.add_entity(
            lib,
            "Order_Sales",
            EntityData::ContextualFacet(contextual_facet("Order", "Sales", "code")),
        );
        model.assign_reference(FieldRef::ContextualFacetOwner { entity: derived_cf }, Some(derived));

        let derived_codes = codes(&engine().validate_entity(&model, derived_cf));
        assert!(derived_codes.contains(&ERROR_NAME_UPA), "{derived_codes:?}");
        // The base facet itself has nothing above it to collide with
        assert!(!codes(&engine().validate_entity(&model, base_cf)).contains(&ERROR_NAME_UPA));
    }

    #[test]
    fn test_contextual_facet_other_context_does_not_collide() {
        let mut model = Model::new();
        let lib = model.add_library(library("orders", "http://example.org/orders/v1", "ord"));

        let base = model.add_entity(lib, "Base", EntityData::BusinessObject(BusinessObject::default()));
        let derived = model.add_entity(lib, "Order", EntityData::BusinessObject(BusinessObject::default()));
        model.assign_reference(FieldRef::Extension { entity: derived }, Some(base));

        let base_cf = model.add_entity(
            lib,
            "Base_Audit",
            EntityData::ContextualFacet(contextual_facet("Base", "Audit", "code")),
        );
        model.assign_reference(FieldRef::ContextualFacetOwner { entity: base_cf }, Some(base));
        let derived_cf = model.add_entity(
            lib,
            "Order_Sales",
            EntityData::ContextualFacet(contextual_facet("Order", "Sales", "code")),
        );
        model.assign_reference(FieldRef::ContextualFacetOwner { entity: derived_cf }, Some(derived));

        let findings = engine().validate_entity(&model, derived_cf);
        assert!(!codes(&findings).contains(&ERROR_NAME_UPA));
    }

    #[test]
    fn test_unknown_param_group_reported() {
        let mut model = Model::new();
        let lib = model.add_library(library("orders", "http://example.org/orders/v1", "ord"));
        let bo = model.add_entity(
            lib,
            "Order",
            EntityData::BusinessObject(idl_model::BusinessObject::default()),
        );

        let mut resource = idl_model::Resource::default();
        resource.param_groups.push(idl_model::ParamGroup {
            name: "identifiers".to_string(),
            id_group: true,
        });
        let mut action = idl_model::Action::new("read");
        action.request.param_group_name = Some("no-such-group".to_string());
        resource.actions.push(action);
        let entity = model.add_entity(lib, "OrderResource", EntityData::Resource(resource));
        model.assign_reference(
            idl_model::FieldRef::ResourceBusinessObject { entity },
            Some(bo),
        );

        let findings = engine().validate_entity(&model, entity);
        assert!(codes(&findings).contains(&ERROR_UNKNOWN_PARAM_GROUP));
    }
}

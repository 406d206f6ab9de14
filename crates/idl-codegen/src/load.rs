//! Load-direction transformation: library documents into model entities
//!
//! Loading only builds structure. Every cross-entity reference is left
//! textual; callers run the resolution pass afterwards, and anything
//! still unresolved surfaces through validation. A document is fully
//! parsed and checked before the model is touched, so one bad document
//! never corrupts already-loaded sibling libraries.

use crate::{Error, Result};
use idl_model::{
    Action, ActionFacet, BusinessObject, ContextualFacet, CoreObject, EntityData, EnumLiteral,
    Enumeration, Equivalent, Facet, FacetType, Include, Library, LibraryContext, LibraryId,
    LibraryStatus, Model, NamespaceImport, Operation, ParamGroup, Reference, Resource, Service,
    SimpleType, ValueWithAttributes,
};
use idl_version::DEFAULT_SCHEME;
use serde::Deserialize;
use tracing::debug;

fn default_scheme() -> String {
    DEFAULT_SCHEME.to_string()
}

/// Parsed form of a library document
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseLibrary {
    pub name: String,
    pub namespace: String,
    pub prefix: String,
    pub version: String,
    #[serde(default = "default_scheme")]
    pub version_scheme: String,
    #[serde(default)]
    pub patch_level: Option<String>,
    #[serde(default)]
    pub prior_version_uri: Option<String>,
    #[serde(default)]
    pub status: ParseStatus,
    #[serde(default)]
    pub alternate_credentials_url: Option<String>,
    #[serde(default)]
    pub contexts: Vec<ParseContext>,
    #[serde(default)]
    pub imports: Vec<ParseImport>,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub members: Vec<ParseMember>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParseStatus {
    #[default]
    Draft,
    Final,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseContext {
    pub context_id: String,
    pub application_context: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseImport {
    pub prefix: String,
    pub namespace: String,
    #[serde(default)]
    pub file_hints: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseFacet {
    #[serde(default)]
    pub base_type: Option<String>,
    #[serde(default)]
    pub attributes: Vec<ParseAttribute>,
    #[serde(default)]
    pub elements: Vec<ParseElement>,
    #[serde(default)]
    pub indicators: Vec<ParseIndicator>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseAttribute {
    pub name: String,
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub mandatory: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseElement {
    pub name: String,
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default = "one")]
    pub repeat: u32,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseIndicator {
    pub name: String,
    #[serde(default)]
    pub publish_as_element: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOperation {
    pub name: String,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub request: ParseFacet,
    #[serde(default)]
    pub response: ParseFacet,
    #[serde(default)]
    pub notification: ParseFacet,
    #[serde(default)]
    pub equivalents: Vec<ParseEquivalent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseEquivalent {
    pub context: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseParamGroup {
    pub name: String,
    #[serde(default)]
    pub id_group: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseActionFacet {
    pub name: String,
    #[serde(default)]
    pub base_payload: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseAction {
    pub name: String,
    #[serde(default)]
    pub request_payload: Option<String>,
    #[serde(default)]
    pub response_payload: Option<String>,
    #[serde(default)]
    pub param_group: Option<String>,
}

/// One member declaration of a library document, tagged by kind
///
/// `rename_all` covers the variant tags only; the struct-variant field
/// names need `rename_all_fields` to match document keys like
/// `parentType`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ParseMember {
    Simple {
        name: String,
        #[serde(default)]
        parent_type: Option<String>,
        #[serde(default)]
        pattern: Option<String>,
        #[serde(default)]
        min_length: Option<usize>,
        #[serde(default)]
        max_length: Option<usize>,
    },
    ClosedEnumeration {
        name: String,
        #[serde(default)]
        literals: Vec<String>,
    },
    OpenEnumeration {
        name: String,
        #[serde(default)]
        literals: Vec<String>,
    },
    CoreObject {
        name: String,
        #[serde(default)]
        extension: Option<String>,
        #[serde(default)]
        summary: ParseFacet,
        #[serde(default)]
        detail: ParseFacet,
        #[serde(default)]
        roles: Vec<String>,
    },
    BusinessObject {
        name: String,
        #[serde(default)]
        extension: Option<String>,
        #[serde(default)]
        id: ParseFacet,
        #[serde(default)]
        summary: ParseFacet,
        #[serde(default)]
        detail: ParseFacet,
    },
    ValueWithAttributes {
        name: String,
        #[serde(default)]
        parent_type: Option<String>,
        #[serde(default)]
        value: ParseFacet,
    },
    ContextualFacet {
        name: String,
        owner: String,
        facet_type: ParseContextualFacetType,
        context: String,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        facet: ParseFacet,
    },
    Resource {
        name: String,
        #[serde(default)]
        business_object: Option<String>,
        #[serde(default)]
        parent_resource: Option<String>,
        #[serde(default)]
        param_groups: Vec<ParseParamGroup>,
        #[serde(default)]
        action_facets: Vec<ParseActionFacet>,
        #[serde(default)]
        actions: Vec<ParseAction>,
    },
    Service {
        name: String,
        #[serde(default)]
        operations: Vec<ParseOperation>,
    },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParseContextualFacetType {
    Custom,
    Query,
}

fn reference(name: Option<&String>) -> Reference {
    name.map_or_else(Reference::none, Reference::to)
}

fn facet(parse: &ParseFacet) -> Facet {
    let mut facet = Facet::new();
    facet.base_type = reference(parse.base_type.as_ref());
    for a in &parse.attributes {
        let mut attribute = idl_model::Attribute::new(&a.name, reference(a.type_name.as_ref()));
        attribute.mandatory = a.mandatory;
        facet.attributes.push(attribute);
    }
    for e in &parse.elements {
        let mut element = idl_model::Element::new(&e.name, reference(e.type_name.as_ref()));
        element.mandatory = e.mandatory;
        element.repeat = e.repeat;
        facet.elements.push(element);
    }
    for i in &parse.indicators {
        let mut indicator = idl_model::Indicator::new(&i.name);
        indicator.publish_as_element = i.publish_as_element;
        facet.indicators.push(indicator);
    }
    facet
}

fn member_data(member: &ParseMember) -> (String, EntityData) {
    match member {
        ParseMember::Simple {
            name,
            parent_type,
            pattern,
            min_length,
            max_length,
        } => (
            name.clone(),
            EntityData::Simple(SimpleType {
                parent_type: reference(parent_type.as_ref()),
                pattern: pattern.clone(),
                min_length: *min_length,
                max_length: *max_length,
            }),
        ),
        ParseMember::ClosedEnumeration { name, literals } => (
            name.clone(),
            EntityData::ClosedEnumeration(enumeration(literals)),
        ),
        ParseMember::OpenEnumeration { name, literals } => (
            name.clone(),
            EntityData::OpenEnumeration(enumeration(literals)),
        ),
        ParseMember::CoreObject {
            name,
            extension,
            summary,
            detail,
            roles,
        } => (
            name.clone(),
            EntityData::CoreObject(CoreObject {
                extension: reference(extension.as_ref()),
                summary: facet(summary),
                detail: facet(detail),
                roles: roles.clone(),
            }),
        ),
        ParseMember::BusinessObject {
            name,
            extension,
            id,
            summary,
            detail,
        } => (
            name.clone(),
            EntityData::BusinessObject(BusinessObject {
                extension: reference(extension.as_ref()),
                id: facet(id),
                summary: facet(summary),
                detail: facet(detail),
            }),
        ),
        ParseMember::ValueWithAttributes {
            name,
            parent_type,
            value,
        } => (
            name.clone(),
            EntityData::ValueWithAttributes(ValueWithAttributes {
                parent_type: reference(parent_type.as_ref()),
                value: facet(value),
            }),
        ),
        ParseMember::ContextualFacet {
            name,
            owner,
            facet_type,
            context,
            label,
            facet: parse_facet,
        } => (
            name.clone(),
            EntityData::ContextualFacet(ContextualFacet {
                owner: Reference::to(owner),
                facet_type: match facet_type {
                    ParseContextualFacetType::Custom => FacetType::Custom,
                    ParseContextualFacetType::Query => FacetType::Query,
                },
                context: context.clone(),
                label: label.clone(),
                facet: facet(parse_facet),
            }),
        ),
        ParseMember::Resource {
            name,
            business_object,
            parent_resource,
            param_groups,
            action_facets,
            actions,
        } => {
            let mut resource = Resource {
                business_object: reference(business_object.as_ref()),
                parent_resource: reference(parent_resource.as_ref()),
                ..Resource::default()
            };
            for g in param_groups {
                resource.param_groups.push(ParamGroup {
                    name: g.name.clone(),
                    id_group: g.id_group,
                });
            }
            for f in action_facets {
                resource.action_facets.push(ActionFacet {
                    name: f.name.clone(),
                    base_payload: reference(f.base_payload.as_ref()),
                });
            }
            for a in actions {
                let mut action = Action::new(&a.name);
                action.request.payload_type = reference(a.request_payload.as_ref());
                action.request.param_group_name = a.param_group.clone();
                action.response.payload_type = reference(a.response_payload.as_ref());
                resource.actions.push(action);
            }
            (name.clone(), EntityData::Resource(resource))
        }
        ParseMember::Service { name, .. } => (name.clone(), EntityData::Service(Service::default())),
    }
}

fn enumeration(literals: &[String]) -> Enumeration {
    Enumeration {
        literals: literals
            .iter()
            .map(|l| EnumLiteral {
                literal: l.clone(),
                description: None,
            })
            .collect(),
    }
}

fn operation(parse: &ParseOperation) -> Operation {
    let mut op = Operation::new(&parse.name);
    op.extension = reference(parse.extension.as_ref());
    op.request = facet(&parse.request);
    op.response = facet(&parse.response);
    op.notification = facet(&parse.notification);
    for e in &parse.equivalents {
        op.equivalents.push(Equivalent {
            context: e.context.clone(),
            description: e.description.clone(),
        });
    }
    op
}

/// Load a parsed library document into the model
///
/// The owning library is created first, then every member in declaration
/// order. References stay textual; run the resolution pass afterwards.
///
/// # Errors
///
/// Returns [`Error::Document`] when the document declares more than one
/// service. The model is untouched on error.
pub fn load_library(parse: &ParseLibrary, model: &mut Model) -> Result<LibraryId> {
    let services = parse
        .members
        .iter()
        .filter(|m| matches!(m, ParseMember::Service { .. }))
        .count();
    if services > 1 {
        return Err(Error::Document {
            library: parse.name.clone(),
            reason: format!("{services} services declared, at most one allowed"),
        });
    }

    let mut library = Library::new(
        &parse.name,
        &parse.namespace,
        &parse.prefix,
        &parse.version,
        &parse.version_scheme,
    );
    library.patch_level = parse.patch_level.clone();
    library.prior_version_uri = parse.prior_version_uri.clone();
    library.status = match parse.status {
        ParseStatus::Draft => LibraryStatus::Draft,
        ParseStatus::Final => LibraryStatus::Final,
    };
    library.alternate_credentials_url = parse.alternate_credentials_url.clone();
    for context in &parse.contexts {
        library.contexts.push(LibraryContext {
            context_id: context.context_id.clone(),
            application_context: context.application_context.clone(),
        });
    }
    for import in &parse.imports {
        let mut ns = NamespaceImport::new(&import.prefix, &import.namespace);
        ns.file_hints = import.file_hints.clone();
        library.imports.push(ns);
    }
    for include in &parse.includes {
        library.includes.push(Include {
            path: include.clone(),
        });
    }
    let library = model.add_library(library);

    for member in &parse.members {
        let (name, data) = member_data(member);
        let entity = model.add_entity(library, name, data);
        if let ParseMember::Service { operations, .. } = member {
            for op in operations {
                model.add_operation(entity, operation(op));
            }
        }
    }
    debug!(
        library = %parse.name,
        members = parse.members.len(),
        "library document loaded"
    );
    Ok(library)
}

/// Parse a JSON library document and load it
///
/// # Errors
///
/// Returns [`Error::Load`] for malformed JSON and propagates
/// [`load_library`] errors. The model is untouched on error.
pub fn load_library_json(json: &str, model: &mut Model) -> Result<LibraryId> {
    let parse: ParseLibrary = serde_json::from_str(json)?;
    load_library(&parse, model)
}

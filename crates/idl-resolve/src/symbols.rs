//! Symbol table and qualified-name resolution

use idl_model::{Entity, EntityData, EntityId, LibraryId, Model};
use idl_version::{effective_namespace, SchemeRegistry};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// The effective namespace of a library: its declared namespace with the
/// patch level folded in through its version scheme
///
/// Scheme failures fall back to the declared namespace (the validator
/// reports them).
pub fn library_namespace(model: &Model, library: LibraryId, schemes: &SchemeRegistry) -> String {
    let lib = model.library(library);
    effective_namespace(
        &lib.namespace,
        &lib.version_scheme,
        lib.patch_level.as_deref(),
        schemes,
    )
}

/// Outcome of a symbol lookup
///
/// Unresolved names are data, not errors: a reference that never resolves
/// surfaces later as a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Resolved(EntityId),
    /// The local name exists in more than one candidate namespace; the
    /// lookup fails closed rather than picking arbitrarily
    Ambiguous,
    NotFound,
}

impl Resolution {
    /// The resolved entity, if the lookup succeeded
    pub fn entity(self) -> Option<EntityId> {
        match self {
            Resolution::Resolved(id) => Some(id),
            _ => None,
        }
    }
}

enum SymbolEntry {
    Unique(EntityId),
    /// Two members share a (namespace, local name) key; flagged by
    /// validation, unresolvable here
    Duplicated,
}

/// Index of every addressable library member by (effective namespace,
/// local name)
pub struct SymbolTable {
    entries: HashMap<(String, String), SymbolEntry>,
}

impl SymbolTable {
    /// Build the index over all libraries of a model
    pub fn build(model: &Model, schemes: &SchemeRegistry) -> Self {
        let mut entries: HashMap<(String, String), SymbolEntry> = HashMap::new();
        for (lib_id, lib) in model.libraries() {
            let namespace = library_namespace(model, lib_id, schemes);
            for &member in lib.members() {
                let key = (namespace.clone(), model.entity(member).name().to_string());
                entries
                    .entry(key)
                    .and_modify(|e| *e = SymbolEntry::Duplicated)
                    .or_insert(SymbolEntry::Unique(member));
            }
        }
        Self { entries }
    }

    /// Single-hop lookup by identity key
    pub fn lookup(&self, namespace: &str, local_name: &str) -> Resolution {
        match self
            .entries
            .get(&(namespace.to_string(), local_name.to_string()))
        {
            Some(SymbolEntry::Unique(id)) => Resolution::Resolved(*id),
            Some(SymbolEntry::Duplicated) => Resolution::Ambiguous,
            None => Resolution::NotFound,
        }
    }
}

/// Resolve a possibly prefix-qualified name from the viewpoint of a
/// library
///
/// Prefixed names resolve the prefix through the scope library's own
/// prefix and imports. Unprefixed names search the scope library's own
/// namespace first, then every imported namespace; more than one import
/// hit without a prefix fails closed as [`Resolution::Ambiguous`]. The
/// optional `filter` restricts candidate entities (used for same-file
/// forward references).
pub fn resolve(
    model: &Model,
    table: &SymbolTable,
    scope: LibraryId,
    schemes: &SchemeRegistry,
    name: &str,
    filter: Option<&dyn Fn(&Entity) -> bool>,
) -> Resolution {
    let apply_filter = |resolution: Resolution| match (resolution, filter) {
        (Resolution::Resolved(id), Some(f)) if !f(model.entity(id)) => Resolution::NotFound,
        _ => resolution,
    };

    if let Some((prefix, local)) = name.split_once(':') {
        let scope_lib = model.library(scope);
        let namespace = if prefix == scope_lib.prefix {
            library_namespace(model, scope, schemes)
        } else {
            match scope_lib.namespace_for_prefix(prefix) {
                Some(ns) => ns.to_string(),
                None => return Resolution::NotFound,
            }
        };
        return apply_filter(table.lookup(&namespace, local));
    }

    // Own namespace wins over imports
    let own = table.lookup(&library_namespace(model, scope, schemes), name);
    if !matches!(own, Resolution::NotFound) {
        return apply_filter(own);
    }

    let mut hit = Resolution::NotFound;
    for import in &model.library(scope).imports {
        match table.lookup(&import.namespace, name) {
            Resolution::NotFound => {}
            Resolution::Ambiguous => return Resolution::Ambiguous,
            Resolution::Resolved(id) => {
                if matches!(hit, Resolution::Resolved(_)) {
                    return Resolution::Ambiguous;
                }
                hit = Resolution::Resolved(id);
            }
        }
    }
    apply_filter(hit)
}

/// Build the textual form of a reference from a source entity to a target
/// entity
///
/// `prefix:localName` when the target's effective namespace differs from
/// the source's, bare `localName` otherwise. The prefix comes from the
/// source library's imports, falling back to the target library's own
/// declared prefix when no import matches (that inconsistency surfaces as
/// a validation finding).
pub fn build_reference_name(
    model: &Model,
    schemes: &SchemeRegistry,
    source: EntityId,
    target: EntityId,
) -> String {
    let source_lib = model.entity(source).library();
    let target_lib = model.entity(target).library();
    let local = model.entity(target).name();

    let source_ns = library_namespace(model, source_lib, schemes);
    let target_ns = library_namespace(model, target_lib, schemes);
    if source_ns == target_ns {
        return local.to_string();
    }

    let target_declared = &model.library(target_lib).namespace;
    let source_library = model.library(source_lib);
    let prefix = source_library
        .prefix_for_namespace(&target_ns)
        .or_else(|| source_library.prefix_for_namespace(target_declared))
        .unwrap_or(&model.library(target_lib).prefix);
    format!("{prefix}:{local}")
}

/// The resolved single-parent extension target of an entity, if any
pub fn extension_of(model: &Model, entity: EntityId) -> Option<EntityId> {
    match &model.entity(entity).data {
        EntityData::CoreObject(c) => c.extension.resolved(),
        EntityData::BusinessObject(b) => b.extension.resolved(),
        EntityData::ValueWithAttributes(v) => v.parent_type.resolved(),
        EntityData::Simple(s) => s.parent_type.resolved(),
        _ => None,
    }
}

/// The extension chain starting at an entity (inclusive), following
/// resolved extension edges root-ward
///
/// Guarded by a visited set, so direct (`A → A`) and indirect
/// (`A → B → A`) cycles terminate after one round.
pub fn extension_chain(model: &Model, entity: EntityId) -> Vec<EntityId> {
    let mut chain = Vec::new();
    let mut visited = HashSet::new();
    let mut current = Some(entity);
    while let Some(id) = current {
        if !visited.insert(id) {
            break;
        }
        chain.push(id);
        current = extension_of(model, id);
    }
    chain
}

/// The post-load resolution pass: bind every textual-only reference that
/// now has a unique target
///
/// Binding is silent (no mutation events fire; nothing moved
/// semantically). Names that stay unresolved remain textual-only and are
/// picked up by validation. Returns the number of references bound.
pub fn resolve_model(model: &mut Model, schemes: &SchemeRegistry) -> usize {
    let table = SymbolTable::build(model, schemes);
    let mut bound = 0;
    for field in model.reference_fields() {
        let Some(reference) = model.reference(&field) else {
            continue;
        };
        if reference.resolved().is_some() {
            continue;
        }
        let Some(name) = reference.textual().map(str::to_string) else {
            continue;
        };
        let scope = model.entity(field.source_entity()).library();
        if let Some(target) = resolve(model, &table, scope, schemes, &name, None).entity() {
            model.bind_reference(&field, Some(target));
            bound += 1;
        }
    }
    debug!(bound, "resolution pass complete");
    bound
}

#[cfg(test)]
mod tests {
    use super::*;
    use idl_model::{EntityData, Library, NamespaceImport, SimpleType};

    fn library(name: &str, namespace: &str, prefix: &str) -> Library {
        Library::new(name, namespace, prefix, "1.0.0", "default")
    }

    fn add_simple(model: &mut Model, lib: LibraryId, name: &str) -> EntityId {
        model.add_entity(lib, name, EntityData::Simple(SimpleType::default()))
    }

    #[test]
    fn test_own_namespace_wins_over_imports() {
        let mut model = Model::new();
        let schemes = SchemeRegistry::new();
        let common = model.add_library(library("common", "http://example.org/common/v1", "cmn"));
        let mut orders_lib = library("orders", "http://example.org/orders/v1", "ord");
        orders_lib
            .imports
            .push(NamespaceImport::new("cmn", "http://example.org/common/v1"));
        let orders = model.add_library(orders_lib);

        let shadowed = add_simple(&mut model, common, "Amount");
        let own = add_simple(&mut model, orders, "Amount");

        let table = SymbolTable::build(&model, &schemes);
        assert_eq!(
            resolve(&model, &table, orders, &schemes, "Amount", None),
            Resolution::Resolved(own)
        );
        assert_eq!(
            resolve(&model, &table, orders, &schemes, "cmn:Amount", None),
            Resolution::Resolved(shadowed)
        );
    }

    #[test]
    fn test_unprefixed_ambiguity_fails_closed() {
        let mut model = Model::new();
        let schemes = SchemeRegistry::new();
        let a = model.add_library(library("a", "http://example.org/a/v1", "a"));
        let b = model.add_library(library("b", "http://example.org/b/v1", "b"));
        let mut user_lib = library("user", "http://example.org/user/v1", "usr");
        user_lib.imports.push(NamespaceImport::new("a", "http://example.org/a/v1"));
        user_lib.imports.push(NamespaceImport::new("b", "http://example.org/b/v1"));
        let user = model.add_library(user_lib);

        add_simple(&mut model, a, "Code");
        let in_b = add_simple(&mut model, b, "Code");

        let table = SymbolTable::build(&model, &schemes);
        assert_eq!(
            resolve(&model, &table, user, &schemes, "Code", None),
            Resolution::Ambiguous
        );
        // An explicit prefix disambiguates
        assert_eq!(
            resolve(&model, &table, user, &schemes, "b:Code", None),
            Resolution::Resolved(in_b)
        );
    }

    #[test]
    fn test_unknown_prefix_is_not_found() {
        let mut model = Model::new();
        let schemes = SchemeRegistry::new();
        let lib = model.add_library(library("solo", "http://example.org/solo/v1", "s"));
        add_simple(&mut model, lib, "Thing");

        let table = SymbolTable::build(&model, &schemes);
        assert_eq!(
            resolve(&model, &table, lib, &schemes, "nope:Thing", None),
            Resolution::NotFound
        );
    }

    #[test]
    fn test_filter_restricts_candidates() {
        let mut model = Model::new();
        let schemes = SchemeRegistry::new();
        let lib = model.add_library(library("solo", "http://example.org/solo/v1", "s"));
        add_simple(&mut model, lib, "Thing");

        let table = SymbolTable::build(&model, &schemes);
        let reject_all = |_: &Entity| false;
        assert_eq!(
            resolve(&model, &table, lib, &schemes, "Thing", Some(&reject_all)),
            Resolution::NotFound
        );
    }

    #[test]
    fn test_reference_name_same_namespace_is_bare() {
        let mut model = Model::new();
        let schemes = SchemeRegistry::new();
        let lib = model.add_library(library("solo", "http://example.org/solo/v1", "s"));
        let a = add_simple(&mut model, lib, "A");
        let b = add_simple(&mut model, lib, "B");
        assert_eq!(build_reference_name(&model, &schemes, a, b), "B");
    }

    #[test]
    fn test_reference_name_cross_namespace_uses_import_prefix() {
        let mut model = Model::new();
        let schemes = SchemeRegistry::new();
        let common = model.add_library(library("common", "http://example.org/common/v1", "cmn"));
        let mut orders_lib = library("orders", "http://example.org/orders/v1", "ord");
        orders_lib
            .imports
            .push(NamespaceImport::new("c2", "http://example.org/common/v1"));
        let orders = model.add_library(orders_lib);

        let target = add_simple(&mut model, common, "Amount");
        let source = add_simple(&mut model, orders, "Order");

        // The source library's import prefix wins over the target's own prefix
        assert_eq!(
            build_reference_name(&model, &schemes, source, target),
            "c2:Amount"
        );
    }

    #[test]
    fn test_reference_name_falls_back_to_target_prefix() {
        let mut model = Model::new();
        let schemes = SchemeRegistry::new();
        let common = model.add_library(library("common", "http://example.org/common/v1", "cmn"));
        let orders = model.add_library(library("orders", "http://example.org/orders/v1", "ord"));

        let target = add_simple(&mut model, common, "Amount");
        let source = add_simple(&mut model, orders, "Order");

        assert_eq!(
            build_reference_name(&model, &schemes, source, target),
            "cmn:Amount"
        );
    }
}

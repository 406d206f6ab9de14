//! The validator registry and per-run validation context

use crate::findings::Findings;
use crate::rules;
use idl_model::{EntityId, EntityKind, LibraryId, Model};
use idl_version::SchemeRegistry;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// Per-run state shared by validators: the findings sink plus a memo
/// cache for repeated per-target computations
///
/// Cache keys are built from (namespace, local name, computation tag) so
/// repeated validations of sibling fields reuse one inherited-member
/// walk.
pub struct ValidationContext {
    pub findings: Findings,
    cache: HashMap<String, Rc<Vec<String>>>,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self {
            findings: Findings::new(),
            cache: HashMap::new(),
        }
    }

    /// Build a cache key for a per-target computation
    pub fn cache_key(namespace: &str, local_name: &str, tag: &str) -> String {
        format!("{namespace}|{local_name}|{tag}")
    }

    /// Return the cached value for `key`, computing and storing it on the
    /// first request
    pub fn cached(&mut self, key: String, compute: impl FnOnce() -> Vec<String>) -> Rc<Vec<String>> {
        if let Some(hit) = self.cache.get(&key) {
            debug!(%key, "validation cache hit");
            return Rc::clone(hit);
        }
        let value = Rc::new(compute());
        self.cache.insert(key, Rc::clone(&value));
        value
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A validator for one entity kind
///
/// `validate_fields` asserts local rules; `validate_children` recurses
/// into owned sub-elements where the kind has any.
pub trait EntityValidator {
    fn validate_fields(
        &self,
        model: &Model,
        entity: EntityId,
        schemes: &SchemeRegistry,
        ctx: &mut ValidationContext,
    );

    fn validate_children(
        &self,
        _model: &Model,
        _entity: EntityId,
        _schemes: &SchemeRegistry,
        _ctx: &mut ValidationContext,
    ) {
    }
}

/// Open registry mapping entity kinds to validators
pub struct ValidationEngine {
    schemes: Rc<SchemeRegistry>,
    validators: HashMap<EntityKind, Box<dyn EntityValidator>>,
}

impl ValidationEngine {
    /// An engine with the built-in validator set registered
    pub fn new(schemes: Rc<SchemeRegistry>) -> Self {
        let mut engine = Self {
            schemes,
            validators: HashMap::new(),
        };
        rules::register_builtin_validators(&mut engine);
        engine
    }

    /// Register (or replace) the validator for an entity kind
    pub fn register(&mut self, kind: EntityKind, validator: Box<dyn EntityValidator>) {
        self.validators.insert(kind, validator);
    }

    /// Validate a library and all of its members
    pub fn validate_library(&self, model: &Model, library: LibraryId) -> Findings {
        let mut ctx = ValidationContext::new();
        rules::validate_library_fields(model, library, &self.schemes, &mut ctx);
        for &member in model.library(library).members() {
            self.dispatch(model, member, &mut ctx);
        }
        ctx.findings
    }

    /// Validate every library in a model
    pub fn validate_model(&self, model: &Model) -> Findings {
        let mut findings = Findings::new();
        let libraries: Vec<LibraryId> = model.libraries().map(|(id, _)| id).collect();
        for library in libraries {
            findings.merge(self.validate_library(model, library));
        }
        findings
    }

    /// Validate a single entity
    pub fn validate_entity(&self, model: &Model, entity: EntityId) -> Findings {
        let mut ctx = ValidationContext::new();
        self.dispatch(model, entity, &mut ctx);
        ctx.findings
    }

    fn dispatch(&self, model: &Model, entity: EntityId, ctx: &mut ValidationContext) {
        let kind = model.entity(entity).kind();
        let validator = self
            .validators
            .get(&kind)
            .unwrap_or_else(|| panic!("no validator registered for entity kind {kind:?}"));
        validator.validate_fields(model, entity, &self.schemes, ctx);
        validator.validate_children(model, entity, &self.schemes, ctx);
    }
}

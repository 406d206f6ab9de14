//! Library container types

use crate::EntityId;

/// Publication status of a library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LibraryStatus {
    /// Under development; structural changes are unrestricted
    #[default]
    Draft,
    /// Published; structural changes are version-rule constrained
    Final,
}

/// A namespace import declared by a library
///
/// Maps a prefix to a namespace URI, optionally with file location hints
/// for the documents that declare that namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceImport {
    pub prefix: String,
    pub namespace: String,
    pub file_hints: Vec<String>,
}

impl NamespaceImport {
    /// Create an import with no file hints
    pub fn new(prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            namespace: namespace.into(),
            file_hints: Vec::new(),
        }
    }
}

/// A local file include
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
    pub path: String,
}

/// A named documentation/equivalence scoping label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryContext {
    pub context_id: String,
    pub application_context: String,
}

/// A named, namespaced container of declarations
///
/// The declared `namespace` already carries the library's version encoding;
/// the effective namespace additionally folds in the patch level through
/// the library's version scheme (see the version-scheme crate).
#[derive(Debug, Clone)]
pub struct Library {
    pub name: String,
    pub namespace: String,
    pub prefix: String,
    /// Version identifier, e.g. `"1.2.0"`
    pub version: String,
    /// Identifier of the version scheme this library declares
    pub version_scheme: String,
    /// Patch level applied on top of the declared namespace; `None` or
    /// `"0"` leaves the namespace unchanged
    pub patch_level: Option<String>,
    pub status: LibraryStatus,
    pub prior_version_uri: Option<String>,
    pub alternate_credentials_url: Option<String>,
    pub contexts: Vec<LibraryContext>,
    pub imports: Vec<NamespaceImport>,
    pub includes: Vec<Include>,
    pub(crate) members: Vec<EntityId>,
    pub(crate) service: Option<EntityId>,
}

impl Library {
    /// Create an empty library with the given identity
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        prefix: impl Into<String>,
        version: impl Into<String>,
        version_scheme: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            prefix: prefix.into(),
            version: version.into(),
            version_scheme: version_scheme.into(),
            patch_level: None,
            status: LibraryStatus::Draft,
            prior_version_uri: None,
            alternate_credentials_url: None,
            contexts: Vec::new(),
            imports: Vec::new(),
            includes: Vec::new(),
            members: Vec::new(),
            service: None,
        }
    }

    /// Ordered member entities owned by this library
    pub fn members(&self) -> &[EntityId] {
        &self.members
    }

    /// The library's service member, if one is declared
    pub fn service(&self) -> Option<EntityId> {
        self.service
    }

    /// Look up the namespace an import prefix maps to
    pub fn namespace_for_prefix(&self, prefix: &str) -> Option<&str> {
        if prefix == self.prefix {
            return Some(&self.namespace);
        }
        self.imports
            .iter()
            .find(|i| i.prefix == prefix)
            .map(|i| i.namespace.as_str())
    }

    /// Look up the import prefix declared for a namespace
    pub fn prefix_for_namespace(&self, namespace: &str) -> Option<&str> {
        self.imports
            .iter()
            .find(|i| i.namespace == namespace)
            .map(|i| i.prefix.as_str())
    }
}

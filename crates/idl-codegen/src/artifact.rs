//! Format-neutral artifact trees
//!
//! Every transformer produces [`ArtifactNode`]s instead of text. A node
//! is a named, attributed tree element; the concrete XSD, WSDL, or
//! JSON-schema grammar is applied by whatever serializes the tree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One element of a generated artifact tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactNode {
    /// Element kind in the target grammar (e.g. `complexType`, `operation`)
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ArtifactNode>,
}

impl ArtifactNode {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            attributes: BTreeMap::new(),
            value: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn child(mut self, child: ArtifactNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: ArtifactNode) {
        self.children.push(child);
    }

    /// First direct child of the given kind
    pub fn find_child(&self, kind: &str) -> Option<&ArtifactNode> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// All direct children of the given kind
    pub fn find_children<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a ArtifactNode> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    /// First node of the given kind and name anywhere in the tree
    pub fn find_descendant(&self, kind: &str, name: &str) -> Option<&ArtifactNode> {
        if self.kind == kind && self.name == name {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|c| c.find_descendant(kind, name))
    }
}

/// A generated document: a filename policy outcome plus the artifact root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactDocument {
    pub filename: String,
    pub root: ArtifactNode,
}

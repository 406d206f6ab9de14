#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # idl-version
//!
//! Pluggable major/minor/patch version schemes for schema libraries.
//!
//! A scheme knows how to extract a version identifier from a namespace
//! URI, rewrite a namespace to carry a different version, and compare two
//! identifiers. The patch-level namespace adjustment used downstream
//! deliberately swallows scheme failures: the unpatched namespace is used
//! and the authoritative error is raised later by the validator that
//! checks version-scheme validity.

pub mod scheme;

pub use scheme::{DefaultVersionScheme, SchemeRegistry, VersionScheme, DEFAULT_SCHEME};

use thiserror::Error;

/// Errors that can occur when working with version schemes
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown version scheme: {0}")]
    UnknownScheme(String),

    #[error("Malformed version identifier: {0}")]
    MalformedVersion(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Parse a version identifier such as `"1.2.0"`
///
/// Identifiers with fewer than three components are padded with zeros, so
/// `"1.2"` parses as `1.2.0`.
///
/// # Errors
///
/// Returns [`Error::MalformedVersion`] when the identifier is not a
/// dotted sequence of up to three non-negative integers.
pub fn parse_identifier(identifier: &str) -> Result<semver::Version> {
    let malformed = || Error::MalformedVersion(identifier.to_string());
    let mut parts = identifier.split('.');
    let mut component = |required: bool| -> Result<u64> {
        match parts.next() {
            Some(p) => p.parse::<u64>().map_err(|_| malformed()),
            None if required => Err(malformed()),
            None => Ok(0),
        }
    };
    let major = component(true)?;
    let minor = component(false)?;
    let patch = component(false)?;
    if parts.next().is_some() {
        return Err(malformed());
    }
    Ok(semver::Version::new(major, minor, patch))
}

/// Compute the effective namespace of a library given its declared
/// namespace, scheme, and patch level
///
/// A non-empty, non-`"0"` patch level rewrites the namespace's version
/// component to carry the patch. Unknown schemes, namespaces without a
/// decodable version, and malformed patch levels all leave the declared
/// namespace unchanged; the inconsistency surfaces as a validation
/// finding, never as an error here.
pub fn effective_namespace(
    namespace: &str,
    scheme_id: &str,
    patch_level: Option<&str>,
    registry: &SchemeRegistry,
) -> String {
    let Some(patch) = patch_level else {
        return namespace.to_string();
    };
    if patch.is_empty() || patch == "0" {
        return namespace.to_string();
    }
    let Ok(scheme) = registry.get(scheme_id) else {
        return namespace.to_string();
    };
    let Ok(patch) = patch.parse::<u64>() else {
        return namespace.to_string();
    };
    let Some(mut version) = scheme.version_of(namespace) else {
        return namespace.to_string();
    };
    version.patch = patch;
    scheme.set_version(namespace, &version)
}

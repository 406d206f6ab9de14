//! Version scheme strategies and the scheme registry

use crate::{Error, Result};
use semver::Version;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Identifier of the built-in scheme
pub const DEFAULT_SCHEME: &str = "default";

/// A pluggable major/minor/patch version strategy tied to a library's
/// namespace encoding
pub trait VersionScheme {
    /// Extract the version encoded in a namespace URI, if any
    fn version_of(&self, namespace: &str) -> Option<Version>;

    /// Rewrite a namespace URI to carry the given version
    ///
    /// Any existing version component is replaced; a namespace without one
    /// gets the component appended.
    fn set_version(&self, namespace: &str, version: &Version) -> String;

    /// True when the namespace denotes a patch version
    fn is_patch_namespace(&self, namespace: &str) -> bool {
        self.version_of(namespace).is_some_and(|v| v.patch != 0)
    }

    /// True when the identifier is well-formed under this scheme
    fn is_valid_identifier(&self, identifier: &str) -> bool;

    /// Compare two version identifiers for dominance
    ///
    /// `None` when either identifier is malformed.
    fn compare(&self, a: &str, b: &str) -> Option<Ordering>;

    /// The namespace of the immediately prior minor version, or `None`
    /// when the namespace is already at minor zero (or carries no version)
    fn prior_minor_version(&self, namespace: &str) -> Option<String>;
}

/// The built-in scheme: versions are encoded as a trailing
/// `/v{major}[_{minor}[_{patch}]]` path component, with zero components
/// elided right-to-left
///
/// `http://example.org/orders/v1` is 1.0.0, `.../v1_2` is 1.2.0, and
/// `.../v1_2_3` is the patch version 1.2.3.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultVersionScheme;

impl DefaultVersionScheme {
    /// Split a namespace into its base and version component, if the
    /// trailing path component is a well-formed version
    fn split(namespace: &str) -> Option<(&str, Version)> {
        let slash = namespace.rfind('/')?;
        let component = &namespace[slash + 1..];
        let digits = component.strip_prefix('v')?;
        let mut parts = digits.split('_');
        let major = parts.next()?.parse::<u64>().ok()?;
        let minor = match parts.next() {
            Some(p) => p.parse::<u64>().ok()?,
            None => 0,
        };
        let patch = match parts.next() {
            Some(p) => p.parse::<u64>().ok()?,
            None => 0,
        };
        if parts.next().is_some() {
            return None;
        }
        Some((&namespace[..slash], Version::new(major, minor, patch)))
    }

    fn encode(version: &Version) -> String {
        if version.patch != 0 {
            format!("v{}_{}_{}", version.major, version.minor, version.patch)
        } else if version.minor != 0 {
            format!("v{}_{}", version.major, version.minor)
        } else {
            format!("v{}", version.major)
        }
    }
}

impl VersionScheme for DefaultVersionScheme {
    fn version_of(&self, namespace: &str) -> Option<Version> {
        Self::split(namespace).map(|(_, v)| v)
    }

    fn set_version(&self, namespace: &str, version: &Version) -> String {
        let base = Self::split(namespace)
            .map_or(namespace, |(base, _)| base)
            .trim_end_matches('/');
        format!("{}/{}", base, Self::encode(version))
    }

    fn is_valid_identifier(&self, identifier: &str) -> bool {
        crate::parse_identifier(identifier).is_ok()
    }

    fn compare(&self, a: &str, b: &str) -> Option<Ordering> {
        let a = crate::parse_identifier(a).ok()?;
        let b = crate::parse_identifier(b).ok()?;
        Some(a.cmp(&b))
    }

    fn prior_minor_version(&self, namespace: &str) -> Option<String> {
        let (_, version) = Self::split(namespace)?;
        if version.minor == 0 {
            return None;
        }
        let prior = Version::new(version.major, version.minor - 1, 0);
        Some(self.set_version(namespace, &prior))
    }
}

/// Registry mapping scheme identifiers to strategies
pub struct SchemeRegistry {
    schemes: HashMap<String, Box<dyn VersionScheme>>,
}

impl SchemeRegistry {
    /// A registry with the built-in scheme registered
    pub fn new() -> Self {
        let mut registry = Self {
            schemes: HashMap::new(),
        };
        registry.register(DEFAULT_SCHEME, Box::new(DefaultVersionScheme));
        registry
    }

    /// Register (or replace) a scheme under an identifier
    pub fn register(&mut self, id: impl Into<String>, scheme: Box<dyn VersionScheme>) {
        self.schemes.insert(id.into(), scheme);
    }

    /// Look up a scheme by identifier
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownScheme`] for unregistered identifiers.
    pub fn get(&self, id: &str) -> Result<&dyn VersionScheme> {
        self.schemes
            .get(id)
            .map(Box::as_ref)
            .ok_or_else(|| Error::UnknownScheme(id.to_string()))
    }
}

impl Default for SchemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_of() {
        let scheme = DefaultVersionScheme;
        assert_eq!(
            scheme.version_of("http://example.org/orders/v1"),
            Some(Version::new(1, 0, 0))
        );
        assert_eq!(
            scheme.version_of("http://example.org/orders/v1_2"),
            Some(Version::new(1, 2, 0))
        );
        assert_eq!(
            scheme.version_of("http://example.org/orders/v1_2_3"),
            Some(Version::new(1, 2, 3))
        );
        assert_eq!(scheme.version_of("http://example.org/orders"), None);
        assert_eq!(scheme.version_of("http://example.org/orders/v1_2_3_4"), None);
    }

    #[test]
    fn test_set_version_replaces_component() {
        let scheme = DefaultVersionScheme;
        assert_eq!(
            scheme.set_version("http://example.org/orders/v1_2", &Version::new(1, 2, 3)),
            "http://example.org/orders/v1_2_3"
        );
        assert_eq!(
            scheme.set_version("http://example.org/orders", &Version::new(2, 0, 0)),
            "http://example.org/orders/v2"
        );
    }

    #[test]
    fn test_patch_round_trip() {
        // Encode (1,2) + patch 3, decode back to (1,2,3)
        let scheme = DefaultVersionScheme;
        let base = scheme.set_version("http://example.org/orders", &Version::new(1, 2, 0));
        assert_eq!(base, "http://example.org/orders/v1_2");

        let patched = scheme.set_version(&base, &Version::new(1, 2, 3));
        assert_eq!(scheme.version_of(&patched), Some(Version::new(1, 2, 3)));
        assert!(scheme.is_patch_namespace(&patched));
        assert!(!scheme.is_patch_namespace(&base));
    }

    #[test]
    fn test_compare_identifiers() {
        let scheme = DefaultVersionScheme;
        assert_eq!(scheme.compare("1.2.0", "1.10.0"), Some(Ordering::Less));
        assert_eq!(scheme.compare("2.0.0", "1.9.9"), Some(Ordering::Greater));
        assert_eq!(scheme.compare("1.2.3", "1.2.3"), Some(Ordering::Equal));
        assert_eq!(scheme.compare("bogus", "1.0.0"), None);
    }

    #[test]
    fn test_prior_minor_version() {
        let scheme = DefaultVersionScheme;
        assert_eq!(
            scheme.prior_minor_version("http://example.org/orders/v1_2"),
            Some("http://example.org/orders/v1_1".to_string())
        );
        assert_eq!(
            scheme.prior_minor_version("http://example.org/orders/v1_1"),
            Some("http://example.org/orders/v1".to_string())
        );
        assert_eq!(scheme.prior_minor_version("http://example.org/orders/v1"), None);
        assert_eq!(scheme.prior_minor_version("http://example.org/orders"), None);
    }

    #[test]
    fn test_registry_lookup() {
        let registry = SchemeRegistry::new();
        assert!(registry.get(DEFAULT_SCHEME).is_ok());
        assert!(matches!(
            registry.get("nope"),
            Err(Error::UnknownScheme(_))
        ));
    }
}

//! Field-level assertion vocabulary
//!
//! A [`FieldChecks`] is built against one (element identity, field) pair
//! and composes assertions into the findings collection. Codes are stable
//! identifiers consumed by callers; message parameters carry the
//! offending values.

use crate::findings::{Finding, Findings, Severity};
use regex::Regex;

pub const ERROR_NULL: &str = "null-value";
pub const ERROR_BLANK: &str = "blank-value";
pub const ERROR_INVALID_NAME: &str = "invalid-name";
pub const ERROR_MIN_SIZE: &str = "min-size";
pub const ERROR_NULL_ELEMENT: &str = "null-element";
pub const ERROR_DUPLICATE_NAME: &str = "duplicate-name";
/// Inherited-member duplicates are an independently-triggerable check
/// with its own code, never merged with [`ERROR_DUPLICATE_NAME`]
pub const ERROR_NAME_UPA: &str = "name-upa";
pub const ERROR_UNRESOLVED_REFERENCE: &str = "unresolved-reference";
pub const ERROR_INVALID_PATTERN: &str = "invalid-pattern";
pub const ERROR_INVALID_VERSION: &str = "invalid-version-identifier";
pub const ERROR_UNKNOWN_SCHEME: &str = "unknown-version-scheme";
pub const ERROR_SERVICE_NAME_CHANGED: &str = "service-name-changed";
pub const ERROR_SERVICE_ON_PATCH: &str = "service-on-patch-version";
pub const ERROR_UNKNOWN_PARAM_GROUP: &str = "unknown-param-group";
pub const ERROR_EMPTY_OPERATION: &str = "empty-operation";

/// The fixed "valid XML name" pattern applied to every declared name
const XML_NAME_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_.\-]*$";

/// Assertion builder bound to one element identity and field
pub struct FieldChecks<'a> {
    findings: &'a mut Findings,
    source: String,
    field: &'static str,
}

impl<'a> FieldChecks<'a> {
    pub fn new(findings: &'a mut Findings, source: impl Into<String>, field: &'static str) -> Self {
        Self {
            findings,
            source: source.into(),
            field,
        }
    }

    fn finding(&mut self, severity: Severity, code: &'static str, params: Vec<String>) {
        self.findings.add(Finding {
            severity,
            source: self.source.clone(),
            field: self.field,
            code,
            params,
        });
    }

    /// Record an error finding directly
    ///
    /// For rule outcomes that are not simple assertions over one value.
    pub fn error(&mut self, code: &'static str, params: Vec<String>) -> &mut Self {
        self.finding(Severity::Error, code, params);
        self
    }

    /// Record a warning finding directly
    pub fn warning(&mut self, code: &'static str, params: Vec<String>) -> &mut Self {
        self.finding(Severity::Warning, code, params);
        self
    }

    /// Assert the value is present
    pub fn not_null<T>(&mut self, value: Option<&T>) -> &mut Self {
        if value.is_none() {
            self.finding(Severity::Error, ERROR_NULL, Vec::new());
        }
        self
    }

    /// Assert the value is present and not blank
    pub fn not_null_or_blank(&mut self, value: Option<&str>) -> &mut Self {
        match value {
            None => self.finding(Severity::Error, ERROR_NULL, Vec::new()),
            Some(v) if v.trim().is_empty() => {
                self.finding(Severity::Error, ERROR_BLANK, Vec::new());
            }
            Some(_) => {}
        }
        self
    }

    /// Assert the value matches the fixed valid-XML-name pattern
    pub fn valid_xml_name(&mut self, value: &str) -> &mut Self {
        let pattern = Regex::new(XML_NAME_PATTERN).expect("name pattern is well-formed");
        if !pattern.is_match(value) {
            self.finding(Severity::Error, ERROR_INVALID_NAME, vec![value.to_string()]);
        }
        self
    }

    /// Assert a minimum collection size
    pub fn min_size<T>(&mut self, items: &[T], min: usize) -> &mut Self {
        if items.len() < min {
            self.finding(
                Severity::Error,
                ERROR_MIN_SIZE,
                vec![min.to_string(), items.len().to_string()],
            );
        }
        self
    }

    /// Assert a collection has no absent entries
    pub fn no_null_elements<T>(&mut self, items: &[Option<T>]) -> &mut Self {
        let absent = items.iter().filter(|i| i.is_none()).count();
        if absent > 0 {
            self.finding(Severity::Error, ERROR_NULL_ELEMENT, vec![absent.to_string()]);
        }
        self
    }

    /// Assert no two items share an identity key
    ///
    /// The caller supplies the identity resolver (e.g. "compare by local
    /// name" for sibling facet members) and the code to report under.
    /// Exactly one finding is recorded per duplicated key, regardless of
    /// how many extra occurrences exist.
    pub fn no_duplicates<T>(
        &mut self,
        items: &[T],
        key: impl Fn(&T) -> Option<String>,
        code: &'static str,
    ) -> &mut Self {
        let mut seen: Vec<String> = Vec::new();
        let mut reported: Vec<String> = Vec::new();
        for item in items {
            let Some(k) = key(item) else { continue };
            if seen.contains(&k) {
                if !reported.contains(&k) {
                    self.finding(Severity::Error, code, vec![k.clone()]);
                    reported.push(k);
                }
            } else {
                seen.push(k);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::MessageFormat;

    fn checks(findings: &mut Findings) -> FieldChecks<'_> {
        FieldChecks::new(findings, "lib/Entity", "name")
    }

    #[test]
    fn test_not_null_or_blank() {
        let mut findings = Findings::new();
        checks(&mut findings)
            .not_null_or_blank(Some("ok"))
            .not_null_or_blank(Some("   "))
            .not_null_or_blank(None);
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn test_valid_xml_name() {
        let mut findings = Findings::new();
        checks(&mut findings)
            .valid_xml_name("OrderSummary")
            .valid_xml_name("_internal")
            .valid_xml_name("9starts-with-digit")
            .valid_xml_name("has space");
        assert_eq!(findings.len(), 2);
        assert!(findings
            .messages(MessageFormat::Plain)
            .iter()
            .all(|m| m.contains(ERROR_INVALID_NAME)));
    }

    #[test]
    fn test_min_size() {
        let mut findings = Findings::new();
        checks(&mut findings).min_size(&["a"], 1).min_size::<&str>(&[], 1);
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_no_null_elements() {
        let mut findings = Findings::new();
        checks(&mut findings).no_null_elements(&[Some(1), None, Some(3), None]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings.iter().next().unwrap().params, vec!["2"]);
    }

    #[test]
    fn test_no_duplicates_one_finding_per_key() {
        let mut findings = Findings::new();
        let items = ["a", "b", "a", "a", "b", "c"];
        checks(&mut findings).no_duplicates(
            &items,
            |i| Some((*i).to_string()),
            ERROR_DUPLICATE_NAME,
        );
        // "a" and "b" each reported exactly once
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn test_no_duplicates_distinct_names_clean() {
        let mut findings = Findings::new();
        let items = ["a", "b", "c"];
        checks(&mut findings).no_duplicates(
            &items,
            |i| Some((*i).to_string()),
            ERROR_DUPLICATE_NAME,
        );
        assert!(findings.is_empty());
    }
}

//! Findings: the accumulated output of validation

/// Severity of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Rule violation; callers typically block code generation on these
    Error,
    /// Issue worth reporting but not blocking
    Warning,
}

/// Output format for rendered finding messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    /// Field, code, and parameters only
    Plain,
    /// Prefixed with the offending element's validation identity
    Identified,
}

/// A single severity-tagged, field-scoped finding
#[derive(Debug, Clone)]
pub struct Finding {
    pub severity: Severity,
    /// Validation identity of the offending element (owning-library
    /// identity plus local name)
    pub source: String,
    /// The field the rule applies to
    pub field: &'static str,
    /// Stable rule code
    pub code: &'static str,
    /// Message parameters (offending values, limits, names)
    pub params: Vec<String>,
}

impl Finding {
    /// Render the finding in the requested format
    pub fn message(&self, format: MessageFormat) -> String {
        let mut message = format!("{}: {}", self.field, self.code);
        if !self.params.is_empty() {
            message.push_str(&format!(" ({})", self.params.join(", ")));
        }
        match format {
            MessageFormat::Plain => message,
            MessageFormat::Identified => format!("[{}] {}", self.source, message),
        }
    }
}

/// An accumulated collection of findings
#[derive(Debug, Clone, Default)]
pub struct Findings {
    items: Vec<Finding>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finding
    pub fn add(&mut self, finding: Finding) {
        self.items.push(finding);
    }

    /// Move all findings from another collection into this one
    pub fn merge(&mut self, mut other: Findings) {
        self.items.append(&mut other.items);
    }

    /// True when any finding was recorded
    pub fn has_findings(&self) -> bool {
        !self.items.is_empty()
    }

    /// True when a finding of the given severity was recorded
    pub fn has_severity(&self, severity: Severity) -> bool {
        self.items.iter().any(|f| f.severity == severity)
    }

    /// Number of findings of the given severity
    pub fn count_of(&self, severity: Severity) -> usize {
        self.items.iter().filter(|f| f.severity == severity).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Finding> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Render every finding in the requested format
    pub fn messages(&self, format: MessageFormat) -> Vec<String> {
        self.items.iter().map(|f| f.message(format)).collect()
    }
}

impl<'a> IntoIterator for &'a Findings {
    type Item = &'a Finding;
    type IntoIter = std::slice::Iter<'a, Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

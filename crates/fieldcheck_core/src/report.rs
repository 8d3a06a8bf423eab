//! Error records and validation reports.

use crate::Constraint;
use serde::Serialize;
use std::fmt;

/// One failed check on one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorRecord {
    /// Field name, or `disallowExtraFields` for the extra-fields check
    pub field: String,

    /// Failed constraint
    pub constraint: Constraint,

    /// Generated default text, or the custom message
    pub message: String,

    /// Whether `message` came from a custom message table
    pub is_custom: bool,
}

impl ErrorRecord {
    /// Creates a record with a generated message.
    pub fn new(field: impl Into<String>, constraint: Constraint, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            constraint,
            message: message.into(),
            is_custom: false,
        }
    }

    /// Creates a record with a custom message.
    pub fn custom(field: impl Into<String>, constraint: Constraint, message: impl Into<String>) -> Self {
        Self {
            is_custom: true,
            ..Self::new(field, constraint, message)
        }
    }
}

/// Request section a schema applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Url,
    Query,
    Body,
}

impl Section {
    /// Label prefixed to generated messages.
    pub fn label(&self) -> &'static str {
        match self {
            Section::Url => "Url",
            Section::Query => "Query",
            Section::Body => "Body",
        }
    }

    /// Whether inputs of this section come from the URL.
    ///
    /// URL-sourced array fields accept comma-separated strings.
    pub fn is_from_url(&self) -> bool {
        matches!(self, Section::Url | Section::Query)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An error record tagged with its section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionError {
    pub section: Section,
    pub record: ErrorRecord,
}

impl SectionError {
    /// Returns the final message: `"<Section>: <text>"` for generated
    /// messages, the text alone for custom ones.
    pub fn message(&self) -> String {
        if self.record.is_custom {
            self.record.message.clone()
        } else {
            format!("{}: {}", self.section.label(), self.record.message)
        }
    }
}

impl fmt::Display for SectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Outcome of validating one request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// Whether no section produced errors
    pub passed: bool,

    /// Errors in section order (url, query, body)
    pub errors: Vec<SectionError>,

    /// Validation statistics
    pub stats: ValidationStats,
}

/// Statistics about one validation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationStats {
    /// Number of sections that had a schema
    pub sections_validated: usize,

    /// Number of fields whose rule compiled and ran
    pub fields_checked: usize,

    /// Number of schema entries without a usable rule
    pub fields_skipped: usize,

    /// Validation duration in milliseconds
    pub duration_ms: u64,
}

impl ValidationReport {
    /// Creates a passing report without errors.
    pub fn success() -> Self {
        Self {
            passed: true,
            ..Self::default()
        }
    }

    /// Adds the records produced for one section.
    pub fn extend(&mut self, section: Section, records: impl IntoIterator<Item = ErrorRecord>) {
        self.errors
            .extend(records.into_iter().map(|record| SectionError { section, record }));
        self.passed = self.errors.is_empty();
    }

    /// Returns the final messages in order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(SectionError::message).collect()
    }
}

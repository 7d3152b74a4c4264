//! Structured validation issues
//!
//! Batch-context callers (spreadsheet row validators, data-model
//! validators) catch identifier errors and convert them into an issue list
//! instead of aborting on the first failure, so a user sees every problem
//! in one pass.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{NeatError, Result};

/// Severity level for validation issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IssueSeverity {
    /// Informational message
    Info,
    /// Warning that doesn't prevent processing
    Warning,
    /// Error that prevents successful processing
    Error,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// A single validation issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Severity level
    pub severity: IssueSeverity,
    /// Human-readable message, suitable for direct surfacing
    pub message: String,
    /// Canonical form of the identifier the issue concerns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Field that failed, when the issue is a pattern violation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Offending value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// The pattern that was violated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Additional context, e.g. row/column location
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, String>,
}

impl Issue {
    /// Create a new issue
    pub fn new(severity: IssueSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            identifier: None,
            field: None,
            value: None,
            pattern: None,
            context: HashMap::new(),
        }
    }

    /// Convert an identifier error into an issue, carrying over its
    /// structured content
    #[must_use]
    pub fn from_error(error: &NeatError) -> Self {
        let mut issue = Self::new(IssueSeverity::Error, error.to_string());
        match error {
            NeatError::PatternViolation {
                field,
                value,
                pattern,
            } => {
                issue.field = Some((*field).to_string());
                issue.value = Some(value.clone());
                issue.pattern = Some((*pattern).to_string());
            }
            NeatError::UnresolvedSpace { entity } | NeatError::UnresolvedVersion { entity } => {
                issue.identifier = Some(entity.clone());
            }
            _ => {}
        }
        issue
    }

    /// Set the identifier this issue concerns
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Set the failing field
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set the offending value
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the violated pattern
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Add context information
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)?;

        if let Some(identifier) = &self.identifier {
            write!(f, " (identifier: {identifier})")?;
        }

        if let Some(pattern) = &self.pattern {
            write!(f, " [pattern: {pattern}]")?;
        }

        Ok(())
    }
}

/// Summary statistics for an issue report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueSummary {
    /// Number of info messages
    pub info_count: usize,
    /// Number of warnings
    pub warning_count: usize,
    /// Number of errors
    pub error_count: usize,
}

/// Result of validating a batch of identifiers or rule rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueReport {
    /// Whether validation passed (no errors)
    pub is_valid: bool,
    /// All issues collected
    pub issues: Vec<Issue>,
    /// Summary statistics
    pub summary: IssueSummary,
    /// When the report was created
    pub timestamp: DateTime<Utc>,
}

impl IssueReport {
    /// Create an empty, valid report
    #[must_use]
    pub fn new() -> Self {
        Self {
            is_valid: true,
            issues: Vec::new(),
            summary: IssueSummary::default(),
            timestamp: Utc::now(),
        }
    }

    /// Add an issue
    pub fn add_issue(&mut self, issue: Issue) {
        match issue.severity {
            IssueSeverity::Info => self.summary.info_count += 1,
            IssueSeverity::Warning => self.summary.warning_count += 1,
            IssueSeverity::Error => {
                self.summary.error_count += 1;
                self.is_valid = false;
            }
        }
        self.issues.push(issue);
    }

    /// Add an info message
    pub fn add_info(&mut self, message: impl Into<String>) {
        self.add_issue(Issue::new(IssueSeverity::Info, message));
    }

    /// Add a warning
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.add_issue(Issue::new(IssueSeverity::Warning, message));
    }

    /// Add an error
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.add_issue(Issue::new(IssueSeverity::Error, message));
    }

    /// Convert and add an identifier error
    pub fn add_from_error(&mut self, error: &NeatError) {
        self.add_issue(Issue::from_error(error));
    }

    /// True when any error was collected
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.is_valid
    }

    /// Issues of a specific severity
    #[must_use]
    pub fn issues_by_severity(&self, severity: IssueSeverity) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .collect()
    }

    /// The highest severity present
    #[must_use]
    pub fn max_severity(&self) -> Option<IssueSeverity> {
        self.issues.iter().map(|issue| issue.severity).max()
    }
}

impl Default for IssueReport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IssueReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Validation: {}",
            if self.is_valid { "VALID" } else { "INVALID" }
        )?;
        writeln!(
            f,
            "Summary: {} info, {} warnings, {} errors",
            self.summary.info_count, self.summary.warning_count, self.summary.error_count
        )?;

        if !self.issues.is_empty() {
            writeln!(f, "Issues:")?;
            for issue in &self.issues {
                writeln!(f, "  {issue}")?;
            }
        }

        Ok(())
    }
}

/// Collect every canonical form that appears more than once, in
/// first-occurrence order
pub fn find_duplicates<I, T>(identifiers: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: fmt::Display,
{
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for identifier in identifiers {
        *counts.entry(identifier.to_string()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(canonical, _)| canonical)
        .collect()
}

/// Fail when a collection contains repeated identical identifiers,
/// reporting every duplicate found in the same pass
///
/// # Errors
///
/// Returns [`NeatError::DuplicateIdentifiers`] listing each duplicated
/// canonical form.
pub fn validate_unique<I, T>(identifiers: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: fmt::Display,
{
    let duplicates = find_duplicates(identifiers);
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(NeatError::duplicates(duplicates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ConceptEntity;
    use crate::pattern;

    #[test]
    fn test_report_tracks_validity() {
        let mut report = IssueReport::new();
        assert!(report.is_valid);

        report.add_info("parsed 10 rows");
        report.add_warning("row 3 uses a deprecated prefix");
        assert!(report.is_valid);

        report.add_error("row 7 has an empty suffix");
        assert!(report.has_errors());
        assert_eq!(report.summary.error_count, 1);
        assert_eq!(report.max_severity(), Some(IssueSeverity::Error));
        assert_eq!(report.issues_by_severity(IssueSeverity::Warning).len(), 1);
    }

    #[test]
    fn test_issue_from_pattern_violation() {
        let error = pattern::validate_prefix("1abc").unwrap_err();
        let issue = Issue::from_error(&error);
        assert_eq!(issue.severity, IssueSeverity::Error);
        assert_eq!(issue.field.as_deref(), Some("prefix"));
        assert_eq!(issue.value.as_deref(), Some("1abc"));
        assert_eq!(issue.pattern.as_deref(), Some(pattern::PREFIX_PATTERN));
        assert!(issue.message.contains("1abc"));
    }

    #[test]
    fn test_issue_display() {
        let issue = Issue::new(IssueSeverity::Warning, "deprecated prefix")
            .with_identifier("old:Thing")
            .with_context("row", "3");
        assert_eq!(
            issue.to_string(),
            "[WARNING] deprecated prefix (identifier: old:Thing)"
        );
    }

    #[test]
    fn test_all_duplicates_reported_in_one_pass() {
        let concepts = vec![
            ConceptEntity::new("power", "A").unwrap(),
            ConceptEntity::new("power", "B").unwrap(),
            ConceptEntity::new("power", "A").unwrap(),
            ConceptEntity::new("power", "C").unwrap(),
            ConceptEntity::new("power", "B").unwrap(),
            ConceptEntity::new("power", "A").unwrap(),
        ];

        let duplicates = find_duplicates(&concepts);
        assert_eq!(duplicates, vec!["power:A".to_string(), "power:B".to_string()]);

        let err = validate_unique(&concepts).unwrap_err();
        match err {
            NeatError::DuplicateIdentifiers { identifiers } => {
                assert_eq!(identifiers.len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }

        let unique = vec![
            ConceptEntity::new("power", "A").unwrap(),
            ConceptEntity::new("power", "B").unwrap(),
        ];
        assert!(validate_unique(&unique).is_ok());
    }

    #[test]
    fn test_report_serializes() {
        let mut report = IssueReport::new();
        report.add_error("bad row");
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"is_valid\":false"));
        assert!(json.contains("bad row"));
    }
}

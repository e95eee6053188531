//! Collected validation issues

use serde::Serialize;
use std::fmt;

use crate::SchemaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// A single finding, naming the offending part of the asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    /// What the issue is about, e.g. `wangset 'dupa' tile 12`
    pub subject: String,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{level}: {}: {}", self.subject, self.message)
    }
}

/// Every issue found in one asset
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.issues.push(Issue {
            severity: Severity::Error,
            subject: subject.into(),
            message: message.into(),
        });
    }

    pub fn warning(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.issues.push(Issue {
            severity: Severity::Warning,
            subject: subject.into(),
            message: message.into(),
        });
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Log warnings and turn errors into a `SchemaError` naming the asset
    pub fn into_result(self, asset: &str) -> Result<(), SchemaError> {
        for warning in self.warnings() {
            tracing::warn!("{asset}: {warning}");
        }

        let mut errors = self.errors();
        let Some(first) = errors.next() else {
            return Ok(());
        };
        let more = errors.count();
        let suffix = if more > 0 {
            format!(" (and {more} more)")
        } else {
            String::new()
        };
        Err(SchemaError::ValidationError(format!(
            "{asset}: {}: {}{suffix}",
            first.subject, first.message
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_ok() {
        let report = ValidationReport::new();
        assert!(report.is_clean());
        assert!(report.into_result("asset").is_ok());
    }

    #[test]
    fn test_warnings_do_not_fail() {
        let mut report = ValidationReport::new();
        report.warning("image", "has unused space");
        assert!(!report.has_errors());
        assert!(!report.is_clean());
        assert!(report.into_result("asset").is_ok());
    }

    #[test]
    fn test_errors_fail_with_first_message() {
        let mut report = ValidationReport::new();
        report.error("wangset 'a' tile 9", "out of range");
        report.warning("image", "unused space");
        report.error("wangset 'a' tile 10", "out of range");

        assert_eq!(report.errors().count(), 2);
        let err = report.into_result("tiles.tsx").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("tiles.tsx: wangset 'a' tile 9: out of range"));
        assert!(msg.contains("and 1 more"));
    }

    #[test]
    fn test_issue_display() {
        let issue = Issue {
            severity: Severity::Warning,
            subject: "level".to_string(),
            message: "odd".to_string(),
        };
        assert_eq!(issue.to_string(), "warning: level: odd");
    }
}

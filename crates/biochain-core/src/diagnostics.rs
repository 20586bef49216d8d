//! Diagnostics collected while loading and validating network data.
//!
//! Loaders and validators do not stop at the first problem. They record
//! every issue with a severity, a category ("parse", "reference",
//! "capacity", ...), an optional entity ("Supplier 12", "Arc 3->7") and an
//! optional source line, then let the caller decide whether to abort.
//!
//! # Example
//!
//! ```
//! use biochain_core::diagnostics::Diagnostics;
//!
//! let mut diag = Diagnostics::new();
//! diag.add_warning("capacity", "Supplier has zero supply");
//! diag.add_error_with_entity("reference", "Arc points to an unknown hub", "Arc 4->99");
//!
//! assert_eq!(diag.warning_count(), 1);
//! assert_eq!(diag.error_count(), 1);
//! assert!(diag.has_errors());
//! ```

use serde::Serialize;

/// How bad an issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Unusual but the data is still usable
    Warning,
    /// The data cannot be turned into a valid model
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// One problem found in a data set
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticIssue {
    pub severity: Severity,
    /// Grouping key such as "parse", "reference" or "capacity"
    pub category: String,
    pub message: String,
    /// 1-based line in the source file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Site or arc the issue is about ("Source 12", "source-to-transfer arc 3->7")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

impl DiagnosticIssue {
    pub fn new(
        severity: Severity,
        category: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category: category.into(),
            message: message.into(),
            line: None,
            entity: None,
        }
    }

    pub fn with_line(self, line: usize) -> Self {
        Self {
            line: Some(line),
            ..self
        }
    }

    pub fn with_entity(self, entity: impl Into<String>) -> Self {
        Self {
            entity: Some(entity.into()),
            ..self
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for DiagnosticIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}:{}] {}",
            self.severity.as_str(),
            self.category,
            self.message
        )?;
        if let Some(entity) = &self.entity {
            write!(f, " ({entity})")?;
        }
        match self.line {
            Some(line) => write!(f, " at line {line}"),
            None => Ok(()),
        }
    }
}

/// Issues gathered by one load or validation pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<DiagnosticIssue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(
        &mut self,
        severity: Severity,
        category: &str,
        message: &str,
        entity: Option<&str>,
        line: Option<usize>,
    ) {
        self.issues.push(DiagnosticIssue {
            severity,
            category: category.to_string(),
            message: message.to_string(),
            line,
            entity: entity.map(str::to_string),
        });
    }

    pub fn add_warning(&mut self, category: &str, message: &str) {
        self.record(Severity::Warning, category, message, None, None);
    }

    pub fn add_warning_with_entity(&mut self, category: &str, message: &str, entity: &str) {
        self.record(Severity::Warning, category, message, Some(entity), None);
    }

    pub fn add_error(&mut self, category: &str, message: &str) {
        self.record(Severity::Error, category, message, None, None);
    }

    pub fn add_error_at_line(&mut self, category: &str, message: &str, line: usize) {
        self.record(Severity::Error, category, message, None, Some(line));
    }

    pub fn add_error_with_entity(&mut self, category: &str, message: &str, entity: &str) {
        self.record(Severity::Error, category, message, Some(entity), None);
    }

    pub fn errors(&self) -> impl Iterator<Item = &DiagnosticIssue> {
        self.issues.iter().filter(|i| i.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues.len() - self.error_count()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn issues_by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a DiagnosticIssue> {
        self.issues.iter().filter(move |i| i.category == category)
    }

    /// "No issues", "2 warnings", "1 warning, 3 errors", ...
    pub fn summary(&self) -> String {
        let parts: Vec<String> = [
            (self.warning_count(), "warning"),
            (self.error_count(), "error"),
        ]
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, noun)| plural(count, noun))
        .collect();

        if parts.is_empty() {
            "No issues".to_string()
        } else {
            parts.join(", ")
        }
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Diagnostics: {}", self.summary())?;
        self.issues
            .iter()
            .try_for_each(|issue| writeln!(f, "  {issue}"))
    }
}

/// Record counts from loading a data directory
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadStats {
    pub sources: usize,
    pub transfers: usize,
    pub facilities: usize,
    pub arcs: usize,
    pub skipped_lines: usize,
}

//! Core types for lint violations and results.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for lint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to project root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, in characters).
    pub column: usize,
    /// Byte offset in file.
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Creates a location for a byte offset into `text`, deriving line and column.
    ///
    /// Offsets past the end of `text` are clamped to its length. Build a
    /// [`LineIndex`] instead when locating many offsets in the same text.
    #[must_use]
    pub fn at_offset(file: PathBuf, text: &str, offset: usize) -> Self {
        LineIndex::new(text).location(file, offset)
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// Line starts of a text, for turning many byte offsets into [`Location`]s.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    /// Indexes the line starts of `text`.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, starts }
    }

    /// Location of `offset`, clamped to the text and to a character boundary.
    #[must_use]
    pub fn location(&self, file: PathBuf, offset: usize) -> Location {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = self.starts.partition_point(|&start| start <= offset);
        let line_start = self.starts[line - 1];
        let column = self.text[line_start..offset].chars().count() + 1;
        Location {
            file,
            line,
            column,
            offset,
            length: 0,
        }
    }
}

/// A suggested fix for a violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A lint violation found during analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "KS001").
    pub code: String,
    /// Rule name (e.g., "wrong-indentation").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Primary location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Whether the rule can correct this violation automatically.
    pub fixable: bool,
    /// Whether the correction was applied during this run.
    #[serde(default)]
    pub fixed: bool,
    /// Optional suggestion for fixing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            fixable: false,
            fixed: false,
            suggestion: None,
        }
    }

    /// Marks this violation as automatically fixable.
    #[must_use]
    pub fn fixable(mut self, fixable: bool) -> Self {
        self.fixable = fixable;
        self
    }

    /// Records whether the fix was applied.
    #[must_use]
    pub fn fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    /// Adds a suggestion to this violation.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.code,
            self.rule,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if self.fixed {
            let _ = writeln!(output, "  = fixed");
        } else if self.fixable {
            let _ = writeln!(output, "  = fixable with --fix");
        }
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: {}", suggestion.message);
        }
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )?;
        if self.fixed {
            write!(f, " (fixed)")?;
        }
        Ok(())
    }
}

/// A violation rendered as a miette diagnostic for rich terminal output.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        let help = v.suggestion.as_ref().map(|s| s.message.clone()).or_else(|| {
            (v.fixable && !v.fixed).then(|| "run `kstyle check --fix` to correct this".to_string())
        });
        Self {
            message: format!("[{}] {}", v.code, v.message),
            help,
            span: SourceSpan::from((v.location.offset, v.location.length)),
            label_message: v.rule.clone(),
        }
    }
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Number of files checked.
    pub files_checked: usize,
    /// Number of files rewritten by fix mode.
    #[serde(default)]
    pub files_fixed: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Violations that are still present in the sources.
    pub fn remaining(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| !v.fixed)
    }

    /// Returns true if there are any unfixed errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.remaining().any(|v| v.severity == Severity::Error)
    }

    /// Checks if any unfixed violation meets or exceeds the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.remaining().any(|v| v.severity >= severity)
    }

    /// Number of unfixed violations that fix mode could correct.
    #[must_use]
    pub fn fixable_count(&self) -> usize {
        self.remaining().filter(|v| v.fixable).count()
    }

    /// Counts violations by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |severity| {
            self.violations
                .iter()
                .filter(|v| v.severity == severity)
                .count()
        };
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Sorts violations by file, then line, then column.
    pub fn sort(&mut self) {
        self.violations.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });
    }

    /// Adds violations from another result.
    pub fn extend(&mut self, other: Self) {
        self.violations.extend(other.violations);
        self.files_checked += other.files_checked;
        self.files_fixed += other.files_fixed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity) -> Violation {
        Violation::new(
            "KS001",
            "wrong-indentation",
            severity,
            Location::new(PathBuf::from("src/Main.kt"), 2, 4),
            "expected 4 but was 3",
        )
    }

    #[test]
    fn location_from_offset() {
        let text = "class A {\n   val x = 0\n}\n";
        let loc = Location::at_offset(PathBuf::from("A.kt"), text, 13);
        assert_eq!((loc.line, loc.column, loc.offset), (2, 4, 13));

        let start = Location::at_offset(PathBuf::from("A.kt"), text, 0);
        assert_eq!((start.line, start.column), (1, 1));

        let end = Location::at_offset(PathBuf::from("A.kt"), text, 500);
        assert_eq!(end.offset, text.len());
        assert_eq!((end.line, end.column), (4, 1));
    }

    #[test]
    fn line_index_locates_many_offsets() {
        let text = "a\n\nbc\n";
        let index = LineIndex::new(text);
        let positions: Vec<_> = [0, 1, 2, 3, 4, 5, 6]
            .into_iter()
            .map(|offset| {
                let loc = index.location(PathBuf::from("A.kt"), offset);
                (loc.line, loc.column)
            })
            .collect();
        assert_eq!(
            positions,
            vec![(1, 1), (1, 2), (2, 1), (3, 1), (3, 2), (3, 3), (4, 1)]
        );
    }

    #[test]
    fn location_counts_characters_not_bytes() {
        let text = "val é = 1";
        let loc = Location::at_offset(PathBuf::from("A.kt"), text, 7);
        assert_eq!(loc.column, 7);
    }

    #[test]
    fn severity_parses_case_insensitively() {
        assert_eq!("Warning".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("error".parse::<Severity>(), Ok(Severity::Error));
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn display_is_compact() {
        let v = make_violation(Severity::Warning);
        insta::assert_snapshot!(v.to_string(), @"src/Main.kt:2:4: warning [KS001] expected 4 but was 3");
    }

    #[test]
    fn display_marks_fixed() {
        let v = make_violation(Severity::Warning).fixable(true).fixed(true);
        assert!(v.to_string().ends_with("(fixed)"));
    }

    #[test]
    fn format_mentions_fix_mode_for_fixable() {
        let v = make_violation(Severity::Warning).fixable(true);
        assert!(v.format().contains("= fixable with --fix"));
        let fixed = v.fixed(true);
        assert!(fixed.format().contains("= fixed"));
    }

    #[test]
    fn fixed_violations_do_not_count_as_remaining() {
        let mut result = LintResult::new();
        result
            .violations
            .push(make_violation(Severity::Error).fixable(true).fixed(true));
        result
            .violations
            .push(make_violation(Severity::Warning).fixable(true));

        assert!(!result.has_errors());
        assert!(result.has_violations_at(Severity::Warning));
        assert!(!result.has_violations_at(Severity::Error));
        assert_eq!(result.fixable_count(), 1);
        assert_eq!(result.count_by_severity(), (1, 1, 0));
    }

    #[test]
    fn sort_orders_by_position() {
        let mut result = LintResult::new();
        let mut late = make_violation(Severity::Warning);
        late.location.line = 9;
        result.violations.push(late);
        result.violations.push(make_violation(Severity::Warning));
        result.sort();
        assert_eq!(result.violations[0].location.line, 2);
    }

    #[test]
    fn extend_merges_counts() {
        let mut a = LintResult::new();
        a.files_checked = 1;
        let mut b = LintResult::new();
        b.files_checked = 2;
        b.files_fixed = 1;
        b.violations.push(make_violation(Severity::Info));
        a.extend(b);
        assert_eq!((a.files_checked, a.files_fixed, a.violations.len()), (3, 1, 1));
    }

    #[test]
    fn diagnostic_suggests_fix_mode() {
        let v = make_violation(Severity::Warning).fixable(true);
        let diag = ViolationDiagnostic::from(&v);
        assert_eq!(diag.to_string(), "[KS001] expected 4 but was 3");
        assert_eq!(
            diag.help.as_deref(),
            Some("run `kstyle check --fix` to correct this")
        );
    }
}

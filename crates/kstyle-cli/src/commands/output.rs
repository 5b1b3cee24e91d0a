//! Output formatting for lint results.

use anyhow::Result;
use kstyle_core::{LintResult, Severity, Violation, ViolationDiagnostic};
use miette::{NamedSource, Report};
use std::collections::HashMap;
use std::path::Path;

use crate::OutputFormat;

/// Print lint results in the specified format. Violation paths are
/// relative to `root`.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Pretty => print_pretty(result, root),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    for violation in &result.violations {
        let severity_indicator = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{} {} at {}:{}:{}",
            violation.code,
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        let status = if violation.fixed { " (fixed)" } else { "" };
        println!("  {}: {}{}", severity_indicator, violation.message, status);
        if let Some(suggestion) = &violation.suggestion {
            println!("  = help: {}", suggestion.message);
        }
        println!();
    }
    println!("{}", summary(result));
}

fn summary(result: &LintResult) -> String {
    let (errors, warnings, infos) = result.count_by_severity();
    let color = if result.has_errors() {
        "\x1b[31m"
    } else if result.remaining().next().is_some() {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    let mut line = format!(
        "{color}Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} file(s)",
        result.files_checked
    );
    if result.files_fixed > 0 {
        let fixed = result.violations.len() - result.remaining().count();
        line.push_str(&format!(
            "; fixed {fixed} in {} file(s)",
            result.files_fixed
        ));
    } else if result.fixable_count() > 0 {
        line.push_str(&format!(
            "; {} fixable with --fix",
            result.fixable_count()
        ));
    }
    line.push_str("\x1b[0m");
    line
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{violation}");
    }
}

/// Renders each violation against its source with miette. Fixed
/// violations are listed compactly since their spans no longer match.
fn print_pretty(result: &LintResult, root: &Path) {
    let mut sources: HashMap<&Path, Option<String>> = HashMap::new();
    for violation in &result.violations {
        if violation.fixed {
            println!("{violation}");
            continue;
        }
        let file = violation.location.file.as_path();
        let source = sources
            .entry(file)
            .or_insert_with(|| std::fs::read_to_string(root.join(file)).ok());
        match source {
            Some(text) => println!("{:?}", report(violation, text)),
            None => println!("{violation}"),
        }
    }
    println!("{}", summary(result));
}

fn report(violation: &Violation, source: &str) -> Report {
    let name = violation.location.file.display().to_string();
    Report::new(ViolationDiagnostic::from(violation))
        .with_source_code(NamedSource::new(name, source.to_string()))
}

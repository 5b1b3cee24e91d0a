//! # kstyle-core
//!
//! Core framework for kstyle, a style linter for Kotlin sources.
//!
//! This crate is language-agnostic. Front ends lower their concrete syntax
//! into a lossless [`SyntaxTree`], and rules check (and fix) that tree. It
//! includes:
//!
//! - [`SyntaxTree`] / [`TreeBuilder`], an arena tree with whitespace leaves
//! - [`Rule`] trait for per-file rules and [`SourceParser`] for front ends
//! - [`IndentationRule`], the structural indentation engine
//! - [`Analyzer`] for file discovery, rule execution and fix write-back
//!
//! ## Example
//!
//! ```ignore
//! use kstyle_core::{all_rules, Analyzer, Config, FixMode};
//!
//! let config = Config::default();
//! let mut builder = Analyzer::builder()
//!     .root("./src")
//!     .parser(KotlinParser::new())
//!     .mode(FixMode::Check);
//! for rule in all_rules(&config) {
//!     builder = builder.rule_box(rule);
//! }
//! let result = builder.config(config).build()?.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod kind;
mod parser;
mod rule;
mod tree;
mod types;

pub mod indentation;
pub mod tokens;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError, FileOutcome};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::{FileContext, FixMode};
pub use indentation::{IndentationConfig, IndentationRule};
pub use kind::NodeKind;
pub use parser::{ParseError, ParserBox, SourceParser};
pub use rule::{Rule, RuleBox};
pub use tree::{NodeId, SpanTable, SyntaxTree, TreeBuilder, TreeError};
pub use types::{
    LineIndex, LintResult, Location, Severity, Suggestion, Violation, ViolationDiagnostic,
};

/// Returns the built-in rule set, configured from `config`.
///
/// Disabled rules are still returned; the analyzer skips them.
#[must_use]
pub fn all_rules(config: &Config) -> Vec<RuleBox> {
    vec![Box::new(IndentationRule::from_config(config))]
}

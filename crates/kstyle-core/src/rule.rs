//! Rule trait for defining lint rules.

use crate::context::FileContext;
use crate::tree::SyntaxTree;
use crate::types::{Severity, Violation};

/// A per-file lint rule over the lowered syntax tree.
///
/// Rules receive a mutable tree so that, in [`FixMode::Fix`](crate::FixMode::Fix),
/// they can correct what they report. Corrections must only rewrite leaf
/// text or insert leaves; the structure of the tree is never reshuffled.
///
/// # Example
///
/// ```ignore
/// use kstyle_core::{FileContext, Rule, SyntaxTree, Violation};
///
/// pub struct NoSemicolons;
///
/// impl Rule for NoSemicolons {
///     fn name(&self) -> &'static str { "no-semicolons" }
///     fn code(&self) -> &'static str { "KS100" }
///
///     fn check(&self, ctx: &FileContext, tree: &mut SyntaxTree) -> Vec<Violation> {
///         // walk tree.descendants(tree.root()) ...
///         vec![]
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "wrong-indentation").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "KS001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// Checks (and in fix mode corrects) a single file.
    ///
    /// Returns the violations found, in ascending offset order.
    fn check(&self, ctx: &FileContext, tree: &mut SyntaxTree) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

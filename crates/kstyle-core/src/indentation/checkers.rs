//! Strategies that recognize syntactic exceptions to plain scope indentation.
//!
//! The driver consults [`IndentChecker`]s in a fixed order and uses the first
//! verdict. A checker that does not recognize the line break, or whose
//! option is disabled, returns `None`.

use super::config::IndentationConfig;
use crate::kind::NodeKind;
use crate::tree::{NodeId, SyntaxTree};

/// Indentation computed for one line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentationError {
    /// Spaces the scopes and active exceptions call for.
    pub expected: i32,
    /// Spaces found after the last line break.
    pub actual: i32,
}

/// Verdict of a checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckResult {
    /// Whether the actual indent is acceptable as is.
    pub is_correct: bool,
    /// Indent to use instead of [`IndentationError::expected`].
    pub expected_indent: Option<i32>,
    /// Keep the difference as an exception over the initiator's subtree.
    pub adjust_next: bool,
    /// Whether that exception also covers the initiator's last child.
    pub include_last_child: bool,
}

impl CheckResult {
    /// Result expecting `expected` spaces where `actual` were found.
    #[must_use]
    pub fn from(actual: i32, expected: i32) -> Self {
        Self {
            is_correct: actual == expected,
            expected_indent: Some(expected),
            adjust_next: false,
            include_last_child: true,
        }
    }

    /// Carries the extra indent over to the following lines.
    #[must_use]
    pub fn adjust_next(mut self) -> Self {
        self.adjust_next = true;
        self
    }

    /// Ends the carried indent before the initiator's last child.
    #[must_use]
    pub fn exclude_last_child(mut self) -> Self {
        self.include_last_child = false;
        self
    }
}

/// One syntactic exception to plain scope indentation.
pub trait IndentChecker: Send + Sync {
    /// Short name used in debug logs.
    fn name(&self) -> &'static str;

    /// Judges the line break `ws`, or returns `None` to defer to the next checker.
    fn try_check(&self, tree: &SyntaxTree, ws: NodeId, error: IndentationError)
        -> Option<CheckResult>;

    /// Node whose subtree keeps the extra indent when the result adjusts the next lines.
    fn exception_initiator(&self, tree: &SyntaxTree, ws: NodeId) -> NodeId {
        tree.parent(ws).unwrap_or(ws)
    }
}

/// Builds the checker chain in priority order.
#[must_use]
pub fn default_checkers(config: &IndentationConfig) -> Vec<Box<dyn IndentChecker>> {
    let unit = config.indentation_size;
    vec![
        Box::new(AssignmentChecker { unit }),
        Box::new(BracelessBodyChecker { unit }),
        Box::new(SuperTypeListChecker { unit }),
        Box::new(ParameterListChecker {
            unit,
            aligned: config.aligned_parameters,
            extended: config.extended_indent_of_parameters,
        }),
        Box::new(BinaryExpressionChecker {
            unit,
            enabled: config.extended_indent_after_operators,
        }),
        Box::new(DotCallChecker {
            unit,
            enabled: config.extended_indent_before_dot,
        }),
        Box::new(KDocChecker),
        Box::new(AccessorChecker { unit }),
        Box::new(WhenArrowChecker { unit }),
    ]
}

fn next_kind(tree: &SyntaxTree, ws: NodeId) -> Option<NodeKind> {
    tree.next_sibling(ws).map(|n| tree.kind(n))
}

fn prev_kind(tree: &SyntaxTree, ws: NodeId) -> Option<NodeKind> {
    tree.prev_sibling(ws).map(|n| tree.kind(n))
}

fn parent_kind(tree: &SyntaxTree, ws: NodeId) -> Option<NodeKind> {
    tree.parent(ws).map(|n| tree.kind(n))
}

fn next_or_parent(tree: &SyntaxTree, ws: NodeId) -> NodeId {
    tree.next_sibling(ws)
        .or_else(|| tree.parent(ws))
        .unwrap_or(ws)
}

fn next_non_whitespace(tree: &SyntaxTree, id: NodeId) -> Option<NodeId> {
    std::iter::successors(tree.next_sibling(id), |&n| tree.next_sibling(n))
        .find(|&n| !tree.kind(n).is_whitespace())
}

fn prev_non_whitespace(tree: &SyntaxTree, id: NodeId) -> Option<NodeId> {
    std::iter::successors(tree.prev_sibling(id), |&n| tree.prev_sibling(n))
        .find(|&n| !tree.kind(n).is_whitespace())
}

/// Column (in characters) at which `id` starts on its line.
///
/// Reads the leaves before `id` back to the previous line break, so fixes
/// already applied on that line are taken into account.
fn column_of(tree: &SyntaxTree, id: NodeId) -> i32 {
    let mut column = 0;
    let mut leaf = tree.first_leaf(id);
    while let Some(prev) = tree.prev_leaf(leaf) {
        let text = tree.leaf_text(prev);
        if let Some(i) = text.rfind('\n') {
            column += text[i + 1..].chars().count();
            break;
        }
        column += text.chars().count();
        leaf = prev;
    }
    i32::try_from(column).unwrap_or(i32::MAX)
}

fn is_braced(tree: &SyntaxTree, id: NodeId) -> bool {
    tree.kind(tree.first_leaf(id)) == NodeKind::LBrace
}

/// Continuation after `=`.
struct AssignmentChecker {
    unit: i32,
}

impl IndentChecker for AssignmentChecker {
    fn name(&self) -> &'static str {
        "assignment"
    }

    fn try_check(&self, tree: &SyntaxTree, ws: NodeId, error: IndentationError) -> Option<CheckResult> {
        (prev_kind(tree, ws)? == NodeKind::Eq)
            .then(|| CheckResult::from(error.actual, error.expected + self.unit).adjust_next())
    }

    fn exception_initiator(&self, tree: &SyntaxTree, ws: NodeId) -> NodeId {
        next_or_parent(tree, ws)
    }
}

/// Body of an `if`, `else` or loop written without braces.
struct BracelessBodyChecker {
    unit: i32,
}

impl BracelessBodyChecker {
    fn applies(tree: &SyntaxTree, ws: NodeId) -> Option<bool> {
        let parent = tree.kind(tree.parent(ws)?);
        let next = tree.next_sibling(ws)?;
        let applies = match (parent, tree.kind(next)) {
            (NodeKind::If, NodeKind::Then) => !is_braced(tree, next),
            (NodeKind::If, NodeKind::Else) => {
                let else_if = tree
                    .children(next)
                    .iter()
                    .find(|&&c| !tree.kind(c).is_whitespace())
                    .is_some_and(|&c| tree.kind(c) == NodeKind::If);
                !is_braced(tree, next) && !else_if
            }
            (parent, NodeKind::Body) if parent.is_loop() => !is_braced(tree, next),
            _ => false,
        };
        Some(applies)
    }
}

impl IndentChecker for BracelessBodyChecker {
    fn name(&self) -> &'static str {
        "braceless-body"
    }

    fn try_check(&self, tree: &SyntaxTree, ws: NodeId, error: IndentationError) -> Option<CheckResult> {
        Self::applies(tree, ws)?
            .then(|| CheckResult::from(error.actual, error.expected + self.unit).adjust_next())
    }

    fn exception_initiator(&self, tree: &SyntaxTree, ws: NodeId) -> NodeId {
        next_or_parent(tree, ws)
    }
}

/// Super-type list after `:` in a class header.
struct SuperTypeListChecker {
    unit: i32,
}

impl IndentChecker for SuperTypeListChecker {
    fn name(&self) -> &'static str {
        "super-type-list"
    }

    fn try_check(&self, tree: &SyntaxTree, ws: NodeId, error: IndentationError) -> Option<CheckResult> {
        let next = tree.next_sibling(ws);
        let starts_list = match next.map(|n| tree.kind(n)) {
            Some(NodeKind::SuperTypeList) => true,
            Some(NodeKind::Colon) => next
                .and_then(|colon| next_non_whitespace(tree, colon))
                .is_some_and(|n| tree.kind(n) == NodeKind::SuperTypeList),
            _ => false,
        };

        if starts_list && next.map(|n| tree.kind(n)) == Some(NodeKind::SuperTypeList) {
            let colon = prev_non_whitespace(tree, ws).filter(|&c| tree.kind(c) == NodeKind::Colon);
            let colon_wrapped = colon
                .and_then(|c| tree.prev_sibling(c))
                .is_some_and(|w| tree.is_line_break(w));
            let units = if colon_wrapped { 2 } else { 1 };
            return Some(CheckResult::from(error.actual, error.expected + units * self.unit));
        }
        if starts_list || parent_kind(tree, ws) == Some(NodeKind::SuperTypeList) {
            return Some(CheckResult::from(error.actual, error.expected + self.unit));
        }
        None
    }
}

/// Wrapped parameters and arguments whose first entry sits on the `(` line.
struct ParameterListChecker {
    unit: i32,
    aligned: bool,
    extended: bool,
}

impl ParameterListChecker {
    fn first_entry(tree: &SyntaxTree, list: NodeId) -> Option<NodeId> {
        let lparen = tree
            .children(list)
            .iter()
            .copied()
            .find(|&c| tree.kind(c) == NodeKind::LParen)?;
        tree.next_sibling(lparen)
            .filter(|&n| !tree.kind(n).is_whitespace() && !tree.contains_newline(n))
    }
}

impl IndentChecker for ParameterListChecker {
    fn name(&self) -> &'static str {
        "parameter-list"
    }

    fn try_check(&self, tree: &SyntaxTree, ws: NodeId, error: IndentationError) -> Option<CheckResult> {
        let list = tree.parent(ws)?;
        let list_kind = tree.kind(list);
        if !matches!(
            list_kind,
            NodeKind::ValueParameterList | NodeKind::ValueArgumentList
        ) {
            return None;
        }
        if !matches!(
            next_kind(tree, ws)?,
            NodeKind::ValueParameter | NodeKind::ValueArgument
        ) {
            return None;
        }
        // Later line breaks inherit the exception registered at the first one.
        let earlier_break = std::iter::successors(tree.prev_sibling(ws), |&n| tree.prev_sibling(n))
            .any(|n| tree.is_line_break(n));
        if earlier_break {
            return None;
        }
        let first = Self::first_entry(tree, list)?;

        let expected = if self.aligned && list_kind == NodeKind::ValueParameterList {
            column_of(tree, first)
        } else if self.extended {
            error.expected + self.unit
        } else {
            return None;
        };
        Some(
            CheckResult::from(error.actual, expected)
                .adjust_next()
                .exclude_last_child(),
        )
    }
}

/// Operand wrapped around a binary operator.
struct BinaryExpressionChecker {
    unit: i32,
    enabled: bool,
}

impl IndentChecker for BinaryExpressionChecker {
    fn name(&self) -> &'static str {
        "binary-expression"
    }

    fn try_check(&self, tree: &SyntaxTree, ws: NodeId, error: IndentationError) -> Option<CheckResult> {
        if !self.enabled || parent_kind(tree, ws)? != NodeKind::BinaryExpression {
            return None;
        }
        let around_operator = prev_kind(tree, ws) == Some(NodeKind::OperationReference)
            || next_kind(tree, ws) == Some(NodeKind::OperationReference);
        around_operator
            .then(|| CheckResult::from(error.actual, error.expected + self.unit).adjust_next())
    }

    fn exception_initiator(&self, tree: &SyntaxTree, ws: NodeId) -> NodeId {
        tree.parent(ws)
            .and_then(|p| {
                tree.children(p)
                    .iter()
                    .rev()
                    .copied()
                    .find(|&c| !tree.kind(c).is_whitespace())
            })
            .unwrap_or(ws)
    }
}

/// Line starting with `.` or `?.` in a call chain.
struct DotCallChecker {
    unit: i32,
    enabled: bool,
}

impl IndentChecker for DotCallChecker {
    fn name(&self) -> &'static str {
        "dot-call"
    }

    fn try_check(&self, tree: &SyntaxTree, ws: NodeId, error: IndentationError) -> Option<CheckResult> {
        if !self.enabled {
            return None;
        }
        matches!(next_kind(tree, ws)?, NodeKind::Dot | NodeKind::SafeAccess)
            .then(|| CheckResult::from(error.actual, error.expected + self.unit).adjust_next())
    }

    fn exception_initiator(&self, tree: &SyntaxTree, ws: NodeId) -> NodeId {
        tree.next_sibling(ws)
            .and_then(|dot| next_non_whitespace(tree, dot))
            .unwrap_or_else(|| next_or_parent(tree, ws))
    }
}

/// ` *` and ` */` lines of a documentation comment.
struct KDocChecker;

impl IndentChecker for KDocChecker {
    fn name(&self) -> &'static str {
        "kdoc"
    }

    fn try_check(&self, tree: &SyntaxTree, ws: NodeId, error: IndentationError) -> Option<CheckResult> {
        matches!(
            next_kind(tree, ws)?,
            NodeKind::KDocLeadingAsterisk | NodeKind::KDocEnd
        )
        .then(|| CheckResult::from(error.actual, error.expected + 1))
    }
}

/// Custom `get()` / `set()` below a property.
struct AccessorChecker {
    unit: i32,
}

impl IndentChecker for AccessorChecker {
    fn name(&self) -> &'static str {
        "property-accessor"
    }

    fn try_check(&self, tree: &SyntaxTree, ws: NodeId, error: IndentationError) -> Option<CheckResult> {
        (parent_kind(tree, ws)? == NodeKind::Property
            && next_kind(tree, ws)? == NodeKind::PropertyAccessor)
            .then(|| CheckResult::from(error.actual, error.expected + self.unit).adjust_next())
    }

    fn exception_initiator(&self, tree: &SyntaxTree, ws: NodeId) -> NodeId {
        next_or_parent(tree, ws)
    }
}

/// Body of a `when` entry on the line after `->`.
struct WhenArrowChecker {
    unit: i32,
}

impl IndentChecker for WhenArrowChecker {
    fn name(&self) -> &'static str {
        "when-arrow"
    }

    fn try_check(&self, tree: &SyntaxTree, ws: NodeId, error: IndentationError) -> Option<CheckResult> {
        (prev_kind(tree, ws)? == NodeKind::Arrow
            && parent_kind(tree, ws)? == NodeKind::WhenEntry)
            .then(|| CheckResult::from(error.actual, error.expected + self.unit).adjust_next())
    }

    fn exception_initiator(&self, tree: &SyntaxTree, ws: NodeId) -> NodeId {
        next_or_parent(tree, ws)
    }
}

//! Re-indentation of raw strings passed through `trimIndent()` / `trimMargin()`.
//!
//! When a line break in front of such a literal is re-indented, the literal's
//! own lines move with it. All content lines shift by the same amount, so the
//! least indented one sits one unit deeper than the line that starts the
//! literal and the others keep their relative indentation. The closing `"""`
//! sits at the literal's own indent.

use crate::kind::NodeKind;
use crate::tree::{NodeId, SyntaxTree};
use tracing::debug;

const INDENTING_CALLS: [&str; 2] = ["trimIndent", "trimMargin"];

/// Finds the raw string template that follows the line break `ws`.
///
/// The literal must be the receiver of a `.trimIndent()` or `.trimMargin()`
/// call reached from the next sibling through its chain of first children.
#[must_use]
pub fn indented_raw_string(tree: &SyntaxTree, ws: NodeId) -> Option<NodeId> {
    let next = tree.next_sibling(ws)?;
    let qualified = std::iter::successors(Some(next), |&n| tree.first_child(n))
        .find(|&n| tree.kind(n) == NodeKind::DotQualifiedExpression)?;

    let template = tree.first_child(qualified)?;
    if tree.kind(template) != NodeKind::StringTemplate {
        return None;
    }
    let is_raw = tree
        .first_child(template)
        .is_some_and(|q| tree.leaf_text(q) == "\"\"\"");
    if !is_raw || !tree.contains_newline(template) {
        return None;
    }

    let selector = tree
        .children(qualified)
        .iter()
        .copied()
        .skip_while(|&c| tree.kind(c) != NodeKind::Dot)
        .skip(1)
        .find(|&c| !tree.kind(c).is_whitespace())?;
    let callee = tree.leaf_text(tree.first_leaf(selector));
    INDENTING_CALLS.contains(&callee).then_some(template)
}

/// Re-indents the lines of `template` for a literal starting at `expected` spaces.
pub fn reindent_raw_string(tree: &mut SyntaxTree, template: NodeId, expected: i32, unit: i32) {
    let closing_indent = spaces(expected);
    let entries: Vec<NodeId> = tree.children(template).to_vec();
    let is_closing = |tree: &SyntaxTree, i: usize| {
        entries
            .get(i + 1)
            .is_some_and(|&n| tree.kind(n) == NodeKind::ClosingQuote)
    };

    // Leading pieces of content lines, with their current indent.
    let mut lines = Vec::new();
    let mut closing_line = None;
    let mut at_line_start = false;
    for (i, &entry) in entries.iter().enumerate() {
        let text = tree.leaf_text(entry);
        if tree.kind(entry) != NodeKind::LiteralStringTemplateEntry {
            at_line_start = false;
            continue;
        }
        if text.ends_with('\n') {
            if is_closing(tree, i) {
                closing_line = Some((entry, true));
            }
            at_line_start = true;
            continue;
        }
        if at_line_start {
            let content = text.trim_start_matches(' ');
            if is_closing(tree, i) && content.is_empty() {
                closing_line = Some((entry, false));
            } else if !content.trim().is_empty() {
                let indent = text.len() - content.len();
                lines.push((entry, i32::try_from(indent).unwrap_or(i32::MAX)));
            }
        }
        at_line_start = false;
    }

    let margin = lines.iter().map(|&(_, indent)| indent).min().unwrap_or(0);
    let delta = expected + unit - margin;
    for (entry, indent) in lines {
        let content = tree.leaf_text(entry).trim_start_matches(' ').to_string();
        tree.set_leaf_text(entry, format!("{}{content}", spaces(indent + delta)));
    }
    match closing_line {
        // Closing quote at the very start of its line.
        Some((entry, true)) => {
            let text = format!("{}{closing_indent}", tree.leaf_text(entry));
            tree.set_leaf_text(entry, text);
        }
        Some((entry, false)) => tree.set_leaf_text(entry, closing_indent),
        None => {}
    }
    debug!(expected, delta, "re-indented raw string literal");
}

fn spaces(n: i32) -> String {
    " ".repeat(usize::try_from(n).unwrap_or(0))
}

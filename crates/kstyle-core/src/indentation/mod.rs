//! Structural indentation rule.
//!
//! For every line break the rule computes the expected indentation from the
//! open scopes and the active exceptions, compares it with the spaces that
//! follow the break, reports mismatches and, in fix mode, rewrites the
//! whitespace leaf. Fixes only ever change whitespace leaf text or insert a
//! whitespace leaf, so the traversal's node ids stay valid.
//!
//! Every reported offset refers to the file text as it was before the rule
//! ran, even in fix mode, so violations from the tab pass, the indentation
//! pass and the end-of-file check sort consistently.

mod checkers;
mod config;
mod context;
mod string_literal;

pub use checkers::{default_checkers, CheckResult, IndentChecker, IndentationError};
pub use config::IndentationConfig;
pub use context::{ExceptionalIndent, IndentContext};

use crate::config::Config;
use crate::context::FileContext;
use crate::kind::NodeKind;
use crate::rule::Rule;
use crate::tokens;
use crate::tree::{NodeId, SpanTable, SyntaxTree};
use crate::types::{LineIndex, Violation};
use tracing::{debug, info};

/// State shared by the passes over one file.
struct FilePass<'a> {
    ctx: &'a FileContext<'a>,
    /// Text before any fix.
    source: &'a str,
    lines: LineIndex<'a>,
    spans: SpanTable,
    out: Vec<Violation>,
}

impl FilePass<'_> {
    /// Offset right after the last line break of `ws` in the original text.
    fn line_start(&self, ws: NodeId) -> usize {
        let span = self.spans.span(ws);
        let original = &self.source[span.clone()];
        span.start + original.rfind('\n').map_or(0, |i| i + 1)
    }
}

/// Checks and fixes indentation of every line.
pub struct IndentationRule {
    config: IndentationConfig,
    checkers: Vec<Box<dyn IndentChecker>>,
}

impl IndentationRule {
    /// Rule name.
    pub const NAME: &'static str = "wrong-indentation";
    /// Rule code.
    pub const CODE: &'static str = "KS001";

    /// Creates the rule with the given options.
    #[must_use]
    pub fn new(config: IndentationConfig) -> Self {
        let checkers = default_checkers(&config);
        Self { config, checkers }
    }

    /// Creates the rule from the `[rules.wrong-indentation]` table of `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(IndentationConfig::from_rule_config(
            config.rule_config(Self::NAME),
        ))
    }

    /// Options in effect.
    #[must_use]
    pub fn config(&self) -> &IndentationConfig {
        &self.config
    }

    fn report(&self, pass: &mut FilePass<'_>, offset: usize, message: String) {
        let location = pass.lines.location(pass.ctx.relative_path.clone(), offset);
        pass.out.push(
            Violation::new(
                Self::CODE,
                Self::NAME,
                self.default_severity(),
                location,
                message,
            )
            .fixable(true)
            .fixed(pass.ctx.mode.is_fix()),
        );
    }

    /// Reports tabs in whitespace and, in fix mode, expands them.
    ///
    /// Returns `true` if tabs remain in the tree.
    fn check_tabs(&self, pass: &mut FilePass<'_>, tree: &mut SyntaxTree) -> bool {
        let tab = " ".repeat(usize::try_from(self.config.indentation_size).unwrap_or(0));
        let fix = pass.ctx.mode.is_fix();
        let mut found = false;
        for leaf in tree.leaves(tree.root()) {
            if !tree.kind(leaf).is_whitespace() {
                continue;
            }
            let Some(index) = tree.leaf_text(leaf).find('\t') else {
                continue;
            };
            found = true;
            let offset = pass.spans.start(leaf) + index;
            self.report(pass, offset, "tabs are not allowed for indentation".to_string());
            if fix {
                let replaced = tree.leaf_text(leaf).replace('\t', &tab);
                tree.set_leaf_text(leaf, replaced);
            }
        }
        found && !fix
    }

    fn check_indentation(&self, pass: &mut FilePass<'_>, tree: &mut SyntaxTree) {
        let root = tree.root();
        let trailing = tree.last_leaf(root);
        let mut indent = IndentContext::new(self.config.indentation_size);

        for node in tree.descendants(root) {
            indent.check_and_reset(tree, node);
            let kind = tree.kind(node);
            if tokens::is_opening(kind) {
                indent.push_scope(kind);
            } else if tokens::is_closing(kind) {
                let after_break = tree
                    .prev_sibling(node)
                    .is_some_and(|p| tree.is_line_break(p));
                if !after_break {
                    indent.dec(kind);
                }
            } else if tree.is_line_break(node) && node != trailing {
                self.visit_whitespace(pass, tree, &mut indent, node);
            }
        }
    }

    fn visit_whitespace(
        &self,
        pass: &mut FilePass<'_>,
        tree: &mut SyntaxTree,
        indent: &mut IndentContext,
        ws: NodeId,
    ) {
        indent.maybe_increment();
        if let Some(next) = tree.next_sibling(ws) {
            let next_kind = tree.kind(next);
            if tokens::is_closing(next_kind) {
                indent.dec(next_kind);
            }
        }

        let text = tree.leaf_text(ws);
        let line_start = text.rfind('\n').map_or(0, |i| i + 1);
        let error = IndentationError {
            expected: indent.indent(),
            actual: i32::try_from(text[line_start..].chars().count()).unwrap_or(i32::MAX),
        };

        let verdict = self
            .checkers
            .iter()
            .find_map(|c| c.try_check(tree, ws, error).map(|r| (c.as_ref(), r)));
        let expected = verdict
            .and_then(|(_, r)| r.expected_indent)
            .unwrap_or(error.expected)
            .max(0);

        if let Some((checker, result)) = verdict {
            let in_template = tree
                .find_ancestor(ws, NodeKind::LongStringTemplateEntry)
                .is_some();
            if result.adjust_next && !in_template {
                let initiator = checker.exception_initiator(tree, ws);
                debug!(
                    checker = checker.name(),
                    extra = expected - error.expected,
                    "exceptional indent"
                );
                indent.add_exception(initiator, expected - error.expected, result.include_last_child);
            }
        }

        let is_correct = verdict.is_some_and(|(_, r)| r.is_correct);
        if is_correct || expected == error.actual {
            return;
        }

        let offset = pass.line_start(ws);
        self.report(
            pass,
            offset,
            format!("expected {expected} but was {}", error.actual),
        );

        if pass.ctx.mode.is_fix() {
            if let Some(template) = string_literal::indented_raw_string(tree, ws) {
                string_literal::reindent_raw_string(
                    tree,
                    template,
                    expected,
                    self.config.indentation_size,
                );
            }
            let prefix = &tree.leaf_text(ws)[..line_start];
            let fixed = format!(
                "{prefix}{}",
                " ".repeat(usize::try_from(expected).unwrap_or(0))
            );
            debug!(
                offset,
                expected,
                actual = error.actual,
                regular = indent.regular_indent(),
                scopes = indent.open_scopes(),
                "fixing indentation"
            );
            tree.set_leaf_text(ws, fixed);
        }
    }

    fn check_newline_at_end(&self, pass: &mut FilePass<'_>, tree: &mut SyntaxTree) {
        let root = tree.root();
        let ctx = pass.ctx;
        let file = ctx.file_name();
        let fix = ctx.mode.is_fix();
        if pass.source.is_empty() {
            return;
        }
        let last = tree.last_leaf(root);

        if tree.kind(last).is_whitespace() {
            let newlines = tree.leaf_text(last).matches('\n').count();
            if newlines == 1 {
                return;
            }
            let message = if newlines == 0 {
                format!("no newline at end of file {file}")
            } else {
                format!("too many blank lines at end of file {file}")
            };
            let offset = pass.spans.start(last);
            self.report(pass, offset, message);
            if fix {
                tree.set_leaf_text(last, "\n");
            }
        } else {
            let offset = pass.spans.text_len();
            self.report(pass, offset, format!("no newline at end of file {file}"));
            if fix {
                tree.insert_leaf(root, usize::MAX, NodeKind::WhiteSpace, "\n");
            }
        }
    }
}

impl Default for IndentationRule {
    fn default() -> Self {
        Self::new(IndentationConfig::default())
    }
}

impl Rule for IndentationRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn code(&self) -> &'static str {
        Self::CODE
    }

    fn description(&self) -> &'static str {
        "Indentation must follow nesting depth; no tabs; exactly one newline at end of file"
    }

    fn check(&self, ctx: &FileContext, tree: &mut SyntaxTree) -> Vec<Violation> {
        debug!(file = %ctx.relative_path.display(), mode = ?ctx.mode, "checking indentation");
        let source = tree.text(tree.root());
        let mut pass = FilePass {
            ctx,
            source: &source,
            lines: LineIndex::new(&source),
            spans: tree.spans(),
            out: Vec::new(),
        };

        if self.check_tabs(&mut pass, tree) {
            info!(
                file = %ctx.relative_path.display(),
                "tabs remain, skipping indentation check"
            );
        } else {
            self.check_indentation(&mut pass, tree);
        }
        if self.config.newline_at_end {
            self.check_newline_at_end(&mut pass, tree);
        }

        let mut out = pass.out;
        out.sort_by_key(|v| v.location.offset);
        out
    }
}

//! Lowering of tree-sitter syntax trees into lossless [`SyntaxTree`]s.
//!
//! Tree-sitter leaves the whitespace between tokens out of its tree. The
//! lowering puts it back as explicit [`NodeKind::WhiteSpace`] leaves placed
//! between the two siblings it separates, so every byte of the source ends
//! up in exactly one leaf. Grammar nodes are mapped onto the node kinds the
//! indentation checkers look for; anything unrecognized becomes
//! [`NodeKind::Other`] and only contributes its brackets.

use kstyle_core::{NodeKind, SyntaxTree, TreeBuilder, TreeError};
use tree_sitter::Node;

use crate::kdoc::split_kdoc;

/// Grammar nodes whose children are spliced into the parent.
const TRANSPARENT: &[&str] = &["function_body", "annotated_lambda"];

/// Grammar nodes made of two operands around an operator.
const BINARY: &[&str] = &[
    "binary_expression",
    "in_expression",
    "is_expression",
    "as_expression",
    "range_expression",
    "infix_expression",
];

/// Synthetic node opened around a run of grammar children.
#[derive(Clone, Copy, Default)]
struct Wrap {
    open: Option<NodeKind>,
    close: bool,
}

pub(crate) struct Lowering<'s> {
    src: &'s str,
    builder: TreeBuilder,
}

impl<'s> Lowering<'s> {
    /// Lowers the tree rooted at `root`, covering all of `src`.
    pub(crate) fn lower(src: &'s str, root: Node<'_>) -> Result<SyntaxTree, TreeError> {
        let mut lowering = Self {
            src,
            builder: TreeBuilder::new(),
        };
        lowering.builder.start_node(NodeKind::File);
        lowering.children(root, 0, src.len(), NodeKind::File);
        lowering.builder.finish_node();
        lowering.builder.finish()
    }

    fn node(&mut self, node: Node<'_>, parent: NodeKind) {
        let (start, end) = (node.start_byte(), node.end_byte());
        if start == end {
            return;
        }
        let kind = node.kind();
        if TRANSPARENT.contains(&kind) {
            self.children(node, start, end, parent);
            return;
        }
        if node.child_count() == 0 {
            self.leaf(node, parent);
            return;
        }
        let lowered = classify(node, self.src);
        if lowered == NodeKind::StringTemplate {
            self.string(node);
            return;
        }
        self.builder.start_node(lowered);
        self.children(node, start, end, lowered);
        self.builder.finish_node();
    }

    fn children(&mut self, node: Node<'_>, start: usize, end: usize, kind: NodeKind) {
        let mut cursor = node.walk();
        let kids: Vec<Node<'_>> = node.children(&mut cursor).collect();
        let wraps = plan_wraps(kind, &kids, self.src);

        let mut pos = start;
        for (child, wrap) in kids.iter().zip(wraps) {
            self.gap(pos, child.start_byte());
            if let Some(open) = wrap.open {
                self.builder.start_node(open);
            }
            self.node(*child, kind);
            if wrap.close {
                self.builder.finish_node();
            }
            pos = pos.max(child.end_byte());
        }
        self.gap(pos, end);
    }

    /// Emits source text that no grammar node covers.
    fn gap(&mut self, from: usize, to: usize) {
        if from >= to {
            return;
        }
        let src = self.src;
        let text = &src[from..to];
        let mut run_start = 0;
        let mut run_blank = None;
        for (i, c) in text.char_indices() {
            let blank = c.is_whitespace();
            if run_blank.is_some_and(|b| b != blank) {
                self.gap_run(&text[run_start..i], run_blank == Some(true));
                run_start = i;
            }
            run_blank = Some(blank);
        }
        self.gap_run(&text[run_start..], run_blank == Some(true));
    }

    fn gap_run(&mut self, text: &str, blank: bool) {
        let kind = match text {
            _ if blank => NodeKind::WhiteSpace,
            ";" => NodeKind::Semicolon,
            _ => NodeKind::Other,
        };
        self.builder.token(kind, text);
    }

    fn leaf(&mut self, node: Node<'_>, parent: NodeKind) {
        let src = self.src;
        let text = &src[node.start_byte()..node.end_byte()];
        if node.kind().contains("comment") {
            self.comment(text);
            return;
        }
        let kind = if node.is_named() {
            if parent == NodeKind::BinaryExpression && is_infix_operator(node) {
                NodeKind::OperationReference
            } else {
                named_leaf(node.kind())
            }
        } else {
            token(text, parent)
        };
        self.builder.token(kind, text);
    }

    fn comment(&mut self, text: &str) {
        if text.starts_with("//") {
            self.builder.token(NodeKind::EolComment, text);
        } else if let Some(pieces) = split_kdoc(text) {
            self.builder.start_node(NodeKind::KDoc);
            for (kind, piece) in pieces {
                self.builder.token(kind, piece);
            }
            self.builder.finish_node();
        } else {
            self.builder.token(NodeKind::BlockComment, text);
        }
    }

    /// Lowers a string literal. Text between the quotes becomes literal
    /// entries with every `'\n'` as an entry of its own; only `${...}`
    /// interpolations are lowered as code.
    fn string(&mut self, node: Node<'_>) {
        let src = self.src;
        let (start, end) = (node.start_byte(), node.end_byte());
        let text = &src[start..end];
        let quote = if text.len() >= 6 && text.starts_with("\"\"\"") && text.ends_with("\"\"\"") {
            3
        } else if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
            1
        } else {
            0
        };
        let (inner_start, inner_end) = (start + quote, end - quote);

        self.builder.start_node(NodeKind::StringTemplate);
        if quote > 0 {
            self.builder
                .token(NodeKind::OpenQuote, &src[start..inner_start]);
        }
        let mut pos = inner_start;
        let mut cursor = node.walk();
        let kids: Vec<Node<'_>> = node.children(&mut cursor).collect();
        for child in kids {
            let (child_start, child_end) = (child.start_byte(), child.end_byte());
            // Quote tokens sit outside the inner range.
            if child_end <= inner_start || child_start >= inner_end {
                continue;
            }
            self.literal(pos, child_start);
            let child_text = &src[child_start..child_end];
            if child.child_count() == 0 {
                self.literal(child_start, child_end);
            } else if child_text.starts_with("${") {
                self.builder.start_node(NodeKind::LongStringTemplateEntry);
                self.children(
                    child,
                    child_start,
                    child_end,
                    NodeKind::LongStringTemplateEntry,
                );
                self.builder.finish_node();
            } else if child_text.starts_with('$') {
                self.builder
                    .token(NodeKind::ShortStringTemplateEntry, child_text);
            } else {
                self.literal(child_start, child_end);
            }
            pos = pos.max(child_end);
        }
        self.literal(pos, inner_end);
        if quote > 0 {
            self.builder
                .token(NodeKind::ClosingQuote, &src[inner_end..end]);
        }
        self.builder.finish_node();
    }

    fn literal(&mut self, from: usize, to: usize) {
        if from >= to {
            return;
        }
        let src = self.src;
        for piece in split_newlines(&src[from..to]) {
            self.builder
                .token(NodeKind::LiteralStringTemplateEntry, piece);
        }
    }
}

/// Splits `text` so that each `'\n'` is a piece of its own.
fn split_newlines(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (i, _) in text.match_indices('\n') {
        if start < i {
            pieces.push(&text[start..i]);
        }
        pieces.push(&text[i..=i]);
        start = i + 1;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

fn classify(node: Node<'_>, src: &str) -> NodeKind {
    match node.kind() {
        "source_file" => NodeKind::File,
        "class_declaration" | "object_declaration" | "companion_object" => NodeKind::Class,
        "class_body" | "enum_class_body" => NodeKind::ClassBody,
        "function_declaration" | "secondary_constructor" | "anonymous_function" => {
            NodeKind::Function
        }
        "block" => NodeKind::Block,
        "property_declaration" => NodeKind::Property,
        "getter" | "setter" => NodeKind::PropertyAccessor,
        "function_value_parameters" | "class_parameters" => NodeKind::ValueParameterList,
        "parameter" | "class_parameter" => NodeKind::ValueParameter,
        "value_arguments" => NodeKind::ValueArgumentList,
        "value_argument" => NodeKind::ValueArgument,
        "call_expression" => NodeKind::CallExpression,
        "navigation_expression" => {
            if has_token(node, src, "?.") {
                NodeKind::SafeAccessExpression
            } else {
                NodeKind::DotQualifiedExpression
            }
        }
        "if_expression" => NodeKind::If,
        "for_statement" => NodeKind::For,
        "while_statement" => NodeKind::While,
        "do_while_statement" => NodeKind::DoWhile,
        "when_expression" => NodeKind::When,
        "when_entry" => NodeKind::WhenEntry,
        "lambda_literal" => NodeKind::Lambda,
        "delegation_specifiers" => NodeKind::SuperTypeList,
        "delegation_specifier" => NodeKind::SuperTypeEntry,
        "string_literal" | "multiline_string_literal" => NodeKind::StringTemplate,
        "ERROR" => NodeKind::Error,
        kind if BINARY.contains(&kind) => NodeKind::BinaryExpression,
        _ => NodeKind::Other,
    }
}

/// Looks for an anonymous `token` among the children, seeing through
/// transparent nodes.
fn has_token(node: Node<'_>, src: &str, token: &str) -> bool {
    let mut cursor = node.walk();
    let kids: Vec<Node<'_>> = node.children(&mut cursor).collect();
    kids.into_iter().any(|child| {
        if TRANSPARENT.contains(&child.kind()) {
            has_token(child, src, token)
        } else {
            !child.is_named() && &src[child.start_byte()..child.end_byte()] == token
        }
    })
}

/// Returns `true` for the function name in `a to b`.
fn is_infix_operator(node: Node<'_>) -> bool {
    let Some(parent) = node.parent().filter(|p| p.kind() == "infix_expression") else {
        return false;
    };
    let mut cursor = parent.walk();
    let operator = parent
        .named_children(&mut cursor)
        .filter(|c| !c.kind().contains("comment"))
        .nth(1);
    operator == Some(node)
}

fn named_leaf(kind: &str) -> NodeKind {
    match kind {
        "identifier" | "label" => NodeKind::Identifier,
        kind if kind.ends_with("_literal") => NodeKind::Literal,
        _ => NodeKind::Other,
    }
}

fn token(text: &str, parent: NodeKind) -> NodeKind {
    if parent == NodeKind::LongStringTemplateEntry {
        match text {
            "${" | "$" | "{" => return NodeKind::LongTemplateStart,
            "}" => return NodeKind::LongTemplateEnd,
            _ => {}
        }
    }
    match text {
        "(" => NodeKind::LParen,
        ")" => NodeKind::RParen,
        "{" => NodeKind::LBrace,
        "}" => NodeKind::RBrace,
        "[" => NodeKind::LBracket,
        "]" => NodeKind::RBracket,
        "=" => NodeKind::Eq,
        "->" => NodeKind::Arrow,
        ":" => NodeKind::Colon,
        "," => NodeKind::Comma,
        "." => NodeKind::Dot,
        "?." => NodeKind::SafeAccess,
        ";" => NodeKind::Semicolon,
        _ if parent == NodeKind::BinaryExpression => NodeKind::OperationReference,
        _ if text.chars().all(char::is_alphabetic) => NodeKind::Keyword,
        _ => NodeKind::Other,
    }
}

/// Decides which children get wrapped into synthetic nodes: the branches of
/// `if` and the bodies of loops.
fn plan_wraps(kind: NodeKind, kids: &[Node<'_>], src: &str) -> Vec<Wrap> {
    let mut wraps = vec![Wrap::default(); kids.len()];
    let text = |n: &Node<'_>| &src[n.start_byte()..n.end_byte()];

    match kind {
        NodeKind::If | NodeKind::For | NodeKind::While | NodeKind::DoWhile => {
            let mut previous: Option<&str> = None;
            for (i, child) in kids.iter().enumerate() {
                if child.kind().contains("comment") {
                    continue;
                }
                if child.is_named() {
                    let body = match (kind, previous) {
                        (NodeKind::If, Some(")")) => Some(NodeKind::Then),
                        (NodeKind::If, Some("else")) => Some(NodeKind::Else),
                        (NodeKind::For | NodeKind::While, Some(")"))
                        | (NodeKind::DoWhile, Some("do")) => Some(NodeKind::Body),
                        _ => None,
                    };
                    if body.is_some() {
                        wraps[i] = Wrap {
                            open: body,
                            close: true,
                        };
                    }
                    previous = None;
                } else {
                    previous = Some(text(child));
                }
            }
        }
        _ => {}
    }
    wraps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newlines_are_separate_pieces() {
        assert_eq!(split_newlines("a\n\n  b\n"), vec!["a", "\n", "\n", "  b", "\n"]);
        assert_eq!(split_newlines("x"), vec!["x"]);
        assert!(split_newlines("").is_empty());
    }

    #[test]
    fn tokens_map_by_text_and_parent() {
        assert_eq!(token("{", NodeKind::Block), NodeKind::LBrace);
        assert_eq!(token("}", NodeKind::LongStringTemplateEntry), NodeKind::LongTemplateEnd);
        assert_eq!(token("+", NodeKind::BinaryExpression), NodeKind::OperationReference);
        assert_eq!(token("+", NodeKind::Other), NodeKind::Other);
        assert_eq!(token("val", NodeKind::Property), NodeKind::Keyword);
        assert_eq!(token("?.", NodeKind::SafeAccessExpression), NodeKind::SafeAccess);
    }

    #[test]
    fn named_leaves() {
        assert_eq!(named_leaf("identifier"), NodeKind::Identifier);
        assert_eq!(named_leaf("number_literal"), NodeKind::Literal);
        assert_eq!(named_leaf("modifiers"), NodeKind::Other);
    }
}

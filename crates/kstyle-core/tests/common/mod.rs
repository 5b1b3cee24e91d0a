//! Shared helpers: a tiny bracket-aware lexer that builds lossless trees.
//!
//! Brackets become nested nodes (`{}` a block, `()` an argument list, `[]`
//! an opaque node), whitespace runs become whitespace leaves, `=` and `.`
//! become their own tokens, and every other run is an identifier.

#![allow(dead_code)]

use kstyle_core::{
    FileContext, FixMode, IndentationConfig, IndentationRule, NodeKind, Rule, SyntaxTree,
    TreeBuilder, Violation,
};
use std::path::Path;

pub fn lex(source: &str) -> SyntaxTree {
    let mut b = TreeBuilder::new();
    b.start_node(NodeKind::File);

    let mut chars = source.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        let mut end = start + c.len_utf8();
        match c {
            '{' => {
                b.start_node(NodeKind::Block).token(NodeKind::LBrace, "{");
            }
            '(' => {
                b.start_node(NodeKind::ValueArgumentList)
                    .token(NodeKind::LParen, "(");
            }
            '[' => {
                b.start_node(NodeKind::Other).token(NodeKind::LBracket, "[");
            }
            '}' => {
                b.token(NodeKind::RBrace, "}").finish_node();
            }
            ')' => {
                b.token(NodeKind::RParen, ")").finish_node();
            }
            ']' => {
                b.token(NodeKind::RBracket, "]").finish_node();
            }
            '=' => {
                b.token(NodeKind::Eq, "=");
            }
            '.' => {
                b.token(NodeKind::Dot, ".");
            }
            c if c.is_whitespace() => {
                while let Some(&(i, n)) = chars.peek() {
                    if !n.is_whitespace() {
                        break;
                    }
                    end = i + n.len_utf8();
                    chars.next();
                }
                b.token(NodeKind::WhiteSpace, &source[start..end]);
            }
            _ => {
                while let Some(&(i, n)) = chars.peek() {
                    if n.is_whitespace() || "{}()[]=.".contains(n) {
                        break;
                    }
                    end = i + n.len_utf8();
                    chars.next();
                }
                b.token(NodeKind::Identifier, &source[start..end]);
            }
        }
    }

    b.finish_node();
    b.finish().expect("balanced brackets")
}

pub fn run(config: &IndentationConfig, tree: &mut SyntaxTree, mode: FixMode) -> Vec<Violation> {
    let ctx = FileContext::new(Path::new("/project/Test.kt"), Path::new("/project"), mode);
    IndentationRule::new(config.clone()).check(&ctx, tree)
}

pub fn check(config: &IndentationConfig, source: &str) -> Vec<Violation> {
    run(config, &mut lex(source), FixMode::Check)
}

pub fn fix(config: &IndentationConfig, source: &str) -> (String, Vec<Violation>) {
    let mut tree = lex(source);
    let violations = run(config, &mut tree, FixMode::Fix);
    (tree.text(tree.root()), violations)
}

pub fn messages(violations: &[Violation]) -> Vec<&str> {
    violations.iter().map(|v| v.message.as_str()).collect()
}

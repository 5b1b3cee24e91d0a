//! Kotlin front end using Tree-sitter.

use kstyle_core::{ParseError, SourceParser, SyntaxTree};
use tree_sitter::{Language, Node, Parser};
use tracing::debug;

use crate::lower::Lowering;

/// Parses Kotlin sources (`.kt`, `.kts`) into lossless syntax trees.
pub struct KotlinParser {
    language: Language,
}

impl KotlinParser {
    /// Creates a new Kotlin parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_kotlin_ng::LANGUAGE.into(),
        }
    }

    /// Finds the first error or missing node in document order.
    fn first_error(node: Node<'_>) -> Option<Node<'_>> {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            return None;
        }
        let mut cursor = node.walk();
        let kids: Vec<Node<'_>> = node.children(&mut cursor).collect();
        kids.into_iter().find_map(Self::first_error)
    }
}

impl Default for KotlinParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser for KotlinParser {
    fn language_id(&self) -> &'static str {
        "kotlin"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["kt", "kts"]
    }

    fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ParseError::Language {
                language: "kotlin",
                message: e.to_string(),
            })?;

        let tree = parser.parse(source, None).ok_or(ParseError::NoTree)?;
        let root = tree.root_node();
        if root.has_error() {
            let at = Self::first_error(root).unwrap_or(root).start_position();
            return Err(ParseError::Syntax {
                line: at.row + 1,
                column: at.column + 1,
            });
        }

        let lowered = Lowering::lower(source, root)?;
        debug!(nodes = lowered.len(), "lowered kotlin source");
        Ok(lowered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kstyle_core::NodeKind;

    fn parse(src: &str) -> SyntaxTree {
        KotlinParser::new().parse(src).unwrap()
    }

    fn kinds(tree: &SyntaxTree) -> Vec<NodeKind> {
        tree.descendants(tree.root())
            .into_iter()
            .map(|n| tree.kind(n))
            .collect()
    }

    #[test]
    fn handles_kotlin_extensions() {
        let parser = KotlinParser::new();
        assert_eq!(parser.language_id(), "kotlin");
        assert!(parser.handles("kt"));
        assert!(parser.handles("KTS"));
        assert!(!parser.handles("java"));
    }

    #[test]
    fn tree_text_is_the_source() {
        let src = "package a.b\n\nimport c.D\n\nclass A(val x: Int) : D {\n    fun f() = x + 1\n}\n";
        let tree = parse(src);
        assert_eq!(tree.text(tree.root()), src);
    }

    #[test]
    fn leading_and_trailing_blanks_are_kept() {
        let src = "\n\n  val x = 1  \n\n";
        let tree = parse(src);
        assert_eq!(tree.text(tree.root()), src);
        let last = tree.last_leaf(tree.root());
        assert_eq!(tree.kind(last), NodeKind::WhiteSpace);
    }

    #[test]
    fn braces_become_scope_tokens() {
        let tree = parse("fun f() {\n    g()\n}\n");
        let kinds = kinds(&tree);
        assert!(kinds.contains(&NodeKind::LBrace));
        assert!(kinds.contains(&NodeKind::RBrace));
        assert!(kinds.contains(&NodeKind::LParen));
    }

    #[test]
    fn kdoc_is_split() {
        let tree = parse("/**\n * Doc.\n */\nfun f() {}\n");
        let kinds = kinds(&tree);
        assert!(kinds.contains(&NodeKind::KDoc));
        assert!(kinds.contains(&NodeKind::KDocLeadingAsterisk));
    }

    #[test]
    fn string_content_is_never_whitespace() {
        let src = "val s = \"\"\"\n    a b\n\"\"\"\n";
        let tree = parse(src);
        let template = tree
            .descendants(tree.root())
            .into_iter()
            .find(|&n| tree.kind(n) == NodeKind::StringTemplate)
            .unwrap();
        assert!(tree
            .leaves(template)
            .iter()
            .all(|&l| tree.kind(l) != NodeKind::WhiteSpace));
        assert_eq!(tree.text(template), "\"\"\"\n    a b\n\"\"\"");
    }

    fn operators(tree: &SyntaxTree) -> Vec<String> {
        tree.descendants(tree.root())
            .into_iter()
            .filter(|&n| tree.kind(n) == NodeKind::OperationReference)
            .filter(|&n| tree.parent(n).is_some_and(|p| tree.kind(p) == NodeKind::BinaryExpression))
            .map(|n| tree.leaf_text(n).to_string())
            .collect()
    }

    #[test]
    fn binary_operators_are_operation_references() {
        let tree = parse(
            "val a = b &&\n    c\nval d = e ?: f\nval g = h + i\nval j = k in l\nval m = n is String\nval o = p..q\n",
        );
        assert_eq!(operators(&tree), vec!["&&", "?:", "+", "in", "is", ".."]);
    }

    #[test]
    fn infix_call_name_is_the_operator() {
        let tree = parse("val p = a to b\n");
        assert_eq!(operators(&tree), vec!["to"]);
        let identifiers: Vec<_> = tree
            .leaves(tree.root())
            .into_iter()
            .filter(|&n| tree.kind(n) == NodeKind::Identifier)
            .map(|n| tree.leaf_text(n).to_string())
            .collect();
        assert_eq!(identifiers, vec!["p", "a", "b"]);
    }

    #[test]
    fn if_branches_and_loop_bodies_are_wrapped() {
        let tree = parse("fun f() {\n    if (c)\n        a()\n    else\n        b()\n    while (c)\n        g()\n}\n");
        let kinds = kinds(&tree);
        assert!(kinds.contains(&NodeKind::Then));
        assert!(kinds.contains(&NodeKind::Else));
        assert!(kinds.contains(&NodeKind::Body));
    }

    #[test]
    fn super_types_form_a_list() {
        let tree = parse("class A : B(), C\n");
        let list = tree
            .descendants(tree.root())
            .into_iter()
            .find(|&n| tree.kind(n) == NodeKind::SuperTypeList)
            .unwrap();
        assert_eq!(tree.text(list), "B(), C");
    }

    #[test]
    fn syntax_errors_are_reported_with_position() {
        let err = KotlinParser::new().parse("fun f( {\n").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { line, column } if line >= 1 && column >= 1));
    }
}

//! Scope token classification.
//!
//! Parentheses, braces and brackets open and close nesting scopes. Every
//! other kind is neither opening nor closing.

use crate::kind::NodeKind;

/// The three kinds of nesting scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// `( ... )`
    Paren,
    /// `{ ... }`
    Brace,
    /// `[ ... ]`
    Bracket,
}

impl Scope {
    /// Kind of the token that opens this scope.
    #[must_use]
    pub fn opening(self) -> NodeKind {
        match self {
            Self::Paren => NodeKind::LParen,
            Self::Brace => NodeKind::LBrace,
            Self::Bracket => NodeKind::LBracket,
        }
    }

    /// Kind of the token that closes this scope.
    #[must_use]
    pub fn closing(self) -> NodeKind {
        match self {
            Self::Paren => NodeKind::RParen,
            Self::Brace => NodeKind::RBrace,
            Self::Bracket => NodeKind::RBracket,
        }
    }
}

/// Returns the scope opened by `kind`, if it opens one.
#[must_use]
pub fn opened_scope(kind: NodeKind) -> Option<Scope> {
    match kind {
        NodeKind::LParen => Some(Scope::Paren),
        NodeKind::LBrace => Some(Scope::Brace),
        NodeKind::LBracket => Some(Scope::Bracket),
        _ => None,
    }
}

/// Returns the scope closed by `kind`, if it closes one.
#[must_use]
pub fn closed_scope(kind: NodeKind) -> Option<Scope> {
    match kind {
        NodeKind::RParen => Some(Scope::Paren),
        NodeKind::RBrace => Some(Scope::Brace),
        NodeKind::RBracket => Some(Scope::Bracket),
        _ => None,
    }
}

/// Returns `true` if `kind` opens a nesting scope.
#[must_use]
pub fn is_opening(kind: NodeKind) -> bool {
    opened_scope(kind).is_some()
}

/// Returns `true` if `kind` closes a nesting scope.
#[must_use]
pub fn is_closing(kind: NodeKind) -> bool {
    closed_scope(kind).is_some()
}

/// Returns the opening counterpart of a closing token kind.
#[must_use]
pub fn matching_open(closing: NodeKind) -> Option<NodeKind> {
    closed_scope(closing).map(Scope::opening)
}

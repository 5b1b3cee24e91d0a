//! Node kinds of the syntax tree.

use serde::{Deserialize, Serialize};

/// Closed set of node kinds the engine distinguishes.
///
/// Front ends map their own grammar onto these kinds. Anything the engine
/// has no special handling for becomes [`NodeKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Root of a source file.
    File,
    /// `class`, `interface` or `object` declaration.
    Class,
    /// `{ ... }` body of a class-like declaration.
    ClassBody,
    /// Function or constructor declaration.
    Function,
    /// Braced statement block.
    Block,
    /// `val` / `var` declaration.
    Property,
    /// Custom `get()` / `set()` of a property.
    PropertyAccessor,
    /// Parameter list of a declaration, e.g. `(a: Int, b: Int)`.
    ValueParameterList,
    /// Single declared parameter.
    ValueParameter,
    /// Argument list of a call, e.g. `(1, 2)`.
    ValueArgumentList,
    /// Single call argument.
    ValueArgument,
    /// Call expression `callee(args)`.
    CallExpression,
    /// `receiver.selector`.
    DotQualifiedExpression,
    /// `receiver?.selector`.
    SafeAccessExpression,
    /// Infix expression with an operator between two operands.
    BinaryExpression,
    /// Operator of a binary expression (`+`, `&&`, `?:`, ...).
    OperationReference,
    /// `if` expression.
    If,
    /// Branch taken when the `if` condition holds.
    Then,
    /// `else` branch of an `if`.
    Else,
    /// `for` loop.
    For,
    /// `while` loop.
    While,
    /// `do { } while ()` loop.
    DoWhile,
    /// Body of a loop.
    Body,
    /// `when` expression.
    When,
    /// Single `condition -> body` entry of a `when`.
    WhenEntry,
    /// Lambda literal `{ x -> ... }`.
    Lambda,
    /// Super-type list after `:` in a class header.
    SuperTypeList,
    /// Single entry of a super-type list.
    SuperTypeEntry,
    /// String literal, plain or raw (`"""`).
    StringTemplate,
    /// Literal text inside a string.
    LiteralStringTemplateEntry,
    /// `$name` inside a string.
    ShortStringTemplateEntry,
    /// `${ expression }` inside a string.
    LongStringTemplateEntry,
    /// `${` opening a long template entry.
    LongTemplateStart,
    /// `}` closing a long template entry.
    LongTemplateEnd,
    /// Opening quote of a string literal.
    OpenQuote,
    /// Closing quote of a string literal.
    ClosingQuote,
    /// Documentation comment `/** ... */`.
    KDoc,
    /// `/**` that opens a documentation comment.
    KDocStart,
    /// Text inside a documentation comment.
    KDocText,
    /// `*` at the start of a documentation comment line.
    KDocLeadingAsterisk,
    /// `*/` that closes a documentation comment.
    KDocEnd,
    /// `// ...` comment.
    EolComment,
    /// `/* ... */` comment.
    BlockComment,
    /// Spaces, tabs and line breaks between tokens.
    WhiteSpace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `=`
    Eq,
    /// `->`
    Arrow,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `?.`
    SafeAccess,
    /// `;`
    Semicolon,
    /// Identifier or name reference.
    Identifier,
    /// Keyword or modifier token.
    Keyword,
    /// Numeric, character or boolean literal.
    Literal,
    /// Region the front end could not parse.
    Error,
    /// Any construct without special meaning to the engine.
    Other,
}

impl NodeKind {
    /// Returns `true` for whitespace leaves.
    #[must_use]
    pub fn is_whitespace(self) -> bool {
        self == Self::WhiteSpace
    }

    /// Returns `true` for `for`, `while` and `do-while` loops.
    #[must_use]
    pub fn is_loop(self) -> bool {
        matches!(self, Self::For | Self::While | Self::DoWhile)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

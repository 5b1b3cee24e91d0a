//! Front-end extension point.
//!
//! A `SourceParser` turns source text of one language into a [`SyntaxTree`]
//! whose leaves concatenate back to exactly that text. Implement it to add
//! support for a new language.

use crate::tree::{SyntaxTree, TreeError};

/// Errors a front end can report.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The grammar could not be loaded into the parser.
    #[error("Failed to load {language} grammar: {message}")]
    Language {
        /// Language identifier.
        language: &'static str,
        /// Loader message.
        message: String,
    },

    /// The parser produced no tree at all.
    #[error("Parser returned no tree")]
    NoTree,

    /// The source contains syntax errors.
    #[error("Syntax error at {line}:{column}")]
    Syntax {
        /// Line of the first error (1-indexed).
        line: usize,
        /// Column of the first error (1-indexed).
        column: usize,
    },

    /// Lowering produced an inconsistent tree.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Trait for language-specific front ends.
pub trait SourceParser: Send + Sync {
    /// Language identifier (e.g., `"kotlin"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this parser handles (e.g., `&["kt", "kts"]`), without the dot.
    fn extensions(&self) -> &'static [&'static str];

    /// Parses source text into a lossless syntax tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be loaded or the source does
    /// not parse cleanly.
    fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError>;

    /// Returns `true` if this parser handles files with the given extension.
    fn handles(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

/// Type alias for boxed `SourceParser` trait objects.
pub type ParserBox = Box<dyn SourceParser>;

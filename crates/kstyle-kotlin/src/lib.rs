//! # kstyle-kotlin
//!
//! Tree-sitter based Kotlin front end for kstyle.
//!
//! [`KotlinParser`] implements [`kstyle_core::SourceParser`]: it parses
//! Kotlin with `tree-sitter-kotlin-ng` and lowers the result into a lossless
//! [`kstyle_core::SyntaxTree`], restoring the whitespace tree-sitter drops
//! and splitting KDoc comments so their line breaks can be checked.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod kdoc;
pub mod kotlin;
mod lower;

pub use kdoc::split_kdoc;
pub use kotlin::KotlinParser;

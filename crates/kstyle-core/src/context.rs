//! Context types for rule execution.

use std::path::{Path, PathBuf};

/// Whether rules only report or also correct what they find.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FixMode {
    /// Report violations, leave the tree untouched.
    #[default]
    Check,
    /// Report violations and rewrite the tree in place.
    Fix,
}

impl FixMode {
    /// Returns `true` in fix mode.
    #[must_use]
    pub fn is_fix(self) -> bool {
        self == Self::Fix
    }
}

/// Context provided to per-file rules.
///
/// Contains metadata about the file being analyzed. The file text itself
/// lives in the syntax tree handed to the rule alongside this context.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// Path relative to the project root, used in locations and messages.
    pub relative_path: PathBuf,
    /// Check or fix.
    pub mode: FixMode,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, root: &Path, mode: FixMode) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            relative_path,
            mode,
        }
    }

    /// File name for diagnostic messages.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |n| n.to_string_lossy().into_owned())
    }
}

//! Core analyzer for orchestrating lint execution.

use crate::config::Config;
use crate::context::{FileContext, FixMode};
use crate::parser::{ParserBox, SourceParser};
use crate::rule::{Rule, RuleBox};
use crate::types::{LintResult, Violation};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading or writing files.
    #[error("IO error on {path}: {source}")]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Error parsing a source file.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// No registered parser handles the file.
    #[error("No parser for {0}")]
    Unsupported(PathBuf),

    /// Error walking the directory tree.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Outcome of checking one source text.
#[derive(Debug, Default)]
pub struct FileOutcome {
    /// Violations from all enabled rules.
    pub violations: Vec<Violation>,
    /// Corrected text, if fix mode changed anything.
    pub fixed_text: Option<String>,
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    parsers: Vec<ParserBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    mode: FixMode,
    fail_on_parse_error: Option<bool>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory (or single file) to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a per-file rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed per-file rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds a language front end.
    #[must_use]
    pub fn parser<P: SourceParser + 'static>(mut self, parser: P) -> Self {
        self.parsers.push(Box::new(parser));
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets check or fix mode (default: check).
    #[must_use]
    pub fn mode(mut self, mode: FixMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets whether to fail on parse errors (default: from config, else false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = Some(fail);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined or an
    /// exclude pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();
        let root = self.root.unwrap_or_else(|| config.analyzer.root.clone());

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()
                .map_err(|source| AnalyzerError::Io {
                    path: root.clone(),
                    source,
                })?
                .join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());
        let excludes = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Analyzer {
            root,
            rules: self.rules,
            parsers: self.parsers,
            excludes,
            fail_on_parse_error: self
                .fail_on_parse_error
                .unwrap_or(config.analyzer.fail_on_parse_error),
            respect_gitignore: config.analyzer.respect_gitignore,
            config,
            mode: self.mode,
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance. Every file gets its
/// own tree and rule state, so files never influence each other.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    parsers: Vec<ParserBox>,
    excludes: Vec<glob::Pattern>,
    config: Config,
    mode: FixMode,
    fail_on_parse_error: bool,
    respect_gitignore: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the configuration in effect.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyzes all files and returns the results.
    ///
    /// In fix mode, files whose text changed are written back.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery or I/O fails, or if a file does not
    /// parse and `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {}", self.root.display());

        let mut result = LintResult::new();
        let files = self.discover_files()?;

        info!("Found {} files to analyze", files.len());

        for file_path in &files {
            match self.analyze_file(file_path) {
                Ok((violations, fixed)) => {
                    result.violations.extend(violations);
                    result.files_checked += 1;
                    if fixed {
                        result.files_fixed += 1;
                    }
                }
                Err(AnalyzerError::Parse { path, message }) => {
                    warn!("Failed to parse {}: {}", path.display(), message);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Parse { path, message });
                    }
                }
                Err(e) => return Err(e),
            }
        }

        result.sort();

        info!(
            "Analysis complete: {} violations in {} files ({} fixed)",
            result.violations.len(),
            result.files_checked,
            result.files_fixed
        );

        Ok(result)
    }

    /// Checks one source text as if it were the file at `path`.
    ///
    /// Nothing is written; in fix mode the corrected text is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if no parser handles `path` or the text does not parse.
    pub fn check_source(&self, path: &Path, source: &str) -> Result<FileOutcome, AnalyzerError> {
        let parser = self
            .parser_for(path)
            .ok_or_else(|| AnalyzerError::Unsupported(path.to_path_buf()))?;
        let mut tree = parser.parse(source).map_err(|e| AnalyzerError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let base = if self.root.is_file() {
            self.root.parent().unwrap_or(&self.root)
        } else {
            &self.root
        };
        let ctx = FileContext::new(path, base, self.mode);
        let mut outcome = FileOutcome::default();

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let rule_violations = rule.check(&ctx, &mut tree);
            let rule_violations = self.apply_severity_override(rule.name(), rule_violations);
            outcome.violations.extend(rule_violations);
        }

        if self.mode.is_fix() {
            let text = tree.text(tree.root());
            if text != source {
                outcome.fixed_text = Some(text);
            }
        }
        Ok(outcome)
    }

    /// Analyzes a single file, writing fixes back. Returns whether it was rewritten.
    fn analyze_file(&self, path: &Path) -> Result<(Vec<Violation>, bool), AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|source| AnalyzerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let outcome = self.check_source(path, &content)?;

        let fixed = match outcome.fixed_text {
            Some(text) => {
                std::fs::write(path, text).map_err(|source| AnalyzerError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                debug!("Wrote fixes to {}", path.display());
                true
            }
            None => false,
        };
        Ok((outcome.violations, fixed))
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        rule_name: &str,
        mut violations: Vec<Violation>,
    ) -> Vec<Violation> {
        if let Some(severity) = self.config.rule_severity(rule_name) {
            for v in &mut violations {
                v.severity = severity;
            }
        }
        violations
    }

    fn parser_for(&self, path: &Path) -> Option<&dyn SourceParser> {
        let ext = path.extension().and_then(|e| e.to_str())?;
        self.parsers
            .iter()
            .find(|p| p.handles(ext))
            .map(AsRef::as_ref)
    }

    /// Discovers all source files some registered parser handles.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .require_git(false);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() || self.parser_for(path).is_none() {
                continue;
            }
            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path matches an exclude pattern, relative to the root or absolute.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.excludes
            .iter()
            .any(|pattern| pattern.matches_path(relative) || pattern.matches_path(path))
    }
}

//! Configuration types for kstyle.

use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration for kstyle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Severity threshold for a failing exit code (default: "warning").
    #[serde(default = "default_fail_on")]
    pub fail_on: Severity,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Per-rule configurations.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fail_on: default_fail_on(),
            analyzer: AnalyzerConfig::default(),
            rules: HashMap::new(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<Severity> {
        self.rules.get(rule_name).and_then(|c| c.severity)
    }

    /// Gets the options table of a rule, if configured.
    #[must_use]
    pub fn rule_config(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_name)
    }
}

fn default_fail_on() -> Severity {
    Severity::Warning
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Whether a file that fails to parse aborts the run instead of being skipped.
    #[serde(default)]
    pub fail_on_parse_error: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: vec!["**/build/**".to_string(), "**/.gradle/**".to_string()],
            respect_gitignore: true,
            fail_on_parse_error: false,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Creates an empty rule configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an option, returning the updated configuration.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Gets a raw option value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.options.get(key)
    }

    /// Gets a boolean option with a default value.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.options
            .get(key)
            .and_then(toml::Value::as_bool)
            .unwrap_or(default)
    }

    /// Gets an integer option with a default value.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.options
            .get(key)
            .and_then(toml::Value::as_integer)
            .unwrap_or(default)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.analyzer.respect_gitignore);
        assert!(!config.analyzer.fail_on_parse_error);
        assert_eq!(config.fail_on, Severity::Warning);
        assert!(config.rules.is_empty());
        assert!(config.is_rule_enabled("wrong-indentation"));
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
fail_on = "error"

[analyzer]
root = "./src"
exclude = ["**/generated/**"]

[rules.wrong-indentation]
enabled = true
severity = "error"
indentationSize = 2
extendedIndentBeforeDot = "true"
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.fail_on, Severity::Error);
        assert_eq!(config.analyzer.root, PathBuf::from("./src"));
        assert_eq!(config.analyzer.exclude, vec!["**/generated/**"]);
        assert!(config.is_rule_enabled("wrong-indentation"));
        assert_eq!(config.rule_severity("wrong-indentation"), Some(Severity::Error));

        let rule_config = config.rule_config("wrong-indentation").unwrap();
        assert_eq!(rule_config.get_int("indentationSize", 4), 2);
        assert_eq!(
            rule_config.get("extendedIndentBeforeDot").and_then(toml::Value::as_str),
            Some("true")
        );
        assert!(!rule_config.options.contains_key("enabled"));
    }

    #[test]
    fn test_disabled_rule() {
        let config = Config::parse("[rules.wrong-indentation]\nenabled = false\n").unwrap();
        assert!(!config.is_rule_enabled("wrong-indentation"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::parse("fail_on = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}

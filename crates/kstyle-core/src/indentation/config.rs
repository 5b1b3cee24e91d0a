//! Options of the indentation rule.

use crate::config::RuleConfig;
use tracing::warn;

/// Immutable options for one indentation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentationConfig {
    /// Spaces per indent unit.
    pub indentation_size: i32,
    /// Require exactly one line break at the end of the file.
    pub newline_at_end: bool,
    /// Indent wrapped arguments and parameters by one extra unit.
    pub extended_indent_of_parameters: bool,
    /// Align wrapped declaration parameters with the first parameter.
    pub aligned_parameters: bool,
    /// Indent operands wrapped around a binary operator by one extra unit.
    pub extended_indent_after_operators: bool,
    /// Indent lines starting with `.` or `?.` by one extra unit.
    pub extended_indent_before_dot: bool,
}

impl Default for IndentationConfig {
    fn default() -> Self {
        Self {
            indentation_size: 4,
            newline_at_end: true,
            extended_indent_of_parameters: true,
            aligned_parameters: true,
            extended_indent_after_operators: true,
            extended_indent_before_dot: false,
        }
    }
}

impl IndentationConfig {
    /// Option key for [`Self::indentation_size`].
    pub const INDENTATION_SIZE: &'static str = "indentationSize";
    /// Option key for [`Self::newline_at_end`].
    pub const NEWLINE_AT_END: &'static str = "newlineAtEnd";
    /// Option key for [`Self::extended_indent_of_parameters`].
    pub const EXTENDED_INDENT_OF_PARAMETERS: &'static str = "extendedIndentOfParameters";
    /// Option key for [`Self::aligned_parameters`].
    pub const ALIGNED_PARAMETERS: &'static str = "alignedParameters";
    /// Option key for [`Self::extended_indent_after_operators`].
    pub const EXTENDED_INDENT_AFTER_OPERATORS: &'static str = "extendedIndentAfterOperators";
    /// Option key for [`Self::extended_indent_before_dot`].
    pub const EXTENDED_INDENT_BEFORE_DOT: &'static str = "extendedIndentBeforeDot";

    /// Reads the options of a rule table, falling back to defaults.
    ///
    /// Values may be given natively or as strings (`indentationSize = "2"`).
    /// Anything that does not parse keeps its default and logs a warning.
    #[must_use]
    pub fn from_rule_config(rule: Option<&RuleConfig>) -> Self {
        let defaults = Self::default();
        let Some(rule) = rule else {
            return defaults;
        };

        let mut indentation_size = read_int(rule, Self::INDENTATION_SIZE, defaults.indentation_size);
        if indentation_size <= 0 {
            warn!(
                value = indentation_size,
                "{} must be positive, using {}",
                Self::INDENTATION_SIZE,
                defaults.indentation_size
            );
            indentation_size = defaults.indentation_size;
        }

        Self {
            indentation_size,
            newline_at_end: read_bool(rule, Self::NEWLINE_AT_END, defaults.newline_at_end),
            extended_indent_of_parameters: read_bool(
                rule,
                Self::EXTENDED_INDENT_OF_PARAMETERS,
                defaults.extended_indent_of_parameters,
            ),
            aligned_parameters: read_bool(rule, Self::ALIGNED_PARAMETERS, defaults.aligned_parameters),
            extended_indent_after_operators: read_bool(
                rule,
                Self::EXTENDED_INDENT_AFTER_OPERATORS,
                defaults.extended_indent_after_operators,
            ),
            extended_indent_before_dot: read_bool(
                rule,
                Self::EXTENDED_INDENT_BEFORE_DOT,
                defaults.extended_indent_before_dot,
            ),
        }
    }

    /// Option keys with their current values, in documentation order.
    #[must_use]
    pub fn options(&self) -> Vec<(&'static str, String)> {
        vec![
            (Self::INDENTATION_SIZE, self.indentation_size.to_string()),
            (Self::NEWLINE_AT_END, self.newline_at_end.to_string()),
            (
                Self::EXTENDED_INDENT_OF_PARAMETERS,
                self.extended_indent_of_parameters.to_string(),
            ),
            (Self::ALIGNED_PARAMETERS, self.aligned_parameters.to_string()),
            (
                Self::EXTENDED_INDENT_AFTER_OPERATORS,
                self.extended_indent_after_operators.to_string(),
            ),
            (
                Self::EXTENDED_INDENT_BEFORE_DOT,
                self.extended_indent_before_dot.to_string(),
            ),
        ]
    }
}

fn read_int(rule: &RuleConfig, key: &str, default: i32) -> i32 {
    let Some(value) = rule.get(key) else {
        return default;
    };
    let parsed = match value {
        toml::Value::Integer(n) => i32::try_from(*n).ok(),
        toml::Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        warn!(%value, "invalid value for {key}, using {default}");
        default
    })
}

fn read_bool(rule: &RuleConfig, key: &str, default: bool) -> bool {
    let Some(value) = rule.get(key) else {
        return default;
    };
    let parsed = match value {
        toml::Value::Boolean(b) => Some(*b),
        toml::Value::String(s) => s.trim().parse::<bool>().ok(),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        warn!(%value, "invalid value for {key}, using {default}");
        default
    })
}

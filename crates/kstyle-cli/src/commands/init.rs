//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# kstyle configuration

# Lowest severity that makes `kstyle check` exit with status 1
fail_on = "warning"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src"

# Glob patterns to exclude from analysis
exclude = [
    "**/build/**",
    "**/.gradle/**",
    "**/generated/**",
]

# Respect .gitignore files
respect_gitignore = true

# Abort instead of skipping files that fail to parse
fail_on_parse_error = false

[rules.wrong-indentation]
enabled = true
# severity = "warning"  # Override default severity
indentationSize = 4
newlineAtEnd = true
extendedIndentOfParameters = true
alignedParameters = true
extendedIndentAfterOperators = true
extendedIndentBeforeDot = false
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("kstyle.toml"), force)?;

    println!("Created kstyle.toml");
    println!("\nNext steps:");
    println!("  1. Edit kstyle.toml to configure indentation");
    println!("  2. Run: kstyle check");
    println!("  3. Run: kstyle check --fix");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }
    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kstyle_core::{Config, IndentationConfig, IndentationRule};

    #[test]
    fn template_parses_to_defaults() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        let indentation =
            IndentationConfig::from_rule_config(config.rule_config(IndentationRule::NAME));
        assert_eq!(indentation, IndentationConfig::default());
        assert!(config.is_rule_enabled(IndentationRule::NAME));
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("kstyle.toml");
        std::fs::write(&path, "# mine\n").unwrap();

        assert!(write_config(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        write_config(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}

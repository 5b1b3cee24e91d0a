//! Check command implementation.

use anyhow::{Context, Result};
use kstyle_core::{all_rules, Analyzer, Config, FixMode, LintResult};
use kstyle_kotlin::KotlinParser;
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command. Returns `false` when violations at or above the
/// configured `fail_on` severity remain.
pub fn run(
    path: &Path,
    fix: bool,
    format: OutputFormat,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<bool> {
    let config = load_config(source)?;
    let (result, root) = analyze(path, fix, exclude, config.clone())?;

    super::output::print(&result, format, &root)?;

    Ok(!result.has_violations_at(config.fail_on))
}

/// Loads the resolved configuration, or defaults when none was found.
pub fn load_config(source: &ConfigSource) -> Result<Config> {
    let Some(p) = source.path() else {
        return Ok(Config::default());
    };
    if source.is_global() {
        tracing::info!("Using global config: {}", p.display());
    }
    Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
}

/// Runs the analyzer and returns its result with the resolved root.
fn analyze(
    path: &Path,
    fix: bool,
    exclude: Vec<String>,
    config: Config,
) -> Result<(LintResult, PathBuf)> {
    let mode = if fix { FixMode::Fix } else { FixMode::Check };
    let mut builder = Analyzer::builder()
        .root(path)
        .parser(KotlinParser::new())
        .excludes(exclude)
        .mode(mode);
    for rule in all_rules(&config) {
        builder = builder.rule_box(rule);
    }
    let analyzer = builder
        .config(config)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} with {} rules ({:?} mode)",
        path.display(),
        analyzer.rule_count(),
        mode
    );

    let result = analyzer.analyze().context("Analysis failed")?;
    let root = if analyzer.root().is_file() {
        analyzer.root().parent().unwrap_or(analyzer.root()).to_path_buf()
    } else {
        analyzer.root().to_path_buf()
    };
    Ok((result, root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(tmp.path().join(name), content).unwrap();
        }
        tmp
    }

    #[test]
    fn clean_project_passes() {
        let tmp = project(&[("A.kt", "class A {\n    val x = 0\n}\n")]);
        let clean = run(
            tmp.path(),
            false,
            OutputFormat::Compact,
            Vec::new(),
            &ConfigSource::Default,
        )
        .unwrap();
        assert!(clean);
    }

    #[test]
    fn remaining_violations_fail_and_fixed_ones_do_not() {
        let tmp = project(&[("A.kt", "class A {\n  val x = 0\n}\n")]);

        let checked = run(tmp.path(), false, OutputFormat::Compact, Vec::new(), &ConfigSource::Default);
        assert!(!checked.unwrap());

        let fixed = run(tmp.path(), true, OutputFormat::Compact, Vec::new(), &ConfigSource::Default);
        assert!(fixed.unwrap());
        assert_eq!(
            fs::read_to_string(tmp.path().join("A.kt")).unwrap(),
            "class A {\n    val x = 0\n}\n"
        );
    }

    #[test]
    fn fail_on_threshold_comes_from_config() {
        let tmp = project(&[
            ("A.kt", "class A {\n  val x = 0\n}\n"),
            ("kstyle.toml", "fail_on = \"error\"\n"),
        ]);
        let source = ConfigSource::Project(tmp.path().join("kstyle.toml"));
        let clean = run(tmp.path(), false, OutputFormat::Compact, Vec::new(), &source).unwrap();
        assert!(clean);
    }

    #[test]
    fn indentation_options_come_from_config() {
        let tmp = project(&[
            ("A.kt", "class A {\n  val x = 0\n}\n"),
            (
                "kstyle.toml",
                "[rules.wrong-indentation]\nindentationSize = 2\n",
            ),
        ]);
        let config = load_config(&ConfigSource::Project(tmp.path().join("kstyle.toml"))).unwrap();
        let (result, _) = analyze(tmp.path(), false, Vec::new(), config).unwrap();
        assert!(result.violations.is_empty());
    }

    #[test]
    fn excluded_files_are_skipped() {
        let tmp = project(&[("A.kt", "class A {\n  val x = 0\n}\n")]);
        let (result, _) = analyze(
            tmp.path(),
            false,
            vec!["**/A.kt".to_string()],
            Config::default(),
        )
        .unwrap();
        assert_eq!(result.files_checked, 0);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let source = ConfigSource::Explicit("/nonexistent/kstyle.toml".into());
        assert!(load_config(&source).is_err());
    }
}

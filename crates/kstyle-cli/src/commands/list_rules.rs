//! List rules command implementation.

use anyhow::Result;
use kstyle_core::{all_rules, IndentationConfig, IndentationRule};

use super::check::load_config;
use crate::config_resolver::ConfigSource;

/// Runs the list-rules command, showing option values from the resolved config.
pub fn run(source: &ConfigSource) -> Result<()> {
    let config = load_config(source)?;

    println!("Available rules:\n");
    println!("{:<10} {:<25} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for rule in all_rules(&config) {
        let state = if config.is_rule_enabled(rule.name()) {
            ""
        } else {
            " (disabled)"
        };
        println!(
            "{:<10} {:<25} {}{}",
            rule.code(),
            rule.name(),
            rule.description(),
            state
        );
    }

    let indentation =
        IndentationConfig::from_rule_config(config.rule_config(IndentationRule::NAME));
    println!("\nOptions for [rules.{}]:", IndentationRule::NAME);
    for (key, value) in indentation.options() {
        println!("  {key:<32} = {value}");
    }

    if let Some(p) = source.path() {
        println!("\nConfig: {}", p.display());
    }
    Ok(())
}

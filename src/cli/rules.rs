//! List-rules command handler.

use crate::config::AppConfig;
use crate::pipeline::build_registry;
use anyhow::Result;

/// Names of the rules the configuration would run, sorted
/// case-insensitively, optional ones marked.
pub fn rule_listing(config: &AppConfig) -> Result<Vec<String>> {
    let registry = build_registry(config)?;
    Ok(registry.descriptors().iter().map(ToString::to_string).collect())
}

/// Print the active rule set, one rule per line.
pub fn run_list_rules(config: &AppConfig) -> Result<()> {
    for line in rule_listing(config)? {
        println!("{line}");
    }
    Ok(())
}

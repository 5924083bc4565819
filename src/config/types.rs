//! Configuration types for api-compat runs.

use crate::diff::Operands;
use crate::rules::RuleSettings;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Top-level configuration, loaded from a config file and layered with
/// CLI arguments (CLI wins).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Rule selection and rule switches
    pub rules: RulesConfig,
    /// Display labels for the two sides
    pub operands: Operands,
    /// Baselines, attribute exclusions and namespace remapping
    pub filters: FiltersConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
    /// Output configuration
    pub output: OutputConfig,
}

impl AppConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Fluent construction of an [`AppConfig`].
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub const fn allow_default_interface_methods(mut self, allow: bool) -> Self {
        self.config.rules.allow_default_interface_methods = allow;
        self
    }

    pub const fn enforce_optional_rules(mut self, enforce: bool) -> Self {
        self.config.rules.enforce_optional_rules = enforce;
        self
    }

    pub fn disable_rule(mut self, rule: impl Into<String>) -> Self {
        self.config.rules.disabled_rules.push(rule.into());
        self
    }

    pub fn operands(
        mut self,
        contract: impl Into<String>,
        implementation: impl Into<String>,
    ) -> Self {
        self.config.operands = Operands {
            contract: contract.into(),
            implementation: implementation.into(),
        };
        self
    }

    pub fn baseline_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.filters.baseline_files.push(path.into());
        self
    }

    pub const fn validate_baseline(mut self, validate: bool) -> Self {
        self.config.filters.validate_baseline = validate;
        self
    }

    pub fn exclude_attribute(mut self, pattern: impl Into<String>) -> Self {
        self.config.filters.exclude_attributes.push(pattern.into());
        self
    }

    pub fn remap_namespace(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.config.filters.namespace_remap.insert(from.into(), to.into());
        self
    }

    pub const fn fail_on_incompatible(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_incompatible = fail;
        self
    }

    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.config.behavior.parallel = parallel;
        self
    }

    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    pub const fn include_compatible(mut self, include: bool) -> Self {
        self.config.behavior.include_compatible = include;
        self
    }

    pub const fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output.format = format;
        self
    }

    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Which rules run and how.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RulesConfig {
    /// Tolerate one-sided default interface members
    pub allow_default_interface_methods: bool,
    /// Also run rules marked optional
    pub enforce_optional_rules: bool,
    /// Rule names to skip (case-insensitive)
    pub disabled_rules: Vec<String>,
}

impl RulesConfig {
    /// The switches handed to rule constructors.
    #[must_use]
    pub const fn settings(&self) -> RuleSettings {
        RuleSettings {
            allow_default_interface_methods: self.allow_default_interface_methods,
        }
    }
}

/// Difference suppression and type-name normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FiltersConfig {
    /// Baseline files of accepted differences
    pub baseline_files: Vec<PathBuf>,
    /// Report baseline entries that matched nothing and fail the run
    pub validate_baseline: bool,
    /// Start from the built-in list of excluded attribute types
    pub default_attribute_exclusions: bool,
    /// Additional excluded attribute types; `*` and `?` globs allowed
    pub exclude_attributes: Vec<String>,
    /// File with one excluded attribute type per line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_attributes_file: Option<PathBuf>,
    /// Namespace prefix remapping applied before type comparison
    pub namespace_remap: BTreeMap<String, String>,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            baseline_files: Vec::new(),
            validate_baseline: false,
            default_attribute_exclusions: true,
            exclude_attributes: Vec::new(),
            exclude_attributes_file: None,
            namespace_remap: BTreeMap::new(),
        }
    }
}

/// Behavior flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Exit with code 1 when incompatible differences remain
    pub fail_on_incompatible: bool,
    /// Evaluate large surfaces across threads
    pub parallel: bool,
    /// Suppress non-essential output
    pub quiet: bool,
    /// Keep compatible (informational) differences in the report
    pub include_compatible: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            fail_on_incompatible: true,
            parallel: true,
            quiet: false,
            include_compatible: false,
        }
    }
}

/// Report format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `RuleId : message` lines, reusable as a baseline
    #[default]
    Text,
    /// The full report as JSON
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Where and how the report is written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Output file path (stdout when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

// ============================================================================
// Command-specific Configuration Types
// ============================================================================

/// Inputs of one `compare` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparePaths {
    /// Snapshot of the shipped surface
    pub implementation: PathBuf,
    /// Snapshot of the surface callers compiled against
    pub contract: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.behavior.fail_on_incompatible);
        assert!(config.behavior.parallel);
        assert!(config.filters.default_attribute_exclusions);
        assert_eq!(config.operands.contract, "contract");
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_builder() {
        let config = AppConfig::builder()
            .operands("ref/net8.0", "lib/net8.0")
            .disable_rule("CannotSealType")
            .remap_namespace("Old.Ns", "New.Ns")
            .output_format(OutputFormat::Json)
            .build();
        assert_eq!(config.operands.implementation, "lib/net8.0");
        assert_eq!(config.rules.disabled_rules, ["CannotSealType"]);
        assert_eq!(
            config.filters.namespace_remap.get("Old.Ns").map(String::as_str),
            Some("New.Ns")
        );
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: AppConfig =
            serde_yaml::from_str("rules:\n  enforce_optional_rules: true\n").expect("valid yaml");
        assert!(config.rules.enforce_optional_rules);
        assert!(config.behavior.fail_on_incompatible);
        assert!(config.filters.default_attribute_exclusions);
    }

    #[test]
    fn test_rule_settings() {
        let rules = RulesConfig {
            allow_default_interface_methods: true,
            ..RulesConfig::default()
        };
        assert!(rules.settings().allow_default_interface_methods);
    }
}

//! Configuration validation.

use super::types::{AppConfig, BehaviorConfig, FiltersConfig, OutputConfig, RulesConfig};
use crate::diff::Operands;
use crate::filter::compile_glob;
use crate::model::NamespaceRemappingComparer;
use crate::rules::standard_rule_names;

// ============================================================================
// Configuration Error
// ============================================================================

/// One field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// Dotted path of the offending field
    pub field: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.rules.validate());
        errors.extend(self.operands.validate());
        errors.extend(self.filters.validate());
        errors.extend(self.behavior.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for RulesConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let known = standard_rule_names();
        self.disabled_rules
            .iter()
            .filter(|name| !known.iter().any(|k| k.eq_ignore_ascii_case(name)))
            .map(|name| {
                ConfigError::new(
                    "rules.disabled_rules",
                    format!("Unknown rule '{name}'. Run `api-compat list-rules` for valid names"),
                )
            })
            .collect()
    }
}

impl Validatable for Operands {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.contract.trim().is_empty() {
            errors.push(ConfigError::new("operands.contract", "Label must not be empty"));
        }
        if self.implementation.trim().is_empty() {
            errors.push(ConfigError::new("operands.implementation", "Label must not be empty"));
        }
        errors
    }
}

impl Validatable for FiltersConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        for path in &self.baseline_files {
            if !path.exists() {
                errors.push(ConfigError::new(
                    "filters.baseline_files",
                    format!("Baseline file does not exist: {}", path.display()),
                ));
            }
        }

        if self.validate_baseline && self.baseline_files.is_empty() {
            errors.push(ConfigError::new(
                "filters.validate_baseline",
                "Baseline validation requested but no baseline files are configured",
            ));
        }

        for pattern in &self.exclude_attributes {
            if let Err(e) = compile_glob(pattern) {
                errors.push(ConfigError::new("filters.exclude_attributes", e.to_string()));
            }
        }

        if let Some(path) = &self.exclude_attributes_file {
            if !path.exists() {
                errors.push(ConfigError::new(
                    "filters.exclude_attributes_file",
                    format!("File does not exist: {}", path.display()),
                ));
            }
        }

        for (from, to) in &self.namespace_remap {
            if from.trim().is_empty() || to.trim().is_empty() {
                errors.push(ConfigError::new(
                    "filters.namespace_remap",
                    format!("Empty namespace in mapping '{from}' -> '{to}'"),
                ));
            }
        }
        if let Err(e) = NamespaceRemappingComparer::new(&self.namespace_remap) {
            errors.push(ConfigError::new("filters.namespace_remap", e.to_string()));
        }

        errors
    }
}

impl Validatable for BehaviorConfig {
    fn validate(&self) -> Vec<ConfigError> {
        Vec::new()
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(parent) = self.file.as_ref().and_then(|f| f.parent()) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                errors.push(ConfigError::new(
                    "output.file",
                    format!("Parent directory does not exist: {}", parent.display()),
                ));
            }
        }
        errors
    }
}

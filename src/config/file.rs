//! Configuration file loading and discovery.

use super::types::{AppConfig, OutputFormat};
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".api-compat.yaml",
    ".api-compat.yml",
    "api-compat.yaml",
    "api-compat.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/api-compat/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    if let Some(path) = std::env::current_dir().ok().and_then(|cwd| find_config_in_dir(&cwd)) {
        return Some(path);
    }

    if let Some(path) = find_git_root().and_then(|root| find_config_in_dir(&root)) {
        return Some(path);
    }

    if let Some(path) =
        dirs::config_dir().and_then(|dir| find_config_in_dir(&dir.join("api-compat")))
    {
        return Some(path);
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();

    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from a discovered file, or return the default.
///
/// An explicit path that does not exist falls through to discovery.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                (config, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence
    /// wherever it differs from the defaults.
    pub fn merge(&mut self, other: &Self) {
        let defaults = Self::default();

        // Rules
        if other.rules.allow_default_interface_methods {
            self.rules.allow_default_interface_methods = true;
        }
        if other.rules.enforce_optional_rules {
            self.rules.enforce_optional_rules = true;
        }
        for rule in &other.rules.disabled_rules {
            if !self.rules.disabled_rules.iter().any(|r| r.eq_ignore_ascii_case(rule)) {
                self.rules.disabled_rules.push(rule.clone());
            }
        }

        // Operands
        if other.operands.contract != defaults.operands.contract {
            self.operands.contract.clone_from(&other.operands.contract);
        }
        if other.operands.implementation != defaults.operands.implementation {
            self.operands.implementation.clone_from(&other.operands.implementation);
        }

        // Filters
        for path in &other.filters.baseline_files {
            if !self.filters.baseline_files.contains(path) {
                self.filters.baseline_files.push(path.clone());
            }
        }
        if other.filters.validate_baseline {
            self.filters.validate_baseline = true;
        }
        if !other.filters.default_attribute_exclusions {
            self.filters.default_attribute_exclusions = false;
        }
        self.filters
            .exclude_attributes
            .extend(other.filters.exclude_attributes.iter().cloned());
        if other.filters.exclude_attributes_file.is_some() {
            self.filters
                .exclude_attributes_file
                .clone_from(&other.filters.exclude_attributes_file);
        }
        self.filters.namespace_remap.extend(
            other
                .filters
                .namespace_remap
                .iter()
                .map(|(from, to)| (from.clone(), to.clone())),
        );

        // Behavior (flags that differ from the default override)
        if !other.behavior.fail_on_incompatible {
            self.behavior.fail_on_incompatible = false;
        }
        if !other.behavior.parallel {
            self.behavior.parallel = false;
        }
        if other.behavior.quiet {
            self.behavior.quiet = true;
        }
        if other.behavior.include_compatible {
            self.behavior.include_compatible = true;
        }

        // Output
        if other.output.format != OutputFormat::default() {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file from the defaults.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# api-compat configuration
# Place this file at .api-compat.yaml in your project root or ~/.config/api-compat/

{}",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# api-compat configuration file
# ==============================
#
# Place it at:
#   - .api-compat.yaml in your project root
#   - ~/.config/api-compat/api-compat.yaml for global config
#
# CLI arguments always override file settings.

rules:
  # Tolerate interface members with a default body on one side only
  allow_default_interface_methods: false
  # Also run optional rules (CannotReduceVisibility, ParameterNamesCannotChange)
  enforce_optional_rules: false
  # Rules to skip; see `api-compat list-rules`
  disabled_rules: []

# Labels used in every message
operands:
  contract: contract
  implementation: implementation

filters:
  # Previous text reports listing accepted differences
  baseline_files: []
  # Fail when a baseline entry matches nothing
  validate_baseline: false
  # Start from the built-in excluded attribute list
  default_attribute_exclusions: true
  # Extra excluded attribute types; `*` and `?` allowed
  exclude_attributes: []
  # exclude_attributes_file: ./attribute-exclusions.txt
  # Namespace prefixes treated as equal during comparison
  namespace_remap: {}
  #   Old.Namespace: New.Namespace

behavior:
  # Exit with code 1 when incompatible differences remain
  fail_on_incompatible: true
  # Evaluate large surfaces across threads
  parallel: true
  quiet: false
  # Show compatible differences such as added attributes
  include_compatible: false

output:
  # Format: text, json
  format: text
  # file: compat-report.txt
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================

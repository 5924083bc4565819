//! Configuration for api-compat runs.
//!
//! - Type-safe configuration structures with serde defaults
//! - Validation of every section
//! - Named presets
//! - YAML config file discovery and loading
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use api_compat::config::{AppConfig, ConfigPreset};
//!
//! let config = AppConfig::from_preset(ConfigPreset::Strict);
//!
//! let config = AppConfig::builder()
//!     .operands("ref/net8.0", "lib/net8.0")
//!     .baseline_file("compat-baseline.txt")
//!     .build();
//!
//! use api_compat::config::file::load_or_default;
//! let (config, loaded_from) = load_or_default(None);
//! ```
//!
//! # Configuration File
//!
//! Place a `.api-compat.yaml` file in your project root or `~/.config/api-compat/`:
//!
//! ```yaml
//! rules:
//!   allow_default_interface_methods: true
//! filters:
//!   baseline_files: [compat-baseline.txt]
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::ConfigPreset;
pub use types::{
    AppConfig, AppConfigBuilder, BehaviorConfig, ComparePaths, FiltersConfig, OutputConfig,
    OutputFormat, RulesConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, ConfigFileError,
};

/// JSON Schema of the config file format, for editor validation and completion.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

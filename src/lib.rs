//! **API compatibility checking for assembly surface snapshots.**
//!
//! `api-compat` compares the public surface an implementation ships against
//! the contract its callers compiled against, and reports every difference
//! that would break those callers: removed types and members, sealed or
//! newly abstract types, members that stopped being virtual, changed enum
//! values, generic constraints, attributes and more.
//!
//! Surfaces are plain data ([`ApiSurface`]), usually loaded from JSON or
//! YAML snapshots produced by a metadata reader.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: Read-only type and member surfaces, the visibility
//!   lattice, the virtuality classifier and type-name comparers.
//! - **[`mapping`]**: Implementation/contract pairs handed to rules, and the
//!   name-based pairing of two surfaces.
//! - **[`diff`]**: The [`DifferenceRule`] trait, the ordered [`RuleRegistry`],
//!   and [`CompatEngine`], which evaluates every pair and merges results.
//! - **[`rules`]**: The standard rule set.
//! - **[`filter`]**: Baselines of accepted differences and attribute exclusions.
//! - **[`pipeline`]**: Load, compare, filter and report, as used by the CLI.
//!
//! ## Comparing Two Surfaces
//!
//! ```no_run
//! use std::path::Path;
//! use api_compat::filter::AttributeFilter;
//! use api_compat::pipeline::load_surface;
//! use api_compat::rules::{standard_rules, RuleSettings};
//! use api_compat::CompatEngine;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let contract = load_surface(Path::new("ref/Widgets.json"), true)?;
//!     let implementation = load_surface(Path::new("lib/Widgets.json"), true)?;
//!
//!     let engine = CompatEngine::new(standard_rules(
//!         RuleSettings::default(),
//!         AttributeFilter::with_defaults(),
//!     ));
//!     let report = engine.compare(&implementation, &contract)?;
//!
//!     for difference in report.incompatible_differences() {
//!         println!("{difference}");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::struct_excessive_bools,
    clippy::module_name_repetitions
)]

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod filter;
pub mod mapping;
pub mod model;
pub mod pipeline;
pub mod rules;

pub use config::{AppConfig, AppConfigBuilder, ConfigError, ConfigPreset, Validatable};
pub use config::{BehaviorConfig, FiltersConfig, OutputConfig, OutputFormat, RulesConfig};
pub use diff::{
    CompatEngine, CompatReport, CompatSummary, Difference, DifferenceRule, DifferenceType,
    Differences, Operands, RuleContext, RuleRegistry,
};
pub use error::{CompatError, ErrorContext, Result};
pub use filter::{AttributeFilter, BaselineFilter, DifferenceFilter};
pub use model::{
    ApiSurface, MemberSurface, NamespaceRemappingComparer, OrdinalTypeComparer, TypeComparer,
    TypeSurface, Visibility,
};
pub use pipeline::{load_surface, parse_surface_str};
pub use rules::{standard_rules, RuleSettings};

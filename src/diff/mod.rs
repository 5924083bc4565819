//! Rule-based difference engine.
//!
//! # Architecture
//!
//! - [`DifferenceRule`](traits::DifferenceRule): one independent compatibility check
//! - [`RuleRegistry`]: the ordered rule set, assembled at startup
//! - [`RuleEngine`]: runs every rule over one mapping and merges the results
//! - [`CompatEngine`]: pairs two surfaces and evaluates every mapping,
//!   fanning out across threads for large surfaces
//!
//! # Example
//!
//! ```ignore
//! use api_compat::diff::CompatEngine;
//! use api_compat::filter::AttributeFilter;
//! use api_compat::rules::{standard_rules, RuleSettings};
//!
//! let rules = standard_rules(RuleSettings::default(), AttributeFilter::with_defaults());
//! let engine = CompatEngine::new(rules);
//! let report = engine.compare(&implementation, &contract)?;
//! for diff in report.incompatible_differences() {
//!     println!("{diff}");
//! }
//! ```

mod difference;
mod engine;
mod registry;
mod result;
pub mod traits;

pub use difference::{Difference, DifferenceType, Differences, TypeMismatch};
pub use engine::{CompatEngine, RuleEngine};
pub use registry::{RuleDescriptor, RuleRegistry};
pub use result::{CompatReport, CompatSummary, ElementLevel, MappingOutcome};
pub use traits::{DifferenceRule, Operands, RuleContext};

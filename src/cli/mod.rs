//! CLI command handlers.
//!
//! Testable handlers invoked by main.rs, one per subcommand.

mod compare;
mod rules;

pub use compare::run_compare;
pub use rules::{rule_listing, run_list_rules};

// Re-export config types used by handlers
pub use crate::config::{AppConfig, ComparePaths};

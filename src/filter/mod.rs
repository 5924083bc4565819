//! Filters applied around a comparison pass.
//!
//! [`AttributeFilter`] is handed to the attribute rule before the pass and
//! decides which attribute types are never compared. The
//! [`DifferenceFilter`] implementations run over a finished
//! [`CompatReport`] and drop differences the user has accepted.

mod attributes;
mod baseline;

pub(crate) use attributes::compile_glob;
pub use attributes::{AttributeFilter, DEFAULT_EXCLUDED_ATTRIBUTES};
pub use baseline::BaselineFilter;

use crate::diff::{CompatReport, Difference};

/// Decides which differences stay in a report.
pub trait DifferenceFilter {
    /// `true` to keep the difference.
    fn include(&mut self, difference: &Difference) -> bool;

    fn name(&self) -> &'static str;
}

/// Drops compatible (informational) differences.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncompatibleOnlyFilter;

impl DifferenceFilter for IncompatibleOnlyFilter {
    fn include(&mut self, difference: &Difference) -> bool {
        !difference.compatible
    }

    fn name(&self) -> &'static str {
        "incompatible-only"
    }
}

/// Run `filter` over every difference of `report`; returns how many were dropped.
pub fn apply_filter(report: &mut CompatReport, filter: &mut dyn DifferenceFilter) -> usize {
    let dropped = report.retain_differences(|d| filter.include(d));
    if dropped > 0 {
        tracing::debug!("Filter {} suppressed {} differences", filter.name(), dropped);
    }
    dropped
}

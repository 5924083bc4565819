//! Comparison result structures.

use super::{Difference, DifferenceType, Operands};
use serde::{Deserialize, Serialize};

/// Whether an outcome belongs to a type or a member mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementLevel {
    Type,
    Member,
}

/// Final classification and differences of one mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingOutcome {
    /// Display name of the representative side.
    pub element: String,
    pub level: ElementLevel,
    pub difference_type: DifferenceType,
    /// In emission order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub differences: Vec<Difference>,
}

impl MappingOutcome {
    #[must_use]
    pub fn has_incompatible(&self) -> bool {
        self.differences.iter().any(|d| !d.compatible)
    }
}

/// Summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatSummary {
    pub types_compared: usize,
    pub members_compared: usize,
    pub incompatible: usize,
    pub compatible: usize,
    /// Differences removed by filters (baselines, compatible hiding).
    pub suppressed: usize,
}

/// Complete result of comparing an implementation against a contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[must_use]
pub struct CompatReport {
    /// Name of the implementation surface
    pub implementation: String,
    /// Name of the contract surface
    pub contract: String,
    pub operands: Operands,
    pub summary: CompatSummary,
    /// Outcomes in pairing order: contract order first, then implementation-only entries.
    pub outcomes: Vec<MappingOutcome>,
    /// Baseline entries no difference matched, when baseline validation is on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unused_baseline_entries: Vec<String>,
}

impl CompatReport {
    pub fn new(
        implementation: impl Into<String>,
        contract: impl Into<String>,
        operands: Operands,
    ) -> Self {
        Self {
            implementation: implementation.into(),
            contract: contract.into(),
            operands,
            summary: CompatSummary::default(),
            outcomes: Vec::new(),
            unused_baseline_entries: Vec::new(),
        }
    }

    /// Recount differences and compared elements.
    pub fn calculate_summary(&mut self) {
        let suppressed = self.summary.suppressed;
        let mut summary = CompatSummary {
            suppressed,
            ..CompatSummary::default()
        };
        for outcome in &self.outcomes {
            match outcome.level {
                ElementLevel::Type => summary.types_compared += 1,
                ElementLevel::Member => summary.members_compared += 1,
            }
            for diff in &outcome.differences {
                if diff.compatible {
                    summary.compatible += 1;
                } else {
                    summary.incompatible += 1;
                }
            }
        }
        self.summary = summary;
    }

    /// All differences in report order.
    pub fn differences(&self) -> impl Iterator<Item = &Difference> {
        self.outcomes.iter().flat_map(|o| o.differences.iter())
    }

    /// Breaking differences in report order.
    pub fn incompatible_differences(&self) -> impl Iterator<Item = &Difference> {
        self.differences().filter(|d| !d.compatible)
    }

    #[must_use]
    pub fn has_incompatible(&self) -> bool {
        self.summary.incompatible > 0
    }

    /// Keep only differences accepted by `keep`; returns how many were dropped.
    pub fn retain_differences(&mut self, mut keep: impl FnMut(&Difference) -> bool) -> usize {
        let mut dropped = 0;
        for outcome in &mut self.outcomes {
            let before = outcome.differences.len();
            outcome.differences.retain(|d| keep(d));
            dropped += before - outcome.differences.len();
        }
        self.summary.suppressed += dropped;
        self.calculate_summary();
        dropped
    }

    /// Outcomes that carry at least one difference.
    pub fn outcomes_with_differences(&self) -> impl Iterator<Item = &MappingOutcome> {
        self.outcomes.iter().filter(|o| !o.differences.is_empty())
    }

    /// Number of outcomes per final classification.
    #[must_use]
    pub fn count_by_type(&self, difference_type: DifferenceType) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.difference_type == difference_type)
            .count()
    }
}

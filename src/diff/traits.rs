//! The rule abstraction and the read-only context every rule receives.

use super::{DifferenceType, Differences};
use crate::error::Result;
use crate::mapping::{MemberMapping, TypeMapping};
use crate::model::{SurfaceIndex, TypeComparer};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Display labels for the two sides, used in every message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Operands {
    pub contract: String,
    pub implementation: String,
}

impl Default for Operands {
    fn default() -> Self {
        Self {
            contract: "contract".to_string(),
            implementation: "implementation".to_string(),
        }
    }
}

/// Pass-wide, read-only state shared by all rules.
///
/// Built once before a pass; nothing in it changes while mappings are
/// evaluated, so one context is shared across worker threads.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    pub comparer: &'a dyn TypeComparer,
    pub operands: &'a Operands,
    pub implementation_index: &'a SurfaceIndex<'a>,
    pub contract_index: &'a SurfaceIndex<'a>,
}

impl<'a> RuleContext<'a> {
    #[must_use]
    pub fn new(
        comparer: &'a dyn TypeComparer,
        operands: &'a Operands,
        implementation_index: &'a SurfaceIndex<'a>,
        contract_index: &'a SurfaceIndex<'a>,
    ) -> Self {
        Self {
            comparer,
            operands,
            implementation_index,
            contract_index,
        }
    }

    /// Label of the implementation side.
    #[must_use]
    pub fn implementation(&self) -> &str {
        &self.operands.implementation
    }

    /// Label of the contract side.
    #[must_use]
    pub fn contract(&self) -> &str {
        &self.operands.contract
    }
}

impl std::fmt::Debug for RuleContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleContext")
            .field("comparer", &self.comparer.name())
            .field("operands", self.operands)
            .field("implementation_types", &self.implementation_index.len())
            .field("contract_types", &self.contract_index.len())
            .finish()
    }
}

/// A compatibility rule.
///
/// Rules hold only construction-time configuration and never state tied
/// to a mapping. Each evaluation appends to the mapping's own
/// [`Differences`] and returns the rule's classification, `Unknown` when
/// the rule does not apply.
pub trait DifferenceRule: Send + Sync {
    /// Rule name as listed and used in `disabled_rules`.
    fn name(&self) -> &'static str;

    /// Optional rules only run when optional rules are enforced.
    fn is_optional(&self) -> bool {
        false
    }

    fn diff_types(
        &self,
        _ctx: &RuleContext<'_>,
        _mapping: &TypeMapping<'_>,
        _differences: &mut Differences,
    ) -> Result<DifferenceType> {
        Ok(DifferenceType::Unknown)
    }

    fn diff_members(
        &self,
        _ctx: &RuleContext<'_>,
        _mapping: &MemberMapping<'_>,
        _differences: &mut Differences,
    ) -> Result<DifferenceType> {
        Ok(DifferenceType::Unknown)
    }
}

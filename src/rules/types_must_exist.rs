//! Contract types the implementation no longer exposes.

use crate::diff::{DifferenceRule, DifferenceType, Differences, RuleContext};
use crate::error::Result;
use crate::mapping::TypeMapping;

/// Every externally visible contract type must exist in the implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypesMustExist;

impl DifferenceRule for TypesMustExist {
    fn name(&self) -> &'static str {
        "TypesMustExist"
    }

    fn diff_types(
        &self,
        ctx: &RuleContext<'_>,
        mapping: &TypeMapping<'_>,
        differences: &mut Differences,
    ) -> Result<DifferenceType> {
        let (None, Some(contract)) = (mapping.implementation(), mapping.contract()) else {
            return Ok(DifferenceType::Unknown);
        };
        if !contract.visibility.is_visible_outside_assembly() {
            return Ok(DifferenceType::Unknown);
        }

        differences.add_incompatible(
            self.name(),
            format!(
                "Type '{}' does not exist in the {} but it does exist in the {}.",
                contract.full_name,
                ctx.implementation(),
                ctx.contract()
            ),
            DifferenceType::Added,
        );
        Ok(DifferenceType::Added)
    }
}

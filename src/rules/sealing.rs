//! Sealed and abstract modifiers on types.

use crate::diff::{DifferenceRule, DifferenceType, Differences, RuleContext};
use crate::error::Result;
use crate::mapping::TypeMapping;

/// A type nobody could derive from in the contract may not become
/// underivable in the implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannotSealType;

impl DifferenceRule for CannotSealType {
    fn name(&self) -> &'static str {
        "CannotSealType"
    }

    fn diff_types(
        &self,
        ctx: &RuleContext<'_>,
        mapping: &TypeMapping<'_>,
        differences: &mut Differences,
    ) -> Result<DifferenceType> {
        let Some((implementation, contract)) = mapping.both() else {
            return Ok(DifferenceType::Unknown);
        };
        if implementation.is_interface() || contract.is_interface() {
            return Ok(DifferenceType::Unknown);
        }
        if !implementation.is_effectively_sealed() || contract.is_effectively_sealed() {
            return Ok(DifferenceType::Unknown);
        }

        let how = if implementation.is_sealed {
            "sealed"
        } else {
            "effectively (has a private constructor) sealed"
        };
        differences.add_incompatible(
            self.name(),
            format!(
                "Type '{}' is {how} in the {} but not sealed in the {}.",
                implementation.full_name,
                ctx.implementation(),
                ctx.contract()
            ),
            DifferenceType::Changed,
        );
        Ok(DifferenceType::Changed)
    }
}

/// A concrete contract class may not become abstract.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannotMakeTypeAbstract;

impl DifferenceRule for CannotMakeTypeAbstract {
    fn name(&self) -> &'static str {
        "CannotMakeTypeAbstract"
    }

    fn diff_types(
        &self,
        ctx: &RuleContext<'_>,
        mapping: &TypeMapping<'_>,
        differences: &mut Differences,
    ) -> Result<DifferenceType> {
        let Some((implementation, contract)) = mapping.both() else {
            return Ok(DifferenceType::Unknown);
        };
        if implementation.is_interface() || contract.is_interface() {
            return Ok(DifferenceType::Unknown);
        }
        if !implementation.is_abstract || contract.is_abstract {
            return Ok(DifferenceType::Unknown);
        }

        differences.add_incompatible(
            self.name(),
            format!(
                "Type '{}' is abstract in the {} but is not abstract in the {}.",
                implementation.full_name,
                ctx.implementation(),
                ctx.contract()
            ),
            DifferenceType::Changed,
        );
        Ok(DifferenceType::Changed)
    }
}

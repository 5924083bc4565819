//! Abstract members on derivable types.

use crate::diff::{DifferenceRule, DifferenceType, Differences, RuleContext};
use crate::error::Result;
use crate::mapping::MemberMapping;

/// Adding an abstract member breaks every existing derived type.
///
/// Types nobody could derive from in the contract are exempt, as are
/// interfaces, whose members are covered by
/// [`InterfacesShouldHaveSameMembers`](super::InterfacesShouldHaveSameMembers).
#[derive(Debug, Clone, Copy, Default)]
pub struct CannotAddAbstractMembers;

impl DifferenceRule for CannotAddAbstractMembers {
    fn name(&self) -> &'static str {
        "CannotAddAbstractMembers"
    }

    fn diff_members(
        &self,
        ctx: &RuleContext<'_>,
        mapping: &MemberMapping<'_>,
        differences: &mut Differences,
    ) -> Result<DifferenceType> {
        let (Some(implementation), None) = (mapping.implementation(), mapping.contract()) else {
            return Ok(DifferenceType::Unknown);
        };
        let Some(contract_type) = mapping.containing_type().contract() else {
            return Ok(DifferenceType::Unknown);
        };
        if !implementation.is_abstract()
            || contract_type.is_interface()
            || contract_type.is_effectively_sealed()
        {
            return Ok(DifferenceType::Unknown);
        }

        differences.add_incompatible(
            self.name(),
            format!(
                "Member '{}' is abstract in the {} but is missing in the {}.",
                mapping.display_name(),
                ctx.implementation(),
                ctx.contract()
            ),
            DifferenceType::Changed,
        );
        Ok(DifferenceType::Changed)
    }
}

/// A concrete member of a derivable type may not become abstract.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannotMakeMemberAbstract;

impl DifferenceRule for CannotMakeMemberAbstract {
    fn name(&self) -> &'static str {
        "CannotMakeMemberAbstract"
    }

    fn diff_members(
        &self,
        ctx: &RuleContext<'_>,
        mapping: &MemberMapping<'_>,
        differences: &mut Differences,
    ) -> Result<DifferenceType> {
        let Some((implementation, contract)) = mapping.both() else {
            return Ok(DifferenceType::Unknown);
        };
        let Some(contract_type) = mapping.containing_type().contract() else {
            return Ok(DifferenceType::Unknown);
        };
        if !implementation.is_abstract()
            || contract.is_abstract()
            || contract_type.is_effectively_sealed()
        {
            return Ok(DifferenceType::Unknown);
        }

        differences.add_incompatible(
            self.name(),
            format!(
                "Member '{}' is abstract in the {} but is not abstract in the {}.",
                mapping.display_name(),
                ctx.implementation(),
                ctx.contract()
            ),
            DifferenceType::Changed,
        );
        Ok(DifferenceType::Changed)
    }
}

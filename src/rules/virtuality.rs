//! Overridability of members.

use crate::diff::{DifferenceRule, DifferenceType, Differences, RuleContext};
use crate::error::Result;
use crate::mapping::MemberMapping;
use crate::model::Overridability;

/// A member that could be overridden in the contract must stay overridable.
///
/// Sealing an override counts as making it non-virtual. Virtual members of
/// an effectively sealed contract type were never overridable and are
/// ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannotMakeMemberNonVirtual;

impl DifferenceRule for CannotMakeMemberNonVirtual {
    fn name(&self) -> &'static str {
        "CannotMakeMemberNonVirtual"
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
        let Some((implementation_type, contract_type)) = mapping.containing_type().both() else {
            return Ok(DifferenceType::Unknown);
        };

        let contract_class = Overridability::classify(contract, contract_type);
        let implementation_class = Overridability::classify(implementation, implementation_type);
        if !contract_class.is_overridable() || implementation_class.is_overridable() {
            return Ok(DifferenceType::Unknown);
        }

        differences.add_incompatible(
            self.name(),
            format!(
                "Member '{}' is non-virtual in the {} but is virtual in the {}.",
                mapping.display_name(),
                ctx.implementation(),
                ctx.contract()
            ),
            DifferenceType::Changed,
        );
        Ok(DifferenceType::Changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MemberSurface, MethodSignature, TypeSurface, Visibility};
    use crate::rules::test_support::run_on_types;

    fn open(member: MemberSurface) -> TypeSurface {
        TypeSurface::class("Ns.Widget")
            .with_member(MemberSurface::constructor())
            .with_member(member)
    }

    fn run_method() -> MemberSurface {
        MemberSurface::method("Run", MethodSignature::new())
    }

    #[test]
    fn test_virtual_to_non_virtual() {
        let diffs = run_on_types(
            CannotMakeMemberNonVirtual,
            open(run_method()),
            open(run_method().with_virtual()),
        );
        assert_eq!(diffs.len(), 1);
        assert_eq!(
            diffs[0].message,
            "Member 'Ns.Widget.Run()' is non-virtual in the implementation but is virtual in the \
             contract."
        );
    }

    #[test]
    fn test_sealing_an_override() {
        let diffs = run_on_types(
            CannotMakeMemberNonVirtual,
            open(run_method().with_virtual().with_final()),
            open(run_method().with_virtual()),
        );
        assert_eq!(diffs.len(), 1);
    }

    #[test]
    fn test_private_constructor_type_is_never_virtual() {
        let sealed = |member: MemberSurface| {
            TypeSurface::class("Ns.Widget")
                .with_member(MemberSurface::constructor().with_visibility(Visibility::Private))
                .with_member(member)
        };
        let diffs = run_on_types(
            CannotMakeMemberNonVirtual,
            sealed(run_method()),
            sealed(run_method().with_virtual()),
        );
        assert!(diffs.is_empty());
    }

    #[test]
    fn test_making_virtual_is_fine() {
        let diffs = run_on_types(
            CannotMakeMemberNonVirtual,
            open(run_method().with_virtual()),
            open(run_method()),
        );
        assert!(diffs.is_empty());
    }
}

//! Accessibility of types and members.

use crate::diff::{DifferenceRule, DifferenceType, Differences, RuleContext};
use crate::error::Result;
use crate::mapping::{MemberMapping, TypeMapping};
use crate::model::Visibility;

/// Types and members may not become less accessible. Optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannotReduceVisibility;

impl CannotReduceVisibility {
    fn check(
        &self,
        ctx: &RuleContext<'_>,
        element: &str,
        implementation: Visibility,
        contract: Visibility,
        differences: &mut Differences,
    ) -> DifferenceType {
        if !Visibility::is_narrowed(contract, implementation) {
            return DifferenceType::Unknown;
        }
        differences.add_incompatible(
            self.name(),
            format!(
                "Visibility of '{element}' is reduced from '{contract}' in the {} to \
                 '{implementation}' in the {}.",
                ctx.contract(),
                ctx.implementation()
            ),
            DifferenceType::Changed,
        );
        DifferenceType::Changed
    }
}

impl DifferenceRule for CannotReduceVisibility {
    fn name(&self) -> &'static str {
        "CannotReduceVisibility"
    }

    fn is_optional(&self) -> bool {
        true
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
        Ok(self.check(
            ctx,
            &implementation.full_name,
            implementation.visibility,
            contract.visibility,
            differences,
        ))
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
        Ok(self.check(
            ctx,
            &mapping.display_name(),
            implementation.visibility,
            contract.visibility,
            differences,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MemberSurface, MethodSignature, TypeSurface};
    use crate::rules::test_support::run_on_types;

    #[test]
    fn test_public_to_protected_member() {
        let run = |visibility| {
            let method = MemberSurface::method("Run", MethodSignature::new());
            TypeSurface::class("Ns.Widget").with_member(method.with_visibility(visibility))
        };
        let diffs = run_on_types(
            CannotReduceVisibility,
            run(Visibility::Protected),
            run(Visibility::Public),
        );
        assert_eq!(diffs.len(), 1);
        assert_eq!(
            diffs[0].message,
            "Visibility of 'Ns.Widget.Run()' is reduced from 'public' in the contract to \
             'protected' in the implementation."
        );
    }

    #[test]
    fn test_widening_is_fine() {
        let diffs = run_on_types(
            CannotReduceVisibility,
            TypeSurface::class("Ns.Widget"),
            TypeSurface::class("Ns.Widget").with_visibility(Visibility::Internal),
        );
        assert!(diffs.is_empty());
    }

    #[test]
    fn test_is_optional() {
        assert!(CannotReduceVisibility.is_optional());
    }
}

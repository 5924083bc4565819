//! Delegate `Invoke` signatures.

use super::{optional_types_equal, parameter_types_equal, return_type_name};
use crate::diff::{DifferenceRule, DifferenceType, Differences, RuleContext};
use crate::error::Result;
use crate::mapping::TypeMapping;
use crate::model::MethodSignature;

/// A delegate keeps the signature of its `Invoke` method.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelegatesMustMatch;

fn describe(signature: &MethodSignature) -> String {
    format!(
        "{} {}",
        return_type_name(signature.return_type.as_ref()),
        signature.parameter_list()
    )
}

impl DifferenceRule for DelegatesMustMatch {
    fn name(&self) -> &'static str {
        "DelegatesMustMatch"
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
        let (Some(implementation_sig), Some(contract_sig)) = (
            implementation.delegate_invoke().and_then(|m| m.signature()),
            contract.delegate_invoke().and_then(|m| m.signature()),
        ) else {
            return Ok(DifferenceType::Unknown);
        };

        let same_return = optional_types_equal(
            ctx,
            implementation_sig.return_type.as_ref(),
            contract_sig.return_type.as_ref(),
        );
        if same_return
            && parameter_types_equal(ctx, &implementation_sig.parameters, &contract_sig.parameters)
        {
            return Ok(DifferenceType::Unknown);
        }

        differences.add_incompatible(
            self.name(),
            format!(
                "Signature of delegate '{}' is '{}' in the {} but '{}' in the {}.",
                implementation.full_name,
                describe(implementation_sig),
                ctx.implementation(),
                describe(contract_sig),
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
    use crate::model::{MemberSurface, TypeSurface};
    use crate::rules::test_support::run_on_types;

    fn handler(signature: MethodSignature) -> TypeSurface {
        TypeSurface::delegate("Ns.Handler")
            .with_member(MemberSurface::method("Invoke", signature).with_virtual())
    }

    #[test]
    fn test_changed_parameter_type() {
        let diffs = run_on_types(
            DelegatesMustMatch,
            handler(MethodSignature::new().with_parameter("value", "System.Int64")),
            handler(MethodSignature::new().with_parameter("value", "System.Int32")),
        );
        assert_eq!(diffs.len(), 1);
        assert_eq!(
            diffs[0].message,
            "Signature of delegate 'Ns.Handler' is 'System.Void (System.Int64)' in the \
             implementation but 'System.Void (System.Int32)' in the contract."
        );
    }

    fn predicate(parameter: &str) -> MethodSignature {
        MethodSignature::returning("System.Boolean").with_parameter(parameter, "System.String")
    }

    #[test]
    fn test_renamed_parameter_is_fine() {
        let diffs = run_on_types(
            DelegatesMustMatch,
            handler(predicate("item")),
            handler(predicate("value")),
        );
        assert!(diffs.is_empty());
    }

    #[test]
    fn test_changed_return_type() {
        let diffs = run_on_types(
            DelegatesMustMatch,
            handler(MethodSignature::returning("System.Boolean")),
            handler(MethodSignature::new()),
        );
        assert_eq!(diffs.len(), 1);
    }
}

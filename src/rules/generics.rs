//! Generic parameter variance and constraints.

use crate::diff::{DifferenceRule, DifferenceType, Differences, RuleContext};
use crate::error::Result;
use crate::mapping::{MemberMapping, TypeMapping};
use crate::model::{GenericParameterSurface, TypeComparer, Variance, SYSTEM_VALUE_TYPE};

/// Canonical, order-insensitive rendering of a generic parameter's constraints.
///
/// `struct` implies both `class`-exclusion and `new()`, and its synthetic
/// `System.ValueType` constraint is dropped. Tokens sort case-insensitively
/// with an ordinal tiebreak.
#[must_use]
pub fn constraint_signature(
    parameter: &GenericParameterSurface,
    comparer: &dyn TypeComparer,
) -> String {
    let mut tokens: Vec<String> = Vec::new();
    if parameter.must_be_value_type {
        tokens.push("struct".to_string());
    } else {
        if parameter.must_be_reference_type {
            tokens.push("class".to_string());
        }
        if parameter.must_have_default_constructor {
            tokens.push("new()".to_string());
        }
    }

    for constraint in &parameter.constraints {
        if parameter.must_be_value_type && constraint.name() == SYSTEM_VALUE_TYPE {
            continue;
        }
        tokens.push(comparer.key(constraint).into_owned());
    }

    tokens.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    tokens.join(",")
}

/// Generic parameters keep their variance and constraints, on types and
/// on generic methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannotChangeGenerics;

impl CannotChangeGenerics {
    fn compare(
        &self,
        ctx: &RuleContext<'_>,
        owner: &str,
        implementation: &[GenericParameterSurface],
        contract: &[GenericParameterSurface],
        differences: &mut Differences,
    ) -> DifferenceType {
        if implementation.len() != contract.len() {
            tracing::warn!(
                "Generic arity of '{}' differs ({} vs {}); skipping parameter comparison",
                owner,
                implementation.len(),
                contract.len()
            );
            return DifferenceType::Changed;
        }

        let mut changed = false;
        for (implementation_param, contract_param) in implementation.iter().zip(contract) {
            if contract_param.variance != Variance::None
                && implementation_param.variance != contract_param.variance
            {
                differences.add_incompatible(
                    "CannotChangeVariance",
                    format!(
                        "Variance on generic parameter '{}' for '{owner}' is '{}' in the {} but \
                         '{}' in the {}.",
                        contract_param.name,
                        implementation_param.variance,
                        ctx.implementation(),
                        contract_param.variance,
                        ctx.contract()
                    ),
                    DifferenceType::Changed,
                );
                changed = true;
            }

            let implementation_constraints =
                constraint_signature(implementation_param, ctx.comparer);
            let contract_constraints = constraint_signature(contract_param, ctx.comparer);
            if implementation_constraints != contract_constraints {
                differences.add_incompatible(
                    "CannotChangeGenericConstraints",
                    format!(
                        "Constraints for generic parameter '{}' of '{owner}' is \
                         '{implementation_constraints}' in the {} but '{contract_constraints}' in \
                         the {}.",
                        contract_param.name,
                        ctx.implementation(),
                        ctx.contract()
                    ),
                    DifferenceType::Changed,
                );
                changed = true;
            }
        }

        if changed {
            DifferenceType::Changed
        } else {
            DifferenceType::Unknown
        }
    }
}

impl DifferenceRule for CannotChangeGenerics {
    fn name(&self) -> &'static str {
        "CannotChangeGenerics"
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
        Ok(self.compare(
            ctx,
            &implementation.full_name,
            &implementation.generic_parameters,
            &contract.generic_parameters,
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
        if implementation.signature().is_none() || contract.signature().is_none() {
            return Ok(DifferenceType::Unknown);
        }
        Ok(self.compare(
            ctx,
            &mapping.display_name(),
            implementation.generic_parameters(),
            contract.generic_parameters(),
            differences,
        ))
    }
}

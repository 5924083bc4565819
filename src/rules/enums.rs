//! Enum underlying types and member values.

use crate::diff::{Difference, DifferenceRule, DifferenceType, Differences, RuleContext};
use crate::error::Result;
use crate::mapping::{MemberMapping, TypeMapping};
use crate::model::MemberKind;

/// An enum keeps its underlying integral type.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumTypesMustMatch;

impl DifferenceRule for EnumTypesMustMatch {
    fn name(&self) -> &'static str {
        "EnumTypesMustMatch"
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
        let (Some(implementation_underlying), Some(contract_underlying)) = (
            implementation.enum_underlying_type.as_ref(),
            contract.enum_underlying_type.as_ref(),
        ) else {
            return Ok(DifferenceType::Unknown);
        };
        if ctx.comparer.equals(implementation_underlying, contract_underlying) {
            return Ok(DifferenceType::Unknown);
        }

        differences.add(
            Difference::incompatible(
                self.name(),
                format!(
                    "Underlying type of enum '{}' changed from '{contract_underlying}' to \
                     '{implementation_underlying}'.",
                    implementation.full_name
                ),
                DifferenceType::Changed,
            )
            .with_type_mismatch(implementation_underlying.clone(), contract_underlying.clone()),
        );
        Ok(DifferenceType::Changed)
    }
}

/// Enum members keep their constant values.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumValuesMustMatch;

impl DifferenceRule for EnumValuesMustMatch {
    fn name(&self) -> &'static str {
        "EnumValuesMustMatch"
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
        if !mapping.containing_type().representative().is_enum() {
            return Ok(DifferenceType::Unknown);
        }
        let (MemberKind::Field(implementation_field), MemberKind::Field(contract_field)) =
            (&implementation.kind, &contract.kind)
        else {
            return Ok(DifferenceType::Unknown);
        };
        let (Some(implementation_value), Some(contract_value)) =
            (implementation_field.constant, contract_field.constant)
        else {
            return Ok(DifferenceType::Unknown);
        };
        if implementation_value.as_i128() == contract_value.as_i128() {
            return Ok(DifferenceType::Unknown);
        }

        differences.add_incompatible(
            self.name(),
            format!(
                "Enum value '{}' is ({implementation_value}) in the {} but ({contract_value}) in \
                 the {}.",
                mapping.display_name(),
                ctx.implementation(),
                ctx.contract()
            ),
            DifferenceType::Changed,
        );
        Ok(DifferenceType::Changed)
    }
}

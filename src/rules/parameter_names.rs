//! Parameter names of paired methods.

use crate::diff::{DifferenceRule, DifferenceType, Differences, RuleContext};
use crate::error::Result;
use crate::mapping::MemberMapping;

/// Parameter names are part of the API for named arguments. Optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterNamesCannotChange;

impl DifferenceRule for ParameterNamesCannotChange {
    fn name(&self) -> &'static str {
        "ParameterNamesCannotChange"
    }

    fn is_optional(&self) -> bool {
        true
    }

    fn diff_members(
        &self,
        _ctx: &RuleContext<'_>,
        mapping: &MemberMapping<'_>,
        differences: &mut Differences,
    ) -> Result<DifferenceType> {
        let Some((implementation, contract)) = mapping.both() else {
            return Ok(DifferenceType::Unknown);
        };
        let (Some(implementation_sig), Some(contract_sig)) =
            (implementation.signature(), contract.signature())
        else {
            return Ok(DifferenceType::Unknown);
        };

        let before = differences.len();
        for (implementation_param, contract_param) in
            implementation_sig.parameters.iter().zip(&contract_sig.parameters)
        {
            if implementation_param.name != contract_param.name {
                differences.add_incompatible(
                    self.name(),
                    format!(
                        "Parameter name on member '{}' changed from '{}' to '{}'.",
                        mapping.display_name(),
                        contract_param.name,
                        implementation_param.name
                    ),
                    DifferenceType::Changed,
                );
            }
        }

        if differences.len() > before {
            Ok(DifferenceType::Changed)
        } else {
            Ok(DifferenceType::Unknown)
        }
    }
}

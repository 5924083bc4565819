//! Type classification: class, struct, interface, enum or delegate.

use crate::diff::{DifferenceRule, DifferenceType, Differences, RuleContext};
use crate::error::{CompatError, Result};
use crate::mapping::TypeMapping;
use crate::model::{TypeKind, TypeSurface};

/// A type keeps its classification, and a readonly struct stays readonly.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeCannotChangeClassification;

impl TypeCannotChangeClassification {
    fn classification(ty: &TypeSurface, side: &str) -> Result<&'static str> {
        match ty.kind {
            TypeKind::Class => Ok("class"),
            TypeKind::Interface => Ok("interface"),
            TypeKind::Delegate => Ok("delegate"),
            TypeKind::Struct | TypeKind::Enum if ty.is_by_ref_like() => Ok("ref struct"),
            TypeKind::Struct | TypeKind::Enum => Ok("struct"),
            TypeKind::Unresolved => {
                Err(CompatError::unsupported_classification(&ty.full_name, side))
            }
        }
    }
}

impl DifferenceRule for TypeCannotChangeClassification {
    fn name(&self) -> &'static str {
        "TypeCannotChangeClassification"
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

        let implementation_class = Self::classification(implementation, ctx.implementation())?;
        let contract_class = Self::classification(contract, ctx.contract())?;

        if implementation_class != contract_class {
            differences.add_incompatible(
                self.name(),
                format!(
                    "Type '{}' is a '{implementation_class}' in the {} but is a '{contract_class}' \
                     in the {}.",
                    implementation.full_name,
                    ctx.implementation(),
                    ctx.contract()
                ),
                DifferenceType::Changed,
            );
            return Ok(DifferenceType::Changed);
        }

        if contract.kind == TypeKind::Struct
            && contract.is_readonly()
            && !implementation.is_readonly()
        {
            differences.add_incompatible(
                self.name(),
                format!(
                    "Type '{}' is marked as readonly in the {} so it must also be marked readonly \
                     in the {}.",
                    implementation.full_name,
                    ctx.contract(),
                    ctx.implementation()
                ),
                DifferenceType::Changed,
            );
            return Ok(DifferenceType::Changed);
        }

        Ok(DifferenceType::Unknown)
    }
}

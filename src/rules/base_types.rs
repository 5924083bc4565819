//! Base types and implemented interfaces.

use crate::diff::{DifferenceRule, DifferenceType, Differences, RuleContext};
use crate::error::Result;
use crate::mapping::TypeMapping;

/// Every base type and interface of the contract type must still be
/// inherited or implemented, directly or through another base.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannotRemoveBaseTypeOrInterface;

impl DifferenceRule for CannotRemoveBaseTypeOrInterface {
    fn name(&self) -> &'static str {
        "CannotRemoveBaseTypeOrInterface"
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
        let before = differences.len();

        if !implementation.is_interface() {
            let implementation_bases = ctx.implementation_index.base_type_chain(implementation);
            for base in ctx.contract_index.base_type_chain(contract) {
                if implementation_bases.iter().any(|b| ctx.comparer.equals(b, &base)) {
                    continue;
                }
                differences.add_incompatible(
                    "CannotRemoveBaseType",
                    format!(
                        "Type '{}' does not inherit from base type '{base}' in the {} but it does \
                         in the {}.",
                        implementation.full_name,
                        ctx.implementation(),
                        ctx.contract()
                    ),
                    DifferenceType::Changed,
                );
            }
        }

        let implementation_interfaces = ctx.implementation_index.all_interfaces(implementation);
        for interface in ctx.contract_index.all_interfaces(contract) {
            if implementation_interfaces
                .iter()
                .any(|i| ctx.comparer.equals(i, &interface))
            {
                continue;
            }
            differences.add_incompatible(
                "CannotRemoveInterface",
                format!(
                    "Type '{}' does not implement interface '{interface}' in the {} but it does in \
                     the {}.",
                    implementation.full_name,
                    ctx.implementation(),
                    ctx.contract()
                ),
                DifferenceType::Changed,
            );
        }

        if differences.len() > before {
            Ok(DifferenceType::Changed)
        } else {
            Ok(DifferenceType::Unknown)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ApiSurface, TypeSurface};
    use crate::rules::test_support::{ids, run_on_types, run_rule};

    #[test]
    fn test_removed_base_type() {
        let diffs = run_on_types(
            CannotRemoveBaseTypeOrInterface,
            TypeSurface::class("Ns.Derived"),
            TypeSurface::class("Ns.Derived").with_base_type("Ns.Base"),
        );
        assert_eq!(ids(&diffs), ["CannotRemoveBaseType"]);
        assert_eq!(
            diffs[0].message,
            "Type 'Ns.Derived' does not inherit from base type 'Ns.Base' in the implementation but \
             it does in the contract."
        );
    }

    #[test]
    fn test_interface_moved_to_base_is_fine() {
        let implementation = ApiSurface::new("impl")
            .with_type(TypeSurface::class("Ns.Base").with_interface("System.IDisposable"))
            .with_type(TypeSurface::class("Ns.Derived").with_base_type("Ns.Base"));
        let contract = ApiSurface::new("contract")
            .with_type(TypeSurface::class("Ns.Base"))
            .with_type(
                TypeSurface::class("Ns.Derived")
                    .with_base_type("Ns.Base")
                    .with_interface("System.IDisposable"),
            );
        let report = run_rule(CannotRemoveBaseTypeOrInterface, &implementation, &contract);
        assert!(!report.has_incompatible());
    }

    #[test]
    fn test_inserted_intermediate_base_is_fine() {
        let implementation = ApiSurface::new("impl")
            .with_type(TypeSurface::class("Ns.Base"))
            .with_type(TypeSurface::class("Ns.Middle").with_base_type("Ns.Base"))
            .with_type(TypeSurface::class("Ns.Derived").with_base_type("Ns.Middle"));
        let contract = ApiSurface::new("contract")
            .with_type(TypeSurface::class("Ns.Base"))
            .with_type(TypeSurface::class("Ns.Derived").with_base_type("Ns.Base"));
        let report = run_rule(CannotRemoveBaseTypeOrInterface, &implementation, &contract);
        assert!(!report.has_incompatible());
    }

    #[test]
    fn test_removed_inherited_interface() {
        let implementation = ApiSurface::new("impl")
            .with_type(TypeSurface::interface("Ns.IChild"))
            .with_type(TypeSurface::class("Ns.Widget").with_interface("Ns.IChild"));
        let contract = ApiSurface::new("contract")
            .with_type(TypeSurface::interface("Ns.IParent"))
            .with_type(TypeSurface::interface("Ns.IChild").with_interface("Ns.IParent"))
            .with_type(TypeSurface::class("Ns.Widget").with_interface("Ns.IChild"));

        let report = run_rule(CannotRemoveBaseTypeOrInterface, &implementation, &contract);
        let messages: Vec<&str> = report.differences().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "Type 'Ns.IChild' does not implement interface 'Ns.IParent' in the implementation \
                 but it does in the contract.",
                "Type 'Ns.Widget' does not implement interface 'Ns.IParent' in the implementation \
                 but it does in the contract.",
            ]
        );
    }
}

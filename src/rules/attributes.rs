//! Attribute differences on every attribute target.

use crate::diff::{DifferenceRule, DifferenceType, Differences, RuleContext};
use crate::error::Result;
use crate::filter::AttributeFilter;
use crate::mapping::{MemberMapping, TypeMapping};
use crate::model::{AttributeSurface, GenericParameterSurface};
use indexmap::IndexMap;

/// Attributes on types, members, parameters and generic parameters.
///
/// Attributes only the implementation declares are reported as compatible;
/// changed or removed ones are breaking. Difference types follow the usual
/// sides: an attribute only the contract declares is `Added`, one only the
/// implementation declares is `Removed`. Attribute types excluded by the [`AttributeFilter`] are
/// never compared.
#[derive(Debug, Clone, Default)]
pub struct AttributeDifference {
    filter: AttributeFilter,
}

struct AttributeGroup<'a> {
    /// Display name of the attribute type, from the first side that has it.
    attribute_type: &'a str,
    implementation: Vec<&'a AttributeSurface>,
    contract: Vec<&'a AttributeSurface>,
}

impl<'a> AttributeGroup<'a> {
    fn new(attribute_type: &'a str) -> Self {
        Self {
            attribute_type,
            implementation: Vec::new(),
            contract: Vec::new(),
        }
    }
}

impl AttributeDifference {
    #[must_use]
    pub fn new(filter: AttributeFilter) -> Self {
        Self { filter }
    }

    #[must_use]
    pub fn filter(&self) -> &AttributeFilter {
        &self.filter
    }

    /// Compare one attribute list pair; returns whether anything was reported.
    fn compare(
        &self,
        ctx: &RuleContext<'_>,
        target: &str,
        implementation: &[AttributeSurface],
        contract: &[AttributeSurface],
        differences: &mut Differences,
    ) -> bool {
        let mut groups: IndexMap<String, AttributeGroup<'_>> = IndexMap::new();
        for attribute in implementation {
            groups
                .entry(ctx.comparer.key(&attribute.attribute_type).into_owned())
                .or_insert_with(|| AttributeGroup::new(attribute.attribute_type.name()))
                .implementation
                .push(attribute);
        }
        for attribute in contract {
            groups
                .entry(ctx.comparer.key(&attribute.attribute_type).into_owned())
                .or_insert_with(|| AttributeGroup::new(attribute.attribute_type.name()))
                .contract
                .push(attribute);
        }

        let before = differences.len();
        for group in groups.values() {
            let attribute_type = group.attribute_type;
            if self.filter.should_exclude(attribute_type) {
                continue;
            }
            match (group.implementation.is_empty(), group.contract.is_empty()) {
                (false, true) => differences.add_compatible(
                    "AddedAttribute",
                    format!(
                        "Attribute '{attribute_type}' exists on {target} in the {} but not the {}.",
                        ctx.implementation(),
                        ctx.contract()
                    ),
                    DifferenceType::Removed,
                ),
                (true, false) => differences.add_incompatible(
                    "CannotRemoveAttribute",
                    format!(
                        "Attribute '{attribute_type}' exists on {target} in the {} but not the {}.",
                        ctx.contract(),
                        ctx.implementation()
                    ),
                    DifferenceType::Added,
                ),
                _ => {
                    let implementation_keys = Self::keys(ctx, &group.implementation);
                    let contract_keys = Self::keys(ctx, &group.contract);
                    if implementation_keys != contract_keys {
                        differences.add_incompatible(
                            "CannotChangeAttribute",
                            format!(
                                "Attribute '{attribute_type}' on {target} changed from '{}' in the \
                                 {} to '{}' in the {}.",
                                contract_keys.join("; "),
                                ctx.contract(),
                                implementation_keys.join("; "),
                                ctx.implementation()
                            ),
                            DifferenceType::Changed,
                        );
                    }
                }
            }
        }
        differences.len() > before
    }

    fn keys(ctx: &RuleContext<'_>, attributes: &[&AttributeSurface]) -> Vec<String> {
        let mut keys: Vec<String> = attributes
            .iter()
            .map(|a| format!("{}({})", ctx.comparer.key(&a.attribute_type), a.arguments.join(", ")))
            .collect();
        keys.sort();
        keys
    }

    fn compare_generic_parameters(
        &self,
        ctx: &RuleContext<'_>,
        owner: &str,
        implementation: &[GenericParameterSurface],
        contract: &[GenericParameterSurface],
        differences: &mut Differences,
    ) -> bool {
        let mut changed = false;
        for (implementation_param, contract_param) in implementation.iter().zip(contract) {
            let target =
                format!("generic param '{}' on member '{owner}'", implementation_param.name);
            changed |= self.compare(
                ctx,
                &target,
                &implementation_param.attributes,
                &contract_param.attributes,
                differences,
            );
        }
        changed
    }

    fn outcome(changed: bool) -> DifferenceType {
        if changed {
            DifferenceType::Changed
        } else {
            DifferenceType::Unchanged
        }
    }
}

impl DifferenceRule for AttributeDifference {
    fn name(&self) -> &'static str {
        "AttributeDifference"
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

        let target = format!("'{}'", implementation.full_name);
        let mut changed = self.compare(
            ctx,
            &target,
            &implementation.attributes,
            &contract.attributes,
            differences,
        );
        changed |= self.compare_generic_parameters(
            ctx,
            &implementation.full_name,
            &implementation.generic_parameters,
            &contract.generic_parameters,
            differences,
        );
        Ok(Self::outcome(changed))
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

        let member = mapping.display_name();
        let target = format!("'{member}'");
        let mut changed = self.compare(
            ctx,
            &target,
            &implementation.attributes,
            &contract.attributes,
            differences,
        );

        if let (Some(implementation_sig), Some(contract_sig)) =
            (implementation.signature(), contract.signature())
        {
            for (implementation_param, contract_param) in
                implementation_sig.parameters.iter().zip(&contract_sig.parameters)
            {
                let target =
                    format!("parameter '{}' on member '{member}'", implementation_param.name);
                changed |= self.compare(
                    ctx,
                    &target,
                    &implementation_param.attributes,
                    &contract_param.attributes,
                    differences,
                );
            }
            changed |= self.compare_generic_parameters(
                ctx,
                &member,
                &implementation_sig.generic_parameters,
                &contract_sig.generic_parameters,
                differences,
            );
        }
        Ok(Self::outcome(changed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::Difference;
    use crate::model::{MemberSurface, MethodSignature, ParameterSurface, TypeSurface};
    use crate::rules::test_support::{ids, run_on_types};

    fn widget(attributes: &[AttributeSurface]) -> TypeSurface {
        attributes
            .iter()
            .cloned()
            .fold(TypeSurface::class("Ns.Widget"), TypeSurface::with_attribute)
    }

    fn run(implementation: TypeSurface, contract: TypeSurface) -> Vec<Difference> {
        let rule = AttributeDifference::new(AttributeFilter::with_defaults());
        run_on_types(rule, implementation, contract)
    }

    #[test]
    fn test_added_attribute_is_compatible() {
        let diffs = run(widget(&[AttributeSurface::new("System.FlagsAttribute")]), widget(&[]));
        assert_eq!(ids(&diffs), ["AddedAttribute"]);
        assert!(diffs[0].compatible);
        assert_eq!(diffs[0].difference_type, DifferenceType::Removed);
        assert_eq!(
            diffs[0].message,
            "Attribute 'System.FlagsAttribute' exists on 'Ns.Widget' in the implementation but not \
             the contract."
        );
    }

    #[test]
    fn test_removed_attribute() {
        let diffs = run(widget(&[]), widget(&[AttributeSurface::new("System.FlagsAttribute")]));
        assert_eq!(ids(&diffs), ["CannotRemoveAttribute"]);
        assert!(!diffs[0].compatible);
        assert_eq!(diffs[0].difference_type, DifferenceType::Added);
        assert_eq!(
            diffs[0].message,
            "Attribute 'System.FlagsAttribute' exists on 'Ns.Widget' in the contract but not the \
             implementation."
        );
    }

    #[test]
    fn test_changed_arguments() {
        let diffs = run(
            widget(&[AttributeSurface::new("Ns.TagAttribute").with_argument("\"b\"")]),
            widget(&[AttributeSurface::new("Ns.TagAttribute").with_argument("\"a\"")]),
        );
        assert_eq!(ids(&diffs), ["CannotChangeAttribute"]);
        assert_eq!(
            diffs[0].message,
            "Attribute 'Ns.TagAttribute' on 'Ns.Widget' changed from 'Ns.TagAttribute(\"a\")' in \
             the contract to 'Ns.TagAttribute(\"b\")' in the implementation."
        );
    }

    #[test]
    fn test_excluded_attributes_are_ignored() {
        let diffs = run(widget(&[]), widget(&[AttributeSurface::new("System.ObsoleteAttribute")]));
        assert!(diffs.is_empty());
    }

    #[test]
    fn test_parameter_attribute_target() {
        let method = |attrs: Vec<AttributeSurface>| {
            let mut parameter = ParameterSurface::new("value", "System.String");
            parameter.attributes = attrs;
            let mut signature = MethodSignature::new();
            signature.parameters.push(parameter);
            MemberSurface::method("Run", signature)
        };
        let diffs = run(
            TypeSurface::class("Ns.Widget").with_member(method(Vec::new())),
            TypeSurface::class("Ns.Widget")
                .with_member(method(vec![AttributeSurface::new("Ns.NotNullAttribute")])),
        );
        assert_eq!(diffs.len(), 1);
        assert_eq!(
            diffs[0].message,
            "Attribute 'Ns.NotNullAttribute' exists on parameter 'value' on member \
             'Ns.Widget.Run(System.String)' in the contract but not the implementation."
        );
    }
}

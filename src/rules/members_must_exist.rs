//! Contract members the implementation no longer exposes.

use super::{optional_types_equal, parameter_types_equal, return_type_name};
use crate::diff::{DifferenceRule, DifferenceType, Differences, RuleContext};
use crate::error::Result;
use crate::mapping::MemberMapping;
use crate::model::{
    MemberKind, MemberSurface, ParameterSurface, TypeArguments, TypeRef, TypeSurface,
};
use std::borrow::Cow;

/// Outcome of looking for a contract member on the implementation's bases.
#[derive(Debug, Clone)]
pub enum BaseMatch<'a> {
    /// An inherited member with the same signature.
    Found(&'a MemberSurface),
    /// Same kind, name, parameters and generic arity, but another return
    /// or declared type. `found` is that type as seen from the derived side.
    TypeDiffers {
        member: &'a MemberSurface,
        found: Option<TypeRef>,
    },
    NotFound,
}

enum SignatureMatch {
    Exact,
    /// Everything but the return or declared type matches.
    TypeDiffers(Option<TypeRef>),
}

/// Return type of a method, declared type of a field, property or event.
fn member_type(member: &MemberSurface) -> Option<&TypeRef> {
    match &member.kind {
        MemberKind::Method(sig) => sig.return_type.as_ref(),
        _ => member.declared_type(),
    }
}

/// Drop bindings hidden by the candidate's own generic parameters.
fn unshadowed<'m>(
    arguments: &'m TypeArguments,
    candidate: &MemberSurface,
) -> Cow<'m, TypeArguments> {
    let shadowed: Vec<&str> = candidate
        .generic_parameters()
        .iter()
        .map(|g| g.name.as_str())
        .filter(|name| arguments.contains_key(*name))
        .collect();
    if shadowed.is_empty() {
        return Cow::Borrowed(arguments);
    }
    let mut owned = arguments.clone();
    for name in shadowed {
        owned.remove(name);
    }
    Cow::Owned(owned)
}

/// How closely `candidate` matches `contract_member` once the base's
/// generic `arguments` are substituted into the candidate. `None` when
/// kind, name, visibility, parameters or generic arity rule it out.
fn match_signature(
    ctx: &RuleContext<'_>,
    candidate: &MemberSurface,
    contract_member: &MemberSurface,
    arguments: &TypeArguments,
) -> Option<SignatureMatch> {
    if candidate.name != contract_member.name
        || candidate.is_explicit_interface_implementation()
        || !candidate.visibility.is_visible_outside_assembly()
    {
        return None;
    }

    let (candidate_parameters, contract_parameters): (&[ParameterSurface], &[ParameterSurface]) =
        match (&candidate.kind, &contract_member.kind) {
            (MemberKind::Method(candidate_sig), MemberKind::Method(contract_sig)) => {
                if candidate_sig.generic_parameters.len() != contract_sig.generic_parameters.len() {
                    return None;
                }
                (
                    candidate_sig.parameters.as_slice(),
                    contract_sig.parameters.as_slice(),
                )
            }
            (MemberKind::Field(_), MemberKind::Field(_))
            | (MemberKind::Property(_), MemberKind::Property(_))
            | (MemberKind::Event(_), MemberKind::Event(_)) => (
                candidate.indexer_parameters(),
                contract_member.indexer_parameters(),
            ),
            _ => return None,
        };

    let arguments = unshadowed(arguments, candidate);
    let parameters_match = candidate_parameters.len() == contract_parameters.len()
        && candidate_parameters
            .iter()
            .zip(contract_parameters)
            .all(|(c, k)| {
                ctx.comparer
                    .equals(&c.parameter_type.substitute(&arguments), &k.parameter_type)
            });
    if !parameters_match {
        return None;
    }

    let found = member_type(candidate).map(|t| t.substitute(&arguments));
    if optional_types_equal(ctx, found.as_ref(), member_type(contract_member)) {
        Some(SignatureMatch::Exact)
    } else {
        Some(SignatureMatch::TypeDiffers(found))
    }
}

/// Search the base types of `implementation_type` for `contract_member`.
///
/// Generic arguments the derived type supplies are substituted into base
/// members, so `Ns.Base<T>.Foo(T)` satisfies `Foo(System.Int32)` on a type
/// deriving from `Ns.Base<System.Int32>`. Constructors are never
/// inherited and never match.
#[must_use]
pub fn find_in_base_types<'a>(
    ctx: &RuleContext<'a>,
    implementation_type: &TypeSurface,
    contract_member: &MemberSurface,
) -> BaseMatch<'a> {
    if contract_member.is_constructor() {
        return BaseMatch::NotFound;
    }

    let mut near_miss = None;
    for base in ctx.implementation_index.resolved_bases(implementation_type) {
        let definition = base.definition;
        for candidate in &definition.members {
            match match_signature(ctx, candidate, contract_member, &base.arguments) {
                Some(SignatureMatch::Exact) => {
                    tracing::trace!(
                        "'{}' satisfied by base type '{}'",
                        contract_member.full_name(implementation_type),
                        base.reference
                    );
                    return BaseMatch::Found(candidate);
                }
                Some(SignatureMatch::TypeDiffers(found)) if near_miss.is_none() => {
                    near_miss = Some(BaseMatch::TypeDiffers {
                        member: candidate,
                        found,
                    });
                }
                _ => {}
            }
        }
    }
    near_miss.unwrap_or(BaseMatch::NotFound)
}

/// Whether `contract_member` is reachable on `implementation_type`,
/// declared there or inherited from a base.
#[must_use]
pub fn member_exists(
    ctx: &RuleContext<'_>,
    implementation_type: &TypeSurface,
    contract_member: &MemberSurface,
) -> bool {
    let no_arguments = TypeArguments::new();
    let declared = implementation_type
        .members
        .iter()
        .any(|m| match (&m.kind, &contract_member.kind) {
            (MemberKind::Constructor(candidate), MemberKind::Constructor(contract)) => {
                m.visibility.is_visible_outside_assembly()
                    && parameter_types_equal(ctx, &candidate.parameters, &contract.parameters)
            }
            _ => matches!(
                match_signature(ctx, m, contract_member, &no_arguments),
                Some(SignatureMatch::Exact)
            ),
        });
    declared
        || matches!(
            find_in_base_types(ctx, implementation_type, contract_member),
            BaseMatch::Found(_)
        )
}

/// Every externally visible contract member must exist in the
/// implementation, declared or inherited, with the same return or
/// declared type. Constructors are only ever found on the type itself.
/// Properties and events must also keep each visible accessor.
///
/// Explicit interface implementations, interface members and delegate
/// members are left to other rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct MembersMustExist;

impl MembersMustExist {
    fn missing_member(
        &self,
        ctx: &RuleContext<'_>,
        mapping: &MemberMapping<'_>,
        contract: &MemberSurface,
        differences: &mut Differences,
    ) -> DifferenceType {
        let mut message = format!(
            "Member '{}' does not exist in the {} but it does exist in the {}.",
            mapping.display_name(),
            ctx.implementation(),
            ctx.contract()
        );

        if let Some(implementation_type) = mapping.containing_type().implementation() {
            let mut near_miss = None;
            for candidate in &implementation_type.members {
                match match_signature(ctx, candidate, contract, &TypeArguments::new()) {
                    Some(SignatureMatch::Exact) => return DifferenceType::Unknown,
                    Some(SignatureMatch::TypeDiffers(found)) if near_miss.is_none() => {
                        near_miss = Some(found);
                    }
                    _ => {}
                }
            }
            match find_in_base_types(ctx, implementation_type, contract) {
                BaseMatch::Found(_) => return DifferenceType::Unknown,
                BaseMatch::TypeDiffers { found, .. } if near_miss.is_none() => {
                    near_miss = Some(found);
                }
                _ => {}
            }

            if let Some(found) = near_miss {
                let what = match contract.kind {
                    MemberKind::Method(_) => "return type",
                    _ => "type",
                };
                message.push_str(&format!(
                    " There does exist a member with {what} '{}' instead of '{}'",
                    return_type_name(found.as_ref()),
                    return_type_name(member_type(contract))
                ));
            }
        }

        differences.add_incompatible(self.name(), message, DifferenceType::Added);
        DifferenceType::Added
    }

    /// Visible contract accessors that are absent or hidden on the
    /// implementation side of a paired property or event.
    fn missing_accessors(
        &self,
        ctx: &RuleContext<'_>,
        mapping: &MemberMapping<'_>,
        implementation: &MemberSurface,
        contract: &MemberSurface,
        differences: &mut Differences,
    ) -> DifferenceType {
        let mut result = DifferenceType::Unknown;
        let slots = contract.accessor_slots().into_iter().zip(implementation.accessor_slots());
        for ((kind, contract_accessor), (_, implementation_accessor)) in slots {
            let Some(contract_accessor) = contract_accessor else {
                continue;
            };
            let still_visible = implementation_accessor
                .is_some_and(|a| a.visibility.is_visible_outside_assembly());
            if still_visible || !contract_accessor.visibility.is_visible_outside_assembly() {
                continue;
            }
            differences.add_incompatible(
                self.name(),
                format!(
                    "Member '{}.{}' does not exist in the {} but it does exist in the {}.",
                    mapping.representative_type().full_name,
                    contract.accessor_signature(kind),
                    ctx.implementation(),
                    ctx.contract()
                ),
                DifferenceType::Added,
            );
            result = DifferenceType::Added;
        }
        result
    }
}

impl DifferenceRule for MembersMustExist {
    fn name(&self) -> &'static str {
        "MembersMustExist"
    }

    fn diff_members(
        &self,
        ctx: &RuleContext<'_>,
        mapping: &MemberMapping<'_>,
        differences: &mut Differences,
    ) -> Result<DifferenceType> {
        let Some(contract) = mapping.contract() else {
            return Ok(DifferenceType::Unknown);
        };
        let containing = mapping.containing_type().representative();
        if contract.is_explicit_interface_implementation()
            || !contract.visibility.is_visible_outside_assembly()
            || containing.is_interface()
            || containing.is_delegate()
        {
            return Ok(DifferenceType::Unknown);
        }

        Ok(match mapping.implementation() {
            None => self.missing_member(ctx, mapping, contract, differences),
            Some(implementation) => {
                self.missing_accessors(ctx, mapping, implementation, contract, differences)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{Operands, RuleContext};
    use crate::model::{
        AccessorSurface, ApiSurface, GenericParameterSurface, MemberModifiers, MethodSignature,
        OrdinalTypeComparer, SurfaceIndex, Visibility,
    };
    use crate::rules::test_support::{run_on_types, run_rule};

    fn run_method() -> MemberSurface {
        MemberSurface::method("Run", MethodSignature::returning("System.Int32"))
    }

    fn accessor() -> Option<AccessorSurface> {
        Some(AccessorSurface::new(MemberModifiers::default()))
    }

    fn rule_messages(implementation: TypeSurface, contract: TypeSurface) -> Vec<String> {
        run_on_types(MembersMustExist, implementation, contract)
            .into_iter()
            .map(|d| d.message)
            .collect()
    }

    #[test]
    fn test_removed_method() {
        let diffs = run_on_types(
            MembersMustExist,
            TypeSurface::class("Ns.Widget"),
            TypeSurface::class("Ns.Widget").with_member(run_method()),
        );
        assert_eq!(diffs.len(), 1);
        assert_eq!(
            diffs[0].message,
            "Member 'Ns.Widget.Run()' does not exist in the implementation \
             but it does exist in the contract."
        );
        assert_eq!(diffs[0].difference_type, DifferenceType::Added);
    }

    #[test]
    fn test_changed_return_type() {
        let messages = rule_messages(
            TypeSurface::class("Ns.Widget").with_member(MemberSurface::method(
                "Run",
                MethodSignature::returning("System.Int64"),
            )),
            TypeSurface::class("Ns.Widget").with_member(run_method()),
        );
        assert_eq!(messages.len(), 1);
        assert!(messages[0].ends_with(
            "There does exist a member with return type 'System.Int64' instead of 'System.Int32'"
        ));
    }

    #[test]
    fn test_changed_field_type() {
        let count = |field_type: &str| {
            TypeSurface::class("Ns.Widget").with_member(MemberSurface::field("Count", field_type))
        };
        let messages = rule_messages(count("System.String"), count("System.Int32"));
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Member 'Ns.Widget.Count' does not exist"));
        assert!(messages[0].ends_with(
            "There does exist a member with type 'System.String' instead of 'System.Int32'"
        ));
    }

    #[test]
    fn test_method_moved_to_base() {
        let implementation = ApiSurface::new("impl")
            .with_type(TypeSurface::class("Ns.Base").with_member(run_method()))
            .with_type(TypeSurface::class("Ns.Widget").with_base_type("Ns.Base"));
        let contract = ApiSurface::new("contract")
            .with_type(TypeSurface::class("Ns.Base"))
            .with_type(
                TypeSurface::class("Ns.Widget")
                    .with_base_type("Ns.Base")
                    .with_member(run_method()),
            );
        let report = run_rule(MembersMustExist, &implementation, &contract);
        assert!(!report.has_incompatible());
    }

    #[test]
    fn test_private_base_method_does_not_count() {
        let implementation = ApiSurface::new("impl")
            .with_type(
                TypeSurface::class("Ns.Base")
                    .with_member(run_method().with_visibility(Visibility::Private)),
            )
            .with_type(TypeSurface::class("Ns.Widget").with_base_type("Ns.Base"));
        let contract = ApiSurface::new("contract")
            .with_type(TypeSurface::class("Ns.Widget").with_member(run_method()));
        let report = run_rule(MembersMustExist, &implementation, &contract);
        assert_eq!(report.differences().count(), 1);
    }

    #[test]
    fn test_base_method_with_other_return_type() {
        let implementation = ApiSurface::new("impl")
            .with_type(
                TypeSurface::class("Ns.Base").with_member(MemberSurface::method(
                    "Run",
                    MethodSignature::returning("System.Int64"),
                )),
            )
            .with_type(TypeSurface::class("Ns.Widget").with_base_type("Ns.Base"));
        let contract = ApiSurface::new("contract")
            .with_type(TypeSurface::class("Ns.Widget").with_member(run_method()));

        let report = run_rule(MembersMustExist, &implementation, &contract);
        let diffs: Vec<_> = report.differences().collect();
        assert_eq!(diffs.len(), 1);
        assert!(diffs[0].message.ends_with(
            "There does exist a member with return type 'System.Int64' instead of 'System.Int32'"
        ));
    }

    #[test]
    fn test_generic_base_arguments_are_substituted() {
        let implementation = ApiSurface::new("impl")
            .with_type(
                TypeSurface::class("Ns.Base<T>").with_member(MemberSurface::method(
                    "Foo",
                    MethodSignature::returning("T").with_parameter("value", "T"),
                )),
            )
            .with_type(TypeSurface::class("Ns.Derived").with_base_type("Ns.Base<System.Int32>"));
        let contract = ApiSurface::new("contract").with_type(
            TypeSurface::class("Ns.Derived").with_member(MemberSurface::method(
                "Foo",
                MethodSignature::returning("System.Int32").with_parameter("value", "System.Int32"),
            )),
        );
        let report = run_rule(MembersMustExist, &implementation, &contract);
        assert!(!report.has_incompatible());

        let wrong = ApiSurface::new("contract").with_type(
            TypeSurface::class("Ns.Derived").with_member(MemberSurface::method(
                "Foo",
                MethodSignature::returning("System.Int32").with_parameter("value", "System.String"),
            )),
        );
        let report = run_rule(MembersMustExist, &implementation, &wrong);
        assert_eq!(report.differences().count(), 1);
    }

    #[test]
    fn test_method_generic_parameter_shadows_base_argument() {
        let generic_foo = |parameter: &str| {
            MemberSurface::method(
                "Foo",
                MethodSignature::new()
                    .with_generic_parameter(GenericParameterSurface::new("T"))
                    .with_parameter("value", parameter),
            )
        };
        let implementation = ApiSurface::new("impl")
            .with_type(TypeSurface::class("Ns.Base<T>").with_member(generic_foo("T")))
            .with_type(TypeSurface::class("Ns.Derived").with_base_type("Ns.Base<System.Int32>"));
        let contract = ApiSurface::new("contract")
            .with_type(TypeSurface::class("Ns.Derived").with_member(generic_foo("T")));
        let report = run_rule(MembersMustExist, &implementation, &contract);
        assert!(!report.has_incompatible());
    }

    #[test]
    fn test_removed_constructor() {
        let ctor = MemberSurface::constructor_with(
            MethodSignature::new().with_parameter("size", "System.Int32"),
        );
        let diffs = run_on_types(
            MembersMustExist,
            TypeSurface::class("Ns.Widget").with_member(MemberSurface::constructor()),
            TypeSurface::class("Ns.Widget")
                .with_member(MemberSurface::constructor())
                .with_member(ctor),
        );
        assert_eq!(diffs.len(), 1);
        assert!(diffs[0]
            .message
            .starts_with("Member 'Ns.Widget..ctor(System.Int32)' does not exist"));
    }

    #[test]
    fn test_constructor_is_never_matched_on_base() {
        let implementation = ApiSurface::new("impl")
            .with_type(TypeSurface::class("Ns.Base").with_member(MemberSurface::constructor()))
            .with_type(TypeSurface::class("Ns.Widget").with_base_type("Ns.Base"));
        let contract = ApiSurface::new("contract").with_type(
            TypeSurface::class("Ns.Widget")
                .with_base_type("Ns.Base")
                .with_member(MemberSurface::constructor()),
        );

        let implementation_index = SurfaceIndex::build(&implementation);
        let contract_index = SurfaceIndex::build(&contract);
        let operands = Operands::default();
        let ctx = RuleContext::new(
            &OrdinalTypeComparer,
            &operands,
            &implementation_index,
            &contract_index,
        );
        let widget = &implementation.types[1];
        let ctor = &contract.types[0].members[0];
        assert!(matches!(find_in_base_types(&ctx, widget, ctor), BaseMatch::NotFound));
        assert!(!member_exists(&ctx, widget, ctor));
    }

    #[test]
    fn test_generic_arity_must_match() {
        let generic_run = MemberSurface::method(
            "Run",
            MethodSignature::returning("System.Int32")
                .with_generic_parameter(GenericParameterSurface::new("T")),
        );
        let implementation = ApiSurface::new("impl")
            .with_type(TypeSurface::class("Ns.Base").with_member(generic_run))
            .with_type(TypeSurface::class("Ns.Widget").with_base_type("Ns.Base"));
        let contract = ApiSurface::new("contract")
            .with_type(TypeSurface::class("Ns.Widget").with_member(run_method()));
        let report = run_rule(MembersMustExist, &implementation, &contract);
        assert_eq!(report.differences().count(), 1);
    }

    #[test]
    fn test_skips_interface_and_private_members() {
        let diffs = run_on_types(
            MembersMustExist,
            TypeSurface::interface("Ns.IWidget"),
            TypeSurface::interface("Ns.IWidget").with_member(run_method().with_abstract()),
        );
        assert!(diffs.is_empty());

        let diffs = run_on_types(
            MembersMustExist,
            TypeSurface::class("Ns.Widget"),
            TypeSurface::class("Ns.Widget")
                .with_member(run_method().with_visibility(Visibility::Internal)),
        );
        assert!(diffs.is_empty());
    }

    #[test]
    fn test_hidden_implementation_member_is_missing() {
        let diffs = run_on_types(
            MembersMustExist,
            TypeSurface::class("Ns.Widget")
                .with_member(run_method().with_visibility(Visibility::Internal)),
            TypeSurface::class("Ns.Widget").with_member(run_method()),
        );
        assert_eq!(diffs.len(), 1);
    }

    #[test]
    fn test_skips_delegate_members() {
        let invoke = |return_type: &str| {
            TypeSurface::delegate("Ns.Handler").with_member(MemberSurface::method(
                "Invoke",
                MethodSignature::returning(return_type),
            ))
        };
        let diffs = run_on_types(MembersMustExist, invoke("System.Int64"), invoke("System.Int32"));
        assert!(diffs.is_empty());
    }

    #[test]
    fn test_removed_field() {
        let diffs = run_on_types(
            MembersMustExist,
            TypeSurface::class("Ns.Widget"),
            TypeSurface::class("Ns.Widget")
                .with_member(MemberSurface::field("Count", "System.Int32")),
        );
        assert_eq!(diffs.len(), 1);
    }

    #[test]
    fn test_removed_property_and_event() {
        let messages = rule_messages(
            TypeSurface::class("Ns.Widget"),
            TypeSurface::class("Ns.Widget")
                .with_member(MemberSurface::property("Name", "System.String", accessor(), None))
                .with_member(MemberSurface::event(
                    "Changed",
                    "System.EventHandler",
                    accessor(),
                    accessor(),
                )),
        );
        assert_eq!(
            messages,
            vec![
                "Member 'Ns.Widget.Name' does not exist in the implementation \
                 but it does exist in the contract."
                    .to_string(),
                "Member 'Ns.Widget.Changed' does not exist in the implementation \
                 but it does exist in the contract."
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_inherited_property_is_found() {
        let name = || MemberSurface::property("Name", "T", accessor(), None);
        let implementation = ApiSurface::new("impl")
            .with_type(TypeSurface::class("Ns.Base<T>").with_member(name()))
            .with_type(TypeSurface::class("Ns.Widget").with_base_type("Ns.Base<System.String>"));
        let contract = ApiSurface::new("contract").with_type(
            TypeSurface::class("Ns.Widget")
                .with_member(MemberSurface::property("Name", "System.String", accessor(), None)),
        );
        let report = run_rule(MembersMustExist, &implementation, &contract);
        assert!(!report.has_incompatible());
    }

    #[test]
    fn test_removed_setter() {
        let name = |setter| MemberSurface::property("Name", "System.String", accessor(), setter);
        let messages = rule_messages(
            TypeSurface::class("Ns.Widget").with_member(name(None)),
            TypeSurface::class("Ns.Widget").with_member(name(accessor())),
        );
        assert_eq!(
            messages,
            vec!["Member 'Ns.Widget.set_Name(System.String)' does not exist in the \
                  implementation but it does exist in the contract."
                .to_string()]
        );
    }

    #[test]
    fn test_hidden_accessor_is_missing() {
        let internal = AccessorSurface {
            visibility: Visibility::Internal,
            ..AccessorSurface::default()
        };
        let changed = |remover| {
            MemberSurface::event("Changed", "System.EventHandler", accessor(), remover)
        };
        let messages = rule_messages(
            TypeSurface::class("Ns.Widget").with_member(changed(Some(internal))),
            TypeSurface::class("Ns.Widget").with_member(changed(accessor())),
        );
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Member 'Ns.Widget.remove_Changed(System.EventHandler)'"));
    }

    #[test]
    fn test_internal_contract_accessor_is_not_required() {
        let internal = AccessorSurface {
            visibility: Visibility::Internal,
            ..AccessorSurface::default()
        };
        let name = |setter| MemberSurface::property("Name", "System.String", accessor(), setter);
        let messages = rule_messages(
            TypeSurface::class("Ns.Widget").with_member(name(None)),
            TypeSurface::class("Ns.Widget").with_member(name(Some(internal))),
        );
        assert!(messages.is_empty());
    }
}

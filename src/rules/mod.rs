//! The compatibility rule set.
//!
//! Every rule is an independent [`DifferenceRule`]. Rules take their
//! configuration ([`RuleSettings`], an [`AttributeFilter`]) at construction
//! and read the comparer, operand labels and surface indexes from the
//! [`RuleContext`](crate::diff::RuleContext) of the pass.
//!
//! [`standard_rules`] assembles the full set in evaluation order.

mod abstract_members;
mod attributes;
mod base_types;
mod classification;
mod delegates;
mod enums;
mod generics;
mod interfaces;
mod members_must_exist;
mod parameter_names;
mod sealing;
mod types_must_exist;
mod virtuality;
mod visibility;

pub use abstract_members::{CannotAddAbstractMembers, CannotMakeMemberAbstract};
pub use attributes::AttributeDifference;
pub use base_types::CannotRemoveBaseTypeOrInterface;
pub use classification::TypeCannotChangeClassification;
pub use delegates::DelegatesMustMatch;
pub use enums::{EnumTypesMustMatch, EnumValuesMustMatch};
pub use generics::{constraint_signature, CannotChangeGenerics};
pub use interfaces::InterfacesShouldHaveSameMembers;
pub use members_must_exist::{find_in_base_types, member_exists, BaseMatch, MembersMustExist};
pub use parameter_names::ParameterNamesCannotChange;
pub use sealing::{CannotMakeTypeAbstract, CannotSealType};
pub use types_must_exist::TypesMustExist;
pub use virtuality::CannotMakeMemberNonVirtual;
pub use visibility::CannotReduceVisibility;

use crate::diff::{DifferenceRule, RuleContext, RuleRegistry};
use crate::filter::AttributeFilter;
use crate::model::{ParameterSurface, TypeRef};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Immutable switches shared by the rules of one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RuleSettings {
    /// Tolerate one-sided non-abstract (default) interface members.
    pub allow_default_interface_methods: bool,
}

/// Every rule, in evaluation order, including optional ones.
///
/// Use [`RuleRegistry::enforcing_optional`] and [`RuleRegistry::without`]
/// to narrow the set.
#[must_use]
pub fn standard_rules(settings: RuleSettings, attribute_filter: AttributeFilter) -> RuleRegistry {
    RuleRegistry::new()
        .with_rule(TypesMustExist)
        .with_rule(TypeCannotChangeClassification)
        .with_rule(CannotSealType)
        .with_rule(CannotMakeTypeAbstract)
        .with_rule(CannotRemoveBaseTypeOrInterface)
        .with_rule(EnumTypesMustMatch)
        .with_rule(DelegatesMustMatch)
        .with_rule(MembersMustExist)
        .with_rule(InterfacesShouldHaveSameMembers::new(settings))
        .with_rule(CannotAddAbstractMembers)
        .with_rule(CannotMakeMemberNonVirtual)
        .with_rule(CannotMakeMemberAbstract)
        .with_rule(EnumValuesMustMatch)
        .with_rule(CannotChangeGenerics)
        .with_rule(AttributeDifference::new(attribute_filter))
        .with_rule(CannotReduceVisibility)
        .with_rule(ParameterNamesCannotChange)
}

/// Names of every rule in [`standard_rules`].
#[must_use]
pub fn standard_rule_names() -> Vec<&'static str> {
    standard_rules(RuleSettings::default(), AttributeFilter::new())
        .iter()
        .map(DifferenceRule::name)
        .collect()
}

/// `System.Void` for absent return types.
pub(crate) fn return_type_name(return_type: Option<&TypeRef>) -> &str {
    return_type.map_or("System.Void", TypeRef::name)
}

/// Type equality where `None` (void) only equals `None`.
pub(crate) fn optional_types_equal(
    ctx: &RuleContext<'_>,
    left: Option<&TypeRef>,
    right: Option<&TypeRef>,
) -> bool {
    match (left, right) {
        (Some(l), Some(r)) => ctx.comparer.equals(l, r),
        (None, None) => true,
        _ => false,
    }
}

/// Positional parameter type equality, ignoring names.
pub(crate) fn parameter_types_equal(
    ctx: &RuleContext<'_>,
    left: &[ParameterSurface],
    right: &[ParameterSurface],
) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .all(|(l, r)| ctx.comparer.equals(&l.parameter_type, &r.parameter_type))
}

//! Interface member sets.

use super::RuleSettings;
use crate::diff::{DifferenceRule, DifferenceType, Differences, RuleContext};
use crate::error::Result;
use crate::mapping::MemberMapping;

/// Interfaces keep exactly the same members in both directions.
///
/// Adding a member breaks implementers and removing one breaks callers.
/// With `allow_default_interface_methods`, a one-sided member that carries
/// a default body (is not abstract) is tolerated.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterfacesShouldHaveSameMembers {
    settings: RuleSettings,
}

impl InterfacesShouldHaveSameMembers {
    #[must_use]
    pub const fn new(settings: RuleSettings) -> Self {
        Self { settings }
    }
}

impl DifferenceRule for InterfacesShouldHaveSameMembers {
    fn name(&self) -> &'static str {
        "InterfacesShouldHaveSameMembers"
    }

    fn diff_members(
        &self,
        ctx: &RuleContext<'_>,
        mapping: &MemberMapping<'_>,
        differences: &mut Differences,
    ) -> Result<DifferenceType> {
        if mapping.both().is_some() || !mapping.containing_type().representative().is_interface() {
            return Ok(DifferenceType::Unknown);
        }

        let member = mapping.representative();
        if self.settings.allow_default_interface_methods && !member.is_abstract() {
            tracing::trace!("Tolerating default interface member '{}'", mapping.display_name());
            return Ok(DifferenceType::Unknown);
        }

        let (present, missing) = if mapping.implementation().is_some() {
            (ctx.implementation(), ctx.contract())
        } else {
            (ctx.contract(), ctx.implementation())
        };
        differences.add_incompatible(
            self.name(),
            format!(
                "Interface member '{}' is present in the {present} but not in the {missing}.",
                mapping.display_name()
            ),
            DifferenceType::Changed,
        );
        Ok(DifferenceType::Changed)
    }
}

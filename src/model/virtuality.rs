//! Effective overridability of members.

use super::{MemberKind, MemberModifiers, MemberSurface, TypeSurface};
use serde::{Deserialize, Serialize};

/// How far a derived type can override a member.
///
/// Ordered from least to most demanding so that accessor aggregation is a `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overridability {
    None,
    Virtual,
    Abstract,
}

impl Overridability {
    /// Classify `member` as declared on `declaring`.
    ///
    /// Virtual members of an effectively sealed type classify as `None`:
    /// nobody outside the assembly can override them.
    #[must_use]
    pub fn classify(member: &MemberSurface, declaring: &TypeSurface) -> Self {
        match &member.kind {
            MemberKind::Field(_) => Self::None,
            MemberKind::Method(_) | MemberKind::Constructor(_) => {
                Self::from_modifiers(&member.modifiers, declaring)
            }
            MemberKind::Property(_) | MemberKind::Event(_) => Self::aggregate(member, declaring),
        }
    }

    /// Whether derived types can (or must) override.
    #[must_use]
    pub fn is_overridable(&self) -> bool {
        *self != Self::None
    }

    fn from_modifiers(modifiers: &MemberModifiers, declaring: &TypeSurface) -> Self {
        if !(modifiers.is_virtual || modifiers.is_abstract) || modifiers.is_final {
            return Self::None;
        }
        if declaring.is_effectively_sealed() {
            return Self::None;
        }
        if modifiers.is_abstract {
            Self::Abstract
        } else {
            Self::Virtual
        }
    }

    /// Strongest classification among the accessors of a property or event.
    fn aggregate(member: &MemberSurface, declaring: &TypeSurface) -> Self {
        member
            .accessors()
            .into_iter()
            .map(|a| Self::from_modifiers(&a.modifiers, declaring))
            .max()
            .unwrap_or(Self::None)
    }
}

impl std::fmt::Display for Overridability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "non-virtual"),
            Self::Virtual => write!(f, "virtual"),
            Self::Abstract => write!(f, "abstract"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AccessorSurface, MethodSignature, Visibility};

    fn open_class() -> TypeSurface {
        TypeSurface::class("Ns.Widget").with_member(MemberSurface::constructor())
    }

    fn run() -> MemberSurface {
        MemberSurface::method("Run", MethodSignature::new())
    }

    #[test]
    fn test_non_virtual_member_is_none() {
        assert_eq!(Overridability::classify(&run(), &open_class()), Overridability::None);
    }

    #[test]
    fn test_virtual_member_on_open_type() {
        let member = run().with_virtual();
        assert_eq!(
            Overridability::classify(&member, &open_class()),
            Overridability::Virtual
        );
    }

    #[test]
    fn test_sealed_override_is_none() {
        let member = run().with_virtual().with_final();
        assert_eq!(Overridability::classify(&member, &open_class()), Overridability::None);
    }

    #[test]
    fn test_private_constructor_neutralizes_virtual() {
        let member = run().with_virtual();
        let sealed_by_ctor = TypeSurface::class("Ns.Widget")
            .with_member(MemberSurface::constructor().with_visibility(Visibility::Private));
        assert_eq!(
            Overridability::classify(&member, &sealed_by_ctor),
            Overridability::None
        );
    }

    #[test]
    fn test_abstract_member() {
        let member = run().with_abstract();
        let declaring = open_class().with_abstract(true);
        assert_eq!(
            Overridability::classify(&member, &declaring),
            Overridability::Abstract
        );
    }

    #[test]
    fn test_property_takes_strictest_accessor() {
        let virtual_get = AccessorSurface::new(MemberModifiers {
            is_virtual: true,
            ..MemberModifiers::default()
        });
        let abstract_set = AccessorSurface::new(MemberModifiers {
            is_virtual: true,
            is_abstract: true,
            ..MemberModifiers::default()
        });

        let name =
            |getter, setter| MemberSurface::property("Name", "System.String", getter, setter);

        let mixed = name(Some(virtual_get), Some(abstract_set));
        assert_eq!(Overridability::classify(&mixed, &open_class()), Overridability::Abstract);

        let plain_set = AccessorSurface::default();
        let partly = name(Some(virtual_get), Some(plain_set));
        assert_eq!(Overridability::classify(&partly, &open_class()), Overridability::Virtual);

        let none = name(Some(plain_set), None);
        assert_eq!(Overridability::classify(&none, &open_class()), Overridability::None);
    }

    #[test]
    fn test_fields_are_never_overridable() {
        let field = MemberSurface::field("count", "System.Int32");
        assert!(!Overridability::classify(&field, &open_class()).is_overridable());
    }
}

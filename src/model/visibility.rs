//! Accessibility levels and the narrowing lattice.

use serde::{Deserialize, Serialize};

/// Accessibility of a type or member as declared in metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// `private`
    Private,
    /// `private protected` (family and assembly)
    PrivateProtected,
    /// `internal` (assembly)
    Internal,
    /// `protected` (family)
    Protected,
    /// `protected internal` (family or assembly)
    ProtectedInternal,
    /// `public`
    #[default]
    Public,
}

impl Visibility {
    /// All six accessibility levels.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Private,
            Self::PrivateProtected,
            Self::Internal,
            Self::Protected,
            Self::ProtectedInternal,
            Self::Public,
        ]
    }

    /// C# keyword spelling, used in difference messages.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::PrivateProtected => "private protected",
            Self::Internal => "internal",
            Self::Protected => "protected",
            Self::ProtectedInternal => "protected internal",
            Self::Public => "public",
        }
    }

    /// Whether code outside the declaring assembly can reach this level
    /// (directly or through derivation).
    #[must_use]
    pub const fn is_visible_outside_assembly(&self) -> bool {
        matches!(self, Self::Public | Self::Protected | Self::ProtectedInternal)
    }

    /// Decide whether moving from `contract` to `implementation` narrows
    /// the set of callers.
    ///
    /// `Internal` and `Protected` are incomparable siblings, so moving
    /// between them counts as a narrowing in both directions.
    #[must_use]
    pub fn is_narrowed(contract: Self, implementation: Self) -> bool {
        if contract == implementation {
            return false;
        }

        match implementation {
            Self::Public => false,
            Self::Internal | Self::Protected => {
                !matches!(contract, Self::Private | Self::PrivateProtected)
            }
            Self::ProtectedInternal => contract == Self::Public,
            Self::PrivateProtected | Self::Private => contract != Self::Private,
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

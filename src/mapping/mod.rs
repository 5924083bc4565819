//! Paired declarations handed to the rule engine.
//!
//! A mapping holds two fixed sides, `[implementation, contract]`. Either
//! side may be absent (the declaration was added or removed) but never
//! both: [`ElementMapping::from_sides`] refuses to build such a pair.

mod pairing;

pub use pairing::{pair_surfaces, TypePairing};

use crate::error::{CompatError, Result};
use crate::model::{MemberSurface, TypeSurface};
use serde::{Deserialize, Serialize};

/// Index of a mapping side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Implementation = 0,
    Contract = 1,
}

/// A pair of declarations believed to be the same API element.
#[derive(Debug)]
pub struct ElementMapping<'a, T> {
    sides: Sides<'a, T>,
}

#[derive(Debug)]
enum Sides<'a, T> {
    Paired(&'a T, &'a T),
    ImplementationOnly(&'a T),
    ContractOnly(&'a T),
}

impl<T> Clone for Sides<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Sides<'_, T> {}

impl<T> Clone for ElementMapping<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ElementMapping<'_, T> {}

impl<'a, T> ElementMapping<'a, T> {
    /// Pair two sides. Fails when both are absent.
    pub fn from_sides(implementation: Option<&'a T>, contract: Option<&'a T>) -> Result<Self> {
        let sides = match (implementation, contract) {
            (Some(implementation), Some(contract)) => Sides::Paired(implementation, contract),
            (Some(implementation), None) => Sides::ImplementationOnly(implementation),
            (None, Some(contract)) => Sides::ContractOnly(contract),
            (None, None) => {
                return Err(CompatError::InvalidMapping(
                    "a mapping needs at least one side".to_string(),
                ))
            }
        };
        Ok(Self { sides })
    }

    /// Both sides present.
    #[must_use]
    pub const fn paired(implementation: &'a T, contract: &'a T) -> Self {
        Self {
            sides: Sides::Paired(implementation, contract),
        }
    }

    /// Present only in the implementation.
    #[must_use]
    pub const fn implementation_only(implementation: &'a T) -> Self {
        Self {
            sides: Sides::ImplementationOnly(implementation),
        }
    }

    /// Present only in the contract.
    #[must_use]
    pub const fn contract_only(contract: &'a T) -> Self {
        Self {
            sides: Sides::ContractOnly(contract),
        }
    }

    #[must_use]
    pub const fn side(&self, side: Side) -> Option<&'a T> {
        match side {
            Side::Implementation => self.implementation(),
            Side::Contract => self.contract(),
        }
    }

    #[must_use]
    pub const fn implementation(&self) -> Option<&'a T> {
        match self.sides {
            Sides::Paired(implementation, _) | Sides::ImplementationOnly(implementation) => {
                Some(implementation)
            }
            Sides::ContractOnly(_) => None,
        }
    }

    #[must_use]
    pub const fn contract(&self) -> Option<&'a T> {
        match self.sides {
            Sides::Paired(_, contract) | Sides::ContractOnly(contract) => Some(contract),
            Sides::ImplementationOnly(_) => None,
        }
    }

    /// Both sides, when present.
    #[must_use]
    pub const fn both(&self) -> Option<(&'a T, &'a T)> {
        match self.sides {
            Sides::Paired(implementation, contract) => Some((implementation, contract)),
            Sides::ImplementationOnly(_) | Sides::ContractOnly(_) => None,
        }
    }

    /// The implementation side if present, else the contract side.
    #[must_use]
    pub const fn representative(&self) -> &'a T {
        match self.sides {
            Sides::Paired(side, _)
            | Sides::ImplementationOnly(side)
            | Sides::ContractOnly(side) => side,
        }
    }

    #[must_use]
    pub const fn is_paired(&self) -> bool {
        matches!(self.sides, Sides::Paired(..))
    }
}

/// Mapping between two type definitions.
pub type TypeMapping<'a> = ElementMapping<'a, TypeSurface>;

/// Mapping between two members, with the mapping of their declaring types.
#[derive(Debug, Clone, Copy)]
pub struct MemberMapping<'a> {
    members: ElementMapping<'a, MemberSurface>,
    containing_type: TypeMapping<'a>,
}

impl<'a> MemberMapping<'a> {
    #[must_use]
    pub const fn new(
        members: ElementMapping<'a, MemberSurface>,
        containing_type: TypeMapping<'a>,
    ) -> Self {
        Self {
            members,
            containing_type,
        }
    }

    #[must_use]
    pub const fn implementation(&self) -> Option<&'a MemberSurface> {
        self.members.implementation()
    }

    #[must_use]
    pub const fn contract(&self) -> Option<&'a MemberSurface> {
        self.members.contract()
    }

    #[must_use]
    pub const fn both(&self) -> Option<(&'a MemberSurface, &'a MemberSurface)> {
        self.members.both()
    }

    #[must_use]
    pub const fn representative(&self) -> &'a MemberSurface {
        self.members.representative()
    }

    #[must_use]
    pub const fn containing_type(&self) -> &TypeMapping<'a> {
        &self.containing_type
    }

    /// The declaring type on the same side as the representative member.
    #[must_use]
    pub fn representative_type(&self) -> &'a TypeSurface {
        match self.members.implementation() {
            Some(_) => self
                .containing_type
                .implementation()
                .unwrap_or_else(|| self.containing_type.representative()),
            None => self
                .containing_type
                .contract()
                .unwrap_or_else(|| self.containing_type.representative()),
        }
    }

    /// `Declaring.Type.Member(...)` of the representative side.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.representative().full_name(self.representative_type())
    }
}

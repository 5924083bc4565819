//! Difference records and their accumulation.

use crate::model::TypeRef;
use serde::{Deserialize, Serialize};

/// Classification of a mapping or of a single difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceType {
    /// No rule had an opinion.
    #[default]
    Unknown,
    Unchanged,
    /// The contract declares something the implementation lacks.
    Added,
    /// The implementation declares something the contract lacks.
    Removed,
    Changed,
}

impl DifferenceType {
    const fn rank(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Unchanged => 1,
            Self::Added | Self::Removed | Self::Changed => 2,
        }
    }

    /// Monotonic merge: a stronger classification replaces a weaker one,
    /// and the first of equally strong classifications is kept.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }

    /// Added, Removed or Changed.
    #[must_use]
    pub const fn is_difference(self) -> bool {
        self.rank() == 2
    }
}

impl std::fmt::Display for DifferenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Unchanged => write!(f, "Unchanged"),
            Self::Added => write!(f, "Added"),
            Self::Removed => write!(f, "Removed"),
            Self::Changed => write!(f, "Changed"),
        }
    }
}

/// Old and new type of a type-mismatch difference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMismatch {
    pub implementation: TypeRef,
    pub contract: TypeRef,
}

/// One reported difference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difference {
    /// Stable rule identifier, used by baselines.
    pub id: String,
    pub message: String,
    pub difference_type: DifferenceType,
    /// Compatible differences are informational and never fail a run.
    #[serde(default)]
    pub compatible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_mismatch: Option<TypeMismatch>,
}

impl Difference {
    /// A breaking difference.
    pub fn incompatible(
        id: impl Into<String>,
        message: impl Into<String>,
        difference_type: DifferenceType,
    ) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            difference_type,
            compatible: false,
            type_mismatch: None,
        }
    }

    /// An informational difference.
    pub fn compatible(
        id: impl Into<String>,
        message: impl Into<String>,
        difference_type: DifferenceType,
    ) -> Self {
        Self {
            compatible: true,
            ..Self::incompatible(id, message, difference_type)
        }
    }

    #[must_use]
    pub fn with_type_mismatch(mut self, implementation: TypeRef, contract: TypeRef) -> Self {
        self.type_mismatch = Some(TypeMismatch {
            implementation,
            contract,
        });
        self
    }

    /// `Id : message`, the line format shared by text output and baselines.
    #[must_use]
    pub fn baseline_key(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Difference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} : {}", self.id, self.message)
    }
}

/// Append-only, ordered list of differences for one mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Differences {
    items: Vec<Difference>,
}

impl Differences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, difference: Difference) {
        self.items.push(difference);
    }

    pub fn add_incompatible(
        &mut self,
        id: &str,
        message: impl Into<String>,
        difference_type: DifferenceType,
    ) {
        self.add(Difference::incompatible(id, message, difference_type));
    }

    pub fn add_compatible(
        &mut self,
        id: &str,
        message: impl Into<String>,
        difference_type: DifferenceType,
    ) {
        self.add(Difference::compatible(id, message, difference_type));
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Difference> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Difference> {
        self.items
    }
}

impl<'a> IntoIterator for &'a Differences {
    type Item = &'a Difference;
    type IntoIter = std::slice::Iter<'a, Difference>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

//! Whole-assembly surfaces and name resolution over them.

use super::{TypeArguments, TypeRef, TypeSurface};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The public surface of one assembly (or a set of assemblies treated as one).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiSurface {
    /// Assembly or snapshot name, shown in report headers.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeSurface>,
}

impl ApiSurface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_type(mut self, ty: TypeSurface) -> Self {
        self.types.push(ty);
        self
    }

    /// Number of members across all types.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.types.iter().map(|t| t.members.len()).sum()
    }
}

/// A base type found while walking a chain.
#[derive(Debug, Clone)]
pub struct ResolvedBase<'a> {
    /// The base as referenced from the derived side, arguments substituted.
    pub reference: TypeRef,
    pub definition: &'a TypeSurface,
    /// The definition's generic parameters bound to `reference`'s arguments.
    pub arguments: TypeArguments,
}

/// Precomputed lookup of type definitions in one [`ApiSurface`].
///
/// References resolve first by exact display name, then by definition key,
/// so `Ns.List<System.Int32>` finds the definition `Ns.List<T>`.
#[derive(Debug, Clone)]
pub struct SurfaceIndex<'a> {
    by_name: HashMap<&'a str, &'a TypeSurface>,
    by_definition: HashMap<String, &'a TypeSurface>,
}

impl<'a> SurfaceIndex<'a> {
    /// Build the index. Later duplicates of a name are ignored.
    #[must_use]
    pub fn build(surface: &'a ApiSurface) -> Self {
        let mut by_name = HashMap::with_capacity(surface.types.len());
        let mut by_definition = HashMap::with_capacity(surface.types.len());

        for ty in &surface.types {
            by_name.entry(ty.full_name.as_str()).or_insert(ty);
            by_definition.entry(ty.type_ref().definition_key()).or_insert(ty);
        }

        Self {
            by_name,
            by_definition,
        }
    }

    /// Resolve a reference to its definition in this surface.
    #[must_use]
    pub fn resolve(&self, reference: &TypeRef) -> Option<&'a TypeSurface> {
        self.by_name
            .get(reference.name())
            .or_else(|| self.by_definition.get(&reference.definition_key()))
            .copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Walk the base-type chain of `ty`, binding each base definition's
    /// generic parameters to the arguments the derived type supplies.
    ///
    /// Returns the resolved bases, most-derived first and never `ty`
    /// itself, plus the first reference that does not resolve in this
    /// surface.
    fn walk_bases(&self, ty: &TypeSurface) -> (Vec<ResolvedBase<'a>>, Option<TypeRef>) {
        let mut resolved = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(ty.full_name.clone());

        let mut arguments = TypeArguments::new();
        let mut current = ty.base_type.clone();
        while let Some(declared) = current.take() {
            let reference = declared.substitute(&arguments);
            let Some(definition) = self.resolve(&reference) else {
                tracing::trace!(
                    "Base type '{}' of '{}' is outside the surface",
                    reference,
                    ty.full_name
                );
                return (resolved, Some(reference));
            };
            if !seen.insert(definition.full_name.clone()) {
                tracing::warn!(
                    "Base type cycle at '{}' while walking '{}'",
                    definition.full_name,
                    ty.full_name
                );
                break;
            }

            arguments = definition
                .generic_parameter_names()
                .into_iter()
                .zip(reference.generic_arguments().into_iter().map(str::to_string))
                .collect();
            current = definition.base_type.clone();
            resolved.push(ResolvedBase {
                reference,
                definition,
                arguments: arguments.clone(),
            });
        }
        (resolved, None)
    }

    /// The base-type chain of `ty`, most-derived first, excluding `ty` itself.
    ///
    /// Generic arguments are carried down the chain, so a base declared as
    /// `Ns.Base<T>` on `Ns.Middle<T> : Ns.Base<T>` shows up as
    /// `Ns.Base<System.Int32>` under `Ns.Middle<System.Int32>`. The walk
    /// stops at the first base that does not resolve in this surface; that
    /// reference is still included.
    #[must_use]
    pub fn base_type_chain(&self, ty: &TypeSurface) -> Vec<TypeRef> {
        let (resolved, unresolved) = self.walk_bases(ty);
        resolved
            .into_iter()
            .map(|base| base.reference)
            .chain(unresolved)
            .collect()
    }

    /// Resolved base-type definitions of `ty`, most-derived first.
    #[must_use]
    pub fn base_types(&self, ty: &TypeSurface) -> Vec<&'a TypeSurface> {
        self.walk_bases(ty).0.into_iter().map(|base| base.definition).collect()
    }

    /// Resolved bases of `ty` with their generic argument bindings.
    #[must_use]
    pub fn resolved_bases(&self, ty: &TypeSurface) -> Vec<ResolvedBase<'a>> {
        self.walk_bases(ty).0
    }

    /// Every interface `ty` implements, directly, through its bases, or
    /// through other interfaces. Declaration order is preserved.
    #[must_use]
    pub fn all_interfaces(&self, ty: &TypeSurface) -> IndexSet<TypeRef> {
        let mut result = IndexSet::new();
        let mut pending: Vec<TypeRef> = Vec::new();

        pending.extend(ty.interfaces.iter().rev().cloned());
        for base in self.base_types(ty) {
            pending.splice(0..0, base.interfaces.iter().rev().cloned());
        }

        while let Some(interface) = pending.pop() {
            if !result.insert(interface.clone()) {
                continue;
            }
            if let Some(def) = self.resolve(&interface) {
                pending.extend(def.interfaces.iter().rev().cloned());
            }
        }
        result
    }
}

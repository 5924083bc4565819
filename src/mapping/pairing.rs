//! Name-based pairing of two surfaces into mappings.
//!
//! Types pair by comparer key of their full name. Members pair by kind,
//! name, explicit interface, parameter types, generic arity and return or
//! declared type, so a member whose signature changed in any of these ends
//! up one-sided on both ends. Contract entries come first in contract
//! order, then implementation-only entries.
//!
//! Only declarations visible outside their assembly take part. A public
//! member that became internal or private is therefore absent from the
//! implementation.

use super::{ElementMapping, MemberMapping, TypeMapping};
use crate::error::Result;
use crate::model::{ApiSurface, MemberKind, MemberSurface, TypeComparer, TypeSurface};
use indexmap::IndexMap;
use std::borrow::Cow;

/// A type mapping plus the member mappings beneath it.
///
/// One-sided types carry no member mappings: their members are implied
/// by the type-level difference.
#[derive(Debug, Clone)]
pub struct TypePairing<'a> {
    pub mapping: TypeMapping<'a>,
    pub members: Vec<MemberMapping<'a>>,
}

/// Pair every type and member of two surfaces.
pub fn pair_surfaces<'a>(
    implementation: &'a ApiSurface,
    contract: &'a ApiSurface,
    comparer: &dyn TypeComparer,
) -> Result<Vec<TypePairing<'a>>> {
    let implementation_types = keyed(visible_types(implementation), |t| type_key(t, comparer));
    let contract_types = keyed(visible_types(contract), |t| type_key(t, comparer));

    let mut pairings = Vec::with_capacity(contract_types.len() + implementation_types.len());

    for (key, contract_type) in &contract_types {
        let implementation_type = implementation_types.get(key).copied();
        let mapping = ElementMapping::from_sides(implementation_type, Some(*contract_type))?;
        pairings.push(pair_members(mapping, comparer)?);
    }

    for (key, implementation_type) in &implementation_types {
        if !contract_types.contains_key(key) {
            pairings.push(TypePairing {
                mapping: ElementMapping::implementation_only(*implementation_type),
                members: Vec::new(),
            });
        }
    }

    tracing::debug!(
        "Paired {} types ({} contract, {} implementation)",
        pairings.len(),
        contract_types.len(),
        implementation_types.len()
    );

    Ok(pairings)
}

fn pair_members<'a>(
    mapping: TypeMapping<'a>,
    comparer: &dyn TypeComparer,
) -> Result<TypePairing<'a>> {
    let Some((implementation, contract)) = mapping.both() else {
        return Ok(TypePairing {
            mapping,
            members: Vec::new(),
        });
    };

    let implementation_members =
        keyed(visible_members(implementation), |m| member_key(m, comparer));
    let contract_members = keyed(visible_members(contract), |m| member_key(m, comparer));

    let mut members = Vec::with_capacity(contract_members.len());
    for (key, contract_member) in &contract_members {
        let sides = ElementMapping::from_sides(
            implementation_members.get(key).copied(),
            Some(*contract_member),
        )?;
        members.push(MemberMapping::new(sides, mapping));
    }
    for (key, implementation_member) in &implementation_members {
        if !contract_members.contains_key(key) {
            members.push(MemberMapping::new(
                ElementMapping::implementation_only(*implementation_member),
                mapping,
            ));
        }
    }

    Ok(TypePairing { mapping, members })
}

fn visible_types(surface: &ApiSurface) -> impl Iterator<Item = &TypeSurface> {
    surface
        .types
        .iter()
        .filter(|t| t.visibility.is_visible_outside_assembly())
}

fn visible_members(ty: &TypeSurface) -> impl Iterator<Item = &MemberSurface> {
    ty.members
        .iter()
        .filter(|m| m.visibility.is_visible_outside_assembly())
}

/// Key items, keeping the first of any duplicates.
fn keyed<'a, T: 'a>(
    items: impl Iterator<Item = &'a T>,
    key: impl Fn(&T) -> String,
) -> IndexMap<String, &'a T> {
    let mut map = IndexMap::new();
    for item in items {
        let k = key(item);
        if map.contains_key(&k) {
            tracing::warn!("Duplicate declaration '{}' ignored during pairing", k);
            continue;
        }
        map.insert(k, item);
    }
    map
}

fn type_key(ty: &TypeSurface, comparer: &dyn TypeComparer) -> String {
    comparer.key(&ty.type_ref()).into_owned()
}

fn member_key(member: &MemberSurface, comparer: &dyn TypeComparer) -> String {
    let explicit = member
        .explicit_interface
        .as_ref()
        .map(|i| format!("{}.", comparer.key(i)))
        .unwrap_or_default();

    let parameters = match &member.kind {
        MemberKind::Method(sig) | MemberKind::Constructor(sig) => Some(
            sig.parameters
                .iter()
                .map(|p| comparer.key(&p.parameter_type).into_owned())
                .collect::<Vec<_>>(),
        ),
        MemberKind::Property(p) if !p.parameters.is_empty() => Some(
            p.parameters
                .iter()
                .map(|p| comparer.key(&p.parameter_type).into_owned())
                .collect::<Vec<_>>(),
        ),
        MemberKind::Field(_) | MemberKind::Property(_) | MemberKind::Event(_) => None,
    };

    let arity = member.generic_parameters().len();
    let head = format!("{}:{explicit}{}", member.kind.tag(), member.name);
    let head = match parameters {
        Some(types) => format!("{head}`{arity}({})", types.join(",")),
        None => head,
    };

    match &member.kind {
        MemberKind::Method(sig) => {
            let return_type = sig
                .return_type
                .as_ref()
                .map_or(Cow::Borrowed("System.Void"), |t| comparer.key(t));
            format!("{head}->{return_type}")
        }
        MemberKind::Constructor(_) => head,
        MemberKind::Field(_) | MemberKind::Property(_) | MemberKind::Event(_) => {
            match member.declared_type() {
                Some(declared) => format!("{head}:{}", comparer.key(declared)),
                None => head,
            }
        }
    }
}

//! Type-level surfaces: type references, generic parameters, attributes.

use super::{MemberKind, MemberSurface, Visibility};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Marker attribute the C# compiler emits on `readonly struct` declarations.
pub const IS_READ_ONLY_ATTRIBUTE: &str = "System.Runtime.CompilerServices.IsReadOnlyAttribute";

/// Marker attribute the C# compiler emits on `ref struct` declarations.
pub const IS_BY_REF_LIKE_ATTRIBUTE: &str = "System.Runtime.CompilerServices.IsByRefLikeAttribute";

/// The synthetic constraint implied by a `struct` constraint.
pub const SYSTEM_VALUE_TYPE: &str = "System.ValueType";

/// Generic parameter name to the type argument bound to it.
pub type TypeArguments = HashMap<String, String>;

/// A reference to a type by its display name, e.g. `System.Int32` or
/// `System.Collections.Generic.List<T>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(String);

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// The name with any generic argument list removed.
    #[must_use]
    pub fn definition_name(&self) -> &str {
        self.0.find('<').map_or(self.0.as_str(), |idx| &self.0[..idx])
    }

    /// Number of top-level generic arguments (`0` for non-generic references).
    #[must_use]
    pub fn generic_arity(&self) -> usize {
        let Some(start) = self.0.find('<') else {
            return 0;
        };

        let mut depth = 0usize;
        let mut arity = 1;
        for ch in self.0[start..].chars() {
            match ch {
                '<' => depth += 1,
                '>' => depth = depth.saturating_sub(1),
                ',' if depth == 1 => arity += 1,
                _ => {}
            }
        }
        arity
    }

    /// Top-level generic arguments, e.g. `["TKey", "Ns.List<TValue>"]`.
    #[must_use]
    pub fn generic_arguments(&self) -> Vec<&str> {
        let Some(start) = self.0.find('<') else {
            return Vec::new();
        };

        let mut arguments = Vec::new();
        let mut depth = 0usize;
        let mut from = start + 1;
        for (idx, ch) in self.0.char_indices().skip_while(|(i, _)| *i < start) {
            match ch {
                '<' => depth += 1,
                '>' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        arguments.push(self.0[from..idx].trim());
                        break;
                    }
                }
                ',' if depth == 1 => {
                    arguments.push(self.0[from..idx].trim());
                    from = idx + 1;
                }
                _ => {}
            }
        }
        arguments
    }

    /// Replace generic parameter names with their bound arguments.
    ///
    /// Only whole names are replaced: with `T` bound, `T[]` and
    /// `Ns.List<T>` change but `Ns.TValue` does not.
    #[must_use]
    pub fn substitute(&self, arguments: &TypeArguments) -> Self {
        if arguments.is_empty() {
            return self.clone();
        }

        let mut out = String::with_capacity(self.0.len());
        let mut token = String::new();
        let flush = |out: &mut String, token: &mut String| {
            match arguments.get(token.as_str()) {
                Some(argument) => out.push_str(argument),
                None => out.push_str(token),
            }
            token.clear();
        };
        for ch in self.0.chars() {
            if ch.is_alphanumeric() || matches!(ch, '_' | '.' | '`') {
                token.push(ch);
            } else {
                flush(&mut out, &mut token);
                out.push(ch);
            }
        }
        flush(&mut out, &mut token);
        Self(out)
    }

    /// Key used to resolve a constructed reference against a definition,
    /// e.g. `Ns.List<System.Int32>` and `Ns.List<T>` both map to ``Ns.List`1``.
    #[must_use]
    pub fn definition_key(&self) -> String {
        match self.generic_arity() {
            0 => self.definition_name().to_string(),
            n => format!("{}`{n}", self.definition_name()),
        }
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Metadata shape of a type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Delegate,
    Enum,
    /// The metadata reader could not determine the shape.
    Unresolved,
}

impl TypeKind {
    #[must_use]
    pub const fn is_value_type(&self) -> bool {
        matches!(self, Self::Struct | Self::Enum)
    }
}

/// Variance annotation of a generic parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variance {
    #[default]
    None,
    Covariant,
    Contravariant,
}

impl std::fmt::Display for Variance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "NonVariant"),
            Self::Covariant => write!(f, "Covariant"),
            Self::Contravariant => write!(f, "Contravariant"),
        }
    }
}

/// A custom attribute applied to a type, member, parameter or generic parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeSurface {
    pub attribute_type: TypeRef,
    /// Constructor and named arguments, already formatted by the reader.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
}

impl AttributeSurface {
    pub fn new(attribute_type: impl Into<TypeRef>) -> Self {
        Self {
            attribute_type: attribute_type.into(),
            arguments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    /// Comparison key: type plus argument list.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}({})", self.attribute_type, self.arguments.join(", "))
    }
}

/// A generic parameter of a type or method. Parameters are positional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericParameterSurface {
    pub name: String,
    #[serde(default)]
    pub variance: Variance,
    #[serde(default)]
    pub must_be_value_type: bool,
    #[serde(default)]
    pub must_be_reference_type: bool,
    #[serde(default)]
    pub must_have_default_constructor: bool,
    /// Explicit constraint types in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeSurface>,
}

impl GenericParameterSurface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variance: Variance::None,
            must_be_value_type: false,
            must_be_reference_type: false,
            must_have_default_constructor: false,
            constraints: Vec::new(),
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_variance(mut self, variance: Variance) -> Self {
        self.variance = variance;
        self
    }

    #[must_use]
    pub const fn value_type(mut self) -> Self {
        self.must_be_value_type = true;
        self
    }

    #[must_use]
    pub const fn reference_type(mut self) -> Self {
        self.must_be_reference_type = true;
        self
    }

    #[must_use]
    pub const fn default_constructor(mut self) -> Self {
        self.must_have_default_constructor = true;
        self
    }

    #[must_use]
    pub fn with_constraint(mut self, constraint: impl Into<TypeRef>) -> Self {
        self.constraints.push(constraint.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: AttributeSurface) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// One type as seen from one side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSurface {
    /// Namespace-qualified name, e.g. `System.Collections.Generic.List<T>`.
    pub full_name: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_sealed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generic_parameters: Vec<GenericParameterSurface>,
    /// Immediate base type; the full chain is resolved through a
    /// [`SurfaceIndex`](super::SurfaceIndex).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<TypeRef>,
    /// Directly declared interfaces.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<MemberSurface>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeSurface>,
    /// Underlying integral type for enums.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_underlying_type: Option<TypeRef>,
}

impl TypeSurface {
    /// Create a public type with no members.
    pub fn new(full_name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            full_name: full_name.into(),
            kind,
            visibility: Visibility::Public,
            is_abstract: kind == TypeKind::Interface,
            is_sealed: false,
            generic_parameters: Vec::new(),
            base_type: None,
            interfaces: Vec::new(),
            members: Vec::new(),
            attributes: Vec::new(),
            enum_underlying_type: None,
        }
    }

    pub fn class(full_name: impl Into<String>) -> Self {
        Self::new(full_name, TypeKind::Class)
    }

    pub fn interface(full_name: impl Into<String>) -> Self {
        Self::new(full_name, TypeKind::Interface)
    }

    pub fn structure(full_name: impl Into<String>) -> Self {
        Self::new(full_name, TypeKind::Struct).with_base_type(SYSTEM_VALUE_TYPE)
    }

    pub fn enumeration(full_name: impl Into<String>, underlying: impl Into<TypeRef>) -> Self {
        let mut ty = Self::new(full_name, TypeKind::Enum).with_base_type("System.Enum");
        ty.is_sealed = true;
        ty.enum_underlying_type = Some(underlying.into());
        ty
    }

    pub fn delegate(full_name: impl Into<String>) -> Self {
        let mut ty =
            Self::new(full_name, TypeKind::Delegate).with_base_type("System.MulticastDelegate");
        ty.is_sealed = true;
        ty
    }

    #[must_use]
    pub const fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub const fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    #[must_use]
    pub const fn with_sealed(mut self, is_sealed: bool) -> Self {
        self.is_sealed = is_sealed;
        self
    }

    #[must_use]
    pub fn with_base_type(mut self, base: impl Into<TypeRef>) -> Self {
        self.base_type = Some(base.into());
        self
    }

    #[must_use]
    pub fn with_interface(mut self, interface: impl Into<TypeRef>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    #[must_use]
    pub fn with_generic_parameter(mut self, parameter: GenericParameterSurface) -> Self {
        self.generic_parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn with_member(mut self, member: MemberSurface) -> Self {
        self.members.push(member);
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: AttributeSurface) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Names of the type's own generic parameters, from the declared
    /// parameters or else from the argument list of the full name.
    #[must_use]
    pub fn generic_parameter_names(&self) -> Vec<String> {
        if self.is_generic() {
            return self.generic_parameters.iter().map(|g| g.name.clone()).collect();
        }
        self.type_ref()
            .generic_arguments()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// This type as a reference.
    #[must_use]
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::new(self.full_name.clone())
    }

    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    #[must_use]
    pub fn is_delegate(&self) -> bool {
        self.kind == TypeKind::Delegate
    }

    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.generic_parameters.is_empty()
    }

    #[must_use]
    pub fn has_attribute(&self, attribute_type: &str) -> bool {
        self.attributes
            .iter()
            .any(|a| a.attribute_type.name() == attribute_type)
    }

    /// `readonly struct`.
    #[must_use]
    pub fn is_readonly(&self) -> bool {
        self.has_attribute(IS_READ_ONLY_ATTRIBUTE)
    }

    /// `ref struct`.
    #[must_use]
    pub fn is_by_ref_like(&self) -> bool {
        self.has_attribute(IS_BY_REF_LIKE_ATTRIBUTE)
    }

    /// Instance constructors declared on this type.
    pub fn instance_constructors(&self) -> impl Iterator<Item = &MemberSurface> {
        self.members
            .iter()
            .filter(|m| matches!(m.kind, MemberKind::Constructor(_)) && !m.is_static())
    }

    /// Whether nobody outside the assembly can derive from this type.
    ///
    /// A class counts as sealed when it is marked sealed or has no instance
    /// constructor reachable from outside the assembly.
    #[must_use]
    pub fn is_effectively_sealed(&self) -> bool {
        match self.kind {
            TypeKind::Interface => false,
            TypeKind::Struct | TypeKind::Enum | TypeKind::Delegate => true,
            TypeKind::Class | TypeKind::Unresolved => {
                self.is_sealed
                    || !self
                        .instance_constructors()
                        .any(|c| c.visibility.is_visible_outside_assembly())
            }
        }
    }

    /// Methods named `name`.
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MemberSurface> {
        self.members
            .iter()
            .filter(move |m| m.name == name && matches!(m.kind, MemberKind::Method(_)))
    }

    /// The `Invoke` method that carries a delegate's signature.
    #[must_use]
    pub fn delegate_invoke(&self) -> Option<&MemberSurface> {
        if !self.is_delegate() {
            return None;
        }
        self.methods_named("Invoke").next()
    }
}

impl std::fmt::Display for TypeSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_name)
    }
}

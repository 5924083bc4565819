//! Member-level surfaces.
//!
//! Member shape is a closed tagged union ([`MemberKind`]) so rules match
//! exhaustively on it instead of probing the runtime type.

use super::{AttributeSurface, GenericParameterSurface, TypeRef, TypeSurface, Visibility};
use serde::{Deserialize, Serialize};

/// Modifiers shared by methods, constructors and accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberModifiers {
    pub is_abstract: bool,
    pub is_virtual: bool,
    /// `sealed override`: virtual but not further overridable.
    pub is_final: bool,
    pub is_static: bool,
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSurface {
    pub name: String,
    #[serde(rename = "type")]
    pub parameter_type: TypeRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeSurface>,
}

impl ParameterSurface {
    pub fn new(name: impl Into<String>, parameter_type: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            parameter_type: parameter_type.into(),
            attributes: Vec::new(),
        }
    }
}

/// Signature shared by methods and constructors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MethodSignature {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterSurface>,
    /// `None` for `void` and constructors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generic_parameters: Vec<GenericParameterSurface>,
}

impl MethodSignature {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn returning(return_type: impl Into<TypeRef>) -> Self {
        Self {
            return_type: Some(return_type.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_parameter(
        mut self,
        name: impl Into<String>,
        parameter_type: impl Into<TypeRef>,
    ) -> Self {
        self.parameters.push(ParameterSurface::new(name, parameter_type));
        self
    }

    #[must_use]
    pub fn with_generic_parameter(mut self, parameter: GenericParameterSurface) -> Self {
        self.generic_parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.generic_parameters.is_empty()
    }

    /// `(T1, T2)` as shown in messages.
    #[must_use]
    pub fn parameter_list(&self) -> String {
        let types: Vec<&str> = self
            .parameters
            .iter()
            .map(|p| p.parameter_type.name())
            .collect();
        format!("({})", types.join(", "))
    }
}

/// A literal constant value. Reads as signed whenever it fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstantValue {
    Signed(i64),
    Unsigned(u64),
}

impl ConstantValue {
    /// Widened value for comparisons across representations.
    #[must_use]
    pub fn as_i128(&self) -> i128 {
        match *self {
            Self::Signed(v) => i128::from(v),
            Self::Unsigned(v) => i128::from(v),
        }
    }
}

impl PartialEq<i64> for ConstantValue {
    fn eq(&self, other: &i64) -> bool {
        self.as_i128() == i128::from(*other)
    }
}

impl std::fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Signed(v) => write!(f, "{v}"),
            Self::Unsigned(v) => write!(f, "{v}"),
        }
    }
}

/// A field; enum members carry their constant value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSurface {
    #[serde(rename = "type")]
    pub field_type: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<ConstantValue>,
}

/// Getter, setter, adder or remover of a property or event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessorSurface {
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub modifiers: MemberModifiers,
}

impl AccessorSurface {
    #[must_use]
    pub fn new(modifiers: MemberModifiers) -> Self {
        Self {
            visibility: Visibility::Public,
            modifiers,
        }
    }
}

/// Role of an accessor method of a property or event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Get,
    Set,
    Add,
    Remove,
}

impl AccessorKind {
    /// Metadata name prefix, e.g. `get_`.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Get => "get_",
            Self::Set => "set_",
            Self::Add => "add_",
            Self::Remove => "remove_",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySurface {
    #[serde(rename = "type")]
    pub property_type: TypeRef,
    /// Indexer parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterSurface>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub getter: Option<AccessorSurface>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setter: Option<AccessorSurface>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSurface {
    #[serde(rename = "type")]
    pub event_type: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adder: Option<AccessorSurface>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remover: Option<AccessorSurface>,
}

/// Kind-specific payload of a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemberKind {
    Method(MethodSignature),
    Constructor(MethodSignature),
    Field(FieldSurface),
    Property(PropertySurface),
    Event(EventSurface),
}

impl MemberKind {
    /// Short tag used in pairing keys and logs.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Method(_) => "method",
            Self::Constructor(_) => "constructor",
            Self::Field(_) => "field",
            Self::Property(_) => "property",
            Self::Event(_) => "event",
        }
    }
}

/// One member as seen from one side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSurface {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub modifiers: MemberModifiers,
    #[serde(flatten)]
    pub kind: MemberKind,
    /// Interface this member explicitly implements, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_interface: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeSurface>,
}

impl MemberSurface {
    pub fn new(name: impl Into<String>, kind: MemberKind) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            modifiers: MemberModifiers::default(),
            kind,
            explicit_interface: None,
            attributes: Vec::new(),
        }
    }

    pub fn method(name: impl Into<String>, signature: MethodSignature) -> Self {
        Self::new(name, MemberKind::Method(signature))
    }

    /// A public parameterless instance constructor.
    #[must_use]
    pub fn constructor() -> Self {
        Self::new(".ctor", MemberKind::Constructor(MethodSignature::new()))
    }

    pub fn constructor_with(signature: MethodSignature) -> Self {
        Self::new(".ctor", MemberKind::Constructor(signature))
    }

    pub fn field(name: impl Into<String>, field_type: impl Into<TypeRef>) -> Self {
        Self::new(
            name,
            MemberKind::Field(FieldSurface {
                field_type: field_type.into(),
                constant: None,
            }),
        )
    }

    /// A `public const` field of an enum.
    pub fn enum_value(name: impl Into<String>, enum_type: impl Into<TypeRef>, value: i64) -> Self {
        let mut member = Self::new(
            name,
            MemberKind::Field(FieldSurface {
                field_type: enum_type.into(),
                constant: Some(ConstantValue::Signed(value)),
            }),
        );
        member.modifiers.is_static = true;
        member
    }

    /// A property with the given accessors.
    pub fn property(
        name: impl Into<String>,
        property_type: impl Into<TypeRef>,
        getter: Option<AccessorSurface>,
        setter: Option<AccessorSurface>,
    ) -> Self {
        Self::new(
            name,
            MemberKind::Property(PropertySurface {
                property_type: property_type.into(),
                parameters: Vec::new(),
                getter,
                setter,
            }),
        )
    }

    pub fn event(
        name: impl Into<String>,
        event_type: impl Into<TypeRef>,
        adder: Option<AccessorSurface>,
        remover: Option<AccessorSurface>,
    ) -> Self {
        Self::new(
            name,
            MemberKind::Event(EventSurface {
                event_type: event_type.into(),
                adder,
                remover,
            }),
        )
    }

    #[must_use]
    pub const fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub const fn with_virtual(mut self) -> Self {
        self.modifiers.is_virtual = true;
        self
    }

    #[must_use]
    pub const fn with_abstract(mut self) -> Self {
        self.modifiers.is_abstract = true;
        self.modifiers.is_virtual = true;
        self
    }

    #[must_use]
    pub const fn with_final(mut self) -> Self {
        self.modifiers.is_final = true;
        self
    }

    #[must_use]
    pub const fn with_static(mut self) -> Self {
        self.modifiers.is_static = true;
        self
    }

    #[must_use]
    pub fn with_explicit_interface(mut self, interface: impl Into<TypeRef>) -> Self {
        self.explicit_interface = Some(interface.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: AttributeSurface) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Accessors of a property or event (empty for other kinds).
    #[must_use]
    pub fn accessors(&self) -> Vec<&AccessorSurface> {
        match &self.kind {
            MemberKind::Property(p) => p.getter.iter().chain(p.setter.iter()).collect(),
            MemberKind::Event(e) => e.adder.iter().chain(e.remover.iter()).collect(),
            MemberKind::Method(_) | MemberKind::Constructor(_) | MemberKind::Field(_) => Vec::new(),
        }
    }

    /// Every accessor slot of a property or event, filled or not.
    #[must_use]
    pub fn accessor_slots(&self) -> Vec<(AccessorKind, Option<&AccessorSurface>)> {
        match &self.kind {
            MemberKind::Property(p) => vec![
                (AccessorKind::Get, p.getter.as_ref()),
                (AccessorKind::Set, p.setter.as_ref()),
            ],
            MemberKind::Event(e) => vec![
                (AccessorKind::Add, e.adder.as_ref()),
                (AccessorKind::Remove, e.remover.as_ref()),
            ],
            MemberKind::Method(_) | MemberKind::Constructor(_) | MemberKind::Field(_) => Vec::new(),
        }
    }

    /// Signature of the accessor method behind `kind`, e.g.
    /// `set_Item(System.Int32, System.String)` for an indexer setter.
    #[must_use]
    pub fn accessor_signature(&self, kind: AccessorKind) -> String {
        let mut parameters: Vec<&str> = self
            .indexer_parameters()
            .iter()
            .map(|p| p.parameter_type.name())
            .collect();
        let value_type = self.declared_type().map(TypeRef::name);
        match kind {
            AccessorKind::Get => {}
            AccessorKind::Set => parameters.extend(value_type),
            AccessorKind::Add | AccessorKind::Remove => {
                parameters = value_type.into_iter().collect();
            }
        }
        format!("{}{}({})", kind.prefix(), self.name, parameters.join(", "))
    }

    /// Type of a field, property or event.
    #[must_use]
    pub fn declared_type(&self) -> Option<&TypeRef> {
        match &self.kind {
            MemberKind::Field(f) => Some(&f.field_type),
            MemberKind::Property(p) => Some(&p.property_type),
            MemberKind::Event(e) => Some(&e.event_type),
            MemberKind::Method(_) | MemberKind::Constructor(_) => None,
        }
    }

    /// Index parameters of an indexer (empty for everything else).
    #[must_use]
    pub fn indexer_parameters(&self) -> &[ParameterSurface] {
        match &self.kind {
            MemberKind::Property(p) => p.parameters.as_slice(),
            MemberKind::Method(_)
            | MemberKind::Constructor(_)
            | MemberKind::Field(_)
            | MemberKind::Event(_) => &[],
        }
    }

    /// Abstract, looking through accessors for properties and events.
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        match &self.kind {
            MemberKind::Property(_) | MemberKind::Event(_) => {
                self.accessors().iter().any(|a| a.modifiers.is_abstract)
            }
            MemberKind::Method(_) | MemberKind::Constructor(_) | MemberKind::Field(_) => {
                self.modifiers.is_abstract
            }
        }
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        match &self.kind {
            MemberKind::Property(_) | MemberKind::Event(_) => {
                self.accessors().iter().any(|a| a.modifiers.is_static)
            }
            MemberKind::Method(_) | MemberKind::Constructor(_) | MemberKind::Field(_) => {
                self.modifiers.is_static
            }
        }
    }

    #[must_use]
    pub fn is_constructor(&self) -> bool {
        matches!(self.kind, MemberKind::Constructor(_))
    }

    #[must_use]
    pub fn is_explicit_interface_implementation(&self) -> bool {
        self.explicit_interface.is_some()
    }

    /// Signature of a method or constructor.
    #[must_use]
    pub fn signature(&self) -> Option<&MethodSignature> {
        match &self.kind {
            MemberKind::Method(sig) | MemberKind::Constructor(sig) => Some(sig),
            MemberKind::Field(_) | MemberKind::Property(_) | MemberKind::Event(_) => None,
        }
    }

    #[must_use]
    pub fn generic_parameters(&self) -> &[GenericParameterSurface] {
        self.signature()
            .map_or(&[], |sig| sig.generic_parameters.as_slice())
    }

    /// Name plus generic arity and parameter list where applicable,
    /// e.g. `Convert<T>(System.Int32)` or `Item[System.String]`.
    #[must_use]
    pub fn display_signature(&self) -> String {
        match &self.kind {
            MemberKind::Method(sig) | MemberKind::Constructor(sig) => {
                let generics = if sig.is_generic() {
                    let names: Vec<&str> =
                        sig.generic_parameters.iter().map(|g| g.name.as_str()).collect();
                    format!("<{}>", names.join(", "))
                } else {
                    String::new()
                };
                format!("{}{}{}", self.name, generics, sig.parameter_list())
            }
            MemberKind::Property(p) if !p.parameters.is_empty() => {
                let types: Vec<&str> =
                    p.parameters.iter().map(|p| p.parameter_type.name()).collect();
                format!("{}[{}]", self.name, types.join(", "))
            }
            MemberKind::Field(_) | MemberKind::Property(_) | MemberKind::Event(_) => {
                self.name.clone()
            }
        }
    }

    /// `Declaring.Type.Signature(...)` as shown in messages.
    #[must_use]
    pub fn full_name(&self, declaring: &TypeSurface) -> String {
        format!("{}.{}", declaring.full_name, self.display_signature())
    }
}

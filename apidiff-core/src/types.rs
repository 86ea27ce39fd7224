//! Data models for a library's metadata graph.
//!
//! These types describe the declared surface of one compiled module:
//! its types, their members, signatures, generic constraints and enum
//! values. A loader builds one graph per module; everything downstream
//! treats it as immutable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Accessibility of a type or member, ordered from least to most visible.
///
/// The two combined levels are distinct from plain protected and internal.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Private,
    /// Visible within the declaring module only.
    #[default]
    Internal,
    /// Visible to subclasses inside the declaring module.
    ProtectedAndInternal,
    Protected,
    /// Visible to subclasses anywhere and to the declaring module.
    ProtectedOrInternal,
    Public,
}

impl Visibility {
    pub fn is_public(&self) -> bool {
        matches!(self, Visibility::Public)
    }
}

/// Which declaration owns a generic parameter.
///
/// Type-level and method-level parameters form disjoint namespaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenericOwner {
    Type,
    Method,
}

/// A reference to a type, as it appears in a signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    /// A named type, e.g. `System.String`.
    Named {
        full_name: String,
        /// Module that declares the type. Only used for equality.
        #[serde(default)]
        scope: String,
    },
    /// A constructed generic type, e.g. `List<T>`.
    GenericInstance {
        definition: Box<TypeRef>,
        #[serde(default)]
        arguments: Vec<TypeRef>,
    },
    /// A generic parameter, referenced by position within its owner.
    GenericParameter {
        owner: GenericOwner,
        position: u32,
        #[serde(default)]
        name: String,
    },
}

impl TypeRef {
    pub fn named(full_name: impl Into<String>, scope: impl Into<String>) -> Self {
        TypeRef::Named {
            full_name: full_name.into(),
            scope: scope.into(),
        }
    }

    pub fn generic_instance(definition: TypeRef, arguments: Vec<TypeRef>) -> Self {
        TypeRef::GenericInstance {
            definition: Box::new(definition),
            arguments,
        }
    }

    /// Reference to the type-level generic parameter at `position`.
    pub fn type_parameter(position: u32, name: impl Into<String>) -> Self {
        TypeRef::GenericParameter {
            owner: GenericOwner::Type,
            position,
            name: name.into(),
        }
    }

    /// Reference to the method-level generic parameter at `position`.
    pub fn method_parameter(position: u32, name: impl Into<String>) -> Self {
        TypeRef::GenericParameter {
            owner: GenericOwner::Method,
            position,
            name: name.into(),
        }
    }

    pub fn is_generic_parameter(&self) -> bool {
        matches!(self, TypeRef::GenericParameter { .. })
    }

    /// Name of the declaring module; generic parameters have none.
    pub fn scope(&self) -> &str {
        match self {
            TypeRef::Named { scope, .. } => scope,
            TypeRef::GenericInstance { definition, .. } => definition.scope(),
            TypeRef::GenericParameter { .. } => "",
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named { full_name, .. } => f.write_str(full_name),
            TypeRef::GenericInstance {
                definition,
                arguments,
            } => {
                write!(f, "{}<", definition)?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", argument)?;
                }
                f.write_str(">")
            }
            TypeRef::GenericParameter { name, .. } => f.write_str(name),
        }
    }
}

/// A compile-time constant: enum values, field literals, parameter defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Constant {
    Bool(bool),
    Int(i64),
    UInt(u64),
    /// Non-finite values are written as `{"float": "NaN"}` (or `"Infinity"`,
    /// `"-Infinity"`); JSON numbers cannot hold them.
    Float(#[serde(with = "float_repr")] f64),
    String(String),
}

mod float_repr {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    enum NonFinite {
        NaN,
        Infinity,
        #[serde(rename = "-Infinity")]
        NegInfinity,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Finite(f64),
        NonFinite { float: NonFinite },
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = if value.is_nan() {
            Repr::NonFinite {
                float: NonFinite::NaN,
            }
        } else if value.is_infinite() && value.is_sign_positive() {
            Repr::NonFinite {
                float: NonFinite::Infinity,
            }
        } else if value.is_infinite() {
            Repr::NonFinite {
                float: NonFinite::NegInfinity,
            }
        } else {
            Repr::Finite(*value)
        };
        repr.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Finite(value) => value,
            Repr::NonFinite { float } => match float {
                NonFinite::NaN => f64::NAN,
                NonFinite::Infinity => f64::INFINITY,
                NonFinite::NegInfinity => f64::NEG_INFINITY,
            },
        })
    }
}

// Floats compare by bit pattern; any two NaNs are equal so a NaN literal
// equals itself whatever its payload.
impl PartialEq for Constant {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Constant::Bool(a), Constant::Bool(b)) => a == b,
            (Constant::Int(a), Constant::Int(b)) => a == b,
            (Constant::UInt(a), Constant::UInt(b)) => a == b,
            (Constant::Float(a), Constant::Float(b)) => {
                a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
            }
            (Constant::String(a), Constant::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Constant {}

/// Kind and modifier flags of a type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeFlags {
    pub is_interface: bool,
    pub is_enum: bool,
    pub is_value_type: bool,
    pub is_abstract: bool,
    pub is_sealed: bool,
    pub visibility: Visibility,
}

/// Modifier flags of a method.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodFlags {
    pub is_abstract: bool,
    pub is_virtual: bool,
    /// Sealed override.
    pub is_final: bool,
    pub is_static: bool,
    pub visibility: Visibility,
}

/// Parameter attribute flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterAttributes {
    pub is_in: bool,
    /// By-ref output parameter.
    pub is_out: bool,
    pub is_optional: bool,
    pub has_default: bool,
}

impl ParameterAttributes {
    /// The attributes with the optional/has-default pair masked out.
    pub fn without_default(self) -> Self {
        Self {
            is_optional: false,
            has_default: false,
            ..self
        }
    }
}

/// A method or property parameter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterDef {
    pub name: String,
    pub parameter_type: TypeRef,
    #[serde(default)]
    pub attributes: ParameterAttributes,
    /// Marks the start of the variadic part of a signature.
    #[serde(default)]
    pub is_sentinel: bool,
    #[serde(default)]
    pub default_value: Option<Constant>,
}

impl ParameterDef {
    pub fn new(name: impl Into<String>, parameter_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            parameter_type,
            attributes: ParameterAttributes::default(),
            is_sentinel: false,
            default_value: None,
        }
    }

    /// Make this an optional parameter with the given default.
    pub fn with_default(mut self, value: Option<Constant>) -> Self {
        self.attributes.is_optional = true;
        self.attributes.has_default = true;
        self.default_value = value;
        self
    }

    pub fn has_default(&self) -> bool {
        self.attributes.has_default
    }
}

/// A generic parameter of a type or method.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenericParameterDef {
    pub position: u32,
    pub owner: GenericOwner,
    pub name: String,
    #[serde(default)]
    pub requires_default_constructor: bool,
    #[serde(default)]
    pub requires_value_type: bool,
    #[serde(default)]
    pub requires_reference_type: bool,
    /// Base type and interface constraints.
    #[serde(default)]
    pub constraints: Vec<TypeRef>,
}

impl GenericParameterDef {
    pub fn new(position: u32, owner: GenericOwner, name: impl Into<String>) -> Self {
        Self {
            position,
            owner,
            name: name.into(),
            requires_default_constructor: false,
            requires_value_type: false,
            requires_reference_type: false,
            constraints: vec![],
        }
    }

    pub fn has_constraints(&self) -> bool {
        !self.constraints.is_empty()
    }
}

/// Method body, as far as comparison cares.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MethodBody {
    Code { size: u32 },
    /// Replaced by a stub that always throws.
    Unreachable,
}

/// A method definition, including constructors and property accessors.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterDef>,
    #[serde(default)]
    pub generic_parameters: Vec<GenericParameterDef>,
    pub return_type: TypeRef,
    #[serde(default)]
    pub flags: MethodFlags,
    #[serde(default)]
    pub is_getter: bool,
    #[serde(default)]
    pub is_setter: bool,
    #[serde(default)]
    pub body: Option<MethodBody>,
}

impl MethodDef {
    pub fn new(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            parameters: vec![],
            generic_parameters: vec![],
            return_type,
            flags: MethodFlags::default(),
            is_getter: false,
            is_setter: false,
            body: None,
        }
    }

    pub fn is_property_accessor(&self) -> bool {
        self.is_getter || self.is_setter
    }
}

/// A property; indexers carry a non-empty parameter list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterDef>,
    pub property_type: TypeRef,
    #[serde(default)]
    pub getter: Option<MethodDef>,
    #[serde(default)]
    pub setter: Option<MethodDef>,
}

/// A field; enum members carry their value in `constant`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub field_type: TypeRef,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub constant: Option<Constant>,
}

/// A type definition with its members and nested types.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TypeDef {
    /// Namespace-qualified name; nested types use `Outer/Inner`.
    pub full_name: String,
    #[serde(default)]
    pub flags: TypeFlags,
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    #[serde(default)]
    pub generic_parameters: Vec<GenericParameterDef>,
    #[serde(default)]
    pub methods: Vec<MethodDef>,
    #[serde(default)]
    pub properties: Vec<PropertyDef>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub nested_types: Vec<TypeDef>,
}

impl TypeDef {
    pub fn new(full_name: impl Into<String>, flags: TypeFlags) -> Self {
        Self {
            full_name: full_name.into(),
            flags,
            ..Default::default()
        }
    }

    pub fn is_nested(&self) -> bool {
        self.full_name.contains('/')
    }

    /// Find a type declared directly in this one by full name.
    pub fn nested_type(&self, full_name: &str) -> Option<&TypeDef> {
        self.nested_types.iter().find(|t| t.full_name == full_name)
    }
}

/// A compiled module, identified by name.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    /// Modules granted access to this module's internals.
    #[serde(default)]
    pub internals_visible_to: Vec<String>,
    #[serde(default)]
    pub types: Vec<TypeDef>,
}

impl Module {
    pub fn new(name: impl Into<String>, types: Vec<TypeDef>) -> Self {
        Self {
            name: name.into(),
            internals_visible_to: vec![],
            types,
        }
    }

    /// Total number of types, nested ones included.
    pub fn type_count(&self) -> usize {
        fn count(types: &[TypeDef]) -> usize {
            types.iter().map(|t| 1 + count(&t.nested_types)).sum()
        }
        count(&self.types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_ordering() {
        assert!(Visibility::Private < Visibility::Internal);
        assert!(Visibility::Internal < Visibility::ProtectedAndInternal);
        assert!(Visibility::ProtectedAndInternal < Visibility::Protected);
        assert!(Visibility::Protected < Visibility::ProtectedOrInternal);
        assert!(Visibility::ProtectedOrInternal < Visibility::Public);
    }

    #[test]
    fn test_type_ref_display() {
        let list = TypeRef::generic_instance(
            TypeRef::named("System.Collections.Generic.List`1", "mscorlib"),
            vec![TypeRef::type_parameter(0, "T")],
        );
        assert_eq!(list.to_string(), "System.Collections.Generic.List`1<T>");
        assert_eq!(list.scope(), "mscorlib");
    }

    #[test]
    fn test_parameter_attributes_without_default() {
        let param = ParameterDef::new("x", TypeRef::named("System.Int32", "mscorlib"))
            .with_default(Some(Constant::Int(3)));
        assert!(param.has_default());
        assert_eq!(
            param.attributes.without_default(),
            ParameterAttributes::default()
        );
    }

    #[test]
    fn test_type_count_includes_nested() {
        let mut outer = TypeDef::new("Lib.Outer", TypeFlags::default());
        outer
            .nested_types
            .push(TypeDef::new("Lib.Outer/Inner", TypeFlags::default()));
        let module = Module::new("Lib", vec![outer, TypeDef::default()]);
        assert_eq!(module.type_count(), 3);
        assert!(module.types[0].nested_types[0].is_nested());
    }

    #[test]
    fn test_module_deserialization_defaults() {
        let json = r#"{
            "name": "Lib",
            "types": [{
                "full_name": "Lib.Widget",
                "flags": { "visibility": "public", "is_sealed": true },
                "fields": [{
                    "name": "Count",
                    "field_type": { "kind": "named", "full_name": "System.Int32" },
                    "constant": 4
                }]
            }]
        }"#;
        let module: Module = serde_json::from_str(json).unwrap();
        let widget = &module.types[0];
        assert!(widget.flags.is_sealed);
        assert_eq!(widget.flags.visibility, Visibility::Public);
        assert_eq!(widget.fields[0].constant, Some(Constant::Int(4)));
        assert_eq!(widget.fields[0].visibility, Visibility::Internal);
        assert!(module.internals_visible_to.is_empty());
    }

    #[test]
    fn test_non_finite_float_json() {
        let json = serde_json::to_string(&Constant::Float(f64::NEG_INFINITY)).unwrap();
        assert_eq!(json, r#"{"float":"-Infinity"}"#);

        let nan: Constant = serde_json::from_str(r#"{"float":"NaN"}"#).unwrap();
        assert_eq!(nan, Constant::Float(f64::NAN));

        let text: Constant = serde_json::from_str(r#""NaN""#).unwrap();
        assert_eq!(text, Constant::String("NaN".to_string()));
        assert_eq!(serde_json::to_string(&Constant::Float(2.5)).unwrap(), "2.5");
    }
}

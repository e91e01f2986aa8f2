//! Resolved Go type model.
//!
//! Every field type handed to the code generator is one of the closed set of
//! [`GoType`] variants below. Named types carry their home package and, when
//! it is known, their underlying type so that callers can classify them
//! without further lookups.

use serde::{Deserialize, Serialize};

/// A resolved Go type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoType {
    /// Predeclared basic type (`int`, `string`, ...).
    Basic(BasicKind),
    /// Defined (named) type, possibly instantiated.
    Named(NamedType),
    /// Type parameter of a generic declaration.
    TypeParam(String),
    /// Pointer type.
    Pointer(Box<GoType>),
    /// Array type with its length expression as written.
    Array {
        /// Length expression.
        len: String,
        /// Element type.
        elem: Box<GoType>,
    },
    /// Slice type.
    Slice(Box<GoType>),
    /// Map type.
    Map {
        /// Key type.
        key: Box<GoType>,
        /// Value type.
        value: Box<GoType>,
    },
    /// Channel type.
    Chan {
        /// Channel direction.
        dir: ChanDir,
        /// Element type.
        elem: Box<GoType>,
    },
    /// Function type.
    Func(Signature),
    /// Interface literal.
    Interface(InterfaceType),
    /// Struct literal.
    Struct(StructType),
}

impl GoType {
    /// Returns the named type if this is one.
    #[must_use]
    pub fn as_named(&self) -> Option<&NamedType> {
        match self {
            Self::Named(named) => Some(named),
            _ => None,
        }
    }

    /// Calls `visit` for every package referenced anywhere in the type.
    pub fn visit_packages<'a>(&'a self, visit: &mut dyn FnMut(&'a PackageRef)) {
        match self {
            Self::Basic(_) | Self::TypeParam(_) => {}
            Self::Named(named) => {
                visit(&named.package);
                for arg in &named.type_args {
                    arg.visit_packages(visit);
                }
            }
            Self::Pointer(elem) | Self::Slice(elem) => elem.visit_packages(visit),
            Self::Array { elem, .. } | Self::Chan { elem, .. } => elem.visit_packages(visit),
            Self::Map { key, value } => {
                key.visit_packages(visit);
                value.visit_packages(visit);
            }
            Self::Func(sig) => sig.visit_packages(visit),
            Self::Interface(iface) => {
                for elem in &iface.elems {
                    match elem {
                        InterfaceElem::Method { sig, .. } => sig.visit_packages(visit),
                        InterfaceElem::Union(terms) => {
                            for term in terms {
                                term.ty.visit_packages(visit);
                            }
                        }
                    }
                }
            }
            Self::Struct(st) => {
                for field in &st.fields {
                    field.ty.visit_packages(visit);
                }
            }
        }
    }
}

/// Predeclared basic types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasicKind {
    /// `bool`
    Bool,
    /// `string`
    String,
    /// `int`
    Int,
    /// `int8`
    Int8,
    /// `int16`
    Int16,
    /// `int32`
    Int32,
    /// `int64`
    Int64,
    /// `uint`
    Uint,
    /// `uint8`
    Uint8,
    /// `uint16`
    Uint16,
    /// `uint32`
    Uint32,
    /// `uint64`
    Uint64,
    /// `uintptr`
    Uintptr,
    /// `float32`
    Float32,
    /// `float64`
    Float64,
    /// `complex64`
    Complex64,
    /// `complex128`
    Complex128,
    /// `byte` (alias of `uint8`, spelled as written)
    Byte,
    /// `rune` (alias of `int32`, spelled as written)
    Rune,
    /// `unsafe.Pointer`
    UnsafePointer,
}

impl BasicKind {
    /// Looks up a predeclared basic type by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "bool" => Self::Bool,
            "string" => Self::String,
            "int" => Self::Int,
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "uint" => Self::Uint,
            "uint8" => Self::Uint8,
            "uint16" => Self::Uint16,
            "uint32" => Self::Uint32,
            "uint64" => Self::Uint64,
            "uintptr" => Self::Uintptr,
            "float32" => Self::Float32,
            "float64" => Self::Float64,
            "complex64" => Self::Complex64,
            "complex128" => Self::Complex128,
            "byte" => Self::Byte,
            "rune" => Self::Rune,
            _ => return None,
        })
    }

    /// Returns the Go spelling.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::Int => "int",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint => "uint",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Uintptr => "uintptr",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
            Self::Byte => "byte",
            Self::Rune => "rune",
            Self::UnsafePointer => "unsafe.Pointer",
        }
    }

    /// Returns true for integer, float and complex kinds.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        !matches!(self, Self::Bool | Self::String | Self::UnsafePointer)
    }

    /// Returns true for `bool`.
    #[must_use]
    pub const fn is_boolean(self) -> bool {
        matches!(self, Self::Bool)
    }

    /// Returns true for `string`.
    #[must_use]
    pub const fn is_string(self) -> bool {
        matches!(self, Self::String)
    }
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanDir {
    /// `chan T`
    #[default]
    Both,
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
}

/// Reference to a Go package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageRef {
    /// Identifier used to qualify names from this package.
    pub name: String,
    /// Import path.
    pub path: String,
}

impl PackageRef {
    /// Creates a package reference.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// The package holding predeclared identifiers (`error`, `any`, ...).
    #[must_use]
    pub fn universe() -> Self {
        Self::new("", "")
    }

    /// Returns true for the predeclared-identifier package.
    #[must_use]
    pub fn is_universe(&self) -> bool {
        self.path.is_empty()
    }
}

/// A defined type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedType {
    /// Home package.
    pub package: PackageRef,
    /// Type name.
    pub name: String,
    /// Type arguments of an instantiated generic type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_args: Vec<GoType>,
    /// Underlying type, when known. Never itself a `Named`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying: Option<Box<GoType>>,
}

impl NamedType {
    /// Creates a named type with unknown underlying type.
    #[must_use]
    pub fn new(package: PackageRef, name: impl Into<String>) -> Self {
        Self {
            package,
            name: name.into(),
            type_args: Vec::new(),
            underlying: None,
        }
    }

    /// Sets the underlying type.
    #[must_use]
    pub fn with_underlying(mut self, underlying: GoType) -> Self {
        self.underlying = Some(Box::new(underlying));
        self
    }

    /// Returns true for the predeclared `error` interface.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.package.is_universe() && self.name == "error"
    }
}

/// Function signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Parameters.
    pub params: Vec<Param>,
    /// Results.
    pub results: Vec<Param>,
    /// Whether the last parameter is variadic (`...T`).
    #[serde(default)]
    pub variadic: bool,
}

impl Signature {
    fn visit_packages<'a>(&'a self, visit: &mut dyn FnMut(&'a PackageRef)) {
        for param in self.params.iter().chain(&self.results) {
            param.ty.visit_packages(visit);
        }
    }
}

/// Function parameter or result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name, if declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Parameter type. For a variadic parameter, the element type.
    pub ty: GoType,
}

/// Interface literal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceType {
    /// Methods and embedded elements in declaration order.
    pub elems: Vec<InterfaceElem>,
}

/// Interface element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceElem {
    /// Method specification.
    Method {
        /// Method name.
        name: String,
        /// Method signature.
        sig: Signature,
    },
    /// Embedded type or type-set union (`~int | string`).
    Union(Vec<Term>),
}

/// Term of a type-set union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Whether the term is `~T`.
    #[serde(default)]
    pub tilde: bool,
    /// Term type.
    pub ty: GoType,
}

/// Struct literal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructType {
    /// Fields in declaration order.
    pub fields: Vec<StructField>,
}

/// Field of a struct literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructField {
    /// Field name; `None` for embedded fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Field type.
    pub ty: GoType,
    /// Raw tag text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Looks up a predeclared type identifier.
#[must_use]
pub fn universe_type(name: &str) -> Option<GoType> {
    if let Some(kind) = BasicKind::from_name(name) {
        return Some(GoType::Basic(kind));
    }
    let underlying = match name {
        "error" => GoType::Interface(InterfaceType {
            elems: vec![InterfaceElem::Method {
                name: "Error".to_string(),
                sig: Signature {
                    params: Vec::new(),
                    results: vec![Param {
                        name: None,
                        ty: GoType::Basic(BasicKind::String),
                    }],
                    variadic: false,
                },
            }],
        }),
        "any" | "comparable" => GoType::Interface(InterfaceType::default()),
        _ => return None,
    };
    Some(GoType::Named(
        NamedType::new(PackageRef::universe(), name).with_underlying(underlying),
    ))
}

/// Underlying types of frequently used standard library types.
///
/// Types from other packages are not loaded, so without this table their
/// category would be unknown.
#[must_use]
pub fn well_known_underlying(path: &str, name: &str) -> Option<GoType> {
    let byte_slice = || GoType::Slice(Box::new(GoType::Basic(BasicKind::Byte)));
    let opaque_struct = || GoType::Struct(StructType::default());
    let opaque_interface = || GoType::Interface(InterfaceType::default());

    Some(match (path, name) {
        ("unsafe", "Pointer") => GoType::Basic(BasicKind::UnsafePointer),
        ("time", "Duration") => GoType::Basic(BasicKind::Int64),
        ("time", "Month" | "Weekday") => GoType::Basic(BasicKind::Int),
        ("time", "Time" | "Location" | "Timer" | "Ticker") => opaque_struct(),
        (
            "sync",
            "Mutex" | "RWMutex" | "WaitGroup" | "Once" | "Map" | "Cond" | "Pool",
        ) => opaque_struct(),
        ("math/big", "Int" | "Float" | "Rat") => opaque_struct(),
        ("bytes", "Buffer") | ("strings", "Builder" | "Reader") => opaque_struct(),
        ("regexp", "Regexp") | ("net/url", "URL") => opaque_struct(),
        ("net/url", "Values") | ("net/http", "Header") => GoType::Map {
            key: Box::new(GoType::Basic(BasicKind::String)),
            value: Box::new(GoType::Slice(Box::new(GoType::Basic(BasicKind::String)))),
        },
        ("net", "IP" | "IPMask" | "HardwareAddr") | ("encoding/json", "RawMessage") => {
            byte_slice()
        }
        ("encoding/json", "Number") => GoType::Basic(BasicKind::String),
        ("os", "FileMode") | ("io/fs", "FileMode") => GoType::Basic(BasicKind::Uint32),
        ("context", "Context")
        | ("fmt", "Stringer")
        | ("io", "Reader" | "Writer" | "Closer" | "ReadCloser" | "WriteCloser" | "ReadWriter") => {
            opaque_interface()
        }
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_kind_round_trip_names() {
        for name in ["bool", "string", "int32", "uint64", "float64", "byte", "rune"] {
            let kind = BasicKind::from_name(name).expect("basic kind");
            assert_eq!(kind.name(), name);
        }
        assert!(BasicKind::from_name("error").is_none());
    }

    #[test]
    fn test_basic_kind_categories() {
        assert!(BasicKind::Complex128.is_numeric());
        assert!(BasicKind::Byte.is_numeric());
        assert!(!BasicKind::String.is_numeric());
        assert!(BasicKind::Bool.is_boolean());
        assert!(BasicKind::String.is_string());
        assert!(!BasicKind::UnsafePointer.is_numeric());
    }

    #[test]
    fn test_universe_error() {
        let ty = universe_type("error").expect("error is predeclared");
        let named = ty.as_named().expect("named");
        assert!(named.is_error());
        assert!(named.underlying.is_some());
    }

    #[test]
    fn test_universe_unknown() {
        assert!(universe_type("Tester").is_none());
    }

    #[test]
    fn test_visit_packages_nested() {
        let sub = PackageRef::new("sub", "example.com/sub");
        let time = PackageRef::new("time", "time");
        let ty = GoType::Map {
            key: Box::new(GoType::Named(NamedType::new(time.clone(), "Time"))),
            value: Box::new(GoType::Pointer(Box::new(GoType::Named(NamedType::new(
                sub.clone(),
                "Item",
            ))))),
        };

        let mut seen = Vec::new();
        ty.visit_packages(&mut |pkg| seen.push(pkg.clone()));
        assert_eq!(seen, vec![time, sub]);
    }

    #[test]
    fn test_well_known_underlying() {
        assert_eq!(
            well_known_underlying("time", "Duration"),
            Some(GoType::Basic(BasicKind::Int64))
        );
        assert!(matches!(
            well_known_underlying("time", "Time"),
            Some(GoType::Struct(_))
        ));
        assert!(well_known_underlying("example.com/sub", "Thing").is_none());
    }

    #[test]
    fn test_go_type_json_shape() {
        let ty = GoType::Pointer(Box::new(GoType::Basic(BasicKind::Bool)));
        let json = serde_json::to_string(&ty).expect("serialize");
        assert_eq!(json, r#"{"pointer":{"basic":"bool"}}"#);
        let back: GoType = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, ty);
    }
}

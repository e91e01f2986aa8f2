//! Syntax-level declarations.
//!
//! These mirror the source text closely: package qualifiers are still the
//! identifiers written in the file and named types are not yet looked up.
//! [`crate::ir`] resolves them into [`crate::types::GoType`].

use crate::types::ChanDir;

/// A parsed Go source file.
#[derive(Debug, Clone, Default)]
pub struct SourceFile {
    /// Package clause name.
    pub package: String,
    /// Import specifications.
    pub imports: Vec<ImportSpec>,
    /// Top-level type declarations.
    pub types: Vec<TypeDecl>,
}

/// Import specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit name: an alias, `.` or `_`.
    pub name: Option<String>,
    /// Import path.
    pub path: String,
}

/// Top-level type declaration.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    /// Declared name.
    pub name: String,
    /// Type parameters of a generic declaration.
    pub type_params: Vec<TypeParamDecl>,
    /// Whether this is an alias declaration (`type A = B`).
    pub alias: bool,
    /// Declared type.
    pub ty: TypeExpr,
    /// Source line.
    pub line: usize,
}

/// Type parameter with its constraint.
#[derive(Debug, Clone)]
pub struct TypeParamDecl {
    /// Parameter name.
    pub name: String,
    /// Constraint.
    pub constraint: TypeExpr,
}

/// Type expression as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// Possibly qualified, possibly instantiated type name.
    Name {
        /// Package qualifier as written.
        qualifier: Option<String>,
        /// Type name.
        name: String,
        /// Type arguments.
        args: Vec<TypeExpr>,
    },
    /// `*T`
    Pointer(Box<TypeExpr>),
    /// `[N]T`
    Array {
        /// Length expression text.
        len: String,
        /// Element type.
        elem: Box<TypeExpr>,
    },
    /// `[]T`
    Slice(Box<TypeExpr>),
    /// `map[K]V`
    Map {
        /// Key type.
        key: Box<TypeExpr>,
        /// Value type.
        value: Box<TypeExpr>,
    },
    /// `chan T`, `chan<- T`, `<-chan T`
    Chan {
        /// Direction.
        dir: ChanDir,
        /// Element type.
        elem: Box<TypeExpr>,
    },
    /// `func(...) ...`
    Func(FuncExpr),
    /// `interface{ ... }`
    Interface(Vec<InterfaceElemExpr>),
    /// `struct{ ... }`
    Struct(Vec<FieldDecl>),
}

impl TypeExpr {
    /// Creates an unqualified type name.
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name {
            qualifier: None,
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Returns the identifier if this is a bare, unqualified name.
    #[must_use]
    pub fn as_bare_name(&self) -> Option<&str> {
        match self {
            Self::Name {
                qualifier: None,
                name,
                args,
            } if args.is_empty() => Some(name),
            _ => None,
        }
    }

    /// Name an embedded field of this type is known by.
    #[must_use]
    pub fn embedded_name(&self) -> Option<&str> {
        match self {
            Self::Name { name, .. } => Some(name),
            Self::Pointer(elem) => elem.embedded_name(),
            _ => None,
        }
    }
}

/// Struct field declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Field names; a single entry for embedded fields.
    pub names: Vec<String>,
    /// Field type.
    pub ty: TypeExpr,
    /// Tag text, unquoted.
    pub tag: Option<String>,
    /// Whether the field is embedded.
    pub embedded: bool,
    /// Source line.
    pub line: usize,
}

/// Function type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FuncExpr {
    /// Parameters.
    pub params: Vec<ParamDecl>,
    /// Results.
    pub results: Vec<ParamDecl>,
    /// Whether the last parameter is variadic.
    pub variadic: bool,
}

/// Parameter declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    /// Parameter name.
    pub name: Option<String>,
    /// Parameter type; the element type when variadic.
    pub ty: TypeExpr,
}

/// Interface element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceElemExpr {
    /// Method specification.
    Method {
        /// Method name.
        name: String,
        /// Signature.
        sig: FuncExpr,
    },
    /// Embedded type or union of terms.
    Union(Vec<TermExpr>),
}

/// Union term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermExpr {
    /// Whether the term is `~T`.
    pub tilde: bool,
    /// Term type.
    pub ty: TypeExpr,
}

//! Resolved package model consumed by the code generator.
//!
//! [`Package::from_files`] turns the syntax-level declarations of every file
//! in a package into [`TypeDescription`]s whose field types are fully
//! resolved [`GoType`]s: package qualifiers are mapped to import paths and
//! local named types carry their underlying type.

use crate::decl::{FieldDecl, FuncExpr, InterfaceElemExpr, SourceFile, TypeDecl, TypeExpr};
use crate::error::ParseError;
use crate::tag::{Directive, parse_directive};
use crate::types::{
    GoType, InterfaceElem, InterfaceType, NamedType, PackageRef, Param, Signature, StructField,
    StructType, Term, universe_type, well_known_underlying,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// A Go package with its struct types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Package name from the package clause.
    pub name: String,
    /// Import path.
    pub path: String,
    /// Source directory, when loaded from disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Struct types in declaration order.
    pub types: Vec<TypeDescription>,
    /// Packages imported by any file, sorted by path.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<PackageRef>,
    /// Struct types that failed to resolve, with the reason. They only
    /// fail generation when requested.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub unresolved: BTreeMap<String, String>,
}

/// Struct type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescription {
    /// Type name.
    pub name: String,
    /// Type parameters of a generic struct.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<TypeParamDescription>,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescription>,
}

impl TypeDescription {
    /// Returns true if the type declares type parameters.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }
}

/// Type parameter of a generic struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParamDescription {
    /// Parameter name.
    pub name: String,
    /// Resolved constraint.
    pub constraint: GoType,
}

/// Struct field with its accessor directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescription {
    /// Field name; the type name for embedded fields.
    pub name: String,
    /// Resolved field type.
    pub ty: GoType,
    /// Accessor directive from the `wrapper` tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directive: Option<Directive>,
    /// Whether the field is embedded.
    #[serde(default)]
    pub embedded: bool,
}

impl Package {
    /// Resolves the parsed files of one package.
    ///
    /// # Arguments
    /// * `path` - Import path of the package
    /// * `files` - Parsed files, all declaring the same package
    ///
    /// A struct type with an unknown qualifier or a malformed tag does not
    /// fail the package; it is recorded in [`Package::unresolved`] and
    /// reported by [`Package::lookup_type`].
    ///
    /// # Errors
    /// Returns an error if the files disagree on the package name or a type
    /// is declared twice.
    pub fn from_files(path: impl Into<String>, files: &[SourceFile]) -> Result<Self, ParseError> {
        let path = path.into();
        let name = match files.first() {
            Some(file) => file.package.clone(),
            None => package_name_from_path(&path),
        };
        if let Some(other) = files.iter().find(|f| f.package != name) {
            return Err(ParseError::PackageMismatch {
                expected: name,
                found: other.package.clone(),
            });
        }

        let local = PackageRef::new(name.clone(), path.clone());
        let scopes: Vec<FileScope> = files.iter().map(FileScope::new).collect();

        let mut decls = HashMap::new();
        for (idx, file) in files.iter().enumerate() {
            for decl in &file.types {
                if decls.insert(decl.name.as_str(), (decl, idx)).is_some() {
                    return Err(ParseError::duplicate("type", &decl.name));
                }
            }
        }

        let resolver = Resolver {
            local,
            decls,
            scopes: &scopes,
        };

        let mut types = Vec::new();
        let mut unresolved = BTreeMap::new();
        for (idx, file) in files.iter().enumerate() {
            for decl in &file.types {
                match resolver.describe(decl, idx) {
                    Ok(Some(desc)) => {
                        tracing::debug!(
                            type_name = %desc.name,
                            fields = desc.fields.len(),
                            "resolved struct type"
                        );
                        types.push(desc);
                    }
                    Ok(None) => {}
                    Err(err) => {
                        tracing::debug!(
                            type_name = %decl.name,
                            error = %err,
                            "unresolved struct type"
                        );
                        unresolved.insert(decl.name.clone(), err.to_string());
                    }
                }
            }
        }

        let mut imports: BTreeMap<String, PackageRef> = BTreeMap::new();
        for scope in &scopes {
            for pkg in scope.imports.values().chain(scope.dot.iter()) {
                imports.insert(pkg.path.clone(), pkg.clone());
            }
        }

        Ok(Self {
            name,
            path,
            dir: None,
            types,
            imports: imports.into_values().collect(),
            unresolved,
        })
    }

    /// Gets a struct type by name.
    #[must_use]
    pub fn find_type(&self, name: &str) -> Option<&TypeDescription> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Gets a struct type by name for generation.
    ///
    /// # Returns
    /// `None` if the package declares no struct named `name`.
    ///
    /// # Errors
    /// Returns `ParseError::UnresolvedType` if the struct failed to resolve.
    pub fn lookup_type(&self, name: &str) -> Result<Option<&TypeDescription>, ParseError> {
        if let Some(message) = self.unresolved.get(name) {
            return Err(ParseError::UnresolvedType {
                type_name: name.to_string(),
                message: message.clone(),
            });
        }
        Ok(self.find_type(name))
    }

    /// Returns a reference to this package.
    #[must_use]
    pub fn package_ref(&self) -> PackageRef {
        PackageRef::new(self.name.clone(), self.path.clone())
    }
}

/// Derives the conventional package name from an import path.
///
/// Uses the last path element, skipping a `vN` major version element and
/// trimming a `go-` prefix or `.vN`/`-go` style suffixes.
#[must_use]
pub fn package_name_from_path(path: &str) -> String {
    let mut elems = path.rsplit('/').filter(|e| !e.is_empty());
    let mut last = elems.next().unwrap_or(path);
    if is_major_version(last) {
        if let Some(prev) = elems.next() {
            last = prev;
        }
    }
    let trimmed = last.strip_prefix("go-").unwrap_or(last);
    let end = trimmed
        .find(|c: char| !(c == '_' || c.is_alphanumeric()))
        .unwrap_or(trimmed.len());
    if end == 0 {
        last.to_string()
    } else {
        trimmed[..end].to_string()
    }
}

fn is_major_version(elem: &str) -> bool {
    elem.strip_prefix('v')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

/// Import table of a single file.
struct FileScope {
    imports: HashMap<String, PackageRef>,
    dot: Option<PackageRef>,
}

impl FileScope {
    fn new(file: &SourceFile) -> Self {
        let mut imports = HashMap::new();
        let mut dot = None;
        for spec in &file.imports {
            match spec.name.as_deref() {
                Some("_") => {}
                Some(".") => {
                    dot = Some(PackageRef::new(package_name_from_path(&spec.path), &spec.path));
                }
                Some(alias) => {
                    imports.insert(alias.to_string(), PackageRef::new(alias, &spec.path));
                }
                None => {
                    let name = package_name_from_path(&spec.path);
                    imports.insert(name.clone(), PackageRef::new(name, &spec.path));
                }
            }
        }
        Self { imports, dot }
    }
}

struct Resolver<'a> {
    local: PackageRef,
    decls: HashMap<&'a str, (&'a TypeDecl, usize)>,
    scopes: &'a [FileScope],
}

/// Resolution context: the file the expression appears in and the type
/// parameters in scope.
#[derive(Clone, Copy)]
struct Ctx<'c> {
    file: usize,
    type_params: &'c [String],
}

impl<'a> Resolver<'a> {
    fn describe(
        &self,
        decl: &TypeDecl,
        file: usize,
    ) -> Result<Option<TypeDescription>, ParseError> {
        let TypeExpr::Struct(fields) = &decl.ty else {
            return Ok(None);
        };
        if decl.alias {
            return Ok(None);
        }

        let param_names: Vec<String> = decl.type_params.iter().map(|p| p.name.clone()).collect();
        let ctx = Ctx {
            file,
            type_params: &param_names,
        };
        let mut stack = Vec::new();

        let type_params = decl
            .type_params
            .iter()
            .map(|p| {
                Ok(TypeParamDescription {
                    name: p.name.clone(),
                    constraint: self.resolve(&p.constraint, ctx, &mut stack)?,
                })
            })
            .collect::<Result<Vec<_>, ParseError>>()?;

        let mut descs = Vec::new();
        for field in fields {
            let ty = self.resolve(&field.ty, ctx, &mut stack)?;
            for name in &field.names {
                descs.push(FieldDescription {
                    name: name.clone(),
                    ty: ty.clone(),
                    directive: parse_directive(name, field.tag.as_deref())?,
                    embedded: field.embedded,
                });
            }
        }

        Ok(Some(TypeDescription {
            name: decl.name.clone(),
            type_params,
            fields: descs,
        }))
    }

    fn resolve(
        &self,
        expr: &TypeExpr,
        ctx: Ctx<'_>,
        stack: &mut Vec<String>,
    ) -> Result<GoType, ParseError> {
        Ok(match expr {
            TypeExpr::Name {
                qualifier,
                name,
                args,
            } => {
                let type_args = args
                    .iter()
                    .map(|a| self.resolve(a, ctx, stack))
                    .collect::<Result<Vec<_>, _>>()?;
                self.resolve_name(qualifier.as_deref(), name, type_args, ctx, stack)?
            }
            TypeExpr::Pointer(elem) => GoType::Pointer(Box::new(self.resolve(elem, ctx, stack)?)),
            TypeExpr::Slice(elem) => GoType::Slice(Box::new(self.resolve(elem, ctx, stack)?)),
            TypeExpr::Array { len, elem } => GoType::Array {
                len: len.clone(),
                elem: Box::new(self.resolve(elem, ctx, stack)?),
            },
            TypeExpr::Map { key, value } => GoType::Map {
                key: Box::new(self.resolve(key, ctx, stack)?),
                value: Box::new(self.resolve(value, ctx, stack)?),
            },
            TypeExpr::Chan { dir, elem } => GoType::Chan {
                dir: *dir,
                elem: Box::new(self.resolve(elem, ctx, stack)?),
            },
            TypeExpr::Func(func) => GoType::Func(self.resolve_signature(func, ctx, stack)?),
            TypeExpr::Interface(elems) => {
                let elems = elems
                    .iter()
                    .map(|elem| self.resolve_interface_elem(elem, ctx, stack))
                    .collect::<Result<Vec<_>, _>>()?;
                GoType::Interface(InterfaceType { elems })
            }
            TypeExpr::Struct(fields) => GoType::Struct(self.resolve_struct(fields, ctx, stack)?),
        })
    }

    fn resolve_name(
        &self,
        qualifier: Option<&str>,
        name: &str,
        type_args: Vec<GoType>,
        ctx: Ctx<'_>,
        stack: &mut Vec<String>,
    ) -> Result<GoType, ParseError> {
        let scope = &self.scopes[ctx.file];

        if let Some(qualifier) = qualifier {
            let package = scope.imports.get(qualifier).cloned().ok_or_else(|| {
                ParseError::UnknownPackage {
                    qualifier: qualifier.to_string(),
                    type_name: name.to_string(),
                }
            })?;
            return Ok(foreign(package, name, type_args));
        }

        if type_args.is_empty() && ctx.type_params.iter().any(|p| p == name) {
            return Ok(GoType::TypeParam(name.to_string()));
        }

        if let Some(&(decl, file)) = self.decls.get(name) {
            if decl.alias {
                if stack.iter().any(|s| s == name) {
                    return Ok(GoType::Named(NamedType::new(self.local.clone(), name)));
                }
                stack.push(name.to_string());
                let target = self.resolve(
                    &decl.ty,
                    Ctx {
                        file,
                        type_params: &[],
                    },
                    stack,
                );
                stack.pop();
                return target;
            }

            let mut named = NamedType::new(self.local.clone(), name);
            named.type_args = type_args;
            named.underlying = self.underlying(decl, file, stack)?.map(Box::new);
            return Ok(GoType::Named(named));
        }

        if let Some(ty) = universe_type(name) {
            return Ok(ty);
        }

        if let Some(dot) = &scope.dot {
            return Ok(foreign(dot.clone(), name, type_args));
        }

        let mut named = NamedType::new(self.local.clone(), name);
        named.type_args = type_args;
        Ok(GoType::Named(named))
    }

    /// Resolves the underlying type of a local declaration, or `None` when
    /// the declaration is already being resolved further up the stack.
    fn underlying(
        &self,
        decl: &TypeDecl,
        file: usize,
        stack: &mut Vec<String>,
    ) -> Result<Option<GoType>, ParseError> {
        if stack.iter().any(|s| *s == decl.name) {
            return Ok(None);
        }
        let param_names: Vec<String> = decl.type_params.iter().map(|p| p.name.clone()).collect();
        stack.push(decl.name.clone());
        let resolved = self.resolve(
            &decl.ty,
            Ctx {
                file,
                type_params: &param_names,
            },
            stack,
        );
        stack.pop();

        Ok(match resolved? {
            GoType::Named(named) => named.underlying.map(|u| *u),
            other => Some(other),
        })
    }

    fn resolve_signature(
        &self,
        func: &FuncExpr,
        ctx: Ctx<'_>,
        stack: &mut Vec<String>,
    ) -> Result<Signature, ParseError> {
        let mut params = Vec::with_capacity(func.params.len());
        for p in &func.params {
            params.push(Param {
                name: p.name.clone(),
                ty: self.resolve(&p.ty, ctx, stack)?,
            });
        }
        let mut results = Vec::with_capacity(func.results.len());
        for r in &func.results {
            results.push(Param {
                name: r.name.clone(),
                ty: self.resolve(&r.ty, ctx, stack)?,
            });
        }
        Ok(Signature {
            params,
            results,
            variadic: func.variadic,
        })
    }

    fn resolve_interface_elem(
        &self,
        elem: &InterfaceElemExpr,
        ctx: Ctx<'_>,
        stack: &mut Vec<String>,
    ) -> Result<InterfaceElem, ParseError> {
        Ok(match elem {
            InterfaceElemExpr::Method { name, sig } => InterfaceElem::Method {
                name: name.clone(),
                sig: self.resolve_signature(sig, ctx, stack)?,
            },
            InterfaceElemExpr::Union(terms) => {
                let mut resolved = Vec::with_capacity(terms.len());
                for term in terms {
                    resolved.push(Term {
                        tilde: term.tilde,
                        ty: self.resolve(&term.ty, ctx, stack)?,
                    });
                }
                InterfaceElem::Union(resolved)
            }
        })
    }

    fn resolve_struct(
        &self,
        fields: &[FieldDecl],
        ctx: Ctx<'_>,
        stack: &mut Vec<String>,
    ) -> Result<StructType, ParseError> {
        let mut out = Vec::new();
        for field in fields {
            let ty = self.resolve(&field.ty, ctx, stack)?;
            for name in &field.names {
                out.push(StructField {
                    name: (!field.embedded).then(|| name.clone()),
                    ty: ty.clone(),
                    tag: field.tag.clone(),
                });
            }
        }
        Ok(StructType { fields: out })
    }
}

fn foreign(package: PackageRef, name: &str, type_args: Vec<GoType>) -> GoType {
    let underlying = well_known_underlying(&package.path, name);
    let mut named = NamedType::new(package, name);
    named.type_args = type_args;
    named.underlying = underlying.map(Box::new);
    GoType::Named(named)
}

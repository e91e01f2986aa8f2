//! # wrapgen Schema
//!
//! Go declaration parser and type model.
//!
//! This crate provides:
//! - A pest grammar for Go package, import and type declarations
//! - `wrapper` struct tag directives
//! - Resolution of field types into a closed [`GoType`] model
//! - Package loading from a directory, a single source or JSON
//! - Per-platform file selection by name suffix and `//go:build` line

pub mod build;
pub mod decl;
pub mod error;
pub mod ir;
pub mod literal;
pub mod loader;
pub mod parser;
pub mod tag;
pub mod types;

pub use build::BuildContext;
pub use error::ParseError;
pub use ir::{
    FieldDescription, Package, TypeDescription, TypeParamDescription, package_name_from_path,
};
pub use loader::{parse_package, parse_package_json, parse_package_with, parse_source};
pub use parser::{eval_build_constraint, parse_file, parse_type_expr};
pub use tag::{Directive, TAG_KEY};
pub use types::{
    BasicKind, ChanDir, GoType, InterfaceElem, InterfaceType, NamedType, PackageRef, Param,
    Signature, StructField, StructType, Term,
};

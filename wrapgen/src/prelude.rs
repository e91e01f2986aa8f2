//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions.
//!
//! ```ignore
//! use wrapgen::prelude::*;
//! ```

// Schema types
pub use wrapgen_schema::{
    BuildContext, Directive, FieldDescription, GoType, Package, ParseError, TypeDescription,
    parse_package, parse_package_json, parse_package_with, parse_source,
};

// Codegen types
pub use wrapgen_codegen::{
    CodegenError, FsWriter, GenerationOptions, Generator, HEADER, MemoryWriter, Synthesis, Writer,
    generate_from_dir, generate_from_source, generate_package, render,
};

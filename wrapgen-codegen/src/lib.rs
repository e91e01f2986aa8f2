//! # wrapgen Codegen
//!
//! Go accessor wrapper synthesis.
//!
//! This crate provides:
//! - Wrapper struct generation embedding a target struct
//! - Getter and setter generation driven by `wrapper` struct tags
//! - Optional interface, lock guards and JSON `Read` method
//! - Import collection, deduplication and sorting
//! - Output sinks for the generated file

pub mod artifact;
pub mod error;
pub mod generator;
pub mod go;
pub mod imports;
pub mod naming;
pub mod options;
pub mod params;
pub mod types;
pub mod writer;

pub use artifact::{HEADER, output_path, render_file};
pub use error::CodegenError;
pub use generator::{Generator, Synthesis};
pub use imports::{ImportReference, ImportSet};
pub use options::GenerationOptions;
pub use params::RenderParameters;
pub use writer::{FsWriter, MemoryWriter, Writer};

use std::path::{Path, PathBuf};
use wrapgen_schema::Package;

/// Renders the wrapper file for a parsed package.
///
/// # Arguments
/// * `package` - Package declaring the target type
/// * `options` - Generation options
///
/// # Returns
/// The complete generated Go source.
///
/// # Errors
/// Returns `CodegenError::TypeNotFound` if the package does not declare the
/// target struct, or any error raised while synthesizing it.
pub fn render(package: &Package, options: &GenerationOptions) -> Result<String, CodegenError> {
    let synthesis = Generator::new(package, options).synthesize()?.ok_or_else(|| {
        CodegenError::TypeNotFound {
            type_name: options.type_name.clone(),
            package: package.name.clone(),
        }
    })?;
    Ok(synthesis.render(&package.name))
}

/// Renders the wrapper file and hands it to `writer`.
///
/// The file lands in the package directory, or the current directory for a
/// package that was not loaded from disk. Nothing is written on error.
///
/// # Returns
/// Path of the written file.
///
/// # Errors
/// Returns `CodegenError` if rendering or writing fails.
pub fn generate_package(
    package: &Package,
    options: &GenerationOptions,
    writer: &dyn Writer,
) -> Result<PathBuf, CodegenError> {
    let output = render(package, options)?;
    let dir = package.dir.as_deref().unwrap_or_else(|| Path::new("."));
    let path = output_path(dir, options);
    writer.write(&path, output.as_bytes())?;
    tracing::info!(
        type_name = %options.type_name,
        path = %path.display(),
        "wrote wrapper"
    );
    Ok(path)
}

/// Parses the Go package in `dir` and generates the wrapper file.
///
/// Options are validated before the package is read.
///
/// # Errors
/// Returns `CodegenError` if validation, parsing, rendering or writing
/// fails.
pub fn generate_from_dir(
    dir: impl AsRef<Path>,
    options: &GenerationOptions,
    writer: &dyn Writer,
) -> Result<PathBuf, CodegenError> {
    options.validate()?;
    let package = wrapgen_schema::parse_package(dir)?;
    generate_package(&package, options, writer)
}

/// Generates the wrapper source for a single Go file.
///
/// # Errors
/// Returns `CodegenError` if parsing or rendering fails.
pub fn generate_from_source(
    src: &str,
    options: &GenerationOptions,
) -> Result<String, CodegenError> {
    let package = wrapgen_schema::parse_source(src)?;
    render(&package, options)
}

//! Generated file assembly.

use crate::naming::default_output_name;
use crate::options::GenerationOptions;
use std::path::{Path, PathBuf};

/// First line of every generated file.
pub const HEADER: &str = "// Code generated by type-wrapper; DO NOT EDIT.";

/// Assembles a Go source file.
///
/// # Arguments
/// * `package_name` - Package clause name
/// * `imports` - Rendered import specs, in order
/// * `fragments` - Top-level declarations, in order
#[must_use]
pub fn render_file(package_name: &str, imports: &[String], fragments: &[String]) -> String {
    let mut output = String::new();
    output.push_str(HEADER);
    output.push_str("\n\n");
    output.push_str(&format!("package {package_name}\n"));

    if !imports.is_empty() {
        output.push_str("\nimport (\n");
        for import in imports {
            output.push_str(&format!("\t{import}\n"));
        }
        output.push_str(")\n");
    }

    for fragment in fragments.iter().filter(|f| !f.is_empty()) {
        output.push('\n');
        output.push_str(fragment);
        output.push('\n');
    }

    output
}

/// Path of the generated file for a package in `dir`.
///
/// An explicit output is resolved against `dir` unless it is absolute;
/// otherwise the name is derived from the type name.
#[must_use]
pub fn output_path(dir: &Path, options: &GenerationOptions) -> PathBuf {
    match &options.output {
        Some(output) => dir.join(output),
        None => dir.join(default_output_name(&options.type_name)),
    }
}

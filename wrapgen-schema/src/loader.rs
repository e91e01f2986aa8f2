//! Package loading from disk, source text or JSON.

use crate::build::BuildContext;
use crate::error::ParseError;
use crate::ir::Package;
use crate::parser::parse_file;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads the Go package in `dir` for the host platform.
///
/// See [`parse_package_with`].
///
/// # Errors
/// Returns an error if `dir` is not a directory, holds no Go files, a file
/// fails to parse or the files declare different packages.
pub fn parse_package(dir: impl AsRef<Path>) -> Result<Package, ParseError> {
    parse_package_with(dir, &BuildContext::host())
}

/// Loads the Go package in `dir` as built for `ctx`.
///
/// Every `*.go` file except tests is parsed in file name order, skipping
/// files whose `_GOOS`/`_GOARCH` name suffix or `//go:build` line excludes
/// them from `ctx`. The import path comes from the nearest enclosing
/// `go.mod`; without one the package name is used.
///
/// # Errors
/// Returns an error if `dir` is not a directory, holds no Go files for
/// `ctx`, a file fails to parse or the files declare different packages.
pub fn parse_package_with(
    dir: impl AsRef<Path>,
    ctx: &BuildContext,
) -> Result<Package, ParseError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(ParseError::NotADirectory(dir.to_path_buf()));
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| is_go_source(path))
        .filter(|path| {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            let selected = ctx.matches_file_name(name);
            if !selected {
                tracing::debug!(
                    file = %path.display(),
                    goos = %ctx.goos,
                    goarch = %ctx.goarch,
                    "excluded by file name"
                );
            }
            selected
        })
        .collect();
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        let src = fs::read_to_string(path).map_err(|e| ParseError::from(e).in_file(path))?;
        if !ctx.matches_source(&src).map_err(|e| e.in_file(path))? {
            tracing::debug!(file = %path.display(), "excluded by build constraint");
            continue;
        }
        let file = parse_file(&src).map_err(|e| e.in_file(path))?;
        tracing::debug!(
            file = %path.display(),
            types = file.types.len(),
            "parsed Go source"
        );
        files.push(file);
    }
    let Some(first) = files.first() else {
        return Err(ParseError::NoGoFiles(dir.to_path_buf()));
    };

    let import_path = match module_import_path(dir)? {
        Some(path) => path,
        None => first.package.clone(),
    };
    let mut package = Package::from_files(import_path, &files)?;
    package.dir = Some(dir.to_path_buf());
    Ok(package)
}

/// Loads a package consisting of a single source file.
///
/// # Errors
/// Returns an error if the source fails to parse or resolve.
pub fn parse_source(src: &str) -> Result<Package, ParseError> {
    let file = parse_file(src)?;
    Package::from_files(file.package.clone(), &[file])
}

/// Loads a package description produced by an external extractor.
///
/// # Errors
/// Returns `ParseError::Json` if `json` does not describe a package.
pub fn parse_package_json(json: &str) -> Result<Package, ParseError> {
    Ok(serde_json::from_str(json)?)
}

fn is_go_source(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    path.is_file()
        && name.ends_with(".go")
        && !name.ends_with("_test.go")
        && !name.starts_with(['.', '_'])
}

/// Import path of `dir` derived from the nearest enclosing `go.mod`.
fn module_import_path(dir: &Path) -> Result<Option<String>, ParseError> {
    let abs = dir.canonicalize()?;
    for root in abs.ancestors() {
        let go_mod = root.join("go.mod");
        if !go_mod.is_file() {
            continue;
        }
        let content = fs::read_to_string(&go_mod)?;
        let Some(mut path) = module_path(&content) else {
            return Ok(None);
        };
        if let Ok(rel) = abs.strip_prefix(root) {
            for component in rel.components() {
                path.push('/');
                path.push_str(&component.as_os_str().to_string_lossy());
            }
        }
        return Ok(Some(path));
    }
    Ok(None)
}

/// Extracts the module path from `go.mod` content.
fn module_path(content: &str) -> Option<String> {
    for line in content.lines() {
        let Some(rest) = line.trim().strip_prefix("module") else {
            continue;
        };
        if !rest.starts_with([' ', '\t', '"', '`']) {
            continue;
        }
        let value = rest.split("//").next().unwrap_or_default().trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .or_else(|| value.strip_prefix('`').and_then(|v| v.strip_suffix('`')))
            .unwrap_or(value);
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BasicKind, GoType};

    const TESTER: &str = "package test\n\ntype Tester struct {\n\tfield1 string `wrapper:\"getter\"`\n}\n";

    #[test]
    fn test_module_path() {
        assert_eq!(
            module_path("module example.com/project\n\ngo 1.21\n").as_deref(),
            Some("example.com/project")
        );
        assert_eq!(
            module_path("// comment\nmodule \"example.com/q\" // trailing\n").as_deref(),
            Some("example.com/q")
        );
        assert_eq!(module_path("modules x\n"), None);
    }

    #[test]
    fn test_parse_package_with_go_mod() {
        let root = tempfile::tempdir().expect("Failed to create temp dir");
        fs::write(root.path().join("go.mod"), "module example.com/project\n").expect("write");
        let dir = root.path().join("internal").join("test");
        fs::create_dir_all(&dir).expect("mkdir");
        fs::write(dir.join("tester.go"), TESTER).expect("write");
        fs::write(dir.join("tester_test.go"), "package test_test\n").expect("write");

        let pkg = parse_package(&dir).expect("Failed to load package");
        assert_eq!(pkg.name, "test");
        assert_eq!(pkg.path, "example.com/project/internal/test");
        assert_eq!(pkg.dir.as_deref(), Some(dir.as_path()));
        assert!(pkg.find_type("Tester").is_some());
    }

    #[test]
    fn test_parse_package_without_go_mod() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("a.go"), TESTER).expect("write");

        let pkg = parse_package(dir.path()).expect("Failed to load package");
        assert_eq!(pkg.name, "test");
        assert_eq!(pkg.types.len(), 1);
    }

    #[test]
    fn test_parse_package_errors() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let err = parse_package(dir.path()).unwrap_err();
        assert!(matches!(err, ParseError::NoGoFiles(_)));

        let file = dir.path().join("a.go");
        fs::write(&file, TESTER).expect("write");
        let err = parse_package(&file).unwrap_err();
        assert!(matches!(err, ParseError::NotADirectory(_)));

        fs::write(dir.path().join("b.go"), "package other\n").expect("write");
        let err = parse_package(dir.path()).unwrap_err();
        assert!(matches!(err, ParseError::PackageMismatch { .. }));
    }

    #[test]
    fn test_syntax_error_names_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("bad.go"), "package p\ntype T struct {\n").expect("write");
        let err = parse_package(dir.path()).unwrap_err();
        assert!(matches!(err, ParseError::File { .. }));
        assert!(err.to_string().contains("bad.go"));
    }

    #[test]
    fn test_parse_source() {
        let pkg = parse_source(TESTER).expect("Failed to parse");
        assert_eq!(pkg.name, "test");
        assert_eq!(pkg.path, "test");
    }

    #[test]
    fn test_parse_package_json() {
        let json = r#"{
            "name": "test",
            "path": "example.com/test",
            "types": [{
                "name": "Tester",
                "fields": [{
                    "name": "count",
                    "ty": {"basic": "int"},
                    "directive": {"getter": ""}
                }]
            }]
        }"#;
        let pkg = parse_package_json(json).expect("Failed to parse JSON");
        let tester = pkg.find_type("Tester").expect("Tester");
        assert_eq!(tester.fields[0].directive.as_ref().and_then(|d| d.getter.as_deref()), Some(""));

        let err = parse_package_json("{").unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn test_platform_files_excluded() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let tester = "package test\n\ntype Tester struct {\n\th handle `wrapper:\"getter\"`\n}\n";
        fs::write(dir.path().join("t.go"), tester).expect("write");
        fs::write(dir.path().join("h_linux.go"), "package test\ntype handle int\n").expect("write");
        fs::write(dir.path().join("h_windows.go"), "package test\ntype handle uintptr\n")
            .expect("write");
        fs::write(dir.path().join("gen.go"), "//go:build ignore\n\npackage main\n").expect("write");

        let linux = parse_package_with(dir.path(), &BuildContext::new("linux", "amd64"))
            .expect("Failed to load package");
        let field = &linux.find_type("Tester").expect("Tester").fields[0];
        let named = field.ty.as_named().expect("named");
        assert_eq!(
            named.underlying.as_deref(),
            Some(&GoType::Basic(BasicKind::Int))
        );

        let windows = parse_package_with(dir.path(), &BuildContext::new("windows", "amd64"))
            .expect("Failed to load package");
        let field = &windows.find_type("Tester").expect("Tester").fields[0];
        let named = field.ty.as_named().expect("named");
        assert_eq!(
            named.underlying.as_deref(),
            Some(&GoType::Basic(BasicKind::Uintptr))
        );
    }

    #[test]
    fn test_only_excluded_files() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("a_plan9.go"), TESTER).expect("write");
        let err = parse_package_with(dir.path(), &BuildContext::new("linux", "amd64")).unwrap_err();
        assert!(matches!(err, ParseError::NoGoFiles(_)));
    }
}

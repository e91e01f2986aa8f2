//! Import collection and rendering.

use crate::error::CodegenError;
use std::collections::BTreeMap;
use wrapgen_schema::{GoType, PackageRef};

/// Import path of the package used by the generated reader.
pub const SERIALIZATION_PATH: &str = "encoding/json";

/// Package referenced by generated code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImportReference {
    /// Name used to qualify identifiers from the package.
    pub name: String,
    /// Import path.
    pub path: String,
}

impl ImportReference {
    /// Creates an import reference.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Reference to the serialization package.
    #[must_use]
    pub fn serialization() -> Self {
        Self::new("json", SERIALIZATION_PATH)
    }

    /// Renders the import spec: the bare quoted path when the name matches
    /// the last path element, `name "path"` otherwise.
    #[must_use]
    pub fn render(&self) -> String {
        let last = self.path.rsplit('/').next().unwrap_or(&self.path);
        if last == self.name {
            format!("\"{}\"", self.path)
        } else {
            format!("{} \"{}\"", self.name, self.path)
        }
    }
}

impl From<&PackageRef> for ImportReference {
    fn from(package: &PackageRef) -> Self {
        Self::new(package.name.clone(), package.path.clone())
    }
}

/// Import references deduplicated by display name.
#[derive(Debug, Clone, Default)]
pub struct ImportSet {
    refs: BTreeMap<String, ImportReference>,
}

impl ImportSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a reference.
    ///
    /// Returns true if the reference was added, false if it was already
    /// present.
    ///
    /// # Errors
    /// Returns `CodegenError::InvalidParameters` if the display name is
    /// already taken by a different import path, since the generated file
    /// could not qualify both packages.
    pub fn insert(&mut self, reference: ImportReference) -> Result<bool, CodegenError> {
        if let Some(existing) = self.refs.get(&reference.name) {
            if existing.path != reference.path {
                return Err(CodegenError::invalid_parameters(format!(
                    "import name '{}' refers to both '{}' and '{}'",
                    reference.name, existing.path, reference.path
                )));
            }
            return Ok(false);
        }
        self.refs.insert(reference.name.clone(), reference);
        Ok(true)
    }

    /// Adds every package referenced by `ty` except `current` and the
    /// predeclared identifiers.
    ///
    /// # Errors
    /// Returns `CodegenError::InvalidParameters` on an import name conflict.
    pub fn add_type(&mut self, ty: &GoType, current: &PackageRef) -> Result<(), CodegenError> {
        let mut packages = Vec::new();
        ty.visit_packages(&mut |package| {
            if !package.is_universe() && package.path != current.path {
                packages.push(ImportReference::from(package));
            }
        });
        for reference in packages {
            self.insert(reference)?;
        }
        Ok(())
    }

    /// Returns the reference registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ImportReference> {
        self.refs.get(name)
    }

    /// Number of references.
    #[must_use]
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    /// Returns true if no reference was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// References sorted by display name.
    #[must_use]
    pub fn into_references(self) -> Vec<ImportReference> {
        self.refs.into_values().collect()
    }
}

/// Produces the final import specs.
///
/// References are sorted by display name and deduplicated; the
/// serialization package is prepended when `wants_serialization` is set and
/// no reference already points at it.
#[must_use]
pub fn finalize(
    references: impl IntoIterator<Item = ImportReference>,
    wants_serialization: bool,
) -> Vec<String> {
    let mut refs: Vec<ImportReference> = references.into_iter().collect();
    refs.sort_by(|a, b| a.name.cmp(&b.name));
    refs.dedup_by(|a, b| a.name == b.name);

    if wants_serialization && !refs.iter().any(|r| r.path == SERIALIZATION_PATH) {
        refs.insert(0, ImportReference::serialization());
    }

    refs.iter().map(ImportReference::render).collect()
}

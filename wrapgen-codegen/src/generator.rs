//! Wrapper synthesis.

use crate::artifact::render_file;
use crate::error::CodegenError;
use crate::go::{
    DISCRIMINATOR_FIELD, Guard, MutexGuard, READ_METHOD, READ_SIGNATURE, getter, getter_signature,
    interface_decl, reader, setter, setter_signature, wrapper_struct,
};
use crate::imports::{ImportReference, ImportSet, SERIALIZATION_PATH, finalize};
use crate::options::GenerationOptions;
use crate::params::RenderParameters;
use std::collections::HashSet;
use wrapgen_schema::Package;

/// Output of one synthesis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    /// Top-level declarations in output order.
    pub fragments: Vec<String>,
    /// Packages referenced by the generated accessors.
    pub references: Vec<ImportReference>,
    /// Whether the reader was generated.
    pub reader: bool,
}

impl Synthesis {
    /// Final import specs.
    #[must_use]
    pub fn imports(&self) -> Vec<String> {
        finalize(self.references.iter().cloned(), self.reader)
    }

    /// Renders the complete source file for `package_name`.
    #[must_use]
    pub fn render(&self, package_name: &str) -> String {
        render_file(package_name, &self.imports(), &self.fragments)
    }
}

/// Generates the wrapper of one type in a package.
pub struct Generator<'a> {
    package: &'a Package,
    options: &'a GenerationOptions,
}

impl<'a> Generator<'a> {
    /// Creates a new generator.
    #[must_use]
    pub fn new(package: &'a Package, options: &'a GenerationOptions) -> Self {
        Self { package, options }
    }

    /// Synthesizes the wrapper declarations.
    ///
    /// # Returns
    /// `None` if the package declares no struct named `options.type_name`.
    ///
    /// # Errors
    /// Returns `CodegenError::InvalidParameters` if a name would produce
    /// malformed code or two packages share an import name,
    /// `CodegenError::DuplicateMethod` if two generated members share a name
    /// and `CodegenError::Parse` if the target type failed to resolve.
    pub fn synthesize(&self) -> Result<Option<Synthesis>, CodegenError> {
        self.options.validate()?;

        let Some(target) = self.package.lookup_type(&self.options.type_name)? else {
            tracing::warn!(
                type_name = %self.options.type_name,
                package = %self.package.name,
                "type not found"
            );
            return Ok(None);
        };

        let current = self.package.package_ref();
        let base = RenderParameters::for_type(target, self.options, &current);
        let guard = base.lock.as_deref().map(MutexGuard::new);
        let guard = guard.as_ref().map(|g| g as &dyn Guard);
        let mut members = Members::new(&base);

        let mut fragments = vec![wrapper_struct(&base)];
        let mut signatures = Vec::new();
        let mut imports = ImportSet::new();

        for param in &target.type_params {
            imports.add_type(&param.constraint, &current)?;
        }

        for field in &target.fields {
            let Some(directive) = &field.directive else {
                tracing::debug!(field = %field.name, "no directive, skipped");
                continue;
            };
            if directive.is_empty() {
                tracing::debug!(field = %field.name, "empty directive, skipped");
                continue;
            }

            let params = base.for_field(field, directive, &current);
            params.validate(directive)?;

            if directive.getter.is_some() {
                members.claim(&params.getter)?;
                fragments.push(getter(&params, guard));
                if base.interface_name.is_some() {
                    signatures.push(getter_signature(&params));
                }
            }
            if directive.setter.is_some() {
                members.claim(&params.setter)?;
                fragments.push(setter(&params, guard));
                if base.interface_name.is_some() {
                    signatures.push(setter_signature(&params));
                }
            }

            imports.add_type(&field.ty, &current)?;
        }

        if base.reader {
            if let Some(json) = imports.get("json") {
                if json.path != SERIALIZATION_PATH {
                    return Err(CodegenError::invalid_parameters(format!(
                        "import name 'json' refers to '{}', which the reader cannot use",
                        json.path
                    )));
                }
            }
            fragments.push(reader(&base, guard));
            if base.interface_name.is_some() {
                signatures.push(READ_SIGNATURE.to_string());
            }
        }

        if base.interface_name.is_some() {
            fragments.insert(0, interface_decl(&base, &signatures));
        }

        tracing::debug!(
            type_name = %target.name,
            fragments = fragments.len(),
            imports = imports.len(),
            "synthesized wrapper"
        );

        Ok(Some(Synthesis {
            fragments,
            references: imports.into_references(),
            reader: base.reader,
        }))
    }
}

/// Member names already declared on the wrapper.
struct Members {
    wrapper: String,
    names: HashSet<String>,
}

impl Members {
    fn new(base: &RenderParameters) -> Self {
        let mut names = HashSet::new();
        // The embedded field is named after the wrapped type.
        names.insert(base.struct_name.clone());
        // Promoted from the embedded struct, so an accessor would shadow it.
        if let Some(root) = base.lock.as_deref().and_then(|lock| lock.split('.').next()) {
            names.insert(root.to_string());
        }
        if base.reader {
            names.insert(DISCRIMINATOR_FIELD.to_string());
            names.insert(READ_METHOD.to_string());
        }
        Self {
            wrapper: base.wrapper_name.clone(),
            names,
        }
    }

    fn claim(&mut self, name: &str) -> Result<(), CodegenError> {
        if self.names.insert(name.to_string()) {
            Ok(())
        } else {
            Err(CodegenError::DuplicateMethod {
                name: name.to_string(),
                wrapper: self.wrapper.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wrapgen_schema::{ParseError, parse_file, parse_source};

    const TESTER: &str = r#"package test

import "sync"

type Tester struct {
	lock   sync.Mutex
	field1 string `wrapper:"getter,setter"`
	field2 int32  `wrapper:"getter,setter"`
	field3 bool
	field4 []byte `wrapper:""`
}
"#;

    fn synthesize(src: &str, options: &GenerationOptions) -> Result<Option<Synthesis>, CodegenError> {
        let package = parse_source(src).expect("Failed to parse");
        Generator::new(&package, options).synthesize()
    }

    fn synthesize_files(
        sources: &[&str],
        options: &GenerationOptions,
    ) -> Result<Option<Synthesis>, CodegenError> {
        let files: Vec<_> = sources
            .iter()
            .map(|src| parse_file(src).expect("Failed to parse"))
            .collect();
        let package = Package::from_files("example.com/p", &files).expect("Failed to resolve");
        Generator::new(&package, options).synthesize()
    }

    #[test]
    fn test_fragment_order() {
        let options = GenerationOptions::new("Tester").with_interface("ITester").with_reader(true);
        let synthesis = synthesize(TESTER, &options).expect("ok").expect("found");
        assert!(synthesis.fragments[0].starts_with("type ITester interface {"));
        assert!(synthesis.fragments[1].starts_with("// TesterWrapper encapsulates"));
        assert!(synthesis.fragments[2].contains(") Field1() string {"));
        assert!(synthesis.fragments[3].contains(") SetField1(val string) {"));
        assert!(synthesis.fragments.last().expect("reader").contains(") Read(p []byte)"));
        assert_eq!(synthesis.fragments.len(), 7);
    }

    #[test]
    fn test_skips_untagged_and_empty_directives() {
        let options = GenerationOptions::new("Tester").with_interface("ITester");
        let synthesis = synthesize(TESTER, &options).expect("ok").expect("found");
        let all = synthesis.fragments.join("\n");
        assert!(!all.contains("Field3"));
        assert!(!all.contains("Field4"));
        assert_eq!(synthesis.fragments.len(), 6);
    }

    #[test]
    fn test_type_not_found() {
        let options = GenerationOptions::new("Missing");
        assert!(synthesize(TESTER, &options).expect("ok").is_none());
    }

    #[test]
    fn test_no_imports_for_unexposed_fields() {
        let synthesis = synthesize(TESTER, &GenerationOptions::new("Tester"))
            .expect("ok")
            .expect("found");
        assert!(synthesis.references.is_empty());
        assert!(synthesis.imports().is_empty());
    }

    #[test]
    fn test_reader_adds_serialization_import() {
        let options = GenerationOptions::new("Tester").with_reader(true);
        let synthesis = synthesize(TESTER, &options).expect("ok").expect("found");
        assert_eq!(synthesis.imports(), vec!["\"encoding/json\""]);
    }

    #[test]
    fn test_duplicate_method_names() {
        let src = "package p\ntype T struct {\n\ta int `wrapper:\"getter:Value\"`\n\tb int `wrapper:\"getter:Value\"`\n}\n";
        let err = synthesize(src, &GenerationOptions::new("T")).unwrap_err();
        assert!(matches!(err, CodegenError::DuplicateMethod { ref name, .. } if name == "Value"));
    }

    #[test]
    fn test_accessor_clashing_with_embedded_type() {
        let src = "package p\ntype T struct {\n\tt int `wrapper:\"getter\"`\n}\n";
        let err = synthesize(src, &GenerationOptions::new("T").with_receiver("w")).unwrap_err();
        assert!(matches!(err, CodegenError::DuplicateMethod { ref name, .. } if name == "T"));
    }

    #[test]
    fn test_accessor_clashing_with_reader() {
        let src = "package p\ntype T struct {\n\tread bool `wrapper:\"getter\"`\n}\n";
        let plain = synthesize(src, &GenerationOptions::new("T"));
        assert!(plain.is_ok());
        let err = synthesize(src, &GenerationOptions::new("T").with_reader(true)).unwrap_err();
        assert!(matches!(err, CodegenError::DuplicateMethod { ref name, .. } if name == "Read"));
    }

    #[test]
    fn test_invalid_override_name() {
        let src = "package p\ntype T struct {\n\ta int `wrapper:\"setter:Set-A\"`\n}\n";
        let err = synthesize(src, &GenerationOptions::new("T")).unwrap_err();
        assert!(matches!(err, CodegenError::InvalidParameters { .. }));
    }

    #[test]
    fn test_conflicting_json_import() {
        let src = "package p\nimport json \"github.com/goccy/go-json\"\ntype T struct {\n\tn json.Number `wrapper:\"getter\"`\n}\n";
        assert!(synthesize(src, &GenerationOptions::new("T")).is_ok());
        let err = synthesize(src, &GenerationOptions::new("T").with_reader(true)).unwrap_err();
        assert!(matches!(err, CodegenError::InvalidParameters { .. }));
    }

    #[test]
    fn test_generic_constraint_imports() {
        let src = "package p\nimport \"example.com/constraints\"\ntype Box[T constraints.Ordered] struct {\n\tval T `wrapper:\"getter\"`\n}\n";
        let synthesis = synthesize(src, &GenerationOptions::new("Box")).expect("ok").expect("found");
        assert_eq!(synthesis.imports(), vec!["\"example.com/constraints\""]);
        assert!(synthesis.fragments[0].contains("type BoxWrapper[T constraints.Ordered] struct {"));
        assert!(synthesis.fragments[1].contains("func (b *BoxWrapper[T]) Val() T {"));
    }

    #[test]
    fn test_import_name_shared_by_two_files() {
        let a = "package p\nimport s \"example.com/alpha\"\ntype A = s.Thing\n";
        let b = "package p\nimport s \"example.com/beta\"\ntype T struct {\n\tx A       `wrapper:\"getter\"`\n\ty s.Thing `wrapper:\"getter\"`\n}\n";
        let err = synthesize_files(&[a, b], &GenerationOptions::new("T")).unwrap_err();
        assert!(matches!(err, CodegenError::InvalidParameters { .. }));
        assert!(err.to_string().contains("'example.com/alpha' and 'example.com/beta'"));
    }

    #[test]
    fn test_bad_tag_on_other_type_ignored() {
        let src = "package p\ntype Other struct {\n\ta int `wrapper:\"getter,deleter\"`\n}\ntype T struct {\n\tb int `wrapper:\"getter\"`\n}\n";
        let synthesis = synthesize(src, &GenerationOptions::new("T")).expect("ok").expect("found");
        assert!(synthesis.fragments[1].contains(") B() int {"));

        let err = synthesize(src, &GenerationOptions::new("Other")).unwrap_err();
        assert!(matches!(err, CodegenError::Parse(ParseError::UnresolvedType { .. })));
    }

    #[test]
    fn test_accessor_clashing_with_lock_field() {
        let src = "package p\nimport \"sync\"\ntype T struct {\n\tmu sync.Mutex\n\tn int `wrapper:\"getter:mu\"`\n}\n";
        assert!(synthesize(src, &GenerationOptions::new("T")).is_ok());
        let err = synthesize(src, &GenerationOptions::new("T").with_lock("mu")).unwrap_err();
        assert!(matches!(err, CodegenError::DuplicateMethod { ref name, .. } if name == "mu"));
    }
}

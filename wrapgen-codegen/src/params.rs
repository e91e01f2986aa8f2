//! Per-fragment render parameters.

use crate::error::CodegenError;
use crate::naming::{default_getter, default_setter};
use crate::options::{GenerationOptions, check_identifier};
use crate::types::{canonical_type_text, zero_value};
use wrapgen_schema::{Directive, FieldDescription, PackageRef, TypeDescription};

/// Everything a fragment needs to render.
///
/// Built fresh for every fragment from the options, the target type and,
/// for accessors, one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderParameters {
    /// Receiver identifier.
    pub receiver: String,
    /// Wrapped type name.
    pub struct_name: String,
    /// Wrapper type name.
    pub wrapper_name: String,
    /// Interface name, if one is declared.
    pub interface_name: Option<String>,
    /// Type parameter list with constraints, e.g. `[K comparable, V any]`.
    pub type_params: String,
    /// Type argument list, e.g. `[K, V]`.
    pub type_args: String,
    /// Field name.
    pub field_name: String,
    /// Getter method name.
    pub getter: String,
    /// Setter method name.
    pub setter: String,
    /// Field type as spelled in the target package.
    pub type_text: String,
    /// Zero value of the field type.
    pub zero_value: String,
    /// Lock field selector.
    pub lock: Option<String>,
    /// Whether the reader is generated.
    pub reader: bool,
    /// Whether getters guard against a nil receiver.
    pub nil_safe: bool,
}

impl RenderParameters {
    /// Parameters shared by every fragment of `target`.
    #[must_use]
    pub fn for_type(
        target: &TypeDescription,
        options: &GenerationOptions,
        current: &PackageRef,
    ) -> Self {
        let (type_params, type_args) = if target.is_generic() {
            let params: Vec<String> = target
                .type_params
                .iter()
                .map(|p| format!("{} {}", p.name, canonical_type_text(&p.constraint, current)))
                .collect();
            let args: Vec<&str> = target.type_params.iter().map(|p| p.name.as_str()).collect();
            (format!("[{}]", params.join(", ")), format!("[{}]", args.join(", ")))
        } else {
            (String::new(), String::new())
        };

        Self {
            receiver: options.resolved_receiver(),
            struct_name: target.name.clone(),
            wrapper_name: options.resolved_wrapper_name(),
            interface_name: options.interface_name.clone(),
            type_params,
            type_args,
            lock: options.lock.clone(),
            reader: options.reader,
            nil_safe: options.nil_safe,
            ..Self::default()
        }
    }

    /// Parameters for the accessors of one field.
    #[must_use]
    pub fn for_field(
        &self,
        field: &FieldDescription,
        directive: &Directive,
        current: &PackageRef,
    ) -> Self {
        let type_text = canonical_type_text(&field.ty, current);
        let zero_value = zero_value(&field.ty, &type_text);
        let pick = |explicit: Option<&String>, default: fn(&str) -> String| match explicit {
            Some(name) if !name.is_empty() => name.clone(),
            _ => default(&field.name),
        };

        Self {
            field_name: field.name.clone(),
            getter: pick(directive.getter.as_ref(), default_getter),
            setter: pick(directive.setter.as_ref(), default_setter),
            type_text,
            zero_value,
            ..self.clone()
        }
    }

    /// Wrapper type as written in receivers, e.g. `TesterWrapper[T]`.
    #[must_use]
    pub fn wrapper_type(&self) -> String {
        format!("{}{}", self.wrapper_name, self.type_args)
    }

    /// Embedded type as written in the wrapper, e.g. `Tester[T]`.
    #[must_use]
    pub fn struct_type(&self) -> String {
        format!("{}{}", self.struct_name, self.type_args)
    }

    /// Checks that the accessor names requested by `directive` are
    /// identifiers.
    ///
    /// # Errors
    /// Returns `CodegenError::InvalidParameters` naming the offending field.
    pub fn validate(&self, directive: &Directive) -> Result<(), CodegenError> {
        let checks = [
            (directive.getter.is_some(), "getter", &self.getter),
            (directive.setter.is_some(), "setter", &self.setter),
        ];
        for (requested, what, name) in checks {
            if requested {
                check_identifier(&format!("{what} for field '{}'", self.field_name), name)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wrapgen_schema::{BasicKind, GoType, TypeParamDescription};

    fn current() -> PackageRef {
        PackageRef::new("test", "example.com/test")
    }

    fn tester() -> TypeDescription {
        TypeDescription {
            name: "Tester".to_string(),
            type_params: Vec::new(),
            fields: vec![FieldDescription {
                name: "field1".to_string(),
                ty: GoType::Basic(BasicKind::String),
                directive: Some(Directive::default().with_getter("GetField1").with_setter("")),
                embedded: false,
            }],
        }
    }

    #[test]
    fn test_for_type() {
        let options = GenerationOptions::new("Tester").with_lock("lock");
        let params = RenderParameters::for_type(&tester(), &options, &current());
        assert_eq!(params.receiver, "t");
        assert_eq!(params.wrapper_name, "TesterWrapper");
        assert_eq!(params.wrapper_type(), "TesterWrapper");
        assert_eq!(params.struct_type(), "Tester");
        assert_eq!(params.lock.as_deref(), Some("lock"));
    }

    #[test]
    fn test_for_field_names() {
        let target = tester();
        let base = RenderParameters::for_type(&target, &GenerationOptions::new("Tester"), &current());
        let field = &target.fields[0];
        let directive = field.directive.as_ref().expect("directive");
        let params = base.for_field(field, directive, &current());

        assert_eq!(params.getter, "GetField1");
        assert_eq!(params.setter, "SetField1");
        assert_eq!(params.type_text, "string");
        assert_eq!(params.zero_value, "\"\"");
        assert!(params.validate(directive).is_ok());
        assert!(base.field_name.is_empty());
    }

    #[test]
    fn test_invalid_override() {
        let target = tester();
        let base = RenderParameters::for_type(&target, &GenerationOptions::new("Tester"), &current());
        let directive = Directive::default().with_getter("Get-Field");
        let params = base.for_field(&target.fields[0], &directive, &current());
        let err = params.validate(&directive).unwrap_err();
        assert!(err.to_string().contains("field1"));
    }

    #[test]
    fn test_generic_type_lists() {
        let mut target = tester();
        target.type_params = vec![
            TypeParamDescription {
                name: "K".to_string(),
                constraint: wrapgen_schema::types::universe_type("comparable").expect("comparable"),
            },
            TypeParamDescription {
                name: "V".to_string(),
                constraint: wrapgen_schema::types::universe_type("any").expect("any"),
            },
        ];
        let params = RenderParameters::for_type(&target, &GenerationOptions::new("Tester"), &current());
        assert_eq!(params.type_params, "[K comparable, V any]");
        assert_eq!(params.wrapper_type(), "TesterWrapper[K, V]");
        assert_eq!(params.struct_type(), "Tester[K, V]");
    }
}

//! Generation options.

use crate::error::CodegenError;
use crate::naming::{default_receiver, is_identifier};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Identifiers used by the generated setter and reader bodies.
const SETTER_LOCALS: &[&str] = &["val"];
const READER_LOCALS: &[&str] = &["p", "data", "err", "n", "json"];

/// Options for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Name of the type to wrap.
    pub type_name: String,
    /// Wrapper type name; defaults to `<type_name>Wrapper`.
    #[serde(default)]
    pub wrapper_type_name: Option<String>,
    /// Interface to declare alongside the wrapper.
    #[serde(default)]
    pub interface_name: Option<String>,
    /// Output file, relative to the package directory.
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Method receiver name; defaults to the lower-cased first letter.
    #[serde(default)]
    pub receiver: Option<String>,
    /// Field holding a `sync.Locker` to guard every accessor with.
    #[serde(default)]
    pub lock: Option<String>,
    /// Whether to generate an `io.Reader` that emits the wrapper as JSON.
    #[serde(default)]
    pub reader: bool,
    /// Whether getters return the zero value on a nil receiver.
    #[serde(default)]
    pub nil_safe: bool,
}

fn non_empty(value: impl Into<String>) -> Option<String> {
    Some(value.into()).filter(|v| !v.is_empty())
}

impl GenerationOptions {
    /// Creates options for wrapping `type_name`.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// Sets the wrapper type name.
    #[must_use]
    pub fn with_wrapper(mut self, name: impl Into<String>) -> Self {
        self.wrapper_type_name = non_empty(name);
        self
    }

    /// Sets the interface name.
    #[must_use]
    pub fn with_interface(mut self, name: impl Into<String>) -> Self {
        self.interface_name = non_empty(name);
        self
    }

    /// Sets the output file.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        let output = output.into();
        self.output = (!output.as_os_str().is_empty()).then_some(output);
        self
    }

    /// Sets the receiver name.
    #[must_use]
    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = non_empty(receiver);
        self
    }

    /// Sets the lock field.
    #[must_use]
    pub fn with_lock(mut self, lock: impl Into<String>) -> Self {
        self.lock = non_empty(lock);
        self
    }

    /// Enables or disables the reader method.
    #[must_use]
    pub fn with_reader(mut self, reader: bool) -> Self {
        self.reader = reader;
        self
    }

    /// Enables or disables nil-safe getters.
    #[must_use]
    pub fn with_nil_safe(mut self, nil_safe: bool) -> Self {
        self.nil_safe = nil_safe;
        self
    }

    /// Wrapper type name with the default applied.
    #[must_use]
    pub fn resolved_wrapper_name(&self) -> String {
        self.wrapper_type_name
            .clone()
            .unwrap_or_else(|| format!("{}Wrapper", self.type_name))
    }

    /// Receiver name with the default applied.
    #[must_use]
    pub fn resolved_receiver(&self) -> String {
        self.receiver
            .clone()
            .unwrap_or_else(|| default_receiver(&self.type_name))
    }

    /// Checks that the options can produce well-formed code.
    ///
    /// # Errors
    /// Returns `CodegenError::MissingTypeName` if no type is given and
    /// `CodegenError::InvalidParameters` if a name is not a Go identifier or
    /// two generated declarations would clash.
    pub fn validate(&self) -> Result<(), CodegenError> {
        if self.type_name.is_empty() {
            return Err(CodegenError::MissingTypeName);
        }
        check_identifier("type name", &self.type_name)?;

        let wrapper = self.resolved_wrapper_name();
        check_identifier("wrapper name", &wrapper)?;
        if wrapper == self.type_name {
            return Err(CodegenError::invalid_parameters(format!(
                "wrapper name '{wrapper}' is the wrapped type's name"
            )));
        }

        if let Some(interface) = &self.interface_name {
            check_identifier("interface name", interface)?;
            if *interface == wrapper || *interface == self.type_name {
                return Err(CodegenError::invalid_parameters(format!(
                    "interface name '{interface}' is already declared"
                )));
            }
        }

        if let Some(lock) = &self.lock {
            if !lock.split('.').all(is_identifier) {
                return Err(CodegenError::invalid_parameters(format!(
                    "lock '{lock}' is not a field selector"
                )));
            }
        }

        let receiver = self.resolved_receiver();
        check_identifier("receiver", &receiver)?;
        let reader_locals: &[&str] = if self.reader { READER_LOCALS } else { &[] };
        let mut reserved = SETTER_LOCALS.iter().chain(reader_locals);
        if receiver == "_" || reserved.any(|local| *local == receiver) {
            return Err(CodegenError::invalid_parameters(format!(
                "receiver '{receiver}' collides with a generated identifier"
            )));
        }

        Ok(())
    }
}

pub(crate) fn check_identifier(what: &str, name: &str) -> Result<(), CodegenError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(CodegenError::invalid_parameters(format!(
            "{what} '{name}' is not a valid identifier"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = GenerationOptions::new("Tester");
        assert_eq!(options.resolved_wrapper_name(), "TesterWrapper");
        assert_eq!(options.resolved_receiver(), "t");
        assert!(!options.reader);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let options = GenerationOptions::new("Tester")
            .with_wrapper("Safe")
            .with_interface("ITester")
            .with_receiver("w")
            .with_lock("mu")
            .with_output("out.go")
            .with_reader(true)
            .with_nil_safe(true);
        assert_eq!(options.resolved_wrapper_name(), "Safe");
        assert_eq!(options.resolved_receiver(), "w");
        assert_eq!(options.interface_name.as_deref(), Some("ITester"));
        assert_eq!(options.output, Some(PathBuf::from("out.go")));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_empty_values_mean_unset() {
        let options = GenerationOptions::new("Tester")
            .with_interface("")
            .with_lock("")
            .with_output("");
        assert_eq!(options.interface_name, None);
        assert_eq!(options.lock, None);
        assert_eq!(options.output, None);
    }

    #[test]
    fn test_missing_type_name() {
        let err = GenerationOptions::default().validate().unwrap_err();
        assert!(matches!(err, CodegenError::MissingTypeName));
    }

    #[test]
    fn test_invalid_names() {
        for options in [
            GenerationOptions::new("Tester").with_receiver("1t"),
            GenerationOptions::new("Tester").with_wrapper("Tester"),
            GenerationOptions::new("Tester").with_interface("TesterWrapper"),
            GenerationOptions::new("Tester").with_lock("mu()"),
            GenerationOptions::new("Tester").with_receiver("val"),
            GenerationOptions::new("Pair").with_reader(true),
        ] {
            let err = options.validate().unwrap_err();
            assert!(
                matches!(err, CodegenError::InvalidParameters { .. }),
                "{options:?}"
            );
        }
    }

    #[test]
    fn test_nested_lock_selector() {
        let options = GenerationOptions::new("Tester").with_lock("state.mu");
        assert!(options.validate().is_ok());
    }
}

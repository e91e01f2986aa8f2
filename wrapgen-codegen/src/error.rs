//! Error types for code generation.

use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Source parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] wrapgen_schema::ParseError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No target type was given.
    #[error("type name is required")]
    MissingTypeName,

    /// Target type is not declared in the package.
    #[error("type '{type_name}' not found in package '{package}'")]
    TypeNotFound {
        /// Requested type name.
        type_name: String,
        /// Package searched.
        package: String,
    },

    /// Render parameters that would produce malformed output.
    #[error("invalid parameters: {message}")]
    InvalidParameters {
        /// Error message.
        message: String,
    },

    /// Two generated members share a name.
    #[error("method '{name}' would be declared more than once on '{wrapper}'")]
    DuplicateMethod {
        /// Conflicting name.
        name: String,
        /// Wrapper type name.
        wrapper: String,
    },
}

impl CodegenError {
    /// Creates an invalid parameters error with the given message.
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::InvalidParameters {
            message: message.into(),
        }
    }
}

//! Error types for Go source parsing and type resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for source parsing operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Lexical or grammatical error.
    #[error("syntax error at line {line}: {message}")]
    Syntax {
        /// 1-based line number.
        line: usize,
        /// Error message.
        message: String,
    },

    /// Error raised while parsing a specific file.
    #[error("{}: {source}", path.display())]
    File {
        /// Offending file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: Box<ParseError>,
    },

    /// Malformed `wrapper` struct tag.
    #[error("invalid wrapper tag on field '{field}': {message}")]
    InvalidTag {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Package qualifier without a matching import.
    #[error("unknown package '{qualifier}' referenced by type '{type_name}'")]
    UnknownPackage {
        /// Qualifier as written in source.
        qualifier: String,
        /// Type being qualified.
        type_name: String,
    },

    /// Requested struct type failed to resolve.
    #[error("type '{type_name}' cannot be wrapped: {message}")]
    UnresolvedType {
        /// Type name.
        type_name: String,
        /// Resolution error.
        message: String,
    },

    /// Duplicate definition.
    #[error("duplicate {kind} definition: '{name}'")]
    DuplicateDefinition {
        /// Kind of definition.
        kind: String,
        /// Name of the duplicate.
        name: String,
    },

    /// Files in one directory declare different packages.
    #[error("found packages {expected} and {found} in the same directory")]
    PackageMismatch {
        /// First package seen.
        expected: String,
        /// Conflicting package.
        found: String,
    },

    /// Directory has no buildable Go files.
    #[error("no Go files in {}", .0.display())]
    NoGoFiles(PathBuf),

    /// Input path is not a directory.
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// Package description JSON error.
    #[error("invalid package description: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Creates a syntax error.
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Creates an invalid tag error.
    pub fn invalid_tag(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTag {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a duplicate definition error.
    pub fn duplicate(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateDefinition {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Attaches the file the error originated from.
    #[must_use]
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Self::File {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

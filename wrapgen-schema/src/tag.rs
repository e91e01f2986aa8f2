//! Struct tag handling.
//!
//! A field opts into accessor generation with a `wrapper` tag:
//!
//! ```text
//! field1 string `wrapper:"getter:GetField1,setter"`
//! ```
//!
//! Each comma-separated item is `getter` or `setter`, optionally followed by
//! `:Name` to override the default method name.

use crate::error::ParseError;
use crate::literal::unquote;
use serde::{Deserialize, Serialize};

/// Tag key holding accessor directives.
pub const TAG_KEY: &str = "wrapper";

/// Per-field accessor request.
///
/// `Some("")` asks for a method with the default name, `Some(name)`
/// overrides it and `None` disables it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    /// Getter request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub getter: Option<String>,
    /// Setter request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setter: Option<String>,
}

impl Directive {
    /// Requests a getter, with an explicit name when `name` is non-empty.
    #[must_use]
    pub fn with_getter(mut self, name: impl Into<String>) -> Self {
        self.getter = Some(name.into());
        self
    }

    /// Requests a setter, with an explicit name when `name` is non-empty.
    #[must_use]
    pub fn with_setter(mut self, name: impl Into<String>) -> Self {
        self.setter = Some(name.into());
        self
    }

    /// Returns true if neither accessor is requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.getter.is_none() && self.setter.is_none()
    }
}

/// Looks up `key` in a struct tag using the conventional
/// `key:"value" key2:"value2"` layout.
///
/// Returns `None` if the key is absent or the tag is malformed before the
/// key is reached.
#[must_use]
pub fn lookup(tag: &str, key: &str) -> Option<String> {
    let mut rest = tag;
    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return None;
        }

        let name_len = rest
            .find(|c: char| c <= ' ' || c == ':' || c == '"' || c == '\u{7f}')
            .unwrap_or(rest.len());
        if name_len == 0 || !rest[name_len..].starts_with(":\"") {
            return None;
        }
        let name = &rest[..name_len];
        rest = &rest[name_len + 1..];

        // Find the closing quote, skipping escaped characters.
        let bytes = rest.as_bytes();
        let mut i = 1;
        while i < bytes.len() && bytes[i] != b'"' {
            if bytes[i] == b'\\' {
                i += 1;
            }
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }
        let quoted = &rest[..=i];
        rest = &rest[i + 1..];

        if name == key {
            return unquote(quoted);
        }
    }
}

/// Parses the accessor directive of a field.
///
/// # Arguments
/// * `field` - Field name, used in error messages
/// * `tag` - Raw tag text, if the field has one
///
/// # Returns
/// `None` when the field carries no `wrapper` tag or the tag is `-`.
///
/// # Errors
/// Returns `ParseError::InvalidTag` for unknown or repeated items.
pub fn parse_directive(field: &str, tag: Option<&str>) -> Result<Option<Directive>, ParseError> {
    let Some(value) = tag.and_then(|tag| lookup(tag, TAG_KEY)) else {
        return Ok(None);
    };
    if value == "-" {
        return Ok(None);
    }

    let mut directive = Directive::default();
    for item in value.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        let (key, name) = item.split_once(':').unwrap_or((item, ""));
        let slot = match key.trim() {
            "getter" => &mut directive.getter,
            "setter" => &mut directive.setter,
            other => {
                return Err(ParseError::invalid_tag(
                    field,
                    format!("unknown item '{other}'"),
                ));
            }
        };
        if slot.is_some() {
            return Err(ParseError::invalid_tag(
                field,
                format!("'{}' given more than once", key.trim()),
            ));
        }
        *slot = Some(name.trim().to_string());
    }

    Ok(Some(directive))
}

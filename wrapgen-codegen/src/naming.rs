//! Identifier casing helpers.

use wrapgen_schema::literal::is_keyword;

/// Suffix appended to the snake_case type name for the default output file.
pub const OUTPUT_SUFFIX: &str = "_wrapper.go";

/// Upper-cases the first character of `name`, leaving the rest untouched.
#[must_use]
pub fn exported_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-cases the first character of `type_name`.
#[must_use]
pub fn default_receiver(type_name: &str) -> String {
    type_name
        .chars()
        .next()
        .map(|c| c.to_lowercase().collect())
        .unwrap_or_default()
}

/// Default getter name for a field.
#[must_use]
pub fn default_getter(field: &str) -> String {
    exported_name(field)
}

/// Default setter name for a field.
#[must_use]
pub fn default_setter(field: &str) -> String {
    format!("Set{}", exported_name(field))
}

/// Converts a mixed-case identifier to snake_case.
///
/// An underscore goes before an upper-case letter that follows a lower-case
/// letter or digit, and before the last capital of an upper-case run that
/// starts a new word, so `HTTPTester` becomes `http_tester`.
#[must_use]
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase()
                || prev.is_ascii_digit()
                || (next_lower && prev != '_')
            {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }

    out
}

/// Default output file name for a type, e.g. `test_struct_wrapper.go`.
#[must_use]
pub fn default_output_name(type_name: &str) -> String {
    format!("{}{OUTPUT_SUFFIX}", to_snake_case(type_name))
}

/// Returns true if `name` is a valid Go identifier and not a keyword.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first == '_' || first.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
        && !is_keyword(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exported_name() {
        assert_eq!(exported_name("field1"), "Field1");
        assert_eq!(exported_name("Field1"), "Field1");
        assert_eq!(exported_name("xmlName"), "XmlName");
        assert_eq!(exported_name(""), "");
    }

    #[test]
    fn test_default_accessor_names() {
        assert_eq!(default_getter("field2"), "Field2");
        assert_eq!(default_setter("field2"), "SetField2");
    }

    #[test]
    fn test_default_receiver() {
        assert_eq!(default_receiver("Tester"), "t");
        assert_eq!(default_receiver("HTTPTester"), "h");
        assert_eq!(default_receiver(""), "");
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("Tester"), "tester");
        assert_eq!(to_snake_case("TestStruct"), "test_struct");
        assert_eq!(to_snake_case("HTTPTester"), "http_tester");
        assert_eq!(to_snake_case("MyHTTPServer2Go"), "my_http_server2_go");
        assert_eq!(to_snake_case("ID"), "id");
        assert_eq!(to_snake_case("snake_Case"), "snake_case");
    }

    #[test]
    fn test_to_snake_case_idempotent() {
        for name in ["Tester", "HTTPTester", "TestStruct", "A1B2", "already_snake"] {
            let once = to_snake_case(name);
            assert_eq!(to_snake_case(&once), once);
        }
    }

    #[test]
    fn test_default_output_name() {
        assert_eq!(default_output_name("Tester"), "tester_wrapper.go");
        assert_eq!(default_output_name("HTTPTester"), "http_tester_wrapper.go");
        assert_eq!(default_output_name("TestStruct"), "test_struct_wrapper.go");
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("t"));
        assert!(is_identifier("_x9"));
        assert!(is_identifier("größe"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("9x"));
        assert!(!is_identifier("a.b"));
        assert!(!is_identifier("type"));
    }
}

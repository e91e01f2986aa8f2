//! Wrapper struct and interface declarations.

use crate::params::RenderParameters;

/// Field recording the wrapped type's name when the reader is enabled.
pub const DISCRIMINATOR_FIELD: &str = "DataType";

/// Renders the wrapper struct embedding the wrapped type.
#[must_use]
pub fn wrapper_struct(params: &RenderParameters) -> String {
    let mut output = format!(
        "// {} encapsulates the type {}.\n",
        params.wrapper_name, params.struct_name
    );
    output.push_str(&format!(
        "type {}{} struct {{\n",
        params.wrapper_name, params.type_params
    ));
    if params.reader {
        output.push_str("\t// DataType holds the name of the wrapped type. It is set by Read.\n");
        output.push_str(&format!(
            "\t{DISCRIMINATOR_FIELD} string `json:\"_data_type,omitempty\"`\n"
        ));
    }
    output.push_str(&format!("\t{}\n", params.struct_type()));
    output.push('}');
    output
}

/// Renders the interface listing `signatures` in order.
///
/// Returns an empty string when no interface name is configured.
#[must_use]
pub fn interface_decl(params: &RenderParameters, signatures: &[String]) -> String {
    let Some(name) = &params.interface_name else {
        return String::new();
    };
    if signatures.is_empty() {
        return format!("type {name}{} interface{{}}", params.type_params);
    }

    let mut output = format!("type {name}{} interface {{\n", params.type_params);
    for signature in signatures {
        output.push('\t');
        output.push_str(signature);
        output.push('\n');
    }
    output.push('}');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params() -> RenderParameters {
        RenderParameters {
            receiver: "t".to_string(),
            struct_name: "Tester".to_string(),
            wrapper_name: "TesterWrapper".to_string(),
            interface_name: Some("ITester".to_string()),
            ..RenderParameters::default()
        }
    }

    #[test]
    fn test_wrapper_struct() {
        assert_eq!(
            wrapper_struct(&params()),
            "// TesterWrapper encapsulates the type Tester.\n\
             type TesterWrapper struct {\n\
             \tTester\n\
             }"
        );
    }

    #[test]
    fn test_wrapper_struct_with_discriminator() {
        let params = RenderParameters {
            reader: true,
            ..params()
        };
        let output = wrapper_struct(&params);
        assert!(output.contains("\tDataType string `json:\"_data_type,omitempty\"`\n\tTester\n"));
    }

    #[test]
    fn test_generic_wrapper_struct() {
        let params = RenderParameters {
            type_params: "[T any]".to_string(),
            type_args: "[T]".to_string(),
            ..params()
        };
        let output = wrapper_struct(&params);
        assert!(output.contains("type TesterWrapper[T any] struct {\n\tTester[T]\n}"));
    }

    #[test]
    fn test_interface_decl() {
        let signatures = vec![
            "GetField1() string".to_string(),
            "SetField1(val string)".to_string(),
        ];
        assert_eq!(
            interface_decl(&params(), &signatures),
            "type ITester interface {\n\
             \tGetField1() string\n\
             \tSetField1(val string)\n\
             }"
        );
    }

    #[test]
    fn test_empty_interface_decl() {
        assert_eq!(interface_decl(&params(), &[]), "type ITester interface{}");
    }

    #[test]
    fn test_no_interface_configured() {
        let params = RenderParameters {
            interface_name: None,
            ..params()
        };
        assert!(interface_decl(&params, &["X()".to_string()]).is_empty());
    }
}

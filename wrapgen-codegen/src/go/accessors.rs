//! Getter and setter methods.

use super::builder::{Guard, MethodBuilder};
use crate::params::RenderParameters;

fn getter_method<'g>(params: &RenderParameters, guard: Option<&'g dyn Guard>) -> MethodBuilder<'g> {
    let mut method = MethodBuilder::new(&params.receiver, params.wrapper_type(), &params.getter)
        .results(&params.type_text);
    if params.nil_safe {
        method = method
            .prologue(format!("if {} == nil {{", params.receiver))
            .prologue(format!("\treturn {}", params.zero_value))
            .prologue("}");
    }
    method.guard(guard).stmt(format!(
        "return {}.{}.{}",
        params.receiver, params.struct_name, params.field_name
    ))
}

fn setter_method<'g>(params: &RenderParameters, guard: Option<&'g dyn Guard>) -> MethodBuilder<'g> {
    MethodBuilder::new(&params.receiver, params.wrapper_type(), &params.setter)
        .params(format!("val {}", params.type_text))
        .guard(guard)
        .stmt(format!(
            "{}.{}.{} = val",
            params.receiver, params.struct_name, params.field_name
        ))
}

/// Renders the getter of `params.field_name`.
#[must_use]
pub fn getter(params: &RenderParameters, guard: Option<&dyn Guard>) -> String {
    getter_method(params, guard).build()
}

/// Renders the setter of `params.field_name`.
#[must_use]
pub fn setter(params: &RenderParameters, guard: Option<&dyn Guard>) -> String {
    setter_method(params, guard).build()
}

/// Interface entry for the getter.
#[must_use]
pub fn getter_signature(params: &RenderParameters) -> String {
    getter_method(params, None).signature()
}

/// Interface entry for the setter.
#[must_use]
pub fn setter_signature(params: &RenderParameters) -> String {
    setter_method(params, None).signature()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::go::builder::MutexGuard;
    use pretty_assertions::assert_eq;

    fn params() -> RenderParameters {
        RenderParameters {
            receiver: "t".to_string(),
            struct_name: "Tester".to_string(),
            wrapper_name: "TesterWrapper".to_string(),
            field_name: "field1".to_string(),
            getter: "GetField1".to_string(),
            setter: "SetField1".to_string(),
            type_text: "string".to_string(),
            zero_value: "\"\"".to_string(),
            ..RenderParameters::default()
        }
    }

    #[test]
    fn test_getter() {
        assert_eq!(
            getter(&params(), None),
            "func (t *TesterWrapper) GetField1() string {\n\treturn t.Tester.field1\n}"
        );
    }

    #[test]
    fn test_setter_with_lock() {
        let guard = MutexGuard::new("lock");
        assert_eq!(
            setter(&params(), Some(&guard)),
            "func (t *TesterWrapper) SetField1(val string) {\n\
             \tt.lock.Lock()\n\
             \tdefer t.lock.Unlock()\n\
             \tt.Tester.field1 = val\n\
             }"
        );
    }

    #[test]
    fn test_nil_safe_getter_checks_before_locking() {
        let guard = MutexGuard::new("lock");
        let params = RenderParameters {
            nil_safe: true,
            ..params()
        };
        assert_eq!(
            getter(&params, Some(&guard)),
            "func (t *TesterWrapper) GetField1() string {\n\
             \tif t == nil {\n\
             \t\treturn \"\"\n\
             \t}\n\
             \tt.lock.Lock()\n\
             \tdefer t.lock.Unlock()\n\
             \treturn t.Tester.field1\n\
             }"
        );
    }

    #[test]
    fn test_signatures() {
        assert_eq!(getter_signature(&params()), "GetField1() string");
        assert_eq!(setter_signature(&params()), "SetField1(val string)");
    }

    #[test]
    fn test_generic_receiver() {
        let params = RenderParameters {
            type_args: "[T]".to_string(),
            type_text: "T".to_string(),
            ..params()
        };
        assert!(getter(&params, None).starts_with("func (t *TesterWrapper[T]) GetField1() T {"));
    }
}

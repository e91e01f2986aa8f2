//! Type spelling and zero values.

use wrapgen_schema::{
    BasicKind, ChanDir, GoType, InterfaceElem, InterfaceType, NamedType, PackageRef, Param,
    Signature, StructType,
};

/// Spells `ty` as it would be written inside the package `current`.
///
/// Types declared in `current` and predeclared types are unqualified;
/// everything else is prefixed with its package name.
#[must_use]
pub fn canonical_type_text(ty: &GoType, current: &PackageRef) -> String {
    let mut out = String::new();
    write_type(&mut out, ty, current);
    out
}

fn write_type(out: &mut String, ty: &GoType, current: &PackageRef) {
    match ty {
        GoType::Basic(kind) => out.push_str(kind.name()),
        GoType::Named(named) => write_named(out, named, current),
        GoType::TypeParam(name) => out.push_str(name),
        GoType::Pointer(elem) => {
            out.push('*');
            write_type(out, elem, current);
        }
        GoType::Array { len, elem } => {
            out.push_str(&format!("[{len}]"));
            write_type(out, elem, current);
        }
        GoType::Slice(elem) => {
            out.push_str("[]");
            write_type(out, elem, current);
        }
        GoType::Map { key, value } => {
            out.push_str("map[");
            write_type(out, key, current);
            out.push(']');
            write_type(out, value, current);
        }
        GoType::Chan { dir, elem } => {
            out.push_str(match dir {
                ChanDir::Both => "chan ",
                ChanDir::Send => "chan<- ",
                ChanDir::Recv => "<-chan ",
            });
            // `chan (<-chan T)` needs parentheses to keep its meaning.
            let paren = *dir == ChanDir::Both
                && matches!(elem.as_ref(), GoType::Chan { dir: ChanDir::Recv, .. });
            if paren {
                out.push('(');
            }
            write_type(out, elem, current);
            if paren {
                out.push(')');
            }
        }
        GoType::Func(sig) => {
            out.push_str("func");
            write_signature(out, sig, current);
        }
        GoType::Interface(iface) => write_interface(out, iface, current),
        GoType::Struct(st) => write_struct(out, st, current),
    }
}

fn write_named(out: &mut String, named: &NamedType, current: &PackageRef) {
    if !named.package.is_universe() && named.package.path != current.path {
        out.push_str(&named.package.name);
        out.push('.');
    }
    out.push_str(&named.name);
    if !named.type_args.is_empty() {
        out.push('[');
        for (i, arg) in named.type_args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write_type(out, arg, current);
        }
        out.push(']');
    }
}

/// Writes `(params) results` of a function type or method.
fn write_signature(out: &mut String, sig: &Signature, current: &PackageRef) {
    out.push('(');
    let last = sig.params.len().saturating_sub(1);
    for (i, param) in sig.params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        if let Some(name) = &param.name {
            out.push_str(name);
            out.push(' ');
        }
        if sig.variadic && i == last {
            out.push_str("...");
        }
        write_type(out, &param.ty, current);
    }
    out.push(')');

    match sig.results.as_slice() {
        [] => {}
        [Param { name: None, ty }] => {
            out.push(' ');
            write_type(out, ty, current);
        }
        results => {
            out.push_str(" (");
            for (i, result) in results.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                if let Some(name) = &result.name {
                    out.push_str(name);
                    out.push(' ');
                }
                write_type(out, &result.ty, current);
            }
            out.push(')');
        }
    }
}

fn write_interface(out: &mut String, iface: &InterfaceType, current: &PackageRef) {
    out.push_str("interface{");
    for (i, elem) in iface.elems.iter().enumerate() {
        if i > 0 {
            out.push_str("; ");
        }
        match elem {
            InterfaceElem::Method { name, sig } => {
                out.push_str(name);
                write_signature(out, sig, current);
            }
            InterfaceElem::Union(terms) => {
                for (j, term) in terms.iter().enumerate() {
                    if j > 0 {
                        out.push_str(" | ");
                    }
                    if term.tilde {
                        out.push('~');
                    }
                    write_type(out, &term.ty, current);
                }
            }
        }
    }
    out.push('}');
}

fn write_struct(out: &mut String, st: &StructType, current: &PackageRef) {
    out.push_str("struct{");
    for (i, field) in st.fields.iter().enumerate() {
        if i > 0 {
            out.push_str("; ");
        }
        if let Some(name) = &field.name {
            out.push_str(name);
            out.push(' ');
        }
        write_type(out, &field.ty, current);
        if let Some(tag) = &field.tag {
            out.push(' ');
            out.push_str(&quote(tag));
        }
    }
    out.push('}');
}

/// Quotes `s` as a Go interpreted string literal.
#[must_use]
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Zero value literal of `ty`, whose canonical spelling is `text`.
///
/// Named types are classified by their underlying type; a named type whose
/// underlying type is unknown gets `nil`.
#[must_use]
pub fn zero_value(ty: &GoType, text: &str) -> String {
    match ty {
        GoType::Pointer(_)
        | GoType::Array { .. }
        | GoType::Slice(_)
        | GoType::Chan { .. }
        | GoType::Interface(_)
        | GoType::Map { .. }
        | GoType::Func(_) => "nil".to_string(),
        GoType::Struct(_) => format!("{text}{{}}"),
        GoType::Basic(kind) => basic_zero(*kind).to_string(),
        GoType::Named(named) if named.is_error() => "nil".to_string(),
        GoType::Named(named) => match named.underlying.as_deref() {
            Some(underlying) => zero_value(underlying, text),
            None => "nil".to_string(),
        },
        GoType::TypeParam(name) => format!("*new({name})"),
    }
}

const fn basic_zero(kind: BasicKind) -> &'static str {
    if kind.is_boolean() {
        "false"
    } else if kind.is_string() {
        "\"\""
    } else if kind.is_numeric() {
        "0"
    } else {
        "nil"
    }
}

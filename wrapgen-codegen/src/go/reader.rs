//! `io.Reader` implementation serializing the wrapper.

use super::builder::{Guard, MethodBuilder};
use super::wrapper::DISCRIMINATOR_FIELD;
use crate::params::RenderParameters;

/// Name of the generated reader method.
pub const READ_METHOD: &str = "Read";

/// Interface entry of the reader method.
pub const READ_SIGNATURE: &str = "Read(p []byte) (int, error)";

/// Renders `Read`, which records the wrapped type's name in the
/// discriminator field, marshals the wrapper to JSON and copies as much as
/// fits into `p`. A marshalling failure returns `0, err`.
#[must_use]
pub fn reader(params: &RenderParameters, guard: Option<&dyn Guard>) -> String {
    let r = &params.receiver;
    MethodBuilder::new(r, params.wrapper_type(), READ_METHOD)
        .params("p []byte")
        .results("(int, error)")
        .guard(guard)
        .stmt(format!(
            "{r}.{DISCRIMINATOR_FIELD} = \"{}\"",
            params.struct_name
        ))
        .stmt(format!("data, err := json.Marshal({r})"))
        .stmt("if err != nil {")
        .stmt("\treturn 0, err")
        .stmt("}")
        .stmt("n := copy(p, data)")
        .stmt("return n, nil")
        .build()
}

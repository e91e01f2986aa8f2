//! Go source fragments.
//!
//! Each function renders one top-level declaration without a trailing
//! newline. Method bodies go through [`MethodBuilder`], which splices the
//! statements of an optional [`Guard`] in front of the body.

pub mod accessors;
pub mod builder;
pub mod reader;
pub mod wrapper;

pub use accessors::{getter, getter_signature, setter, setter_signature};
pub use builder::{Guard, MethodBuilder, MutexGuard};
pub use reader::{READ_METHOD, READ_SIGNATURE, reader};
pub use wrapper::{DISCRIMINATOR_FIELD, interface_decl, wrapper_struct};

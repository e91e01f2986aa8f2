//! # wrapgen
//!
//! Accessor wrapper generator for Go structs.
//!
//! wrapgen reads a Go package, finds a struct, and writes a companion file
//! declaring a wrapper type that embeds it and exposes the fields selected
//! by `wrapper:"getter,setter"` struct tags.
//!
//! ## Features
//!
//! - **Tag-driven accessors** - Getters and setters with optional name overrides
//! - **Interface extraction** - Declares an interface listing every generated method
//! - **Lock guards** - Wraps accessors in a receiver `sync.Locker` field
//! - **JSON reader** - Adds an `io.Reader` emitting the wrapper as JSON
//! - **Stable output** - Imports are deduplicated and sorted; reruns are byte-identical
//!
//! ## Quick Start
//!
//! ```ignore
//! use wrapgen::prelude::*;
//!
//! let options = GenerationOptions::new("Tester")
//!     .with_interface("ITester")
//!     .with_lock("lock");
//!
//! let path = generate_from_dir("./pkg", &options, &FsWriter)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - Go source parsing and type resolution
//! - [`codegen`] - Wrapper synthesis and output

pub mod prelude;

/// Go source parsing and type resolution.
pub mod schema {
    pub use wrapgen_schema::*;
}

/// Wrapper synthesis and output.
pub mod codegen {
    pub use wrapgen_codegen::*;
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_prelude_round_trip() {
        let src = "package p\n\ntype Point struct {\n\tx int `wrapper:\"getter\"`\n}\n";
        let package = parse_source(src).expect("parse");
        let output = render(&package, &GenerationOptions::new("Point")).expect("render");
        assert!(output.starts_with(HEADER));
        assert!(output.ends_with("func (p *PointWrapper) X() int {\n\treturn p.Point.x\n}\n"));
    }

    #[test]
    fn test_memory_writer_through_facade() {
        let src = "package p\n\ntype Point struct {\n\tx int `wrapper:\"setter\"`\n}\n";
        let package = parse_source(src).expect("parse");
        let writer = MemoryWriter::new();
        let options = GenerationOptions::new("Point").with_output("point.go");
        let path = generate_package(&package, &options, &writer).expect("generate");
        assert_eq!(writer.paths(), vec![path]);
    }
}

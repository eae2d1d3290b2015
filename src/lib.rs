//! # objdsl: Object Schema DSL Front End
//!
//! Parses a small DSL describing record types (objects), their typed
//! properties and parent/child containment, resolves every property type
//! against a closed set of scalars and generic containers, and verifies the
//! document before it is handed to a code generator.
//!
//! ## DSL structure
//!
//! - **Schema**: optional `schema Name Version` metadata
//! - **Objects**: `object Name { ... }` with one member per line
//! - **Members**: a property (`ident Type...` up to end of line) or a child
//!   object reference (a bare `Name`)
//!
//! ## Property types
//!
//! - Scalars: `Boolean`, `Int8`..`Int64`, `Uint8`..`Uint64`, `Float32`, `Float64`,
//!   `String`, `Date`, `DateTime`, `Color`, `Point`, `Rect`, `Image`, ...
//! - One argument: `List[T]`, `Vector[T]`, `LinkedList[T]`
//! - Two arguments: `Map[K,V]`, `Hash[K,V]`, `Pair[A,B]`
//! - Arbitrarily nested: `Map[List[String],List[Int32]]`
//!
//! ## Example DSL
//!
//! ```text
//! schema Notes 2
//!
//! object Folder {
//!   title String
//!   tags List[String]
//!   Note
//! }
//!
//! object Note {
//!   text String
//!   meta Map[String,Variant]
//! }
//! ```
//!
//! ## Usage
//!
//! ```
//! let doc = objdsl::compile("object Foo { name String }").expect("valid schema");
//! assert!(doc.get_object("Foo").is_some());
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod types;
pub mod verify;

use anyhow::Context;
use std::path::Path;

pub use ast::{Document, Object, Property};
pub use error::{Diagnostics, Error, ParseError, ResolutionError, VerifyError};
pub use parser::parse;
pub use render::{render_type, required_includes};
pub use types::{resolve, TypeDescriptor};
pub use verify::{verify, VerifiedDocument, VerifiedObject, VerifiedProperty};

/// Parse and verify source text in one step.
pub fn compile(source: &str) -> Result<VerifiedDocument, Error> {
    let doc = parse(source)?;
    Ok(verify(doc)?)
}

/// Read a schema file and [`compile`] it.
pub fn compile_file(path: impl AsRef<Path>) -> anyhow::Result<VerifiedDocument> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    compile(&source).with_context(|| format!("compiling {}", path.display()))
}

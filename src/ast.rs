//! Unresolved syntax tree produced by the parser.
//!
//! Property types are kept as raw token sequences; they are interpreted by
//! [`types::resolve`](crate::types::resolve) during verification.

use crate::lexer::{Position, Token};
use std::collections::BTreeMap;

/// Root of one parsed source file.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub schema_name: Option<String>,
    pub schema_version: Option<u64>,
    pub objects: BTreeMap<String, Object>,
}

impl Document {
    pub fn get_object(&self, name: &str) -> Option<&Object> {
        self.objects.get(name)
    }
}

/// `object Name { ... }` declaration.
#[derive(Debug, Clone)]
pub struct Object {
    pub name: String,
    pub pos: Position,
    pub properties: Vec<Property>,
    /// Child references (`Name` members), in declaration order.
    pub children: Vec<Token>,
}

impl Object {
    pub fn child_names(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|c| c.text.as_str())
    }
}

/// `ident type-tokens...` member.
#[derive(Debug, Clone)]
pub struct Property {
    pub name: String,
    pub pos: Position,
    /// Non-empty; everything after the name up to end of line.
    pub raw_type: Vec<Token>,
}

impl Property {
    /// Raw type tokens joined without separators, e.g. `Map[String,Int32]`.
    pub fn raw_type_text(&self) -> String {
        self.raw_type.iter().map(|t| t.text.as_str()).collect()
    }
}

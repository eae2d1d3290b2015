//! Verify a parsed [`Document`]: resolve every property type, check every
//! child reference and derive the reverse containment map.

use crate::ast::Document;
use crate::error::{Diagnostics, VerifyError};
use crate::types::{self, TypeDescriptor};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Document that passed verification: every type resolved, every child declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedDocument {
    pub schema_name: Option<String>,
    pub schema_version: Option<u64>,
    pub objects: BTreeMap<String, VerifiedObject>,
    /// Object name → names of the objects that declare it as a child.
    pub parented_by: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedObject {
    pub name: String,
    pub properties: Vec<VerifiedProperty>,
    pub children: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedProperty {
    pub name: String,
    /// Source spelling, e.g. `Map[String,Int32]`.
    pub raw_type: String,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
}

impl VerifiedDocument {
    pub fn get_object(&self, name: &str) -> Option<&VerifiedObject> {
        self.objects.get(name)
    }

    /// Parents of `name`, empty if nothing contains it.
    pub fn parents_of(&self, name: &str) -> impl Iterator<Item = &str> {
        self.parented_by
            .get(name)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }
}

impl VerifiedObject {
    pub fn get_property(&self, name: &str) -> Option<&VerifiedProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Reverse containment map: for every object `o` and child `c` of `o`, `o ∈ result[c]`.
pub fn parented_by(doc: &Document) -> BTreeMap<String, BTreeSet<String>> {
    let mut out: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for object in doc.objects.values() {
        for child in object.child_names() {
            out.entry(child.to_string())
                .or_default()
                .insert(object.name.clone());
        }
    }
    out
}

/// Verify `doc`, collecting every error in source order.
pub fn verify(doc: Document) -> Result<VerifiedDocument, Diagnostics<VerifyError>> {
    let mut errors = Vec::new();
    let mut objects = BTreeMap::new();

    for object in doc.objects.values() {
        for child in &object.children {
            if !doc.objects.contains_key(&child.text) {
                errors.push(VerifyError::UnknownChild {
                    pos: child.pos,
                    child: child.text.clone(),
                    parent: object.name.clone(),
                });
            }
        }

        let mut properties = Vec::with_capacity(object.properties.len());
        for property in &object.properties {
            match types::resolve(&property.raw_type) {
                Ok(ty) => properties.push(VerifiedProperty {
                    name: property.name.clone(),
                    raw_type: property.raw_type_text(),
                    ty,
                }),
                Err(reason) => errors.push(VerifyError::UnknownType {
                    pos: property.pos,
                    raw: property.raw_type_text(),
                    object: object.name.clone(),
                    property: property.name.clone(),
                    reason,
                }),
            }
        }

        objects.insert(
            object.name.clone(),
            VerifiedObject {
                name: object.name.clone(),
                properties,
                children: object.child_names().map(str::to_string).collect(),
            },
        );
    }

    if !errors.is_empty() {
        errors.sort_by_key(VerifyError::pos);
        tracing::debug!(errors = errors.len(), "verification failed");
        return Err(errors.into());
    }

    let parented_by = parented_by(&doc);
    tracing::debug!(
        objects = objects.len(),
        contained = parented_by.len(),
        "document verified"
    );
    Ok(VerifiedDocument {
        schema_name: doc.schema_name,
        schema_version: doc.schema_version,
        objects,
        parented_by,
    })
}

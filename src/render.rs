//! Spell resolved types in the generated-code representation.
//!
//! The code generator consumes these strings verbatim: container arguments
//! are joined by a bare comma (`QMap<QString,qint32>`).

use crate::types::TypeDescriptor;
use crate::verify::VerifiedDocument;
use std::collections::BTreeSet;

/// Target spelling of `ty`, e.g. `QList<QHash<QString,QVariant>>`.
pub fn render_type(ty: &TypeDescriptor) -> String {
    let mut out = String::new();
    write_type(ty, &mut out);
    out
}

fn write_type(ty: &TypeDescriptor, out: &mut String) {
    match ty {
        TypeDescriptor::Scalar(s) => out.push_str(s.target),
        TypeDescriptor::Container1 { container, inner } => {
            out.push_str(container.target);
            out.push('<');
            write_type(inner, out);
            out.push('>');
        }
        TypeDescriptor::Container2 {
            container,
            first,
            second,
        } => {
            out.push_str(container.target);
            out.push('<');
            write_type(first, out);
            out.push(',');
            write_type(second, out);
            out.push('>');
        }
    }
}

/// Every target class named anywhere in `ty`, outermost first.
pub fn target_names(ty: &TypeDescriptor) -> Vec<&'static str> {
    let mut out = Vec::new();
    let mut stack = vec![ty];
    while let Some(t) = stack.pop() {
        match t {
            TypeDescriptor::Scalar(s) => out.push(s.target),
            TypeDescriptor::Container1 { container, inner } => {
                out.push(container.target);
                stack.push(inner);
            }
            TypeDescriptor::Container2 {
                container,
                first,
                second,
            } => {
                out.push(container.target);
                stack.push(second);
                stack.push(first);
            }
        }
    }
    out
}

/// Headers the generated code has to include for this document's property types.
///
/// Only Qt classes need one; C primitives (`qint32`, `bool`, `const char *`) do not.
pub fn required_includes(doc: &VerifiedDocument) -> BTreeSet<&'static str> {
    doc.objects
        .values()
        .flat_map(|o| o.properties.iter())
        .flat_map(|p| target_names(&p.ty))
        .filter(|name| name.starts_with('Q'))
        .collect()
}

//! Type expressions: the closed scalar / container tables and the resolver
//! that turns a raw property token sequence into a [`TypeDescriptor`].
//!
//! ```text
//! type := Scalar
//!       | Container1 "[" type "]"
//!       | Container2 "[" type "," type "]"
//! ```
//!
//! Nesting is unbounded. Argument lists are split only at commas that sit
//! directly inside the container's own brackets, so
//! `Map[List[String],List[Int32]]` has exactly two arguments.

use crate::error::ResolutionError;
use serde::Serialize;

/// Primitive type resolved from exactly one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ScalarType {
    /// Spelling in the DSL (`Int32`).
    pub name: &'static str,
    /// Spelling in the generated code (`qint32`).
    pub target: &'static str,
}

/// Built-in generic type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Container {
    pub name: &'static str,
    pub target: &'static str,
}

const fn scalar(name: &'static str, target: &'static str) -> ScalarType {
    ScalarType { name, target }
}

const fn container(name: &'static str, target: &'static str) -> Container {
    Container { name, target }
}

pub static SCALAR_TYPES: &[ScalarType] = &[
    scalar("Boolean", "bool"),
    scalar("Int8", "qint8"),
    scalar("Int16", "qint16"),
    scalar("Int32", "qint32"),
    scalar("Int64", "qint64"),
    scalar("Uint8", "quint8"),
    scalar("Uint16", "quint16"),
    scalar("Uint32", "quint32"),
    scalar("Uint64", "quint64"),
    scalar("Float32", "float"),
    scalar("Float64", "double"),
    scalar("ConstChar", "const char *"),
    scalar("BitArray", "QBitArray"),
    scalar("Brush", "QBrush"),
    scalar("ByteArray", "QByteArray"),
    scalar("Color", "QColor"),
    scalar("Cursor", "QCursor"),
    scalar("Date", "QDate"),
    scalar("DateTime", "QDateTime"),
    scalar("EasingCurve", "QEasingCurve"),
    scalar("Font", "QFont"),
    scalar("GenericMatrix", "QGenericMatrix"),
    scalar("Icon", "QIcon"),
    scalar("Image", "QImage"),
    scalar("KeySequence", "QKeySequence"),
    scalar("Margins", "QMargins"),
    scalar("Matrix4x4", "QMatrix4x4"),
    scalar("Palette", "QPalette"),
    scalar("Pen", "QPen"),
    scalar("Picture", "QPicture"),
    scalar("Pixmap", "QPixmap"),
    scalar("Point", "QPoint"),
    scalar("Quaternion", "QQuaternion"),
    scalar("Rect", "QRect"),
    scalar("RegExp", "QRegExp"),
    scalar("RegularExpression", "QRegularExpression"),
    scalar("Region", "QRegion"),
    scalar("Size", "QSize"),
    scalar("String", "QString"),
    scalar("Time", "QTime"),
    scalar("Transform", "QTransform"),
    scalar("URL", "QUrl"),
    scalar("Variant", "QVariant"),
    scalar("Vector2D", "QVector2D"),
    scalar("Vector3D", "QVector3D"),
    scalar("Vector4D", "QVector4D"),
];

/// Containers taking one type argument.
pub static SINGLE_CONTAINERS: &[Container] = &[
    container("LinkedList", "QLinkedList"),
    container("List", "QList"),
    container("Vector", "QVector"),
];

/// Containers taking two type arguments.
pub static DUAL_CONTAINERS: &[Container] = &[
    container("Hash", "QHash"),
    container("Map", "QMap"),
    container("Pair", "QPair"),
];

impl ScalarType {
    pub fn lookup(name: &str) -> Option<ScalarType> {
        SCALAR_TYPES.iter().find(|s| s.name == name).copied()
    }
}

fn lookup_container(table: &[Container], name: &str) -> Option<Container> {
    table.iter().find(|c| c.name == name).copied()
}

/// Resolved property type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDescriptor {
    Scalar(ScalarType),
    Container1 {
        container: Container,
        inner: Box<TypeDescriptor>,
    },
    Container2 {
        container: Container,
        first: Box<TypeDescriptor>,
        second: Box<TypeDescriptor>,
    },
}

impl TypeDescriptor {
    /// DSL name of the outermost type.
    pub fn name(&self) -> &'static str {
        match self {
            TypeDescriptor::Scalar(s) => s.name,
            TypeDescriptor::Container1 { container, .. }
            | TypeDescriptor::Container2 { container, .. } => container.name,
        }
    }

    /// Nesting depth; a scalar is 0.
    pub fn depth(&self) -> usize {
        match self {
            TypeDescriptor::Scalar(_) => 0,
            TypeDescriptor::Container1 { inner, .. } => 1 + inner.depth(),
            TypeDescriptor::Container2 { first, second, .. } => {
                1 + first.depth().max(second.depth())
            }
        }
    }
}

fn join<T: AsRef<str>>(tokens: &[T]) -> String {
    tokens.iter().map(|t| t.as_ref()).collect()
}

/// Deepest container nesting [`resolve`] accepts.
pub const MAX_NESTING: usize = 64;

/// Resolve a raw type token sequence. Pure: equal input gives equal output.
///
/// Expressions nested deeper than [`MAX_NESTING`] brackets are rejected with
/// [`ResolutionError::TooDeep`] before any argument splitting happens.
pub fn resolve<T: AsRef<str>>(tokens: &[T]) -> Result<TypeDescriptor, ResolutionError> {
    if bracket_depth(tokens) > MAX_NESTING {
        return Err(ResolutionError::TooDeep { limit: MAX_NESTING });
    }
    resolve_nested(tokens)
}

/// Maximum `[` nesting seen anywhere in the sequence.
fn bracket_depth<T: AsRef<str>>(tokens: &[T]) -> usize {
    let mut depth = 0usize;
    let mut max = 0;
    for tok in tokens {
        match tok.as_ref() {
            "[" => {
                depth += 1;
                max = max.max(depth);
            }
            "]" => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}

// Recursion depth is bounded by the bracket depth checked in `resolve`.
fn resolve_nested<T: AsRef<str>>(tokens: &[T]) -> Result<TypeDescriptor, ResolutionError> {
    let (head, rest) = tokens.split_first().ok_or(ResolutionError::Empty)?;
    let head = head.as_ref();

    if rest.is_empty() {
        if let Some(s) = ScalarType::lookup(head) {
            return Ok(TypeDescriptor::Scalar(s));
        }
    }

    if let Some(container) = lookup_container(SINGLE_CONTAINERS, head) {
        let args = type_arguments(container, tokens)?;
        let [inner] = args.as_slice() else {
            return Err(arity(container, 1, args.len()));
        };
        return Ok(TypeDescriptor::Container1 {
            container,
            inner: Box::new(resolve_nested(*inner)?),
        });
    }

    if let Some(container) = lookup_container(DUAL_CONTAINERS, head) {
        let args = type_arguments(container, tokens)?;
        let [first, second] = args.as_slice() else {
            return Err(arity(container, 2, args.len()));
        };
        return Ok(TypeDescriptor::Container2 {
            container,
            first: Box::new(resolve_nested(*first)?),
            second: Box::new(resolve_nested(*second)?),
        });
    }

    Err(ResolutionError::UnknownType(join(tokens)))
}

fn arity(container: Container, expected: usize, found: usize) -> ResolutionError {
    ResolutionError::ArgumentCount {
        container: container.name.to_string(),
        expected,
        found,
    }
}

/// Split `Name [ a , b ]` into its argument token slices, brackets stripped.
///
/// Depth starts at 1 on the opening bracket; commas at depth 1 separate
/// arguments and the bracket that brings depth back to 0 must be the last
/// token.
fn type_arguments<T: AsRef<str>>(
    container: Container,
    tokens: &[T],
) -> Result<Vec<&[T]>, ResolutionError> {
    if tokens.get(1).map(|t| t.as_ref()) != Some("[") {
        return Err(ResolutionError::MissingOpenBracket {
            container: container.name.to_string(),
        });
    }

    let mut args = Vec::new();
    let mut depth = 1usize;
    let mut start = 2;
    for (i, tok) in tokens.iter().enumerate().skip(2) {
        match tok.as_ref() {
            "[" => depth += 1,
            "]" => {
                depth -= 1;
                if depth == 0 {
                    let trailing = &tokens[i + 1..];
                    if !trailing.is_empty() {
                        return Err(ResolutionError::TrailingTokens {
                            container: container.name.to_string(),
                            trailing: join(trailing),
                        });
                    }
                    args.push(&tokens[start..i]);
                    return Ok(args);
                }
            }
            "," if depth == 1 => {
                args.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    Err(ResolutionError::UnbalancedBrackets(join(tokens)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        crate::lexer::tokenize(s)
            .expect("tokenize")
            .tokens
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    fn scalar_of(name: &str) -> TypeDescriptor {
        TypeDescriptor::Scalar(ScalarType::lookup(name).expect("scalar"))
    }

    #[test]
    fn every_scalar_resolves_to_its_table_entry() {
        for s in SCALAR_TYPES {
            assert_eq!(resolve(&[s.name]), Ok(TypeDescriptor::Scalar(*s)), "{}", s.name);
        }
    }

    #[test]
    fn unknown_single_token_fails() {
        assert_eq!(
            resolve(&["Str"]),
            Err(ResolutionError::UnknownType("Str".to_string()))
        );
        assert_eq!(
            resolve(&["Foo"]),
            Err(ResolutionError::UnknownType("Foo".to_string()))
        );
    }

    #[test]
    fn empty_sequence_fails() {
        let empty: [&str; 0] = [];
        assert_eq!(resolve(&empty), Err(ResolutionError::Empty));
    }

    #[test]
    fn single_container() {
        let ty = resolve(&toks("List[Int32]")).expect("resolve");
        match ty {
            TypeDescriptor::Container1 { container, inner } => {
                assert_eq!(container.target, "QList");
                assert_eq!(*inner, scalar_of("Int32"));
            }
            other => panic!("expected Container1, got {:?}", other),
        }
    }

    #[test]
    fn triple_nesting() {
        let ty = resolve(&toks("List[Vector[LinkedList[String]]]")).expect("resolve");
        assert_eq!(ty.depth(), 3);
        let TypeDescriptor::Container1 { inner, .. } = &ty else {
            panic!("outer")
        };
        let TypeDescriptor::Container1 { inner, .. } = inner.as_ref() else {
            panic!("middle")
        };
        let TypeDescriptor::Container1 { container, inner } = inner.as_ref() else {
            panic!("inner")
        };
        assert_eq!(container.name, "LinkedList");
        assert_eq!(**inner, scalar_of("String"));
    }

    #[test]
    fn nesting_fails_when_innermost_is_unknown() {
        assert_eq!(
            resolve(&toks("List[List[List[Strin]]]")),
            Err(ResolutionError::UnknownType("Strin".to_string()))
        );
    }

    #[test]
    fn dual_container_splits_at_top_level_comma() {
        let ty = resolve(&toks("Map[List[String],List[Int32]]")).expect("resolve");
        let expected = TypeDescriptor::Container2 {
            container: lookup_container(DUAL_CONTAINERS, "Map").expect("Map"),
            first: Box::new(resolve(&toks("List[String]")).expect("first")),
            second: Box::new(resolve(&toks("List[Int32]")).expect("second")),
        };
        assert_eq!(ty, expected);
    }

    #[test]
    fn dual_container_inside_dual_container() {
        let ty = resolve(&toks("Hash[Pair[Int8,Int16],Map[String,Pair[Date,Time]]]"))
            .expect("resolve");
        let TypeDescriptor::Container2 { first, second, .. } = &ty else {
            panic!("outer")
        };
        assert_eq!(first.name(), "Pair");
        assert_eq!(second.name(), "Map");
        assert_eq!(ty.depth(), 3);
    }

    #[test]
    fn single_container_rejects_two_arguments() {
        assert_eq!(
            resolve(&toks("List[String,Int32]")),
            Err(ResolutionError::ArgumentCount {
                container: "List".to_string(),
                expected: 1,
                found: 2,
            })
        );
    }

    #[test]
    fn dual_container_rejects_wrong_arity() {
        assert!(matches!(
            resolve(&toks("Map[String]")),
            Err(ResolutionError::ArgumentCount { expected: 2, found: 1, .. })
        ));
        assert!(matches!(
            resolve(&toks("Pair[String,Int32,Int64]")),
            Err(ResolutionError::ArgumentCount { expected: 2, found: 3, .. })
        ));
    }

    #[test]
    fn malformed_brackets() {
        assert!(matches!(
            resolve(&toks("List[String")),
            Err(ResolutionError::UnbalancedBrackets(_))
        ));
        assert!(matches!(
            resolve(&toks("List[String]]")),
            Err(ResolutionError::TrailingTokens { .. })
        ));
        assert!(matches!(
            resolve(&toks("List String")),
            Err(ResolutionError::MissingOpenBracket { .. })
        ));
        assert!(matches!(
            resolve(&toks("List")),
            Err(ResolutionError::MissingOpenBracket { .. })
        ));
        assert_eq!(resolve(&toks("List[]")), Err(ResolutionError::Empty));
    }

    #[test]
    fn single_container_around_dual_container() {
        let ty = resolve(&toks("List[Map[String,Vector[Pair[Int8,Int16]]]]")).expect("resolve");
        assert_eq!(ty.depth(), 4);
        let TypeDescriptor::Container1 { container, inner } = &ty else {
            panic!("expected List, got {:?}", ty)
        };
        assert_eq!(container.name, "List");
        let TypeDescriptor::Container2 { first, second, .. } = inner.as_ref() else {
            panic!("expected Map, got {:?}", inner)
        };
        assert_eq!(**first, scalar_of("String"));
        assert_eq!(second.name(), "Vector");
        assert_eq!(
            crate::render::render_type(&ty),
            "QList<QMap<QString,QVector<QPair<qint8,qint16>>>>"
        );
    }

    fn nested_list(levels: usize) -> Vec<String> {
        let mut src = "List[".repeat(levels);
        src.push_str("String");
        src.push_str(&"]".repeat(levels));
        toks(&src)
    }

    #[test]
    fn nesting_up_to_the_limit_resolves() {
        let ty = resolve(&nested_list(MAX_NESTING)).expect("resolve");
        assert_eq!(ty.depth(), MAX_NESTING);
    }

    #[test]
    fn nesting_past_the_limit_fails() {
        for levels in [MAX_NESTING + 1, 4000] {
            assert_eq!(
                resolve(&nested_list(levels)),
                Err(ResolutionError::TooDeep { limit: MAX_NESTING }),
                "{} levels",
                levels
            );
        }
    }

    #[test]
    fn unbalanced_deep_input_fails_without_recursing() {
        let tokens = toks(&"Map[".repeat(10_000));
        assert_eq!(resolve(&tokens), Err(ResolutionError::TooDeep { limit: MAX_NESTING }));
    }

    #[test]
    fn resolving_twice_is_identical() {
        let tokens = toks("Map[String,List[Pair[Int32,Color]]]");
        assert_eq!(resolve(&tokens), resolve(&tokens));
    }
}

//! Parse a token stream into an unresolved [`Document`].
//!
//! ```text
//! document    := (schema_decl | object_decl)*
//! schema_decl := "schema" Name Number
//! object_decl := "object" Name "{" member* "}"
//! member      := Name | ident type_tokens_to_EOL
//! ```
//!
//! Errors are collected rather than aborting: after a failed declaration the
//! parser skips to the end of that object and carries on, so one run reports
//! every syntax error in the file.

use crate::ast::{Document, Object, Property};
use crate::error::{Diagnostics, ParseError};
use crate::lexer::{self, Position, Token, TokenKind};

/// Parse DSL source into a [`Document`].
pub fn parse(source: &str) -> Result<Document, Diagnostics<ParseError>> {
    let tokens = lexer::tokenize(source).map_err(|e| Diagnostics::from(vec![e]))?;
    Parser::new(&tokens.tokens, tokens.end).parse_document()
}

struct Cursor<'t> {
    tokens: &'t [Token],
    index: usize,
    end: Position,
}

impl<'t> Cursor<'t> {
    fn peek_raw(&self) -> Option<&'t Token> {
        self.tokens.get(self.index)
    }

    fn advance(&mut self) {
        self.index += 1;
    }

    /// Next significant token; newlines are skipped.
    fn next(&mut self) -> Option<&'t Token> {
        while let Some(tok) = self.peek_raw() {
            self.advance();
            if tok.kind != TokenKind::Newline {
                return Some(tok);
            }
        }
        None
    }

    fn next_no_eof(&mut self, expected: &str) -> Result<&'t Token, ParseError> {
        self.next().ok_or_else(|| ParseError::UnexpectedEof {
            pos: self.end,
            expected: expected.to_string(),
        })
    }

    fn expect_kind(&mut self, kind: TokenKind, expected: &str) -> Result<&'t Token, ParseError> {
        let tok = self.next_no_eof(expected)?;
        if tok.kind != kind {
            self.put_back_keyword(tok);
            return Err(ParseError::Lex {
                pos: tok.pos,
                found: tok.text.clone(),
                expected: expected.to_string(),
            });
        }
        Ok(tok)
    }

    fn expect_name(&mut self) -> Result<&'t Token, ParseError> {
        self.expect_kind(TokenKind::Name, "name")
    }

    fn expect_number(&mut self) -> Result<u64, ParseError> {
        let tok = self.expect_kind(TokenKind::Number, "number")?;
        tok.text.parse().map_err(|_| ParseError::NumberOutOfRange {
            pos: tok.pos,
            found: tok.text.clone(),
        })
    }

    fn expect_punct(&mut self, p: &str) -> Result<&'t Token, ParseError> {
        let expected = format!("'{}'", p);
        let tok = self.next_no_eof(&expected)?;
        if !tok.is_punct(p) {
            self.put_back_keyword(tok);
            return Err(ParseError::Syntax {
                pos: tok.pos,
                expected,
                found: tok.text.clone(),
            });
        }
        Ok(tok)
    }

    /// Undo the `next` that returned `tok` when it is a declaration keyword
    /// opening a line, so recovery resumes at that declaration.
    fn put_back_keyword(&mut self, tok: &Token) {
        if tok.is_keyword() && self.index > 0 && self.starts_line(self.index - 1) {
            self.index -= 1;
        }
    }

    fn starts_line(&self, i: usize) -> bool {
        i == 0 || self.tokens[i - 1].kind == TokenKind::Newline
    }

    /// Tokens up to (not including) the end of the line or a `}` closing the object.
    fn scan_to_eol(&mut self) -> Vec<Token> {
        let mut out = Vec::new();
        while let Some(tok) = self.peek_raw() {
            if tok.kind == TokenKind::Newline || tok.is_punct("}") {
                break;
            }
            out.push(tok.clone());
            self.advance();
        }
        out
    }
}

struct Parser<'t> {
    cursor: Cursor<'t>,
    document: Document,
    errors: Vec<ParseError>,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token], end: Position) -> Self {
        Parser {
            cursor: Cursor {
                tokens,
                index: 0,
                end,
            },
            document: Document::default(),
            errors: Vec::new(),
        }
    }

    fn parse_document(mut self) -> Result<Document, Diagnostics<ParseError>> {
        while let Some(tok) = self.cursor.next() {
            let result = match (tok.kind, tok.text.as_str()) {
                (TokenKind::Ident, "schema") => self.parse_schema(),
                (TokenKind::Ident, "object") => self.parse_object().map(|o| self.insert_object(o)),
                _ => Err(ParseError::Syntax {
                    pos: tok.pos,
                    expected: "'object' or 'schema' declaration".to_string(),
                    found: tok.text.clone(),
                }),
            };
            if let Err(e) = result {
                tracing::debug!(error = %e, "parse error, skipping to next declaration");
                self.errors.push(e);
                self.recover();
            }
        }
        if self.errors.is_empty() {
            Ok(self.document)
        } else {
            Err(self.errors.into())
        }
    }

    fn parse_schema(&mut self) -> Result<(), ParseError> {
        let name = self.cursor.expect_name()?;
        let version = self.cursor.expect_number()?;
        if let Some(previous) = &self.document.schema_name {
            tracing::warn!(
                pos = %name.pos,
                previous = %previous,
                replacement = %name.text,
                "schema declared more than once, later declaration wins"
            );
        }
        self.document.schema_name = Some(name.text.clone());
        self.document.schema_version = Some(version);
        Ok(())
    }

    fn parse_object(&mut self) -> Result<Object, ParseError> {
        let name = self.cursor.expect_name()?;
        self.cursor.expect_punct("{")?;
        let mut object = Object {
            name: name.text.clone(),
            pos: name.pos,
            properties: Vec::new(),
            children: Vec::new(),
        };
        loop {
            let tok = self.cursor.next_no_eof("'}'")?;
            match tok.kind {
                TokenKind::Punct if tok.text == "}" => break,
                TokenKind::Name => object.children.push(tok.clone()),
                TokenKind::Ident => {
                    let raw_type = self.cursor.scan_to_eol();
                    if raw_type.is_empty() {
                        return Err(ParseError::MissingType {
                            pos: tok.pos,
                            property: tok.text.clone(),
                        });
                    }
                    object.properties.push(Property {
                        name: tok.text.clone(),
                        pos: tok.pos,
                        raw_type,
                    });
                }
                _ => {
                    return Err(ParseError::Syntax {
                        pos: tok.pos,
                        expected: "child object name or property identifier".to_string(),
                        found: tok.text.clone(),
                    })
                }
            }
        }
        tracing::debug!(
            object = %object.name,
            properties = object.properties.len(),
            children = object.children.len(),
            "parsed object"
        );
        Ok(object)
    }

    fn insert_object(&mut self, object: Object) {
        if let Some(first) = self.document.objects.get(&object.name) {
            self.errors.push(ParseError::DuplicateObject {
                pos: object.pos,
                name: object.name,
                first: first.pos,
            });
            return;
        }
        self.document.objects.insert(object.name.clone(), object);
    }

    /// Skip past the closing `}` of the current object, or up to the next
    /// declaration keyword that starts a line.
    fn recover(&mut self) {
        let mut line_start = self.cursor.starts_line(self.cursor.index);
        while let Some(tok) = self.cursor.peek_raw() {
            match tok.kind {
                TokenKind::Newline => line_start = true,
                _ if line_start && tok.is_keyword() => return,
                TokenKind::Punct if tok.text == "}" => {
                    self.cursor.advance();
                    return;
                }
                _ => line_start = false,
            }
            self.cursor.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_source() {
        let doc = parse("").expect("empty source parses");
        assert!(doc.objects.is_empty());
        assert!(doc.schema_name.is_none());
    }

    #[test]
    fn parse_single_line_object() {
        let doc = parse("object Foo { name String }").expect("parse");
        let foo = doc.get_object("Foo").expect("Foo");
        assert_eq!(foo.properties.len(), 1);
        assert_eq!(foo.properties[0].name, "name");
        assert_eq!(foo.properties[0].raw_type_text(), "String");
    }

    #[test]
    fn property_type_runs_to_end_of_line() {
        let src = "object Foo {\n\tmapping Map[String, List[Int32]]\n\tChild\n}\nobject Child {\n}\n";
        let doc = parse(src).expect("parse");
        let foo = doc.get_object("Foo").expect("Foo");
        assert_eq!(foo.properties[0].raw_type_text(), "Map[String,List[Int32]]");
        assert_eq!(foo.child_names().collect::<Vec<_>>(), ["Child"]);
    }

    #[test]
    fn schema_second_declaration_overwrites() {
        let doc = parse("schema First 1\nschema Second 2\n").expect("parse");
        assert_eq!(doc.schema_name.as_deref(), Some("Second"));
        assert_eq!(doc.schema_version, Some(2));
    }

    #[test]
    fn missing_type_is_reported_at_the_property() {
        let err = parse("object Foo {\n\tbadfield\n}\n").unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(matches!(
            &err.errors()[0],
            ParseError::MissingType { pos, property } if property == "badfield" && pos.line == 2
        ));
    }

    #[test]
    fn unexpected_eof_inside_object() {
        let err = parse("object Foo {\n\tname String\n").unwrap_err();
        assert!(matches!(err.errors()[0], ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn schema_version_must_be_a_number() {
        let err = parse("schema Example abc").unwrap_err();
        assert!(matches!(
            &err.errors()[0],
            ParseError::Lex { found, expected, .. } if found == "abc" && expected == "number"
        ));
    }

    #[test]
    fn schema_version_overflow() {
        let err = parse("schema Example 410297319824612897361").unwrap_err();
        assert!(matches!(err.errors()[0], ParseError::NumberOutOfRange { .. }));
    }

    #[test]
    fn object_name_must_be_a_name() {
        let err = parse("object foo { }").unwrap_err();
        assert!(matches!(
            &err.errors()[0],
            ParseError::Lex { found, expected, .. } if found == "foo" && expected == "name"
        ));
    }

    #[test]
    fn top_level_garbage_is_a_syntax_error() {
        let err = parse("struct Foo { }").unwrap_err();
        assert!(matches!(
            &err.errors()[0],
            ParseError::Syntax { found, .. } if found == "struct"
        ));
    }

    #[test]
    fn recovers_and_reports_every_broken_object() {
        let src = "object A {\n\tbroken\n}\nobject B {\n\tname String\n}\nobject C {\n\t42 String\n}\n";
        let err = parse(src).unwrap_err();
        assert_eq!(err.len(), 2, "{}", err);
        assert_eq!(err.errors()[0].pos().map(|p| p.line), Some(2));
        assert_eq!(err.errors()[1].pos().map(|p| p.line), Some(8));
    }

    #[test]
    fn keyword_in_place_of_brace_starts_next_object() {
        let src = "object Foo\nobject Bar {\n\t42\n}\n";
        let err = parse(src).unwrap_err();
        assert_eq!(err.len(), 2, "{}", err);
        assert!(matches!(
            &err.errors()[0],
            ParseError::Syntax { found, pos, .. } if found == "object" && pos.line == 2
        ));
        assert!(matches!(
            &err.errors()[1],
            ParseError::Syntax { found, pos, .. } if found == "42" && pos.line == 3
        ));
    }

    #[test]
    fn keyword_on_same_line_is_skipped() {
        let err = parse("object Foo object Bar {\n}\n").unwrap_err();
        assert_eq!(err.len(), 1, "{}", err);
    }

    #[test]
    fn duplicate_object_keeps_first_and_reports() {
        let src = "object Foo {\n\ta String\n}\nobject Foo {\n\tb String\n}\n";
        let err = parse(src).unwrap_err();
        assert_eq!(err.len(), 1);
        match &err.errors()[0] {
            ParseError::DuplicateObject { name, pos, first } => {
                assert_eq!(name, "Foo");
                assert_eq!(first.line, 1);
                assert_eq!(pos.line, 4);
            }
            other => panic!("expected DuplicateObject, got {:?}", other),
        }
    }
}

//! Parsing of `@tag(key: value ...)` parameter lists into directives.
//!
//! The grammar is deliberately small:
//!
//! ```text
//! args   := "" | "(" pair* ")"
//! pair   := key ws* ":" ws* value (ws | ",")*
//! key    := [A-Za-z0-9_-]+
//! value  := '"' (escape | any)* '"' | bare
//! bare   := any character except whitespace, ',', '(', ')', '"'
//! ```
//!
//! Any deviation aborts the whole generation pass with
//! [`EnvgenError::AnnotationParse`].

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::EnvgenError;
use crate::filter::Filter;
use crate::source::{Declaration, Visibility, find_annotation};

const FRAGMENT_LEN: usize = 24;

/// Ordered key/value parameters read from an annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(IndexMap<String, String>);

impl Params {
    /// Returns the value for `key`, or `""` when absent.
    #[must_use]
    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map_or("", String::as_str)
    }

    /// Returns `true` when `key` was given explicitly.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns `true` when no parameters were given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates parameters in the order they were written.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A parameter-list syntax error, before it is tied to a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamError {
    /// What was expected at the failure point.
    pub message: String,
    /// Source text starting where parsing stopped.
    pub fragment: String,
}

/// Parses the text following a tag, for example `(prefix: "PG" ctor: main)`.
///
/// # Errors
///
/// Returns a [`ParamError`] describing the first syntax problem.
pub fn parse_params(args: &str) -> Result<Params, ParamError> {
    let mut cursor = Cursor::new(args.trim());
    let mut params = IndexMap::new();
    if cursor.at_end() {
        return Ok(Params(params));
    }
    if cursor.peek() != Some('(') {
        return Err(cursor.error("expected `(` after tag"));
    }
    cursor.bump();

    loop {
        cursor.skip_separators();
        match cursor.peek() {
            None => return Err(cursor.error("unclosed parameter list")),
            Some(')') => {
                cursor.bump();
                break;
            }
            Some(_) => {}
        }

        let key = cursor.take_while(is_key_char);
        if key.is_empty() {
            return Err(cursor.error("expected parameter name"));
        }
        cursor.skip_whitespace();
        if cursor.peek() != Some(':') {
            return Err(cursor.error(&format!("expected `:` after `{key}`")));
        }
        cursor.bump();
        cursor.skip_whitespace();

        let value = match cursor.peek() {
            Some('"') => cursor.quoted()?,
            Some(ch) if is_bare_char(ch) => cursor.take_while(is_bare_char).to_owned(),
            _ => return Err(cursor.error(&format!("missing value for `{key}`"))),
        };
        params.insert(key.to_owned(), value);
    }

    cursor.skip_whitespace();
    if !cursor.at_end() {
        return Err(cursor.error("unexpected text after parameter list"));
    }
    Ok(Params(params))
}

const fn is_key_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

fn is_bare_char(ch: char) -> bool {
    !ch.is_whitespace() && !matches!(ch, ',' | '(' | ')' | '"')
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    const fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        self.text.get(self.pos..).unwrap_or_default()
    }

    fn at_end(&self) -> bool {
        self.rest().is_empty()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        self.text.get(start..self.pos).unwrap_or_default()
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn skip_separators(&mut self) {
        self.take_while(|ch| ch.is_whitespace() || ch == ',');
    }

    fn quoted(&mut self) -> Result<String, ParamError> {
        let start = self.pos;
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                None => {
                    self.pos = start;
                    return Err(self.error("unterminated string"));
                }
                Some('"') => return Ok(value),
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(escaped @ ('"' | '\\')) => value.push(escaped),
                    Some(other) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => {
                        self.pos = start;
                        return Err(self.error("unterminated string"));
                    }
                },
                Some(ch) => value.push(ch),
            }
        }
    }

    fn error(&self, message: &str) -> ParamError {
        let fragment: String = self.rest().chars().take(FRAGMENT_LEN).collect();
        ParamError {
            message: message.to_owned(),
            fragment: if fragment.is_empty() {
                self.text.to_owned()
            } else {
                fragment
            },
        }
    }
}

/// Parsed metadata for one field of a matched declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMeta {
    /// Rust identifier used when constructing the struct, `r#` included.
    pub ident: String,
    /// Unprefixed field name, the source of the default variable name.
    pub name: String,
    /// Parameters from the field's tag; empty when the field is untagged.
    pub metadata: Params,
}

/// One matched annotation occurrence and the declaration it sits on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Parameters from the declaration-level tag.
    pub params: Params,
    /// The tagged declaration.
    pub declaration: Declaration,
    /// Field metadata, in declaration order.
    pub fields: Vec<FieldMeta>,
}

impl Directive {
    /// Builds a directive from a declaration that passed the filter chain.
    ///
    /// # Errors
    ///
    /// Returns [`EnvgenError::AnnotationParse`] when the declaration's tag
    /// or any field tag is malformed.
    pub fn extract(declaration: Declaration, tag: &str) -> Result<Self, EnvgenError> {
        let params = match find_annotation(&declaration.annotations, tag) {
            Some(annotation) => parse_params(&annotation.args)
                .map_err(|err| annotation_error(declaration.qualified_name(), err))?,
            None => Params::default(),
        };

        let mut fields = Vec::with_capacity(declaration.fields.len());
        for field in &declaration.fields {
            let metadata = match find_annotation(&field.annotations, tag) {
                Some(annotation) => parse_params(&annotation.args).map_err(|err| {
                    annotation_error(
                        format!("{}.{}", declaration.qualified_name(), field.name),
                        err,
                    )
                })?,
                None => Params::default(),
            };
            if field.visibility == Visibility::Private && declaration.package != "crate" {
                warn!(
                    declaration = %declaration.qualified_name(),
                    field = %field.name,
                    "private field; the generated loader cannot set it from another module"
                );
            }
            fields.push(FieldMeta {
                ident: field.ident.clone(),
                name: field.name.clone(),
                metadata,
            });
        }

        Ok(Self {
            params,
            declaration,
            fields,
        })
    }

    /// Declaration name, for example `PostgresConfig`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.declaration.name
    }

    /// Module path owning the declaration.
    #[must_use]
    pub fn package(&self) -> &str {
        &self.declaration.package
    }
}

fn annotation_error(declaration: String, err: ParamError) -> EnvgenError {
    EnvgenError::AnnotationParse {
        declaration,
        fragment: err.fragment,
        message: err.message,
    }
}

/// Runs `filter` over `declarations` and extracts a directive for each match.
///
/// Output preserves the input order.
///
/// # Errors
///
/// Fails on the first malformed annotation; no partial result is returned.
pub fn extract_directives(
    declarations: Vec<Declaration>,
    filter: &dyn Filter,
    tag: &str,
) -> Result<Vec<Directive>, EnvgenError> {
    declarations
        .into_iter()
        .filter(|decl| filter.matches(decl))
        .map(|decl| {
            debug!(declaration = %decl.qualified_name(), tag, "matched directive");
            Directive::extract(decl, tag)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    //! Tests for parameter-list parsing and directive extraction.

    use super::*;
    use crate::filter::Filters;
    use crate::source::{Annotation, DeclarationKind, FieldDecl, Visibility};
    use camino::Utf8PathBuf;
    use rstest::rstest;

    #[rstest]
    #[case::empty("", &[])]
    #[case::empty_list("()", &[])]
    #[case::quoted("(prefix: \"PG\")", &[("prefix", "PG")])]
    #[case::bare("(prefix:PG ctor:primary)", &[("prefix", "PG"), ("ctor", "primary")])]
    #[case::commas("( prefix : \"PG\" , ctor: \"read only\" )", &[("prefix", "PG"), ("ctor", "read only")])]
    #[case::escapes(r#"(default: "say \"hi\"")"#, &[("default", "say \"hi\"")])]
    #[case::empty_string("(default: \"\")", &[("default", "")])]
    fn parses_parameter_lists(#[case] args: &str, #[case] expected: &[(&str, &str)]) {
        let params = parse_params(args).expect("valid parameters");
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, expected);
    }

    #[rstest]
    #[case::no_paren("prefix: PG", "expected `(`")]
    #[case::unclosed("(prefix: PG", "unclosed")]
    #[case::missing_colon("(prefix PG)", "expected `:`")]
    #[case::missing_value("(prefix: )", "missing value")]
    #[case::unterminated("(prefix: \"PG)", "unterminated")]
    #[case::trailing("(prefix: PG) extra", "unexpected text")]
    #[case::bad_key("(: PG)", "expected parameter name")]
    fn rejects_malformed_lists(#[case] args: &str, #[case] needle: &str) {
        let err = parse_params(args).expect_err("malformed parameters");
        assert!(
            err.message.contains(needle),
            "`{}` should mention `{needle}`",
            err.message
        );
        assert!(!err.fragment.is_empty());
    }

    #[rstest]
    fn missing_keys_read_as_empty() {
        let params = parse_params("(prefix: PG)").expect("valid parameters");
        assert_eq!(params.get("ctor"), "");
        assert!(!params.contains("ctor"));
    }

    fn declaration(name: &str, struct_args: &str, field_args: &str) -> Declaration {
        Declaration {
            name: name.to_owned(),
            visibility: Visibility::Public,
            kind: DeclarationKind::Record,
            package: "crate::db".to_owned(),
            file: Utf8PathBuf::from("src/db.rs"),
            annotations: vec![Annotation {
                tag: "@envconfig".to_owned(),
                args: struct_args.to_owned(),
            }],
            fields: vec![
                FieldDecl {
                    ident: "host".to_owned(),
                    name: "host".to_owned(),
                    visibility: Visibility::Public,
                    annotations: vec![Annotation {
                        tag: "@envconfig".to_owned(),
                        args: field_args.to_owned(),
                    }],
                },
                FieldDecl {
                    ident: "r#type".to_owned(),
                    name: "type".to_owned(),
                    visibility: Visibility::Public,
                    annotations: Vec::new(),
                },
            ],
        }
    }

    #[rstest]
    fn extracts_struct_and_field_metadata() {
        let directive = Directive::extract(
            declaration("PostgresConfig", "(prefix: PG)", "(default: localhost)"),
            "@envconfig",
        )
        .expect("directive");

        assert_eq!(directive.params.get("prefix"), "PG");
        assert_eq!(directive.name(), "PostgresConfig");
        assert_eq!(directive.package(), "crate::db");
        let host = directive.fields.first().expect("host field");
        assert_eq!(host.metadata.get("default"), "localhost");
        let kind = directive.fields.get(1).expect("type field");
        assert_eq!((kind.ident.as_str(), kind.name.as_str()), ("r#type", "type"));
        assert!(kind.metadata.is_empty());
    }

    #[rstest]
    fn malformed_field_metadata_names_the_field() {
        let err = Directive::extract(
            declaration("PostgresConfig", "(prefix: PG)", "(default localhost)"),
            "@envconfig",
        )
        .expect_err("malformed field tag");

        match err {
            EnvgenError::AnnotationParse { declaration, .. } => {
                assert_eq!(declaration, "crate::db::PostgresConfig.host");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    fn one_broken_directive_fails_the_whole_extraction() {
        let decls = vec![
            declaration("First", "(prefix: A)", ""),
            declaration("Broken", "(prefix", ""),
        ];
        let result = extract_directives(decls, &Filters::for_tag("@envconfig"), "@envconfig");
        assert!(matches!(result, Err(EnvgenError::AnnotationParse { .. })));
    }
}

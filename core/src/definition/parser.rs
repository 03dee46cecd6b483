use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

use crate::String;
use crate::definition::document::{Element, Field, Literal, LiteralKind};
use crate::definition::error::convert_pest_error;
use crate::definition::{DefinitionError, DefinitionErrorKind, Span};

#[derive(Parser)]
#[grammar = "definition/definition.pest"]
pub struct DefinitionParser;

/// Name given to the root element of every document.
pub const ROOT: &str = "document";

/// Parse a definition document into an untyped element tree.
pub fn parse_document(source: &str) -> Result<Element, DefinitionError> {
    let mut pairs = DefinitionParser::parse(Rule::document, source).map_err(convert_pest_error)?;
    let document = pairs.next().ok_or_else(|| {
        DefinitionError::new(
            DefinitionErrorKind::Syntax {
                message: "empty parse tree".into(),
            },
            Span(0..source.len()),
        )
    })?;

    let mut root = Element::new(ROOT, document.as_span().into());
    for pair in document.into_inner() {
        add_item(&mut root, pair);
    }
    Ok(root)
}

fn add_item(parent: &mut Element, pair: Pair<Rule>) {
    match pair.as_rule() {
        Rule::field => parent.fields.push(parse_field(pair)),
        Rule::element => parent.elements.push(parse_element(pair)),
        // EOI
        _ => {}
    }
}

fn parse_field(pair: Pair<Rule>) -> Field {
    let span = pair.as_span().into();
    let mut inner = pair.into_inner();
    let name = inner.next().map(|p| p.as_str().into()).unwrap_or_default();
    let value = inner.next().map(parse_literal).unwrap_or_else(|| Literal {
        kind: LiteralKind::String,
        text: String::new(),
        span: Span::default(),
    });
    Field { name, value, span }
}

fn parse_element(pair: Pair<Rule>) -> Element {
    let span: Span = pair.as_span().into();
    let mut inner = pair.into_inner();
    let name = inner.next().map(|p| p.as_str()).unwrap_or_default();
    let mut element = Element::new(name, span);

    for pair in inner {
        match pair.as_rule() {
            Rule::string | Rule::integer | Rule::ident => {
                element.parameters.push(parse_literal(pair))
            }
            _ => add_item(&mut element, pair),
        }
    }
    element
}

fn parse_literal(pair: Pair<Rule>) -> Literal {
    let span = pair.as_span().into();
    match pair.as_rule() {
        Rule::string => {
            let raw = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");
            Literal {
                kind: LiteralKind::String,
                text: unescape(raw),
                span,
            }
        }
        Rule::integer => Literal {
            kind: LiteralKind::Integer,
            text: pair.as_str().into(),
            span,
        },
        _ => Literal {
            kind: LiteralKind::Identifier,
            text: pair.as_str().into(),
            span,
        },
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        // The grammar only admits these four escapes.
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

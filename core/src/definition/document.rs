//! Untyped element tree produced by the definition parser.
//!
//! The tree knows nothing about VMs: it only records which fields, positional
//! parameters and nested elements were written, together with their spans.
//! The schema in [`super::schema`] gives the tree its meaning.

use crate::definition::Span;
use crate::{String, Vec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    String,
    Integer,
    Identifier,
}

/// A scalar written in the document. `text` is unescaped for strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub text: String,
    pub span: Span,
}

impl Literal {
    pub fn value(&self) -> &str {
        &self.text
    }
}

/// `name = value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: Literal,
    pub span: Span,
}

impl Field {
    pub fn value(&self) -> &str {
        self.value.value()
    }
}

/// `name param... { items }`, or the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub parameters: Vec<Literal>,
    pub fields: Vec<Field>,
    pub elements: Vec<Element>,
    pub span: Span,
}

impl Element {
    pub(crate) fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            fields: Vec::new(),
            elements: Vec::new(),
            span,
        }
    }

    pub fn first_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn fields_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields.iter().filter(move |f| f.name == name)
    }

    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements.iter().filter(move |e| e.name == name)
    }

    pub fn parameter(&self, index: usize) -> Option<&Literal> {
        self.parameters.get(index)
    }
}

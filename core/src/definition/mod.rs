//! Loading of VM definition documents.
//!
//! A definition document names the VM and declares its instruction set:
//!
//! ```text
//! name = "FireVM"
//! author = "alex"
//! receiver = "vm"
//!
//! instruction "ADD" {
//!     description = "Pops two integers and pushes their sum"
//!     fuel = 3
//!     execute = add
//! }
//! ```
//!
//! Loading happens in three steps: the pest grammar produces an untyped
//! [`document::Element`] tree, the tree is checked against
//! [`schema::VM_PROTOTYPE`], and the validated tree is flattened into a
//! [`Definition`].

pub mod document;
mod error;
pub mod parser;
pub mod schema;

pub use error::{DefinitionError, DefinitionErrorKind, Span};

use crate::{String, Vec};
use document::{Element, Literal, LiteralKind};

/// A validated definition document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    pub author: String,
    pub receiver: String,
    /// Declarations in document order.
    pub instructions: Vec<InstructionDecl>,
}

/// One `instruction` element, before any name resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionDecl {
    pub opcode: String,
    pub description: String,
    /// Either an integer or the name of a fuel function.
    pub fuel: String,
    /// How `fuel` was written. Integer literals are never function names.
    pub fuel_kind: LiteralKind,
    pub execute: String,
    pub span: Span,
}

impl Definition {
    /// Parse and validate a definition document.
    pub fn parse(source: &str) -> Result<Self, DefinitionError> {
        let document = parser::parse_document(source)?;
        schema::VM_PROTOTYPE.validate(&document)?;
        let definition = Self::from_document(&document)?;
        tracing::debug!(
            name = %definition.name,
            instructions = definition.instructions.len(),
            "Loaded definition"
        );
        Ok(definition)
    }

    /// Read, parse and validate a definition document from disk.
    #[cfg(feature = "std")]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, DefinitionError> {
        Self::parse(&read_source(path.as_ref())?)
    }

    fn from_document(document: &Element) -> Result<Self, DefinitionError> {
        let instructions = document
            .elements_named("instruction")
            .map(|element| {
                let fuel = field_literal(element, "fuel")?;
                Ok(InstructionDecl {
                    opcode: parameter_text(element)?,
                    description: field_text(element, "description")?,
                    fuel: fuel.text.clone(),
                    fuel_kind: fuel.kind,
                    execute: field_text(element, "execute")?,
                    span: element.span.clone(),
                })
            })
            .collect::<Result<_, DefinitionError>>()?;

        Ok(Definition {
            name: field_text(document, "name")?,
            author: field_text(document, "author")?,
            receiver: field_text(document, "receiver")?,
            instructions,
        })
    }
}

/// Read a definition source, mapping I/O failures to `DefinitionError`.
#[cfg(feature = "std")]
pub fn read_source(path: &std::path::Path) -> Result<String, DefinitionError> {
    std::fs::read_to_string(path).map_err(|err| {
        tracing::warn!(path = %path.display(), error = %err, "Cannot read definition");
        DefinitionError::new(
            DefinitionErrorKind::Io {
                path: path.display().to_string(),
                message: err.to_string(),
            },
            Span::default(),
        )
    })
}

fn field_text(element: &Element, name: &str) -> Result<String, DefinitionError> {
    field_literal(element, name).map(|literal| literal.value().into())
}

fn field_literal<'a>(element: &'a Element, name: &str) -> Result<&'a Literal, DefinitionError> {
    element
        .first_field(name)
        .map(|field| &field.value)
        .ok_or_else(|| {
            DefinitionError::new(
                DefinitionErrorKind::MissingField {
                    field: name.into(),
                    element: element.name.clone(),
                },
                element.span.clone(),
            )
        })
}

fn parameter_text(element: &Element) -> Result<String, DefinitionError> {
    element
        .parameter(0)
        .map(|param| param.value().into())
        .ok_or_else(|| {
            DefinitionError::new(
                DefinitionErrorKind::ParameterCount {
                    element: element.name.clone(),
                    expected: 1,
                    found: 0,
                },
                element.span.clone(),
            )
        })
}

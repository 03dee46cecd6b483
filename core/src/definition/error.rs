use core::ops::Range;

use thiserror::Error;

use crate::String;
use crate::definition::parser::Rule;

/// A byte range into the definition source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Span(pub Range<usize>);

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span(start..end)
    }

    pub fn start(&self) -> usize {
        self.0.start
    }

    pub fn end(&self) -> usize {
        self.0.end
    }
}

impl From<pest::Span<'_>> for Span {
    fn from(span: pest::Span<'_>) -> Self {
        Span(span.start()..span.end())
    }
}

/// The definition document is missing, unreadable, or violates the schema.
///
/// Fatal to VM construction: no VM is produced when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct DefinitionError {
    pub kind: DefinitionErrorKind,
    pub span: Span,
}

/// Specific kinds of definition errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionErrorKind {
    /// The document could not be read from disk.
    #[error("cannot read definition `{path}`: {message}")]
    Io { path: String, message: String },

    /// The document is not well formed.
    #[error("syntax error: {message}")]
    Syntax { message: String },

    /// A field required by the schema is absent.
    #[error("missing required field `{field}` in {element}")]
    MissingField { field: String, element: String },

    /// A single-valued field appears more than once.
    #[error("field `{field}` declared more than once in {element}")]
    DuplicateField { field: String, element: String },

    /// A field the schema does not know about.
    #[error("unexpected field `{field}` in {element}")]
    UnexpectedField { field: String, element: String },

    /// An element the schema does not know about.
    #[error("unexpected element `{element}` in {parent}")]
    UnexpectedElement { element: String, parent: String },

    /// Wrong number of positional parameters on an element.
    #[error("`{element}` expects {expected} parameter(s), found {found}")]
    ParameterCount {
        element: String,
        expected: usize,
        found: usize,
    },

    /// A fuel field that is an integer literal but not a valid cost.
    #[error("invalid fuel cost `{value}`: costs must be non-negative")]
    InvalidFuel { value: String },

    /// Two instructions declare the same opcode.
    #[error("opcode `{opcode}` declared more than once")]
    DuplicateOpcode { opcode: String, first: Span },
}

impl DefinitionError {
    pub fn new(kind: DefinitionErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Short stable code used when rendering diagnostics.
    pub fn code(&self) -> &'static str {
        match self.kind {
            DefinitionErrorKind::Io { .. } => "D000",
            DefinitionErrorKind::Syntax { .. } => "D001",
            DefinitionErrorKind::MissingField { .. } => "D002",
            DefinitionErrorKind::DuplicateField { .. } => "D003",
            DefinitionErrorKind::UnexpectedField { .. } => "D004",
            DefinitionErrorKind::UnexpectedElement { .. } => "D005",
            DefinitionErrorKind::ParameterCount { .. } => "D006",
            DefinitionErrorKind::InvalidFuel { .. } => "D007",
            DefinitionErrorKind::DuplicateOpcode { .. } => "D008",
        }
    }

    pub fn help(&self) -> Option<&'static str> {
        match self.kind {
            DefinitionErrorKind::MissingField { .. } => Some("Add the missing field"),
            DefinitionErrorKind::DuplicateField { .. } => Some("Keep a single declaration"),
            DefinitionErrorKind::InvalidFuel { .. } => {
                Some("Use a non-negative integer or the name of a fuel function")
            }
            DefinitionErrorKind::DuplicateOpcode { .. } => {
                Some("Rename one of the instructions or remove the duplicate")
            }
            _ => None,
        }
    }
}

/// Convert a pest error into a `DefinitionError` pointing at the failure.
pub(crate) fn convert_pest_error(err: pest::error::Error<Rule>) -> DefinitionError {
    let span = match err.location {
        pest::error::InputLocation::Pos(pos) => Span(pos..pos),
        pest::error::InputLocation::Span((start, end)) => Span(start..end),
    };
    let message = match &err.variant {
        pest::error::ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => {
            let expected: crate::Vec<_> = positives.iter().map(rule_name).collect();
            crate::format!("expected {}", expected.join(" or "))
        }
        variant => variant.message().into_owned(),
    };
    DefinitionError::new(DefinitionErrorKind::Syntax { message }, span)
}

fn rule_name(rule: &Rule) -> &'static str {
    match rule {
        Rule::field => "field",
        Rule::element => "element",
        Rule::string => "string",
        Rule::integer => "integer",
        Rule::ident => "identifier",
        Rule::EOI => "end of input",
        _ => "token",
    }
}

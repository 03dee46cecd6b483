//! Prototype schema for definition documents.
//!
//! A [`Prototype`] lists the fields and nested elements an element may hold.
//! Validation is purely structural: it checks names, multiplicities and
//! parameter counts, never the meaning of values.

use crate::definition::document::Element;
use crate::definition::{DefinitionError, DefinitionErrorKind};
use crate::format;

#[derive(Debug)]
pub struct FieldRule {
    pub name: &'static str,
    pub required: bool,
    pub repeatable: bool,
}

#[derive(Debug)]
pub struct ElementRule {
    pub name: &'static str,
    /// Exact number of positional parameters.
    pub parameters: usize,
    pub prototype: &'static Prototype,
}

#[derive(Debug)]
pub struct Prototype {
    pub fields: &'static [FieldRule],
    pub elements: &'static [ElementRule],
}

const fn required(name: &'static str) -> FieldRule {
    FieldRule {
        name,
        required: true,
        repeatable: false,
    }
}

pub const INSTRUCTION_PROTOTYPE: Prototype = Prototype {
    fields: &[required("description"), required("fuel"), required("execute")],
    elements: &[],
};

/// The fixed schema every VM definition document must satisfy.
pub const VM_PROTOTYPE: Prototype = Prototype {
    fields: &[required("author"), required("name"), required("receiver")],
    elements: &[ElementRule {
        name: "instruction",
        parameters: 1,
        prototype: &INSTRUCTION_PROTOTYPE,
    }],
};

impl Prototype {
    /// Validate `element` against this prototype, reporting the first violation.
    pub fn validate(&self, element: &Element) -> Result<(), DefinitionError> {
        for field in &element.fields {
            if !self.fields.iter().any(|rule| rule.name == field.name) {
                return Err(DefinitionError::new(
                    DefinitionErrorKind::UnexpectedField {
                        field: field.name.clone(),
                        element: describe(element),
                    },
                    field.span.clone(),
                ));
            }
        }

        for rule in self.fields {
            let mut occurrences = element.fields_named(rule.name);
            if occurrences.next().is_none() {
                if rule.required {
                    return Err(DefinitionError::new(
                        DefinitionErrorKind::MissingField {
                            field: rule.name.into(),
                            element: describe(element),
                        },
                        element.span.clone(),
                    ));
                }
                continue;
            }
            if rule.repeatable {
                continue;
            }
            if let Some(duplicate) = occurrences.next() {
                return Err(DefinitionError::new(
                    DefinitionErrorKind::DuplicateField {
                        field: rule.name.into(),
                        element: describe(element),
                    },
                    duplicate.span.clone(),
                ));
            }
        }

        for child in &element.elements {
            let Some(rule) = self.elements.iter().find(|rule| rule.name == child.name) else {
                return Err(DefinitionError::new(
                    DefinitionErrorKind::UnexpectedElement {
                        element: child.name.clone(),
                        parent: describe(element),
                    },
                    child.span.clone(),
                ));
            };
            if child.parameters.len() != rule.parameters {
                return Err(DefinitionError::new(
                    DefinitionErrorKind::ParameterCount {
                        element: child.name.clone(),
                        expected: rule.parameters,
                        found: child.parameters.len(),
                    },
                    child.span.clone(),
                ));
            }
            rule.prototype.validate(child)?;
        }

        Ok(())
    }
}

fn describe(element: &Element) -> crate::String {
    match element.parameter(0) {
        Some(param) => format!("{} `{}`", element.name, param.value()),
        None => element.name.clone(),
    }
}

use alloc::sync::Arc;

use hashbrown::HashMap;

use crate::definition::document::LiteralKind;
use crate::definition::{Definition, DefinitionError, DefinitionErrorKind, InstructionDecl};
use crate::vm::instruction::{FuelCost, Instruction};
use crate::vm::{ConstructionError, HandlerKind, Registry, UnresolvedHandlerError};
use crate::{String, Vec};

/// The frozen opcode → instruction mapping of a VM.
///
/// Built once from a definition and a registry; immutable afterwards, so it
/// can be wrapped in an `Arc` and shared between VM instances.
#[derive(Debug, Clone, Default)]
pub struct OpcodeTable {
    /// Instructions in declaration order.
    instructions: Vec<Instruction>,
    index: HashMap<String, usize>,
}

impl OpcodeTable {
    /// Resolve every declaration of `definition` against `registry`.
    ///
    /// Fails on the first duplicate opcode, fuel integer outside `u64`, or handler
    /// name the registry does not provide.
    pub fn build(definition: &Definition, registry: &Registry) -> Result<Self, ConstructionError> {
        let mut table = OpcodeTable {
            instructions: Vec::with_capacity(definition.instructions.len()),
            index: HashMap::with_capacity(definition.instructions.len()),
        };

        for decl in &definition.instructions {
            if let Some(&previous) = table.index.get(decl.opcode.as_str()) {
                return Err(DefinitionError::new(
                    DefinitionErrorKind::DuplicateOpcode {
                        opcode: decl.opcode.clone(),
                        first: table.instructions[previous].span.clone(),
                    },
                    decl.span.clone(),
                )
                .into());
            }

            let instruction = resolve(decl, registry)?;
            table
                .index
                .insert(decl.opcode.clone(), table.instructions.len());
            table.instructions.push(instruction);
        }

        tracing::debug!(opcodes = table.len(), "Built opcode table");
        Ok(table)
    }

    /// Convenience for `Arc::new(OpcodeTable::build(..)?)`.
    pub fn shared(definition: &Definition, registry: &Registry) -> Result<Arc<Self>, ConstructionError> {
        Self::build(definition, registry).map(Arc::new)
    }

    pub fn get(&self, opcode: &str) -> Option<&Instruction> {
        self.lookup(opcode).map(|(_, instruction)| instruction)
    }

    pub fn contains(&self, opcode: &str) -> bool {
        self.index.contains_key(opcode)
    }

    #[inline]
    pub(crate) fn lookup(&self, opcode: &str) -> Option<(usize, &Instruction)> {
        let index = *self.index.get(opcode)?;
        Some((index, &self.instructions[index]))
    }

    pub(crate) fn index_of(&self, opcode: &str) -> Option<usize> {
        self.index.get(opcode).copied()
    }

    pub(crate) fn by_index(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instructions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }
}

fn resolve(decl: &InstructionDecl, registry: &Registry) -> Result<Instruction, ConstructionError> {
    let unresolved = |kind, name: &str| UnresolvedHandlerError {
        opcode: decl.opcode.clone(),
        kind,
        name: name.into(),
        span: decl.span.clone(),
    };

    let fuel = match decl.fuel.parse::<u64>() {
        Ok(cost) => FuelCost::Fixed(cost),
        // A number that is not a valid u64 (negative or too large) is a
        // mistake, not a function name.
        Err(_) if decl.fuel_kind == LiteralKind::Integer || is_integer(&decl.fuel) => {
            return Err(DefinitionError::new(
                DefinitionErrorKind::InvalidFuel {
                    value: decl.fuel.clone(),
                },
                decl.span.clone(),
            )
            .into());
        }
        Err(_) => {
            let cost = registry
                .fuel(&decl.fuel)
                .ok_or_else(|| unresolved(HandlerKind::Fuel, &decl.fuel))?;
            FuelCost::Function {
                name: decl.fuel.clone(),
                cost: Arc::clone(cost),
            }
        }
    };

    let execute = registry
        .execute(&decl.execute)
        .ok_or_else(|| unresolved(HandlerKind::Execute, &decl.execute))?;

    Ok(Instruction {
        opcode: decl.opcode.clone(),
        description: decl.description.clone(),
        handler: decl.execute.clone(),
        execute: Arc::clone(execute),
        fuel,
        span: decl.span.clone(),
    })
}

/// `-?[0-9]+`, the shape of an integer whatever its magnitude.
fn is_integer(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry() -> Registry {
        Registry::new()
            .with_execute("nop", |_, _| Ok(()))
            .with_fuel("double", |_, params| params.len() as u64 * 2)
    }

    fn definition(instructions: &str) -> Definition {
        Definition::parse(&crate::format!(
            "name = t author = a receiver = r\n{instructions}"
        ))
        .unwrap()
    }

    #[test]
    fn test_table_round_trips_declared_metadata() {
        let definition = definition(
            r#"
            instruction A { description = "first" fuel = 3 execute = nop }
            instruction B { description = "second" fuel = double execute = nop }
            "#,
        );
        let table = OpcodeTable::build(&definition, &registry()).unwrap();

        assert_eq!(table.len(), 2);
        let a = table.get("A").unwrap();
        assert_eq!(a.description(), "first");
        assert_eq!(a.fuel().fixed(), Some(3));
        let b = table.get("B").unwrap();
        assert_eq!(b.description(), "second");
        assert_eq!(b.fuel().function_name(), Some("double"));
        assert!(table.get("C").is_none());

        let order: Vec<_> = table.iter().map(|i| i.opcode()).collect();
        assert_eq!(order, ["A", "B"]);
    }

    #[test]
    fn test_quoted_integer_fuel_is_fixed() {
        let definition = definition(r#"instruction A { description = "" fuel = "7" execute = nop }"#);
        let table = OpcodeTable::build(&definition, &registry()).unwrap();
        assert_eq!(table.get("A").unwrap().fuel().fixed(), Some(7));
    }

    #[test]
    fn test_duplicate_opcode_is_rejected() {
        let definition = definition(
            r#"
            instruction A { description = "one" fuel = 1 execute = nop }
            instruction A { description = "two" fuel = 2 execute = nop }
            "#,
        );
        let err = OpcodeTable::build(&definition, &registry()).unwrap_err();
        let ConstructionError::Definition(err) = err else {
            panic!("expected definition error, got {err:?}");
        };
        let DefinitionErrorKind::DuplicateOpcode { opcode, first } = err.kind else {
            panic!("expected duplicate opcode");
        };
        assert_eq!(opcode, "A");
        assert_eq!(first, definition.instructions[0].span);
        assert_eq!(err.span, definition.instructions[1].span);
    }

    #[test]
    fn test_unknown_execute_handler() {
        let definition = definition(r#"instruction A { description = "" fuel = 1 execute = missing }"#);
        assert_eq!(
            OpcodeTable::build(&definition, &registry()).unwrap_err(),
            ConstructionError::UnresolvedHandler(UnresolvedHandlerError {
                opcode: "A".into(),
                kind: HandlerKind::Execute,
                name: "missing".into(),
                span: definition.instructions[0].span.clone(),
            })
        );
    }

    #[test]
    fn test_unknown_fuel_function() {
        let definition = definition(r#"instruction A { description = "" fuel = nope execute = nop }"#);
        let err = OpcodeTable::build(&definition, &registry()).unwrap_err();
        assert!(matches!(
            err,
            ConstructionError::UnresolvedHandler(UnresolvedHandlerError {
                kind: HandlerKind::Fuel,
                ..
            })
        ));
    }

    #[test]
    fn test_negative_fuel_is_invalid() {
        let definition = definition(r#"instruction A { description = "" fuel = -4 execute = nop }"#);
        let err = OpcodeTable::build(&definition, &registry()).unwrap_err();
        assert!(matches!(
            err,
            ConstructionError::Definition(DefinitionError {
                kind: DefinitionErrorKind::InvalidFuel { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_huge_fuel_is_invalid() {
        let nines = "9".repeat(42);
        for fuel in [nines.clone(), crate::format!("\"{nines}\""), "18446744073709551616".into()] {
            let definition = definition(&crate::format!(
                "instruction A {{ description = \"\" fuel = {fuel} execute = nop }}"
            ));
            let err = OpcodeTable::build(&definition, &registry()).unwrap_err();
            assert!(
                matches!(
                    err,
                    ConstructionError::Definition(DefinitionError {
                        kind: DefinitionErrorKind::InvalidFuel { .. },
                        ..
                    })
                ),
                "fuel = {fuel}: {err:?}"
            );
        }
    }

    #[test]
    fn test_largest_fuel_is_fixed() {
        let definition = definition(
            r#"instruction A { description = "" fuel = 18446744073709551615 execute = nop }"#,
        );
        let table = OpcodeTable::build(&definition, &registry()).unwrap();
        assert_eq!(table.get("A").unwrap().fuel().fixed(), Some(u64::MAX));
    }

    #[test]
    fn test_is_integer() {
        assert!(is_integer("0"));
        assert!(is_integer("-12"));
        assert!(!is_integer("-"));
        assert!(!is_integer(""));
        assert!(!is_integer("copyCost"));
        assert!(!is_integer("12a"));
    }
}

//! Markdown documentation of an instruction set.

use core::fmt;

use crate::vm::{FuelCost, OpcodeTable};
use crate::{String, ToString, Vec};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub opcode: String,
    pub description: String,
    /// Fixed cost, or the name of the fuel function.
    pub fuel: String,
}

/// One row per opcode, in declaration order.
///
/// ```
/// use vmgen_core::{Report, stdlib};
///
/// let vm = stdlib::vm().unwrap();
/// let report = Report::new(vm.table());
/// assert!(report.to_string().starts_with("| Opcode | Description | Fuel |\n"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    rows: Vec<ReportRow>,
}

impl Report {
    pub fn new(table: &OpcodeTable) -> Self {
        let rows = table
            .iter()
            .map(|instruction| ReportRow {
                opcode: instruction.opcode().into(),
                description: instruction.description().into(),
                fuel: match instruction.fuel() {
                    FuelCost::Fixed(cost) => cost.to_string(),
                    FuelCost::Function { name, .. } => name.clone(),
                },
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Write the rendered table to `path`, replacing any existing file.
    #[cfg(feature = "std")]
    pub fn write_to_file(&self, path: impl AsRef<std::path::Path>) -> std::io::Result<()> {
        std::fs::write(path, self.to_string())
    }
}

fn cell(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    write!(f, " ")?;
    for c in text.chars() {
        match c {
            '|' => write!(f, "\\|")?,
            '\n' => write!(f, "<br>")?,
            c => write!(f, "{c}")?,
        }
    }
    write!(f, " |")
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "| Opcode | Description | Fuel |")?;
        writeln!(f, "|---|---|---|")?;
        for row in &self.rows {
            write!(f, "|")?;
            cell(f, &row.opcode)?;
            cell(f, &row.description)?;
            cell(f, &row.fuel)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Definition;
    use crate::vm::Registry;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_markdown() {
        let definition = Definition::parse(
            r#"
            name = t author = a receiver = r
            instruction B { description = "Second | last" fuel = 2 execute = nop }
            instruction A { description = "Copies" fuel = copyCost execute = nop }
            "#,
        )
        .unwrap();
        let registry = Registry::new()
            .with_execute("nop", |_, _| Ok(()))
            .with_fuel("copyCost", |_, params| params.len() as u64);
        let table = OpcodeTable::build(&definition, &registry).unwrap();

        let report = Report::new(&table);

        assert_eq!(report.rows().len(), 2);
        assert_eq!(
            report.to_string(),
            "| Opcode | Description | Fuel |\n\
             |---|---|---|\n\
             | B | Second \\| last | 2 |\n\
             | A | Copies | copyCost |\n"
        );
    }

    #[test]
    fn test_empty_report() {
        let report = Report::new(&OpcodeTable::default());
        assert_eq!(report.to_string(), "| Opcode | Description | Fuel |\n|---|---|---|\n");
    }
}

use crate::{Vec, vec};

/// Execution statistics of one VM.
///
/// Counters only move forward; they are cleared by [`Stats::reset`] (exposed
/// as `Vm::reset_stats`). Fuel saturates at `u64::MAX` instead of wrapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    operations: u64,
    fuel: u64,
    /// Executions per opcode, indexed like the opcode table.
    per_opcode: Vec<u64>,
}

impl Stats {
    pub(crate) fn new(opcodes: usize) -> Self {
        Self {
            operations: 0,
            fuel: 0,
            per_opcode: vec![0; opcodes],
        }
    }

    /// Number of successfully dispatched instructions.
    pub fn operations(&self) -> u64 {
        self.operations
    }

    /// Total fuel consumed.
    pub fn fuel(&self) -> u64 {
        self.fuel
    }

    pub(crate) fn executions(&self, index: usize) -> u64 {
        self.per_opcode.get(index).copied().unwrap_or(0)
    }

    #[inline]
    pub(crate) fn record(&mut self, index: usize, cost: u64) {
        self.operations += 1;
        self.fuel = self.fuel.saturating_add(cost);
        if let Some(count) = self.per_opcode.get_mut(index) {
            *count += 1;
        }
    }

    pub fn reset(&mut self) {
        self.operations = 0;
        self.fuel = 0;
        self.per_opcode.iter_mut().for_each(|count| *count = 0);
    }
}

use thiserror::Error;

use crate::program::Program;
use crate::vm::{DispatchError, RunOptions, Vm};

/// Summary of one `Vm::run` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Instructions dispatched during this run.
    pub steps: u64,
    /// Fuel consumed during this run.
    pub fuel: u64,
    /// Whether a handler halted the VM before the program ended.
    pub halted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("instruction {pc} (`{opcode}`) failed: {source}")]
    Dispatch {
        pc: usize,
        opcode: crate::String,
        source: DispatchError,
    },

    #[error("fuel limit exceeded: used {used}, limit {limit}")]
    FuelExhausted { used: u64, limit: u64 },

    #[error("step limit of {limit} reached")]
    StepLimitExceeded { limit: u64 },

    #[error("program counter {pc} is past the end of the program ({len} instructions)")]
    ProgramCounterOutOfBounds { pc: usize, len: usize },
}

impl Vm {
    /// Drive `program` through [`Vm::dispatch`] starting at the current
    /// program counter, until it runs off the end or a handler halts.
    ///
    /// The program counter is advanced before each dispatch, so a jump
    /// handler simply overwrites it. When a dispatch fails the counter is put
    /// back on the failing instruction, so the next run retries it.
    ///
    /// Budgets from `options` only count work done by this call. The step
    /// budget is checked before an instruction is dispatched, the fuel budget
    /// after.
    pub fn run(&mut self, program: &Program, options: &RunOptions) -> Result<RunOutcome, RunError> {
        self.resume();
        let start_ops = self.stats().operations();
        let start_fuel = self.stats().fuel();
        let outcome = |vm: &Vm| RunOutcome {
            steps: vm.stats().operations().saturating_sub(start_ops),
            fuel: vm.stats().fuel().saturating_sub(start_fuel),
            halted: vm.is_halted(),
        };

        loop {
            let pc = self.program_counter();
            if self.is_halted() || pc == program.len() {
                let outcome = outcome(self);
                tracing::debug!(steps = outcome.steps, fuel = outcome.fuel, "Run finished");
                return Ok(outcome);
            }
            if let Some(limit) = options.max_steps {
                if outcome(self).steps >= limit {
                    return Err(RunError::StepLimitExceeded { limit });
                }
            }
            let Some(instruction) = program.get(pc) else {
                return Err(RunError::ProgramCounterOutOfBounds {
                    pc,
                    len: program.len(),
                });
            };

            self.jump(pc + 1);
            if let Err(source) = self.dispatch(&instruction.opcode, &instruction.params) {
                self.jump(pc);
                return Err(RunError::Dispatch {
                    pc,
                    opcode: instruction.opcode.clone(),
                    source,
                });
            }

            if let Some(limit) = options.fuel_limit {
                let used = outcome(self).fuel;
                if used > limit {
                    tracing::warn!(used, limit, "Fuel exhausted");
                    return Err(RunError::FuelExhausted { used, limit });
                }
            }
        }
    }
}

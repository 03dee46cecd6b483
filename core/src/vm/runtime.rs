use alloc::sync::Arc;

use crate::String;
use crate::definition::Definition;
use crate::vm::instruction::Instruction;
use crate::vm::{
    ConstructionError, DispatchError, ExecutionError, Memory, OpcodeTable, Registry, Stack,
    Stats, UnknownOpcodeError, Value, VmOptions,
};

/// Identity of a VM, copied verbatim from its definition document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub name: String,
    pub author: String,
    pub receiver: String,
}

impl From<&Definition> for Metadata {
    fn from(definition: &Definition) -> Self {
        Self {
            name: definition.name.clone(),
            author: definition.author.clone(),
            receiver: definition.receiver.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmState {
    Running,
    /// A handler asked the driving loop to stop.
    Halted,
    /// A memory fault happened; dispatch is refused until `reset`.
    Faulted,
}

/// A virtual machine whose instruction set comes from a definition document.
///
/// The VM owns its stack, memory, program counter and statistics. The opcode
/// table is shared and read-only.
pub struct Vm {
    metadata: Metadata,
    table: Arc<OpcodeTable>,
    options: VmOptions,
    stack: Stack<Value>,
    memory: Memory,
    program_counter: usize,
    /// Table index of the instruction being dispatched.
    current: Option<usize>,
    stats: Stats,
    state: VmState,
}

impl Vm {
    /// Build a VM with default options.
    pub fn new(definition: &Definition, registry: &Registry) -> Result<Self, ConstructionError> {
        Self::with_options(definition, registry, VmOptions::default())
    }

    pub fn with_options(
        definition: &Definition,
        registry: &Registry,
        options: VmOptions,
    ) -> Result<Self, ConstructionError> {
        let table = OpcodeTable::shared(definition, registry)?;
        Ok(Self::from_table(definition.into(), table, options))
    }

    /// Parse a definition document and build a VM from it.
    pub fn from_source(source: &str, registry: &Registry) -> Result<Self, ConstructionError> {
        Self::new(&Definition::parse(source)?, registry)
    }

    /// Load a definition document from disk and build a VM from it.
    #[cfg(feature = "std")]
    pub fn from_file(
        path: impl AsRef<std::path::Path>,
        registry: &Registry,
    ) -> Result<Self, ConstructionError> {
        Self::new(&Definition::from_file(path)?, registry)
    }

    /// Create a VM over an existing, possibly shared, opcode table.
    pub fn from_table(metadata: Metadata, table: Arc<OpcodeTable>, options: VmOptions) -> Self {
        let stats = Stats::new(table.len());
        Self {
            metadata,
            stack: Stack::new(options.max_stack_size),
            memory: Memory::new(options.initial_memory_size, options.max_memory_size),
            table,
            options,
            program_counter: 0,
            current: None,
            stats,
            state: VmState::Running,
        }
    }

    /// Execute one instruction.
    ///
    /// Statistics are updated only if the handler succeeds. A memory fault
    /// leaves the VM faulted; every later dispatch fails until [`Vm::reset`].
    pub fn dispatch(&mut self, opcode: &str, params: &[u8]) -> Result<(), DispatchError> {
        if self.state == VmState::Faulted {
            return Err(DispatchError::Faulted {
                opcode: opcode.into(),
            });
        }

        let table = Arc::clone(&self.table);
        let Some((index, instruction)) = table.lookup(opcode) else {
            tracing::debug!(opcode, "Unknown opcode");
            return Err(UnknownOpcodeError {
                opcode: opcode.into(),
            }
            .into());
        };

        tracing::trace!(opcode, params = params.len(), pc = self.program_counter, "Dispatch");
        self.current = Some(index);
        let result = instruction.execute(self, params);
        if let Err(err) = result {
            self.current = None;
            if let ExecutionError::MemoryFault(fault) = &err {
                tracing::warn!(opcode, %fault, "Memory fault");
                self.state = VmState::Faulted;
            }
            return Err(err.into());
        }

        let cost = instruction.fuel.compute(self, params);
        self.stats.record(index, cost);
        self.current = None;
        Ok(())
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn author(&self) -> &str {
        &self.metadata.author
    }

    pub fn receiver(&self) -> &str {
        &self.metadata.receiver
    }

    pub fn table(&self) -> &Arc<OpcodeTable> {
        &self.table
    }

    pub fn options(&self) -> &VmOptions {
        &self.options
    }

    pub fn stack(&self) -> &Stack<Value> {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut Stack<Value> {
        &mut self.stack
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn program_counter(&self) -> usize {
        self.program_counter
    }

    /// Move the program counter; used by control-flow handlers.
    pub fn jump(&mut self, target: usize) {
        self.program_counter = target;
    }

    /// The instruction being executed. `None` outside of `dispatch`.
    pub fn current_instruction(&self) -> Option<&Instruction> {
        self.table.by_index(self.current?)
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// How many times `opcode` was dispatched successfully.
    pub fn executions(&self, opcode: &str) -> u64 {
        self.table
            .index_of(opcode)
            .map_or(0, |index| self.stats.executions(index))
    }

    pub fn state(&self) -> VmState {
        self.state
    }

    /// Ask the driving loop to stop after the current instruction.
    pub fn halt(&mut self) {
        if self.state == VmState::Running {
            self.state = VmState::Halted;
        }
    }

    pub fn is_halted(&self) -> bool {
        self.state == VmState::Halted
    }

    pub fn is_faulted(&self) -> bool {
        self.state == VmState::Faulted
    }

    pub(crate) fn resume(&mut self) {
        if self.state == VmState::Halted {
            self.state = VmState::Running;
        }
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Return to the freshly constructed state: empty stack, initial memory,
    /// program counter 0, zeroed statistics, not halted or faulted.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.memory.reset(self.options.initial_memory_size);
        self.program_counter = 0;
        self.current = None;
        self.stats.reset();
        self.state = VmState::Running;
        tracing::debug!(name = %self.metadata.name, "VM reset");
    }
}

impl core::fmt::Debug for Vm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Vm")
            .field("metadata", &self.metadata)
            .field("opcodes", &self.table.len())
            .field("stack", &self.stack)
            .field("memory", &self.memory.len())
            .field("program_counter", &self.program_counter)
            .field("stats", &self.stats)
            .field("state", &self.state)
            .finish()
    }
}

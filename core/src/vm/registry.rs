use alloc::sync::Arc;

use hashbrown::HashMap;

use crate::String;
use crate::vm::instruction::{ExecuteFn, FuelFn};
use crate::vm::{ExecutionError, Vm};

/// Host-supplied handlers, looked up by the names a definition uses.
///
/// Execute handlers and fuel functions live in separate namespaces, so an
/// instruction may use `copy` as its handler and `copy` as its fuel function.
///
/// ```
/// use vmgen_core::{Registry, Value};
///
/// let registry = Registry::new()
///     .with_execute("push_one", |vm, _params| {
///         vm.stack_mut().push(Value::Int(1))?;
///         Ok(())
///     })
///     .with_fuel("by_length", |_vm, params| params.len() as u64);
/// assert!(registry.execute("push_one").is_some());
/// assert!(registry.fuel("push_one").is_none());
/// ```
#[derive(Clone, Default)]
pub struct Registry {
    executes: HashMap<String, ExecuteFn>,
    fuels: HashMap<String, FuelFn>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an execute handler, replacing any handler with the same name.
    pub fn register_execute<F>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&mut Vm, &[u8]) -> Result<(), ExecutionError> + Send + Sync + 'static,
    {
        self.executes.insert(name.into(), Arc::new(handler));
        self
    }

    /// Register a fuel function, replacing any function with the same name.
    pub fn register_fuel<F>(&mut self, name: impl Into<String>, cost: F) -> &mut Self
    where
        F: Fn(&Vm, &[u8]) -> u64 + Send + Sync + 'static,
    {
        self.fuels.insert(name.into(), Arc::new(cost));
        self
    }

    pub fn with_execute<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Vm, &[u8]) -> Result<(), ExecutionError> + Send + Sync + 'static,
    {
        self.register_execute(name, handler);
        self
    }

    pub fn with_fuel<F>(mut self, name: impl Into<String>, cost: F) -> Self
    where
        F: Fn(&Vm, &[u8]) -> u64 + Send + Sync + 'static,
    {
        self.register_fuel(name, cost);
        self
    }

    /// Add every handler of `other`, overriding entries with the same name.
    pub fn extend(&mut self, other: Registry) -> &mut Self {
        self.executes.extend(other.executes);
        self.fuels.extend(other.fuels);
        self
    }

    pub fn execute(&self, name: &str) -> Option<&ExecuteFn> {
        self.executes.get(name)
    }

    pub fn fuel(&self, name: &str) -> Option<&FuelFn> {
        self.fuels.get(name)
    }
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut executes: crate::Vec<_> = self.executes.keys().collect();
        let mut fuels: crate::Vec<_> = self.fuels.keys().collect();
        executes.sort();
        fuels.sort();
        f.debug_struct("Registry")
            .field("executes", &executes)
            .field("fuels", &fuels)
            .finish()
    }
}

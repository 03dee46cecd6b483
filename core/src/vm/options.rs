//! Configuration options for VMs and program runs.

/// Resource limits of one VM instance.
///
/// # Example
///
/// ```
/// use vmgen_core::VmOptions;
///
/// let options = VmOptions {
///     max_stack_size: 64,
///     ..VmOptions::default()
/// };
/// assert_eq!(options.initial_memory_size, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmOptions {
    /// Maximum number of values on the stack.
    ///
    /// Default: 1024
    pub max_stack_size: usize,

    /// Number of memory slots available before any `grow`. Values above
    /// `max_memory_size` are clamped to it.
    ///
    /// Default: 0
    pub initial_memory_size: usize,

    /// Upper bound for memory growth, in slots.
    ///
    /// Default: 65536
    pub max_memory_size: usize,
}

impl Default for VmOptions {
    fn default() -> Self {
        Self {
            max_stack_size: 1024,
            initial_memory_size: 0,
            max_memory_size: 1 << 16,
        }
    }
}

/// Budgets applied by `Vm::run` between dispatches.
///
/// The VM core meters fuel but never stops on its own; these limits are the
/// policy layered on top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Maximum fuel a single run may consume (if Some).
    ///
    /// Set to `None` for no limit (be careful with untrusted programs!).
    ///
    /// Default: None
    pub fuel_limit: Option<u64>,

    /// Maximum number of dispatched instructions (if Some).
    ///
    /// Default: None
    pub max_steps: Option<u64>,
}

impl RunOptions {
    pub fn with_fuel_limit(mut self, limit: u64) -> Self {
        self.fuel_limit = Some(limit);
        self
    }

    pub fn with_max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }
}

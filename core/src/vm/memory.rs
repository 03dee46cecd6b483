use crate::Vec;
use crate::vm::{MemoryFaultError, Value};

/// Linear, slot-addressed memory.
///
/// Memory never grows on its own: reading or writing past the current size is
/// a [`MemoryFaultError::OutOfBounds`]. Programs enlarge it explicitly with
/// [`Memory::grow`], up to the limit fixed at construction. New slots hold
/// [`Value::Nil`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    slots: Vec<Value>,
    max_size: usize,
}

impl Memory {
    /// Memory of `size` Nil slots that may grow up to `max_size`.
    ///
    /// A `size` above `max_size` is clamped to `max_size`.
    pub fn new(size: usize, max_size: usize) -> Self {
        let mut slots = Vec::new();
        slots.resize(size.min(max_size), Value::Nil);
        Self { slots, max_size }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    fn check(&self, address: usize) -> Result<(), MemoryFaultError> {
        if address >= self.slots.len() {
            return Err(MemoryFaultError::OutOfBounds {
                address,
                size: self.slots.len(),
            });
        }
        Ok(())
    }

    pub fn load(&self, address: usize) -> Result<&Value, MemoryFaultError> {
        self.check(address)?;
        Ok(&self.slots[address])
    }

    pub fn store(&mut self, address: usize, value: Value) -> Result<(), MemoryFaultError> {
        self.check(address)?;
        self.slots[address] = value;
        Ok(())
    }

    /// Add `additional` Nil slots, returning the new size.
    pub fn grow(&mut self, additional: usize) -> Result<usize, MemoryFaultError> {
        let requested = self.slots.len().saturating_add(additional);
        if requested > self.max_size {
            return Err(MemoryFaultError::MemoryLimit {
                requested,
                max: self.max_size,
            });
        }
        self.slots.resize(requested, Value::Nil);
        Ok(requested)
    }

    /// Copy `len` slots from `src` to `dst`. The ranges may overlap.
    pub fn copy_within(&mut self, src: usize, dst: usize, len: usize) -> Result<(), MemoryFaultError> {
        if len == 0 {
            return Ok(());
        }
        for start in [src, dst] {
            let last = start.saturating_add(len - 1);
            self.check(start)?;
            self.check(last)?;
        }
        if src == dst {
            return Ok(());
        }
        let chunk: Vec<Value> = self.slots[src..src + len].to_vec();
        for (offset, value) in chunk.into_iter().enumerate() {
            self.slots[dst + offset] = value;
        }
        Ok(())
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.slots
    }

    /// Shrink or extend back to `size` slots, all Nil.
    pub(crate) fn reset(&mut self, size: usize) {
        self.slots.clear();
        self.slots.resize(size.min(self.max_size), Value::Nil);
    }
}

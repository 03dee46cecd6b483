use crate::Vec;
use crate::vm::MemoryFaultError;
use alloc::fmt;

/// A bounded stack of values.
///
/// Every operation that would go past either end reports a
/// [`MemoryFaultError`] instead of panicking.
///
/// # Examples
///
/// ```
/// use vmgen_core::vm::Stack;
///
/// let mut stack = Stack::new(100);
/// stack.push(42).unwrap();
/// stack.push(17).unwrap();
/// assert_eq!(stack.pop(), Ok(17));
/// assert_eq!(stack.peek(), Some(&42));
/// assert_eq!(stack.len(), 1);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Stack<T> {
    /// The underlying storage for stack elements.
    items: Vec<T>,
    /// Maximum allowed stack size.
    max_size: usize,
}

impl<T> Stack<T> {
    /// Creates a new stack with the specified maximum size.
    ///
    /// The stack will pre-allocate a reasonable amount of space to avoid
    /// frequent reallocations during normal operation.
    pub fn new(max_size: usize) -> Self {
        // Pre-allocate a reasonable amount (min of max_size or 256)
        // to avoid frequent reallocations during normal execution
        let initial_capacity = max_size.min(256);

        Self {
            items: Vec::with_capacity(initial_capacity),
            max_size,
        }
    }

    /// Pushes a value onto the stack.
    ///
    /// Fails with [`MemoryFaultError::StackOverflow`] when the stack is full.
    #[inline]
    pub fn push(&mut self, value: T) -> Result<(), MemoryFaultError> {
        if self.items.len() >= self.max_size {
            return Err(MemoryFaultError::StackOverflow {
                capacity: self.max_size,
            });
        }
        self.items.push(value);
        Ok(())
    }

    /// Removes and returns the top value from the stack.
    #[inline]
    pub fn pop(&mut self) -> Result<T, MemoryFaultError> {
        self.items.pop().ok_or(MemoryFaultError::StackUnderflow {
            needed: 1,
            available: 0,
        })
    }

    /// Returns a reference to the top value without removing it.
    ///
    /// Returns `None` if the stack is empty.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    /// Returns a mutable reference to the top value without removing it.
    #[inline]
    pub fn peek_mut(&mut self) -> Option<&mut T> {
        self.items.last_mut()
    }

    /// Returns a reference to the element at the specified distance from the top.
    ///
    /// `offset = 0` returns the top element (same as `peek()`).
    /// `offset = 1` returns the element below the top, etc.
    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<&T> {
        let len = self.items.len();
        if offset >= len {
            None
        } else {
            Some(&self.items[len - 1 - offset])
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the maximum number of values the stack accepts.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// Clears the stack, removing all values.
    ///
    /// This does not deallocate the underlying storage.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Removes the top `n` elements from the stack.
    ///
    /// Fails without removing anything if fewer than `n` elements are present.
    #[inline]
    pub fn pop_n(&mut self, n: usize) -> Result<(), MemoryFaultError> {
        let len = self.items.len();
        if n > len {
            return Err(MemoryFaultError::StackUnderflow {
                needed: n,
                available: len,
            });
        }
        self.items.truncate(len - n);
        Ok(())
    }

    /// Returns an iterator over references to the stack elements.
    ///
    /// The iterator yields elements from bottom to top; reverse it to walk
    /// from the top down.
    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    /// Returns a slice of the top `n` elements on the stack.
    ///
    /// The slice is ordered from bottom to top (so `slice[0]` is the oldest
    /// of the n elements, and `slice[n-1]` is the top of the stack).
    #[inline]
    pub fn top_n(&self, n: usize) -> Result<&[T], MemoryFaultError> {
        let len = self.items.len();
        if n > len {
            Err(MemoryFaultError::StackUnderflow {
                needed: n,
                available: len,
            })
        } else {
            Ok(&self.items[len - n..])
        }
    }

    /// Swaps the top two values.
    #[inline]
    pub fn swap(&mut self) -> Result<(), MemoryFaultError> {
        let len = self.items.len();
        if len < 2 {
            return Err(MemoryFaultError::StackUnderflow {
                needed: 2,
                available: len,
            });
        }
        self.items.swap(len - 1, len - 2);
        Ok(())
    }

    /// Bottom-to-top view of the whole stack.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Clone> Stack<T> {
    /// Duplicates the top element of the stack.
    #[inline]
    pub fn dup(&mut self) -> Result<(), MemoryFaultError> {
        let value = self.peek().cloned().ok_or(MemoryFaultError::StackUnderflow {
            needed: 1,
            available: 0,
        })?;
        self.push(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("items", &self.items)
            .field("len", &self.items.len())
            .field("capacity", &self.max_size)
            .finish()
    }
}

//! Scope stack for variable bindings.
//!
//! Used by the evaluator to bind values to `For`, `Let` and lambda
//! variables. Bindings are pushed and popped in strict nesting order and
//! looked up from innermost to outermost, so an inner binding of the same
//! variable shadows an outer one.

use core::fmt;

use crate::syntax::VarId;

/// A stack of variable bindings.
pub struct ScopeStack<T> {
    bindings: Vec<(VarId, T)>,
}

impl<T> Default for ScopeStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ScopeStack<T> {
    /// Create a new empty scope stack.
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Bind `var` to `value`, shadowing any outer binding.
    pub fn push(&mut self, var: VarId, value: T) {
        self.bindings.push((var, value));
    }

    /// Pop the innermost binding.
    ///
    /// Returns an error if the stack is empty.
    pub fn pop(&mut self) -> Result<T, PopError> {
        self.bindings
            .pop()
            .map(|(_, value)| value)
            .ok_or(PopError::EmptyStack)
    }

    /// Look up a variable, searching from innermost to outermost.
    pub fn lookup(&self, var: VarId) -> Option<&T> {
        self.bindings
            .iter()
            .rev()
            .find(|(id, _)| *id == var)
            .map(|(_, value)| value)
    }

    pub fn depth(&self) -> usize {
        self.bindings.len()
    }
}

/// Error when trying to pop a binding.
#[derive(Debug, Clone, PartialEq)]
pub enum PopError {
    /// The stack is empty.
    EmptyStack,
}

impl fmt::Display for PopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopError::EmptyStack => write!(f, "Cannot pop from empty scope stack"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let mut stack = ScopeStack::new();
        stack.push(VarId(1), 10);
        stack.push(VarId(2), 20);

        assert_eq!(stack.lookup(VarId(1)), Some(&10));
        assert_eq!(stack.lookup(VarId(2)), Some(&20));
        assert_eq!(stack.lookup(VarId(3)), None);
    }

    #[test]
    fn test_shadowing() {
        let mut stack = ScopeStack::new();
        stack.push(VarId(1), 1);
        stack.push(VarId(1), 10);

        assert_eq!(stack.lookup(VarId(1)), Some(&10));
        assert_eq!(stack.pop(), Ok(10));

        // Original binding is visible again
        assert_eq!(stack.lookup(VarId(1)), Some(&1));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_pop_empty_error() {
        let mut stack = ScopeStack::<i32>::new();
        assert_eq!(stack.pop(), Err(PopError::EmptyStack));
    }
}

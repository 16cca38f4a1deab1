//! Variable scoping for the interpreter.
//!
//! A scope stack: loop iterations and conditional branches push a scope,
//! spliced `let`/`const`/`var` declarations bind in the innermost one.
//! Names not found here fall through to the data record.

use rustc_hash::FxHashMap;

use crate::Value;

/// Failure of [`Environment::assign`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// Variable not found in any scope.
    Undefined,
}

#[derive(Debug)]
pub struct Environment {
    scopes: Vec<FxHashMap<String, Value>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// An environment with one (root) scope.
    pub fn new() -> Self {
        Environment {
            scopes: vec![FxHashMap::default()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// Pop the innermost scope. The root scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Bind `name` in the innermost scope, shadowing outer bindings.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.into(), value);
        }
    }

    /// Update the nearest existing binding of `name`.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), AssignError> {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(slot) = scope.get_mut(name) {
                *slot = value;
                return Ok(());
            }
        }
        Err(AssignError::Undefined)
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_scope_shadows_and_unwinds() {
        let mut env = Environment::new();
        env.define("x", Value::Int(1));
        env.push_scope();
        env.define("x", Value::Int(2));
        assert_eq!(env.lookup("x"), Some(&Value::Int(2)));
        env.pop_scope();
        assert_eq!(env.lookup("x"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_assign_updates_nearest_binding() {
        let mut env = Environment::new();
        env.define("total", Value::Int(0));
        env.push_scope();
        env.assign("total", Value::Int(5)).unwrap();
        env.pop_scope();
        assert_eq!(env.lookup("total"), Some(&Value::Int(5)));
        assert_eq!(env.assign("missing", Value::Null), Err(AssignError::Undefined));
    }

    #[test]
    fn test_root_scope_is_never_popped() {
        let mut env = Environment::new();
        env.pop_scope();
        env.pop_scope();
        assert_eq!(env.depth(), 1);
    }
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Environment for variable bindings.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::value::Value;

/// Global namespace plus a stack of function-local frames.
///
/// Names resolve in the innermost frame first, then in globals. Globals keep
/// insertion order so dumps of the namespace are stable.
#[derive(Debug, Default)]
pub struct Environment {
    globals: IndexMap<String, Value>,
    frames: Vec<HashMap<String, Value>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a function call with its bound parameters.
    pub fn push_frame(&mut self, locals: HashMap<String, Value>) {
        self.frames.push(locals);
    }

    pub fn pop_frame(&mut self) {
        self.frames.pop();
    }

    /// Bind a name in the current scope.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        match self.frames.last_mut() {
            Some(frame) => {
                frame.insert(name.into(), value);
            }
            None => {
                self.globals.insert(name.into(), value);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.frames
            .last()
            .and_then(|frame| frame.get(name))
            .or_else(|| self.globals.get(name))
    }

    /// Unbind a name in the current scope. Returns false if it was not bound there.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.frames.last_mut() {
            Some(frame) => frame.remove(name).is_some(),
            None => self.globals.shift_remove(name).is_some(),
        }
    }

    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    pub fn set_global(&mut self, name: impl Into<String>, value: Value) {
        self.globals.insert(name.into(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_shadow_globals() {
        let mut env = Environment::new();
        env.define("x", Value::Int(1));
        env.push_frame(HashMap::new());
        assert_eq!(env.get("x").and_then(Value::as_int), Some(1));
        env.define("x", Value::Int(2));
        assert_eq!(env.get("x").and_then(Value::as_int), Some(2));
        env.pop_frame();
        assert_eq!(env.get("x").and_then(Value::as_int), Some(1));
    }

    #[test]
    fn remove_only_touches_current_scope() {
        let mut env = Environment::new();
        env.define("x", Value::Int(1));
        env.push_frame(HashMap::new());
        assert!(!env.remove("x"));
        env.pop_frame();
        assert!(env.remove("x"));
        assert!(env.get("x").is_none());
    }
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Built-in functions and methods (always available, no import needed).

mod functions;
mod strings;
mod collections;

use std::cmp::Ordering;

use crate::interp::{Interpreter, RuntimeError};
use crate::value::{Args, Builtin, Value};

/// Find a global builtin function by name.
pub(crate) fn lookup(name: &str) -> Option<Builtin> {
    functions::BUILTINS.iter().find(|b| b.name == name).copied()
}

impl Interpreter {
    /// Dispatch a method call on a built-in type.
    pub(crate) fn call_builtin_method(
        &mut self,
        receiver: Value,
        method: &str,
        args: Args,
    ) -> Result<Value, RuntimeError> {
        match &receiver {
            Value::Str(s) => strings::call_str_method(s, method, args),
            Value::List(list) => collections::call_list_method(list, method, args),
            Value::Dict(dict) => collections::call_dict_method(dict, method, args),
            _ => Err(no_such_method(&receiver, method)),
        }
    }
}

pub(crate) fn no_such_method(receiver: &Value, method: &str) -> RuntimeError {
    RuntimeError::NoSuchAttribute {
        owner: format!("'{}' object", receiver.type_name()),
        attr: method.to_string(),
    }
}

/// Stable sort with fallible comparisons; the first comparison error wins.
pub(crate) fn sort_values(items: &mut [Value], reverse: bool) -> Result<(), RuntimeError> {
    let mut error = None;
    items.sort_by(|a, b| {
        if error.is_some() {
            return Ordering::Equal;
        }
        match a.compare(b, "<") {
            Ok(ordering) => {
                let ordering = ordering.unwrap_or(Ordering::Equal);
                if reverse { ordering.reverse() } else { ordering }
            }
            Err(e) => {
                error = Some(e);
                Ordering::Equal
            }
        }
    });
    match error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Read the `reverse=` keyword shared by `sorted` and `list.sort`.
fn take_reverse(args: &mut Args) -> bool {
    args.take_keyword("reverse").is_some_and(|v| v.is_truthy())
}

/// Require a string argument at `index`.
fn str_arg<'a>(args: &'a Args, index: usize, func: &str) -> Result<&'a str, RuntimeError> {
    match args.get(index) {
        Some(Value::Str(s)) => Ok(&**s),
        Some(other) => Err(RuntimeError::TypeError(format!(
            "{}() argument must be str, not {}",
            func,
            other.type_name()
        ))),
        None => Err(RuntimeError::TypeError(format!("{}() missing required argument", func))),
    }
}

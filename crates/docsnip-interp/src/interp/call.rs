// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Function calls and argument binding.

use std::collections::HashMap;
use std::rc::Rc;

use docsnip_ast::expr::Arg;

use crate::value::{Args, Exception, Function, Value};

use super::{
    Interpreter, RuntimeDiagnostic, RuntimeError, DEFAULT_RECURSION_LIMIT, STACK_RED_ZONE,
    STACK_SEGMENT,
};

impl Interpreter {
    pub(crate) fn eval_args(&mut self, args: &[Arg]) -> Result<Args, RuntimeDiagnostic> {
        let mut evaluated = Args::default();
        for arg in args {
            let value = self.eval_expr(&arg.value)?;
            match &arg.name {
                Some(name) => evaluated.keywords.push((name.clone(), value)),
                None => evaluated.positional.push(value),
            }
        }
        Ok(evaluated)
    }

    pub(crate) fn call_value(&mut self, func: &Value, args: Args) -> Result<Value, RuntimeDiagnostic> {
        match func {
            Value::Function(f) => self.call_function(f.clone(), args),
            Value::Builtin(b) => Ok((b.func)(self, args)?),
            Value::Kind(kind) => {
                let message = exception_message(kind, args)?;
                Ok(Value::Exception(Rc::new(Exception { kind: kind.to_string(), message })))
            }
            other => Err(RuntimeError::TypeError(format!(
                "'{}' object is not callable",
                other.type_name()
            ))
            .into()),
        }
    }

    pub(crate) fn call_method(&mut self, receiver: Value, method: &str, args: Args) -> Result<Value, RuntimeDiagnostic> {
        if let Value::Module(module) = &receiver {
            let func = module.get(method).cloned().ok_or_else(|| RuntimeError::NoSuchAttribute {
                owner: format!("module '{}'", module.name),
                attr: method.to_string(),
            })?;
            return self.call_value(&func, args);
        }
        Ok(self.call_builtin_method(receiver, method, args)?)
    }

    fn call_function(&mut self, func: Rc<Function>, args: Args) -> Result<Value, RuntimeDiagnostic> {
        if self.depth >= DEFAULT_RECURSION_LIMIT {
            return Err(RuntimeError::RecursionLimit.into());
        }
        let locals = bind_params(&func, args)?;

        self.depth += 1;
        self.env.push_frame(locals);
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || {
            self.exec_block(&func.decl.body)
        });
        self.env.pop_frame();
        self.depth -= 1;

        match result {
            Ok(()) => Ok(Value::None),
            // Body spans point into the source that defined the function, so
            // the error is re-anchored at the call site.
            Err(diag) => match diag.error {
                RuntimeError::Return(value) => Ok(value),
                error @ (RuntimeError::Break | RuntimeError::Continue) => Err(RuntimeError::Syntax {
                    message: error.to_string(),
                    hint: None,
                }
                .into()),
                error => Err(error.into()),
            },
        }
    }
}

/// Map call arguments onto a function's parameters.
fn bind_params(func: &Function, args: Args) -> Result<HashMap<String, Value>, RuntimeError> {
    let decl = &func.decl;
    let params = &decl.params;
    if args.positional.len() > params.len() {
        return Err(RuntimeError::TypeError(format!(
            "{}() takes {} positional argument{} but {} were given",
            decl.name,
            params.len(),
            if params.len() == 1 { "" } else { "s" },
            args.positional.len()
        )));
    }

    let mut slots: Vec<Option<Value>> = vec![None; params.len()];
    for (slot, value) in slots.iter_mut().zip(args.positional) {
        *slot = Some(value);
    }
    for (name, value) in args.keywords {
        let Some(i) = params.iter().position(|p| p.name == name) else {
            return Err(RuntimeError::TypeError(format!(
                "{}() got an unexpected keyword argument '{}'",
                decl.name, name
            )));
        };
        if slots[i].is_some() {
            return Err(RuntimeError::TypeError(format!(
                "{}() got multiple values for argument '{}'",
                decl.name, name
            )));
        }
        slots[i] = Some(value);
    }

    let mut locals = HashMap::with_capacity(params.len());
    let mut missing = Vec::new();
    for ((param, slot), default) in params.iter().zip(slots).zip(&func.defaults) {
        match slot.or_else(|| default.clone()) {
            Some(value) => {
                locals.insert(param.name.clone(), value);
            }
            None => missing.push(format!("'{}'", param.name)),
        }
    }
    if !missing.is_empty() {
        let names = if missing.len() == 2 { missing.join(" and ") } else { missing.join(", ") };
        return Err(RuntimeError::TypeError(format!(
            "{}() missing {} required positional argument{}: {}",
            decl.name,
            missing.len(),
            if missing.len() == 1 { "" } else { "s" },
            names
        )));
    }
    Ok(locals)
}

/// Message carried by an exception built as `Kind(args...)`.
fn exception_message(kind: &str, args: Args) -> Result<String, RuntimeError> {
    args.reject_keywords(kind)?;
    Ok(match args.positional.as_slice() {
        [] => String::new(),
        [single] => single.to_string(),
        many => Value::tuple(many.to_vec()).to_string(),
    })
}

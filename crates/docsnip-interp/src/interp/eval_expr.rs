// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression evaluation.

use docsnip_ast::expr::{BinOp, Expr, ExprKind};

use crate::value::{Dict, Value};

use super::collections::index_get;
use super::{Interpreter, RuntimeDiagnostic, RuntimeError, STACK_RED_ZONE, STACK_SEGMENT};

impl Interpreter {
    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeDiagnostic> {
        // Deeply nested expressions recurse here without passing a call.
        stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || self.eval_expr_kind(expr))
            .map_err(|diag| diag.or_span(expr.span))
    }

    fn eval_expr_kind(&mut self, expr: &Expr) -> Result<Value, RuntimeDiagnostic> {
        match &expr.kind {
            ExprKind::Int(n) => Ok(Value::Int(*n)),
            ExprKind::Float(f) => Ok(Value::Float(*f)),
            ExprKind::String(s) => Ok(Value::str(s)),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::None => Ok(Value::None),
            ExprKind::Ident(name) => Ok(self.lookup(name)?),

            ExprKind::Binary { op: BinOp::And, left, right } => {
                let left = self.eval_expr(left)?;
                if !left.is_truthy() {
                    return Ok(left);
                }
                self.eval_expr(right)
            }
            ExprKind::Binary { op: BinOp::Or, left, right } => {
                let left = self.eval_expr(left)?;
                if left.is_truthy() {
                    return Ok(left);
                }
                self.eval_expr(right)
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                Ok(self.eval_binop(*op, &left, &right)?)
            }
            ExprKind::Unary { op, operand } => {
                let value = self.eval_expr(operand)?;
                Ok(self.eval_unary(*op, &value)?)
            }

            ExprKind::Call { func, args } => {
                let func = self.eval_expr(func)?;
                let args = self.eval_args(args)?;
                self.call_value(&func, args)
            }
            ExprKind::MethodCall { object, method, args } => {
                let receiver = self.eval_expr(object)?;
                let args = self.eval_args(args)?;
                self.call_method(receiver, method, args)
            }
            ExprKind::Attribute { object, attr } => {
                let object = self.eval_expr(object)?;
                Ok(get_attribute(&object, attr)?)
            }
            ExprKind::Index { object, index } => {
                let object = self.eval_expr(object)?;
                let index = self.eval_expr(index)?;
                Ok(index_get(&object, &index)?)
            }

            ExprKind::List(items) => Ok(Value::list(self.eval_all(items)?)),
            ExprKind::Tuple(items) => Ok(Value::tuple(self.eval_all(items)?)),
            ExprKind::Dict(pairs) => {
                let mut dict = Dict::new();
                for (key_expr, value_expr) in pairs {
                    let key = self.eval_expr(key_expr)?;
                    let value = self.eval_expr(value_expr)?;
                    dict.insert(key, value)
                        .map_err(|e| RuntimeDiagnostic::new(e, key_expr.span))?;
                }
                Ok(Value::dict(dict))
            }
        }
    }

    fn eval_all(&mut self, exprs: &[Expr]) -> Result<Vec<Value>, RuntimeDiagnostic> {
        exprs.iter().map(|e| self.eval_expr(e)).collect()
    }

    /// Resolve a name: local frame, globals, builtins, then error kinds.
    pub(crate) fn lookup(&self, name: &str) -> Result<Value, RuntimeError> {
        if let Some(value) = self.env.get(name) {
            return Ok(value.clone());
        }
        if let Some(builtin) = crate::builtins::lookup(name) {
            return Ok(Value::Builtin(builtin));
        }
        if self.kinds.contains(name) {
            return Ok(Value::Kind(name.into()));
        }
        Err(RuntimeError::UndefinedName(name.to_string()))
    }
}

fn get_attribute(object: &Value, attr: &str) -> Result<Value, RuntimeError> {
    match object {
        Value::Module(module) => module.get(attr).cloned().ok_or_else(|| RuntimeError::NoSuchAttribute {
            owner: format!("module '{}'", module.name),
            attr: attr.to_string(),
        }),
        Value::Exception(exc) if attr == "args" => Ok(if exc.message.is_empty() {
            Value::tuple(vec![])
        } else {
            Value::tuple(vec![Value::str(&exc.message)])
        }),
        other => Err(RuntimeError::NoSuchAttribute {
            owner: format!("'{}' object", other.type_name()),
            attr: attr.to_string(),
        }),
    }
}

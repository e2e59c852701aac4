// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Assignment, augmented assignment, and `del`.

use docsnip_ast::expr::{BinOp, Expr, ExprKind};

use crate::value::Value;

use super::collections::{delete_index, index_get, index_set};
use super::{Interpreter, RuntimeDiagnostic, RuntimeError};

impl Interpreter {
    pub(crate) fn assign_target(&mut self, target: &Expr, value: Value) -> Result<(), RuntimeDiagnostic> {
        match &target.kind {
            ExprKind::Ident(name) => {
                self.env.define(name.clone(), value);
                Ok(())
            }
            ExprKind::Tuple(targets) | ExprKind::List(targets) => {
                let items = value.iterate().map_err(|e| RuntimeDiagnostic::new(e, target.span))?;
                if items.len() != targets.len() {
                    let message = if items.len() > targets.len() {
                        format!("too many values to unpack (expected {})", targets.len())
                    } else {
                        format!(
                            "not enough values to unpack (expected {}, got {})",
                            targets.len(),
                            items.len()
                        )
                    };
                    return Err(RuntimeDiagnostic::new(RuntimeError::ValueError(message), target.span));
                }
                for (target, item) in targets.iter().zip(items) {
                    self.assign_target(target, item)?;
                }
                Ok(())
            }
            ExprKind::Index { object, index } => {
                let object = self.eval_expr(object)?;
                let index = self.eval_expr(index)?;
                index_set(&object, &index, value).map_err(|e| RuntimeDiagnostic::new(e, target.span))
            }
            ExprKind::Attribute { object, attr } => {
                let object = self.eval_expr(object)?;
                Err(RuntimeDiagnostic::new(
                    RuntimeError::NoSuchAttribute {
                        owner: format!("'{}' object", object.type_name()),
                        attr: attr.clone(),
                    },
                    target.span,
                ))
            }
            _ => Err(RuntimeDiagnostic::new(
                RuntimeError::Syntax { message: "cannot assign to expression".to_string(), hint: None },
                target.span,
            )),
        }
    }

    pub(crate) fn exec_aug_assign(&mut self, target: &Expr, op: BinOp, value: &Expr) -> Result<(), RuntimeDiagnostic> {
        let span = target.span.to(value.span);
        match &target.kind {
            ExprKind::Ident(name) => {
                let current = self.lookup(name).map_err(|e| RuntimeDiagnostic::new(e, target.span))?;
                let rhs = self.eval_expr(value)?;
                let updated = self.augmented(op, current, &rhs).map_err(|e| RuntimeDiagnostic::new(e, span))?;
                self.env.define(name.clone(), updated);
                Ok(())
            }
            ExprKind::Index { object, index } => {
                let object = self.eval_expr(object)?;
                let index = self.eval_expr(index)?;
                let current = index_get(&object, &index).map_err(|e| RuntimeDiagnostic::new(e, target.span))?;
                let rhs = self.eval_expr(value)?;
                let updated = self.augmented(op, current, &rhs).map_err(|e| RuntimeDiagnostic::new(e, span))?;
                index_set(&object, &index, updated).map_err(|e| RuntimeDiagnostic::new(e, span))
            }
            _ => Err(RuntimeDiagnostic::new(
                RuntimeError::Syntax {
                    message: "illegal expression for augmented assignment".to_string(),
                    hint: None,
                },
                target.span,
            )),
        }
    }

    /// `list += iterable` extends in place; everything else rebinds.
    fn augmented(&self, op: BinOp, current: Value, rhs: &Value) -> Result<Value, RuntimeError> {
        if let (BinOp::Add, Value::List(list)) = (op, &current) {
            let extra = rhs.iterate()?;
            list.borrow_mut().extend(extra);
            return Ok(current);
        }
        self.eval_binop(op, &current, rhs)
    }

    pub(crate) fn delete_target(&mut self, target: &Expr) -> Result<(), RuntimeDiagnostic> {
        match &target.kind {
            ExprKind::Ident(name) => {
                if self.env.remove(name) {
                    Ok(())
                } else {
                    Err(RuntimeDiagnostic::new(RuntimeError::UndefinedName(name.clone()), target.span))
                }
            }
            ExprKind::Index { object, index } => {
                let object = self.eval_expr(object)?;
                let index = self.eval_expr(index)?;
                delete_index(&object, &index).map_err(|e| RuntimeDiagnostic::new(e, target.span))
            }
            ExprKind::Tuple(targets) | ExprKind::List(targets) => {
                for target in targets {
                    self.delete_target(target)?;
                }
                Ok(())
            }
            _ => Err(RuntimeDiagnostic::new(
                RuntimeError::Syntax { message: "cannot delete expression".to_string(), hint: None },
                target.span,
            )),
        }
    }
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement execution.

use std::rc::Rc;

use docsnip_ast::expr::Expr;
use docsnip_ast::stmt::{ExceptHandler, Stmt, StmtKind};

use crate::value::{Exception, Function, Value};

use super::{Interpreter, RuntimeDiagnostic, RuntimeError};

/// What a loop body asked for.
enum LoopFlow {
    Next,
    Exit,
}

impl Interpreter {
    pub(crate) fn exec_block(&mut self, stmts: &[Stmt]) -> Result<(), RuntimeDiagnostic> {
        for stmt in stmts {
            self.exec_stmt(stmt)?;
        }
        Ok(())
    }

    pub(crate) fn exec_stmt(&mut self, stmt: &Stmt) -> Result<(), RuntimeDiagnostic> {
        self.exec_stmt_kind(stmt).map_err(|diag| diag.or_span(stmt.span))
    }

    fn exec_stmt_kind(&mut self, stmt: &Stmt) -> Result<(), RuntimeDiagnostic> {
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                self.eval_expr(expr)?;
            }
            StmtKind::Assign { targets, value } => {
                let value = self.eval_expr(value)?;
                for target in targets {
                    self.assign_target(target, value.clone())?;
                }
            }
            StmtKind::AugAssign { target, op, value } => {
                self.exec_aug_assign(target, *op, value)?;
            }
            StmtKind::If { branches, else_body } => {
                for (cond, body) in branches {
                    if self.eval_expr(cond)?.is_truthy() {
                        return self.exec_block(body);
                    }
                }
                if let Some(body) = else_body {
                    self.exec_block(body)?;
                }
            }
            StmtKind::While { cond, body } => {
                while self.eval_expr(cond)?.is_truthy() {
                    if let LoopFlow::Exit = self.exec_loop_body(body)? {
                        break;
                    }
                }
            }
            StmtKind::For { target, iter, body } => {
                let items = self
                    .eval_expr(iter)?
                    .iterate()
                    .map_err(|e| RuntimeDiagnostic::new(e, iter.span))?;
                for item in items {
                    self.assign_target(target, item)?;
                    if let LoopFlow::Exit = self.exec_loop_body(body)? {
                        break;
                    }
                }
            }
            StmtKind::Break => return Err(RuntimeError::Break.into()),
            StmtKind::Continue => return Err(RuntimeError::Continue.into()),
            StmtKind::Pass => {}
            StmtKind::Def(decl) => {
                let mut defaults = Vec::with_capacity(decl.params.len());
                for param in &decl.params {
                    defaults.push(match &param.default {
                        Some(expr) => Some(self.eval_expr(expr)?),
                        None => None,
                    });
                }
                let func = Function { decl: decl.clone(), defaults };
                self.env.define(decl.name.clone(), Value::Function(Rc::new(func)));
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::None,
                };
                return Err(RuntimeError::Return(value).into());
            }
            StmtKind::Import { module, alias } => {
                let imported = self.import_module(module)?;
                let name = alias.as_ref().unwrap_or(module).clone();
                self.env.define(name, Value::Module(imported));
            }
            StmtKind::FromImport { module, names } => {
                let imported = self.import_module(module)?;
                for (name, alias) in names {
                    let value = imported.get(name).cloned().ok_or_else(|| RuntimeError::ImportName {
                        name: name.clone(),
                        module: module.clone(),
                    })?;
                    self.env.define(alias.as_ref().unwrap_or(name).clone(), value);
                }
            }
            StmtKind::Raise(expr) => {
                let error = self.build_raise(expr.as_ref())?;
                return Err(error.into());
            }
            StmtKind::Assert { cond, msg } => {
                if !self.eval_expr(cond)?.is_truthy() {
                    let message = match msg {
                        Some(expr) => self.eval_expr(expr)?.to_string(),
                        None => String::new(),
                    };
                    return Err(RuntimeError::AssertionFailed(message).into());
                }
            }
            StmtKind::Try { body, handlers, finally } => {
                let outcome = match self.exec_block(body) {
                    Err(diag) if !diag.error.is_control_flow() => self.handle_exception(diag, handlers),
                    other => other,
                };
                if let Some(finally) = finally {
                    self.exec_block(finally)?;
                }
                outcome?;
            }
            StmtKind::Del(targets) => {
                for target in targets {
                    self.delete_target(target)?;
                }
            }
        }
        Ok(())
    }

    fn exec_loop_body(&mut self, body: &[Stmt]) -> Result<LoopFlow, RuntimeDiagnostic> {
        match self.exec_block(body) {
            Ok(()) => Ok(LoopFlow::Next),
            Err(diag) => match diag.error {
                RuntimeError::Break => Ok(LoopFlow::Exit),
                RuntimeError::Continue => Ok(LoopFlow::Next),
                _ => Err(diag),
            },
        }
    }

    fn build_raise(&mut self, expr: Option<&Expr>) -> Result<RuntimeError, RuntimeDiagnostic> {
        let Some(expr) = expr else {
            return Ok(match self.handling.last() {
                Some(exc) => RuntimeError::Raised(exc.clone()),
                None => RuntimeError::Runtime("No active exception to reraise".to_string()),
            });
        };
        Ok(match self.eval_expr(expr)? {
            Value::Kind(kind) => RuntimeError::Raised(Rc::new(Exception {
                kind: kind.to_string(),
                message: String::new(),
            })),
            Value::Exception(exc) => RuntimeError::Raised(exc),
            _ => RuntimeError::TypeError("exceptions must derive from BaseException".to_string()),
        })
    }

    /// Run the first handler whose kind matches, or give the error back.
    fn handle_exception(
        &mut self,
        diag: RuntimeDiagnostic,
        handlers: &[ExceptHandler],
    ) -> Result<(), RuntimeDiagnostic> {
        let exc = diag.error.to_exception();
        for handler in handlers {
            if !self.handler_matches(handler, &exc.kind)? {
                continue;
            }
            if let Some(name) = &handler.name {
                self.env.define(name.clone(), Value::Exception(exc.clone()));
            }
            self.handling.push(exc.clone());
            let result = self.exec_block(&handler.body);
            self.handling.pop();
            if let Some(name) = &handler.name {
                self.env.remove(name);
            }
            return result;
        }
        Err(diag)
    }

    fn handler_matches(&mut self, handler: &ExceptHandler, kind: &str) -> Result<bool, RuntimeDiagnostic> {
        let Some(expr) = &handler.kind else {
            return Ok(true);
        };
        let candidates = match self.eval_expr(expr)? {
            Value::Tuple(items) => items.as_ref().clone(),
            other => vec![other],
        };
        for candidate in candidates {
            let Value::Kind(name) = candidate else {
                return Err(RuntimeDiagnostic::new(
                    RuntimeError::TypeError(
                        "catching classes that do not inherit from BaseException is not allowed".to_string(),
                    ),
                    expr.span,
                ));
            };
            if self.kinds.is_subkind(kind, &name) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

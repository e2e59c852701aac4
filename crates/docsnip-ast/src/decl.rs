// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Function declarations.

use crate::Span;
use crate::expr::Expr;
use crate::stmt::Stmt;

/// A `def` declaration.
#[derive(Debug, Clone)]
pub struct FnDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// A function parameter with an optional default value.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub default: Option<Expr>,
}

impl FnDecl {
    /// Number of parameters without a default.
    pub fn required_params(&self) -> usize {
        self.params.iter().filter(|p| p.default.is_none()).count()
    }
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement AST nodes.

use std::rc::Rc;

use crate::Span;
use crate::decl::FnDecl;
use crate::expr::{BinOp, Expr};

/// A statement in the AST.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

/// The kind of statement.
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// Expression statement
    Expr(Expr),
    /// Assignment, possibly chained (`a = b = 1`)
    Assign {
        targets: Vec<Expr>,
        value: Expr,
    },
    /// Augmented assignment (`a += 1`)
    AugAssign {
        target: Expr,
        op: BinOp,
        value: Expr,
    },
    /// If / elif / else chain
    If {
        branches: Vec<(Expr, Vec<Stmt>)>,
        else_body: Option<Vec<Stmt>>,
    },
    /// While loop
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
    /// For-in loop
    For {
        target: Expr,
        iter: Expr,
        body: Vec<Stmt>,
    },
    Break,
    Continue,
    Pass,
    /// Function definition
    Def(Rc<FnDecl>),
    /// Return statement
    Return(Option<Expr>),
    /// `import a` / `import a as b`
    Import {
        module: String,
        alias: Option<String>,
    },
    /// `from a import b, c as d`
    FromImport {
        module: String,
        names: Vec<(String, Option<String>)>,
    },
    /// `raise`, `raise Kind`, `raise Kind("msg")`
    Raise(Option<Expr>),
    /// `assert cond, msg`
    Assert {
        cond: Expr,
        msg: Option<Expr>,
    },
    /// try / except / finally
    Try {
        body: Vec<Stmt>,
        handlers: Vec<ExceptHandler>,
        finally: Option<Vec<Stmt>>,
    },
    /// `del a, b[0]`
    Del(Vec<Expr>),
}

/// One `except` clause.
#[derive(Debug, Clone)]
pub struct ExceptHandler {
    /// Kind expression; `None` catches everything.
    pub kind: Option<Expr>,
    pub name: Option<String>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The interpreter implementation.
//!
//! A tree-walk interpreter that evaluates the statement AST directly. The
//! global namespace outlives each call to [`Interpreter::run_source`], which
//! is what lets later documentation snippets see earlier definitions.

use std::io::Write;
use std::rc::Rc;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::trace;

use docsnip_ast::stmt::Stmt;
use docsnip_ast::{LineMap, Span};
use docsnip_lexer::Lexer;
use docsnip_parser::Parser;

mod assign;
mod call;
mod collections;
mod eval_expr;
mod exec_stmt;
mod operators;

use crate::env::Environment;
use crate::kinds::{ErrorKindRegistry, KindError};
use crate::value::{Exception, Module, Value};

/// Maximum nesting of `def` calls before a `RecursionError` is raised.
pub const DEFAULT_RECURSION_LIMIT: usize = 1000;

/// Remaining stack below which evaluation moves to a fresh segment.
pub(crate) const STACK_RED_ZONE: usize = 256 * 1024;
/// Size of each extra stack segment.
pub(crate) const STACK_SEGMENT: usize = 4 * 1024 * 1024;

/// Where `print` output goes.
#[derive(Debug)]
enum Output {
    Stdout,
    /// Everything printed since capture began, `end` strings included.
    Capture(String),
}

/// The tree-walk interpreter.
pub struct Interpreter {
    /// Variable bindings (globals plus call frames).
    pub(crate) env: Environment,
    kinds: ErrorKindRegistry,
    /// Importable modules by name.
    modules: IndexMap<String, Rc<Module>>,
    output: Output,
    depth: usize,
    /// Exceptions being handled by enclosing `except` blocks, innermost last.
    handling: Vec<Rc<Exception>>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        let mut modules = IndexMap::new();
        for module in crate::stdlib::default_modules() {
            modules.insert(module.name.clone(), Rc::new(module));
        }
        Self {
            env: Environment::new(),
            kinds: ErrorKindRegistry::with_builtins(),
            modules,
            output: Output::Stdout,
            depth: 0,
            handling: Vec::new(),
        }
    }

    /// Parse and execute `source` at global scope.
    ///
    /// Statements run in order until one fails; bindings made before the
    /// failure stay in place.
    pub fn run_source(&mut self, source: &str) -> Result<(), RuntimeDiagnostic> {
        let line_map = LineMap::new(source);
        let stmts = parse_source(source).map_err(|diag| diag.locate(&line_map))?;
        trace!(statements = stmts.len(), "executing source");
        for stmt in &stmts {
            if let Err(mut diag) = self.exec_stmt(stmt) {
                diag.error = diag.error.outside_of_function();
                return Err(diag.locate(&line_map));
            }
        }
        Ok(())
    }

    /// Start capturing `print` output instead of writing to stdout.
    pub fn begin_capture(&mut self) {
        self.output = Output::Capture(String::new());
    }

    /// Stop capturing and return the captured text split into lines.
    ///
    /// A final newline closes the last line rather than opening an empty
    /// one; an unterminated last line is returned as is.
    pub fn end_capture(&mut self) -> Vec<String> {
        match std::mem::replace(&mut self.output, Output::Stdout) {
            Output::Capture(text) if !text.is_empty() => {
                let body = text.strip_suffix('\n').unwrap_or(&text);
                body.split('\n').map(str::to_string).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn global(&self, name: &str) -> Option<&Value> {
        self.env.global(name)
    }

    pub fn set_global(&mut self, name: impl Into<String>, value: Value) {
        self.env.set_global(name, value);
    }

    pub fn kinds(&self) -> &ErrorKindRegistry {
        &self.kinds
    }

    /// Add an error kind under an existing parent.
    pub fn register_kind(&mut self, name: &str, parent: &str) -> Result<(), KindError> {
        self.kinds.register(name, parent)
    }

    /// Make a module importable, replacing any module of the same name.
    pub fn register_module(&mut self, module: Module) {
        self.modules.insert(module.name.clone(), Rc::new(module));
    }

    pub(crate) fn import_module(&self, name: &str) -> Result<Rc<Module>, RuntimeError> {
        self.modules
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::ModuleNotFound(name.to_string()))
    }

    /// Write one `print` call's text.
    pub(crate) fn emit(&mut self, text: &str, end: &str) {
        match &mut self.output {
            Output::Capture(buffer) => {
                buffer.push_str(text);
                buffer.push_str(end);
            }
            Output::Stdout => {
                let mut out = std::io::stdout().lock();
                let _ = write!(out, "{}{}", text, end);
            }
        }
    }
}

/// Lex and parse `source`, reporting the first failure as a `SyntaxError`.
fn parse_source(source: &str) -> Result<Vec<Stmt>, RuntimeDiagnostic> {
    let lexed = Lexer::new(source).tokenize();
    if let Some(err) = lexed.errors.into_iter().next() {
        return Err(RuntimeDiagnostic::new(
            RuntimeError::Syntax { message: err.message, hint: err.hint },
            err.span,
        ));
    }
    let parsed = Parser::new(lexed.tokens).parse();
    if let Some(err) = parsed.errors.into_iter().next() {
        return Err(RuntimeDiagnostic::new(
            RuntimeError::Syntax { message: err.message, hint: err.hint },
            err.span,
        ));
    }
    Ok(parsed.stmts)
}

#[derive(Debug, Clone, Error)]
pub enum RuntimeError {
    #[error("{message}")]
    Syntax { message: String, hint: Option<String> },

    #[error("name '{0}' is not defined")]
    UndefinedName(String),

    #[error("{0}")]
    TypeError(String),

    #[error("{0}")]
    ValueError(String),

    #[error("{0}")]
    ZeroDivision(String),

    #[error("{0}")]
    IndexError(String),

    /// Message is the repr of the missing key.
    #[error("{0}")]
    KeyError(String),

    #[error("{owner} has no attribute '{attr}'")]
    NoSuchAttribute { owner: String, attr: String },

    #[error("{0}")]
    AssertionFailed(String),

    #[error("No module named '{0}'")]
    ModuleNotFound(String),

    #[error("cannot import name '{name}' from '{module}'")]
    ImportName { name: String, module: String },

    #[error("maximum recursion depth exceeded")]
    RecursionLimit,

    #[error("{0}")]
    Overflow(String),

    #[error("{0}")]
    Runtime(String),

    /// An exception raised with `raise` (or re-raised from a handler).
    #[error("{}", .0.message)]
    Raised(Rc<Exception>),

    // Control flow (not actual errors)
    #[error("'return' outside function")]
    Return(Value),

    #[error("'break' outside loop")]
    Break,

    #[error("'continue' not properly in loop")]
    Continue,
}

impl RuntimeError {
    /// Name of the error kind this error is reported and caught as.
    pub fn kind(&self) -> &str {
        match self {
            RuntimeError::Syntax { .. } => "SyntaxError",
            RuntimeError::UndefinedName(_) => "NameError",
            RuntimeError::TypeError(_) => "TypeError",
            RuntimeError::ValueError(_) => "ValueError",
            RuntimeError::ZeroDivision(_) => "ZeroDivisionError",
            RuntimeError::IndexError(_) => "IndexError",
            RuntimeError::KeyError(_) => "KeyError",
            RuntimeError::NoSuchAttribute { .. } => "AttributeError",
            RuntimeError::AssertionFailed(_) => "AssertionError",
            RuntimeError::ModuleNotFound(_) => "ModuleNotFoundError",
            RuntimeError::ImportName { .. } => "ImportError",
            RuntimeError::RecursionLimit => "RecursionError",
            RuntimeError::Overflow(_) => "OverflowError",
            RuntimeError::Runtime(_) => "RuntimeError",
            RuntimeError::Raised(exc) => &exc.kind,
            RuntimeError::Return(_) | RuntimeError::Break | RuntimeError::Continue => "SyntaxError",
        }
    }

    pub(crate) fn is_control_flow(&self) -> bool {
        matches!(self, RuntimeError::Return(_) | RuntimeError::Break | RuntimeError::Continue)
    }

    /// The error as an exception value, for `except ... as e`.
    pub fn to_exception(&self) -> Rc<Exception> {
        match self {
            RuntimeError::Raised(exc) => exc.clone(),
            other => Rc::new(Exception {
                kind: other.kind().to_string(),
                message: other.to_string(),
            }),
        }
    }

    /// Control flow that escaped every enclosing function or loop.
    fn outside_of_function(self) -> RuntimeError {
        if self.is_control_flow() {
            RuntimeError::Syntax { message: self.to_string(), hint: None }
        } else {
            self
        }
    }
}

/// Runtime error with source location for diagnostic display.
#[derive(Debug, Clone)]
pub struct RuntimeDiagnostic {
    pub error: RuntimeError,
    pub span: Option<Span>,
    /// 1-based line within the source passed to `run_source`.
    pub line: Option<usize>,
}

impl RuntimeDiagnostic {
    pub fn new(error: RuntimeError, span: Span) -> Self {
        Self { error, span: Some(span), line: None }
    }

    pub fn kind(&self) -> &str {
        self.error.kind()
    }

    /// Attach `span` unless a more precise one is already set.
    pub(crate) fn or_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    fn locate(mut self, line_map: &LineMap) -> Self {
        self.line = self.span.map(|s| line_map.line_of(s.start));
        self
    }
}

impl From<RuntimeError> for RuntimeDiagnostic {
    fn from(error: RuntimeError) -> Self {
        Self { error, span: None, line: None }
    }
}

impl std::fmt::Display for RuntimeDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let message = self.error.to_string();
        if message.is_empty() {
            write!(f, "{}", self.kind())?;
        } else {
            write!(f, "{}: {}", self.kind(), message)?;
        }
        if let Some(line) = self.line {
            write!(f, " (line {})", line)?;
        }
        Ok(())
    }
}

impl std::error::Error for RuntimeDiagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(src: &str) -> Interpreter {
        let mut interp = Interpreter::new();
        interp.run_source(src).unwrap();
        interp
    }

    fn fail(src: &str) -> RuntimeDiagnostic {
        Interpreter::new().run_source(src).unwrap_err()
    }

    fn global_str(interp: &Interpreter, name: &str) -> String {
        interp.global(name).map(|v| v.repr()).unwrap_or_default()
    }

    #[test]
    fn globals_persist_between_sources() {
        let mut interp = Interpreter::new();
        interp.run_source("a = 3").unwrap();
        interp.run_source("b = a * 2").unwrap();
        assert_eq!(global_str(&interp, "b"), "6");
    }

    #[test]
    fn bindings_before_failure_survive() {
        let mut interp = Interpreter::new();
        let err = interp.run_source("a = 1\nb = 1 / 0\nc = 2").unwrap_err();
        assert_eq!(err.kind(), "ZeroDivisionError");
        assert_eq!(err.line, Some(2));
        assert!(interp.global("a").is_some());
        assert!(interp.global("c").is_none());
    }

    #[test]
    fn capture_splits_on_newlines() {
        let mut interp = Interpreter::new();
        interp.begin_capture();
        interp.run_source("print('a\\nb')\nprint(1, 2, sep='\\n')\nprint()").unwrap();
        assert_eq!(interp.end_capture(), vec!["a", "b", "1", "2", ""]);
        assert!(interp.end_capture().is_empty());
    }

    #[test]
    fn capture_joins_prints_without_newline_end() {
        let mut interp = Interpreter::new();
        interp.begin_capture();
        interp
            .run_source("print('a', end='')\nprint('b')\nprint('c', end=' ')\nprint('d', end='!')")
            .unwrap();
        assert_eq!(interp.end_capture(), vec!["ab", "c d!"]);
    }

    #[test]
    fn deep_recursion_within_the_limit() {
        let mut interp = Interpreter::new();
        interp
            .run_source("def total(n):\n    if n == 0:\n        return 0\n    return n + total(n - 1)\nr = total(900)\n")
            .unwrap();
        assert_eq!(global_str(&interp, "r"), "405450");
    }

    #[test]
    fn syntax_errors_have_lines() {
        let err = fail("a = 1\nb = (\n");
        assert_eq!(err.kind(), "SyntaxError");
        let err = fail("x = 'open\n");
        assert_eq!(err.kind(), "SyntaxError");
        assert_eq!(err.line, Some(1));
    }

    #[test]
    fn functions_and_closures_over_globals() {
        let interp = run("\
scale = 10
def f(x, y=1):
    return x * scale + y
r = f(2)
s = f(2, y=5)
");
        assert_eq!(global_str(&interp, "r"), "21");
        assert_eq!(global_str(&interp, "s"), "25");
    }

    #[test]
    fn runaway_recursion_is_reported() {
        let err = fail("def f(n):\n    return f(n + 1)\nf(0)\n");
        assert_eq!(err.kind(), "RecursionError");
    }

    #[test]
    fn try_except_matches_ancestors() {
        let interp = run("\
try:
    [][1]
except LookupError as e:
    caught = str(e)
finally:
    done = True
");
        assert_eq!(global_str(&interp, "caught"), "'list index out of range'");
        assert_eq!(global_str(&interp, "done"), "True");
        assert!(interp.global("e").is_none());
    }

    #[test]
    fn unmatched_handler_propagates() {
        let err = fail("try:\n    {}['k']\nexcept IndexError:\n    pass\n");
        assert_eq!(err.kind(), "KeyError");
        assert_eq!(err.error.to_string(), "'k'");
    }

    #[test]
    fn raise_and_reraise() {
        let err = fail("raise ValueError('bad value')");
        assert_eq!(err.kind(), "ValueError");
        assert_eq!(err.to_string(), "ValueError: bad value (line 1)");
        let err = fail("try:\n    raise KeyError\nexcept KeyError:\n    raise\n");
        assert_eq!(err.kind(), "KeyError");
        let err = fail("raise");
        assert_eq!(err.kind(), "RuntimeError");
    }

    #[test]
    fn host_kinds_can_be_raised_and_caught() {
        let mut interp = Interpreter::new();
        interp.register_kind("CustomError", "ValueError").unwrap();
        interp
            .run_source("try:\n    raise CustomError('x')\nexcept ValueError:\n    ok = True\n")
            .unwrap();
        assert_eq!(global_str(&interp, "ok"), "True");
    }

    #[test]
    fn return_at_top_level_is_a_syntax_error() {
        let err = fail("return 1");
        assert_eq!(err.kind(), "SyntaxError");
        assert_eq!(err.error.to_string(), "'return' outside function");
    }

    #[test]
    fn imports() {
        let interp = run("import math\nfrom math import sqrt as root\nx = root(16) + math.floor(math.pi)\n");
        assert_eq!(global_str(&interp, "x"), "7.0");
        assert_eq!(fail("import numpy").kind(), "ModuleNotFoundError");
        assert_eq!(fail("from math import nothing").kind(), "ImportError");
    }

    #[test]
    fn host_modules() {
        fn answer(_: &mut Interpreter, _: crate::value::Args) -> Result<Value, RuntimeError> {
            Ok(Value::Int(42))
        }
        let mut interp = Interpreter::new();
        interp.register_module(Module::new("deep").with_function("answer", answer));
        interp.run_source("import deep\nx = deep.answer()").unwrap();
        assert_eq!(global_str(&interp, "x"), "42");
    }
}

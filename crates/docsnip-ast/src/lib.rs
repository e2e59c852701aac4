// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Abstract Syntax Tree types for the docsnip scripting language.
//!
//! This crate defines the tokens and AST nodes shared between the lexer,
//! parser, and interpreter.

pub mod span;
pub mod token;
pub mod expr;
pub mod stmt;
pub mod decl;

pub use span::{Span, LineMap};

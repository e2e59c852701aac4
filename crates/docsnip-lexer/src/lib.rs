// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lexer for the docsnip scripting language.
//!
//! Tokenizes source code into a stream of tokens for the parser, including
//! the `Indent`/`Dedent` layout tokens that delimit blocks.

mod lexer;

pub use lexer::{LexError, LexResult, Lexer};

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error hints - suggestions for fixing common mistakes.
//!
//! Kept separate from the main parser to avoid clutter.

use docsnip_ast::token::TokenKind;

/// Get a hint for an "expected X" error based on context.
pub fn for_expected(expected: &str, found: &TokenKind) -> Option<&'static str> {
    match (expected, found) {
        // Block hints
        ("':'", TokenKind::Newline) => Some("end the header line with ':'"),
        ("':'", _) => None,
        ("an indented block", _) => Some("indent the body under the ':' line"),

        // Parentheses hints
        ("')'", TokenKind::Eof) => Some("add ')' to close the parenthesis"),
        ("']'", TokenKind::Eof) => Some("add ']' to close the bracket"),
        ("'}'", TokenKind::Eof) => Some("add '}' to close the dict"),

        // Expression hints
        ("expression", TokenKind::Eq) => Some("put the value after '='"),
        ("expression", TokenKind::Newline) => Some("statement is incomplete"),
        ("expression", TokenKind::Indent) => Some("unexpected indent"),
        ("expression", _) => Some("try a value, variable, or function call"),

        // Name/identifier hints
        ("a name", TokenKind::Int(_)) => Some("names can't start with a number"),
        ("a name", _) => Some("names start with a letter or '_'"),

        // Statement terminator
        ("end of line", TokenKind::String(_)) => Some("calls need parentheses, e.g. print(\"...\")"),
        ("end of line", _) => Some("put each statement on its own line or separate them with ';'"),

        _ => None,
    }
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Styled terminal output.
//!
//! NO_COLOR turns styling off and FORCE_COLOR turns it on even when stdout
//! is not a terminal.

use colored::{ColoredString, Colorize};
use docsnip_check::TestSummary;

/// Apply the color environment variables. Call once at startup.
pub fn init() {
    if std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    } else if std::env::var_os("FORCE_COLOR").is_some() {
        colored::control::set_override(true);
    }
}

pub fn error_label() -> ColoredString {
    "error".red().bold()
}

pub fn hint_label() -> ColoredString {
    "hint".cyan()
}

pub fn file_path(path: &str) -> ColoredString {
    path.underline()
}

// === Check results ===

pub fn document_passed(path: &str, blocks: usize) -> String {
    let blocks = if blocks == 1 { "(1 block)".to_string() } else { format!("({} blocks)", blocks) };
    format!("  {} {} {}", "✓".green(), file_path(path), blocks.dimmed())
}

pub fn document_failed(path: &str) -> String {
    format!("  {} {}", "✗".red(), file_path(path))
}

pub fn failure(path: &str, message: &str) -> String {
    format!("  {} {} - {}", "✗".red(), file_path(path), message)
}

pub fn summary(summary: &TestSummary) -> String {
    let failed = format!("{} failed", summary.failed);
    format!(
        "{}\n{} documents, {} blocks, {}, {}",
        "─".repeat(50).dimmed(),
        summary.documents,
        summary.snippets,
        format!("{} passed", summary.passed).green(),
        if summary.failed > 0 { failed.red() } else { failed.normal() }
    )
}

pub fn failures_header() -> ColoredString {
    "Failed documents:".red().bold()
}

// === Extraction listing ===

pub fn document_header(path: &str) -> String {
    format!("{} {} {}", "===".dimmed(), file_path(path), "===".dimmed())
}

pub fn block_header(index: usize, line: usize) -> ColoredString {
    format!("block {} (line {})", index, line).bold()
}

pub fn annotation(name: &str) -> ColoredString {
    name.cyan()
}

// === Runs ===

pub fn run_failed() -> String {
    format!("{} {} {}", "===".dimmed(), "Runtime FAILED".red().bold(), "===".dimmed())
}

// === Help ===

pub fn heading(text: &str) -> ColoredString {
    text.yellow().bold()
}

pub fn command(name: &str) -> ColoredString {
    name.green()
}

pub fn placeholder(name: &str) -> ColoredString {
    name.cyan()
}

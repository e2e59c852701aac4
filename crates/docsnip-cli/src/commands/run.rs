// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Run a script with the interpreter.

use std::process;

use docsnip_interp::{Interpreter, RuntimeDiagnostic, RuntimeError};

use crate::output;

pub fn cmd_run(path: &str) {
    let source = super::read_source(path);

    let mut interp = Interpreter::new();
    if let Err(diag) = interp.run_source(&source) {
        show_diagnostic(&source, path, &diag);
        eprintln!("\n{}", output::run_failed());
        process::exit(1);
    }
}

/// Show a runtime error with the offending source line.
fn show_diagnostic(source: &str, path: &str, diag: &RuntimeDiagnostic) {
    let message = format!("{}: {}", diag.kind(), diag.error);
    let hint = match &diag.error {
        RuntimeError::Syntax { hint, .. } => hint.as_deref(),
        _ => None,
    };

    eprintln!();
    eprintln!("{}: {}", output::error_label(), message);
    let Some(span) = diag.span else {
        eprintln!("  --> {}", output::file_path(path));
        return;
    };

    let pos = span.start.min(source.len());
    let line_start = source[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_end = source[pos..].find('\n').map(|i| pos + i).unwrap_or(source.len());
    let line_num = source[..pos].matches('\n').count() + 1;
    let col = source[line_start..pos].chars().count() + 1;

    eprintln!("  --> {}:{}:{}", output::file_path(path), line_num, col);
    eprintln!("   |");
    eprintln!("{:3}| {}", line_num, &source[line_start..line_end]);
    eprintln!("   | {}^", " ".repeat(col - 1));

    if let Some(hint) = hint {
        eprintln!("   |");
        eprintln!("   = {}: {}", output::hint_label(), hint);
    }
}

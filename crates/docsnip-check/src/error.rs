// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Ways a document can fail its check.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckError {
    /// An annotation that cannot be acted on.
    #[error("{0}")]
    Configuration(String),

    /// Code that was expected to run raised instead.
    #[error("{kind}: {message}{}", at_line(.line))]
    Execution {
        kind: String,
        message: String,
        line: Option<usize>,
        snippet: String,
    },

    #[error("Missing expected line: {missing}")]
    OutputMismatch {
        missing: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Expected snippet to fail, but it ran to completion.")]
    MissingFailure { expected: String },

    #[error("Expected snippet to raise a {expected}, but it raised a {}.", .actual.join(" -> "))]
    WrongFailureKind {
        expected: String,
        /// Kind of the raised error followed by its ancestors.
        actual: Vec<String>,
    },

    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Position of the failing block within its document.
    #[error("block {index} (line {line}): {source}")]
    Snippet {
        index: usize,
        line: usize,
        #[source]
        source: Box<CheckError>,
    },
}

impl CheckError {
    /// The underlying failure, without positional wrappers.
    pub fn innermost(&self) -> &CheckError {
        match self {
            CheckError::Snippet { source, .. } => source.innermost(),
            other => other,
        }
    }

    /// Extra context printed beneath the error message, if any.
    pub fn details(&self) -> Option<String> {
        match self.innermost() {
            CheckError::Execution { snippet, .. } => Some(format!("SNIPPET:\n{}", indent(snippet.lines()))),
            CheckError::OutputMismatch { expected, actual, .. } => Some(format!(
                "ACTUAL LINES:\n{}\nEXPECTED LINES:\n{}",
                indent(actual.iter()),
                indent(expected.iter())
            )),
            _ => None,
        }
    }
}

fn at_line(line: &Option<usize>) -> String {
    match line {
        Some(l) => format!(" (line {} of the block)", l),
        None => String::new(),
    }
}

/// Tab-indent each line for diagnostic dumps.
pub(crate) fn indent<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|l| format!("\t{}", l.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Literate testing for markdown documents.
//!
//! Every ```` ```python ```` block of a document is executed in order
//! against one shared interpreter, so names bound by an early block are
//! visible to later ones. Comments inside a block state what it should do:
//!
//! ```text
//! print(1 + 1)
//! # prints
//! # 2
//!
//! # raises ZeroDivisionError
//! 1 / 0
//! ```
//!
//! ## Annotations
//!
//! - `# prints` followed by `# <line>` comments: each line must appear in
//!   the block's output, in order. Other output may appear in between.
//! - `# prints <anything>`: the lines below are illustrative and unchecked.
//! - `# raises <Kind>`: the code from this line on must fail with `Kind`
//!   or a kind derived from it.

pub mod annotate;
pub mod config;
pub mod error;
pub mod extract;
pub mod files;
pub mod matcher;
pub mod runner;

pub use annotate::{find_expected_outputs, split_raises, ExpectedFailure, RaisesSplit};
pub use config::CheckConfig;
pub use error::CheckError;
pub use extract::{extract_snippets, Snippet};
pub use files::collect_markdown_files;
pub use matcher::assert_expected_lines_present_in_order;
pub use runner::{
    check_document, check_file, check_snippet, check_snippets_in_sequence, DocumentReport,
    SnippetReport, TestSummary,
};

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Run the blocks of a document against one shared interpreter.

use std::path::{Path, PathBuf};

use docsnip_interp::{Interpreter, RuntimeDiagnostic};
use tracing::{debug, trace};

use crate::annotate::{find_expected_outputs, split_raises};
use crate::config::CheckConfig;
use crate::error::CheckError;
use crate::extract::{extract_snippets, Snippet};
use crate::matcher::assert_expected_lines_present_in_order;

/// What a passing block did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetReport {
    /// Lines announced by `# prints` groups
    pub expected: Vec<String>,
    /// Lines the block printed before any expected failure
    pub output: Vec<String>,
    /// Kind of the error raised under a `# raises` annotation
    pub raised: Option<String>,
}

/// Result of checking every block of one document.
#[derive(Debug, Clone, Default)]
pub struct DocumentReport {
    /// Source file, when the blocks came from one
    pub path: Option<PathBuf>,
    pub snippets: Vec<SnippetReport>,
}

/// Counts for a run over several documents.
#[derive(Debug, Default)]
pub struct TestSummary {
    pub documents: usize,
    pub passed: usize,
    pub failed: usize,
    pub snippets: usize,
}

impl TestSummary {
    pub fn add(&mut self, result: &Result<DocumentReport, CheckError>) {
        self.documents += 1;
        match result {
            Ok(report) => {
                self.passed += 1;
                self.snippets += report.snippets.len();
            }
            Err(_) => self.failed += 1,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Check one block against the interpreter's current state.
///
/// Names the block binds stay bound for whatever runs next, including when
/// the check fails.
pub fn check_snippet(code: &str, interp: &mut Interpreter) -> Result<SnippetReport, CheckError> {
    let split = split_raises(code)?;
    let expected = find_expected_outputs(split.before);

    let Some(failure) = split.failure else {
        let output = run_expecting_success(interp, split.before)?;
        assert_expected_lines_present_in_order(&expected, &output)?;
        return Ok(SnippetReport { expected, output, raised: None });
    };

    if failure.is_trailing() {
        let (result, output) = run_captured(interp, split.before);
        let raised = expect_failure(interp, result, &failure.kind)?;
        assert_expected_lines_present_in_order(&expected, &output)?;
        return Ok(SnippetReport { expected, output, raised: Some(raised) });
    }

    let output = run_expecting_success(interp, split.before)?;
    assert_expected_lines_present_in_order(&expected, &output)?;
    trace!(line = failure.line, kind = %failure.kind, "running code expected to fail");
    let (result, _) = run_captured(interp, failure.after);
    let raised = expect_failure(interp, result, &failure.kind)?;
    Ok(SnippetReport { expected, output, raised: Some(raised) })
}

/// Check blocks in order against one fresh interpreter, stopping at the
/// first failure.
pub fn check_snippets_in_sequence(
    snippets: &[Snippet],
    config: &CheckConfig,
) -> Result<DocumentReport, CheckError> {
    let mut interp = Interpreter::new();
    if let Some(prelude) = &config.prelude {
        debug!("running prelude");
        run_expecting_success(&mut interp, prelude)?;
    }

    let mut report = DocumentReport::default();
    for (i, snippet) in snippets.iter().enumerate() {
        debug!(block = i + 1, line = snippet.line, "checking block");
        let outcome = check_snippet(&snippet.code, &mut interp).map_err(|e| CheckError::Snippet {
            index: i + 1,
            line: snippet.line,
            source: Box::new(e),
        })?;
        report.snippets.push(outcome);
    }
    Ok(report)
}

/// Check every block of a markdown document.
pub fn check_document(path: &Path, markdown: &str, config: &CheckConfig) -> Result<DocumentReport, CheckError> {
    let snippets = extract_snippets(markdown, &config.fence_language);
    debug!("{}: {} block(s)", path.display(), snippets.len());
    let mut report = check_snippets_in_sequence(&snippets, config)?;
    report.path = Some(path.to_path_buf());
    Ok(report)
}

/// Read a markdown file and check its blocks.
pub fn check_file(path: &Path, config: &CheckConfig) -> Result<DocumentReport, CheckError> {
    let markdown = std::fs::read_to_string(path).map_err(|source| CheckError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    check_document(path, &markdown, config)
}

fn run_captured(interp: &mut Interpreter, code: &str) -> (Result<(), RuntimeDiagnostic>, Vec<String>) {
    interp.begin_capture();
    let result = interp.run_source(code);
    let output = interp.end_capture();
    trace!(lines = output.len(), "captured output");
    (result, output)
}

fn run_expecting_success(interp: &mut Interpreter, code: &str) -> Result<Vec<String>, CheckError> {
    let (result, output) = run_captured(interp, code);
    match result {
        Ok(()) => Ok(output),
        Err(diagnostic) => Err(CheckError::Execution {
            kind: diagnostic.kind().to_string(),
            message: diagnostic.error.to_string(),
            line: diagnostic.line,
            snippet: code.to_string(),
        }),
    }
}

/// Require `result` to be an error whose kind is `expected` or derives
/// from it. Returns the kind actually raised.
fn expect_failure(
    interp: &Interpreter,
    result: Result<(), RuntimeDiagnostic>,
    expected: &str,
) -> Result<String, CheckError> {
    let diagnostic = match result {
        Ok(()) => return Err(CheckError::MissingFailure { expected: expected.to_string() }),
        Err(diagnostic) => diagnostic,
    };
    let kind = diagnostic.kind();
    let chain: Vec<String> = match interp.kinds().ancestry(kind) {
        Some(chain) => chain.to_vec(),
        None => vec![kind.to_string()],
    };
    if chain.iter().any(|k| k == expected) {
        debug!(kind, "raised as expected");
        Ok(kind.to_string())
    } else {
        Err(CheckError::WrongFailureKind {
            expected: expected.to_string(),
            actual: chain,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(code: &str) -> Result<SnippetReport, CheckError> {
        check_snippet(code, &mut Interpreter::new())
    }

    #[test]
    fn plain_code_runs_and_binds() {
        let mut interp = Interpreter::new();
        check_snippet("a = 1", &mut interp).unwrap();
        assert_eq!(interp.global("a").map(|v| v.repr()).as_deref(), Some("1"));

        interp.set_global("b", docsnip_interp::Value::Int(1));
        check_snippet("a = b", &mut interp).unwrap();
    }

    #[test]
    fn unexpected_errors_carry_kind_and_code() {
        match check("a = b").unwrap_err() {
            CheckError::Execution { kind, snippet, line, .. } => {
                assert_eq!(kind, "NameError");
                assert_eq!(snippet, "a = b");
                assert_eq!(line, Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }
        match check("a = ;").unwrap_err() {
            CheckError::Execution { kind, .. } => assert_eq!(kind, "SyntaxError"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn printed_output_is_checked() {
        let report = check("\nprint(\"abc\")\n# prints\n# abc\n        ").unwrap();
        assert_eq!(report.expected, vec!["abc"]);
        assert_eq!(report.output, vec!["abc"]);

        let err = check("\nprint(\"abc\")\n# prints\n# def\n                ").unwrap_err();
        assert!(matches!(err, CheckError::OutputMismatch { ref missing, .. } if missing == "def"));
    }

    #[test]
    fn multi_line_prints_are_split() {
        check("print('a\\nb', 'c')\nprint(1, 2, sep='\\n')\n# prints\n# a\n# b c\n# 1\n# 2\n").unwrap();
    }

    #[test]
    fn marker_before_failing_code() {
        let report = check("\n# raises ZeroDivisionError\na = 1 / 0\n    ").unwrap();
        assert_eq!(report.raised.as_deref(), Some("ZeroDivisionError"));
        check("\n# raises ArithmeticError\na = 1 / 0\n        ").unwrap();
        check("\n# prints 123\nprint(\"123\")\n\n# raises SyntaxError\nprint \"abc\")\n        ").unwrap();
    }

    #[test]
    fn marker_after_failing_code() {
        check("a = 1/0\n# raises ZeroDivisionError").unwrap();
        check("a = 1/0\n# raises ArithmeticError").unwrap();
        let err = check("a = 1/0\n# raises ValueError").unwrap_err();
        assert!(matches!(err, CheckError::WrongFailureKind { .. }));
    }

    #[test]
    fn wrong_kind_reports_the_chain() {
        match check("\n# raises ValueError\na = 1 / 0\n            ").unwrap_err() {
            CheckError::WrongFailureKind { expected, actual } => {
                assert_eq!(expected, "ValueError");
                assert_eq!(
                    actual,
                    vec!["ZeroDivisionError", "ArithmeticError", "Exception", "BaseException"]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn code_that_succeeds_under_raises_fails() {
        let err = check("# raises KeyError\nd = {}\n").unwrap_err();
        assert!(matches!(err, CheckError::MissingFailure { ref expected } if expected == "KeyError"));
        assert_eq!(err.to_string(), "Expected snippet to fail, but it ran to completion.");
    }

    #[test]
    fn raises_needs_a_kind() {
        let err = check("\n# raises\na = 1\n            ").unwrap_err();
        assert!(matches!(err, CheckError::Configuration(_)));
    }

    #[test]
    fn code_before_the_marker_must_succeed() {
        let err = check("missing\n# raises NameError\nalso_missing\n").unwrap_err();
        assert!(matches!(err, CheckError::Execution { .. }));
    }

    #[test]
    fn raised_kinds_follow_registered_ancestry() {
        let mut interp = Interpreter::new();
        interp.register_kind("SnippetError", "LookupError").unwrap();
        check_snippet("# raises LookupError\nraise SnippetError('boom')\n", &mut interp).unwrap();
        check_snippet("# raises SnippetError\nraise SnippetError\n", &mut interp).unwrap();
    }

    #[test]
    fn state_is_shared_across_blocks() {
        let snippets = vec![
            Snippet { line: 2, code: "def double(x):\n    return 2 * x".to_string() },
            Snippet { line: 6, code: "print(double(21))\n# prints\n# 42".to_string() },
        ];
        let report = check_snippets_in_sequence(&snippets, &CheckConfig::default()).unwrap();
        assert_eq!(report.snippets.len(), 2);
        assert_eq!(report.snippets[1].output, vec!["42"]);
    }

    #[test]
    fn first_failure_stops_the_document() {
        let snippets = vec![
            Snippet { line: 2, code: "x = 1".to_string() },
            Snippet { line: 6, code: "print(y)".to_string() },
            Snippet { line: 10, code: "# raises".to_string() },
        ];
        match check_snippets_in_sequence(&snippets, &CheckConfig::default()).unwrap_err() {
            CheckError::Snippet { index, line, source } => {
                assert_eq!((index, line), (2, 6));
                assert!(matches!(*source, CheckError::Execution { ref kind, .. } if kind == "NameError"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn prelude_runs_first() {
        let config = CheckConfig::default().with_prelude("import math");
        let snippets = vec![Snippet { line: 1, code: "print(math.floor(2.5))\n# prints\n# 2".to_string() }];
        check_snippets_in_sequence(&snippets, &config).unwrap();

        let broken = CheckConfig::default().with_prelude("import nowhere");
        let err = check_snippets_in_sequence(&[], &broken).unwrap_err();
        assert!(matches!(err, CheckError::Execution { ref kind, .. } if kind == "ModuleNotFoundError"));
    }

    #[test]
    fn summary_counts_documents() {
        let mut summary = TestSummary::default();
        summary.add(&Ok(DocumentReport {
            path: None,
            snippets: vec![SnippetReport { expected: vec![], output: vec![], raised: None }],
        }));
        summary.add(&Err(CheckError::Configuration("bad".to_string())));
        assert_eq!((summary.documents, summary.passed, summary.failed, summary.snippets), (2, 1, 1, 1));
        assert!(!summary.is_success());
    }

    #[test]
    fn runaway_recursion_inside_if_is_a_recursion_error() {
        let code = "def f(n):\n    if n >= 0:\n        return 1 + f(n + 1)\n# raises RecursionError\nf(0)\n";
        let report = check(code).unwrap();
        assert_eq!(report.raised.as_deref(), Some("RecursionError"));
        check("def f(n):\n    if n >= 0:\n        return 1 + f(n + 1)\nf(0)\n# raises RuntimeError").unwrap();
    }

    #[test]
    fn deep_recursion_below_the_limit_succeeds() {
        let code = "def total(n):\n    if n == 0:\n        return 0\n    else:\n        return n + total(n - 1)\nprint(total(500))\n# prints\n# 125250\n";
        check(code).unwrap();
    }

    #[test]
    fn floats_print_in_exponent_form_when_large() {
        check("print(1e20, 2.0 ** 60, 1e-5)\n# prints\n# 1e+20 1.152921504606847e+18 1e-05\n").unwrap();
    }

    #[test]
    fn print_end_joins_captured_lines() {
        let report = check("print('a', end='')\nprint('b')\n# prints\n# ab\n").unwrap();
        assert_eq!(report.output, vec!["ab"]);
    }
}

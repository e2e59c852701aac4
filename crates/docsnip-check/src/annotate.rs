// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Read the `# raises` and `# prints` annotations of a code block.

use crate::error::CheckError;

const RAISES_MARKER: &str = "# raises";
const PRINTS_MARKER: &str = "# prints";
const CONTINUATION: &str = "# ";

/// A block divided at its `# raises` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaisesSplit<'a> {
    /// Everything before the marker line; must run cleanly.
    pub before: &'a str,
    pub failure: Option<ExpectedFailure<'a>>,
}

/// The part of a block that must fail, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedFailure<'a> {
    /// Error kind named after the marker.
    pub kind: String,
    /// The marker line and everything after it.
    pub after: &'a str,
    /// Line of the marker within the block (1-indexed)
    pub line: usize,
}

impl ExpectedFailure<'_> {
    /// True when nothing but comments and blank lines follows the marker.
    ///
    /// A marker written below the failing code annotates that code.
    pub fn is_trailing(&self) -> bool {
        self.after.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        })
    }
}

/// Split a block at its first `# raises <Kind>` line.
///
/// The marker may be indented but must start its line. A marker without a
/// kind is rejected.
pub fn split_raises(code: &str) -> Result<RaisesSplit<'_>, CheckError> {
    let mut offset = 0;
    for (index, line) in code.split_inclusive('\n').enumerate() {
        if let Some(rest) = line.trim_start().strip_prefix(RAISES_MARKER) {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                let Some(kind) = rest.split_whitespace().next() else {
                    return Err(CheckError::Configuration(
                        "No error type specified for # raises line.".to_string(),
                    ));
                };
                return Ok(RaisesSplit {
                    before: &code[..offset],
                    failure: Some(ExpectedFailure {
                        kind: kind.to_string(),
                        after: &code[offset..],
                        line: index + 1,
                    }),
                });
            }
        }
        offset += line.len();
    }
    Ok(RaisesSplit { before: code, failure: None })
}

/// Collect the output lines announced by `# prints` groups.
///
/// A group starts at a line that is exactly `# prints` (trailing whitespace
/// allowed) and continues through each following line that starts with
/// `# ` or is a bare `#`. Those two characters are dropped; any further
/// indentation is kept. `# prints something like` starts a group that
/// is not checked.
pub fn find_expected_outputs(code: &str) -> Vec<String> {
    let mut expected = Vec::new();
    let mut printing = false;

    for line in code.split('\n') {
        if printing {
            if let Some(rest) = line.strip_prefix(CONTINUATION) {
                expected.push(rest.to_string());
            } else if line == CONTINUATION.trim_end() {
                expected.push(String::new());
            } else {
                printing = false;
            }
        } else if let Some(rest) = line.strip_prefix(PRINTS_MARKER) {
            printing = rest.trim().is_empty();
        }
    }

    expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_stops_at_first_plain_line() {
        let code = "\n# prints\n# abc\n\n# def\n    ";
        assert_eq!(find_expected_outputs(code), vec!["abc"]);
    }

    #[test]
    fn groups_accumulate_and_keep_extra_indent() {
        let code = "
lorem ipsum

# prints
#   abc

a wondrous collection

# prints
# def
# ghi
    ";
        assert_eq!(find_expected_outputs(code), vec!["  abc", "def", "ghi"]);
    }

    #[test]
    fn only_bare_marker_starts_a_group() {
        let code = "
a wandering adventurer

# prints something like
#  prints
#prints
# pants
# trance
    ";
        assert!(find_expected_outputs(code).is_empty());
    }

    #[test]
    fn bare_hash_is_an_empty_line() {
        let code = "print('a\\n\\nb')\n# prints\n# a\n#\n# b\nx = 1\n";
        assert_eq!(find_expected_outputs(code), vec!["a", "", "b"]);
    }

    #[test]
    fn marker_with_trailing_spaces_still_counts() {
        assert_eq!(find_expected_outputs("# prints   \n# 1"), vec!["1"]);
        assert!(find_expected_outputs("    # prints\n    # 1").is_empty());
    }

    #[test]
    fn no_marker_means_no_expectation() {
        let split = split_raises("a = 1\nprint(a)\n").unwrap();
        assert_eq!(split.before, "a = 1\nprint(a)\n");
        assert_eq!(split.failure, None);
    }

    #[test]
    fn split_at_marker_line() {
        let code = "print('123')\n\n# raises SyntaxError\nprint \"abc\")\n";
        let split = split_raises(code).unwrap();
        assert_eq!(split.before, "print('123')\n\n");
        let failure = split.failure.unwrap();
        assert_eq!(failure.kind, "SyntaxError");
        assert_eq!(failure.after, "# raises SyntaxError\nprint \"abc\")\n");
        assert_eq!(failure.line, 3);
        assert!(!failure.is_trailing());
    }

    #[test]
    fn indented_marker_and_trailing_form() {
        let code = "a = 1/0\n  # raises ZeroDivisionError  \n";
        let failure = split_raises(code).unwrap().failure.unwrap();
        assert_eq!(failure.kind, "ZeroDivisionError");
        assert!(failure.is_trailing());
    }

    #[test]
    fn missing_kind_is_a_configuration_error() {
        for code in ["# raises\na = 1\n", "# raises   \n", "x = 1\n# raises"] {
            assert!(matches!(split_raises(code), Err(CheckError::Configuration(_))), "{code:?}");
        }
    }

    #[test]
    fn longer_words_are_not_markers() {
        let split = split_raises("# raisesValueError\n# raised here\n").unwrap();
        assert_eq!(split.failure, None);
    }

    #[test]
    fn first_marker_wins() {
        let split = split_raises("# raises KeyError\n{}['a']\n# raises ValueError\n").unwrap();
        assert_eq!(split.before, "");
        assert_eq!(split.failure.unwrap().kind, "KeyError");
    }
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Check expected output lines against captured output.

use crate::error::CheckError;

/// Check that every expected line occurs in `actual`, in order.
///
/// Other lines may appear before, between or after the expected ones.
/// Trailing whitespace is ignored on both sides. Matching is greedy: each
/// expected line takes the first unconsumed actual line equal to it.
pub fn assert_expected_lines_present_in_order<E, A>(expected: &[E], actual: &[A]) -> Result<(), CheckError>
where
    E: AsRef<str>,
    A: AsRef<str>,
{
    let expected: Vec<&str> = expected.iter().map(|e| e.as_ref().trim_end()).collect();
    let actual: Vec<&str> = actual.iter().map(|a| a.as_ref().trim_end()).collect();

    let mut cursor = 0;
    for line in &expected {
        match actual[cursor..].iter().position(|a| a == line) {
            Some(offset) => cursor += offset + 1,
            None => {
                return Err(CheckError::OutputMismatch {
                    missing: line.to_string(),
                    expected: expected.iter().map(|s| s.to_string()).collect(),
                    actual: actual.iter().map(|s| s.to_string()).collect(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    fn missing(expected: &[&str], actual: &[&str]) -> Option<String> {
        match assert_expected_lines_present_in_order(expected, actual) {
            Ok(()) => None,
            Err(CheckError::OutputMismatch { missing, .. }) => Some(missing),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_expectation_always_holds() {
        assert_eq!(missing(&NONE, &NONE), None);
        assert_eq!(missing(&NONE, &["abc"]), None);
    }

    #[test]
    fn exact_and_interleaved() {
        assert_eq!(missing(&["abc"], &["abc"]), None);
        assert_eq!(missing(&["abc", "def"], &["abc", "def"]), None);
        assert_eq!(missing(&["abc", "def"], &["abc", "interruption", "def"]), None);
        assert_eq!(missing(&["def"], &["abc", "def", "ghi"]), None);
    }

    #[test]
    fn missing_lines_are_named() {
        assert_eq!(missing(&["abc"], &NONE).as_deref(), Some("abc"));
        assert_eq!(missing(&["abc", "def"], &["def", "abc"]).as_deref(), Some("def"));
        assert_eq!(missing(&["a", "b", "c"], &["a", "c", "b"]).as_deref(), Some("c"));
    }

    #[test]
    fn each_actual_line_is_used_once() {
        assert_eq!(missing(&["x", "x"], &["x", "y", "x"]), None);
        assert_eq!(missing(&["x", "x"], &["x", "y"]).as_deref(), Some("x"));
    }

    #[test]
    fn trailing_whitespace_is_ignored() {
        assert_eq!(missing(&["abc    "], &["abc"]), None);
        assert_eq!(missing(&["abc"], &["abc      "]), None);
        assert_eq!(missing(&["  abc"], &["abc"]).as_deref(), Some("  abc"));
    }

    #[test]
    fn mismatch_carries_stripped_line_sets() {
        let err = assert_expected_lines_present_in_order(&["def "], &["abc\t"]).unwrap_err();
        match err {
            CheckError::OutputMismatch { missing, expected, actual } => {
                assert_eq!(missing, "def");
                assert_eq!(expected, vec!["def"]);
                assert_eq!(actual, vec!["abc"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

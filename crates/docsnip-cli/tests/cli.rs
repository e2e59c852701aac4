// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Run the `docsnip` binary against documents on disk.

use std::fs;
use std::process::{Command, Output};

fn docsnip(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_docsnip"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run docsnip")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn check_reports_each_document() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("good.md"),
        "```python\nx = 2\n```\n\n```python\nprint(x * 21)\n# prints\n# 42\n```\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("bad.md"),
        "```python\nprint('abc')\n# prints\n# def\n```\n",
    )
    .unwrap();

    let output = docsnip(&["check", dir.path().to_str().unwrap()]);
    let out = stdout(&output);
    assert_eq!(output.status.code(), Some(1), "{out}");
    assert!(out.contains("✓"), "{out}");
    assert!(out.contains("✗"), "{out}");
    assert!(out.contains("2 documents, 2 blocks, 1 passed, 1 failed"), "{out}");
    assert!(out.contains("Missing expected line: def"), "{out}");
    assert!(out.contains("ACTUAL LINES:"), "{out}");
}

#[test]
fn check_passes_with_prelude() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("math.md");
    fs::write(&doc, "```python\nprint(math.ceil(1.2))\n# prints\n# 2\n```\n").unwrap();

    let output = docsnip(&["check", doc.to_str().unwrap(), "--prelude", "import math"]);
    assert!(output.status.success(), "{}", stdout(&output));
    assert!(stdout(&output).contains("1 passed, 0 failed"));
}

#[test]
fn check_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = docsnip(&["check", dir.path().join("nowhere").to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn extract_lists_annotations() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("doc.md");
    fs::write(&doc, "intro\n```python\nprint(1)\n# prints\n# 1\n# raises KeyError\n{}['k']\n```\n").unwrap();

    let output = docsnip(&["extract", doc.to_str().unwrap()]);
    let out = stdout(&output);
    assert!(output.status.success(), "{out}");
    assert!(out.contains("block 1 (line 3)"), "{out}");
    assert!(out.contains("prints 1"), "{out}");
    assert!(out.contains("raises KeyError (line 6)"), "{out}");
}

#[test]
fn run_executes_scripts() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("script.py");
    fs::write(&script, "for i in range(3):\n    print(i * i)\n").unwrap();
    let output = docsnip(&["run", script.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "0\n1\n4\n");

    fs::write(&script, "x = 1\ny = x / 0\n").unwrap();
    let output = docsnip(&["run", script.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("ZeroDivisionError: division by zero"), "{err}");
    assert!(err.contains(":2:"), "{err}");
}

#[test]
fn unknown_commands_and_flags() {
    assert_eq!(docsnip(&["frobnicate"]).status.code(), Some(1));
    assert_eq!(docsnip(&["check", "--fast"]).status.code(), Some(2));
    assert!(stdout(&docsnip(&["version"])).starts_with("docsnip "));
}

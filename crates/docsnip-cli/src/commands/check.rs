// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Documentation checking command.

use std::path::{Path, PathBuf};
use std::process;

use docsnip_check::{check_file, collect_markdown_files, CheckConfig, CheckError, TestSummary};
use tracing::debug;

use crate::output;

pub fn cmd_check(paths: &[String], config: &CheckConfig) {
    let roots: Vec<&str> = if paths.is_empty() {
        vec!["docs"]
    } else {
        paths.iter().map(String::as_str).collect()
    };

    let mut md_files = Vec::new();
    for root in roots {
        match collect_markdown_files(Path::new(root)) {
            Ok(files) => md_files.extend(files),
            Err(e) => {
                eprintln!("{}: {}", output::error_label(), e);
                process::exit(1);
            }
        }
    }
    debug!("{} document(s) to check", md_files.len());

    let mut summary = TestSummary::default();
    let mut failures: Vec<(PathBuf, CheckError)> = Vec::new();

    for md_path in md_files {
        let result = check_file(&md_path, config);
        summary.add(&result);
        let shown = md_path.display().to_string();
        match result {
            Ok(report) => println!("{}", output::document_passed(&shown, report.snippets.len())),
            Err(e) => {
                println!("{}", output::document_failed(&shown));
                failures.push((md_path, e));
            }
        }
    }

    println!("{}", output::summary(&summary));

    if summary.is_success() {
        return;
    }

    println!("\n{}", output::failures_header());
    for (path, err) in &failures {
        println!("{}", output::failure(&path.display().to_string(), &err.to_string()));
        if let Some(details) = err.details() {
            for line in details.lines() {
                println!("    {}", line);
            }
        }
    }
    process::exit(1);
}

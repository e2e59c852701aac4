// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Show what `check` would run for a document.

use colored::Colorize;
use std::process;

use docsnip_check::{extract_snippets, find_expected_outputs, split_raises, CheckConfig};

use crate::output;

pub fn cmd_extract(path: &str, config: &CheckConfig) {
    let source = super::read_source(path);
    let snippets = extract_snippets(&source, &config.fence_language);

    println!("{}\n", output::document_header(path));

    let mut bad_annotations = 0;
    for (i, snippet) in snippets.iter().enumerate() {
        println!("{}", output::block_header(i + 1, snippet.line));
        for (offset, line) in snippet.code.lines().enumerate() {
            println!("{:4} | {}", snippet.line + offset, line);
        }

        match split_raises(&snippet.code) {
            Ok(split) => {
                for expected in find_expected_outputs(split.before) {
                    println!("  {} {}", output::annotation("prints"), expected);
                }
                if let Some(failure) = split.failure {
                    println!(
                        "  {} {} {}",
                        output::annotation("raises"),
                        failure.kind,
                        format!("(line {})", snippet.line + failure.line - 1).dimmed()
                    );
                }
            }
            Err(e) => {
                bad_annotations += 1;
                println!("  {}: {}", output::error_label(), e);
            }
        }
        println!();
    }

    println!("{} block(s)", snippets.len());
    if bad_annotations > 0 {
        process::exit(1);
    }
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Help text for CLI commands.

use colored::Colorize;

use crate::output;

pub fn print_usage() {
    println!(
        "{} {} - Check that documentation code does what it says",
        "docsnip".bold(),
        env!("CARGO_PKG_VERSION").dimmed()
    );
    println!();
    println!(
        "{}: {} {} {}",
        output::heading("Usage"),
        output::command("docsnip"),
        output::placeholder("<command>"),
        output::placeholder("[args]")
    );
    println!();
    println!("{}", output::heading("Commands:"));
    println!("  {} {}   Check every markdown file under the paths (default: docs)", output::command("check"), output::placeholder("[paths]"));
    println!("  {} {} List the code blocks of a document and their annotations", output::command("extract"), output::placeholder("<file>"));
    println!("  {} {}       Run a script with the interpreter", output::command("run"), output::placeholder("<file>"));
    println!("  {}             Show this help", output::command("help"));
    println!("  {}          Show version", output::command("version"));

    println!();
    println!("{}", output::heading("Options:"));
    println!("  {}   Fence tag of the blocks to run (default: python)", output::placeholder("--lang <tag>"));
    println!("  {} Code run before the first block of each document", output::placeholder("--prelude <code>"));
    println!("  {}   Show debug logging (RUST_LOG overrides)", output::placeholder("-v, --verbose"));

    println!();
    println!("{}", output::heading("Annotations:"));
    println!("  {}            Following `# <line>` comments must appear in the output", output::placeholder("# prints"));
    println!("  {}  Following comments are illustrative only", output::placeholder("# prints <words>"));
    println!("  {}     Code from here on must raise Kind (or a subkind)", output::placeholder("# raises <Kind>"));
}

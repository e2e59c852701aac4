// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Extract fenced code blocks from markdown.
//!
//! A block opens with a line that is exactly ```` ```<language> ```` and
//! closes at the next line that is exactly ```` ``` ````. A block that never
//! closes is not a block.

/// One code block, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    /// Line of the first code line (1-indexed)
    pub line: usize,
    /// The code between the fences
    pub code: String,
}

/// Extract every `language` block from markdown content.
pub fn extract_snippets(markdown: &str, language: &str) -> Vec<Snippet> {
    let open = format!("```{}", language);
    let lines: Vec<&str> = markdown
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();

    let mut snippets = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if lines[i] != open {
            i += 1;
            continue;
        }
        let start = i + 1;
        match lines[start..].iter().position(|l| *l == "```") {
            Some(len) => {
                snippets.push(Snippet {
                    line: start + 1,
                    code: lines[start..start + len].join("\n"),
                });
                i = start + len + 1;
            }
            // Unterminated: nothing later can close either.
            None => break,
        }
    }
    snippets
}

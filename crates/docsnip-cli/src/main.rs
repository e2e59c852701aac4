// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! docsnip CLI - check the code blocks of markdown documents.

mod commands;
mod help;
mod logging;
mod output;

use std::env;
use std::process;

use docsnip_check::CheckConfig;

use crate::logging::Level;

/// Flags and positional arguments following the command name.
#[derive(Debug, Default)]
struct Options {
    verbose: bool,
    lang: Option<String>,
    prelude: Option<String>,
    positional: Vec<String>,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self, String> {
        let mut opts = Options::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-v" | "--verbose" => opts.verbose = true,
                "--lang" => opts.lang = Some(value_for(arg, iter.next())?),
                "--prelude" => opts.prelude = Some(value_for(arg, iter.next())?),
                flag if flag.starts_with("--lang=") => {
                    opts.lang = Some(flag["--lang=".len()..].to_string());
                }
                flag if flag.starts_with("--prelude=") => {
                    opts.prelude = Some(flag["--prelude=".len()..].to_string());
                }
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(format!("unknown option: {}", flag));
                }
                _ => opts.positional.push(arg.clone()),
            }
        }
        Ok(opts)
    }

    fn config(&self) -> CheckConfig {
        let mut config = CheckConfig::default();
        if let Some(lang) = &self.lang {
            config = config.with_fence_language(lang.as_str());
        }
        if let Some(prelude) = &self.prelude {
            config = config.with_prelude(prelude.as_str());
        }
        config
    }
}

fn value_for(flag: &str, value: Option<&String>) -> Result<String, String> {
    value.cloned().ok_or_else(|| format!("{} requires a value", flag))
}

fn main() {
    output::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        help::print_usage();
        return;
    }

    let opts = match Options::parse(&args[2..]) {
        Ok(opts) => opts,
        Err(msg) => {
            eprintln!("{}: {}", output::error_label(), msg);
            process::exit(2);
        }
    };
    logging::setup_logging(if opts.verbose { Level::Verbose } else { Level::Default });

    match args[1].as_str() {
        "check" => commands::check::cmd_check(&opts.positional, &opts.config()),
        "extract" => {
            let Some(path) = opts.positional.first() else {
                eprintln!("Usage: docsnip extract <file.md> [--lang <tag>]");
                process::exit(1);
            };
            commands::extract::cmd_extract(path, &opts.config());
        }
        "run" => {
            let Some(path) = opts.positional.first() else {
                eprintln!("Usage: docsnip run <file>");
                process::exit(1);
            };
            commands::run::cmd_run(path);
        }
        "help" | "--help" | "-h" => help::print_usage(),
        "version" | "--version" | "-V" => println!("docsnip {}", env!("CARGO_PKG_VERSION")),
        other => {
            eprintln!("{}: unknown command: {}", output::error_label(), other);
            help::print_usage();
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options, String> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        Options::parse(&args)
    }

    #[test]
    fn flags_and_paths() {
        let opts = parse(&["docs", "-v", "--lang", "py", "README.md", "--prelude", "import math"]).unwrap();
        assert!(opts.verbose);
        assert_eq!(opts.positional, vec!["docs", "README.md"]);
        let config = opts.config();
        assert_eq!(config.fence_language, "py");
        assert_eq!(config.prelude.as_deref(), Some("import math"));
    }

    #[test]
    fn inline_lang_value() {
        assert_eq!(parse(&["--lang=python3"]).unwrap().config().fence_language, "python3");
    }

    #[test]
    fn inline_prelude_value() {
        let opts = parse(&["--prelude=import math", "docs"]).unwrap();
        assert_eq!(opts.config().prelude.as_deref(), Some("import math"));
        assert_eq!(opts.positional, vec!["docs"]);
    }

    #[test]
    fn bad_flags() {
        assert_eq!(parse(&["--lang"]).unwrap_err(), "--lang requires a value");
        assert_eq!(parse(&["--fast"]).unwrap_err(), "unknown option: --fast");
    }

    #[test]
    fn defaults() {
        let opts = parse(&[]).unwrap();
        assert!(!opts.verbose);
        assert_eq!(opts.config().fence_language, "python");
        assert!(opts.config().prelude.is_none());
    }
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const VERBOSE_DIRECTIVES: &str = "docsnip_cli=debug,docsnip_check=debug,docsnip_interp=debug";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Level {
    /// Show user-facing output only.
    #[default]
    Default,
    /// Also show debug messages from the checker.
    Verbose,
}

/// Configure `tracing` for the given [`Level`]. `RUST_LOG` overrides the
/// default filter either way.
///
/// Log lines go to stderr so they never mix with checked output.
pub(crate) fn setup_logging(level: Level) {
    let filter = match level {
        Level::Default => EnvFilter::builder()
            .with_default_directive(LevelFilter::OFF.into())
            .from_env_lossy(),
        Level::Verbose => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(VERBOSE_DIRECTIVES)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_target(level == Level::Verbose)
                .with_writer(std::io::stderr),
        )
        .init();
}

//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining what gets logged:
//! 1. `PAQUE_LOG` environment variable (an `EnvFilter` directive, e.g. "debug")
//! 2. verbosity flags on the command line
//!
//! Events render as `LEVEL - message`, the level coloured when stderr is a
//! terminal.

use anyhow::{anyhow, Result};
use colored::{ColoredString, Colorize};
use std::fmt;
use std::io::{self, IsTerminal};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter
pub const LOG_ENV: &str = "PAQUE_LOG";

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

impl Verbosity {
    /// Filter directive for this verbosity
    pub fn directive(self) -> &'static str {
        match self {
            Verbosity::Silent => "off",
            Verbosity::Quiet => "paque=warn",
            Verbosity::Normal => "paque=info",
            Verbosity::Verbose => "paque=debug",
        }
    }
}

/// Initialise the global logging subscriber.
///
/// Call once at startup.
pub fn init_logging(verbosity: Verbosity) -> Result<()> {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directive) if !directive.trim().is_empty() => EnvFilter::try_new(directive)?,
        _ => EnvFilter::new(verbosity.directive()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .event_format(LevelPrefix)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {}", e))
}

/// Formats events as `LEVEL - message`
pub struct LevelPrefix;

impl<S, N> FormatEvent<S, N> for LevelPrefix
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let level = *event.metadata().level();

        if writer.has_ansi_escapes() {
            write!(writer, "{} - ", paint(level))?;
        } else {
            write!(writer, "{} - ", level)?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn paint(level: Level) -> ColoredString {
    let label = level.to_string();
    match level {
        Level::ERROR => label.red(),
        Level::WARN => label.purple(),
        Level::INFO => label.cyan(),
        Level::DEBUG => label.yellow(),
        _ => label.normal(),
    }
}

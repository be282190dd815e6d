//! Diagnostic logging to stderr.
//!
//! Library crates emit `tracing` events; this module installs the subscriber
//! that renders them. `RUST_LOG` overrides the level picked from `--verbose`.

use colored::{ColoredString, Colorize};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// Compact one-line event format with a level marker
pub struct MarkerFormatter;

impl<S, N> FormatEvent<S, N> for MarkerFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        let (symbol, paint): (&str, fn(ColoredString) -> ColoredString) = match *meta.level() {
            Level::TRACE => ("[ ]", |s| s.dimmed()),
            Level::DEBUG => ("[?]", |s| s.blue()),
            Level::INFO => ("[+]", |s| s.green().bold()),
            Level::WARN => ("[*]", |s| s.yellow().bold()),
            Level::ERROR => ("[-]", |s| s.red().bold()),
        };

        write!(writer, "{} ", paint(symbol.into()))?;

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, "{}: ", span.name().dimmed())?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Default filter directive for a verbosity flag
pub const fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "greencheck=debug,greencheck_engine=debug,greencheck_client=debug,greencheck_core=debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber.
///
/// Calling this twice is harmless; the second install is ignored.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .event_format(MarkerFormatter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_enables_debug_for_workspace_crates() {
        assert_eq!(default_directive(false), "warn");
        assert!(default_directive(true).contains("greencheck_engine=debug"));
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init(false);
        init(true);
    }
}

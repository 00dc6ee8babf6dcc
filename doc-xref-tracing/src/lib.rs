//! Tracing utility shared between doc-xref crates.

use ansiterm::Colour;
use std::{env, io};
use tracing::{Level, Metadata};
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::MakeWriter,
};

pub fn println_green(txt: &str) {
    tracing::info!("{}", Colour::Green.paint(txt));
}

pub fn println_yellow_err(txt: &str) {
    tracing::warn!("{}", Colour::Yellow.paint(txt));
}

pub fn println_red_err(txt: &str) {
    tracing::error!("{}", Colour::Red.paint(txt));
}

/// Prints a cargo-style action line, e.g. `    Indexing 12 traits`.
pub fn println_action_green(action: &str, txt: &str) {
    tracing::info!("{} {}", Colour::Green.bold().paint(format!("{action:>12}")), txt);
}

const LOG_FILTER: &str = "RUST_LOG";

/// Routes ERROR and WARN level logs to stderr and everything else to stdout,
/// so progress lines stay pipeable while warnings remain visible.
struct StdioTracingWriter {
    writer_mode: TracingWriterMode,
}

impl<'a> MakeWriter<'a> for StdioTracingWriter {
    type Writer = Box<dyn io::Write>;

    fn make_writer(&'a self) -> Self::Writer {
        // Without metadata to look at, fall back to the mode's plain stream.
        if self.writer_mode == TracingWriterMode::Stderr {
            Box::new(io::stderr())
        } else {
            Box::new(io::stdout())
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        if self.writer_mode == TracingWriterMode::Stderr
            || (self.writer_mode == TracingWriterMode::Stdio && meta.level() <= &Level::WARN)
        {
            return Box::new(io::stderr());
        }
        Box::new(io::stdout())
    }
}

#[derive(PartialEq, Eq)]
pub enum TracingWriterMode {
    /// Write ERROR and WARN to stderr and everything else to stdout.
    Stdio,
    /// Write everything to stdout.
    Stdout,
    /// Write everything to stderr.
    Stderr,
}

#[derive(Default)]
pub struct TracingSubscriberOptions {
    pub verbosity: Option<u8>,
    pub silent: Option<bool>,
    pub log_level: Option<LevelFilter>,
    pub writer_mode: Option<TracingWriterMode>,
}

/// Initializes a subscriber whose plain output matches `println!` so the
/// binaries read like ordinary command line tools.
///
/// The `RUST_LOG` environment variable can be used to set a different minimum
/// level for the subscriber, the default is `INFO`.
pub fn init_tracing_subscriber(options: TracingSubscriberOptions) {
    let env_filter = match env::var_os(LOG_FILTER) {
        Some(_) => EnvFilter::try_from_default_env().expect("Invalid `RUST_LOG` provided"),
        None => EnvFilter::new("info"),
    };

    let level_filter = options
        .log_level
        .or_else(|| {
            options.verbosity.and_then(|verbosity| match verbosity {
                1 => Some(LevelFilter::DEBUG),
                2 => Some(LevelFilter::TRACE),
                _ => None,
            })
        })
        .or_else(|| match options.silent {
            Some(true) => Some(LevelFilter::OFF),
            _ => None,
        });

    let builder = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_ansi(true)
        .with_level(false)
        .with_file(false)
        .with_line_number(false)
        .without_time()
        .with_target(false)
        .with_writer(StdioTracingWriter {
            writer_mode: options.writer_mode.unwrap_or(TracingWriterMode::Stdio),
        });

    // An explicit log level, verbosity, or silent mode overrides `RUST_LOG`.
    if let Some(level_filter) = level_filter {
        builder.with_max_level(level_filter).init();
    } else {
        builder.init();
    }
}

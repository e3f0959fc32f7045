//! Tracing subscriber initialisation.
//!
//! Only the CLI crate is allowed to call [`init_logging`]; `gantry-core`
//! and `gantry-adapters` only *emit* spans and events.
//!
//! # Verbosity mapping
//!
//! | Flag(s)     | Filter level |
//! |-------------|--------------|
//! | (none)      | WARN         |
//! | `APP_DEBUG` | DEBUG        |
//! | `-v`        | INFO         |
//! | `-vv`       | DEBUG        |
//! | `-vvv`      | TRACE        |
//! | `--quiet`   | ERROR        |
//!
//! `RUST_LOG` overrides all of the above if set. It only governs stderr;
//! file targets from the application's log config keep their own levels.

use std::io::IsTerminal as _;
use std::path::Path;

use gantry_core::domain::{LogConfig, LogLevel, LogTargetKind, TraceLevel};
use tracing::Level;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    filter::{LevelFilter, filter_fn},
    fmt::format::FmtSpan,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::cli::GlobalArgs;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the non-blocking file writers flushing until dropped.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _workers: Vec<WorkerGuard>,
}

/// Initialise the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros fire. `log` is the
/// application's log config when the environment could be read; without it
/// only the stderr layer is installed.
pub fn init_logging(args: &GlobalArgs, log: Option<&LogConfig>) -> anyhow::Result<LoggingGuard> {
    let level = derive_level(args, log);

    // RUST_LOG wins; otherwise build our own filter string so each crate gets
    // the same level as the top-level filter.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "gantry={level},gantry_core={level},gantry_adapters={level},tower_http={level}"
        ))
    });

    let use_ansi = !args.no_color && std::io::stderr().is_terminal();
    let trace_level = log.map_or(TraceLevel::Off, |l| l.trace_level);
    let located = trace_level != TraceLevel::Off;
    let full = trace_level == TraceLevel::Full;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(full)
        .with_thread_ids(full)
        .with_file(located)
        .with_line_number(located)
        .with_span_events(if full { FmtSpan::NEW | FmtSpan::CLOSE } else { FmtSpan::NONE })
        .with_ansi(use_ansi)
        .with_writer(std::io::stderr)
        .with_filter(filter);

    let files = file_layers(log);

    // `try_init` returns an error instead of panicking if a subscriber is
    // already set.
    tracing_subscriber::registry()
        .with(files.layers)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))?;

    for reason in &files.skipped {
        tracing::warn!("File logging disabled: {reason}");
    }

    Ok(LoggingGuard {
        _workers: files.workers,
    })
}

/// Layers for the file targets that could be opened.
struct FileLayers {
    layers: Vec<BoxedLayer>,
    workers: Vec<WorkerGuard>,
    /// Why each remaining file target was left out.
    skipped: Vec<String>,
}

/// An unwritable log directory never stops the command itself.
fn file_layers(log: Option<&LogConfig>) -> FileLayers {
    let mut files = FileLayers {
        layers: Vec::new(),
        workers: Vec::new(),
        skipped: Vec::new(),
    };
    for target in log.map(|l| l.targets.as_slice()).unwrap_or_default() {
        if let LogTargetKind::File { path } = &target.kind {
            match file_layer(path, &target.levels) {
                Ok((layer, guard)) => {
                    files.layers.push(layer);
                    files.workers.push(guard);
                }
                Err(e) => files.skipped.push(e.to_string()),
            }
        }
    }
    files
}

/// A non-blocking plain-text layer writing `levels` to `path`.
fn file_layer(path: &Path, levels: &[LogLevel]) -> anyhow::Result<(BoxedLayer, WorkerGuard)> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Log target {} has no file name", path.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .map_err(|e| anyhow::anyhow!("Cannot open log file {}: {e}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let allowed: Vec<Level> = levels.iter().flat_map(|l| tracing_levels(*l)).copied().collect();
    let layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(filter_fn(move |meta| allowed.contains(meta.level())))
        .boxed();
    Ok((layer, guard))
}

/// Tracing levels a configured log level stands for.
fn tracing_levels(level: LogLevel) -> &'static [Level] {
    match level {
        LogLevel::Error => &[Level::ERROR],
        LogLevel::Warning => &[Level::WARN],
        LogLevel::Info => &[Level::INFO],
        LogLevel::Trace => &[Level::DEBUG, Level::TRACE],
    }
}

/// Translate the verbosity counter, quiet flag and debug mode to a level.
fn derive_level(args: &GlobalArgs, log: Option<&LogConfig>) -> LevelFilter {
    if args.quiet {
        return LevelFilter::ERROR;
    }
    let console_target = log.is_some_and(|l| {
        l.targets
            .iter()
            .any(|t| matches!(t.kind, LogTargetKind::Console))
    });
    match args.verbose {
        0 if console_target => LevelFilter::DEBUG,
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

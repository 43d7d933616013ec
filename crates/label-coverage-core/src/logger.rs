//! Stderr logger for the command-line front end.
//!
//! Geometry functions in this crate never emit records; the logger exists so
//! binaries built on top of it share one output format:
//! `[  0.004s  INFO analyze] message`.
//!
//! Records from this workspace's crates pass at the requested level. Records
//! from dependencies are capped at `warn` so `--log-level trace` stays
//! readable.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{filter::ParseError, fmt, EnvFilter};

/// Crate names whose records follow the requested level.
const WORKSPACE_TARGETS: [&str; 2] = ["label_coverage", "label_coverage_core"];

fn is_workspace_target(target: &str) -> bool {
    let krate = target.split("::").next().unwrap_or(target);
    WORKSPACE_TARGETS.contains(&krate)
}

/// `label_coverage::analyze` -> `analyze`; foreign targets are kept whole.
fn short_target(target: &str) -> &str {
    match target.split_once("::") {
        Some((krate, rest)) if WORKSPACE_TARGETS.contains(&krate) => rest,
        _ => target,
    }
}

struct StderrLogger {
    level: LevelFilter,
    dependency_level: LevelFilter,
    started: Instant,
}

impl StderrLogger {
    fn new(level: LevelFilter) -> Self {
        Self {
            level,
            dependency_level: level.min(LevelFilter::Warn),
            started: Instant::now(),
        }
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let limit = if is_workspace_target(metadata.target()) {
            self.level
        } else {
            self.dependency_level
        };
        metadata.level() <= limit
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:7.3}s {:>5} {}] {}",
            elapsed,
            record.level(),
            short_target(record.target()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger with the provided level filter.
///
/// Only the first call installs anything; later calls return `Ok(())` and
/// leave the first level in place.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| StderrLogger::new(level));
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// `EnvFilter` directives equivalent to the stderr logger's policy:
/// workspace crates at `level`, everything else at `warn` or quieter.
#[cfg(feature = "tracing")]
fn workspace_directives(level: &str) -> String {
    let level = level.trim().to_ascii_lowercase();
    let dependency = match level.as_str() {
        "off" | "error" => level.as_str(),
        _ => "warn",
    };
    let mut directives = dependency.to_string();
    for krate in WORKSPACE_TARGETS {
        directives.push_str(&format!(",{krate}={level}"));
    }
    directives
}

/// Install a `tracing` fmt subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise `level` applies to this workspace's
/// crates as in [`init_with_level`]. With `json`, events are emitted as
/// flattened JSON lines. An unknown `level` is a parse error; a second call
/// is a no-op.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool, level: &str) -> Result<(), ParseError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(workspace_directives(level))?,
    };
    if json {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .json()
            .flatten_event(true)
            .finish()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
    Ok(())
}

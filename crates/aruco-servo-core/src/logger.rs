//! Stderr logging for the servo process.
//!
//! Records from the `aruco_servo*` crates pass at the level given to
//! [`init_with_level`]. Records from other crates (r2r, OpenCV bindings) are
//! capped at `Warn` so a debug run shows the servo decisions only. Lines look
//! like `   12.345 DEBUG pipeline: diff=10 -> DOWN`.
//!
//! With the `tracing` feature, `init_tracing` installs a `tracing-subscriber`
//! instead; its `tracing-log` bridge picks up `log` records.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

const OWN_TARGET_PREFIX: &str = "aruco_servo";
const FOREIGN_LEVEL_CAP: LevelFilter = LevelFilter::Warn;

struct ServoLogger {
    own: LevelFilter,
    foreign: LevelFilter,
    started: Instant,
}

impl ServoLogger {
    fn new(level: LevelFilter) -> Self {
        Self {
            own: level,
            foreign: level.min(FOREIGN_LEVEL_CAP),
            started: Instant::now(),
        }
    }

    fn filter_for(&self, target: &str) -> LevelFilter {
        if target.starts_with(OWN_TARGET_PREFIX) {
            self.own
        } else {
            self.foreign
        }
    }
}

/// Last `::` segment of a log target.
fn short_target(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

impl Log for ServoLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "{:>9.3} {:<5} {}: {}",
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

static LOGGER: OnceLock<ServoLogger> = OnceLock::new();

/// Install the stderr logger. Later calls keep the first level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| ServoLogger::new(level));
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// `EnvFilter` directives matching [`init_with_level`]'s own/foreign split.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
fn default_directives(level: LevelFilter) -> String {
    let foreign = level.min(FOREIGN_LEVEL_CAP).as_str().to_ascii_lowercase();
    let own = level.as_str().to_ascii_lowercase();
    format!("{foreign},{OWN_TARGET_PREFIX}={own}")
}

/// Install a `tracing` subscriber. `RUST_LOG` wins when set; otherwise the
/// servo crates log at `level` and everything else at most at `warn`.
///
/// Text output closes a span per cycle, so `run_cycle` timings show up
/// next to the decisions. JSON output flattens fields into each event.
#[cfg(feature = "tracing")]
pub fn init_tracing(level: LevelFilter, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));
    let _ = if json {
        fmt()
            .with_env_filter(filter)
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .finish()
            .try_init()
    } else {
        fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_timer(fmt::time::Uptime::default())
            .with_target(false)
            .finish()
            .try_init()
    };
}

#![cfg(feature = "std")]

use std::env;

use log::{LevelFilter, Log, Metadata, Record};

/// Environment variable holding the log level (`error` .. `trace`, `off`).
const LOG_ENV: &str = "BROADSIDE_LOG";

/// Writes to stderr; stdout belongs to the game.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{:<5} {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn parse_level(value: Option<&str>, default: LevelFilter) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Install the stderr logger. The level comes from `BROADSIDE_LOG`, falling
/// back to `default` when unset or unparsable. Only the first call has an
/// effect.
pub fn init_logging_with(default: LevelFilter) {
    let level = parse_level(env::var(LOG_ENV).ok().as_deref(), default);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

/// [`init_logging_with`] at `info`.
pub fn init_logging() {
    init_logging_with(LevelFilter::Info)
}


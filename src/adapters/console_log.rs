//! Console logger for host builds.
//!
//! A minimal `log::Log` backend writing `LEVEL target: message` lines with
//! a millisecond uptime stamp to stderr.

use std::io::Write as _;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

struct ConsoleLogger {
    start: Instant,
    level: LevelFilter,
}

static LOGGER: OnceLock<ConsoleLogger> = OnceLock::new();

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let ms = self.start.elapsed().as_millis();
        let mut out = std::io::stderr().lock();
        // A closed stderr leaves nowhere to report the failure.
        let _ = writeln!(
            out,
            "[{:>8}] {:<5} {}: {}",
            ms,
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Parse a level name (`error`, `warn`, `info`, `debug`, `trace`, `off`).
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    name.parse().ok()
}

/// Install the console logger. The level comes from `TRAFOCTL_LOG` if set
/// and valid, otherwise `default`.
pub fn init(default: LevelFilter) -> Result<(), log::SetLoggerError> {
    let level = std::env::var("TRAFOCTL_LOG")
        .ok()
        .and_then(|v| parse_level(&v))
        .unwrap_or(default);
    let logger = LOGGER.get_or_init(|| ConsoleLogger {
        start: Instant::now(),
        level,
    });
    log::set_logger(logger)?;
    log::set_max_level(logger.level);
    Ok(())
}

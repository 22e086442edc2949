// This module defines a super simple logger that works with the `log` crate.
// We don't need anything fancy; just basic log levels and the ability to
// print to stderr. We therefore avoid bringing in extra dependencies just
// for this functionality.

use log::Log;

/// The simplest possible logger that logs to stderr.
///
/// This logger does no filtering. Instead, it relies on the `log` crate's
/// filtering via its global max_level setting.
#[derive(Debug)]
pub struct Logger;

impl Logger {
    /// Initialize a logger that logs to stderr as the global logger. If
    /// there was a problem setting the logger, then an error is returned.
    pub fn init() -> Result<(), log::SetLoggerError> {
        static LOGGER: Logger = Logger;
        log::set_logger(&LOGGER)
    }
}

impl Log for Logger {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        // We set the log level via log::set_max_level, so we don't need to
        // implement filtering here.
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        // Timestamps are emitted in UTC. The library this binary fronts
        // resolves zones per parse, so there is no ambient "local" zone
        // worth threading through here.
        let now = jiff::Timestamp::now();
        match (record.file(), record.line()) {
            (Some(file), Some(line)) => {
                eprintln!(
                    "{}|{}|{}:{}: {}",
                    now,
                    record.level(),
                    file,
                    line,
                    record.args()
                );
            }
            (Some(file), None) => {
                eprintln!(
                    "{}|{}|{}: {}",
                    now,
                    record.level(),
                    file,
                    record.args()
                );
            }
            _ => {
                eprintln!("{}|{}: {}", now, record.level(), record.args());
            }
        }
    }

    fn flush(&self) {
        // We use eprintln! which is flushed on every call.
    }
}

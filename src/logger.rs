use std::io::{IsTerminal, Write};
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

use crate::theme;

struct MakelogsLogger {
    file: Option<Mutex<std::fs::File>>,
    filter: LevelFilter,
    color: bool,
    start: Instant,
}

/// Prefix shown on stderr for a record of `level`
#[must_use]
pub fn level_prefix(level: Level, color: bool) -> String {
    match level {
        Level::Error => theme::paint(theme::ERROR, "Error:", color),
        Level::Warn => theme::paint(theme::WARNING, "Warning:", color),
        Level::Info => "Info:".to_string(),
        Level::Debug | Level::Trace => theme::paint(theme::GRAY, "Debug:", color),
    }
}

/// Level from `RUST_LOG`, or `warn` (`debug` when verbose)
#[must_use]
pub fn level_filter(rust_log: Option<&str>, verbose: bool) -> LevelFilter {
    rust_log
        .and_then(|s| s.parse().ok())
        .unwrap_or(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
}

impl Log for MakelogsLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let _ = writeln!(
            std::io::stderr(),
            "{} {}",
            level_prefix(record.level(), self.color),
            record.args()
        );

        if let Some(ref file) = self.file {
            let elapsed = Instant::now().duration_since(self.start).as_secs_f64();
            let _ = writeln!(
                file.lock(),
                "[{elapsed:.3}s] [{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
        if let Some(ref file) = self.file {
            let _ = file.lock().flush();
        }
    }
}

/// Install the global logger, writing to stderr and optionally to `log_file`.
///
/// # Errors
///
/// Returns `SetLoggerError` if a logger is already installed.
pub fn init(log_file: Option<std::fs::File>, verbose: bool) -> Result<(), log::SetLoggerError> {
    let filter = level_filter(std::env::var("RUST_LOG").ok().as_deref(), verbose);

    let logger = MakelogsLogger {
        file: log_file.map(Mutex::new),
        filter,
        color: std::io::stderr().is_terminal(),
        start: Instant::now(),
    };

    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(filter);
    Ok(())
}

//! Colored stderr logger behind the `log` facade.

use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter, Log, Metadata, Record};

struct Logger {
    level: LevelFilter,
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        eprintln!("{} {}", prefix(record.level()), record.args());
    }

    fn flush(&self) {}
}

fn prefix(level: Level) -> ColoredString {
    let label = format!("[{}]", level.as_str().to_lowercase());
    match level {
        Level::Error => label.bright_red().bold(),
        Level::Warn => label.bright_yellow().bold(),
        Level::Info => label.bright_green().bold(),
        Level::Debug => label.bright_blue().bold(),
        Level::Trace => label.dimmed(),
    }
}

/// Level for a count of `-v` flags.
pub fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the logger. Later calls are ignored.
pub fn init(verbose: u8) {
    let level = level_for(verbose);
    let logger: &'static Logger = Box::leak(Box::new(Logger { level }));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}

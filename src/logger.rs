//! Minimal `log` backend: one line per record on stderr with a coloured level tag.

use ansi_term::Colour::{Blue, Green, Purple, Red, Yellow};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

/// Install the logger with `level` as the maximum level. Fails if a logger is already set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

fn tag(level: Level) -> String {
    let colour = match level {
        Level::Error => Red,
        Level::Warn => Yellow,
        Level::Info => Green,
        Level::Debug => Blue,
        Level::Trace => Purple,
    };
    colour.bold().paint(level.as_str()).to_string()
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // Trace lines are already column-aligned; keep them free of the target
        if record.level() == Level::Trace {
            eprintln!("{} {}", tag(record.level()), record.args());
        } else {
            eprintln!(
                "{} [{}] {}",
                tag(record.level()),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

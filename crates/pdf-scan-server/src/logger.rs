use chrono::{DateTime, Local};
use log::{Level, LevelFilter, Metadata, Record};
use std::fmt;
use std::io::Write;

/// Crates whose records are shown at the configured level; everything else
/// is capped at warnings.
const OWN_TARGETS: [&str; 2] = ["pdf_scan", "pdf_scan_server"];

#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:<5} {}: {}",
            self.timestamp.format("%Y-%m-%dT%H:%M:%S%.3f"),
            self.level,
            self.target,
            self.message
        )
    }
}

/// Writes timestamped log lines to stderr
#[derive(Clone)]
pub struct StderrLogger {
    level: LevelFilter,
}

impl StderrLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }

    fn level_for(&self, target: &str) -> LevelFilter {
        let own = OWN_TARGETS
            .iter()
            .any(|prefix| target == *prefix || target.starts_with(&format!("{}::", prefix)));
        if own {
            self.level
        } else {
            self.level.min(LevelFilter::Warn)
        }
    }
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let entry = LogEntry {
                timestamp: Local::now(),
                level: record.level(),
                target: record.target().to_string(),
                message: format!("{}", record.args()),
            };

            let _ = writeln!(std::io::stderr().lock(), "{}", entry);
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

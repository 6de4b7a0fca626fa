//! stderr‑Logger mit UTC‑Zeitstempel im asctime‑Format.

use std::io::Write;

use chrono::{DateTime, Utc};
use log::{LevelFilter, Log, Metadata, Record};
use once_cell::sync::OnceCell;

use crate::ClError;

static LOGGER: OnceCell<UtcLogger> = OnceCell::new();

struct UtcLogger {
    level: LevelFilter,
}

impl Log for UtcLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(&utc_now(), record.level(), record.target(), record.args());
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Installiert den Logger einmalig; ein zweiter Aufruf liefert `ClError::Logger`.
pub fn init_logger(level: LevelFilter) -> Result<(), ClError> {
    let logger = LOGGER.get_or_init(|| UtcLogger { level });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

#[inline]
pub fn utc_now() -> DateTime<Utc> {
    Utc::now()
}

/// `<Wochentag> <Monat> <Tag> <hh>:<mm>:<ss> <Jahr> UTC`, Tag mit Leerzeichen aufgefüllt
pub fn format_time(time: &DateTime<Utc>) -> String {
    time.format("%a %b %e %H:%M:%S %Y UTC").to_string()
}

pub fn format_line(
    time: &DateTime<Utc>,
    level: log::Level,
    target: &str,
    args: &std::fmt::Arguments<'_>,
) -> String {
    format!("[{}] {level:<5} {target}: {args}", format_time(time))
}

//! Debug logging for promptkit
//!
//! Installs a [`log`] backend that appends to a file when `PROMPTKIT_DEBUG`
//! is `1` or `true`. The terminal itself is busy drawing prompts, so log
//! records never go to stdout or stderr.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use log::{LevelFilter, Log, Metadata, Record};

const ENV_ENABLE_LOG: &str = "PROMPTKIT_DEBUG";
const ENV_LOG_LEVEL: &str = "PROMPTKIT_LOG_LEVEL";

struct FileLogger {
    file: Mutex<File>,
    level: LevelFilter,
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{}", format_record(record));
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

fn format_record(record: &Record) -> String {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!(
        "[{}.{:03}] {:<5} {}: {}",
        timestamp.as_secs(),
        timestamp.subsec_millis(),
        record.level(),
        record.target(),
        record.args()
    )
}

/// Whether an env value switches the debug log on.
pub fn is_enabled_value(value: &str) -> bool {
    matches!(value, "1" | "true")
}

/// Parse a `PROMPTKIT_LOG_LEVEL` value; unknown values fall back to `debug`.
pub fn parse_level(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(LevelFilter::Debug)
}

fn log_path() -> &'static str {
    if Path::new("tmp").exists() {
        "tmp/promptkit-debug.log"
    } else {
        "/tmp/promptkit-debug.log"
    }
}

/// Install the file logger if `PROMPTKIT_DEBUG` asks for it.
///
/// Returns whether a logger was installed. Safe to call more than once; only
/// the first successful call installs anything.
pub fn init() -> bool {
    let enabled = std::env::var(ENV_ENABLE_LOG)
        .map(|v| is_enabled_value(&v))
        .unwrap_or(false);
    if !enabled {
        return false;
    }

    let level = parse_level(std::env::var(ENV_LOG_LEVEL).ok().as_deref());
    let path = log_path();
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open debug log file {path}: {e}");
            return false;
        }
    };

    let logger = FileLogger {
        file: Mutex::new(file),
        level,
    };
    if log::set_boxed_logger(Box::new(logger)).is_err() {
        return false;
    }
    log::set_max_level(level);
    eprintln!("promptkit debug log enabled: {path}");
    true
}

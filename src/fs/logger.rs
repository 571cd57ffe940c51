//! File-based logger implementation.
//!
//! This module implements the [`log`] crate's logging facade, writing log
//! messages to both the console and a file. On the robot the file lives on
//! the V5 Brain's SD card.
//!
//! # Usage
//!
//! Initialize the logger once at the start of your program:
//!
//! ```no_run
//! use clawbot::fs::logger;
//! use log::{LevelFilter, info, warn};
//!
//! logger::init(LevelFilter::Debug).expect("Logger init failed");
//!
//! info!("Program started");
//! warn!("This is a warning");
//! ```
//!
//! # Log Output
//!
//! Each log entry includes:
//! - Log level (TRACE, DEBUG, INFO, WARN, ERROR)
//! - Timestamp (time since program start)
//! - Target (module path)
//! - Message
//!
//! Example output:
//! ```text
//! INFO [2m 5s 120ms] clawbot::opcontrol::controller - Operator control started (20 ms period, arm Joystick { .. })
//! DEBUG [2m 7s 340ms] clawbot::opcontrol::claw - Claw closing from progress 0
//! ```

use std::{
    fmt,
    fs::OpenOptions,
    io::{BufWriter, Write},
    path::Path,
    sync::{Mutex, OnceLock},
    time::Duration,
};

use humantime::format_duration;
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

/// File the logger writes to when no path is given.
pub const DEFAULT_LOG_PATH: &str = "log.txt";

/// A dual-output logger.
///
/// Writes log messages to both the console and a file. The file is
/// created/truncated when the logger is initialized.
pub struct ClawLogger {
    /// Buffered file writer for log output.
    ///
    /// `None` if the file could not be opened (e.g., no SD card present);
    /// console output continues regardless.
    file_writer: Mutex<Option<BufWriter<std::fs::File>>>,
    #[cfg(not(feature = "vexide"))]
    started:     std::time::Instant,
}

impl ClawLogger {
    fn new(path: &Path) -> Self {
        let file_writer = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .ok()
            .map(BufWriter::new);

        Self {
            file_writer: Mutex::new(file_writer),
            #[cfg(not(feature = "vexide"))]
            started: std::time::Instant::now(),
        }
    }

    /// Whether the log file could be opened.
    pub fn has_file(&self) -> bool {
        self.file_writer
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Time since the user program started.
    #[cfg(feature = "vexide")]
    fn uptime(&self) -> Duration { vexide::time::user_uptime() }

    /// Time since the logger was created.
    #[cfg(not(feature = "vexide"))]
    fn uptime(&self) -> Duration { self.started.elapsed() }
}

impl log::Log for ClawLogger {
    fn enabled(&self, metadata: &Metadata) -> bool { metadata.level() <= log::max_level() }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let log_line = format_line(
                record.level(),
                self.uptime(),
                record.target(),
                record.args(),
            );

            print!("{}", log_line);

            if let Ok(mut writer_guard) = self.file_writer.lock() {
                if let Some(ref mut writer) = *writer_guard {
                    let _ = writer.write_all(log_line.as_bytes());
                }
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut writer_guard) = self.file_writer.lock() {
            if let Some(ref mut writer) = *writer_guard {
                let _ = writer.flush();
            }
        }
    }
}

static LOGGER: OnceLock<ClawLogger> = OnceLock::new();

/// Initializes the logger, writing to [`DEFAULT_LOG_PATH`].
///
/// This function must be called once before any logging macros are used.
///
/// # Arguments
///
/// * `level` - The minimum log level to record. Messages below this level
///   will be ignored. Use [`LevelFilter::Trace`] to see every control cycle
///   or [`LevelFilter::Info`] for session start and stop only.
///
/// # Errors
///
/// Returns [`SetLoggerError`] if a logger has already been set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    init_with_path(level, DEFAULT_LOG_PATH)
}

/// Initializes the logger, writing to `path`.
///
/// Only the first call picks the path; later calls fail with
/// [`SetLoggerError`] like [`init`].
///
/// # Errors
///
/// Returns [`SetLoggerError`] if a logger has already been set.
pub fn init_with_path(level: LevelFilter, path: impl AsRef<Path>) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| ClawLogger::new(path.as_ref()));
    log::set_logger(logger).map(|()| log::set_max_level(level))
}

/// Formats one log line, newline included.
fn format_line(level: Level, uptime: Duration, target: &str, args: &fmt::Arguments) -> String {
    // humantime prints sub-millisecond digits we have no use for
    let uptime = Duration::from_millis(uptime.as_millis() as u64);
    format!(
        "{} [{}] {} - {}\n",
        level,
        format_duration(uptime),
        target,
        args
    )
}

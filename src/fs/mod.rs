//! Filesystem utilities.
//!
//! This module provides utilities for interacting with the filesystem, which
//! on the robot is the V5 Brain's SD card.
//!
//! # Logging
//!
//! The `logger` submodule provides a file-based logger that writes to
//! `log.txt` (or a path of your choosing). This is useful for reviewing a
//! driver session after the match, when the console is no longer attached.
//!
//! # Example
//!
//! ```no_run
//! use clawbot::fs::logger;
//! use log::{LevelFilter, info};
//!
//! // Initialize the logger at program start
//! logger::init(LevelFilter::Debug).expect("Failed to initialize logger");
//!
//! // Now you can use standard logging macros
//! info!("Robot initialized successfully");
//! ```

/// File-based logging.
///
/// Provides a logger implementation that writes to both the console
/// and a file.
pub mod logger;

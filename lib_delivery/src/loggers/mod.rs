//! # Loggers Module
//!
//! Logger installation for the binaries. The library itself only emits
//! through the `log` facade.
//!
//! ## Contained Modules:
//!
//! - **`setup`**: `fern` dispatch to a colored console and a timestamped log
//!   file, keeping only the newest log file in the directory.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// fern console/file logger.
pub mod setup;

pub use setup::{parse_level, setup_logging};

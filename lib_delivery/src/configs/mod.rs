//! # Configuration Module
//!
//! Site delivery settings, resolved in three layers: built-in defaults, an
//! optional JSON5 file, then `SITE_*` environment variables. Every field is an
//! `Option` so layers merge field by field, later layers winning.
//!
//! ## Contained Modules:
//!
//! - **`delivery_config`**: the `DeliveryConfig` sections, loading, merging and
//!   the conversions into retry policies, render options and source settings.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Delivery configuration.
pub mod delivery_config;

pub use delivery_config::{ConfigError, DeliveryConfig};

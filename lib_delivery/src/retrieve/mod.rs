//! # Data Retrieval Module
//!
//! The one place that talks HTTP. Source adapters build on the `ApiClient`
//! here and only deal with their own payload shapes.
//!
//! ## Contained Modules:
//!
//! - **`ky_http`**: a generic `ApiClient` built on `reqwest` and
//!   `reqwest-middleware`, with optional transport-level retries. Transport
//!   retries are off by default because the fallback chain already applies its
//!   own retry policy per source.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Generic HTTP API client.
pub mod ky_http;

pub use ky_http::{ApiClient, ApiResponse};

//! # Delivery Module
//!
//! The resilient half of the pipeline: everything between "a widget wants
//! data" and "a collection is ready to render".
//!
//! ## Contained Modules:
//!
//! - **`retry`**: fixed-delay, bounded retry around one source call.
//! - **`chain`**: ordered fallback chains and the resolver.
//! - **`registry`**: first-claim-wins coordination of named regions.
//! - **`loader`**: the widget loader wiring claim, resolve, render and carousel.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Bounded fixed-delay retry.
pub mod retry;
/// Provider trait, fallback chain and resolver.
pub mod chain;
/// Process-wide region claims.
pub mod registry;
/// Widget loader.
pub mod loader;

pub use retry::{with_retry, RetryPolicy};
pub use chain::{ChainLink, FallbackChain, Provider, Resolved};
pub use registry::CoordinationRegistry;
pub use loader::{LoadOutcome, WidgetLoader};

//! # Carousel Module
//!
//! Navigation over a rendered region.
//!
//! ## Contained Modules:
//!
//! - **`navigator`**: the synchronous index state machine and the class
//!   markers it maintains on every slide.
//! - **`shared`**: an async-shared carousel with a settle period and an
//!   optional auto-advance task.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Index state machine.
pub mod navigator;
/// Async-shared carousel and auto-advance.
pub mod shared;

pub use navigator::{CarouselNavigator, Transition, ACTIVE, NEXT_PREVIEW, PREV_PREVIEW};
pub use shared::SharedCarousel;

//! # lib_delivery
//!
//! Resilient content delivery for the site's page widgets. Every widget follows
//! the same path: claim its region, resolve an ordered chain of sources, render
//! the winning collection into the region and, for sliders, hand the rendered
//! nodes to a carousel.
//!
//! The core modules (`model`, `error`, `delivery`, `render`, `carousel`,
//! `widgets`) are always built. Networking, concrete sources, configuration
//! files and logger setup are folder-gated behind cargo features, the same way
//! the rest of the workspace keeps builds lean.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Error taxonomy shared by every layer.
pub mod error;
/// Normalized records flowing through the chains.
pub mod model;
/// Retry policy, fallback chains, region claims and the widget loader.
pub mod delivery;
/// Region tree, formatting rules and the collection renderer.
pub mod render;
/// Carousel navigation state machine and auto-advance.
pub mod carousel;
/// Widget presets: region keys, layouts and default chains.
pub mod widgets;

/// JSON5 configuration with environment overrides.
#[cfg(feature = "configs")]
pub mod configs;
/// fern console/file logger setup.
#[cfg(feature = "loggers")]
pub mod loggers;
/// Generic HTTP client with transport retries.
#[cfg(feature = "retrieve")]
pub mod retrieve;
/// Concrete providers (CMS, static file, constants, geolocation).
#[cfg(feature = "sources")]
pub mod sources;

pub use error::{DeliveryError, DeliveryResult};
pub use model::{ChainItem, GeoLocation, Item};
pub use delivery::{
    with_retry, ChainLink, CoordinationRegistry, FallbackChain, LoadOutcome, Provider, Resolved,
    RetryPolicy, WidgetLoader,
};
pub use render::{CollectionRenderer, Node, Region, RegionHandle, RenderState, SlideLayout};
pub use carousel::{CarouselNavigator, SharedCarousel, Transition};
pub use widgets::Widget;

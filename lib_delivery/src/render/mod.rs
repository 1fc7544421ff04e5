//! # Render Module
//!
//! Turns a resolved collection into region content.
//!
//! ## Contained Modules:
//!
//! - **`region`**: the in-memory element tree a widget owns (`Region`, `Node`)
//!   and the `RenderState` bound to it.
//! - **`format`**: price, status and long-text rules shared by every layout.
//! - **`layout`**: the slide markups used by the site widgets.
//! - **`renderer`**: the idempotent clear-then-rebuild reconciliation.
//! - **`filter`**: property type tabs of the projects grid.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Element tree and render state.
pub mod region;
/// Display formatting rules.
pub mod format;
/// Slide markups.
pub mod layout;
/// Collection renderer.
pub mod renderer;
/// Property type tabs and filtering of the projects grid.
pub mod filter;

pub use region::{Node, Region, RegionHandle, RenderState};
pub use format::{format_price, format_status, truncate};
pub use layout::SlideLayout;
pub use filter::{apply_type_filter, filter_tabs, property_types};
pub use renderer::{CollectionRenderer, RenderOptions};

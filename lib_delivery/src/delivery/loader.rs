//! # Widget Loader
//!
//! Wires the pieces together for one page widget:
//!
//! 1. claim the widget's region in the [`CoordinationRegistry`] (losers stop
//!    here, before any fetch),
//! 2. resolve the widget's [`FallbackChain`],
//! 3. render the winning collection, or the placeholder when every source is
//!    exhausted,
//! 4. attach a [`SharedCarousel`] when the widget is a slider.
//!
//! The claim is taken before the first `.await`, so two loaders started on the
//! same runtime can never both reach the resolver.

use std::time::Duration;

use super::chain::FallbackChain;
use super::registry::CoordinationRegistry;
use crate::carousel::SharedCarousel;
use crate::model::Item;
use crate::render::{CollectionRenderer, RegionHandle};

/// What a call to [`WidgetLoader::load`] did.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Another loader owns the region; nothing was fetched or rendered.
    Skipped,
    /// Items were rendered.
    Rendered {
        /// Provider that answered.
        source_name: String,
        /// Number of rendered items.
        count: usize,
        /// Carousel bound to the rendered slides, for slider widgets.
        carousel: Option<SharedCarousel>,
    },
    /// Every source failed; the "no results" placeholder is showing.
    Placeholder,
}

impl LoadOutcome {
    /// True when this loader wrote to the region.
    pub fn did_render(&self) -> bool {
        !matches!(self, LoadOutcome::Skipped)
    }
}

/// # Widget Loader
///
/// One widget: the region it owns, the chain it reads and the way it renders.
#[derive(Debug, Clone)]
pub struct WidgetLoader {
    region_key: String,
    chain: FallbackChain<Item>,
    renderer: CollectionRenderer,
    carousel_settle: Option<Duration>,
}

impl WidgetLoader {
    /// Loader for `region_key` without a carousel.
    pub fn new(region_key: impl Into<String>, chain: FallbackChain<Item>, renderer: CollectionRenderer) -> Self {
        Self {
            region_key: region_key.into(),
            chain,
            renderer,
            carousel_settle: None,
        }
    }

    /// Attaches a carousel after rendering, with the given settle period.
    pub fn with_carousel(mut self, settle: Duration) -> Self {
        self.carousel_settle = Some(settle);
        self
    }

    /// Registry key of the region.
    pub fn region_key(&self) -> &str {
        &self.region_key
    }

    /// Chain resolved by this loader.
    pub fn chain(&self) -> &FallbackChain<Item> {
        &self.chain
    }

    /// Claims, resolves and renders.
    pub async fn load(&self, registry: &CoordinationRegistry, region: &RegionHandle) -> LoadOutcome {
        if registry.is_claimed(&self.region_key) || !registry.try_claim(&self.region_key) {
            log::info!("'{}' already handled by another loader, skipping", self.region_key);
            return LoadOutcome::Skipped;
        }

        let resolved = match self.chain.resolve().await {
            Ok(resolved) => resolved,
            Err(e) => {
                log::warn!("'{}' has no data, showing placeholder: {}", self.region_key, e);
                self.renderer.render_into(region, &[]);
                return LoadOutcome::Placeholder;
            }
        };

        let count = self.renderer.render_into(region, &resolved.items);
        log::info!(
            "'{}' rendered {} item(s) from '{}'",
            self.region_key,
            count,
            resolved.source_name
        );

        let carousel = match self.carousel_settle {
            Some(settle) => match SharedCarousel::attach(RegionHandle::clone(region), settle) {
                Ok(carousel) => Some(carousel),
                Err(e) => {
                    log::warn!("'{}' carousel not attached: {}", self.region_key, e);
                    None
                }
            },
            None => None,
        };

        LoadOutcome::Rendered {
            source_name: resolved.source_name,
            count,
            carousel,
        }
    }
}

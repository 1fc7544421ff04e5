//! # Widget Presets
//!
//! The site's data-driven widgets. Each preset fixes the region key the
//! loaders coordinate on, the slide layout, whether slides must carry an image
//! and the name of the chain. Providers are appended by the caller, so the
//! same preset serves the live CMS chain, a file-only chain and tests.
//!
//! Sliders get a carousel attached after rendering; the projects grid is
//! filtered by property type instead (see [`crate::render::filter`]).

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::delivery::{FallbackChain, WidgetLoader};
use crate::model::Item;
use crate::render::{CollectionRenderer, RenderOptions, SlideLayout};

/// A page widget backed by a fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Widget {
    /// Homepage slider of curated exclusive listings.
    ExclusiveListings,
    /// Carousel of sold landmark properties.
    NotableTransactions,
    /// Client testimonials slider.
    Testimonials,
    /// Grid of notable projects in the projects modal, filterable by type.
    Projects,
}

impl Widget {
    /// Every preset, in page order.
    pub const ALL: [Widget; 4] = [
        Widget::ExclusiveListings,
        Widget::NotableTransactions,
        Widget::Testimonials,
        Widget::Projects,
    ];

    /// Key claimed in the coordination registry.
    pub fn region_key(&self) -> &'static str {
        match self {
            Widget::ExclusiveListings => "exclusive-listings",
            Widget::NotableTransactions => "notable-transactions",
            Widget::Testimonials => "testimonials",
            Widget::Projects => "projects",
        }
    }

    /// Slide markup.
    pub fn layout(&self) -> SlideLayout {
        match self {
            Widget::ExclusiveListings => SlideLayout::ExclusiveListing,
            Widget::NotableTransactions => SlideLayout::NotableTransaction,
            Widget::Testimonials => SlideLayout::Testimonial,
            Widget::Projects => SlideLayout::ProjectCard,
        }
    }

    /// Listings without an image are useless in a photo slider. Grid cards
    /// fall back to the placeholder image instead.
    pub fn requires_image(&self) -> bool {
        matches!(self, Widget::ExclusiveListings | Widget::NotableTransactions)
    }

    /// Key of the matching array inside `properties.json`, if it has one.
    pub fn static_key(&self) -> Option<&'static str> {
        match self {
            Widget::ExclusiveListings => Some("exclusiveListings"),
            Widget::NotableTransactions | Widget::Projects => Some("notableTransactions"),
            Widget::Testimonials => None,
        }
    }

    /// Empty chain carrying this widget's name and item requirement.
    pub fn chain(&self) -> FallbackChain<Item> {
        let chain = FallbackChain::new(self.region_key());
        if self.requires_image() {
            chain.require(Item::has_image)
        } else {
            chain
        }
    }

    /// True for the widgets rendered as a slider.
    pub fn is_slider(&self) -> bool {
        !matches!(self, Widget::Projects)
    }

    /// Loader for this widget; sliders get a carousel settling for `settle`.
    pub fn loader(&self, chain: FallbackChain<Item>, options: RenderOptions, settle: Duration) -> WidgetLoader {
        let loader = WidgetLoader::new(self.region_key(), chain, CollectionRenderer::with_options(self.layout(), options));
        if self.is_slider() {
            loader.with_carousel(settle)
        } else {
            loader
        }
    }
}

impl fmt::Display for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.region_key())
    }
}

impl FromStr for Widget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Widget::ALL
            .into_iter()
            .find(|w| w.region_key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let known: Vec<&str> = Widget::ALL.iter().map(Widget::region_key).collect();
                format!("unknown widget '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::chain::tests::{listing, Scripted};

    #[test]
    fn keys_round_trip_through_from_str() {
        for widget in Widget::ALL {
            assert_eq!(widget.region_key().parse::<Widget>().unwrap(), widget);
        }
        assert!("hero".parse::<Widget>().unwrap_err().contains("notable-transactions"));
    }

    #[tokio::test]
    async fn photo_widgets_drop_imageless_items() {
        let chain = Widget::NotableTransactions
            .chain()
            .then(Scripted::ok("cms", vec![Item::new("1", "No image")]))
            .then(Scripted::ok("constant", vec![listing("2")]));

        let resolved = chain.resolve().await.unwrap();
        assert_eq!(resolved.source_name, "constant");
    }

    #[tokio::test]
    async fn testimonials_accept_items_without_images() {
        let chain = Widget::Testimonials
            .chain()
            .then(Scripted::ok("constant", vec![Item::new("t1", "James Bloomingdale")]));
        assert_eq!(chain.resolve().await.unwrap().items.len(), 1);
    }

    #[tokio::test]
    async fn projects_grid_renders_without_carousel() {
        let widget = Widget::Projects;
        let chain = widget
            .chain()
            .then(Scripted::ok("cms", vec![Item::new("p1", "Palm Villa").with_property_type("Villa")]));
        let registry = crate::delivery::CoordinationRegistry::new();
        let region = crate::render::Region::shared(widget.region_key());

        let outcome = widget
            .loader(chain, RenderOptions::default(), Duration::ZERO)
            .load(&registry, &region)
            .await;

        match outcome {
            crate::delivery::LoadOutcome::Rendered { count, carousel, .. } => {
                assert_eq!(count, 1);
                assert!(carousel.is_none());
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        let region = region.lock().unwrap();
        assert_eq!(region.children()[0].get_attr("data-type"), Some("villa"));
    }
}

//! # Collection Renderer
//!
//! Reconciliation is clear-then-rebuild: every render discards the region's
//! children and builds one element per item in source order, so rendering the
//! same collection twice leaves exactly one copy of each element. An empty
//! collection renders the "no results" placeholder instead.

use std::sync::PoisonError;

use super::layout::SlideLayout;
use super::region::{Node, Region, RegionHandle};
use crate::model::Item;

/// Class of the element rendered for an empty collection.
pub const PLACEHOLDER_CLASS: &str = "no-results";

/// Render settings shared by every element of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Currency suffix used when an item carries none.
    pub currency: String,
    /// Character budget for long descriptions.
    pub truncate_chars: usize,
    /// Character budget for testimonial quotes.
    pub quote_chars: usize,
    /// Text shown when nothing could be rendered.
    pub placeholder_text: String,
    /// Image used when an item has no image of its own.
    pub fallback_image: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            currency: "AED".to_string(),
            truncate_chars: 100,
            quote_chars: 400,
            placeholder_text: "No properties available at the moment.".to_string(),
            fallback_image: "assets/images/placeholder.webp".to_string(),
        }
    }
}

/// Renders collections into regions with a fixed layout.
#[derive(Debug, Clone)]
pub struct CollectionRenderer {
    layout: SlideLayout,
    options: RenderOptions,
}

impl CollectionRenderer {
    /// Renderer with default options.
    pub fn new(layout: SlideLayout) -> Self {
        Self::with_options(layout, RenderOptions::default())
    }

    /// Renderer with explicit options.
    pub fn with_options(layout: SlideLayout, options: RenderOptions) -> Self {
        Self { layout, options }
    }

    /// Layout used for every element.
    pub fn layout(&self) -> SlideLayout {
        self.layout
    }

    /// Options shared by every element.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Replaces the region's content with one element per item.
    ///
    /// Each element carries its position as `data-index`. Returns the number
    /// of items rendered; zero means the placeholder is showing.
    pub fn render(&self, region: &mut Region, items: &[Item]) -> usize {
        if items.is_empty() {
            self.render_placeholder(region);
            return 0;
        }

        let children: Vec<Node> = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                self.layout
                    .build(item, &self.options)
                    .attr("data-index", index.to_string())
            })
            .collect();
        region.replace_children(children, items.to_vec());
        log::debug!("Rendered {} item(s) into '{}'", items.len(), region.id());
        items.len()
    }

    /// Clears the region and shows the "no results" element.
    pub fn render_placeholder(&self, region: &mut Region) {
        let placeholder = Node::new("div")
            .class(PLACEHOLDER_CLASS)
            .child(Node::new("p").text(self.options.placeholder_text.clone()));
        region.replace_children(vec![placeholder], Vec::new());
        log::debug!("Rendered placeholder into '{}'", region.id());
    }

    /// Locks the shared region and renders into it.
    pub fn render_into(&self, region: &RegionHandle, items: &[Item]) -> usize {
        let mut guard = region.lock().unwrap_or_else(PoisonError::into_inner);
        self.render(&mut guard, items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Item> {
        vec![
            Item::new("a", "Palm Jumeirah Villa").with_price("150000000", "AED"),
            Item::new("b", "Downtown Dubai Penthouse").with_price("85000000", "AED"),
            Item::new("c", "Dubai Marina Tower").with_price("65000000", "AED"),
        ]
    }

    #[test]
    fn renders_one_element_per_item_in_order() {
        let renderer = CollectionRenderer::new(SlideLayout::NotableTransaction);
        let mut region = Region::new("notable-transactions");

        assert_eq!(renderer.render(&mut region, &sample()), 3);
        let indices: Vec<_> = region.children().iter().map(|c| c.get_attr("data-index")).collect();
        assert_eq!(indices, [Some("0"), Some("1"), Some("2")]);
        assert_eq!(region.render_state().items()[1].id, "b");
        assert!(!region.is_placeholder());
    }

    #[test]
    fn rendering_twice_leaves_one_copy() {
        let renderer = CollectionRenderer::new(SlideLayout::ExclusiveListing);
        let mut region = Region::new("exclusive-listings");

        renderer.render(&mut region, &sample());
        let first = region.to_html();
        renderer.render(&mut region, &sample());

        assert_eq!(region.children().len(), 3);
        assert_eq!(region.to_html(), first);
        assert_eq!(region.generation(), 2);
    }

    #[test]
    fn shorter_collection_replaces_longer_one() {
        let renderer = CollectionRenderer::new(SlideLayout::Testimonial);
        let mut region = Region::new("testimonials");

        renderer.render(&mut region, &sample());
        renderer.render(&mut region, &sample()[..1]);
        assert_eq!(region.children().len(), 1);
        assert_eq!(region.render_state().len(), 1);
    }

    #[test]
    fn empty_collection_shows_placeholder() {
        let renderer = CollectionRenderer::new(SlideLayout::NotableTransaction);
        let region = Region::shared("notable-transactions");

        renderer.render_into(&region, &sample());
        assert_eq!(renderer.render_into(&region, &[]), 0);

        let region = region.lock().unwrap();
        assert!(region.is_placeholder());
        assert_eq!(region.children().len(), 1);
        assert!(region.children()[0].has_class(PLACEHOLDER_CLASS));
        assert_eq!(region.child_texts(), ["No properties available at the moment."]);
    }
}

//! # Slide Layouts
//!
//! The markups the site widgets render, one per widget family. Building a
//! node depends on the item and the fixed render options only, so the same
//! item always produces the same markup.

use super::format::{format_price, format_status, truncate};
use super::region::Node;
use super::renderer::RenderOptions;
use crate::model::Item;

const DEFAULT_LOCATION: &str = "Dubai, UAE";
/// Property type of items that carry none.
pub const UNKNOWN_TYPE: &str = "unknown";

/// Element layouts available to a [`super::CollectionRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideLayout {
    /// Full-bleed background slide of the exclusive listings slider.
    ExclusiveListing,
    /// Image card of the notable transactions carousel.
    NotableTransaction,
    /// Quote slide of the testimonials section.
    Testimonial,
    /// Grid card of the projects modal, with a clamped description.
    ProjectCard,
}

impl SlideLayout {
    /// Class carried by every slide of this layout.
    pub fn slide_class(&self) -> &'static str {
        match self {
            SlideLayout::ExclusiveListing => "ex-listing-slide",
            SlideLayout::NotableTransaction => "carousel-item",
            SlideLayout::Testimonial => "ft-slide",
            SlideLayout::ProjectCard => "project-card",
        }
    }

    /// Builds the element for one item.
    pub fn build(&self, item: &Item, options: &RenderOptions) -> Node {
        match self {
            SlideLayout::ExclusiveListing => exclusive_listing(item, options),
            SlideLayout::NotableTransaction => notable_transaction(item, options),
            SlideLayout::Testimonial => testimonial(item, options),
            SlideLayout::ProjectCard => project_card(item, options),
        }
    }
}

fn currency<'a>(item: &'a Item, options: &'a RenderOptions) -> &'a str {
    item.currency.as_deref().unwrap_or(&options.currency)
}

fn image<'a>(item: &'a Item, options: &'a RenderOptions) -> &'a str {
    item.image_url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or(&options.fallback_image)
}

fn listing_details(title: &str, location: &str, price: &str) -> [Node; 3] {
    [
        Node::new("h3").class("ex-address").text(title),
        Node::new("div").class("ex-location").text(location),
        Node::new("div").class("ex-price").text(price),
    ]
}

fn exclusive_listing(item: &Item, options: &RenderOptions) -> Node {
    let price = format_price(item.price.as_deref(), currency(item, options));
    let location = item.location.as_deref().unwrap_or(DEFAULT_LOCATION);

    let mut center = Node::new("div")
        .class("ex-listing-center-content")
        .child(Node::new("div").class("ex-line"))
        .child(Node::new("div").class("ex-tag").text(format_status(item.status.as_deref())));
    let mut bottom = Node::new("div").class("ex-bottom-content");
    for node in listing_details(&item.title, location, &price) {
        center = center.child(node.clone());
        bottom = bottom.child(node);
    }

    Node::new("div")
        .class("ex-listing-slide")
        .attr("style", format!("background-image: url('{}')", image(item, options)))
        .attr("data-id", item.id.clone())
        .child(Node::new("div").class("ex-listing-overlay").child(center).child(bottom))
}

fn notable_transaction(item: &Item, options: &RenderOptions) -> Node {
    let price = format_price(item.price.as_deref(), currency(item, options));

    Node::new("div")
        .class("carousel-item")
        .attr("data-id", item.id.clone())
        .child(
            Node::new("div")
                .class("carousel-card")
                .child(
                    Node::new("img")
                        .class("card-img")
                        .attr("src", image(item, options))
                        .attr("alt", item.title.clone())
                        .attr("data-price", price)
                        .attr("data-name", item.title.clone()),
                )
                .child(Node::new("div").class("status-label").text(format_status(item.status.as_deref()))),
        )
}

fn testimonial(item: &Item, options: &RenderOptions) -> Node {
    let quote = truncate(item.description.as_deref().unwrap_or_default(), options.quote_chars);

    Node::new("div")
        .class("ft-slide")
        .attr("data-id", item.id.clone())
        .child(Node::new("p").class("ft-text").text(format!("\u{201c}{}\u{201d}", quote)))
        .child(Node::new("span").class("ft-author").text(format!("\u{2014} {}", item.title)))
}

/// Lower-cased property type of `item`, the value the grid filter matches on.
pub fn type_key(item: &Item) -> String {
    item.property_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map_or_else(|| UNKNOWN_TYPE.to_string(), str::to_lowercase)
}

/// `villa` -> `Villa`.
pub fn type_label(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn project_card(item: &Item, options: &RenderOptions) -> Node {
    let kind = type_key(item);
    let status = format_status(item.status.as_deref());
    let mut status_node = Node::new("div").class("project-status").text(status.clone());
    if status == "SOLD" {
        status_node.add_class("sold");
    }

    Node::new("div")
        .class("project-card")
        .attr("data-type", kind.clone())
        .attr("data-id", item.id.clone())
        .child(
            Node::new("div").class("project-image-wrapper").child(
                Node::new("img")
                    .class("project-image")
                    .attr("src", image(item, options))
                    .attr("alt", item.title.clone()),
            ),
        )
        .child(
            Node::new("div")
                .class("project-info")
                .child(status_node)
                .child(Node::new("h3").class("project-name").text(item.title.clone()))
                .child(
                    Node::new("p")
                        .class("project-location")
                        .text(item.location.as_deref().unwrap_or(DEFAULT_LOCATION)),
                )
                .child(
                    Node::new("div")
                        .class("project-details")
                        .child(
                            Node::new("span")
                                .class("project-price")
                                .text(format_price(item.price.as_deref(), currency(item, options))),
                        )
                        .child(Node::new("span").class("project-type").text(type_label(&kind))),
                )
                .child(
                    Node::new("p")
                        .class("project-description")
                        .text(truncate(item.description.as_deref().unwrap_or_default(), options.truncate_chars)),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn villa() -> Item {
        Item::new("palm-villa", "Palm Jumeirah Villa")
            .with_price("150,000,000", "AED")
            .with_image("villa.webp")
            .with_status("sold")
    }

    #[test]
    fn notable_card_carries_price_and_name() {
        let node = SlideLayout::NotableTransaction.build(&villa(), &RenderOptions::default());
        let img = node.find_by_class("card-img").unwrap();
        assert_eq!(img.get_attr("data-price"), Some("150,000,000 AED"));
        assert_eq!(img.get_attr("data-name"), Some("Palm Jumeirah Villa"));
        assert_eq!(node.find_by_class("status-label").unwrap().text_content(), "SOLD");
    }

    #[test]
    fn exclusive_slide_falls_back_on_location_and_image() {
        let item = Item::new("x", "Emirates Hills Villa").with_price("125,000,000", "AED");
        let options = RenderOptions::default();
        let node = SlideLayout::ExclusiveListing.build(&item, &options);

        assert!(node.get_attr("style").unwrap().contains(&options.fallback_image));
        assert!(node.text_content().contains("Dubai, UAE"));
        assert!(node.text_content().contains("FOR SALE"));
    }

    #[test]
    fn building_is_deterministic() {
        let options = RenderOptions::default();
        for layout in [
            SlideLayout::ExclusiveListing,
            SlideLayout::NotableTransaction,
            SlideLayout::Testimonial,
            SlideLayout::ProjectCard,
        ] {
            assert_eq!(layout.build(&villa(), &options), layout.build(&villa(), &options));
            assert!(layout.build(&villa(), &options).has_class(layout.slide_class()));
        }
    }

    #[test]
    fn project_description_is_clamped() {
        let options = RenderOptions {
            truncate_chars: 20,
            ..RenderOptions::default()
        };
        let item = villa().with_description("A landmark residence on the crescent with private beach access.");
        let node = SlideLayout::ProjectCard.build(&item, &options);
        let description = node.find_by_class("project-description").unwrap().text_content();

        assert_eq!(description.chars().count(), 20);
        assert!(description.ends_with('…'));
        assert!(node.find_by_class("project-status").unwrap().has_class("sold"));
    }

    #[test]
    fn project_card_carries_type() {
        let options = RenderOptions::default();
        let node = SlideLayout::ProjectCard.build(&villa().with_property_type("Villa"), &options);
        assert_eq!(node.get_attr("data-type"), Some("villa"));
        assert_eq!(node.find_by_class("project-type").unwrap().text_content(), "Villa");

        let untyped = SlideLayout::ProjectCard.build(&villa(), &options);
        assert_eq!(untyped.get_attr("data-type"), Some(UNKNOWN_TYPE));
        assert_eq!(untyped.find_by_class("project-type").unwrap().text_content(), "Unknown");
    }
}

//! # Constant Provider
//!
//! Last link of every widget chain: a small hardcoded table that needs no
//! network and no files, so a page is never left with an empty slider while a
//! CMS outage lasts.

use async_trait::async_trait;

use crate::delivery::Provider;
use crate::error::DeliveryResult;
use crate::model::Item;
use crate::widgets::Widget;

/// Provider name used for tagging.
pub const CONSTANT_PROVIDER: &str = "constant";

/// Serves a fixed list of items.
#[derive(Debug, Clone)]
pub struct ConstantProvider {
    name: String,
    items: Vec<Item>,
}

impl ConstantProvider {
    /// Provider over arbitrary items.
    pub fn new(name: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }

    /// The built-in fallback table of a widget.
    pub fn for_widget(widget: Widget) -> Self {
        let items = match widget {
            Widget::ExclusiveListings => exclusive_listings(),
            Widget::NotableTransactions | Widget::Projects => notable_transactions(),
            Widget::Testimonials => testimonials(),
        };
        Self::new(CONSTANT_PROVIDER, items)
    }
}

#[async_trait]
impl Provider<Item> for ConstantProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> DeliveryResult<Vec<Item>> {
        Ok(self.items.clone())
    }
}

fn exclusive_listings() -> Vec<Item> {
    vec![
        Item::new("fallback-burj-khalifa-penthouse", "Burj Khalifa Penthouse")
            .with_price("85,000,000", "AED")
            .with_status("FOR SALE")
            .with_location("Burj Khalifa, Downtown Dubai, UAE")
            .with_image("assets/images/your-image-1.jpg"),
        Item::new("fallback-emirates-hills-villa", "Emirates Hills Villa")
            .with_price("125,000,000", "AED")
            .with_status("FOR SALE")
            .with_location("Emirates Hills, Dubai, UAE")
            .with_image("assets/images/your-image-2.jpg"),
    ]
}

fn notable_transactions() -> Vec<Item> {
    vec![
        Item::new("fallback-palm-jumeirah", "Palm Jumeirah Villa")
            .with_price("150,000,000", "AED")
            .with_status("Sold")
            .with_property_type("villa")
            .with_image("assets/images/four-seasons-private-residences-al-maryah-island.webp"),
        Item::new("fallback-downtown-penthouse", "Downtown Dubai Penthouse")
            .with_price("85,000,000", "AED")
            .with_status("Sold")
            .with_property_type("penthouse")
            .with_image("assets/images/the-row-saadiyat-aldar.webp"),
        Item::new("fallback-dubai-marina", "Dubai Marina Tower")
            .with_price("65,000,000", "AED")
            .with_status("Sold")
            .with_property_type("apartment")
            .with_image("assets/images/hudayriyat-island-modon.jpg"),
    ]
}

fn testimonials() -> Vec<Item> {
    [
        (
            "James Bloomingdale",
            "We interviewed a number of his competitors (most at least 25 years his senior) and were impressed by his immediate understanding of the property, his poise and his honesty. Ahmad is brilliant, professional and wise beyond his years. Wouldn't hire anyone else in the future.",
        ),
        (
            "Sarah & Michael Chen",
            "Mohamad Ahmad represented us in the sale of our Dubai Marina penthouse and exceeded all expectations. His market knowledge, negotiation skills, and attention to detail resulted in a sale price well above our initial asking price. Professional, responsive, and truly dedicated to his clients.",
        ),
        (
            "Jennifer Rodriguez",
            "Working with Ahmad was an absolute pleasure. His expertise in luxury real estate is unmatched, and his ability to understand exactly what we were looking for made our home buying experience seamless. We found our dream home within weeks of starting our search.",
        ),
        (
            "David Thompson",
            "Ahmad's reputation precedes him, and rightfully so. His deep understanding of the Dubai real estate market and his extensive network of connections made all the difference in our transaction. Highly professional and results-driven.",
        ),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (name, text))| Item::new(format!("fallback-testimonial-{}", i + 1), name).with_description(text))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChainItem;

    #[tokio::test]
    async fn every_widget_has_valid_fallbacks() {
        for widget in Widget::ALL {
            let items = ConstantProvider::for_widget(widget).fetch().await.unwrap();
            assert!(!items.is_empty(), "{widget}");
            assert!(items.iter().all(ChainItem::is_valid));
            if widget.requires_image() {
                assert!(items.iter().all(Item::has_image), "{widget}");
            }
        }
    }

    #[tokio::test]
    async fn notable_fallback_matches_known_sales() {
        let items = ConstantProvider::for_widget(Widget::NotableTransactions).fetch().await.unwrap();
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["Palm Jumeirah Villa", "Downtown Dubai Penthouse", "Dubai Marina Tower"]);
        assert_eq!(items[0].price.as_deref(), Some("150,000,000"));
    }
}

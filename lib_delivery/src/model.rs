//! # Normalized Records
//!
//! Provider adapters map whatever their upstream speaks (CMS documents, the
//! bundled `properties.json`, hardcoded tables) into these shapes before the
//! records enter a chain. Nothing downstream of a provider ever looks at an
//! upstream schema.

use serde::{Deserialize, Serialize};

/// Contract every record type must meet to travel through a [`crate::FallbackChain`].
pub trait ChainItem: Clone + Send + Sync + 'static {
    /// Structural check applied before the resolver's emptiness test.
    fn is_valid(&self) -> bool;

    /// Records which provider produced the item. The resolver calls this on
    /// every surviving item of the winning provider.
    fn tag_source(&mut self, _source: &str) {}
}

/// # Item
///
/// A single renderable record: a listing, a sold transaction, a testimonial.
/// Display fields are kept raw; the renderer applies the formatting rules.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Stable identity (legacy id when the CMS has one).
    pub id: String,
    /// Display name.
    pub title: String,
    /// Raw price text as the source delivered it (e.g. `"150,000,000"`).
    #[serde(default)]
    pub price: Option<String>,
    /// Currency suffix to use when the price does not already carry one.
    #[serde(default)]
    pub currency: Option<String>,
    /// Hero/main image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Machine status value (`for-sale`, `sold`, ...).
    #[serde(default)]
    pub status: Option<String>,
    /// Address, community or area line.
    #[serde(default)]
    pub location: Option<String>,
    /// Long text (description, testimonial body).
    #[serde(default)]
    pub description: Option<String>,
    /// Property type (`villa`, `apartment`, ...), used by the grid filter.
    #[serde(default)]
    pub property_type: Option<String>,
    /// Name of the provider that produced the item.
    #[serde(default)]
    pub source: String,
}

impl Item {
    /// Creates an item with identity and title only.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the raw price and its currency.
    pub fn with_price(mut self, price: impl Into<String>, currency: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self.currency = Some(currency.into());
        self
    }

    /// Sets the image URL.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Sets the machine status value.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the location line.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the long text.
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Sets the property type.
    pub fn with_property_type(mut self, property_type: impl Into<String>) -> Self {
        self.property_type = Some(property_type.into());
        self
    }

    /// True when a non-blank image URL is present.
    pub fn has_image(&self) -> bool {
        self.image_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }
}

impl ChainItem for Item {
    fn is_valid(&self) -> bool {
        !self.id.trim().is_empty() && !self.title.trim().is_empty()
    }

    fn tag_source(&mut self, source: &str) {
        self.source = source.to_string();
    }
}

/// Visitor location as reported by an IP geolocation service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    /// Public IP address of the visitor.
    pub ip: String,
    /// Country name (or the ISO code when the service only returns that).
    pub country: String,
    /// ISO 3166-1 alpha-2 code, possibly empty.
    pub country_code: String,
    /// Service that answered.
    #[serde(default)]
    pub source: String,
}

impl ChainItem for GeoLocation {
    fn is_valid(&self) -> bool {
        !self.ip.trim().is_empty()
    }

    fn tag_source(&mut self, source: &str) {
        self.source = source.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_requires_id_and_title() {
        assert!(Item::new("a", "Villa").is_valid());
        assert!(!Item::new("", "Villa").is_valid());
        assert!(!Item::new("a", "  ").is_valid());
    }

    #[test]
    fn blank_image_is_not_an_image() {
        assert!(!Item::new("a", "b").with_image("  ").has_image());
        assert!(Item::new("a", "b").with_image("x.webp").has_image());
    }

    #[test]
    fn item_deserializes_with_missing_optionals() {
        let item: Item = serde_json::from_str(r#"{"id":"1","title":"Tower"}"#).unwrap();
        assert_eq!(item.price, None);
        assert_eq!(item.source, "");
    }
}

//! # Sanity CMS Source
//!
//! GROQ queries against the Sanity HTTP query API:
//!
//! `https://{project}.api[cdn].sanity.io/v{apiVersion}/data/query/{dataset}?query=…`
//!
//! The answer is always `{ "result": … }`. Query parameters (`$communityId`,
//! `$communityName`) are sent JSON-encoded next to the query, so user input is
//! never spliced into GROQ text.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::static_json::price_text;
use crate::delivery::Provider;
use crate::error::{DeliveryError, DeliveryResult};
use crate::model::Item;
use crate::retrieve::ApiClient;

/// Connection settings of a Sanity project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanityConfig {
    /// Project id.
    pub project_id: String,
    /// Dataset name.
    pub dataset: String,
    /// Dated API version, without the leading `v`.
    pub api_version: String,
    /// Read through the CDN edge.
    pub use_cdn: bool,
}

impl Default for SanityConfig {
    fn default() -> Self {
        Self {
            project_id: "xwla8vtz".to_string(),
            dataset: "production".to_string(),
            api_version: "2024-02-06".to_string(),
            use_cdn: true,
        }
    }
}

impl SanityConfig {
    /// Base URL of the versioned API.
    pub fn api_base(&self) -> String {
        let host = if self.use_cdn { "apicdn" } else { "api" };
        format!("https://{}.{}.sanity.io/v{}/", self.project_id, host, self.api_version)
    }
}

const PROPERTY_PROJECTION: &str = r#"{
  _id,
  title,
  legacyId,
  listingType,
  status,
  price,
  priceNumeric,
  location,
  propertyType,
  "communityTitle": coalesce(community->title, community->name),
  "imageUrl": coalesce(heroImage.asset->url, mainImage.asset->url, images[0].asset->url),
  "description": pt::text(description)
}"#;

/// Queries the site widgets run against the CMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanityQuery {
    /// Exclusive listings in the order curated on the homepage document.
    CuratedExclusiveListings,
    /// Every exclusive listing still for sale, most expensive first.
    ExclusiveListingsByType,
    /// Sold landmark properties, most expensive first.
    NotableTransactions,
    /// Unsold inventory of one community, by id or (approximate) name.
    PropertiesByCommunity {
        /// Community document id.
        id: Option<String>,
        /// Community name, matched when no id is known.
        name: Option<String>,
    },
    /// Featured testimonials of the homepage.
    Testimonials,
}

impl SanityQuery {
    /// Short label used in provider names.
    pub fn label(&self) -> &'static str {
        match self {
            SanityQuery::CuratedExclusiveListings => "curated-exclusive",
            SanityQuery::ExclusiveListingsByType => "exclusive-by-type",
            SanityQuery::NotableTransactions => "notable",
            SanityQuery::PropertiesByCommunity { .. } => "community",
            SanityQuery::Testimonials => "testimonials",
        }
    }

    /// GROQ text of the query.
    pub fn groq(&self) -> String {
        match self {
            SanityQuery::CuratedExclusiveListings => format!(
                r#"*[_type=="homePage"][0].exclusiveListings{{ title, subtitle, "properties": properties[]->{} }}"#,
                PROPERTY_PROJECTION
            ),
            SanityQuery::ExclusiveListingsByType => format!(
                r#"*[_type == "property" && listingType == "exclusive" && status != "sold"] | order(priceNumeric desc) {}"#,
                PROPERTY_PROJECTION
            ),
            SanityQuery::NotableTransactions => format!(
                r#"*[_type == "property" && listingType == "notable"] | order(priceNumeric desc) {}"#,
                PROPERTY_PROJECTION
            ),
            SanityQuery::PropertiesByCommunity { id, .. } => {
                let filter = if id.is_some() {
                    "community._ref == $communityId"
                } else {
                    "community->title match $communityName || community->name match $communityName || location match $communityName"
                };
                format!(
                    r#"*[_type == "property" && ({}) && status != "sold"] {}"#,
                    filter, PROPERTY_PROJECTION
                )
            }
            SanityQuery::Testimonials => r#"*[_type=="homePage"][0].testimonialsSection.featuredTestimonials[]->{ _id, clientName, testimonialText, rating }"#.to_string(),
        }
    }

    /// `$name` parameters, JSON-encoded as the query API expects.
    pub fn params(&self) -> Vec<(String, String)> {
        match self {
            SanityQuery::PropertiesByCommunity { id: Some(id), .. } => {
                vec![("$communityId".to_string(), Value::from(id.as_str()).to_string())]
            }
            SanityQuery::PropertiesByCommunity { id: None, name: Some(name) } => {
                vec![("$communityName".to_string(), Value::from(name.as_str()).to_string())]
            }
            _ => Vec::new(),
        }
    }

    /// Maps the `result` member to items.
    pub fn parse(&self, result: Value) -> DeliveryResult<Vec<Item>> {
        let items = match self {
            SanityQuery::Testimonials => {
                let docs: Option<Vec<TestimonialDoc>> = serde_json::from_value(result)?;
                docs.unwrap_or_default().into_iter().map(Item::from).collect()
            }
            SanityQuery::CuratedExclusiveListings => {
                let section: Option<CuratedSection> = serde_json::from_value(result)?;
                section
                    .and_then(|s| s.properties)
                    .unwrap_or_default()
                    .into_iter()
                    .flatten()
                    .map(Item::from)
                    .collect()
            }
            _ => {
                let docs: Option<Vec<PropertyDoc>> = serde_json::from_value(result)?;
                docs.unwrap_or_default().into_iter().map(Item::from).collect()
            }
        };
        Ok(items)
    }

    fn is_community(&self) -> bool {
        matches!(self, SanityQuery::PropertiesByCommunity { .. })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PropertyDoc {
    #[serde(rename = "_id")]
    id: String,
    legacy_id: Option<String>,
    title: Option<String>,
    status: Option<String>,
    price: Option<Value>,
    price_numeric: Option<Value>,
    location: Option<String>,
    property_type: Option<String>,
    community_title: Option<String>,
    image_url: Option<String>,
    description: Option<String>,
}

impl From<PropertyDoc> for Item {
    fn from(doc: PropertyDoc) -> Self {
        Item {
            id: doc.legacy_id.filter(|id| !id.is_empty()).unwrap_or(doc.id),
            title: doc.title.unwrap_or_default(),
            price: doc
                .price
                .as_ref()
                .and_then(price_text)
                .or_else(|| doc.price_numeric.as_ref().and_then(price_text)),
            currency: None,
            image_url: doc.image_url,
            status: doc.status,
            location: doc.location.or(doc.community_title),
            description: doc.description,
            property_type: doc.property_type,
            source: String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CuratedSection {
    // Dangling references come back as null entries.
    properties: Option<Vec<Option<PropertyDoc>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TestimonialDoc {
    #[serde(rename = "_id")]
    id: String,
    client_name: Option<String>,
    testimonial_text: Option<String>,
}

impl From<TestimonialDoc> for Item {
    fn from(doc: TestimonialDoc) -> Self {
        Item::new(doc.id, doc.client_name.unwrap_or_default())
            .with_description(doc.testimonial_text.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct QueryEnvelope<T> {
    result: Option<T>,
}

/// HTTP client bound to one project and dataset.
#[derive(Debug, Clone)]
pub struct SanityClient {
    config: SanityConfig,
    http: ApiClient,
}

impl SanityClient {
    /// Builds the client.
    ///
    /// # Errors
    /// Fails when the derived API URL is not valid.
    pub fn new(config: SanityConfig, transport_retries: u32, timeout: Duration) -> anyhow::Result<Self> {
        let http = ApiClient::with_options(&config.api_base(), None, transport_retries, timeout)?;
        Ok(Self { config, http })
    }

    /// Project settings.
    pub fn config(&self) -> &SanityConfig {
        &self.config
    }

    /// Runs a raw GROQ query and returns its `result` member.
    pub async fn query<T: DeserializeOwned>(&self, groq: &str, params: &[(String, String)]) -> DeliveryResult<Option<T>> {
        let path = format!("data/query/{}", self.config.dataset);
        let mut pairs: Vec<(&str, &str)> = vec![("query", groq)];
        pairs.extend(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let envelope: QueryEnvelope<T> = self.http.get_json(&path, &pairs).await?;
        Ok(envelope.result)
    }
}

/// One [`SanityQuery`] exposed as a provider.
pub struct SanityProvider {
    name: String,
    client: Arc<SanityClient>,
    query: SanityQuery,
}

impl SanityProvider {
    /// Provider named `sanity:{label}`.
    pub fn new(client: Arc<SanityClient>, query: SanityQuery) -> Self {
        Self {
            name: format!("sanity:{}", query.label()),
            client,
            query,
        }
    }
}

#[async_trait]
impl Provider<Item> for SanityProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> DeliveryResult<Vec<Item>> {
        if self.query.is_community() && self.query.params().is_empty() {
            return Err(DeliveryError::provider(&self.name, "no community id or name given"));
        }
        let result: Option<Value> = self.client.query(&self.query.groq(), &self.query.params()).await?;
        match result {
            Some(value) => self.query.parse(value),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_base_honours_cdn_flag() {
        let mut config = SanityConfig::default();
        assert_eq!(config.api_base(), "https://xwla8vtz.apicdn.sanity.io/v2024-02-06/");
        config.use_cdn = false;
        assert_eq!(config.api_base(), "https://xwla8vtz.api.sanity.io/v2024-02-06/");
    }

    #[test]
    fn property_documents_prefer_legacy_ids() {
        let result = json!([
            {
                "_id": "abc", "legacyId": "palm-villa", "title": "Palm Villa",
                "price": "150,000,000", "status": "sold", "imageUrl": "https://cdn/x.webp",
                "communityTitle": "Palm Jumeirah", "propertyType": "Villa"
            },
            { "_id": "def", "title": "Marina Loft", "priceNumeric": 4500000, "location": "Dubai Marina" }
        ]);
        let items = SanityQuery::NotableTransactions.parse(result).unwrap();

        assert_eq!(items[0].id, "palm-villa");
        assert_eq!(items[0].location.as_deref(), Some("Palm Jumeirah"));
        assert_eq!(items[0].property_type.as_deref(), Some("Villa"));
        assert_eq!(items[1].id, "def");
        assert_eq!(items[1].price.as_deref(), Some("4500000"));
        assert!(!items[1].has_image());
    }

    #[test]
    fn curated_section_skips_dangling_references() {
        let result = json!({
            "title": "Exclusive Listings",
            "properties": [ null, { "_id": "p1", "title": "Bvlgari Residence", "imageUrl": "b.webp" } ]
        });
        let items = SanityQuery::CuratedExclusiveListings.parse(result).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Bvlgari Residence");
    }

    #[test]
    fn testimonials_map_to_items() {
        let result = json!([{ "_id": "t1", "clientName": "David Thompson", "testimonialText": "Results-driven.", "rating": 5 }]);
        let items = SanityQuery::Testimonials.parse(result).unwrap();
        assert_eq!(items[0].title, "David Thompson");
        assert_eq!(items[0].description.as_deref(), Some("Results-driven."));
    }

    #[test]
    fn null_result_is_empty() {
        assert!(SanityQuery::NotableTransactions.parse(Value::Null).unwrap().is_empty());
        assert!(SanityQuery::CuratedExclusiveListings.parse(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn community_query_uses_parameters() {
        let by_name = SanityQuery::PropertiesByCommunity {
            id: None,
            name: Some("Jumeirah \"Bay\"".to_string()),
        };
        assert!(by_name.groq().contains("match $communityName"));
        assert_eq!(by_name.params(), [("$communityName".to_string(), r#""Jumeirah \"Bay\"""#.to_string())]);

        let by_id = SanityQuery::PropertiesByCommunity {
            id: Some("community-1".to_string()),
            name: Some("ignored".to_string()),
        };
        assert!(by_id.groq().contains("community._ref == $communityId"));
        assert_eq!(by_id.params().len(), 1);
    }

    #[tokio::test]
    async fn community_query_without_filter_fails_fast() {
        let client = Arc::new(SanityClient::new(SanityConfig::default(), 0, Duration::from_secs(1)).unwrap());
        let provider = SanityProvider::new(client, SanityQuery::PropertiesByCommunity { id: None, name: None });
        assert!(matches!(provider.fetch().await, Err(DeliveryError::ProviderFailure { .. })));
    }
}

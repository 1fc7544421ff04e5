//! # Static JSON Provider
//!
//! Reads the bundled `properties.json`, either from disk or over HTTP. The file
//! holds one array per widget (`exclusiveListings`, `notableTransactions`) of
//! legacy records:
//!
//! ```json
//! { "id": "...", "name": "...", "fullAddress": "...", "price": "150,000,000",
//!   "currency": "AED", "status": "Sold", "images": { "hero": "...", "main": "..." } }
//! ```
//!
//! Community inventories sit one level deeper, under `communities.{key}`; a
//! key with dots is walked as a path.
//!
//! A missing or non-array key is a provider failure, the same as a failed read.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::delivery::Provider;
use crate::error::{DeliveryError, DeliveryResult};
use crate::model::Item;
use crate::retrieve::ApiClient;

/// Provider name used for tagging.
pub const STATIC_JSON_PROVIDER: &str = "static-json";

/// Where `properties.json` lives.
#[derive(Debug, Clone)]
pub enum StaticSource {
    /// Local file.
    File(PathBuf),
    /// Absolute `http(s)` URL.
    Url(String),
}

impl StaticSource {
    /// Treats `http://` and `https://` locations as URLs, anything else as a path.
    pub fn parse(location: &str) -> Self {
        match url::Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => StaticSource::Url(url.to_string()),
            _ => StaticSource::File(PathBuf::from(location)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct Images {
    hero: Option<String>,
    main: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StaticRecord {
    id: Option<String>,
    name: String,
    full_address: Option<String>,
    price: Option<Value>,
    currency: Option<String>,
    status: Option<String>,
    description: Option<String>,
    property_type: Option<String>,
    #[serde(default)]
    images: Images,
}

impl From<StaticRecord> for Item {
    fn from(record: StaticRecord) -> Self {
        let id = record
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| slug(&record.name));
        Item {
            id,
            title: record.name,
            price: record.price.as_ref().and_then(price_text),
            currency: record.currency,
            image_url: record.images.hero.or(record.images.main),
            status: record.status,
            location: record.full_address,
            description: record.description,
            property_type: record.property_type,
            source: String::new(),
        }
    }
}

/// Price fields arrive as strings or numbers depending on who edited the file.
pub(crate) fn price_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    out.trim_end_matches('-').to_string()
}

/// Extracts and normalizes the array under `key` (`a.b` walks nested objects).
pub fn parse_properties(document: &Value, key: &str) -> DeliveryResult<Vec<Item>> {
    let array = key
        .split('.')
        .try_fold(document, |node, segment| node.get(segment))
        .filter(|v| v.is_array())
        .ok_or_else(|| DeliveryError::provider(STATIC_JSON_PROVIDER, format!("invalid JSON structure: '{}' not found", key)))?;
    let records: Vec<StaticRecord> = serde_json::from_value(array.clone())?;
    Ok(records.into_iter().map(Item::from).collect())
}

/// Reads one widget's array out of `properties.json`.
pub struct StaticJsonProvider {
    source: StaticSource,
    key: String,
    client: Option<ApiClient>,
}

impl StaticJsonProvider {
    /// Provider over `source`, reading the array under `key`.
    ///
    /// # Errors
    /// Fails only for a URL source whose HTTP client cannot be built.
    pub fn new(source: StaticSource, key: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = match &source {
            StaticSource::Url(url) => Some(ApiClient::with_options(url, None, 0, timeout)?),
            StaticSource::File(_) => None,
        };
        Ok(Self {
            source,
            key: key.into(),
            client,
        })
    }

    async fn document(&self) -> DeliveryResult<Value> {
        match (&self.source, &self.client) {
            (StaticSource::Url(_), Some(client)) => Ok(client.get_json::<Value>("", &[]).await?),
            (StaticSource::File(path), _) => {
                let raw = tokio::fs::read_to_string(path).await?;
                Ok(serde_json::from_str(&raw)?)
            }
            (StaticSource::Url(url), None) => Err(DeliveryError::provider(
                STATIC_JSON_PROVIDER,
                format!("no HTTP client for '{}'", url),
            )),
        }
    }
}

#[async_trait]
impl Provider<Item> for StaticJsonProvider {
    fn name(&self) -> &str {
        STATIC_JSON_PROVIDER
    }

    async fn fetch(&self) -> DeliveryResult<Vec<Item>> {
        let document = self.document().await?;
        let items = parse_properties(&document, &self.key)?;
        log::debug!("static JSON '{}' holds {} record(s)", self.key, items.len());
        Ok(items)
    }
}

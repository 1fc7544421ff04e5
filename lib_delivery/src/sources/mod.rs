//! # Sources Module
//!
//! Concrete providers and the default chains the site uses.
//!
//! ## Contained Modules:
//!
//! - **`sanity`**: GROQ queries against the Sanity CMS.
//! - **`static_json`**: the bundled `properties.json`, from disk or HTTP.
//! - **`constant`**: hardcoded last-resort tables.
//! - **`geolocation`**: IP lookup services for the contact forms.
//!
//! A widget's default chain is CMS first (one link per relevant query), the
//! static file next, the constant table last. A community chain has no
//! constant table: when both the CMS and `communities.{key}` fail, the
//! properties modal shows its placeholder.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Sanity CMS client and provider.
pub mod sanity;
/// `properties.json` provider.
pub mod static_json;
/// Hardcoded fallback tables.
pub mod constant;
/// IP geolocation providers.
pub mod geolocation;

use std::sync::Arc;
use std::time::Duration;

pub use constant::ConstantProvider;
pub use geolocation::{geo_chain, GeoProvider, GeoService};
pub use sanity::{SanityClient, SanityConfig, SanityProvider, SanityQuery};
pub use static_json::{StaticJsonProvider, StaticSource};

use crate::delivery::{FallbackChain, RetryPolicy, WidgetLoader};
use crate::model::Item;
use crate::render::{CollectionRenderer, RenderOptions, SlideLayout};
use crate::widgets::Widget;

/// CMS queries consulted for a widget, in order.
pub fn sanity_queries(widget: Widget) -> Vec<SanityQuery> {
    match widget {
        Widget::ExclusiveListings => vec![SanityQuery::CuratedExclusiveListings, SanityQuery::ExclusiveListingsByType],
        Widget::NotableTransactions | Widget::Projects => vec![SanityQuery::NotableTransactions],
        Widget::Testimonials => vec![SanityQuery::Testimonials],
    }
}

/// Where a widget chain reads from.
#[derive(Debug, Clone, Default)]
pub struct ChainSources {
    /// CMS client; `None` skips the CMS links.
    pub sanity: Option<Arc<SanityClient>>,
    /// Location of `properties.json`; `None` skips the static link.
    pub static_data: Option<StaticSource>,
    /// Retry policy of the network-backed links.
    pub retry: RetryPolicy,
    /// Timeout of a static-file HTTP fetch.
    pub timeout: Duration,
}

/// Builds the default chain of `widget`.
///
/// # Errors
/// Fails when the HTTP client for a URL static source cannot be built.
pub fn widget_chain(widget: Widget, sources: &ChainSources) -> anyhow::Result<FallbackChain<Item>> {
    let mut chain = widget.chain();

    if let Some(client) = &sources.sanity {
        for query in sanity_queries(widget) {
            chain = chain.then_with_retry(Arc::new(SanityProvider::new(Arc::clone(client), query)), sources.retry);
        }
    }

    if let Some(key) = widget.static_key() {
        chain = then_static(chain, sources, key)?;
    }

    Ok(chain.then(Arc::new(ConstantProvider::for_widget(widget))))
}

fn then_static(
    chain: FallbackChain<Item>,
    sources: &ChainSources,
    key: &str,
) -> anyhow::Result<FallbackChain<Item>> {
    let Some(location) = &sources.static_data else {
        return Ok(chain);
    };
    let provider = Arc::new(StaticJsonProvider::new(location.clone(), key, sources.timeout)?);
    Ok(match location {
        StaticSource::Url(_) => chain.then_with_retry(provider, sources.retry),
        StaticSource::File(_) => chain.then(provider),
    })
}

/// A community whose unsold inventory fills the properties modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Community {
    /// Key under `communities` in `properties.json` (`valley`, `grandpolo`).
    pub key: String,
    /// CMS document id, when known.
    pub id: Option<String>,
    /// Display name, matched against the CMS when no id is known.
    pub name: Option<String>,
}

impl Community {
    /// Community known by key and display name.
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            id: None,
            name: Some(name.into()),
        }
    }

    /// Sets the CMS document id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Key claimed in the coordination registry.
    pub fn region_key(&self) -> String {
        format!("community-{}", self.key)
    }

    /// Path of the community's array inside `properties.json`.
    pub fn static_key(&self) -> String {
        format!("communities.{}", self.key)
    }

    /// CMS query for this community.
    pub fn query(&self) -> SanityQuery {
        SanityQuery::PropertiesByCommunity {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// CMS then static chain of one community.
///
/// # Errors
/// Fails when the HTTP client for a URL static source cannot be built.
pub fn community_chain(community: &Community, sources: &ChainSources) -> anyhow::Result<FallbackChain<Item>> {
    let mut chain = FallbackChain::new(community.region_key());
    if let Some(client) = &sources.sanity {
        chain = chain.then_with_retry(Arc::new(SanityProvider::new(Arc::clone(client), community.query())), sources.retry);
    }
    then_static(chain, sources, &community.static_key())
}

/// Grid loader of one community, using the project card markup.
pub fn community_loader(community: &Community, chain: FallbackChain<Item>, options: RenderOptions) -> WidgetLoader {
    WidgetLoader::new(
        community.region_key(),
        chain,
        CollectionRenderer::with_options(SlideLayout::ProjectCard, options),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn offline_chain_is_constant_only() {
        let chain = widget_chain(Widget::NotableTransactions, &ChainSources::default()).unwrap();
        assert_eq!(chain.provider_names(), ["constant"]);
    }

    #[test]
    fn full_exclusive_chain_order() {
        let sources = ChainSources {
            sanity: Some(Arc::new(SanityClient::new(SanityConfig::default(), 0, Duration::from_secs(5)).unwrap())),
            static_data: Some(StaticSource::File(PathBuf::from("assets/data/properties.json"))),
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(5),
        };
        let chain = widget_chain(Widget::ExclusiveListings, &sources).unwrap();
        assert_eq!(
            chain.provider_names(),
            ["sanity:curated-exclusive", "sanity:exclusive-by-type", "static-json", "constant"]
        );

        let testimonials = widget_chain(Widget::Testimonials, &sources).unwrap();
        assert_eq!(testimonials.provider_names(), ["sanity:testimonials", "constant"]);

        let projects = widget_chain(Widget::Projects, &sources).unwrap();
        assert_eq!(projects.name(), "projects");
        assert_eq!(projects.provider_names(), ["sanity:notable", "static-json", "constant"]);
    }

    #[test]
    fn community_chain_has_no_constant_link() {
        let valley = Community::new("valley", "The Valley");
        assert_eq!(valley.region_key(), "community-valley");
        assert_eq!(valley.static_key(), "communities.valley");

        let offline = community_chain(&valley, &ChainSources::default()).unwrap();
        assert!(offline.is_empty());

        let sources = ChainSources {
            sanity: Some(Arc::new(SanityClient::new(SanityConfig::default(), 0, Duration::from_secs(5)).unwrap())),
            static_data: Some(StaticSource::File(PathBuf::from("assets/data/properties.json"))),
            ..ChainSources::default()
        };
        let chain = community_chain(&valley.with_id("community-1"), &sources).unwrap();
        assert_eq!(chain.provider_names(), ["sanity:community", "static-json"]);
    }
}

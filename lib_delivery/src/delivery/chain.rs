//! # Fallback Chain Resolver
//!
//! A chain is an ordered list of providers with different trust levels: a live
//! CMS query first, a bundled static file next, a hardcoded table last. The
//! resolver walks the list strictly in order and stops at the first provider
//! whose answer still holds valid items after filtering. Order is a
//! correctness property: once an earlier provider produced valid data a later,
//! staler one is never consulted.
//!
//! Invalid items are dropped *before* the emptiness test, so a partially bad
//! answer from an early provider cannot block a fully good later one.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use super::retry::{with_retry, RetryPolicy};
use crate::error::{DeliveryError, DeliveryResult};
use crate::model::ChainItem;

/// One candidate data source.
///
/// Implementations may perform network I/O but must not touch render state.
#[async_trait]
pub trait Provider<T>: Send + Sync {
    /// Stable name, used for source tagging and logs.
    fn name(&self) -> &str;

    /// Fetches the provider's collection. An empty vector is a valid answer
    /// that the resolver treats as a failed attempt.
    async fn fetch(&self) -> DeliveryResult<Vec<T>>;
}

/// Extra per-chain requirement applied on top of [`ChainItem::is_valid`].
pub type Requirement<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// A provider together with the retry policy it runs under.
pub struct ChainLink<T> {
    provider: Arc<dyn Provider<T>>,
    retry: Option<RetryPolicy>,
}

impl<T> ChainLink<T> {
    /// Name of the wrapped provider.
    pub fn name(&self) -> &str {
        self.provider.name()
    }

    /// Retry policy of this link, if any.
    pub fn retry(&self) -> Option<&RetryPolicy> {
        self.retry.as_ref()
    }
}

impl<T> Clone for ChainLink<T> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            retry: self.retry,
        }
    }
}

/// The winning collection and the provider it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    /// Valid items, in provider order, tagged with `source_name`.
    pub items: Vec<T>,
    /// Name of the provider that answered.
    pub source_name: String,
}

/// # Fallback Chain
///
/// Ordered providers plus a chain identity for logs.
pub struct FallbackChain<T> {
    name: String,
    links: Vec<ChainLink<T>>,
    requirement: Option<Requirement<T>>,
}

impl<T> Clone for FallbackChain<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            links: self.links.clone(),
            requirement: self.requirement.clone(),
        }
    }
}

impl<T> FallbackChain<T> {
    /// Chain identity.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Provider names in resolution order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.links.iter().map(ChainLink::name).collect()
    }

    /// Number of providers.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// True when the chain has no providers.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl<T> fmt::Debug for FallbackChain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackChain")
            .field("name", &self.name)
            .field("providers", &self.provider_names())
            .field("has_requirement", &self.requirement.is_some())
            .finish()
    }
}

impl<T: ChainItem> FallbackChain<T> {
    /// Creates an empty chain.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            links: Vec::new(),
            requirement: None,
        }
    }

    /// Appends a provider that is called once.
    pub fn then(self, provider: Arc<dyn Provider<T>>) -> Self {
        self.push(provider, None)
    }

    /// Appends a provider wrapped by `policy`.
    pub fn then_with_retry(self, provider: Arc<dyn Provider<T>>, policy: RetryPolicy) -> Self {
        self.push(provider, Some(policy))
    }

    /// Adds a requirement every surviving item must meet (e.g. "has an image").
    pub fn require<F>(mut self, requirement: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.requirement = Some(Arc::new(requirement));
        self
    }

    fn push(mut self, provider: Arc<dyn Provider<T>>, retry: Option<RetryPolicy>) -> Self {
        self.links.push(ChainLink { provider, retry });
        self
    }

    fn accepts(&self, item: &T) -> bool {
        item.is_valid() && self.requirement.as_ref().map_or(true, |req| req(item))
    }

    /// Filters one answer and tags the survivors; an answer left empty is a
    /// failed attempt, so it goes through the link's retry budget like any error.
    fn admit(&self, provider: &str, fetched: Vec<T>) -> DeliveryResult<Vec<T>> {
        let received = fetched.len();
        let mut items: Vec<T> = fetched.into_iter().filter(|item| self.accepts(item)).collect();

        if items.is_empty() {
            return Err(DeliveryError::EmptyResult {
                provider: provider.to_string(),
                received,
            });
        }
        if items.len() < received {
            log::debug!(
                "[{}] '{}' dropped {} invalid item(s)",
                self.name,
                provider,
                received - items.len()
            );
        }

        for item in &mut items {
            item.tag_source(provider);
        }
        Ok(items)
    }

    async fn attempt(&self, link: &ChainLink<T>) -> DeliveryResult<Vec<T>> {
        let provider = &link.provider;
        match &link.retry {
            Some(policy) => {
                with_retry(policy, provider.name(), || {
                    let provider = Arc::clone(provider);
                    async move {
                        let fetched = provider.fetch().await?;
                        self.admit(provider.name(), fetched)
                    }
                })
                .await
            }
            None => {
                let fetched = provider.fetch().await?;
                self.admit(provider.name(), fetched)
            }
        }
    }

    /// Tries every provider in order and returns the first valid collection.
    ///
    /// # Errors
    /// Returns [`DeliveryError::AllSourcesExhausted`] when no provider yields a
    /// valid item. Individual provider failures are absorbed and summarized.
    pub async fn resolve(&self) -> DeliveryResult<Resolved<T>> {
        let mut failures = Vec::with_capacity(self.links.len());

        for (position, link) in self.links.iter().enumerate() {
            match self.attempt(link).await {
                Ok(items) => {
                    log::info!(
                        "[{}] resolved {} item(s) from '{}' (provider {}/{})",
                        self.name,
                        items.len(),
                        link.name(),
                        position + 1,
                        self.links.len()
                    );
                    return Ok(Resolved {
                        items,
                        source_name: link.name().to_string(),
                    });
                }
                Err(err) => {
                    log::warn!("[{}] provider '{}' failed: {}", self.name, link.name(), err);
                    failures.push(format!("{}: {}", link.name(), err));
                }
            }
        }

        log::error!("[{}] all {} source(s) exhausted", self.name, self.links.len());
        Err(DeliveryError::AllSourcesExhausted {
            chain: self.name.clone(),
            failures,
        })
    }
}

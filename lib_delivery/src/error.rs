//! # Delivery Errors
//!
//! One error type travels through the whole delivery path. Only
//! `AllSourcesExhausted` is meant to reach a widget; everything below it is
//! absorbed by the resolver and shows up in logs and in the exhaustion summary.

use std::time::Duration;
use thiserror::Error;

/// Result alias used across the crate.
pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// Errors raised while fetching, resolving and presenting widget content.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// A single provider call failed outright.
    #[error("provider '{provider}' failed: {reason}")]
    ProviderFailure {
        /// Name of the failing provider.
        provider: String,
        /// Human readable cause.
        reason: String,
    },

    /// A provider answered, but nothing usable survived validation.
    #[error("provider '{provider}' returned no usable items ({received} received)")]
    EmptyResult {
        /// Name of the provider.
        provider: String,
        /// Number of raw items before validation.
        received: usize,
    },

    /// One provider's retry budget is used up.
    #[error("'{source_name}' exhausted after {attempts} attempt(s): {last}")]
    SourceExhausted {
        /// Label of the retried operation (usually the provider name).
        source_name: String,
        /// Attempts actually made.
        attempts: u32,
        /// Error of the final attempt.
        #[source]
        last: Box<DeliveryError>,
    },

    /// Every provider of a chain failed. Widgets render their placeholder.
    #[error("all {} source(s) exhausted for chain '{chain}'", failures.len())]
    AllSourcesExhausted {
        /// Chain identity.
        chain: String,
        /// One line per provider, in chain order.
        failures: Vec<String>,
    },

    /// A single attempt overran its time budget.
    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),

    /// Network or client level failure.
    #[error(transparent)]
    Transport(#[from] anyhow::Error),

    /// The payload did not have the expected shape.
    #[error("invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// Local file access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Navigation was requested on a carousel with no slides.
    #[error("carousel has no slides")]
    EmptyCarousel,
}

impl DeliveryError {
    /// Shorthand for a [`DeliveryError::ProviderFailure`].
    pub fn provider(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ProviderFailure {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    /// True when the error is the terminal "nothing to show" condition.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::AllSourcesExhausted { .. })
    }
}

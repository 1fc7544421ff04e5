//! # Coordination Registry
//!
//! Several independently written loaders may target the same region (a CMS
//! aware loader and a legacy static loader both aiming at the exclusive
//! listings slider). The registry makes that "first claim wins": a claim is a
//! named flag that is created lazily, set exactly once and never reset for the
//! lifetime of the registry. Losers skip every side effect, not just rendering.
//!
//! The registry is a plain value. Build one per page (or per test) and share it
//! through an `Arc`; there is no global instance.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Process-wide set of claimed region keys.
#[derive(Debug, Default, Clone)]
pub struct CoordinationRegistry {
    claimed: Arc<Mutex<HashSet<String>>>,
}

impl CoordinationRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        // A set of strings cannot be left half-updated, so a poisoned lock is still usable.
        self.claimed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Atomically checks and sets the flag for `region`.
    ///
    /// Returns `true` when the caller now exclusively owns the region, `false`
    /// when another loader claimed it first.
    pub fn try_claim(&self, region: &str) -> bool {
        let won = self.lock().insert(region.to_string());
        if won {
            log::debug!("Region '{}' claimed", region);
        } else {
            log::debug!("Region '{}' already claimed, skipping", region);
        }
        won
    }

    /// Read-only check used by secondary loaders before doing any work.
    pub fn is_claimed(&self, region: &str) -> bool {
        self.lock().contains(region)
    }

    /// Sorted snapshot of every claimed region.
    pub fn claimed_regions(&self) -> Vec<String> {
        let mut regions: Vec<String> = self.lock().iter().cloned().collect();
        regions.sort();
        regions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_claim_wins() {
        let registry = CoordinationRegistry::new();
        assert!(registry.try_claim("notable-transactions"));
        assert!(!registry.try_claim("notable-transactions"));
        assert!(registry.is_claimed("notable-transactions"));
    }

    #[test]
    fn regions_are_independent() {
        let registry = CoordinationRegistry::new();
        assert!(registry.try_claim("exclusive-listings"));
        assert!(!registry.is_claimed("notable-transactions"));
        assert!(registry.try_claim("notable-transactions"));
        assert_eq!(registry.claimed_regions(), ["exclusive-listings", "notable-transactions"]);
    }

    #[test]
    fn clones_share_state() {
        let registry = CoordinationRegistry::new();
        let peer = registry.clone();
        assert!(peer.try_claim("testimonials"));
        assert!(!registry.try_claim("testimonials"));
    }

    #[test]
    fn exactly_one_thread_wins() {
        let registry = CoordinationRegistry::new();
        let winners: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| registry.try_claim("exclusive-listings")))
                .collect();
            handles.into_iter().map(|h| usize::from(h.join().unwrap())).sum()
        });
        assert_eq!(winners, 1);
    }
}

//! # Shared Carousel
//!
//! A region and its navigator behind one async mutex, so button handlers and
//! the auto-advance task can drive the same carousel. A transition moves the
//! index at once and then settles for a fixed period; requests arriving while
//! it settles are ignored.
//!
//! The settle is tracked as a deadline stored with the navigator, not by the
//! caller's future: a request dropped mid-settle (timeout, `select!` branch,
//! aborted task) still lets the next request through once the deadline passes.

use std::sync::{Arc, PoisonError};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::navigator::{CarouselNavigator, Transition};
use crate::error::DeliveryResult;
use crate::model::Item;
use crate::render::RegionHandle;

/// Default settle period of a transition.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(100);
/// Default auto-advance period.
pub const DEFAULT_AUTO_ADVANCE: Duration = Duration::from_millis(8000);

#[derive(Debug)]
struct CarouselInner {
    region: RegionHandle,
    navigator: CarouselNavigator,
    settling_until: Option<Instant>,
}

/// Cloneable handle to one carousel.
#[derive(Debug, Clone)]
pub struct SharedCarousel {
    inner: Arc<Mutex<CarouselInner>>,
    settle: Duration,
}

impl SharedCarousel {
    /// Attaches a navigator to an already rendered region.
    pub fn attach(region: RegionHandle, settle: Duration) -> DeliveryResult<Self> {
        let navigator = {
            let mut guard = region.lock().unwrap_or_else(PoisonError::into_inner);
            CarouselNavigator::attach(&mut guard)?
        };
        Ok(Self {
            inner: Arc::new(Mutex::new(CarouselInner {
                region,
                navigator,
                settling_until: None,
            })),
            settle,
        })
    }

    /// Performs a transition and waits for it to settle.
    ///
    /// Returns the new index, or `None` if another transition was settling.
    pub async fn request(&self, transition: Transition) -> DeliveryResult<Option<usize>> {
        let (moved, deadline) = {
            let mut inner = self.inner.lock().await;
            let CarouselInner {
                region,
                navigator,
                settling_until,
            } = &mut *inner;

            let now = Instant::now();
            match *settling_until {
                Some(deadline) if now < deadline => {
                    log::debug!("Carousel settling, ignoring {:?}", transition);
                    return Ok(None);
                }
                // The previous request went away before lowering the guard.
                Some(_) => navigator.finish(),
                None => {}
            }

            let mut region = region.lock().unwrap_or_else(PoisonError::into_inner);
            let moved = navigator.begin(&mut region, transition)?;
            if moved.is_none() {
                return Ok(None);
            }
            let deadline = now + self.settle;
            *settling_until = Some(deadline);
            (moved, deadline)
        };

        tokio::time::sleep_until(deadline).await;

        let mut inner = self.inner.lock().await;
        if inner.settling_until == Some(deadline) {
            inner.settling_until = None;
            inner.navigator.finish();
        }
        Ok(moved)
    }

    /// Moves one slide forward.
    pub async fn next(&self) -> DeliveryResult<Option<usize>> {
        self.request(Transition::Next).await
    }

    /// Moves one slide back.
    pub async fn previous(&self) -> DeliveryResult<Option<usize>> {
        self.request(Transition::Previous).await
    }

    /// Jumps to `index`, wrapped into range.
    pub async fn goto_index(&self, index: i64) -> DeliveryResult<Option<usize>> {
        self.request(Transition::Goto(index)).await
    }

    /// Index of the active slide.
    pub async fn current(&self) -> usize {
        self.inner.lock().await.navigator.current()
    }

    /// Clone of the item behind the active slide.
    pub async fn current_item(&self) -> Option<Item> {
        let inner = self.inner.lock().await;
        let region = inner.region.lock().unwrap_or_else(PoisonError::into_inner);
        inner.navigator.current_item(&region).cloned()
    }

    /// Advances every `period` until `token` is cancelled.
    pub fn spawn_auto_advance(&self, period: Duration, token: CancellationToken) -> JoinHandle<()> {
        let carousel = self.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(period) => {
                        if let Err(e) = carousel.next().await {
                            log::warn!("Auto-advance stopped: {}", e);
                            break;
                        }
                    }
                }
            }
            log::debug!("Auto-advance task finished");
        })
    }
}

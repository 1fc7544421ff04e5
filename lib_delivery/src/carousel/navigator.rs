//! # Carousel Navigator
//!
//! Keeps `current` inside `[0, total)` and mirrors it onto the slides of a
//! region: the current slide carries `active`, its neighbours carry
//! `prev-preview` and `next-preview`. Markers are recomputed on every slide
//! each time, never patched incrementally.
//!
//! A transition is two-phase. [`CarouselNavigator::begin`] moves the index and
//! raises the transition guard; until [`CarouselNavigator::finish`] is called,
//! further requests are ignored. The synchronous helpers (`next`, `previous`,
//! `goto_index`) run both phases back to back.

use crate::error::{DeliveryError, DeliveryResult};
use crate::model::Item;
use crate::render::{Node, Region};

/// Marker of the current slide.
pub const ACTIVE: &str = "active";
/// Marker of the slide before the current one.
pub const PREV_PREVIEW: &str = "prev-preview";
/// Marker of the slide after the current one.
pub const NEXT_PREVIEW: &str = "next-preview";

/// A navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// One slide forward, wrapping to the first.
    Next,
    /// One slide back, wrapping to the last.
    Previous,
    /// Jump to an index; any integer is accepted and wrapped.
    Goto(i64),
}

/// Index state of one carousel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselNavigator {
    current: usize,
    total: usize,
    transitioning: bool,
}

impl CarouselNavigator {
    /// Navigator over `total` slides, positioned on the first one.
    pub fn new(total: usize) -> Self {
        Self {
            current: 0,
            total,
            transitioning: false,
        }
    }

    /// Binds to a rendered region and marks its first slide active.
    ///
    /// Fails with [`DeliveryError::EmptyCarousel`] when the region holds no
    /// items (never rendered, or showing the placeholder).
    pub fn attach(region: &mut Region) -> DeliveryResult<Self> {
        let total = region.render_state().len();
        if total == 0 {
            return Err(DeliveryError::EmptyCarousel);
        }
        let navigator = Self::new(total);
        navigator.apply_markers(region.children_mut());
        log::debug!("Carousel attached to '{}' with {} slide(s)", region.id(), total);
        Ok(navigator)
    }

    /// Index of the active slide.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Number of slides.
    pub fn total(&self) -> usize {
        self.total
    }

    /// True between `begin` and `finish`.
    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// Index a transition would land on, without moving.
    pub fn target(&self, transition: Transition) -> DeliveryResult<usize> {
        if self.total == 0 {
            return Err(DeliveryError::EmptyCarousel);
        }
        let total = self.total;
        let target = match transition {
            Transition::Next => (self.current + 1) % total,
            Transition::Previous => (self.current + total - 1) % total,
            Transition::Goto(index) => index.rem_euclid(total as i64) as usize,
        };
        Ok(target)
    }

    /// Starts a transition: moves the index, updates the markers and raises
    /// the guard.
    ///
    /// Returns `Ok(None)` when a transition is already in progress; the
    /// request is dropped, not queued.
    pub fn begin(&mut self, region: &mut Region, transition: Transition) -> DeliveryResult<Option<usize>> {
        self.sync_total(region);
        let target = self.target(transition)?;
        if self.transitioning {
            log::debug!("Carousel '{}' busy, ignoring {:?}", region.id(), transition);
            return Ok(None);
        }
        self.transitioning = true;
        self.current = target;
        self.apply_markers(region.children_mut());
        Ok(Some(target))
    }

    /// Picks up a re-render of the region. A changed slide count restarts
    /// from the first slide when the old index no longer exists.
    fn sync_total(&mut self, region: &Region) {
        let total = region.render_state().len();
        if total == self.total {
            return;
        }
        log::debug!("Carousel '{}' now has {} slide(s), was {}", region.id(), total, self.total);
        self.total = total;
        if self.current >= total {
            self.current = 0;
        }
    }

    /// Lowers the transition guard.
    pub fn finish(&mut self) {
        self.transitioning = false;
    }

    /// Runs a whole transition immediately.
    pub fn navigate(&mut self, region: &mut Region, transition: Transition) -> DeliveryResult<Option<usize>> {
        let moved = self.begin(region, transition)?;
        if moved.is_some() {
            self.finish();
        }
        Ok(moved)
    }

    /// `(current + 1) mod total`.
    pub fn next(&mut self, region: &mut Region) -> DeliveryResult<Option<usize>> {
        self.navigate(region, Transition::Next)
    }

    /// `(current - 1 + total) mod total`.
    pub fn previous(&mut self, region: &mut Region) -> DeliveryResult<Option<usize>> {
        self.navigate(region, Transition::Previous)
    }

    /// `index mod total`, Euclidean so negatives wrap from the end.
    pub fn goto_index(&mut self, region: &mut Region, index: i64) -> DeliveryResult<Option<usize>> {
        self.navigate(region, Transition::Goto(index))
    }

    /// Item behind the active slide, for detail panels.
    pub fn current_item<'a>(&self, region: &'a Region) -> Option<&'a Item> {
        region.render_state().items().get(self.current)
    }

    fn apply_markers(&self, slides: &mut [Node]) {
        let total = slides.len();
        if total == 0 {
            return;
        }
        let prev = (self.current + total - 1) % total;
        let next = (self.current + 1) % total;

        for (index, slide) in slides.iter_mut().enumerate() {
            slide.remove_class(ACTIVE);
            slide.remove_class(PREV_PREVIEW);
            slide.remove_class(NEXT_PREVIEW);

            if index == self.current {
                slide.add_class(ACTIVE);
            } else if index == prev {
                slide.add_class(PREV_PREVIEW);
            } else if index == next {
                slide.add_class(NEXT_PREVIEW);
            }
        }
    }
}

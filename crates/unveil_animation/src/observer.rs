//! Viewport observer hook
//!
//! Reports whether an element is in view. Wraps the surface's intersection
//! observation with a threshold, a root margin, and one-shot behavior:
//!
//! - On the first intersection at or above the threshold, `in_view` becomes true.
//! - With `trigger_once`, the observer then disconnects itself.
//! - Otherwise, leaving the viewport sets `in_view` back to false.
//!
//! An unset target is a no-op. A surface without intersection support fails
//! open (the element is treated as visible) so content is never stuck hidden.

use tracing::{debug, warn};
use unveil_core::{
    ElementId, IntersectionOptions, ObserverId, RootMargin, Surface, SurfaceError, SurfaceEvent,
};

use crate::config::MotionDefaults;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverOptions {
    pub root_margin: RootMargin,
    pub threshold: f32,
    pub trigger_once: bool,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self::from_defaults(&MotionDefaults::default())
    }
}

impl ObserverOptions {
    pub fn from_defaults(defaults: &MotionDefaults) -> Self {
        Self {
            root_margin: defaults.root_margin,
            threshold: clamp_threshold(defaults.threshold),
            trigger_once: defaults.trigger_once,
        }
    }

    /// Visible fraction that counts as in view, clamped to `[0, 1]`
    ///
    /// A non-finite threshold becomes 0, so any intersection counts.
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = clamp_threshold(threshold);
        self
    }

    pub fn root_margin(mut self, root_margin: RootMargin) -> Self {
        self.root_margin = root_margin;
        self
    }

    pub fn trigger_once(mut self, trigger_once: bool) -> Self {
        self.trigger_once = trigger_once;
        self
    }

    fn intersection_options(&self) -> IntersectionOptions {
        IntersectionOptions {
            root_margin: self.root_margin,
            threshold: self.threshold,
        }
    }
}

fn clamp_threshold(threshold: f32) -> f32 {
    if threshold.is_finite() {
        threshold.clamp(0.0, 1.0)
    } else {
        warn!("Observer: threshold {} is not finite, using 0", threshold);
        0.0
    }
}

/// Per-instance visibility state driven by intersection events
#[derive(Debug)]
pub struct ViewportObserver {
    options: ObserverOptions,
    handle: Option<ObserverId>,
    in_view: bool,
}

impl ViewportObserver {
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            handle: None,
            in_view: false,
        }
    }

    pub fn options(&self) -> &ObserverOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: ObserverOptions) {
        self.options = options;
    }

    pub fn in_view(&self) -> bool {
        self.in_view
    }

    pub fn is_attached(&self) -> bool {
        self.handle.is_some()
    }

    /// Start observing `target`
    ///
    /// No-op when already attached, when `target` is unset, or when a one-shot
    /// observer has already fired.
    pub fn attach(&mut self, surface: &mut dyn Surface, target: Option<ElementId>) {
        if self.handle.is_some() {
            return;
        }
        let Some(element) = target else {
            debug!("ViewportObserver: no target ref, skipping observation");
            return;
        };
        if self.options.trigger_once && self.in_view {
            return;
        }

        match surface.observe_intersection(element, &self.options.intersection_options()) {
            Ok(handle) => {
                debug!(
                    "ViewportObserver: observing (threshold={}, root_margin={})",
                    self.options.threshold, self.options.root_margin
                );
                self.handle = Some(handle);
            }
            Err(SurfaceError::Unsupported(capability)) => {
                warn!(
                    "ViewportObserver: {} unavailable, treating element as visible",
                    capability
                );
                self.in_view = true;
            }
            Err(err) => {
                warn!("ViewportObserver: failed to observe element: {}", err);
            }
        }
    }

    /// Stop observing. Safe to call repeatedly.
    pub fn detach(&mut self, surface: &mut dyn Surface) {
        if let Some(handle) = self.handle.take() {
            if let Err(err) = surface.unobserve(handle) {
                warn!("ViewportObserver: failed to unobserve: {}", err);
            }
        }
    }

    /// Apply an intersection event addressed to this observer
    ///
    /// Returns `true` when `in_view` changed.
    pub fn handle_event(&mut self, event: &SurfaceEvent, surface: &mut dyn Surface) -> bool {
        let SurfaceEvent::Intersection { observer, entry } = event else {
            return false;
        };
        if self.handle != Some(*observer) {
            return false;
        }

        let visible = entry.is_intersecting && entry.intersection_ratio >= self.options.threshold;

        if visible && !self.in_view {
            self.in_view = true;
            if self.options.trigger_once {
                debug!("ViewportObserver: triggered once, disconnecting");
                self.detach(surface);
            }
            true
        } else if !visible && self.in_view && !self.options.trigger_once {
            self.in_view = false;
            true
        } else {
            false
        }
    }
}

//! Surface capability
//!
//! The boundary between components and the host environment. A web backend
//! implements [`Surface`] with IntersectionObserver, the Web Animations API,
//! scroll listeners and `requestAnimationFrame`; [`RecordingSurface`] records
//! every call so components can be tested without a browser.
//!
//! Resources are returned as generational handles. Every handle a component
//! acquires must be released exactly once; releasing an unknown or already
//! released handle is an error.
//!
//! Surfaces queue their callbacks as [`SurfaceEvent`]s. The host drains them
//! with [`Surface::drain_events`] and routes each to the component that owns
//! the handle.
//!
//! [`RecordingSurface`]: crate::RecordingSurface

use serde::Serialize;
use slotmap::new_key_type;

use crate::easing::Easing;
use crate::error::Result;
use crate::length::RootMargin;
use crate::style::Style;

new_key_type! {
    /// Handle to an element known to the surface (a component's "ref")
    pub struct ElementId;
    /// Handle to a registered intersection observer
    pub struct ObserverId;
    /// Handle to a running animation
    pub struct AnimationId;
    /// Handle to a scroll listener
    pub struct ListenerId;
    /// Handle to a pending animation frame callback
    pub struct FrameId;
}

impl ElementId {
    /// Convert to a raw u64, used for `data-` ref attributes in markup
    pub fn to_raw(self) -> u64 {
        self.0.as_ffi()
    }
}

/// Axis-aligned rectangle in CSS pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Translate by `(-dx, -dy)`
    pub fn offset_by(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x - dx, self.y - dy, self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Options passed to the intersection observer
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct IntersectionOptions {
    pub root_margin: RootMargin,
    /// Visible fraction in `[0, 1]` that counts as "in view"
    pub threshold: f32,
}

/// One intersection observer callback entry
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub is_intersecting: bool,
    pub intersection_ratio: f32,
}

/// A single keyframe of a surface animation
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Keyframe {
    /// Position in `[0, 1]`
    pub offset: f32,
    pub style: Style,
}

impl Keyframe {
    pub fn new(offset: f32, style: Style) -> Self {
        Self { offset, style }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub enum Iterations {
    #[default]
    Once,
    Count(f32),
    Infinite,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum PlaybackDirection {
    #[default]
    Normal,
    Reverse,
    Alternate,
    AlternateReverse,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum FillMode {
    #[default]
    None,
    Forwards,
    Backwards,
    Both,
}

/// Timing parameters for [`Surface::animate`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct AnimationTiming {
    pub duration_ms: u32,
    pub delay_ms: u32,
    pub iterations: Iterations,
    pub direction: PlaybackDirection,
    pub easing: Easing,
    pub fill: FillMode,
}

/// A callback from the host, queued for routing to components
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SurfaceEvent {
    Intersection {
        observer: ObserverId,
        entry: IntersectionEntry,
    },
    Scroll {
        listener: ListenerId,
        scroll_x: f32,
        scroll_y: f32,
    },
    AnimationFrame {
        frame: FrameId,
        timestamp_ms: f64,
    },
}

/// Host capabilities used by motion components
pub trait Surface {
    /// Start observing `element`'s intersection with the viewport
    ///
    /// Returns [`SurfaceError::Unsupported`](crate::SurfaceError::Unsupported)
    /// when the host has no intersection API.
    fn observe_intersection(
        &mut self,
        element: ElementId,
        options: &IntersectionOptions,
    ) -> Result<ObserverId>;

    fn unobserve(&mut self, observer: ObserverId) -> Result<()>;

    /// Start a keyframe animation on `element`
    fn animate(
        &mut self,
        element: ElementId,
        keyframes: &[Keyframe],
        timing: &AnimationTiming,
    ) -> Result<AnimationId>;

    fn cancel_animation(&mut self, animation: AnimationId) -> Result<()>;

    /// Register a window scroll listener
    fn add_scroll_listener(&mut self, passive: bool) -> Result<ListenerId>;

    fn remove_scroll_listener(&mut self, listener: ListenerId) -> Result<()>;

    /// Request a one-shot animation frame callback
    fn request_animation_frame(&mut self) -> Result<FrameId>;

    fn cancel_animation_frame(&mut self, frame: FrameId) -> Result<()>;

    /// Write an inline style property on `element`
    fn set_style(&mut self, element: ElementId, property: &str, value: &str) -> Result<()>;

    fn set_transform(&mut self, element: ElementId, transform: &str) -> Result<()> {
        self.set_style(element, "transform", transform)
    }

    /// The element's bounding rect relative to the viewport
    fn element_rect(&self, element: ElementId) -> Option<Rect>;

    fn viewport(&self) -> Size;

    /// Whether the user asked the host to minimize motion
    fn prefers_reduced_motion(&self) -> bool {
        false
    }

    /// Take all queued callbacks in the order they fired
    fn drain_events(&mut self) -> Vec<SurfaceEvent>;
}

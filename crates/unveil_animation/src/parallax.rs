//! Parallax
//!
//! Offsets an element in proportion to its distance from the viewport center
//! as the page scrolls. By default scroll events only schedule work: the
//! offset is recomputed at most once per animation frame. `coalesce(false)`
//! recomputes on every scroll event instead.

use tracing::{debug, warn};
use unveil_core::{
    ClassFragment, ClassList, Element, ElementId, FrameId, ListenerId, Node, Rect, Size, Style,
    Surface, SurfaceEvent,
};

use crate::component::{with_ref, Component};
use crate::config::MotionDefaults;
use crate::direction::{Axis, Direction};

/// Signed offset in pixels for an element at `rect` in `viewport`
///
/// The vertical distance between the element's center and the viewport's
/// center, scaled by `speed`. The page scrolls vertically, so the distance is
/// always measured on the y axis; the direction only picks the output axis and
/// sign. Up and left move against the scroll, down and right with it.
pub fn parallax_offset(rect: Rect, viewport: Size, speed: f32, direction: Direction) -> f32 {
    let distance = rect.center_y() - viewport.height / 2.0;
    distance * speed * direction.sign()
}

/// `translate3d` for an offset along an axis
pub fn parallax_transform(offset: f32, axis: Axis) -> String {
    let offset = (offset * 100.0).round() / 100.0;
    // Avoid "-0px"
    let offset = if offset == 0.0 { 0.0 } else { offset };
    match axis {
        Axis::Y => format!("translate3d(0, {offset}px, 0)"),
        Axis::X => format!("translate3d({offset}px, 0, 0)"),
    }
}

pub struct Parallax {
    speed: f32,
    direction: Direction,
    coalesce: bool,
    target: Option<ElementId>,
    listener: Option<ListenerId>,
    frame: Option<FrameId>,
    last_offset: Option<f32>,
    respect_reduced_motion: bool,
    tag: String,
    class_name: ClassList,
    children: Vec<Node>,
}

impl Default for Parallax {
    fn default() -> Self {
        Self::new()
    }
}

impl Parallax {
    pub fn new() -> Self {
        Self::with_defaults(&MotionDefaults::default())
    }

    pub fn with_defaults(defaults: &MotionDefaults) -> Self {
        Self {
            speed: defaults.parallax.speed,
            direction: Direction::Up,
            coalesce: defaults.parallax.coalesce,
            target: None,
            listener: None,
            frame: None,
            last_offset: None,
            respect_reduced_motion: defaults.respect_reduced_motion,
            tag: "div".to_string(),
            class_name: ClassList::new(),
            children: Vec::new(),
        }
    }

    /// Fraction of the distance from the viewport center to move
    ///
    /// Negative and non-finite speeds are clamped to 0, which disables the
    /// effect. Use [`direction`](Self::direction) to reverse the motion.
    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = if speed.is_finite() && speed >= 0.0 {
            speed
        } else {
            warn!("Parallax: speed {} clamped to 0, use direction to reverse", speed);
            0.0
        };
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Recompute once per animation frame (default) or on every scroll event
    pub fn coalesce(mut self, coalesce: bool) -> Self {
        self.coalesce = coalesce;
        self
    }

    pub fn target(mut self, element: ElementId) -> Self {
        self.target = Some(element);
        self
    }

    pub fn class_name(mut self, classes: impl ClassFragment) -> Self {
        classes.append_to(&mut self.class_name);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Offset from the most recent update, if any
    pub fn offset(&self) -> Option<f32> {
        self.last_offset
    }

    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    /// Recompute the offset and write the transform
    pub fn update(&mut self, surface: &mut dyn Surface) {
        let Some(element) = self.target else {
            return;
        };
        let Some(rect) = surface.element_rect(element) else {
            debug!("Parallax: target element is gone, skipping update");
            return;
        };

        let offset = parallax_offset(rect, surface.viewport(), self.speed, self.direction);
        let transform = parallax_transform(offset, self.direction.axis());
        if let Err(err) = surface.set_transform(element, &transform) {
            warn!("Parallax: failed to write transform: {}", err);
            return;
        }
        self.last_offset = Some(offset);
    }

    fn schedule(&mut self, surface: &mut dyn Surface) {
        if self.frame.is_some() {
            return;
        }
        match surface.request_animation_frame() {
            Ok(frame) => self.frame = Some(frame),
            Err(err) => {
                warn!("Parallax: animation frame unavailable ({}), updating now", err);
                self.update(surface);
            }
        }
    }
}

impl Component for Parallax {
    fn mount(&mut self, surface: &mut dyn Surface) {
        if self.listener.is_some() {
            return;
        }
        if self.target.is_none() {
            debug!("Parallax: no target ref, not listening");
            return;
        }
        if self.respect_reduced_motion && surface.prefers_reduced_motion() {
            debug!("Parallax: reduced motion preferred, not listening");
            return;
        }

        match surface.add_scroll_listener(true) {
            Ok(listener) => self.listener = Some(listener),
            Err(err) => {
                warn!("Parallax: failed to add scroll listener: {}", err);
                return;
            }
        }
        self.update(surface);
    }

    fn unmount(&mut self, surface: &mut dyn Surface) {
        if let Some(listener) = self.listener.take() {
            if let Err(err) = surface.remove_scroll_listener(listener) {
                warn!("Parallax: failed to remove scroll listener: {}", err);
            }
        }
        if let Some(frame) = self.frame.take() {
            if let Err(err) = surface.cancel_animation_frame(frame) {
                warn!("Parallax: failed to cancel animation frame: {}", err);
            }
        }
    }

    fn handle_event(&mut self, event: &SurfaceEvent, surface: &mut dyn Surface) -> bool {
        match *event {
            SurfaceEvent::Scroll { listener, .. } if self.listener == Some(listener) => {
                if self.coalesce {
                    self.schedule(surface);
                    false
                } else {
                    self.update(surface);
                    true
                }
            }
            SurfaceEvent::AnimationFrame { frame, .. } if self.frame == Some(frame) => {
                self.frame = None;
                self.update(surface);
                true
            }
            _ => false,
        }
    }

    fn render(&self) -> Element {
        let mut style = Style::new().with("will-change", "transform");
        if let Some(offset) = self.last_offset {
            style.set("transform", parallax_transform(offset, self.direction.axis()));
        }
        let element = Element::new(self.tag.as_str())
            .class(&self.class_name)
            .style(&style)
            .children(self.children.iter().cloned());
        with_ref(element, self.target)
    }
}

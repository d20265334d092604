//! Recording surface
//!
//! A [`Surface`] that records every command instead of touching a browser.
//! Elements are laid out in document coordinates; `element_rect` reports them
//! relative to the current scroll offset, like `getBoundingClientRect`.
//!
//! Host callbacks are synthesized explicitly:
//!
//! ```rust
//! use unveil_core::{IntersectionOptions, RecordingSurface, Rect, Size, Surface, SurfaceEvent};
//!
//! let mut surface = RecordingSurface::new(Size::new(1280.0, 800.0));
//! let el = surface.insert_element(Rect::new(0.0, 1200.0, 400.0, 300.0));
//! let observer = surface
//!     .observe_intersection(el, &IntersectionOptions::default())
//!     .unwrap();
//!
//! surface.intersect(el, 0.5);
//! let events = surface.drain_events();
//! assert!(matches!(events[0], SurfaceEvent::Intersection { observer: o, .. } if o == observer));
//! ```

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use crate::error::{Result, SurfaceError};
use crate::style::Style;
use crate::surface::{
    AnimationId, AnimationTiming, ElementId, FrameId, IntersectionEntry, IntersectionOptions,
    Keyframe, ListenerId, ObserverId, Rect, Size, Surface, SurfaceEvent,
};

/// A recorded surface call
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCommand {
    Observe {
        observer: ObserverId,
        element: ElementId,
        options: IntersectionOptions,
    },
    Unobserve {
        observer: ObserverId,
    },
    Animate {
        animation: AnimationId,
        element: ElementId,
        keyframes: Vec<Keyframe>,
        timing: AnimationTiming,
    },
    CancelAnimation {
        animation: AnimationId,
    },
    AddScrollListener {
        listener: ListenerId,
        passive: bool,
    },
    RemoveScrollListener {
        listener: ListenerId,
    },
    RequestFrame {
        frame: FrameId,
    },
    CancelFrame {
        frame: FrameId,
    },
    SetStyle {
        element: ElementId,
        property: String,
        value: String,
    },
}

struct ObserverEntry {
    element: ElementId,
}

/// Test backend recording every [`Surface`] call
pub struct RecordingSurface {
    commands: Vec<SurfaceCommand>,
    elements: SlotMap<ElementId, Rect>,
    styles: SecondaryMap<ElementId, Style>,
    observers: SlotMap<ObserverId, ObserverEntry>,
    animations: SlotMap<AnimationId, ElementId>,
    listeners: SlotMap<ListenerId, bool>,
    frames: SlotMap<FrameId, ()>,
    events: VecDeque<SurfaceEvent>,
    viewport: Size,
    scroll_x: f32,
    scroll_y: f32,
    clock_ms: f64,
    intersection_supported: bool,
    reduced_motion: bool,
}

impl RecordingSurface {
    /// Create a recording surface with the given viewport size
    pub fn new(viewport: Size) -> Self {
        Self {
            commands: Vec::new(),
            elements: SlotMap::with_key(),
            styles: SecondaryMap::new(),
            observers: SlotMap::with_key(),
            animations: SlotMap::with_key(),
            listeners: SlotMap::with_key(),
            frames: SlotMap::with_key(),
            events: VecDeque::new(),
            viewport,
            scroll_x: 0.0,
            scroll_y: 0.0,
            clock_ms: 0.0,
            intersection_supported: true,
            reduced_motion: false,
        }
    }

    /// Simulate a host without an intersection observation API
    pub fn without_intersection_observer(mut self) -> Self {
        self.intersection_supported = false;
        self
    }

    /// Simulate the user's reduced-motion preference
    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    /// Add an element at a document-space rect
    pub fn insert_element(&mut self, rect: Rect) -> ElementId {
        self.elements.insert(rect)
    }

    /// Remove an element; its observers stop receiving events
    pub fn remove_element(&mut self, element: ElementId) -> bool {
        self.styles.remove(element);
        self.elements.remove(element).is_some()
    }

    /// Get the recorded commands
    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    /// Count recorded commands matching a predicate
    pub fn count_commands(&self, predicate: impl Fn(&SurfaceCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| predicate(c)).count()
    }

    /// Current inline style written to an element
    pub fn style_of(&self, element: ElementId, property: &str) -> Option<&str> {
        self.styles.get(element).and_then(|s| s.get(property))
    }

    pub fn live_observers(&self) -> usize {
        self.observers.len()
    }

    pub fn live_animations(&self) -> usize {
        self.animations.len()
    }

    pub fn live_listeners(&self) -> usize {
        self.listeners.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Fire intersection callbacks for every observer watching `element`
    ///
    /// A ratio of zero reports the element as leaving the viewport.
    pub fn intersect(&mut self, element: ElementId, ratio: f32) {
        let ratio = ratio.clamp(0.0, 1.0);
        let observers: Vec<ObserverId> = self
            .observers
            .iter()
            .filter(|(_, entry)| entry.element == element)
            .map(|(id, _)| id)
            .collect();

        for observer in observers {
            self.events.push_back(SurfaceEvent::Intersection {
                observer,
                entry: IntersectionEntry {
                    target: element,
                    is_intersecting: ratio > 0.0,
                    intersection_ratio: ratio,
                },
            });
        }
    }

    /// Report `element` as having left the viewport
    pub fn leave(&mut self, element: ElementId) {
        self.intersect(element, 0.0);
    }

    /// Fire a full intersection for every observed element
    pub fn intersect_all(&mut self) {
        let elements: Vec<ElementId> = self.observers.values().map(|e| e.element).collect();
        let mut seen = Vec::with_capacity(elements.len());
        for element in elements {
            if !seen.contains(&element) {
                seen.push(element);
                self.intersect(element, 1.0);
            }
        }
    }

    /// Scroll the document and fire every scroll listener
    pub fn scroll_to(&mut self, scroll_x: f32, scroll_y: f32) {
        self.scroll_x = scroll_x;
        self.scroll_y = scroll_y;
        let listeners: Vec<ListenerId> = self.listeners.keys().collect();
        for listener in listeners {
            self.events.push_back(SurfaceEvent::Scroll {
                listener,
                scroll_x,
                scroll_y,
            });
        }
    }

    /// Advance the clock and fire all pending animation frames
    ///
    /// Frames are one-shot: a callback that wants another frame must request it.
    pub fn advance_frame(&mut self, dt_ms: f64) {
        self.clock_ms += dt_ms;
        let frames: Vec<FrameId> = self.frames.keys().collect();
        self.frames.clear();
        for frame in frames {
            self.events.push_back(SurfaceEvent::AnimationFrame {
                frame,
                timestamp_ms: self.clock_ms,
            });
        }
    }
}

impl Default for RecordingSurface {
    /// A 1280x720 viewport
    fn default() -> Self {
        Self::new(Size::new(1280.0, 720.0))
    }
}

impl Surface for RecordingSurface {
    fn observe_intersection(
        &mut self,
        element: ElementId,
        options: &IntersectionOptions,
    ) -> Result<ObserverId> {
        if !self.intersection_supported {
            return Err(SurfaceError::Unsupported("IntersectionObserver"));
        }
        if !self.elements.contains_key(element) {
            return Err(SurfaceError::UnknownElement);
        }
        let observer = self.observers.insert(ObserverEntry { element });
        self.commands.push(SurfaceCommand::Observe {
            observer,
            element,
            options: *options,
        });
        Ok(observer)
    }

    fn unobserve(&mut self, observer: ObserverId) -> Result<()> {
        self.observers
            .remove(observer)
            .ok_or(SurfaceError::UnknownHandle("observer"))?;
        // Callbacks already queued for a disconnected observer are dropped
        self.events.retain(|event| {
            !matches!(event, SurfaceEvent::Intersection { observer: o, .. } if *o == observer)
        });
        self.commands.push(SurfaceCommand::Unobserve { observer });
        Ok(())
    }

    fn animate(
        &mut self,
        element: ElementId,
        keyframes: &[Keyframe],
        timing: &AnimationTiming,
    ) -> Result<AnimationId> {
        if !self.elements.contains_key(element) {
            return Err(SurfaceError::UnknownElement);
        }
        let animation = self.animations.insert(element);
        self.commands.push(SurfaceCommand::Animate {
            animation,
            element,
            keyframes: keyframes.to_vec(),
            timing: *timing,
        });
        Ok(animation)
    }

    fn cancel_animation(&mut self, animation: AnimationId) -> Result<()> {
        self.animations
            .remove(animation)
            .ok_or(SurfaceError::UnknownHandle("animation"))?;
        self.commands
            .push(SurfaceCommand::CancelAnimation { animation });
        Ok(())
    }

    fn add_scroll_listener(&mut self, passive: bool) -> Result<ListenerId> {
        let listener = self.listeners.insert(passive);
        self.commands
            .push(SurfaceCommand::AddScrollListener { listener, passive });
        Ok(listener)
    }

    fn remove_scroll_listener(&mut self, listener: ListenerId) -> Result<()> {
        self.listeners
            .remove(listener)
            .ok_or(SurfaceError::UnknownHandle("scroll listener"))?;
        self.events.retain(|event| {
            !matches!(event, SurfaceEvent::Scroll { listener: l, .. } if *l == listener)
        });
        self.commands
            .push(SurfaceCommand::RemoveScrollListener { listener });
        Ok(())
    }

    fn request_animation_frame(&mut self) -> Result<FrameId> {
        let frame = self.frames.insert(());
        self.commands.push(SurfaceCommand::RequestFrame { frame });
        Ok(frame)
    }

    fn cancel_animation_frame(&mut self, frame: FrameId) -> Result<()> {
        if self.frames.remove(frame).is_none() {
            // Already fired: drop the queued callback instead
            let before = self.events.len();
            self.events.retain(|event| {
                !matches!(event, SurfaceEvent::AnimationFrame { frame: f, .. } if *f == frame)
            });
            if self.events.len() == before {
                return Err(SurfaceError::UnknownHandle("animation frame"));
            }
        }
        self.commands.push(SurfaceCommand::CancelFrame { frame });
        Ok(())
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: &str) -> Result<()> {
        if !self.elements.contains_key(element) {
            return Err(SurfaceError::UnknownElement);
        }
        match self.styles.get_mut(element) {
            Some(style) => style.set(property, value),
            None => {
                self.styles
                    .insert(element, Style::new().with(property, value));
            }
        }
        self.commands.push(SurfaceCommand::SetStyle {
            element,
            property: property.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn element_rect(&self, element: ElementId) -> Option<Rect> {
        self.elements
            .get(element)
            .map(|rect| rect.offset_by(self.scroll_x, self.scroll_y))
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn drain_events(&mut self) -> Vec<SurfaceEvent> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> RecordingSurface {
        RecordingSurface::new(Size::new(1000.0, 800.0))
    }

    #[test]
    fn test_observe_and_intersect() {
        let mut s = surface();
        let el = s.insert_element(Rect::new(0.0, 0.0, 10.0, 10.0));
        let other = s.insert_element(Rect::new(0.0, 0.0, 10.0, 10.0));
        let obs = s
            .observe_intersection(el, &IntersectionOptions::default())
            .unwrap();

        s.intersect(other, 1.0);
        assert!(s.drain_events().is_empty());

        s.intersect(el, 0.4);
        let events = s.drain_events();
        assert_eq!(events.len(), 1);
        match events[0] {
            SurfaceEvent::Intersection { observer, entry } => {
                assert_eq!(observer, obs);
                assert!(entry.is_intersecting);
                assert_eq!(entry.intersection_ratio, 0.4);
            }
            _ => panic!("expected intersection"),
        }
    }

    #[test]
    fn test_double_release_is_error() {
        let mut s = surface();
        let el = s.insert_element(Rect::default());
        let obs = s
            .observe_intersection(el, &IntersectionOptions::default())
            .unwrap();
        assert!(s.unobserve(obs).is_ok());
        assert_eq!(
            s.unobserve(obs),
            Err(SurfaceError::UnknownHandle("observer"))
        );

        let anim = s
            .animate(el, &[], &AnimationTiming::default())
            .unwrap();
        assert!(s.cancel_animation(anim).is_ok());
        assert!(s.cancel_animation(anim).is_err());
        assert_eq!(s.live_animations(), 0);
    }

    #[test]
    fn test_unsupported_intersection() {
        let mut s = surface().without_intersection_observer();
        let el = s.insert_element(Rect::default());
        assert_eq!(
            s.observe_intersection(el, &IntersectionOptions::default()),
            Err(SurfaceError::Unsupported("IntersectionObserver"))
        );
    }

    #[test]
    fn test_unobserve_drops_queued_events() {
        let mut s = surface();
        let el = s.insert_element(Rect::default());
        let obs = s
            .observe_intersection(el, &IntersectionOptions::default())
            .unwrap();
        s.intersect(el, 1.0);
        s.unobserve(obs).unwrap();
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_scroll_moves_rects() {
        let mut s = surface();
        let el = s.insert_element(Rect::new(0.0, 1000.0, 100.0, 100.0));
        let listener = s.add_scroll_listener(true).unwrap();
        s.scroll_to(0.0, 600.0);

        assert_eq!(s.element_rect(el).unwrap().y, 400.0);
        assert_eq!(
            s.drain_events(),
            vec![SurfaceEvent::Scroll {
                listener,
                scroll_x: 0.0,
                scroll_y: 600.0
            }]
        );
    }

    #[test]
    fn test_frames_are_one_shot() {
        let mut s = surface();
        let frame = s.request_animation_frame().unwrap();
        s.advance_frame(16.0);
        assert_eq!(s.pending_frames(), 0);
        assert_eq!(
            s.drain_events(),
            vec![SurfaceEvent::AnimationFrame {
                frame,
                timestamp_ms: 16.0
            }]
        );
        s.advance_frame(16.0);
        assert!(s.drain_events().is_empty());
        assert!(s.cancel_animation_frame(frame).is_err());
    }

    #[test]
    fn test_set_style_tracks_latest_value() {
        let mut s = surface();
        let el = s.insert_element(Rect::default());
        s.set_transform(el, "translateY(4px)").unwrap();
        s.set_transform(el, "translateY(8px)").unwrap();
        assert_eq!(s.style_of(el, "transform"), Some("translateY(8px)"));
        assert_eq!(
            s.count_commands(|c| matches!(c, SurfaceCommand::SetStyle { .. })),
            2
        );

        s.remove_element(el);
        assert_eq!(
            s.set_transform(el, "none"),
            Err(SurfaceError::UnknownElement)
        );
    }
}

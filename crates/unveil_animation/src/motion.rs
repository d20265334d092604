//! Motion primitive
//!
//! Swaps between two class sets when its element becomes visible, letting CSS
//! transitions animate between them. Visibility comes from the viewport
//! observer, from the caller (`visible(..)`), or is immediate when
//! `when_visible(false)`.
//!
//! # Example
//!
//! ```rust
//! use unveil_animation::prelude::*;
//!
//! let motion = Motion::new()
//!     .initial("opacity-0 scale-95")
//!     .animate("opacity-100 scale-100")
//!     .duration(500)
//!     .when_visible(false)
//!     .child("Hello");
//!
//! let html = motion.render().to_html();
//! assert!(html.contains(r#"class="opacity-100 scale-100""#));
//! ```

use tracing::debug;
use unveil_core::{
    ClassFragment, ClassList, Easing, Element, ElementId, Node, RootMargin, Style, Surface,
    SurfaceEvent,
};

use crate::component::{with_ref, Component, Delayed};
use crate::config::MotionDefaults;
use crate::observer::{ObserverOptions, ViewportObserver};

/// Transition declarations shared by Motion and Reveal
pub(crate) fn transition_style(
    property: &str,
    duration_ms: u32,
    delay_ms: u32,
    easing: Easing,
) -> Style {
    Style::new()
        .with("transition-property", property)
        .with("transition-duration", format!("{duration_ms}ms"))
        .with("transition-delay", format!("{delay_ms}ms"))
        .with("transition-timing-function", easing.to_string())
}

/// Class-swap-on-visibility wrapper
pub struct Motion {
    tag: String,
    class_name: ClassList,
    initial_classes: ClassList,
    final_classes: ClassList,
    initial_style: Style,
    final_style: Style,
    duration_ms: u32,
    delay_ms: u32,
    easing: Easing,
    when_visible: bool,
    controlled: Option<bool>,
    observer: ViewportObserver,
    target: Option<ElementId>,
    children: Vec<Node>,
    respect_reduced_motion: bool,
    reduced_motion: bool,
}

impl Default for Motion {
    fn default() -> Self {
        Self::new()
    }
}

impl Motion {
    pub fn new() -> Self {
        Self::with_defaults(&MotionDefaults::default())
    }

    pub fn with_defaults(defaults: &MotionDefaults) -> Self {
        Self {
            tag: "div".to_string(),
            class_name: ClassList::new(),
            initial_classes: ClassList::new(),
            final_classes: ClassList::new(),
            initial_style: Style::new(),
            final_style: Style::new(),
            duration_ms: defaults.duration_ms,
            delay_ms: defaults.delay_ms,
            easing: defaults.easing,
            when_visible: true,
            controlled: None,
            observer: ViewportObserver::new(ObserverOptions::from_defaults(defaults)),
            target: None,
            children: Vec::new(),
            respect_reduced_motion: defaults.respect_reduced_motion,
            reduced_motion: false,
        }
    }

    /// Classes applied before the element becomes visible
    pub fn initial(mut self, classes: impl ClassFragment) -> Self {
        self.initial_classes = ClassList::new().with(classes);
        self
    }

    /// Classes applied once visible
    pub fn animate(mut self, classes: impl ClassFragment) -> Self {
        self.final_classes = ClassList::new().with(classes);
        self
    }

    /// Inline style applied before the element becomes visible
    pub fn initial_style(mut self, style: Style) -> Self {
        self.initial_style = style;
        self
    }

    /// Inline style applied once visible
    pub fn final_style(mut self, style: Style) -> Self {
        self.final_style = style;
        self
    }

    pub(crate) fn set_styles(&mut self, initial: Style, final_: Style) {
        self.initial_style = initial;
        self.final_style = final_;
    }

    /// Transition duration in milliseconds
    pub fn duration(mut self, ms: u32) -> Self {
        self.duration_ms = ms;
        self
    }

    /// Transition delay in milliseconds
    pub fn delay(mut self, ms: u32) -> Self {
        self.delay_ms = ms;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// When false, the final state applies from mount and no observer is attached
    pub fn when_visible(mut self, when_visible: bool) -> Self {
        self.when_visible = when_visible;
        self
    }

    /// Drive visibility externally instead of through the observer
    pub fn visible(mut self, visible: bool) -> Self {
        self.controlled = Some(visible);
        self
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        let options = self.observer.options().threshold(threshold);
        self.observer.set_options(options);
        self
    }

    pub fn root_margin(mut self, root_margin: RootMargin) -> Self {
        let options = self.observer.options().root_margin(root_margin);
        self.observer.set_options(options);
        self
    }

    pub fn trigger_once(mut self, trigger_once: bool) -> Self {
        let options = self.observer.options().trigger_once(trigger_once);
        self.observer.set_options(options);
        self
    }

    /// The element this component observes (its ref)
    pub fn target(mut self, element: ElementId) -> Self {
        self.target = Some(element);
        self
    }

    /// Extra classes applied in both states
    pub fn class_name(mut self, classes: impl ClassFragment) -> Self {
        classes.append_to(&mut self.class_name);
        self
    }

    /// Element tag (default `div`)
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Update controlled visibility after construction (`None` returns control
    /// to the observer)
    pub fn set_visible(&mut self, visible: Option<bool>) {
        self.controlled = visible;
    }

    pub fn is_visible(&self) -> bool {
        if !self.when_visible || self.reduced_motion {
            return true;
        }
        match self.controlled {
            Some(visible) => visible,
            None => self.observer.in_view(),
        }
    }

    pub fn target_ref(&self) -> Option<ElementId> {
        self.target
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn initial_classes(&self) -> &ClassList {
        &self.initial_classes
    }

    pub fn final_classes(&self) -> &ClassList {
        &self.final_classes
    }

    pub fn observer(&self) -> &ViewportObserver {
        &self.observer
    }
}

impl Component for Motion {
    fn mount(&mut self, surface: &mut dyn Surface) {
        if self.respect_reduced_motion && surface.prefers_reduced_motion() {
            debug!("Motion: reduced motion preferred, rendering final state");
            self.reduced_motion = true;
            return;
        }
        if self.when_visible && self.controlled.is_none() {
            self.observer.attach(surface, self.target);
        }
    }

    fn unmount(&mut self, surface: &mut dyn Surface) {
        self.observer.detach(surface);
    }

    fn handle_event(&mut self, event: &SurfaceEvent, surface: &mut dyn Surface) -> bool {
        self.observer.handle_event(event, surface)
    }

    fn render(&self) -> Element {
        let visible = self.is_visible();

        let (classes, state_style) = if visible {
            (&self.final_classes, &self.final_style)
        } else {
            (&self.initial_classes, &self.initial_style)
        };

        let mut style = if self.reduced_motion {
            Style::new()
        } else {
            transition_style("all", self.duration_ms, self.delay_ms, self.easing)
        };
        style.merge(state_style);

        let element = Element::new(self.tag.as_str())
            .class(&self.class_name)
            .class(classes)
            .style(&style)
            .attr("data-state", if visible { "visible" } else { "hidden" })
            .children(self.children.iter().cloned());

        with_ref(element, self.target)
    }
}

impl Delayed for Motion {
    fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    fn set_delay_ms(&mut self, delay_ms: u32) {
        self.delay_ms = delay_ms;
    }
}

/// Forward Motion's builder methods through a wrapper's `motion` field
macro_rules! delegate_motion_builders {
    ($field:ident) => {
        /// Transition duration in milliseconds
        pub fn duration(mut self, ms: u32) -> Self {
            self.$field = self.$field.duration(ms);
            self
        }

        /// Transition delay in milliseconds
        pub fn delay(mut self, ms: u32) -> Self {
            self.$field = self.$field.delay(ms);
            self
        }

        pub fn easing(mut self, easing: unveil_core::Easing) -> Self {
            self.$field = self.$field.easing(easing);
            self
        }

        pub fn when_visible(mut self, when_visible: bool) -> Self {
            self.$field = self.$field.when_visible(when_visible);
            self
        }

        pub fn visible(mut self, visible: bool) -> Self {
            self.$field = self.$field.visible(visible);
            self
        }

        pub fn threshold(mut self, threshold: f32) -> Self {
            self.$field = self.$field.threshold(threshold);
            self
        }

        pub fn root_margin(mut self, root_margin: unveil_core::RootMargin) -> Self {
            self.$field = self.$field.root_margin(root_margin);
            self
        }

        pub fn trigger_once(mut self, trigger_once: bool) -> Self {
            self.$field = self.$field.trigger_once(trigger_once);
            self
        }

        pub fn target(mut self, element: unveil_core::ElementId) -> Self {
            self.$field = self.$field.target(element);
            self
        }

        pub fn class_name(mut self, classes: impl unveil_core::ClassFragment) -> Self {
            self.$field = self.$field.class_name(classes);
            self
        }

        pub fn tag(mut self, tag: impl Into<String>) -> Self {
            self.$field = self.$field.tag(tag);
            self
        }

        pub fn child(mut self, child: impl Into<unveil_core::Node>) -> Self {
            self.$field = self.$field.child(child);
            self
        }

        pub fn children<I, N>(mut self, children: I) -> Self
        where
            I: IntoIterator<Item = N>,
            N: Into<unveil_core::Node>,
        {
            self.$field = self.$field.children(children);
            self
        }
    };
}

/// Forward Component and Delayed to a wrapper's `motion` field
macro_rules! delegate_motion_component {
    ($ty:ty, $field:ident) => {
        impl $crate::component::Component for $ty {
            fn mount(&mut self, surface: &mut dyn unveil_core::Surface) {
                self.$field.mount(surface)
            }

            fn unmount(&mut self, surface: &mut dyn unveil_core::Surface) {
                self.$field.unmount(surface)
            }

            fn handle_event(
                &mut self,
                event: &unveil_core::SurfaceEvent,
                surface: &mut dyn unveil_core::Surface,
            ) -> bool {
                self.$field.handle_event(event, surface)
            }

            fn render(&self) -> unveil_core::Element {
                self.$field.render()
            }
        }

        impl $crate::component::Delayed for $ty {
            fn delay_ms(&self) -> u32 {
                self.$field.delay_ms()
            }

            fn set_delay_ms(&mut self, delay_ms: u32) {
                self.$field.set_delay_ms(delay_ms)
            }
        }

        impl std::ops::Deref for $ty {
            type Target = $crate::motion::Motion;

            fn deref(&self) -> &Self::Target {
                &self.$field
            }
        }

        impl std::ops::DerefMut for $ty {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.$field
            }
        }
    };
}

pub(crate) use delegate_motion_builders;
pub(crate) use delegate_motion_component;

#[cfg(test)]
mod tests {
    use super::*;
    use unveil_core::{RecordingSurface, Rect, Size};

    fn setup() -> (RecordingSurface, ElementId) {
        let mut surface = RecordingSurface::new(Size::new(1000.0, 800.0));
        let el = surface.insert_element(Rect::new(0.0, 1500.0, 200.0, 200.0));
        (surface, el)
    }

    fn pump(component: &mut dyn Component, surface: &mut RecordingSurface) -> bool {
        let mut changed = false;
        for event in surface.drain_events() {
            changed |= component.handle_event(&event, surface);
        }
        changed
    }

    fn class_string(motion: &Motion) -> String {
        motion.render().classes().to_string()
    }

    #[test]
    fn test_classes_swap_on_visibility() {
        let (mut surface, el) = setup();
        let mut motion = Motion::new()
            .initial("opacity-0 translate-y-4")
            .animate("opacity-100 translate-y-0")
            .target(el);

        motion.mount(&mut surface);
        assert_eq!(class_string(&motion), "opacity-0 translate-y-4");
        assert_eq!(motion.render().attribute("data-state"), Some("hidden"));

        surface.intersect(el, 1.0);
        assert!(pump(&mut motion, &mut surface));
        assert_eq!(class_string(&motion), "opacity-100 translate-y-0");
        assert_eq!(motion.render().attribute("data-state"), Some("visible"));
    }

    #[test]
    fn test_when_visible_false_mounts_final() {
        let (mut surface, el) = setup();
        let mut motion = Motion::new()
            .initial("opacity-0")
            .animate("opacity-100")
            .duration(500)
            .when_visible(false)
            .target(el);

        assert_eq!(class_string(&motion), "opacity-100");
        motion.mount(&mut surface);
        assert_eq!(class_string(&motion), "opacity-100");
        assert_eq!(surface.live_observers(), 0);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn test_transition_style_and_state_style() {
        let motion = Motion::new()
            .duration(500)
            .delay(150)
            .easing(Easing::EaseInOut)
            .initial_style(Style::transform("translateX(-100%)"))
            .final_style(Style::transform("translate(0)"));

        let style = motion.render().inline_style().clone();
        assert_eq!(style.get("transition-property"), Some("all"));
        assert_eq!(style.get("transition-duration"), Some("500ms"));
        assert_eq!(style.get("transition-delay"), Some("150ms"));
        assert_eq!(style.get("transition-timing-function"), Some("ease-in-out"));
        assert_eq!(style.get("transform"), Some("translateX(-100%)"));

        let shown = Motion::new()
            .initial_style(Style::transform("translateX(-100%)"))
            .final_style(Style::transform("translate(0)"))
            .visible(true);
        assert_eq!(
            shown.render().inline_style().get("transform"),
            Some("translate(0)")
        );
    }

    #[test]
    fn test_controlled_visibility_skips_observer() {
        let (mut surface, el) = setup();
        let mut motion = Motion::new()
            .initial("a")
            .animate("b")
            .visible(false)
            .target(el);
        motion.mount(&mut surface);
        assert_eq!(surface.live_observers(), 0);
        assert_eq!(class_string(&motion), "a");

        motion.set_visible(Some(true));
        assert_eq!(class_string(&motion), "b");
    }

    #[test]
    fn test_class_name_and_ref_attribute() {
        let (_, el) = setup();
        let motion = Motion::new()
            .tag("section")
            .class_name("hero")
            .initial("opacity-0")
            .target(el)
            .child("Title");
        let rendered = motion.render();
        assert_eq!(rendered.tag(), "section");
        assert_eq!(rendered.classes().to_string(), "hero opacity-0");
        assert_eq!(
            rendered.attribute(crate::component::REF_ATTRIBUTE),
            Some(el.to_raw().to_string().as_str())
        );
    }

    #[test]
    fn test_reduced_motion_renders_final_without_transition() {
        let mut surface = RecordingSurface::new(Size::new(1000.0, 800.0)).with_reduced_motion(true);
        let el = surface.insert_element(Rect::default());
        let mut motion = Motion::new().initial("opacity-0").animate("opacity-100").target(el);
        motion.mount(&mut surface);

        let rendered = motion.render();
        assert_eq!(rendered.classes().to_string(), "opacity-100");
        assert!(rendered.inline_style().get("transition-duration").is_none());
        assert_eq!(surface.live_observers(), 0);
    }

    #[test]
    fn test_unmount_detaches_observer() {
        let (mut surface, el) = setup();
        let mut motion = Motion::new().target(el);
        motion.mount(&mut surface);
        motion.mount(&mut surface);
        assert_eq!(surface.live_observers(), 1);
        motion.unmount(&mut surface);
        motion.unmount(&mut surface);
        assert_eq!(surface.live_observers(), 0);
    }

    #[test]
    fn test_fails_open_without_observer() {
        let mut surface =
            RecordingSurface::new(Size::new(1000.0, 800.0)).without_intersection_observer();
        let el = surface.insert_element(Rect::new(0.0, 1500.0, 200.0, 200.0));
        let mut motion = Motion::new()
            .initial("opacity-0")
            .animate("opacity-100")
            .target(el);

        motion.mount(&mut surface);
        assert!(motion.is_visible());
        assert_eq!(class_string(&motion), "opacity-100");
        assert_eq!(surface.live_observers(), 0);
        motion.unmount(&mut surface);
    }
}

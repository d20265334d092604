//! Reveal
//!
//! A one-shot reveal: the element starts hidden behind a single effect
//! (slide, fade, clip or blur) and transitions to its revealed state the first
//! time it scrolls into view. Once revealed it stays revealed.
//!
//! Slide and clip effects render inside an `overflow-hidden` wrapper so the
//! hidden content never spills outside its box.

use tracing::debug;
use unveil_core::{
    ClassFragment, ClassList, Easing, Element, ElementId, Length, Node, RootMargin, Style, Surface,
    SurfaceEvent,
};

use crate::component::{with_ref, Component, Delayed};
use crate::config::MotionDefaults;
use crate::direction::{translate_along, Direction};
use crate::fade::IDENTITY_TRANSLATE;
use crate::motion::transition_style;
use crate::observer::{ObserverOptions, ViewportObserver};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RevealState {
    #[default]
    Hidden,
    Revealed,
}

/// The single effect a [`Reveal`] animates
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RevealEffect {
    /// Content slides into its box from the opposite side of `Direction`
    Slide(Direction),
    Fade,
    /// Content is unclipped in `Direction`
    Clip(Direction),
    Blur { radius: Length },
    /// No effect: content is shown as is
    None,
}

impl Default for RevealEffect {
    fn default() -> Self {
        RevealEffect::Slide(Direction::Up)
    }
}

impl RevealEffect {
    pub const DEFAULT_BLUR: Length = Length::Px(10.0);

    /// Parse an effect name, mapping unknown names to [`RevealEffect::None`]
    ///
    /// Directional effects default to `Up` when no direction is given.
    pub fn from_name(name: &str, direction: Option<Direction>) -> Self {
        let direction = direction.unwrap_or(Direction::Up);
        match name.trim().to_ascii_lowercase().as_str() {
            "slide" => RevealEffect::Slide(direction),
            "fade" => RevealEffect::Fade,
            "clip" => RevealEffect::Clip(direction),
            "blur" => RevealEffect::Blur {
                radius: Self::DEFAULT_BLUR,
            },
            "none" => RevealEffect::None,
            other => {
                debug!("Unknown reveal effect {:?}, rendering without effect", other);
                RevealEffect::None
            }
        }
    }

    /// CSS property the effect animates
    pub fn property(&self) -> Option<&'static str> {
        match self {
            RevealEffect::Slide(_) => Some("transform"),
            RevealEffect::Fade => Some("opacity"),
            RevealEffect::Clip(_) => Some("clip-path"),
            RevealEffect::Blur { .. } => Some("filter"),
            RevealEffect::None => None,
        }
    }

    pub fn hidden_value(&self) -> Option<String> {
        let full = Length::Percent(100.0);
        let value = match *self {
            RevealEffect::Slide(direction) => {
                // Content waits on the side opposite to its travel
                let offset = if direction.sign() < 0.0 { full } else { full.negate() };
                translate_along(direction.axis(), offset)
            }
            RevealEffect::Fade => "0".to_string(),
            RevealEffect::Clip(direction) => match direction {
                Direction::Left => "inset(0 100% 0 0)",
                Direction::Right => "inset(0 0 0 100%)",
                Direction::Up => "inset(100% 0 0 0)",
                Direction::Down => "inset(0 0 100% 0)",
            }
            .to_string(),
            RevealEffect::Blur { radius } => format!("blur({radius})"),
            RevealEffect::None => return None,
        };
        Some(value)
    }

    pub fn revealed_value(&self) -> Option<&'static str> {
        match self {
            RevealEffect::Slide(_) => Some(IDENTITY_TRANSLATE),
            RevealEffect::Fade => Some("1"),
            RevealEffect::Clip(_) => Some("inset(0)"),
            RevealEffect::Blur { .. } => Some("blur(0)"),
            RevealEffect::None => None,
        }
    }

    /// Whether the content must be clipped to its box while hidden
    pub fn needs_overflow_hidden(&self) -> bool {
        matches!(self, RevealEffect::Slide(_) | RevealEffect::Clip(_))
    }

    fn style(&self, state: RevealState) -> Style {
        let (Some(property), Some(value)) = (
            self.property(),
            match state {
                RevealState::Hidden => self.hidden_value(),
                RevealState::Revealed => self.revealed_value().map(str::to_string),
            },
        ) else {
            return Style::new();
        };
        Style::new().with(property, value)
    }
}

pub struct Reveal {
    effect: RevealEffect,
    state: RevealState,
    when_visible: bool,
    observer: ViewportObserver,
    target: Option<ElementId>,
    duration_ms: u32,
    delay_ms: u32,
    easing: Easing,
    respect_reduced_motion: bool,
    reduced_motion: bool,
    tag: String,
    class_name: ClassList,
    children: Vec<Node>,
}

impl Default for Reveal {
    fn default() -> Self {
        Self::new()
    }
}

impl Reveal {
    pub fn new() -> Self {
        Self::with_defaults(&MotionDefaults::default())
    }

    pub fn with_defaults(defaults: &MotionDefaults) -> Self {
        Self {
            effect: RevealEffect::default(),
            state: RevealState::Hidden,
            when_visible: true,
            // Revealing is one-shot regardless of the project default
            observer: ViewportObserver::new(
                ObserverOptions::from_defaults(defaults).trigger_once(true),
            ),
            target: None,
            duration_ms: defaults.duration_ms,
            delay_ms: defaults.delay_ms,
            easing: defaults.easing,
            respect_reduced_motion: defaults.respect_reduced_motion,
            reduced_motion: false,
            tag: "div".to_string(),
            class_name: ClassList::new(),
            children: Vec::new(),
        }
    }

    pub fn effect(mut self, effect: RevealEffect) -> Self {
        self.effect = effect;
        self
    }

    pub fn duration(mut self, ms: u32) -> Self {
        self.duration_ms = ms;
        self
    }

    pub fn delay(mut self, ms: u32) -> Self {
        self.delay_ms = ms;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// When false, the content starts revealed and no observer is attached
    pub fn when_visible(mut self, when_visible: bool) -> Self {
        self.when_visible = when_visible;
        if !when_visible {
            self.state = RevealState::Revealed;
        }
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

    pub fn children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn current_effect(&self) -> RevealEffect {
        self.effect
    }

    /// Move to `Revealed`. Returns `true` only on the first transition.
    pub fn reveal(&mut self) -> bool {
        if self.state == RevealState::Revealed {
            return false;
        }
        debug!("Reveal: revealing ({:?})", self.effect);
        self.state = RevealState::Revealed;
        true
    }
}

impl Component for Reveal {
    fn mount(&mut self, surface: &mut dyn Surface) {
        if self.respect_reduced_motion && surface.prefers_reduced_motion() {
            self.reduced_motion = true;
            self.reveal();
            return;
        }
        if self.state == RevealState::Revealed {
            return;
        }
        self.observer.attach(surface, self.target);
        // Fail-open observers report in view immediately
        if self.observer.in_view() {
            self.reveal();
        }
    }

    fn unmount(&mut self, surface: &mut dyn Surface) {
        self.observer.detach(surface);
    }

    fn handle_event(&mut self, event: &SurfaceEvent, surface: &mut dyn Surface) -> bool {
        self.observer.handle_event(event, surface) && self.observer.in_view() && self.reveal()
    }

    fn render(&self) -> Element {
        let mut inner_style = match self.effect.property() {
            Some(property) if !self.reduced_motion => {
                transition_style(property, self.duration_ms, self.delay_ms, self.easing)
            }
            _ => Style::new(),
        };
        inner_style.merge(&self.effect.style(self.state));

        let inner = Element::new("div")
            .style(&inner_style)
            .children(self.children.iter().cloned());

        let outer = Element::new(self.tag.as_str())
            .class(&self.class_name)
            .class((self.effect.needs_overflow_hidden(), "overflow-hidden"))
            .attr(
                "data-state",
                match self.state {
                    RevealState::Hidden => "hidden",
                    RevealState::Revealed => "revealed",
                },
            )
            .child(inner);
        with_ref(outer, self.target)
    }
}

impl Delayed for Reveal {
    fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    fn set_delay_ms(&mut self, delay_ms: u32) {
        self.delay_ms = delay_ms;
    }
}

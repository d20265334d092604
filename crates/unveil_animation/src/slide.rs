//! SlideIn
//!
//! Slides in from the `from` side (default distance `100%`), fading in as it
//! goes unless `fade(false)`.

use unveil_core::{Length, Style};

use crate::config::MotionDefaults;
use crate::direction::{translate_along, Direction};
use crate::fade::IDENTITY_TRANSLATE;
use crate::motion::{delegate_motion_builders, delegate_motion_component, Motion};

/// Initial transform for a slide entering from `from`
pub fn slide_transform(from: Option<Direction>, distance: Length) -> Option<String> {
    let from = from?;
    let offset = if from.sign() < 0.0 {
        distance.negate()
    } else {
        distance
    };
    Some(translate_along(from.axis(), offset))
}

pub struct SlideIn {
    motion: Motion,
    from: Option<Direction>,
    distance: Length,
    fade: bool,
}

impl Default for SlideIn {
    fn default() -> Self {
        Self::new()
    }
}

impl SlideIn {
    pub fn new() -> Self {
        Self::with_defaults(&MotionDefaults::default())
    }

    pub fn with_defaults(defaults: &MotionDefaults) -> Self {
        Self {
            motion: Motion::with_defaults(defaults),
            from: Some(Direction::Up),
            distance: defaults.slide_distance,
            fade: true,
        }
        .apply()
    }

    /// Side the element enters from (`None` disables the transform)
    pub fn from(mut self, from: impl Into<Option<Direction>>) -> Self {
        self.from = from.into();
        self.apply()
    }

    pub fn distance(mut self, distance: Length) -> Self {
        self.distance = distance;
        self.apply()
    }

    /// Fade opacity alongside the slide (default on)
    pub fn fade(mut self, fade: bool) -> Self {
        self.fade = fade;
        self.apply()
    }

    pub fn initial_transform(&self) -> Option<String> {
        slide_transform(self.from, self.distance)
    }

    fn apply(mut self) -> Self {
        let (initial, revealed) = match self.initial_transform() {
            Some(transform) => (
                Style::transform(transform),
                Style::transform(IDENTITY_TRANSLATE),
            ),
            None => (Style::new(), Style::new()),
        };
        self.motion.set_styles(initial, revealed);

        let (initial_classes, final_classes) = if self.fade {
            ("opacity-0", "opacity-100")
        } else {
            ("", "")
        };
        self.motion = self.motion.initial(initial_classes).animate(final_classes);
        self
    }

    delegate_motion_builders!(motion);
}

delegate_motion_component!(SlideIn, motion);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use unveil_core::{RecordingSurface, Rect, Size, Surface};

    #[test]
    fn test_slide_transforms() {
        let d = Length::Percent(100.0);
        assert_eq!(slide_transform(Some(Direction::Left), d).as_deref(), Some("translateX(-100%)"));
        assert_eq!(slide_transform(Some(Direction::Right), d).as_deref(), Some("translateX(100%)"));
        assert_eq!(slide_transform(Some(Direction::Up), d).as_deref(), Some("translateY(-100%)"));
        assert_eq!(slide_transform(Some(Direction::Down), d).as_deref(), Some("translateY(100%)"));
        assert_eq!(slide_transform(None, d), None);
    }

    #[test]
    fn test_slide_from_left_full_distance() {
        let mut surface = RecordingSurface::new(Size::new(1280.0, 720.0));
        let el = surface.insert_element(Rect::new(0.0, 2000.0, 300.0, 200.0));
        let mut slide = SlideIn::new()
            .from(Direction::Left)
            .distance("100%".parse().unwrap())
            .target(el);

        slide.mount(&mut surface);
        assert_eq!(
            slide.render().inline_style().get("transform"),
            Some("translateX(-100%)")
        );

        surface.intersect(el, 0.6);
        let mut changed = false;
        for event in surface.drain_events() {
            changed |= slide.handle_event(&event, &mut surface);
        }
        assert!(changed);
        assert_eq!(
            slide.render().inline_style().get("transform"),
            Some("translate(0)")
        );
        assert_eq!(surface.live_observers(), 0);
    }

    #[test]
    fn test_unknown_direction_is_identity() {
        let slide = SlideIn::new().from(Direction::parse_lenient("diagonal"));
        assert!(slide.render().inline_style().get("transform").is_none());
    }

    #[test]
    fn test_fade_toggle() {
        let with_fade = SlideIn::new().render();
        assert_eq!(with_fade.classes().to_string(), "opacity-0");

        let without = SlideIn::new().fade(false).render();
        assert!(without.classes().is_empty());
    }
}

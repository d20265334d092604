//! FadeIn
//!
//! Opacity fade, optionally travelling a short distance in `direction`
//! (`Up` rises into place from below). Without a direction the element fades
//! in place with no transform.

use unveil_core::{Length, Style};

use crate::config::MotionDefaults;
use crate::direction::{translate_along, Direction};
use crate::motion::{delegate_motion_builders, delegate_motion_component, Motion};

/// Revealed transform for every directional wrapper
pub(crate) const IDENTITY_TRANSLATE: &str = "translate(0)";

/// Initial transform for a fade travelling in `direction`
pub fn fade_transform(direction: Option<Direction>, distance: Length) -> Option<String> {
    let direction = direction?;
    // Travel up means start below: the offset is opposite to the direction sign
    let offset = if direction.sign() < 0.0 {
        distance
    } else {
        distance.negate()
    };
    Some(translate_along(direction.axis(), offset))
}

pub struct FadeIn {
    motion: Motion,
    direction: Option<Direction>,
    distance: Length,
}

impl Default for FadeIn {
    fn default() -> Self {
        Self::new()
    }
}

impl FadeIn {
    pub fn new() -> Self {
        Self::with_defaults(&MotionDefaults::default())
    }

    pub fn with_defaults(defaults: &MotionDefaults) -> Self {
        Self {
            motion: Motion::with_defaults(defaults)
                .initial("opacity-0")
                .animate("opacity-100"),
            direction: None,
            distance: defaults.fade_distance,
        }
        .apply()
    }

    /// Direction of travel (`None` fades in place)
    pub fn direction(mut self, direction: impl Into<Option<Direction>>) -> Self {
        self.direction = direction.into();
        self.apply()
    }

    pub fn distance(mut self, distance: Length) -> Self {
        self.distance = distance;
        self.apply()
    }

    pub fn initial_transform(&self) -> Option<String> {
        fade_transform(self.direction, self.distance)
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
        self
    }

    delegate_motion_builders!(motion);
}

delegate_motion_component!(FadeIn, motion);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use unveil_core::{RecordingSurface, Rect, Size, Surface};

    #[test]
    fn test_fade_transforms() {
        let d = Length::Px(20.0);
        assert_eq!(fade_transform(Some(Direction::Up), d).as_deref(), Some("translateY(20px)"));
        assert_eq!(fade_transform(Some(Direction::Down), d).as_deref(), Some("translateY(-20px)"));
        assert_eq!(fade_transform(Some(Direction::Left), d).as_deref(), Some("translateX(20px)"));
        assert_eq!(fade_transform(Some(Direction::Right), d).as_deref(), Some("translateX(-20px)"));
        assert_eq!(fade_transform(None, d), None);
    }

    #[test]
    fn test_no_direction_is_pure_opacity_fade() {
        let fade = FadeIn::new();
        let rendered = fade.render();
        assert!(rendered.inline_style().get("transform").is_none());
        assert_eq!(rendered.classes().to_string(), "opacity-0");

        let shown = FadeIn::new().visible(true).render();
        assert!(shown.inline_style().get("transform").is_none());
        assert_eq!(shown.classes().to_string(), "opacity-100");
    }

    #[test]
    fn test_direction_after_distance_order_independent() {
        let a = FadeIn::new().distance(Length::Rem(2.0)).direction(Direction::Up);
        let b = FadeIn::new().direction(Direction::Up).distance(Length::Rem(2.0));
        assert_eq!(a.initial_transform(), b.initial_transform());
        assert_eq!(a.initial_transform().as_deref(), Some("translateY(2rem)"));
    }

    #[test]
    fn test_fade_reveals_to_identity() {
        let mut surface = RecordingSurface::new(Size::new(800.0, 600.0));
        let el = surface.insert_element(Rect::new(0.0, 900.0, 100.0, 100.0));
        let mut fade = FadeIn::new().direction(Direction::Up).target(el);
        fade.mount(&mut surface);
        assert_eq!(
            fade.render().inline_style().get("transform"),
            Some("translateY(20px)")
        );

        surface.intersect(el, 1.0);
        for event in surface.drain_events() {
            fade.handle_event(&event, &mut surface);
        }
        let rendered = fade.render();
        assert_eq!(rendered.inline_style().get("transform"), Some("translate(0)"));
        assert_eq!(rendered.classes().to_string(), "opacity-100");
    }
}

//! Component lifecycle
//!
//! Every motion component acquires its external resources in
//! [`Component::mount`] and releases them in [`Component::unmount`]. Handles are
//! held as `Option`s and released with `take()`, so a resource is released
//! exactly once no matter how many times unmount runs.

use unveil_core::{Element, ElementId, Surface, SurfaceEvent};

/// Attribute carrying the element ref in rendered markup
pub const REF_ATTRIBUTE: &str = "data-unveil-ref";

pub trait Component {
    /// Acquire observers, animations and listeners. Mounting twice is a no-op.
    fn mount(&mut self, surface: &mut dyn Surface);

    /// Release everything acquired in `mount`. Unmounting twice is a no-op.
    fn unmount(&mut self, surface: &mut dyn Surface);

    /// Handle a surface callback
    ///
    /// Events for handles this component does not own are ignored. Returns
    /// `true` when the rendered output changed.
    fn handle_event(&mut self, event: &SurfaceEvent, surface: &mut dyn Surface) -> bool;

    fn render(&self) -> Element;
}

/// Components with a start delay that [`Stagger`](crate::Stagger) can drive
pub trait Delayed {
    fn delay_ms(&self) -> u32;
    fn set_delay_ms(&mut self, delay_ms: u32);
}

/// A component that can be staggered
pub trait AnimatedComponent: Component + Delayed {}

impl<T: Component + Delayed> AnimatedComponent for T {}

impl<T: Component + ?Sized> Component for Box<T> {
    fn mount(&mut self, surface: &mut dyn Surface) {
        (**self).mount(surface)
    }

    fn unmount(&mut self, surface: &mut dyn Surface) {
        (**self).unmount(surface)
    }

    fn handle_event(&mut self, event: &SurfaceEvent, surface: &mut dyn Surface) -> bool {
        (**self).handle_event(event, surface)
    }

    fn render(&self) -> Element {
        (**self).render()
    }
}

impl<T: Delayed + ?Sized> Delayed for Box<T> {
    fn delay_ms(&self) -> u32 {
        (**self).delay_ms()
    }

    fn set_delay_ms(&mut self, delay_ms: u32) {
        (**self).set_delay_ms(delay_ms)
    }
}

/// Tag an element with its surface ref so a backend can find it
pub(crate) fn with_ref(element: Element, target: Option<ElementId>) -> Element {
    match target {
        Some(id) => element.attr(REF_ATTRIBUTE, id.to_raw().to_string()),
        None => element,
    }
}

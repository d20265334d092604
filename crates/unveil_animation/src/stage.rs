//! Stage
//!
//! Hosts a set of components on one surface: mounts them, routes drained
//! surface events to every component, and tears everything down on drop.

use slotmap::{new_key_type, SlotMap};
use tracing::{debug, trace};
use unveil_core::{Element, Surface};

use crate::component::Component;

new_key_type! {
    /// Handle to a component on a [`Stage`]
    pub struct ComponentId;
}

pub struct Stage<S: Surface> {
    surface: S,
    components: SlotMap<ComponentId, Box<dyn Component>>,
    /// Render order
    order: Vec<ComponentId>,
    mounted: bool,
}

impl<S: Surface> Stage<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            components: SlotMap::with_key(),
            order: Vec::new(),
            mounted: false,
        }
    }

    /// Add a component, mounting it immediately if the stage is mounted
    pub fn add(&mut self, component: impl Component + 'static) -> ComponentId {
        let mut component: Box<dyn Component> = Box::new(component);
        if self.mounted {
            component.mount(&mut self.surface);
        }
        let id = self.components.insert(component);
        self.order.push(id);
        id
    }

    /// Unmount and drop a component
    pub fn remove(&mut self, id: ComponentId) -> bool {
        let Some(mut component) = self.components.remove(id) else {
            return false;
        };
        component.unmount(&mut self.surface);
        self.order.retain(|other| *other != id);
        true
    }

    pub fn get(&self, id: ComponentId) -> Option<&dyn Component> {
        self.components.get(id).map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Mount every component
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        debug!("Stage: mounting {} components", self.components.len());
        self.mounted = true;
        for &id in &self.order {
            if let Some(component) = self.components.get_mut(id) {
                component.mount(&mut self.surface);
            }
        }
    }

    /// Drain surface events and route them to every component
    ///
    /// Events raised while handling (such as frame requests) are processed in
    /// the next pump. Returns the number of events routed.
    pub fn pump(&mut self) -> usize {
        let events = self.surface.drain_events();
        for event in &events {
            for &id in &self.order {
                if let Some(component) = self.components.get_mut(id) {
                    component.handle_event(event, &mut self.surface);
                }
            }
        }
        trace!("Stage: routed {} events", events.len());
        events.len()
    }

    pub fn render(&self) -> Vec<Element> {
        self.order
            .iter()
            .filter_map(|&id| self.components.get(id))
            .map(|component| component.render())
            .collect()
    }

    pub fn render_html(&self) -> String {
        self.render()
            .iter()
            .map(Element::to_html)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Unmount every component, releasing all surface resources
    pub fn teardown(&mut self) {
        if !self.mounted {
            return;
        }
        debug!("Stage: tearing down {} components", self.components.len());
        self.mounted = false;
        for &id in self.order.iter().rev() {
            if let Some(component) = self.components.get_mut(id) {
                component.unmount(&mut self.surface);
            }
        }
    }

    /// Tear down and hand back the surface
    pub fn into_surface(mut self) -> S
    where
        S: Default,
    {
        self.teardown();
        std::mem::take(&mut self.surface)
    }
}

impl<S: Surface> Drop for Stage<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Direction;
    use crate::fade::FadeIn;
    use crate::float::Float;
    use crate::parallax::Parallax;
    use crate::reveal::{Reveal, RevealEffect};
    use unveil_core::{RecordingSurface, Rect, Size};

    fn surface() -> RecordingSurface {
        RecordingSurface::new(Size::new(1000.0, 800.0))
    }

    #[test]
    fn test_mount_pump_teardown() {
        let mut surface = surface();
        let a = surface.insert_element(Rect::new(0.0, 900.0, 100.0, 100.0));
        let b = surface.insert_element(Rect::new(0.0, 1200.0, 100.0, 100.0));
        let c = surface.insert_element(Rect::new(0.0, 1500.0, 100.0, 100.0));
        let d = surface.insert_element(Rect::new(0.0, 1800.0, 100.0, 100.0));

        let mut stage = Stage::new(surface);
        stage.add(FadeIn::new().direction(Direction::Up).target(a));
        stage.add(Reveal::new().effect(RevealEffect::Fade).target(b));
        stage.add(Float::new().target(c));
        stage.add(Parallax::new().target(d));
        stage.mount();

        assert_eq!(stage.surface().live_observers(), 2);
        assert_eq!(stage.surface().live_animations(), 1);
        assert_eq!(stage.surface().live_listeners(), 1);

        stage.surface_mut().intersect_all();
        stage.surface_mut().scroll_to(0.0, 300.0);
        assert_eq!(stage.pump(), 3);
        assert_eq!(stage.surface().live_observers(), 0);
        assert_eq!(stage.surface().pending_frames(), 1);

        stage.surface_mut().advance_frame(16.0);
        assert_eq!(stage.pump(), 1);

        let html = stage.render_html();
        assert!(html.contains("opacity-100"));
        assert!(html.contains(r#"data-state="revealed""#));

        stage.teardown();
        let surface = stage.surface();
        assert_eq!(surface.live_observers(), 0);
        assert_eq!(surface.live_animations(), 0);
        assert_eq!(surface.live_listeners(), 0);
        assert_eq!(surface.pending_frames(), 0);
    }

    #[test]
    fn test_add_after_mount_mounts_component() {
        let mut surface = surface();
        let el = surface.insert_element(Rect::default());
        let mut stage = Stage::new(surface);
        stage.mount();
        let id = stage.add(Float::new().target(el));
        assert_eq!(stage.surface().live_animations(), 1);

        assert!(stage.remove(id));
        assert!(!stage.remove(id));
        assert_eq!(stage.surface().live_animations(), 0);
        assert!(stage.is_empty());
    }

    #[test]
    fn test_into_surface_releases_everything() {
        let mut surface = surface();
        let el = surface.insert_element(Rect::default());
        let mut stage = Stage::new(surface);
        stage.add(Parallax::new().target(el));
        stage.add(Float::new().target(el));
        stage.mount();

        let surface = stage.into_surface();
        assert_eq!(surface.live_listeners(), 0);
        assert_eq!(surface.live_animations(), 0);
    }
}

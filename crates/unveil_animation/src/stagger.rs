//! Stagger
//!
//! Offsets the start delay of each animated child so a group animates in
//! sequence. Static children pass through untouched and do not count toward
//! the sequence.
//!
//! ```rust
//! use unveil_animation::prelude::*;
//!
//! let stagger = Stagger::new(StaggerConfig::new(100).initial_delay(50))
//!     .child(FadeIn::new())
//!     .child(FadeIn::new())
//!     .child(FadeIn::new());
//!
//! assert_eq!(stagger.child_delays(), vec![50, 150, 250]);
//! ```

use tracing::trace;
use unveil_core::{ClassFragment, ClassList, Element, Node, Surface, SurfaceEvent};

use crate::component::{AnimatedComponent, Component, Delayed};

/// Order in which children start
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StaggerDirection {
    /// First to last
    #[default]
    Forward,
    /// Last to first
    Reverse,
    /// From the center outward
    FromCenter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaggerConfig {
    /// Delay between consecutive children (ms)
    pub stagger_delay_ms: u32,
    /// Delay before the first child (ms)
    pub initial_delay_ms: u32,
    pub direction: StaggerDirection,
    /// Cap the sequence position, so children past `limit` share its delay
    pub limit: Option<usize>,
}

impl Default for StaggerConfig {
    fn default() -> Self {
        Self::new(100)
    }
}

impl StaggerConfig {
    pub fn new(stagger_delay_ms: u32) -> Self {
        Self {
            stagger_delay_ms,
            initial_delay_ms: 0,
            direction: StaggerDirection::Forward,
            limit: None,
        }
    }

    pub fn initial_delay(mut self, ms: u32) -> Self {
        self.initial_delay_ms = ms;
        self
    }

    pub fn reverse(mut self) -> Self {
        self.direction = StaggerDirection::Reverse;
        self
    }

    pub fn from_center(mut self) -> Self {
        self.direction = StaggerDirection::FromCenter;
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Delay added to the child at `index` of `total` animated children
    pub fn delay_for_index(&self, index: usize, total: usize) -> u32 {
        let effective_index = match self.direction {
            StaggerDirection::Forward => index,
            StaggerDirection::Reverse => total.saturating_sub(1).saturating_sub(index),
            StaggerDirection::FromCenter => {
                let center = total / 2;
                center.abs_diff(index)
            }
        };

        let capped_index = match self.limit {
            Some(limit) => effective_index.min(limit),
            None => effective_index,
        };

        self.initial_delay_ms
            .saturating_add(self.stagger_delay_ms.saturating_mul(capped_index as u32))
    }
}

/// Added delays for `count` animated children
pub fn stagger_delays(count: usize, config: &StaggerConfig) -> Vec<u32> {
    (0..count)
        .map(|index| config.delay_for_index(index, count))
        .collect()
}

pub enum StaggerChild {
    Animated {
        component: Box<dyn AnimatedComponent>,
        /// The child's own delay before staggering
        base_delay_ms: u32,
    },
    Static(Node),
}

impl StaggerChild {
    pub fn animated(component: impl AnimatedComponent + 'static) -> Self {
        let base_delay_ms = component.delay_ms();
        StaggerChild::Animated {
            component: Box::new(component),
            base_delay_ms,
        }
    }
}

impl<T: AnimatedComponent + 'static> From<T> for StaggerChild {
    fn from(component: T) -> Self {
        StaggerChild::animated(component)
    }
}

pub struct Stagger {
    config: StaggerConfig,
    children: Vec<StaggerChild>,
    tag: String,
    class_name: ClassList,
}

impl Default for Stagger {
    fn default() -> Self {
        Self::new(StaggerConfig::default())
    }
}

impl Stagger {
    pub fn new(config: StaggerConfig) -> Self {
        Self {
            config,
            children: Vec::new(),
            tag: "div".to_string(),
            class_name: ClassList::new(),
        }
    }

    /// Add an animated child
    pub fn child(mut self, child: impl Into<StaggerChild>) -> Self {
        self.children.push(child.into());
        self.apply();
        self
    }

    /// Add a child rendered as is
    pub fn static_child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(StaggerChild::Static(node.into()));
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

    pub fn set_config(&mut self, config: StaggerConfig) {
        self.config = config;
        self.apply();
    }

    pub fn config(&self) -> &StaggerConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of children that take part in the sequence
    pub fn animated_count(&self) -> usize {
        self.children
            .iter()
            .filter(|child| matches!(child, StaggerChild::Animated { .. }))
            .count()
    }

    /// Effective delay of every animated child, in order
    pub fn child_delays(&self) -> Vec<u32> {
        self.children
            .iter()
            .filter_map(|child| match child {
                StaggerChild::Animated { component, .. } => Some(component.delay_ms()),
                StaggerChild::Static(_) => None,
            })
            .collect()
    }

    /// Recompute every animated child's delay from its base delay
    fn apply(&mut self) {
        let delays = stagger_delays(self.animated_count(), &self.config);
        let animated = self.children.iter_mut().filter_map(|child| match child {
            StaggerChild::Animated {
                component,
                base_delay_ms,
            } => Some((component, *base_delay_ms)),
            StaggerChild::Static(_) => None,
        });
        for ((component, base), offset) in animated.zip(delays) {
            component.set_delay_ms(base.saturating_add(offset));
        }
        trace!("Stagger: applied delays to {} children", self.animated_count());
    }

    fn animated_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn AnimatedComponent>> {
        self.children.iter_mut().filter_map(|child| match child {
            StaggerChild::Animated { component, .. } => Some(component),
            StaggerChild::Static(_) => None,
        })
    }
}

impl Component for Stagger {
    fn mount(&mut self, surface: &mut dyn Surface) {
        for component in self.animated_mut() {
            component.mount(surface);
        }
    }

    fn unmount(&mut self, surface: &mut dyn Surface) {
        for component in self.animated_mut() {
            component.unmount(surface);
        }
    }

    fn handle_event(&mut self, event: &SurfaceEvent, surface: &mut dyn Surface) -> bool {
        let mut changed = false;
        for component in self.animated_mut() {
            changed |= component.handle_event(event, surface);
        }
        changed
    }

    fn render(&self) -> Element {
        let children = self.children.iter().map(|child| match child {
            StaggerChild::Animated { component, .. } => Node::Element(component.render()),
            StaggerChild::Static(node) => node.clone(),
        });
        Element::new(self.tag.as_str())
            .class(&self.class_name)
            .children(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fade::FadeIn;
    use crate::float::Float;
    use crate::motion::Motion;
    use crate::reveal::Reveal;
    use unveil_core::{RecordingSurface, Rect, Size};

    #[test]
    fn test_normal_order_delays() {
        let config = StaggerConfig::new(100).initial_delay(50);
        assert_eq!(stagger_delays(4, &config), vec![50, 150, 250, 350]);
    }

    #[test]
    fn test_reverse_order_delays() {
        let config = StaggerConfig::new(100).initial_delay(50).reverse();
        assert_eq!(stagger_delays(4, &config), vec![350, 250, 150, 50]);
    }

    #[test]
    fn test_from_center_and_limit() {
        let config = StaggerConfig::new(10).from_center();
        assert_eq!(stagger_delays(5, &config), vec![20, 10, 0, 10, 20]);

        let config = StaggerConfig::new(10).limit(2);
        assert_eq!(stagger_delays(5, &config), vec![0, 10, 20, 20, 20]);
    }

    #[test]
    fn test_empty_renders_empty_container() {
        let stagger = Stagger::default().class_name("grid");
        assert!(stagger.is_empty());
        assert_eq!(stagger.render().to_html(), r#"<div class="grid"></div>"#);
    }

    #[test]
    fn test_static_children_pass_through_and_do_not_count() {
        let stagger = Stagger::new(StaggerConfig::new(100).initial_delay(50))
            .child(Motion::new())
            .static_child("divider")
            .child(Motion::new());

        assert_eq!(stagger.animated_count(), 2);
        assert_eq!(stagger.child_delays(), vec![50, 150]);

        let rendered = stagger.render();
        assert_eq!(rendered.child_nodes().len(), 3);
        assert_eq!(rendered.child_nodes()[1], Node::Text("divider".to_string()));
    }

    #[test]
    fn test_delays_sum_with_own_delay_and_are_idempotent() {
        let mut stagger = Stagger::new(StaggerConfig::new(100))
            .child(FadeIn::new().delay(200))
            .child(FadeIn::new());
        assert_eq!(stagger.child_delays(), vec![200, 100]);

        stagger.set_config(StaggerConfig::new(100));
        assert_eq!(stagger.child_delays(), vec![200, 100]);

        stagger.set_config(StaggerConfig::new(100).reverse());
        assert_eq!(stagger.child_delays(), vec![300, 0]);
    }

    #[test]
    fn test_mixed_components_mount_and_reveal() {
        let mut surface = RecordingSurface::new(Size::new(1000.0, 800.0));
        let a = surface.insert_element(Rect::new(0.0, 1000.0, 100.0, 100.0));
        let b = surface.insert_element(Rect::new(0.0, 1200.0, 100.0, 100.0));

        let mut stagger = Stagger::new(StaggerConfig::new(80))
            .child(FadeIn::new().target(a))
            .child(Reveal::new().target(b));
        stagger.mount(&mut surface);
        assert_eq!(surface.live_observers(), 2);

        surface.intersect_all();
        let mut changed = false;
        for event in surface.drain_events() {
            changed |= stagger.handle_event(&event, &mut surface);
        }
        assert!(changed);
        assert_eq!(surface.live_observers(), 0);

        let html = stagger.render().to_html();
        assert!(html.contains("transition-delay: 80ms"));

        stagger.unmount(&mut surface);
        assert_eq!(surface.live_observers(), 0);
    }

    #[test]
    fn test_saturated_delays_mount_randomized_floats() {
        let mut surface = RecordingSurface::new(Size::new(1000.0, 800.0));
        let a = surface.insert_element(Rect::new(0.0, 0.0, 100.0, 100.0));
        let b = surface.insert_element(Rect::new(0.0, 200.0, 100.0, 100.0));

        let half = u32::MAX / 2;
        let mut stagger = Stagger::new(StaggerConfig::new(half).initial_delay(half))
            .child(Float::new().randomize(true).target(a))
            .child(Float::new().randomize(true).target(b));
        assert_eq!(stagger.child_delays(), vec![half, u32::MAX - 1]);

        stagger.mount(&mut surface);
        assert_eq!(surface.live_animations(), 2);
        stagger.unmount(&mut surface);
        assert_eq!(surface.live_animations(), 0);
    }

    #[test]
    fn test_boxed_child_keeps_delay() {
        let child = StaggerChild::animated(Motion::new().delay(30));
        match child {
            StaggerChild::Animated {
                component,
                base_delay_ms,
            } => {
                assert_eq!(base_delay_ms, 30);
                assert_eq!(component.delay_ms(), 30);
            }
            StaggerChild::Static(_) => panic!("expected animated child"),
        }
    }
}

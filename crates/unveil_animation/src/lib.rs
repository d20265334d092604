//! Unveil Animation
//!
//! Viewport-triggered motion components built on the `unveil_core` surface.
//!
//! # Features
//!
//! - **Viewport Observer**: threshold, root margin and one-shot visibility tracking
//! - **Motion**: class and inline-style swap when an element comes into view
//! - **FadeIn / SlideIn**: directional entrance wrappers over Motion
//! - **Float**: infinite, seeded-jitter bobbing via surface keyframe animations
//! - **Parallax**: scroll-linked offsets, coalesced to one update per frame
//! - **Reveal**: one-shot slide, fade, clip or blur reveal
//! - **Stagger**: sequenced start delays across animated children
//! - **Stage**: mounts components on a surface and routes its events
//! - **MotionDefaults**: project-wide defaults loadable from TOML

pub mod component;
pub mod config;
pub mod direction;
pub mod fade;
pub mod float;
pub mod motion;
pub mod observer;
pub mod parallax;
pub mod reveal;
pub mod slide;
pub mod stage;
pub mod stagger;

pub use component::{AnimatedComponent, Component, Delayed, REF_ATTRIBUTE};
pub use config::{ConfigError, FloatDefaults, MotionDefaults, ParallaxDefaults};
pub use direction::{Axis, Direction, ParseDirectionError};
pub use fade::{fade_transform, FadeIn};
pub use float::{float_keyframes, Float, FloatOptions, FloatParams};
pub use motion::Motion;
pub use observer::{ObserverOptions, ViewportObserver};
pub use parallax::{parallax_offset, parallax_transform, Parallax};
pub use reveal::{Reveal, RevealEffect, RevealState};
pub use slide::{slide_transform, SlideIn};
pub use stage::{ComponentId, Stage};
pub use stagger::{stagger_delays, Stagger, StaggerChild, StaggerConfig, StaggerDirection};

/// Everything needed to build and host components
pub mod prelude {
    pub use crate::component::{Component, Delayed};
    pub use crate::config::MotionDefaults;
    pub use crate::direction::Direction;
    pub use crate::fade::FadeIn;
    pub use crate::float::Float;
    pub use crate::motion::Motion;
    pub use crate::parallax::Parallax;
    pub use crate::reveal::{Reveal, RevealEffect};
    pub use crate::slide::SlideIn;
    pub use crate::stage::Stage;
    pub use crate::stagger::{Stagger, StaggerConfig};

    pub use unveil_core::{
        cn, Easing, Element, Length, RecordingSurface, Rect, RootMargin, Size, Style, Surface,
    };
}

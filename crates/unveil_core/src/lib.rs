//! Unveil Core
//!
//! This crate provides the foundational primitives for the Unveil motion components:
//!
//! - **Class Composition**: `cn!` / [`cn`] merge conditional class-name fragments
//! - **Inline Styles**: ordered CSS property maps and length values
//! - **Markup**: [`Element`] / [`Node`] trees with HTML emission
//! - **Surface**: the capability boundary for intersection observation, animations,
//!   scroll listeners and style writes, plus a [`RecordingSurface`] test backend
//! - **Theme**: an explicit, injectable [`ThemeProvider`] context
//!
//! # Example
//!
//! ```rust
//! use unveil_core::{cn, Element};
//!
//! let active = true;
//! let classes = cn!("card", active.then_some("card-active"), None::<&str>);
//! assert_eq!(classes, "card card-active");
//!
//! let el = Element::new("div").class(classes.as_str()).text("Hello");
//! assert_eq!(el.to_html(), r#"<div class="card card-active">Hello</div>"#);
//! ```

pub mod class;
pub mod easing;
pub mod element;
pub mod error;
pub mod length;
pub mod recording;
pub mod style;
pub mod surface;
pub mod theme;

pub use class::{cn, ClassFragment, ClassList};
pub use easing::Easing;
pub use element::{Element, Node};
pub use error::{Result, SurfaceError, ThemeError};
pub use length::{Length, RootMargin};
pub use recording::{RecordingSurface, SurfaceCommand};
pub use style::Style;
pub use surface::{
    AnimationId, AnimationTiming, ElementId, FillMode, FrameId, IntersectionEntry,
    IntersectionOptions, Iterations, Keyframe, ListenerId, ObserverId, PlaybackDirection, Rect,
    Size, Surface, SurfaceEvent,
};
pub use theme::{
    MemoryThemeStorage, ResolvedTheme, SubscriptionId, SystemPreferences, ThemeContext,
    ThemeMode, ThemeProvider, ThemeStorage,
};

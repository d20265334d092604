//! Component manifests
//!
//! A manifest lists components to build on a recording surface:
//!
//! ```toml
//! theme = "dark"
//!
//! [viewport]
//! width = 1280
//! height = 720
//!
//! [[component]]
//! kind = "fade-in"
//! direction = "up"
//! y = 900
//! text = "Hello"
//!
//! [[component]]
//! kind = "stagger"
//! stagger_ms = 100
//! initial_delay_ms = 50
//!
//! [[component.children]]
//! kind = "reveal"
//! effect = "clip"
//! direction = "left"
//! text = "First"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use unveil_animation::{
    AnimatedComponent, Component, Direction, FadeIn, Float, Motion, MotionDefaults, Parallax,
    Reveal, RevealEffect, SlideIn, Stagger, StaggerConfig,
};
use unveil_core::{Length, Rect, RecordingSurface, Size, ThemeMode};

/// Element size when a component does not give one
const DEFAULT_WIDTH: f32 = 400.0;
const DEFAULT_HEIGHT: f32 = 200.0;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub viewport: ViewportSpec,
    #[serde(default)]
    pub theme: Option<ThemeMode>,
    #[serde(default, rename = "component")]
    pub components: Vec<ComponentSpec>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewportSpec {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportSpec {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl From<ViewportSpec> for Size {
    fn from(spec: ViewportSpec) -> Self {
        Size::new(spec.width, spec.height)
    }
}

/// Fields every component accepts
///
/// Unknown keys are rejected by the enclosing [`ComponentSpec`] variant.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CommonSpec {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub duration_ms: Option<u32>,
    pub delay_ms: Option<u32>,
    pub class_name: Option<String>,
    pub tag: Option<String>,
    pub text: Option<String>,
}

impl CommonSpec {
    fn rect(&self) -> Rect {
        Rect::new(
            self.x,
            self.y,
            self.width.unwrap_or(DEFAULT_WIDTH),
            self.height.unwrap_or(DEFAULT_HEIGHT),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case", deny_unknown_fields)]
pub enum ComponentSpec {
    Motion {
        #[serde(flatten)]
        common: CommonSpec,
        #[serde(default)]
        initial: String,
        #[serde(default)]
        animate: String,
    },
    FadeIn {
        #[serde(flatten)]
        common: CommonSpec,
        direction: Option<String>,
        distance: Option<Length>,
    },
    SlideIn {
        #[serde(flatten)]
        common: CommonSpec,
        from: Option<String>,
        distance: Option<Length>,
        fade: Option<bool>,
    },
    Reveal {
        #[serde(flatten)]
        common: CommonSpec,
        #[serde(default = "default_effect")]
        effect: String,
        direction: Option<String>,
        blur: Option<Length>,
    },
    Float {
        #[serde(flatten)]
        common: CommonSpec,
        amplitude_px: Option<f32>,
        randomize: Option<bool>,
        seed: Option<u64>,
    },
    Parallax {
        #[serde(flatten)]
        common: CommonSpec,
        speed: Option<f32>,
        direction: Option<String>,
        coalesce: Option<bool>,
    },
    Stagger {
        #[serde(default)]
        stagger_ms: Option<u32>,
        #[serde(default)]
        initial_delay_ms: u32,
        #[serde(default)]
        reverse: bool,
        class_name: Option<String>,
        #[serde(default)]
        children: Vec<ComponentSpec>,
    },
}

fn default_effect() -> String {
    "slide".to_string()
}

impl ComponentSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            ComponentSpec::Motion { .. } => "motion",
            ComponentSpec::FadeIn { .. } => "fade-in",
            ComponentSpec::SlideIn { .. } => "slide-in",
            ComponentSpec::Reveal { .. } => "reveal",
            ComponentSpec::Float { .. } => "float",
            ComponentSpec::Parallax { .. } => "parallax",
            ComponentSpec::Stagger { .. } => "stagger",
        }
    }
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Apply the common fields to any builder with duration, delay, class, tag and child setters
macro_rules! apply_wrapper_common {
    ($component:expr, $common:expr) => {{
        let mut component = $component;
        let common: &CommonSpec = $common;
        if let Some(duration) = common.duration_ms {
            component = component.duration(duration);
        }
        if let Some(delay) = common.delay_ms {
            component = component.delay(delay);
        }
        if let Some(class_name) = &common.class_name {
            component = component.class_name(class_name);
        }
        if let Some(tag) = &common.tag {
            component = component.tag(tag.as_str());
        }
        if let Some(text) = &common.text {
            component = component.child(text.as_str());
        }
        component
    }};
}

/// Builds components from specs, placing each on the surface
pub struct Builder<'a> {
    surface: &'a mut RecordingSurface,
    defaults: &'a MotionDefaults,
}

impl<'a> Builder<'a> {
    pub fn new(surface: &'a mut RecordingSurface, defaults: &'a MotionDefaults) -> Self {
        Self { surface, defaults }
    }

    pub fn build(&mut self, spec: &ComponentSpec) -> Result<Box<dyn Component>> {
        match spec {
            ComponentSpec::Parallax {
                common,
                speed,
                direction,
                coalesce,
            } => {
                let element = self.surface.insert_element(common.rect());
                let mut parallax = Parallax::with_defaults(self.defaults).target(element);
                if let Some(speed) = speed {
                    parallax = parallax.speed(*speed);
                }
                if let Some(direction) = direction.as_deref().and_then(Direction::parse_lenient) {
                    parallax = parallax.direction(direction);
                }
                if let Some(coalesce) = coalesce {
                    parallax = parallax.coalesce(*coalesce);
                }
                if let Some(class_name) = &common.class_name {
                    parallax = parallax.class_name(class_name);
                }
                if let Some(tag) = &common.tag {
                    parallax = parallax.tag(tag.as_str());
                }
                if let Some(text) = &common.text {
                    parallax = parallax.child(text.as_str());
                }
                Ok(Box::new(parallax))
            }
            ComponentSpec::Stagger {
                stagger_ms,
                initial_delay_ms,
                reverse,
                class_name,
                children,
            } => {
                let mut config = StaggerConfig::new(stagger_ms.unwrap_or(100))
                    .initial_delay(*initial_delay_ms);
                if *reverse {
                    config = config.reverse();
                }
                let mut stagger = Stagger::new(config);
                if let Some(class_name) = class_name {
                    stagger = stagger.class_name(class_name);
                }
                for child in children {
                    stagger = stagger.child(self.build_animated(child)?);
                }
                Ok(Box::new(stagger))
            }
            other => Ok(Box::new(self.build_animated(other)?)),
        }
    }

    /// Build a component that accepts a start delay
    pub fn build_animated(&mut self, spec: &ComponentSpec) -> Result<Box<dyn AnimatedComponent>> {
        let defaults = self.defaults;
        let component: Box<dyn AnimatedComponent> = match spec {
            ComponentSpec::Motion {
                common,
                initial,
                animate,
            } => {
                let element = self.surface.insert_element(common.rect());
                let motion = Motion::with_defaults(defaults)
                    .initial(initial.as_str())
                    .animate(animate.as_str())
                    .target(element);
                Box::new(apply_wrapper_common!(motion, common))
            }
            ComponentSpec::FadeIn {
                common,
                direction,
                distance,
            } => {
                let element = self.surface.insert_element(common.rect());
                let mut fade = FadeIn::with_defaults(defaults)
                    .direction(direction.as_deref().and_then(Direction::parse_lenient))
                    .target(element);
                if let Some(distance) = distance {
                    fade = fade.distance(*distance);
                }
                Box::new(apply_wrapper_common!(fade, common))
            }
            ComponentSpec::SlideIn {
                common,
                from,
                distance,
                fade,
            } => {
                let element = self.surface.insert_element(common.rect());
                let mut slide = SlideIn::with_defaults(defaults).target(element);
                if let Some(from) = from {
                    slide = slide.from(Direction::parse_lenient(from));
                }
                if let Some(distance) = distance {
                    slide = slide.distance(*distance);
                }
                if let Some(fade) = fade {
                    slide = slide.fade(*fade);
                }
                Box::new(apply_wrapper_common!(slide, common))
            }
            ComponentSpec::Reveal {
                common,
                effect,
                direction,
                blur,
            } => {
                let element = self.surface.insert_element(common.rect());
                let direction = direction.as_deref().and_then(Direction::parse_lenient);
                let effect = match (RevealEffect::from_name(effect, direction), blur) {
                    (RevealEffect::Blur { .. }, Some(radius)) => RevealEffect::Blur { radius: *radius },
                    (effect, _) => effect,
                };
                let reveal = Reveal::with_defaults(defaults).effect(effect).target(element);
                Box::new(apply_wrapper_common!(reveal, common))
            }
            ComponentSpec::Float {
                common,
                amplitude_px,
                randomize,
                seed,
            } => {
                let element = self.surface.insert_element(common.rect());
                let mut float = Float::with_defaults(defaults).target(element);
                if let Some(amplitude) = amplitude_px {
                    float = float.amplitude(*amplitude);
                }
                if let Some(randomize) = randomize {
                    float = float.randomize(*randomize);
                }
                if let Some(seed) = seed {
                    float = float.seed(*seed);
                }
                Box::new(apply_wrapper_common!(float, common))
            }
            ComponentSpec::Parallax { .. } | ComponentSpec::Stagger { .. } => {
                bail!("{} cannot be staggered", spec.kind())
            }
        };
        Ok(component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
        theme = "dark"

        [viewport]
        width = 1000
        height = 800

        [[component]]
        kind = "fade-in"
        direction = "up"
        y = 900
        text = "Hello"

        [[component]]
        kind = "parallax"
        speed = 0.25

        [[component]]
        kind = "stagger"
        stagger_ms = 100
        initial_delay_ms = 50

        [[component.children]]
        kind = "reveal"
        effect = "blur"
        blur = "4px"

        [[component.children]]
        kind = "motion"
        initial = "opacity-0"
        animate = "opacity-100"
    "#;

    #[test]
    fn test_parse_manifest() {
        let manifest = Manifest::from_toml_str(MANIFEST).unwrap();
        assert_eq!(manifest.theme, Some(ThemeMode::Dark));
        assert_eq!(manifest.viewport.width, 1000.0);
        assert_eq!(manifest.components.len(), 3);
        assert_eq!(manifest.components[0].kind(), "fade-in");
        match &manifest.components[2] {
            ComponentSpec::Stagger { children, .. } => assert_eq!(children.len(), 2),
            other => panic!("expected stagger, got {}", other.kind()),
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = Manifest::from_toml_str("[[component]]\nkind = \"spin\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn test_misspelled_fields_are_rejected() {
        let err = Manifest::from_toml_str("[[component]]\nkind = \"fade-in\"\ndirecton = \"up\"\n")
            .err()
            .map(|e| e.to_string());
        assert!(err.is_some_and(|e| e.contains("directon")));

        let nested = r#"
            [[component]]
            kind = "stagger"
            [[component.children]]
            kind = "reveal"
            efect = "fade"
        "#;
        assert!(Manifest::from_toml_str(nested).is_err());

        assert!(Manifest::from_toml_str("[viewport]\nwidht = 800\n").is_err());
        assert!(Manifest::from_toml_str("thme = \"dark\"\n").is_err());
        assert!(Manifest::from_toml_str("[[component]]\nkind = \"stagger\"\nstager_ms = 10\n").is_err());
    }

    #[test]
    fn test_build_places_elements() {
        let manifest = Manifest::from_toml_str(MANIFEST).unwrap();
        let defaults = MotionDefaults::default();
        let mut surface = RecordingSurface::new(manifest.viewport.into());
        let mut builder = Builder::new(&mut surface, &defaults);

        let components: Vec<_> = manifest
            .components
            .iter()
            .map(|spec| builder.build(spec))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(components.len(), 3);

        let html = components[2].render().to_html();
        assert!(html.contains("blur(4px)"));
        assert!(html.contains("transition-delay: 150ms"));
    }

    #[test]
    fn test_parallax_cannot_be_staggered() {
        let manifest = Manifest::from_toml_str(
            r#"
            [[component]]
            kind = "stagger"
            [[component.children]]
            kind = "parallax"
            "#,
        )
        .unwrap();
        let defaults = MotionDefaults::default();
        let mut surface = RecordingSurface::default();
        let err = Builder::new(&mut surface, &defaults)
            .build(&manifest.components[0])
            .err()
            .map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("parallax cannot be staggered"));
    }
}

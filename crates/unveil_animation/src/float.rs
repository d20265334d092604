//! Float
//!
//! An infinite, alternating vertical bob driven by a surface keyframe
//! animation. With `randomize`, each instance gets its own amplitude, duration
//! and start offset so a group of floating elements drifts out of phase. The
//! jitter is seeded, so the same seed and element always produce the same
//! motion.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;
use tracing::{debug, warn};
use unveil_core::{
    AnimationId, AnimationTiming, ClassFragment, ClassList, Easing, Element, ElementId, FillMode,
    Iterations, Keyframe, Node, PlaybackDirection, Style, Surface, SurfaceEvent,
};

use crate::component::{with_ref, Component, Delayed};
use crate::config::{FloatDefaults, MotionDefaults};

/// Amplitude is scaled into `[0.75, 1.25)` when randomized
const AMPLITUDE_JITTER: (f32, f32) = (0.75, 1.25);
/// Duration is scaled into `[0.8, 1.2)` when randomized
const DURATION_JITTER: (f32, f32) = (0.8, 1.2);
/// Extra start delay in `[0, 1000)` ms when randomized
const MAX_DELAY_JITTER_MS: f32 = 1000.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatOptions {
    pub amplitude_px: f32,
    pub duration_ms: u32,
    pub delay_ms: u32,
    pub randomize: bool,
    pub seed: u64,
}

impl Default for FloatOptions {
    fn default() -> Self {
        Self::from_defaults(&FloatDefaults::default())
    }
}

impl FloatOptions {
    pub fn from_defaults(defaults: &FloatDefaults) -> Self {
        Self {
            amplitude_px: defaults.amplitude_px,
            duration_ms: defaults.duration_ms,
            delay_ms: 0,
            randomize: defaults.randomize,
            seed: defaults.seed,
        }
    }
}

/// Concrete parameters of one float animation, after jitter
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatParams {
    pub amplitude_px: f32,
    pub duration_ms: u32,
    pub delay_ms: u32,
}

/// Deterministic value in `[0, 1)` for `(seed, key, salt)`
fn jitter(seed: u64, key: u64, salt: u64) -> f32 {
    let mut hasher = FxHasher::default();
    (seed, key, salt).hash(&mut hasher);
    let mut h = hasher.finish();

    // splitmix64 finalizer
    h ^= h >> 30;
    h = h.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    h ^= h >> 27;
    h = h.wrapping_mul(0x94d0_49bb_1331_11eb);
    h ^= h >> 31;

    (h >> 40) as f32 / (1u64 << 24) as f32
}

fn lerp(range: (f32, f32), t: f32) -> f32 {
    range.0 + (range.1 - range.0) * t
}

impl FloatOptions {
    /// Resolve the animation parameters for an element
    ///
    /// `key` distinguishes instances sharing a seed (usually the element ref).
    pub fn resolve(&self, key: u64) -> FloatParams {
        if !self.randomize {
            return FloatParams {
                amplitude_px: self.amplitude_px,
                duration_ms: self.duration_ms,
                delay_ms: self.delay_ms,
            };
        }

        let amplitude = self.amplitude_px * lerp(AMPLITUDE_JITTER, jitter(self.seed, key, 0));
        let duration = self.duration_ms as f32 * lerp(DURATION_JITTER, jitter(self.seed, key, 1));
        let extra_delay = MAX_DELAY_JITTER_MS * jitter(self.seed, key, 2);

        FloatParams {
            amplitude_px: amplitude,
            duration_ms: (duration.round() as u32).max(1),
            delay_ms: self.delay_ms.saturating_add(extra_delay as u32),
        }
    }
}

/// Keyframes for a float of the given amplitude
pub fn float_keyframes(amplitude_px: f32) -> [Keyframe; 2] {
    let peak = if amplitude_px == 0.0 {
        "translateY(0)".to_string()
    } else {
        format!("translateY({}px)", -amplitude_px)
    };
    [
        Keyframe::new(0.0, Style::transform("translateY(0)")),
        Keyframe::new(1.0, Style::transform(peak)),
    ]
}

pub struct Float {
    options: FloatOptions,
    target: Option<ElementId>,
    animation: Option<AnimationId>,
    mounted: bool,
    respect_reduced_motion: bool,
    reduced_motion: bool,
    tag: String,
    class_name: ClassList,
    children: Vec<Node>,
}

impl Default for Float {
    fn default() -> Self {
        Self::new()
    }
}

impl Float {
    pub fn new() -> Self {
        Self::with_defaults(&MotionDefaults::default())
    }

    pub fn with_defaults(defaults: &MotionDefaults) -> Self {
        Self {
            options: FloatOptions::from_defaults(&defaults.float),
            target: None,
            animation: None,
            mounted: false,
            respect_reduced_motion: defaults.respect_reduced_motion,
            reduced_motion: false,
            tag: "div".to_string(),
            class_name: ClassList::new(),
            children: Vec::new(),
        }
    }

    /// Peak vertical travel in pixels
    pub fn amplitude(mut self, px: f32) -> Self {
        self.options.amplitude_px = px.max(0.0);
        self
    }

    /// Duration of one up-or-down leg in milliseconds
    pub fn duration(mut self, ms: u32) -> Self {
        self.options.duration_ms = ms.max(1);
        self
    }

    pub fn delay(mut self, ms: u32) -> Self {
        self.options.delay_ms = ms;
        self
    }

    pub fn randomize(mut self, randomize: bool) -> Self {
        self.options.randomize = randomize;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.options.seed = seed;
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

    pub fn options(&self) -> &FloatOptions {
        &self.options
    }

    pub fn is_running(&self) -> bool {
        self.animation.is_some()
    }

    /// Parameters this instance animates with
    pub fn params(&self) -> FloatParams {
        self.options
            .resolve(self.target.map(ElementId::to_raw).unwrap_or_default())
    }

    /// Replace the options, restarting the animation if mounted
    ///
    /// The running animation is cancelled before the new one starts, so at most
    /// one animation is live per instance.
    pub fn reconfigure(&mut self, options: FloatOptions, surface: &mut dyn Surface) {
        self.cancel(surface);
        self.options = options;
        if self.mounted {
            self.start(surface);
        }
    }

    fn start(&mut self, surface: &mut dyn Surface) {
        if self.animation.is_some() || self.reduced_motion {
            return;
        }
        let Some(element) = self.target else {
            debug!("Float: no target ref, skipping animation");
            return;
        };

        let params = self.params();
        let timing = AnimationTiming {
            duration_ms: params.duration_ms,
            delay_ms: params.delay_ms,
            iterations: Iterations::Infinite,
            direction: PlaybackDirection::Alternate,
            easing: Easing::EaseInOut,
            fill: FillMode::Both,
        };

        match surface.animate(element, &float_keyframes(params.amplitude_px), &timing) {
            Ok(animation) => {
                debug!(
                    "Float: started (amplitude={}px, duration={}ms, delay={}ms)",
                    params.amplitude_px, params.duration_ms, params.delay_ms
                );
                self.animation = Some(animation);
            }
            Err(err) => warn!("Float: failed to start animation: {}", err),
        }
    }

    fn cancel(&mut self, surface: &mut dyn Surface) {
        if let Some(animation) = self.animation.take() {
            if let Err(err) = surface.cancel_animation(animation) {
                warn!("Float: failed to cancel animation: {}", err);
            }
        }
    }
}

impl Component for Float {
    fn mount(&mut self, surface: &mut dyn Surface) {
        self.mounted = true;
        if self.respect_reduced_motion && surface.prefers_reduced_motion() {
            debug!("Float: reduced motion preferred, not animating");
            self.reduced_motion = true;
            return;
        }
        self.start(surface);
    }

    fn unmount(&mut self, surface: &mut dyn Surface) {
        self.mounted = false;
        self.cancel(surface);
    }

    fn handle_event(&mut self, _event: &SurfaceEvent, _surface: &mut dyn Surface) -> bool {
        false
    }

    fn render(&self) -> Element {
        let element = Element::new(self.tag.as_str())
            .class(&self.class_name)
            .style(&Style::new().with("will-change", "transform"))
            .children(self.children.iter().cloned());
        with_ref(element, self.target)
    }
}

impl Delayed for Float {
    fn delay_ms(&self) -> u32 {
        self.options.delay_ms
    }

    fn set_delay_ms(&mut self, delay_ms: u32) {
        self.options.delay_ms = delay_ms;
    }
}

//! Theme context
//!
//! [`ThemeProvider`] is an explicit context object rather than ambient global
//! state. It is mounted with the host's [`SystemPreferences`], hands out
//! immutable [`ThemeContext`] snapshots, persists the chosen mode through an
//! injected [`ThemeStorage`], and notifies subscribers when the resolved theme
//! changes. Unmounting drops the resolved state and every subscriber.
//!
//! ```rust
//! use unveil_core::{ResolvedTheme, SystemPreferences, ThemeMode, ThemeProvider};
//!
//! let mut provider = ThemeProvider::new(ThemeMode::System);
//! provider.mount(SystemPreferences { prefers_dark: true, ..Default::default() });
//! assert_eq!(provider.context().unwrap().resolved, ResolvedTheme::Dark);
//!
//! provider.toggle().unwrap();
//! assert_eq!(provider.context().unwrap().class_name(), "light");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use tracing::debug;

use crate::error::ThemeError;

/// The user's chosen theme mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::System => "system",
        })
    }
}

impl FromStr for ThemeMode {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "system" => Ok(ThemeMode::System),
            _ => Err(ThemeError::UnknownMode(s.to_string())),
        }
    }
}

/// The concrete theme after resolving `System`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedTheme {
    Light,
    Dark,
}

impl ResolvedTheme {
    /// Class applied to the document root
    pub fn class_name(&self) -> &'static str {
        match self {
            ResolvedTheme::Light => "light",
            ResolvedTheme::Dark => "dark",
        }
    }
}

/// Host media preferences, supplied on mount and on change
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemPreferences {
    pub prefers_dark: bool,
    pub prefers_reduced_motion: bool,
}

/// Persistence for the chosen mode
pub trait ThemeStorage {
    fn load(&self) -> Option<ThemeMode>;
    fn store(&mut self, mode: ThemeMode);
}

/// In-memory [`ThemeStorage`]
#[derive(Debug, Default)]
pub struct MemoryThemeStorage {
    mode: Option<ThemeMode>,
}

impl MemoryThemeStorage {
    pub fn new(mode: Option<ThemeMode>) -> Self {
        Self { mode }
    }
}

impl ThemeStorage for MemoryThemeStorage {
    fn load(&self) -> Option<ThemeMode> {
        self.mode
    }

    fn store(&mut self, mode: ThemeMode) {
        self.mode = Some(mode);
    }
}

/// Immutable snapshot handed to consumers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemeContext {
    pub mode: ThemeMode,
    pub resolved: ResolvedTheme,
    pub reduced_motion: bool,
}

impl ThemeContext {
    pub fn class_name(&self) -> &'static str {
        self.resolved.class_name()
    }
}

new_key_type! {
    /// Handle to a theme change subscription
    pub struct SubscriptionId;
}

type ThemeListener = Box<dyn FnMut(&ThemeContext)>;

struct MountedState {
    mode: ThemeMode,
    system: SystemPreferences,
}

/// Explicit, injectable theme context with a mount/unmount lifecycle
pub struct ThemeProvider {
    default_mode: ThemeMode,
    storage: Box<dyn ThemeStorage>,
    state: Option<MountedState>,
    subscribers: SlotMap<SubscriptionId, ThemeListener>,
}

impl ThemeProvider {
    /// Create a provider with in-memory storage
    pub fn new(default_mode: ThemeMode) -> Self {
        Self::with_storage(default_mode, Box::new(MemoryThemeStorage::default()))
    }

    pub fn with_storage(default_mode: ThemeMode, storage: Box<dyn ThemeStorage>) -> Self {
        Self {
            default_mode,
            storage,
            state: None,
            subscribers: SlotMap::with_key(),
        }
    }

    /// Resolve the initial mode (stored, else default) against the host preferences
    pub fn mount(&mut self, system: SystemPreferences) {
        let mode = self.storage.load().unwrap_or(self.default_mode);
        debug!("ThemeProvider: mount (mode={}, prefers_dark={})", mode, system.prefers_dark);
        self.state = Some(MountedState { mode, system });
    }

    /// Drop resolved state and all subscribers
    pub fn unmount(&mut self) {
        if self.state.take().is_some() {
            debug!(
                "ThemeProvider: unmount ({} subscribers dropped)",
                self.subscribers.len()
            );
        }
        self.subscribers.clear();
    }

    pub fn is_mounted(&self) -> bool {
        self.state.is_some()
    }

    /// Current snapshot, `None` while unmounted
    pub fn context(&self) -> Option<ThemeContext> {
        self.state.as_ref().map(|state| ThemeContext {
            mode: state.mode,
            resolved: resolve(state.mode, &state.system),
            reduced_motion: state.system.prefers_reduced_motion,
        })
    }

    /// Change the mode, persist it, and notify subscribers if the snapshot changed
    pub fn set_mode(&mut self, mode: ThemeMode) -> Result<ThemeContext, ThemeError> {
        let before = self.context().ok_or(ThemeError::NotMounted)?;
        if let Some(state) = self.state.as_mut() {
            state.mode = mode;
        }
        self.storage.store(mode);
        self.notify_if_changed(before)
    }

    /// Flip between light and dark based on the currently resolved theme
    pub fn toggle(&mut self) -> Result<ThemeContext, ThemeError> {
        let current = self.context().ok_or(ThemeError::NotMounted)?;
        let next = match current.resolved {
            ResolvedTheme::Light => ThemeMode::Dark,
            ResolvedTheme::Dark => ThemeMode::Light,
        };
        self.set_mode(next)
    }

    /// Host media preferences changed (e.g. OS switched to dark)
    pub fn system_changed(&mut self, system: SystemPreferences) -> Result<ThemeContext, ThemeError> {
        let before = self.context().ok_or(ThemeError::NotMounted)?;
        if let Some(state) = self.state.as_mut() {
            state.system = system;
        }
        self.notify_if_changed(before)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ThemeContext) + 'static) -> SubscriptionId {
        self.subscribers.insert(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id).is_some()
    }

    fn notify_if_changed(&mut self, before: ThemeContext) -> Result<ThemeContext, ThemeError> {
        let after = self.context().ok_or(ThemeError::NotMounted)?;
        if after != before {
            for (_, listener) in self.subscribers.iter_mut() {
                listener(&after);
            }
        }
        Ok(after)
    }
}

fn resolve(mode: ThemeMode, system: &SystemPreferences) -> ResolvedTheme {
    match mode {
        ThemeMode::Light => ResolvedTheme::Light,
        ThemeMode::Dark => ResolvedTheme::Dark,
        ThemeMode::System if system.prefers_dark => ResolvedTheme::Dark,
        ThemeMode::System => ResolvedTheme::Light,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_unmounted_provider_has_no_context() {
        let mut provider = ThemeProvider::new(ThemeMode::Light);
        assert!(provider.context().is_none());
        assert_eq!(provider.set_mode(ThemeMode::Dark), Err(ThemeError::NotMounted));
        assert_eq!(provider.toggle(), Err(ThemeError::NotMounted));
    }

    #[test]
    fn test_stored_mode_wins_over_default() {
        let storage = MemoryThemeStorage::new(Some(ThemeMode::Dark));
        let mut provider = ThemeProvider::with_storage(ThemeMode::Light, Box::new(storage));
        provider.mount(SystemPreferences::default());
        let ctx = provider.context().unwrap();
        assert_eq!(ctx.mode, ThemeMode::Dark);
        assert_eq!(ctx.class_name(), "dark");
    }

    #[test]
    fn test_subscribers_notified_on_change_only() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut provider = ThemeProvider::new(ThemeMode::Light);
        provider.mount(SystemPreferences::default());

        let sink = seen.clone();
        provider.subscribe(move |ctx| sink.borrow_mut().push(ctx.resolved));

        provider.set_mode(ThemeMode::Light).unwrap();
        provider.set_mode(ThemeMode::Dark).unwrap();
        provider.toggle().unwrap();
        assert_eq!(
            *seen.borrow(),
            vec![ResolvedTheme::Dark, ResolvedTheme::Light]
        );
    }

    #[test]
    fn test_system_mode_follows_preferences() {
        let mut provider = ThemeProvider::new(ThemeMode::System);
        provider.mount(SystemPreferences::default());
        assert_eq!(provider.context().unwrap().resolved, ResolvedTheme::Light);

        let ctx = provider
            .system_changed(SystemPreferences {
                prefers_dark: true,
                prefers_reduced_motion: true,
            })
            .unwrap();
        assert_eq!(ctx.resolved, ResolvedTheme::Dark);
        assert!(ctx.reduced_motion);
    }

    #[test]
    fn test_unmount_drops_subscribers() {
        let count = Rc::new(RefCell::new(0));
        let mut provider = ThemeProvider::new(ThemeMode::Light);
        provider.mount(SystemPreferences::default());
        let sink = count.clone();
        let id = provider.subscribe(move |_| *sink.borrow_mut() += 1);

        provider.unmount();
        assert!(!provider.is_mounted());
        assert!(!provider.unsubscribe(id));

        provider.mount(SystemPreferences::default());
        provider.set_mode(ThemeMode::Dark).unwrap();
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("Dark".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
        assert!(matches!(
            "sepia".parse::<ThemeMode>(),
            Err(ThemeError::UnknownMode(_))
        ));
    }
}

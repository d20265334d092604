//! Inline style declarations

use indexmap::IndexMap;
use serde::Serialize;

/// An ordered map of CSS property declarations
///
/// Insertion order is preserved so emitted `style` attributes are stable.
/// Setting an existing property replaces its value in place.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Style {
    declarations: IndexMap<String, String>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Style with a single `transform` declaration
    pub fn transform(value: impl Into<String>) -> Self {
        Self::new().with("transform", value)
    }

    /// Set a property, returning self for chaining
    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.declarations.insert(property.into(), value.into());
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations.get(property).map(String::as_str)
    }

    pub fn remove(&mut self, property: &str) -> Option<String> {
        self.declarations.shift_remove(property)
    }

    /// Overlay `other` on top of this style; its values win
    pub fn merge(&mut self, other: &Style) {
        for (property, value) in &other.declarations {
            self.set(property.clone(), value.clone());
        }
    }

    /// Return a new style with `other` overlaid
    pub fn merged(mut self, other: &Style) -> Self {
        self.merge(other);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize to a `style` attribute value: `a: b; c: d`
    pub fn to_css(&self) -> String {
        self.iter()
            .map(|(property, value)| format!("{property}: {value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Style {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut style = Style::new();
        for (property, value) in iter {
            style.set(property, value);
        }
        style
    }
}

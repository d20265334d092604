//! Class-name composition
//!
//! Builds a final class attribute by conditionally concatenating fragments.
//! Falsy fragments (empty strings, `None`) are dropped, every other fragment is
//! split on whitespace, and duplicate class names keep their first position.
//!
//! ```rust
//! use unveil_core::cn;
//!
//! let visible = false;
//! let classes = cn!(
//!     "transition-all",
//!     if visible { "opacity-100" } else { "opacity-0" },
//!     (visible, "pointer-events-auto"),
//! );
//! assert_eq!(classes, "transition-all opacity-0");
//! ```

use std::fmt;

use serde::{Serialize, Serializer};
use smallvec::SmallVec;

/// An ordered, de-duplicated set of class names
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassList {
    classes: SmallVec<[String; 8]>,
}

impl ClassList {
    /// Create an empty class list
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a class list from homogeneous fragments
    pub fn from_fragments<I, F>(fragments: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: ClassFragment,
    {
        let mut list = Self::new();
        for fragment in fragments {
            fragment.append_to(&mut list);
        }
        list
    }

    /// Add a single fragment (may contain several space-separated classes)
    pub fn push(&mut self, fragment: &str) {
        for class in fragment.split_whitespace() {
            if !self.contains(class) {
                self.classes.push(class.to_string());
            }
        }
    }

    /// Add a fragment, returning self for chaining
    pub fn with(mut self, fragment: impl ClassFragment) -> Self {
        fragment.append_to(&mut self);
        self
    }

    /// Append all classes from another list
    pub fn extend_from(&mut self, other: &ClassList) {
        for class in other.iter() {
            self.push(class);
        }
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, class) in self.classes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(class)?;
        }
        Ok(())
    }
}

impl Serialize for ClassList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<&str> for ClassList {
    fn from(fragment: &str) -> Self {
        Self::new().with(fragment)
    }
}

impl From<String> for ClassList {
    fn from(fragment: String) -> Self {
        Self::new().with(fragment)
    }
}

/// A value that can contribute classes to a [`ClassList`]
///
/// Implemented for strings, options of fragments, other class lists, and
/// `(bool, fragment)` pairs that only contribute when the flag is set.
pub trait ClassFragment {
    fn append_to(self, list: &mut ClassList);
}

impl ClassFragment for &str {
    fn append_to(self, list: &mut ClassList) {
        list.push(self);
    }
}

impl ClassFragment for String {
    fn append_to(self, list: &mut ClassList) {
        list.push(&self);
    }
}

impl ClassFragment for &String {
    fn append_to(self, list: &mut ClassList) {
        list.push(self);
    }
}

impl ClassFragment for ClassList {
    fn append_to(self, list: &mut ClassList) {
        list.extend_from(&self);
    }
}

impl ClassFragment for &ClassList {
    fn append_to(self, list: &mut ClassList) {
        list.extend_from(self);
    }
}

impl<F: ClassFragment> ClassFragment for Option<F> {
    fn append_to(self, list: &mut ClassList) {
        if let Some(fragment) = self {
            fragment.append_to(list);
        }
    }
}

impl<F: ClassFragment> ClassFragment for (bool, F) {
    fn append_to(self, list: &mut ClassList) {
        if self.0 {
            self.1.append_to(list);
        }
    }
}

/// Merge homogeneous class fragments into a single space-joined string
///
/// Use the `cn!` macro for mixed fragment types.
pub fn cn<I, F>(fragments: I) -> String
where
    I: IntoIterator<Item = F>,
    F: ClassFragment,
{
    ClassList::from_fragments(fragments).to_string()
}

/// Merge class fragments of any [`ClassFragment`] type into a single string
#[macro_export]
macro_rules! cn {
    ($($fragment:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut list = $crate::class::ClassList::new();
        $( $crate::class::ClassFragment::append_to($fragment, &mut list); )*
        list.to_string()
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cn_drops_falsy_fragments() {
        let classes = cn!("a", "", None::<&str>, Some("b"), (false, "c"), (true, "d"));
        assert_eq!(classes, "a b d");
    }

    #[test]
    fn test_cn_splits_and_dedups() {
        let classes = cn!("  px-4   py-2 ", "py-2 text-sm", String::from("px-4"));
        assert_eq!(classes, "px-4 py-2 text-sm");
    }

    #[test]
    fn test_cn_empty() {
        assert_eq!(cn!(), "");
        assert_eq!(cn(Vec::<&str>::new()), "");
    }

    #[test]
    fn test_cn_function_with_options() {
        let classes = cn([Some("opacity-0"), None, Some("translate-y-4")]);
        assert_eq!(classes, "opacity-0 translate-y-4");
    }

    #[test]
    fn test_class_list_contains_and_len() {
        let list = ClassList::from("foo bar").with(Some("baz")).with("foo");
        assert_eq!(list.len(), 3);
        assert!(list.contains("bar"));
        assert!(!list.contains("qux"));
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["foo", "bar", "baz"]);
    }
}

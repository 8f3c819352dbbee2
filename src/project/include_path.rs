//! Ordered include-path list of a build target.
//!
//! In the project file the list is a single `;`-separated text node. Inside
//! the editor it is an ordered sequence that never holds two entries that
//! compare equal under [`paths_equal`].

use crate::utils::{is_same_or_within, paths_equal};

/// The include paths of one target, in stored order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IncludePathList(Vec<String>);

impl IncludePathList {
    /// Parse the stored text form. Blank entries are dropped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self(
            text.split(';')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    /// The text form written back to the project file.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.0.join(";")
    }

    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.0.iter().any(|entry| paths_equal(entry, path))
    }

    /// Append `path` unless an equivalent entry exists.
    ///
    /// Returns `true` when the list changed.
    pub fn insert(&mut self, path: &str) -> bool {
        if self.contains(path) {
            return false;
        }
        self.0.push(path.to_string());
        true
    }

    /// Remove `path` and every entry below it, keeping the order of the rest.
    ///
    /// Returns the number of removed entries.
    pub fn remove_with_subdirs(&mut self, path: &str) -> usize {
        let before = self.0.len();
        self.0.retain(|entry| !is_same_or_within(entry, path));
        before - self.0.len()
    }
}

//! File groups and file entries inside the project tree.
//!
//! A `Group` element carries a `GroupName` and an optional `Files` container
//! of `File` entries. Group names are not unique in a project; lookups by
//! name return the first group in document order.

use std::path::Path;

use serde::Serialize;

use super::file_type::FileType;
use crate::{utils::paths_equal, xml::XmlElement};

/// One `File` entry of a group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Base name shown in the IDE
    pub name: String,

    /// Stored `FileType` code, if present and numeric
    pub file_type: Option<u8>,

    /// Path relative to the project directory
    pub path: String,
}

impl FileEntry {
    /// Describe a file on disk that is stored under `stored_path`.
    #[must_use]
    pub fn for_path(file: &Path, stored_path: String) -> Self {
        Self {
            name: file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            file_type: Some(FileType::from_path(file).code()),
            path: stored_path,
        }
    }

    /// Read an entry from a `File` element.
    #[must_use]
    pub fn from_element(element: &XmlElement) -> Self {
        Self {
            name: element.child_text("FileName").unwrap_or_default(),
            file_type: element
                .child_text("FileType")
                .and_then(|code| code.trim().parse().ok()),
            path: element.child_text("FilePath").unwrap_or_default(),
        }
    }

    /// Build the `File` element for this entry.
    #[must_use]
    pub fn to_element(&self) -> XmlElement {
        let mut file = XmlElement::new("File");
        file.push_child(XmlElement::with_text("FileName", &self.name));
        if let Some(code) = self.file_type {
            file.push_child(XmlElement::with_text("FileType", code.to_string()));
        }
        file.push_child(XmlElement::with_text("FilePath", &self.path));
        file
    }
}

/// A new, empty group.
pub(crate) fn new_group(name: &str) -> XmlElement {
    let mut group = XmlElement::new("Group");
    group.push_child(XmlElement::with_text("GroupName", name));
    group
}

pub(crate) fn group_name(group: &XmlElement) -> String {
    group.child_text("GroupName").unwrap_or_default()
}

fn is_group_named(element: &XmlElement, name: &str) -> bool {
    element.name() == "Group" && element.child_text("GroupName").as_deref() == Some(name)
}

/// First group named exactly `name`.
pub(crate) fn find_group<'a>(root: &'a XmlElement, name: &str) -> Option<&'a XmlElement> {
    root.find(|element| is_group_named(element, name))
}

pub(crate) fn find_group_mut<'a>(root: &'a mut XmlElement, name: &str) -> Option<&'a mut XmlElement> {
    root.find_mut(|element| is_group_named(element, name))
}

/// Append `group` to the document's first `Groups` container.
///
/// When the document has none, a container is created under the first
/// `Target`, or under the root element for projects without targets.
pub(crate) fn insert_group(root: &mut XmlElement, group: XmlElement) {
    if let Some(groups) = root.descendant_mut("Groups") {
        groups.push_child(group);
        return;
    }

    let mut groups = XmlElement::new("Groups");
    groups.push_child(group);

    if let Some(target) = root.descendant_mut("Target") {
        target.push_child(groups);
    } else {
        root.push_child(groups);
    }
}

/// First group named `name`, created when missing.
pub(crate) fn group_mut_or_insert<'a>(
    root: &'a mut XmlElement,
    name: &str,
) -> Option<&'a mut XmlElement> {
    if find_group(root, name).is_none() {
        insert_group(root, new_group(name));
    }
    find_group_mut(root, name)
}

/// Whether `group` already references `stored_path`.
pub(crate) fn has_file(group: &XmlElement, stored_path: &str) -> bool {
    group.child("Files").is_some_and(|files| {
        files
            .children_named("File")
            .any(|file| file_path_matches(file, stored_path))
    })
}

/// Append an entry, creating the `Files` container if needed.
pub(crate) fn push_file(group: &mut XmlElement, entry: &FileEntry) {
    group.child_or_insert("Files").push_child(entry.to_element());
}

/// Entries of `group`, in stored order.
pub(crate) fn files(group: &XmlElement) -> Vec<FileEntry> {
    group
        .child("Files")
        .map(|files| files.children_named("File").map(FileEntry::from_element).collect())
        .unwrap_or_default()
}

/// Remove every entry referencing `stored_path` from every group.
///
/// Groups left empty stay in place. Returns the number of removed entries.
pub(crate) fn remove_files(root: &mut XmlElement, stored_path: &str) -> usize {
    root.descendants_mut("Group")
        .into_iter()
        .filter_map(|group| group.child_mut("Files"))
        .map(|files| {
            files.retain_children(|file| !(file.name() == "File" && file_path_matches(file, stored_path)))
        })
        .sum()
}

/// Detach the first group named `name`, with all its files.
pub(crate) fn remove_group(root: &mut XmlElement, name: &str) -> bool {
    let Some(parent) = root.find_mut(|element| {
        element
            .child_elements()
            .any(|child| is_group_named(child, name))
    }) else {
        return false;
    };

    let mut removed = false;
    parent.retain_children(|child| {
        if !removed && is_group_named(child, name) {
            removed = true;
            return false;
        }
        true
    });
    removed
}

fn file_path_matches(file: &XmlElement, stored_path: &str) -> bool {
    file.child_text("FilePath")
        .is_some_and(|path| paths_equal(&path, stored_path))
}

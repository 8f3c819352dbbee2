//! Structured results of editor operations.
//!
//! These types carry no formatting; the output layer renders them as text or
//! JSON.

use std::path::PathBuf;

use serde::Serialize;

use super::group::{self, FileEntry};
use crate::xml::XmlElement;

/// Snapshot of a project's targets, include paths and groups.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    /// Project file the snapshot was taken from
    pub project: PathBuf,

    /// `true` when the project has no `Target` elements
    pub legacy_default: bool,

    /// Number of `Target` elements
    pub target_count: usize,

    /// Include paths per target that has compiler settings
    pub targets: Vec<TargetSummary>,

    /// Groups in document order
    pub groups: Vec<GroupSummary>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TargetSummary {
    /// Target name; `None` for the implicit default target
    pub name: Option<String>,
    pub include_paths: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub name: String,
    pub files: Vec<FileEntry>,
}

impl GroupSummary {
    #[must_use]
    pub fn from_element(group: &XmlElement) -> Self {
        Self {
            name: group::group_name(group),
            files: group::files(group),
        }
    }
}

impl ProjectSummary {
    /// Total number of file entries over all groups.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.groups.iter().map(|group| group.files.len()).sum()
    }
}

/// What an add operation changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AddReport {
    pub groups_created: usize,
    pub files_added: usize,
    pub include_paths_added: usize,
}

/// What a remove operation changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RemoveReport {
    pub files_removed: usize,

    /// Include-path entries removed, counted over all targets
    pub include_paths_removed: usize,

    pub group_removed: bool,
}

impl AddReport {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.groups_created == 0 && self.files_added == 0 && self.include_paths_added == 0
    }
}

impl RemoveReport {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.files_removed == 0 && self.include_paths_removed == 0 && !self.group_removed
    }
}

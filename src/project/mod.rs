//! Project file model and editing.
//!
//! This module contains everything that understands the structure of a Keil
//! µVision project file: build targets and their include paths, file groups,
//! file classification, and the [`ProjectEditor`] that ties them together.
//!
//! ## Main Parts
//!
//! - [`ProjectEditor`] - Opens a project, applies edits and saves it
//! - [`TargetScope`] - Which targets an include-path edit applies to
//! - [`IncludePathList`] - Ordered, duplicate-free include paths of a target
//! - [`FileType`] - Numeric file kind derived from the extension
//! - [`ProjectSummary`] - Read-only snapshot used for listings

pub mod editor;
pub mod error;
pub mod file_type;
mod group;
pub mod include_path;
pub mod summary;
pub mod target;

pub use editor::ProjectEditor;
pub use error::{ProjectError, Result};
pub use file_type::FileType;
pub use group::FileEntry;
pub use include_path::IncludePathList;
pub use summary::{AddReport, GroupSummary, ProjectSummary, RemoveReport, TargetSummary};
pub use target::{TargetRef, TargetScope};

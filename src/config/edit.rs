//! Options for a single editing run.
//!
//! [`EditorOptions`] is handed to the project editor when it is opened, so the
//! editor never consults global state for verbosity or scan settings.
//! [`RunOptions`] describes what the command line asked for.

use std::path::PathBuf;

use super::ScanOptions;

/// Options the project editor is constructed with.
#[derive(Clone, Debug, Default)]
pub struct EditorOptions {
    /// Emit progress messages for every file and include path touched
    pub verbose: bool,

    /// How folders are walked by the scan-driven operations
    pub scan: ScanOptions,
}

/// The one logical operation a run performs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Scan a folder and add its files, groups and include paths
    Add,

    /// Scan a folder and remove its files, include paths and group
    Delete,

    /// Print targets, include paths, groups and files without changing anything
    List,

    /// Remove one group by name
    DeleteGroup(String),
}

/// Everything the command line resolved for one run.
#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Operation to perform
    pub mode: Mode,

    /// Folder to scan (required by [`Mode::Add`] and [`Mode::Delete`])
    pub folder: Option<PathBuf>,

    /// Group name override
    pub group: Option<String>,

    /// Create one group per directory instead of one group for the whole folder
    pub recursive: bool,

    /// Apply the operation in memory but never write the project file
    pub dry_run: bool,
}

impl Mode {
    /// Whether this mode needs a folder to scan.
    #[must_use]
    pub const fn needs_folder(&self) -> bool {
        matches!(self, Self::Add | Self::Delete)
    }

    /// Whether this mode changes the project file.
    #[must_use]
    pub const fn is_mutating(&self) -> bool {
        !matches!(self, Self::List)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_needs_folder() {
        assert!(Mode::Add.needs_folder());
        assert!(Mode::Delete.needs_folder());
        assert!(!Mode::List.needs_folder());
        assert!(!Mode::DeleteGroup("App".to_string()).needs_folder());
    }

    #[test]
    fn test_only_list_is_read_only() {
        assert!(!Mode::List.is_mutating());
        assert!(Mode::Add.is_mutating());
        assert!(Mode::Delete.is_mutating());
        assert!(Mode::DeleteGroup("App".to_string()).is_mutating());
    }
}

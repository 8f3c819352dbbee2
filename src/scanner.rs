//! Folder scanning for source files and headers.
//!
//! This module walks a source folder and records every directory it visits,
//! together with the files in that directory whose extension the project
//! editor knows how to add. The editor decides what to do with the result
//! (one group for everything, or one group per directory).

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use glob::Pattern;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::{
    config::ScanOptions,
    project::{ProjectError, Result, file_type},
    utils::path::{absolutize, folder_name},
};

/// Folder walker that collects recognized source files per directory.
#[derive(Debug)]
pub struct Scanner {
    /// Configuration options for scanning behavior
    scan_options: ScanOptions,

    /// Compiled `exclude` patterns
    exclude: Vec<Pattern>,
}

/// Everything found below one scanned folder.
#[derive(Clone, Debug)]
pub struct FolderScan {
    /// Absolute path of the scanned folder
    pub root: PathBuf,

    /// Final component of the scanned folder, used for default group names
    pub root_name: String,

    /// Every visited directory, parents before children, the root first
    pub directories: Vec<ScannedDirectory>,
}

/// One directory visited during a scan.
#[derive(Clone, Debug)]
pub struct ScannedDirectory {
    /// Absolute path of the directory
    pub path: PathBuf,

    /// Path relative to the scanned folder (empty for the folder itself)
    pub relative: PathBuf,

    /// Recognized files directly inside this directory, sorted by name
    pub files: Vec<PathBuf>,

    /// Whether any of `files` is a header
    pub has_header: bool,
}

impl Scanner {
    /// Create a new scanner with the specified options.
    ///
    /// Exclude patterns that are not valid globs are reported and ignored.
    #[must_use]
    pub fn new(scan_options: ScanOptions) -> Self {
        let exclude = scan_options
            .exclude
            .iter()
            .filter_map(|raw| match Pattern::new(raw) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Ignoring invalid exclude pattern '{raw}': {e}");
                    None
                }
            })
            .collect();

        Self {
            scan_options,
            exclude,
        }
    }

    /// Walk `root` and collect recognized files for every directory.
    ///
    /// Entries are visited in file-name order with parents before children.
    /// Unreadable entries are skipped; they are reported as warnings in verbose
    /// mode and at debug level otherwise.
    ///
    /// `max_depth` counts directory levels below `root`: `Some(0)` only looks
    /// at the files directly inside `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::Scan`] if `root` does not exist or is not a
    /// directory.
    pub fn scan_folder(&self, root: &Path) -> Result<FolderScan> {
        let root = absolutize(root);

        if !root.is_dir() {
            return Err(ProjectError::Scan {
                path: root,
                message: "not an existing directory".to_string(),
            });
        }

        let mut walker = WalkDir::new(&root).sort_by_file_name();
        if let Some(depth) = self.scan_options.max_depth {
            walker = walker.max_depth(depth.saturating_add(1));
        }

        let mut directories: Vec<ScannedDirectory> = Vec::new();
        let mut index_by_path: HashMap<PathBuf, usize> = HashMap::new();
        let mut unreadable = 0usize;

        for result in walker
            .into_iter()
            .filter_entry(|entry| self.should_scan_entry(&root, entry))
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    unreadable += 1;
                    if self.scan_options.verbose {
                        warn!("Skipping unreadable entry: {e}");
                    } else {
                        debug!("Skipping unreadable entry: {e}");
                    }
                    continue;
                }
            };

            let path = entry.path();

            if entry.file_type().is_dir() {
                let relative = path.strip_prefix(&root).unwrap_or(path).to_path_buf();
                index_by_path.insert(path.to_path_buf(), directories.len());
                directories.push(ScannedDirectory {
                    path: path.to_path_buf(),
                    relative,
                    files: Vec::new(),
                    has_header: false,
                });
                continue;
            }

            if !path.is_file() || !file_type::is_scanned(path) {
                continue;
            }

            let Some(index) = path.parent().and_then(|parent| index_by_path.get(parent)) else {
                continue;
            };

            let directory = &mut directories[*index];
            directory.has_header |= file_type::is_header(path);
            directory.files.push(path.to_path_buf());
        }

        if unreadable > 0 {
            debug!("{unreadable} entries under {} could not be read", root.display());
        }

        Ok(FolderScan {
            root_name: folder_name(&root),
            root,
            directories,
        })
    }

    /// Whether the walk should enter or report this entry.
    ///
    /// The scanned folder itself is always accepted.
    fn should_scan_entry(&self, root: &Path, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }

        if entry.file_type().is_dir() && self.is_in_skip_list(entry) {
            return false;
        }

        !self.is_excluded(root, entry)
    }

    /// Check if a directory name is in the skip list
    fn is_in_skip_list(&self, entry: &DirEntry) -> bool {
        self.scan_options
            .skip
            .iter()
            .any(|skip| entry.file_name() == skip.as_os_str())
    }

    /// Check the exclude globs against the relative path and the entry name
    fn is_excluded(&self, root: &Path, entry: &DirEntry) -> bool {
        if self.exclude.is_empty() {
            return false;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or_else(|_| entry.path())
            .to_string_lossy()
            .replace('\\', "/");
        let name = entry.file_name().to_string_lossy();

        self.exclude
            .iter()
            .any(|pattern| pattern.matches(&relative) || pattern.matches(&name))
    }
}

impl FolderScan {
    /// All recognized files in walk order.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.directories
            .iter()
            .flat_map(|directory| directory.files.iter().map(PathBuf::as_path))
    }

    /// Total number of recognized files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.directories.iter().map(|directory| directory.files.len()).sum()
    }
}

impl ScannedDirectory {
    /// Group name for this directory in per-directory mode.
    ///
    /// The scanned folder maps to `root_name`; subdirectories map to
    /// `root_name/sub/dir`, always joined with `/`.
    #[must_use]
    pub fn group_name(&self, root_name: &str) -> String {
        let parts: Vec<String> = self
            .relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy().into_owned())
            .collect();

        if parts.is_empty() {
            root_name.to_string()
        } else {
            format!("{root_name}/{}", parts.join("/"))
        }
    }
}

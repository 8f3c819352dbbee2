//! Scanning configuration for folder traversal.
//!
//! This module defines the options that control how source folders are walked
//! and which entries are picked up during a scan.

use std::path::PathBuf;

/// Configuration for folder scanning behavior.
#[derive(Clone, Debug, Default)]
pub struct ScanOptions {
    /// Whether to report entries that could not be read while walking
    pub verbose: bool,

    /// Directory names to skip, together with everything below them
    pub skip: Vec<PathBuf>,

    /// Glob patterns for files or directories to leave out, matched against
    /// the path relative to the scanned folder and against the entry name
    pub exclude: Vec<String>,

    /// Maximum directory depth to scan (None = unlimited)
    pub max_depth: Option<usize>,
}

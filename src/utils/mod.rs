//! Utility functions and helpers.
//!
//! This module contains utility functions used throughout the application,
//! such as project-relative path computation and path comparison.

pub mod path;

pub use path::{comparison_key, folder_name, is_same_or_within, paths_equal, project_relative};

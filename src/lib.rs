//! # uvproj-edit
//!
//! Library behind the `uvproj-edit` command: edit Keil µVision project files
//! (`.uvprojx` / `.uvproj`) from folder scans.
//!
//! A folder is walked for C, C++, header and assembly sources. The files are
//! added to (or removed from) the project's file groups, and directories with
//! headers are registered as include paths on every build target. The edited
//! document is written back atomically.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use uvproj_edit::{EditorOptions, ProjectEditor};
//!
//! let mut editor = ProjectEditor::open(Path::new("Project/App.uvprojx"), EditorOptions::default())?;
//! let report = editor.scan_and_add_files_to_single_group(Path::new("Source/Drivers"), None)?;
//! println!("added {} files", report.files_added);
//! editor.save()?;
//! # Ok::<(), uvproj_edit::ProjectError>(())
//! ```

pub mod config;
pub mod output;
pub mod project;
pub mod scanner;
pub mod utils;
pub mod xml;

pub use config::{EditorOptions, Mode, RunOptions, ScanOptions};
pub use project::{ProjectEditor, ProjectError, ProjectSummary};
pub use scanner::Scanner;

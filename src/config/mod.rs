//! Configuration types and the persistent configuration file.
//!
//! Option structs describe one run; [`FileConfig`] holds the defaults read from
//! the user's configuration file, which command-line arguments override.

pub mod edit;
pub mod file;
pub mod scan;

pub use edit::{EditorOptions, Mode, RunOptions};
pub use file::FileConfig;
pub use scan::ScanOptions;

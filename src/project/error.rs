//! Errors raised by project-level operations.
//!
//! Only structural failures are errors: an unreadable or unparseable project
//! file, a folder that cannot be scanned, or a failed save. Lookups that find
//! nothing are reported through return values instead.

use std::path::PathBuf;

use crate::xml::XmlError;

/// Result alias for project operations.
pub type Result<T> = std::result::Result<T, ProjectError>;

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// Reading the project file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The project file is not a usable XML document.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: XmlError,
    },

    /// Serializing the document failed.
    #[error("failed to serialize project: {0}")]
    Serialize(#[source] XmlError),

    /// A folder could not be scanned.
    #[error("cannot scan {}: {message}", path.display())]
    Scan { path: PathBuf, message: String },

    /// Writing the project file failed.
    #[error("failed to write {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

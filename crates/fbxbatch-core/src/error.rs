//! Error types for fbxbatch

use std::path::PathBuf;

use thiserror::Error;

use crate::encoder::EncodeError;

/// Result type alias using fbxbatch's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during export planning and execution
#[derive(Error, Debug)]
pub enum Error {
    /// No objects were selected when an export was requested
    #[error("please select a mesh/meshes for export")]
    EmptySelection,

    /// The target file already exists and overwriting is disabled.
    ///
    /// Treated as a per-object skip in batches, never as a batch abort.
    #[error("file {} already exists", .path.display())]
    FileExists {
        /// The resolved output path that was already present
        path: PathBuf,
    },

    /// The external encoder reported a failure for one object
    #[error("exporting mesh \"{object}\" failed: {source}")]
    Encoder {
        /// Name of the object whose export failed
        object: String,
        /// The underlying encoder error
        source: EncodeError,
    },

    /// An object id or name did not resolve to a scene object
    #[error("unknown object: {0}")]
    UnknownObject(String),

    /// No active object was set for an operation that requires one
    #[error("no active object")]
    NoActiveObject,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document (de)serialization error
    #[error("document error: {0}")]
    Document(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error is a non-fatal per-object skip rather than a
    /// genuine failure.
    pub fn is_skip(&self) -> bool {
        matches!(self, Error::FileExists { .. })
    }
}

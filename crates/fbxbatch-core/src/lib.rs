//! # fbxbatch Core
//!
//! Batch static-mesh export planning and execution.
//!
//! fbxbatch exports selected scene objects, each with its direct child
//! hierarchy, to one FBX file per object. Output paths are composed from a
//! global output directory, a per-object sub-folder and a filename prefix;
//! the actual file writer is an external collaborator behind the
//! [`MeshEncoder`](encoder::MeshEncoder) trait.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fbxbatch_core::prelude::*;
//!
//! let mut document = Document::load("scene.fbxbatch.json")?;
//! let report = document.export(&mut encoder)?;
//! println!("{report}");
//! ```
//!
//! ## Conventions
//!
//! - Exported files use an X-forward / Z-up axis convention
//! - Exports run strictly sequentially; the executor mutates shared
//!   selection and transform state that must not be touched concurrently
//! - The exported object is moved to the origin for the duration of the
//!   encoder call, so the file's origin is the mesh pivot

pub mod batch;
pub mod document;
pub mod encoder;
pub mod executor;
pub mod plan;
pub mod scene;
pub mod settings;

mod error;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::batch::{export_selection, BatchReport};
    pub use crate::document::Document;
    pub use crate::encoder::{Axis, EncodeError, EncodeJob, MeshEncoder};
    pub use crate::executor::export_object;
    pub use crate::plan::{plan_export, ExportPlan, MESH_FILE_EXTENSION};
    pub use crate::scene::{ObjectId, Scene, SceneObject};
    pub use crate::settings::{
        ExportSettings, ObjectExportInfo, SettingsStore, SmoothingMode,
    };
    // Math (re-export glam)
    pub use glam::Vec3;

    pub use crate::{Error, Result};
}

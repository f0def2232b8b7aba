//! The encoder boundary
//!
//! The actual mesh file writer lives in the host tool and is out of scope
//! here. The core hands it a fully resolved [`EncodeJob`] and expects exactly
//! one file at `output_path` on success. The flag set mirrors the static-mesh
//! convention of the target engine and is fixed at job construction; only
//! tangent export and smoothing come from user settings.

use std::path::PathBuf;

use thiserror::Error;

use crate::scene::Scene;
use crate::settings::SmoothingMode;

/// Errors reported by a [`MeshEncoder`] implementation
#[derive(Error, Debug)]
pub enum EncodeError {
    /// IO error while writing the output file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoder-specific failure
    #[error("{0}")]
    Failed(String),
}

/// Coordinate axis, for the export axis convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Short name as passed to encoder command lines
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

/// One fully resolved encoder invocation
///
/// Everything except `export_tangents` and `smoothing` is fixed: the export
/// is always mesh-only, scoped to the current selection, with modifiers
/// applied, no animation baked, no leaf bones added, and an X-forward /
/// Z-up axis convention.
#[derive(Debug, Clone)]
pub struct EncodeJob {
    /// Where the encoder must write its single output file
    pub output_path: PathBuf,
    /// Include per-vertex tangents
    pub export_tangents: bool,
    /// Normal smoothing policy
    pub smoothing: SmoothingMode,
    /// Only mesh objects are exported
    pub mesh_only: bool,
    /// Only the current selection is exported
    pub selected_only: bool,
    /// Mesh modifiers are applied before encoding
    pub apply_modifiers: bool,
    /// Animation is not baked into the file
    pub bake_animation: bool,
    /// No leaf bones are appended to armatures
    pub add_leaf_bones: bool,
    /// Forward axis of the output file
    pub axis_forward: Axis,
    /// Up axis of the output file
    pub axis_up: Axis,
}

impl EncodeJob {
    /// Build a job for one output file with the fixed static-mesh flag set
    pub fn new(
        output_path: impl Into<PathBuf>,
        export_tangents: bool,
        smoothing: SmoothingMode,
    ) -> Self {
        Self {
            output_path: output_path.into(),
            export_tangents,
            smoothing,
            mesh_only: true,
            selected_only: true,
            apply_modifiers: true,
            bake_animation: false,
            add_leaf_bones: false,
            axis_forward: Axis::X,
            axis_up: Axis::Z,
        }
    }
}

/// The boundary to the external mesh file writer
///
/// Implementations write exactly one file at `job.output_path` and may read
/// the scene's current selection, which at call time contains the target
/// object and its direct children with the target object moved to the
/// origin.
pub trait MeshEncoder {
    /// Encode the current selection of `scene` according to `job`
    fn encode(&mut self, scene: &Scene, job: &EncodeJob) -> Result<(), EncodeError>;
}

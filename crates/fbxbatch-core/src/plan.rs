//! Export path planning
//!
//! Composes the output path for one object from the global settings and the
//! object's sub-folder, and decides whether an export may proceed. Planning
//! never touches the filesystem beyond the existence check; directories are
//! created later, by the executor, only when the export actually runs.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::scene::{ObjectId, Scene};
use crate::settings::SettingsStore;

/// File extension of the interchange mesh format
pub const MESH_FILE_EXTENSION: &str = "fbx";

/// A resolved export target for one object. Derived and ephemeral, computed
/// fresh for every export attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPlan {
    /// Directory the output file goes into
    pub target_directory: PathBuf,
    /// Full path of the output file
    pub target_file_path: PathBuf,
    /// Name of the object being exported
    pub object_name: String,
    /// Number of direct children that will be included
    pub child_count: usize,
}

impl ExportPlan {
    /// Whether the export may proceed under the given overwrite policy.
    ///
    /// `false` means the target file already exists and must be skipped,
    /// which callers treat as a per-object skip, not a fatal error.
    pub fn permitted(&self, overwrite_existing: bool) -> bool {
        overwrite_existing || !self.target_file_path.exists()
    }
}

/// Compute the export plan for one object.
///
/// The target path is
/// `output_directory / sub_folder / (prefix + object_name + ".fbx")`, with a
/// relative output directory resolved against `base_dir` (the document's own
/// directory). Collisions between distinct objects resolving to the same
/// path are not detected here; later exports overwrite or skip per the
/// overwrite flag, in selection order.
pub fn plan_export(
    scene: &Scene,
    store: &SettingsStore,
    base_dir: &Path,
    id: ObjectId,
) -> Result<ExportPlan> {
    let object = scene
        .object(id)
        .ok_or_else(|| Error::UnknownObject(format!("#{}", id.raw())))?;
    let settings = store.settings();

    let output_root = resolve_output_directory(&settings.output_directory, base_dir);
    let sub_folder = store.sub_folder_path(id);
    let target_directory = if sub_folder.is_empty() {
        output_root
    } else {
        output_root.join(sub_folder)
    };

    let filename = format!(
        "{}{}.{}",
        settings.filename_prefix, object.name, MESH_FILE_EXTENSION
    );
    let target_file_path = target_directory.join(&filename);

    tracing::debug!(
        object = %object.name,
        path = %target_file_path.display(),
        "planned export target"
    );

    Ok(ExportPlan {
        target_directory,
        target_file_path,
        object_name: object.name.clone(),
        child_count: scene.children(id).len(),
    })
}

fn resolve_output_directory(dir: &Path, base_dir: &Path) -> PathBuf {
    if dir.as_os_str().is_empty() || dir == Path::new(".") {
        base_dir.to_path_buf()
    } else if dir.is_relative() {
        base_dir.join(dir)
    } else {
        dir.to_path_buf()
    }
}

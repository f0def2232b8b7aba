//! Single-object export execution
//!
//! Runs one planned export: selects the object's direct children so the
//! whole local hierarchy ends up in the file, moves the object to the origin
//! so the file's origin is the mesh pivot rather than its world placement,
//! invokes the encoder, and restores everything afterwards. The mutation is
//! scoped: restoration happens on every exit path, including encoder errors
//! and panics, via a drop guard.

use std::fs;

use glam::Vec3;

use crate::encoder::{EncodeJob, MeshEncoder};
use crate::error::{Error, Result};
use crate::plan::ExportPlan;
use crate::scene::{ObjectId, Scene};
use crate::settings::ExportSettings;

/// Scoped selection/transform mutation around one encoder call.
///
/// On construction the target's direct children are selected and the target
/// is moved to the origin; on drop the children are deselected and the
/// original location restored.
struct ExportScope<'a> {
    scene: &'a mut Scene,
    target: ObjectId,
    saved_location: Vec3,
    children: Vec<ObjectId>,
}

impl<'a> ExportScope<'a> {
    fn enter(scene: &'a mut Scene, target: ObjectId, saved_location: Vec3) -> Self {
        let children = scene.children(target);
        for &child in &children {
            scene.select(child);
        }
        scene.set_location(target, Vec3::ZERO);
        Self {
            scene,
            target,
            saved_location,
            children,
        }
    }

    fn scene(&self) -> &Scene {
        self.scene
    }
}

impl Drop for ExportScope<'_> {
    fn drop(&mut self) {
        self.scene.set_location(self.target, self.saved_location);
        for &child in &self.children {
            self.scene.deselect(child);
        }
    }
}

/// Export one object according to its plan.
///
/// Returns [`Error::FileExists`] when the target is already present and
/// overwriting is disabled (a skip, not a failure) and [`Error::Encoder`]
/// when the encoder itself fails. The target directory is created here,
/// with parents, right before the encoder runs.
pub fn export_object(
    scene: &mut Scene,
    encoder: &mut dyn MeshEncoder,
    id: ObjectId,
    plan: &ExportPlan,
    settings: &ExportSettings,
) -> Result<()> {
    if !plan.permitted(settings.overwrite_existing) {
        tracing::warn!(
            object = %plan.object_name,
            path = %plan.target_file_path.display(),
            "file already exists, skipping"
        );
        return Err(Error::FileExists {
            path: plan.target_file_path.clone(),
        });
    }

    let saved_location = scene
        .location(id)
        .ok_or_else(|| Error::UnknownObject(plan.object_name.clone()))?;

    tracing::info!(
        object = %plan.object_name,
        directory = %plan.target_directory.display(),
        "exporting mesh"
    );
    if plan.child_count > 0 {
        tracing::debug!(
            object = %plan.object_name,
            children = plan.child_count,
            "including child objects"
        );
    }

    if !plan.target_directory.exists() {
        tracing::debug!(directory = %plan.target_directory.display(), "creating directory");
        fs::create_dir_all(&plan.target_directory)?;
    }

    let job = EncodeJob::new(
        plan.target_file_path.clone(),
        settings.export_tangents,
        settings.smoothing,
    );

    let scope = ExportScope::enter(scene, id, saved_location);
    let outcome = encoder.encode(scope.scene(), &job);
    drop(scope);

    outcome.map_err(|source| Error::Encoder {
        object: plan.object_name.clone(),
        source,
    })?;

    tracing::info!(object = %plan.object_name, "successfully exported");
    Ok(())
}

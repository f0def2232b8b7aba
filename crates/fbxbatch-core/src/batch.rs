//! Batch export coordination
//!
//! Iterates the current selection and exports each object independently,
//! strictly sequentially. A skip or failure for one object never aborts the
//! rest of the batch; outcomes are tallied into a [`BatchReport`].

use std::fmt;
use std::path::Path;

use crate::encoder::MeshEncoder;
use crate::error::{Error, Result};
use crate::executor::export_object;
use crate::plan::plan_export;
use crate::scene::Scene;
use crate::settings::SettingsStore;

/// Aggregate outcome of one export invocation
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Number of objects the batch attempted
    pub total: usize,
    /// Number of objects exported successfully
    pub succeeded: usize,
    /// Names of the objects exported successfully, in export order
    pub exported: Vec<String>,
    /// Objects skipped because their target file already existed
    pub skipped: Vec<String>,
    /// Objects whose export failed, with the reason
    pub failures: Vec<(String, String)>,
}

impl BatchReport {
    /// Whether every attempted object was exported
    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.total
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 1 {
            return if self.succeeded == 1 {
                let name = self.exported.first().map_or("?", |s| s.as_str());
                write!(f, "Mesh {name} successfully exported")
            } else {
                let name = self
                    .skipped
                    .first()
                    .or_else(|| self.failures.first().map(|(name, _)| name))
                    .map_or("?", |s| s.as_str());
                write!(f, "Exporting mesh \"{name}\" failed")
            };
        }
        write!(
            f,
            "{}/{} meshes successfully exported",
            self.succeeded, self.total
        )
    }
}

/// Export every selected object of `scene`.
///
/// Fails up front with [`Error::EmptySelection`] when nothing is selected.
/// With exactly one object selected the active object is exported (falling
/// back to the selected one when no active object is set). With more than
/// one, each selected object is exported in selection order; per-object
/// skips and failures are recorded in the report and never abort the batch.
pub fn export_selection(
    scene: &mut Scene,
    store: &SettingsStore,
    base_dir: &Path,
    encoder: &mut dyn MeshEncoder,
) -> Result<BatchReport> {
    let selected = scene.selected().to_vec();
    if selected.is_empty() {
        return Err(Error::EmptySelection);
    }

    // Single selection exports the active object, like the host tool does
    let targets = if selected.len() == 1 {
        vec![scene.active().unwrap_or(selected[0])]
    } else {
        selected
    };

    let mut report = BatchReport {
        total: targets.len(),
        ..BatchReport::default()
    };

    for id in targets {
        let plan = match plan_export(scene, store, base_dir, id) {
            Ok(plan) => plan,
            Err(err) => {
                tracing::error!(error = %err, "planning failed");
                report.failures.push((format!("#{}", id.raw()), err.to_string()));
                continue;
            }
        };
        match export_object(scene, encoder, id, &plan, store.settings()) {
            Ok(()) => {
                report.succeeded += 1;
                report.exported.push(plan.object_name);
            }
            Err(err) if err.is_skip() => report.skipped.push(plan.object_name),
            Err(err) => {
                tracing::error!(object = %plan.object_name, error = %err, "export failed");
                report.failures.push((plan.object_name, err.to_string()));
            }
        }
    }

    tracing::info!(
        succeeded = report.succeeded,
        total = report.total,
        "batch export finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use glam::Vec3;
    use tempfile::tempdir;

    use super::*;
    use crate::encoder::{EncodeError, EncodeJob};
    use crate::scene::ObjectId;

    /// Writes a marker file, failing for objects whose output file name
    /// contains any of the configured markers
    struct SelectiveEncoder {
        fail_on: Vec<&'static str>,
        calls: usize,
    }

    impl SelectiveEncoder {
        fn new(fail_on: Vec<&'static str>) -> Self {
            Self { fail_on, calls: 0 }
        }
    }

    impl MeshEncoder for SelectiveEncoder {
        fn encode(&mut self, _scene: &Scene, job: &EncodeJob) -> std::result::Result<(), EncodeError> {
            self.calls += 1;
            let name = job.output_path.file_name().and_then(|n| n.to_str());
            if let Some(name) = name {
                if self.fail_on.iter().any(|marker| name.contains(marker)) {
                    return Err(EncodeError::Failed("simulated encoder failure".to_string()));
                }
            }
            fs::write(&job.output_path, b"fbx")?;
            Ok(())
        }
    }

    fn scene_with(names: &[&str]) -> (Scene, Vec<ObjectId>) {
        let mut scene = Scene::new();
        let ids: Vec<ObjectId> = names
            .iter()
            .map(|&name| scene.add_object(name, Vec3::ONE, None))
            .collect();
        (scene, ids)
    }

    #[test]
    fn empty_selection_fails_without_side_effects() {
        let dir = tempdir().expect("tempdir");
        let (mut scene, _ids) = scene_with(&["A"]);
        let mut store = SettingsStore::new();
        store.set_output_directory(dir.path());

        let mut encoder = SelectiveEncoder::new(vec![]);
        let result = export_selection(&mut scene, &store, Path::new("."), &mut encoder);
        assert!(matches!(result, Err(Error::EmptySelection)));
        assert_eq!(encoder.calls, 0);
        assert_eq!(fs::read_dir(dir.path()).expect("read_dir").count(), 0);
    }

    #[test]
    fn failure_mid_batch_does_not_abort() {
        let dir = tempdir().expect("tempdir");
        let (mut scene, ids) = scene_with(&["Alpha", "Beta", "Gamma"]);
        for &id in &ids {
            scene.select(id);
        }
        let mut store = SettingsStore::new();
        store.set_output_directory(dir.path());

        let mut encoder = SelectiveEncoder::new(vec!["Beta"]);
        let report = export_selection(&mut scene, &store, Path::new("."), &mut encoder)
            .expect("batch runs");

        assert_eq!(report.total, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(encoder.calls, 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "Beta");
        assert!(dir.path().join("SM_Alpha.fbx").exists());
        assert!(!dir.path().join("SM_Beta.fbx").exists());
        assert!(dir.path().join("SM_Gamma.fbx").exists());
        assert_eq!(report.to_string(), "2/3 meshes successfully exported");
    }

    #[test]
    fn single_selection_exports_active_object() {
        let dir = tempdir().expect("tempdir");
        let (mut scene, ids) = scene_with(&["Solo"]);
        scene.set_active(ids[0]);
        let mut store = SettingsStore::new();
        store.set_output_directory(dir.path());

        let mut encoder = SelectiveEncoder::new(vec![]);
        let report = export_selection(&mut scene, &store, Path::new("."), &mut encoder)
            .expect("export");
        assert!(report.all_succeeded());
        assert_eq!(report.to_string(), "Mesh Solo successfully exported");
        assert!(dir.path().join("SM_Solo.fbx").exists());
    }

    #[test]
    fn single_selection_skip_reports_failure_message() {
        let dir = tempdir().expect("tempdir");
        let (mut scene, ids) = scene_with(&["Solo"]);
        scene.set_active(ids[0]);
        let mut store = SettingsStore::new();
        store.set_output_directory(dir.path());
        store.set_overwrite_existing(false);

        fs::write(dir.path().join("SM_Solo.fbx"), b"existing").expect("write");

        let mut encoder = SelectiveEncoder::new(vec![]);
        let report = export_selection(&mut scene, &store, Path::new("."), &mut encoder)
            .expect("export");
        assert!(!report.all_succeeded());
        assert_eq!(report.skipped, vec!["Solo".to_string()]);
        assert_eq!(report.to_string(), "Exporting mesh \"Solo\" failed");
    }

    #[test]
    fn skips_count_against_the_total() {
        let dir = tempdir().expect("tempdir");
        let (mut scene, ids) = scene_with(&["Alpha", "Beta"]);
        for &id in &ids {
            scene.select(id);
        }
        let mut store = SettingsStore::new();
        store.set_output_directory(dir.path());
        store.set_overwrite_existing(false);

        fs::write(dir.path().join("SM_Beta.fbx"), b"existing").expect("write");

        let mut encoder = SelectiveEncoder::new(vec![]);
        let report = export_selection(&mut scene, &store, Path::new("."), &mut encoder)
            .expect("batch runs");
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.skipped, vec!["Beta".to_string()]);
        assert_eq!(report.to_string(), "1/2 meshes successfully exported");
        assert_eq!(
            fs::read(dir.path().join("SM_Beta.fbx")).expect("read"),
            b"existing"
        );
    }

    #[test]
    fn same_path_collision_last_writer_wins_when_overwriting() {
        let dir = tempdir().expect("tempdir");
        let (mut scene, ids) = scene_with(&["Twin", "Twin"]);
        for &id in &ids {
            scene.select(id);
        }
        let mut store = SettingsStore::new();
        store.set_output_directory(dir.path());

        let mut encoder = SelectiveEncoder::new(vec![]);
        let report = export_selection(&mut scene, &store, Path::new("."), &mut encoder)
            .expect("batch runs");
        assert_eq!(report.succeeded, 2);
        assert_eq!(encoder.calls, 2);
        assert!(dir.path().join("SM_Twin.fbx").exists());
    }
}

//! Export settings and the per-object settings store
//!
//! Global export settings plus a side table of per-object export info keyed
//! by [`ObjectId`]. Both are persisted with the document, mutated through
//! the store's setters, and treated as read-only while an export runs.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::scene::{ObjectId, Scene};

/// Maximum byte length of the filename prefix
pub const MAX_PREFIX_LEN: usize = 64;

/// Maximum byte length of a per-object sub-folder path
pub const MAX_SUB_FOLDER_LEN: usize = 1024;

/// Policy for exported normals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SmoothingMode {
    /// Leave normals as authored, export them as-is
    NormalsOnly,
    /// Derive smoothing per face
    #[default]
    Face,
}

/// Global export settings, persisted with the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Base output directory. Relative paths resolve against the document's
    /// own directory at export time.
    pub output_directory: PathBuf,
    /// Prefix prepended to every exported file name
    pub filename_prefix: String,
    /// Whether existing target files may be overwritten
    pub overwrite_existing: bool,
    /// Whether per-vertex tangents are included in the export
    pub export_tangents: bool,
    /// Normal smoothing policy
    pub smoothing: SmoothingMode,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from("."),
            filename_prefix: "SM_".to_string(),
            overwrite_existing: true,
            export_tangents: true,
            smoothing: SmoothingMode::Face,
        }
    }
}

/// Per-object export info, kept in the store's side table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObjectExportInfo {
    /// Relative path segment appended to the global output directory
    pub sub_folder_path: String,
}

/// Global settings plus the per-object side table
///
/// The configuration surface is deliberately permissive: arbitrary strings
/// and paths are accepted, the only constraint is the host property byte
/// limit, which the string setters enforce by truncation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsStore {
    settings: ExportSettings,
    #[serde(with = "info_table")]
    object_info: HashMap<ObjectId, ObjectExportInfo>,
}

impl SettingsStore {
    /// Create a store with default settings and an empty side table
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the global settings
    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Set the base output directory
    pub fn set_output_directory(&mut self, dir: impl Into<PathBuf>) {
        self.settings.output_directory = dir.into();
    }

    /// Set the filename prefix, truncated to [`MAX_PREFIX_LEN`] bytes
    pub fn set_filename_prefix(&mut self, prefix: impl Into<String>) {
        self.settings.filename_prefix = truncate(prefix.into(), MAX_PREFIX_LEN);
    }

    /// Set whether existing files may be overwritten
    pub fn set_overwrite_existing(&mut self, overwrite: bool) {
        self.settings.overwrite_existing = overwrite;
    }

    /// Set whether tangents are exported
    pub fn set_export_tangents(&mut self, tangents: bool) {
        self.settings.export_tangents = tangents;
    }

    /// Set the smoothing mode
    pub fn set_smoothing(&mut self, smoothing: SmoothingMode) {
        self.settings.smoothing = smoothing;
    }

    /// The sub-folder path of an object, empty if never set
    pub fn sub_folder_path(&self, id: ObjectId) -> &str {
        self.object_info
            .get(&id)
            .map_or("", |info| info.sub_folder_path.as_str())
    }

    /// Set an object's sub-folder path, truncated to
    /// [`MAX_SUB_FOLDER_LEN`] bytes
    pub fn set_sub_folder_path(&mut self, id: ObjectId, sub_folder: impl Into<String>) {
        self.object_info.entry(id).or_default().sub_folder_path =
            truncate(sub_folder.into(), MAX_SUB_FOLDER_LEN);
    }

    /// Copy the active object's sub-folder path onto every selected object.
    ///
    /// The active object itself is included (a no-op for it). Idempotent.
    pub fn apply_sub_folder_to_selection(&mut self, scene: &Scene, active: ObjectId) {
        let sub_folder = self.sub_folder_path(active).to_string();
        tracing::info!(
            sub_folder = %sub_folder,
            count = scene.selected().len(),
            "applying sub folder to selected objects"
        );
        for &id in scene.selected() {
            self.set_sub_folder_path(id, sub_folder.clone());
        }
    }
}

fn truncate(mut s: String, max: usize) -> String {
    if s.len() > max {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s.truncate(end);
    }
    s
}

/// Serialize the side table as a sorted entry list so documents stay
/// diff-friendly and JSON maps never need non-string keys.
mod info_table {
    use std::collections::HashMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::ObjectExportInfo;
    use crate::scene::ObjectId;

    pub fn serialize<S: Serializer>(
        table: &HashMap<ObjectId, ObjectExportInfo>,
        ser: S,
    ) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<(&ObjectId, &ObjectExportInfo)> = table.iter().collect();
        entries.sort_by_key(|&(id, _)| *id);
        entries.serialize(ser)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        de: D,
    ) -> Result<HashMap<ObjectId, ObjectExportInfo>, D::Error> {
        let entries: Vec<(ObjectId, ObjectExportInfo)> = Vec::deserialize(de)?;
        Ok(entries.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn default_settings() {
        let settings = ExportSettings::default();
        assert_eq!(settings.filename_prefix, "SM_");
        assert_eq!(settings.output_directory, PathBuf::from("."));
        assert!(settings.overwrite_existing);
        assert!(settings.export_tangents);
        assert_eq!(settings.smoothing, SmoothingMode::Face);
    }

    #[test]
    fn prefix_truncated_to_max_len() {
        let mut store = SettingsStore::new();
        store.set_filename_prefix("p".repeat(MAX_PREFIX_LEN + 10));
        assert_eq!(store.settings().filename_prefix.len(), MAX_PREFIX_LEN);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // 'é' is two bytes; an odd byte limit must not split it
        let s = truncate("é".repeat(10), 5);
        assert_eq!(s, "é".repeat(2));
    }

    #[test]
    fn sub_folder_defaults_to_empty() {
        let mut scene = Scene::new();
        let id = scene.add_object("Rock", Vec3::ZERO, None);
        let store = SettingsStore::new();
        assert_eq!(store.sub_folder_path(id), "");
    }

    #[test]
    fn apply_sub_folder_is_idempotent() {
        let mut scene = Scene::new();
        let a = scene.add_object("A", Vec3::ZERO, None);
        let b = scene.add_object("B", Vec3::ZERO, None);
        let c = scene.add_object("C", Vec3::ZERO, None);
        scene.select(b);
        scene.select(c);
        scene.set_active(a);

        let mut store = SettingsStore::new();
        store.set_sub_folder_path(a, "Props/Crates");
        store.set_sub_folder_path(b, "Old");

        store.apply_sub_folder_to_selection(&scene, a);
        let after_once: Vec<String> = [a, b, c]
            .iter()
            .map(|&id| store.sub_folder_path(id).to_string())
            .collect();
        assert_eq!(after_once, vec!["Props/Crates"; 3]);

        store.apply_sub_folder_to_selection(&scene, a);
        let after_twice: Vec<String> = [a, b, c]
            .iter()
            .map(|&id| store.sub_folder_path(id).to_string())
            .collect();
        assert_eq!(after_once, after_twice);
    }

    #[test]
    fn store_round_trips_through_json() {
        let mut scene = Scene::new();
        let id = scene.add_object("Rock", Vec3::ZERO, None);

        let mut store = SettingsStore::new();
        store.set_filename_prefix("SK_");
        store.set_sub_folder_path(id, "Env/Rocks");

        let json = serde_json::to_string(&store).expect("serialize");
        let restored: SettingsStore = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored.settings().filename_prefix, "SK_");
        assert_eq!(restored.sub_folder_path(id), "Env/Rocks");
    }
}

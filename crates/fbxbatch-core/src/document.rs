//! Document persistence
//!
//! Export settings and per-object sub-folders live inside the document,
//! next to the scene they configure, and round-trip through JSON. The
//! document remembers where it was loaded from so relative output
//! directories can resolve against its own directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::batch::{export_selection, BatchReport};
use crate::encoder::MeshEncoder;
use crate::error::{Error, Result};
use crate::scene::Scene;
use crate::settings::SettingsStore;

/// A scene plus its export configuration, persisted as one JSON file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// The scene and its selection state
    pub scene: Scene,
    /// Global settings and the per-object side table
    pub store: SettingsStore,
    #[serde(skip)]
    source_path: Option<PathBuf>,
}

impl Document {
    /// Create an empty in-memory document
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a document from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let mut document: Document = serde_json::from_str(&contents)?;
        document.source_path = Some(path.to_path_buf());
        Ok(document)
    }

    /// Save the document back to the file it was loaded from
    pub fn save(&self) -> Result<()> {
        match &self.source_path {
            Some(path) => self.save_to(path.clone()),
            None => Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "document has no source path",
            ))),
        }
    }

    /// Save the document to a specific path
    pub fn save_to(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        Ok(())
    }

    /// Where the document was loaded from, if anywhere
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// The directory relative output paths resolve against: the document's
    /// own directory, or the current directory for unsaved documents.
    pub fn base_dir(&self) -> PathBuf {
        self.source_path
            .as_deref()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }

    /// Export the current selection through `encoder`
    pub fn export(&mut self, encoder: &mut dyn MeshEncoder) -> Result<BatchReport> {
        let base_dir = self.base_dir();
        export_selection(&mut self.scene, &self.store, &base_dir, encoder)
    }

    /// Copy the active object's sub-folder path onto every selected object
    pub fn apply_sub_folder_to_selection(&mut self) -> Result<()> {
        if self.scene.selected().is_empty() {
            return Err(Error::EmptySelection);
        }
        let active = self.scene.active().ok_or(Error::NoActiveObject)?;
        self.store.apply_sub_folder_to_selection(&self.scene, active);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn document_round_trips() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("props.fbxbatch.json");

        let mut document = Document::new();
        let id = document.scene.add_object("Crate", Vec3::new(1.0, 0.0, 2.0), None);
        document.scene.set_active(id);
        document.store.set_filename_prefix("SK_");
        document.store.set_sub_folder_path(id, "Props");
        document.save_to(&path).expect("save");

        let restored = Document::load(&path).expect("load");
        assert_eq!(restored.store.settings().filename_prefix, "SK_");
        assert_eq!(restored.store.sub_folder_path(id), "Props");
        assert_eq!(restored.scene.active(), Some(id));
        assert_eq!(restored.source_path(), Some(path.as_path()));
        assert_eq!(restored.base_dir(), dir.path());
    }

    #[test]
    fn unsaved_document_has_no_save_target() {
        let document = Document::new();
        assert!(document.save().is_err());
        assert_eq!(document.base_dir(), PathBuf::from("."));
    }

    #[test]
    fn apply_sub_folder_requires_selection_and_active() {
        let mut document = Document::new();
        assert!(matches!(
            document.apply_sub_folder_to_selection(),
            Err(Error::EmptySelection)
        ));

        let a = document.scene.add_object("A", Vec3::ZERO, None);
        let b = document.scene.add_object("B", Vec3::ZERO, None);
        document.scene.select(b);
        assert!(matches!(
            document.apply_sub_folder_to_selection(),
            Err(Error::NoActiveObject)
        ));

        document.scene.set_active(a);
        document.store.set_sub_folder_path(a, "Env");
        document.apply_sub_folder_to_selection().expect("apply");
        assert_eq!(document.store.sub_folder_path(b), "Env");
    }
}

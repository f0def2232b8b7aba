//! Scene model for fbxbatch
//!
//! A minimal stand-in for the host application's scene state: objects with
//! names, locations and parent links, plus the host-owned mutable selection
//! and active object. The export pipeline only ever touches scenes through
//! this type, so the shared selection/transform state is an explicit value
//! passed down the call stack rather than a process-wide global.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Stable identity of a scene object
///
/// Ids are assigned by the scene on insertion and never reused within a
/// document, so they stay valid as a side-table key across renames.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Raw id value, mainly for logging
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A single object in the scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneObject {
    /// Stable identity
    pub id: ObjectId,
    /// Object name, used to compose the export file name
    pub name: String,
    /// World-space location
    pub location: Vec3,
    /// Parent object, if any
    pub parent: Option<ObjectId>,
}

/// Scene objects plus the host's selection state
///
/// Objects are kept in insertion order. The selection is an ordered list
/// (selection order is batch iteration order) and the active object is the
/// most recently activated one, mirroring how the host tool treats the last
/// clicked object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    objects: Vec<SceneObject>,
    selection: Vec<ObjectId>,
    active: Option<ObjectId>,
    next_id: u64,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object and return its id
    pub fn add_object(
        &mut self,
        name: impl Into<String>,
        location: Vec3,
        parent: Option<ObjectId>,
    ) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.push(SceneObject {
            id,
            name: name.into(),
            location,
            parent,
        });
        id
    }

    /// Look up an object by id
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Look up an object by name (first match in insertion order)
    pub fn object_by_name(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// All objects in insertion order
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Direct children of an object, in insertion order
    pub fn children(&self, id: ObjectId) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|o| o.parent == Some(id))
            .map(|o| o.id)
            .collect()
    }

    /// Current location of an object
    pub fn location(&self, id: ObjectId) -> Option<Vec3> {
        self.object(id).map(|o| o.location)
    }

    /// Move an object. Unknown ids are ignored.
    pub fn set_location(&mut self, id: ObjectId, location: Vec3) {
        if let Some(object) = self.objects.iter_mut().find(|o| o.id == id) {
            object.location = location;
        }
    }

    /// Add an object to the selection. Already-selected objects keep their
    /// position in the selection order.
    pub fn select(&mut self, id: ObjectId) {
        if !self.selection.contains(&id) {
            self.selection.push(id);
        }
    }

    /// Remove an object from the selection
    pub fn deselect(&mut self, id: ObjectId) {
        self.selection.retain(|&s| s != id);
    }

    /// Whether an object is currently selected
    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selection.contains(&id)
    }

    /// Clear the selection and the active object
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.active = None;
    }

    /// Selected object ids in selection order
    pub fn selected(&self) -> &[ObjectId] {
        &self.selection
    }

    /// Set the active object (also selects it)
    pub fn set_active(&mut self, id: ObjectId) {
        self.select(id);
        self.active = Some(id);
    }

    /// The active object, if any
    pub fn active(&self) -> Option<ObjectId> {
        self.active
    }
}

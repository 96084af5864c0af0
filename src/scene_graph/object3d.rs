use glam::{DMat4, DQuat, DVec3};
use id_arena::Id;

use crate::scene_graph::data::{CameraId, LightId, MeshId};
use crate::scene_graph::scene::Scene;

pub type ObjectId = Id<Object3D>;

/// The data block an object instantiates.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectData {
    Mesh(MeshId),
    Light(LightId),
    Camera(CameraId),
    /// A host object type the exporter has no serializer for, e.g. "CURVE".
    Other(String),
    None,
}

pub struct Object3D {
    pub name: String,
    /// Transform relative to the parent, as the host stores it.
    pub matrix_local: DMat4,
    pub data: ObjectData,
    pub parent_id: Option<ObjectId>,
    pub child_ids: Vec<ObjectId>,
    pub selected: bool,
}

impl Object3D {
    pub fn new(name: impl Into<String>, data: ObjectData) -> Self {
        Self {
            name: name.into(),
            data,
            ..Default::default()
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, ObjectData::None)
    }

    pub fn with_matrix(mut self, matrix_local: DMat4) -> Self {
        self.matrix_local = matrix_local;
        self
    }

    pub fn with_transform(self, translation: DVec3, rotation: DQuat, scale: DVec3) -> Self {
        self.with_matrix(DMat4::from_scale_rotation_translation(
            scale,
            rotation,
            translation,
        ))
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn parent<'a>(&self, scene: &'a Scene) -> Option<&'a Object3D> {
        self.parent_id.and_then(|id| scene.get_object(id))
    }
}

impl Default for Object3D {
    fn default() -> Self {
        Self {
            name: String::new(),
            matrix_local: DMat4::IDENTITY,
            data: ObjectData::None,
            parent_id: None,
            child_ids: Vec::new(),
            selected: false,
        }
    }
}

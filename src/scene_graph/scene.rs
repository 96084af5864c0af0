use id_arena::Arena;

use crate::scene_graph::data::{Camera, CameraId, Light, LightId, MeshId, PolyMesh};
use crate::scene_graph::object3d::{Object3D, ObjectId};

/// Snapshot of the host scene: objects plus the data blocks they reference.
/// Objects iterate in insertion order, which is the order the host yields them in.
pub struct Scene {
    pub objects: Arena<Object3D>,
    pub meshes: Arena<PolyMesh>,
    pub lights: Arena<Light>,
    pub cameras: Arena<Camera>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            meshes: Arena::new(),
            lights: Arena::new(),
            cameras: Arena::new(),
        }
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        self.objects.alloc(object)
    }

    pub fn add_mesh(&mut self, mesh: PolyMesh) -> MeshId {
        self.meshes.alloc(mesh)
    }

    pub fn add_light(&mut self, light: Light) -> LightId {
        self.lights.alloc(light)
    }

    pub fn add_camera(&mut self, camera: Camera) -> CameraId {
        self.cameras.alloc(camera)
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    pub fn get_mesh(&self, id: MeshId) -> Option<&PolyMesh> {
        self.meshes.get(id)
    }

    pub fn get_light(&self, id: LightId) -> Option<&Light> {
        self.lights.get(id)
    }

    pub fn get_camera(&self, id: CameraId) -> Option<&Camera> {
        self.cameras.get(id)
    }

    pub fn get_object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    /// Every object in the scene, in host order.
    pub fn objects(&self) -> impl Iterator<Item = &Object3D> {
        self.objects.iter().map(|(_, object)| object)
    }

    /// The selected subset, in host order.
    pub fn selected_objects(&self) -> impl Iterator<Item = &Object3D> {
        self.objects().filter(|object| object.selected)
    }

    pub fn set_selected(&mut self, object_id: ObjectId, selected: bool) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.selected = selected;
        }
    }

    /// Sets the parent of an object and updates child relationships
    pub fn set_object_parent(&mut self, child_id: ObjectId, new_parent_id: Option<ObjectId>) {
        // Remove from old parent's children list
        if let Some(child) = self.objects.get(child_id) {
            if let Some(old_parent_id) = child.parent_id {
                if let Some(old_parent) = self.objects.get_mut(old_parent_id) {
                    old_parent.child_ids.retain(|&id| id != child_id);
                }
            }
        }

        if let Some(child) = self.objects.get_mut(child_id) {
            child.parent_id = new_parent_id;

            if let Some(new_parent_id) = new_parent_id {
                if let Some(new_parent) = self.objects.get_mut(new_parent_id) {
                    new_parent.child_ids.push(child_id);
                }
            }
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

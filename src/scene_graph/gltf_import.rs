// glTF files stand in for the host application when the exporter runs from the
// command line. Every node becomes an object; meshes, cameras and punctual
// lights become data blocks shared by the nodes that reference them.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use glam::{DVec3, Mat4};
use gltf::camera::Projection;
use gltf::khr_lights_punctual::Kind;
use itertools::Itertools;
use log::{debug, warn};

use crate::scene_graph::data::{Camera, CameraId, Light, LightId, LightKind, MeshId, PolyMesh};
use crate::scene_graph::object3d::{Object3D, ObjectData, ObjectId};
use crate::scene_graph::scene::Scene;

pub type Buffers<'a> = &'a [gltf::buffer::Data];

impl Scene {
    pub fn from_gltf(path: impl AsRef<Path>) -> anyhow::Result<Scene> {
        let path = path.as_ref();
        let (document, buffers, _images) = gltf::import(path)
            .with_context(|| format!("Failed to import glTF file {}", path.display()))?;

        Self::from_gltf_document(&document, &buffers)
    }

    pub fn from_gltf_slice(data: &[u8]) -> anyhow::Result<Scene> {
        let (document, buffers, _images) =
            gltf::import_slice(data).context("Failed to import glTF data")?;

        Self::from_gltf_document(&document, &buffers)
    }

    pub fn from_gltf_document(
        document: &gltf::Document,
        buffers: Buffers,
    ) -> anyhow::Result<Scene> {
        let gltf_scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .context("No scenes in gltf")?;

        let mut scene = Scene::new();
        GltfLoader::new(buffers).spawn_scene(&mut scene, &gltf_scene)?;

        Ok(scene)
    }
}

struct GltfLoader<'a> {
    buffers: Buffers<'a>,
    gltf_mesh_to_mesh: HashMap<usize, MeshId>,
    gltf_light_to_light: HashMap<usize, LightId>,
    gltf_camera_to_camera: HashMap<usize, CameraId>,
}

impl<'a> GltfLoader<'a> {
    fn new(buffers: Buffers<'a>) -> Self {
        Self {
            buffers,
            gltf_mesh_to_mesh: HashMap::new(),
            gltf_light_to_light: HashMap::new(),
            gltf_camera_to_camera: HashMap::new(),
        }
    }

    fn spawn_scene(&mut self, scene: &mut Scene, gltf_scene: &gltf::Scene) -> anyhow::Result<()> {
        for node in gltf_scene.nodes() {
            self.spawn_node(scene, &node, None)?;
        }

        Ok(())
    }

    fn spawn_node(
        &mut self,
        scene: &mut Scene,
        node: &gltf::Node,
        parent: Option<ObjectId>,
    ) -> anyhow::Result<ObjectId> {
        let node_name = node
            .name()
            .map(String::from)
            .unwrap_or_else(|| format!("Node.{:03}", node.index()));

        let data = if let Some(mesh) = node.mesh() {
            ObjectData::Mesh(self.load_mesh(scene, &mesh)?)
        } else if let Some(camera) = node.camera() {
            self.load_camera(scene, &camera)
        } else if let Some(light) = node.light() {
            ObjectData::Light(self.load_light(scene, &light))
        } else {
            ObjectData::None
        };

        let matrix = Mat4::from_cols_array_2d(&node.transform().matrix()).as_dmat4();
        debug!("Spawning glTF node {} ({:?})", node_name, data);

        let object_id = scene.add_object(Object3D::new(node_name, data).with_matrix(matrix));

        if let Some(parent_id) = parent {
            scene.set_object_parent(object_id, Some(parent_id));
        }

        for child in node.children() {
            self.spawn_node(scene, &child, Some(object_id))?;
        }

        Ok(object_id)
    }

    fn load_mesh(&mut self, scene: &mut Scene, mesh: &gltf::Mesh) -> anyhow::Result<MeshId> {
        if let Some(mesh_id) = self.gltf_mesh_to_mesh.get(&mesh.index()).copied() {
            return Ok(mesh_id);
        }

        let name = mesh
            .name()
            .map(String::from)
            .unwrap_or_else(|| format!("Mesh.{:03}", mesh.index()));
        let mut poly_mesh = PolyMesh::new(name);
        let buffers = self.buffers;

        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                warn!(
                    "Skipping primitive {} of mesh {}: unsupported mode {:?}",
                    primitive.index(),
                    poly_mesh.name,
                    primitive.mode()
                );
                continue;
            }

            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
            let positions = reader.read_positions().with_context(|| {
                format!(
                    "Primitive {} of mesh {} has no positions",
                    primitive.index(),
                    poly_mesh.name
                )
            })?;

            let vertex_offset = poly_mesh.positions.len() as u32;
            poly_mesh
                .positions
                .extend(positions.map(|p| DVec3::from(p.map(f64::from))));
            let vertex_count = poly_mesh.positions.len() as u32 - vertex_offset;

            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..vertex_count).collect(),
            };

            poly_mesh.faces.extend(
                indices
                    .into_iter()
                    .tuples()
                    .map(|(a, b, c)| vec![a + vertex_offset, b + vertex_offset, c + vertex_offset]),
            );
        }

        let mesh_id = scene.add_mesh(poly_mesh);
        self.gltf_mesh_to_mesh.insert(mesh.index(), mesh_id);

        Ok(mesh_id)
    }

    fn load_camera(&mut self, scene: &mut Scene, camera: &gltf::Camera) -> ObjectData {
        let perspective = match camera.projection() {
            Projection::Perspective(perspective) => perspective,
            Projection::Orthographic(_) => {
                return ObjectData::Other("ORTHOGRAPHIC_CAMERA".to_string());
            }
        };

        let camera_id = *self
            .gltf_camera_to_camera
            .entry(camera.index())
            .or_insert_with(|| {
                let name = camera
                    .name()
                    .map(String::from)
                    .unwrap_or_else(|| format!("Camera.{:03}", camera.index()));

                scene.add_camera(Camera::from_perspective(
                    name,
                    f64::from(perspective.yfov()),
                    f64::from(perspective.aspect_ratio().unwrap_or(1.0)),
                ))
            });

        ObjectData::Camera(camera_id)
    }

    fn load_light(
        &mut self,
        scene: &mut Scene,
        light: &gltf::khr_lights_punctual::Light,
    ) -> LightId {
        *self
            .gltf_light_to_light
            .entry(light.index())
            .or_insert_with(|| {
                let name = light
                    .name()
                    .map(String::from)
                    .unwrap_or_else(|| format!("Light.{:03}", light.index()));

                let kind = match light.kind() {
                    Kind::Directional => LightKind::Sun,
                    Kind::Point => LightKind::Point,
                    Kind::Spot { .. } => LightKind::Spot,
                };

                scene.add_light(Light::new(
                    name,
                    kind,
                    f64::from(light.intensity()),
                    light.color().map(f64::from),
                ))
            })
    }
}


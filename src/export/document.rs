//! In-memory form of a `.fs` scene file.
//!
//! `objects` and `objectdata` are both in traversal order but are not index
//! aligned: an object refers to its data record by name through `data`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub objects: Vec<ObjectRecord>,
    pub objectdata: Vec<ObjectDataRecord>,
}

impl ExportDocument {
    /// Looks up the data record an object refers to.
    pub fn data_for(&self, object: &ObjectRecord) -> Option<&ObjectDataRecord> {
        if object.data.is_empty() {
            return None;
        }

        self.objectdata
            .iter()
            .find(|record| record.name() == object.data)
    }

    /// Where the first NaN or infinite number sits. JSON has no spelling for
    /// them, so such a document cannot be written and read back.
    pub fn find_non_finite(&self) -> Option<String> {
        if let Some(object) = self
            .objects
            .iter()
            .find(|object| object.matrix.iter().any(|row| !all_finite(row)))
        {
            return Some(format!("matrix of object {}", object.name));
        }

        self.objectdata
            .iter()
            .find(|record| match record {
                ObjectDataRecord::Mesh(mesh) => !all_finite(&mesh.vertices),
                ObjectDataRecord::Light(light) => {
                    !all_finite(&light.color) || !light.energy.is_finite()
                }
                ObjectDataRecord::Camera(camera) => !all_finite(&[
                    camera.fov_vertical,
                    camera.fov_horizontal,
                    camera.fov_diagonal,
                ]),
            })
            .map(|record| format!("data record {}", record.name()))
    }
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|value| value.is_finite())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ObjectKind {
    Mesh,
    Light,
    Camera,
    Empty,
}

impl ObjectKind {
    /// Tag appended to a data block's name to form its record name.
    pub fn data_suffix(self) -> &'static str {
        match self {
            ObjectKind::Mesh => "(mesh)",
            ObjectKind::Light => "(light)",
            ObjectKind::Camera => "(camera)",
            ObjectKind::Empty => "",
        }
    }

    pub fn data_name(self, block_name: &str) -> String {
        match self {
            ObjectKind::Empty => String::new(),
            _ => format!("{}{}", block_name, self.data_suffix()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    /// Local transform, one inner array per matrix row.
    pub matrix: [[f64; 4]; 4],
    /// Name of the matching `objectdata` entry, empty for EMPTY objects.
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjectDataRecord {
    Mesh(MeshRecord),
    Light(LightRecord),
    Camera(CameraRecord),
}

impl ObjectDataRecord {
    pub fn name(&self) -> &str {
        match self {
            ObjectDataRecord::Mesh(mesh) => &mesh.name,
            ObjectDataRecord::Light(light) => &light.name,
            ObjectDataRecord::Camera(camera) => &camera.name,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectDataRecord::Mesh(_) => ObjectKind::Mesh,
            ObjectDataRecord::Light(_) => ObjectKind::Light,
            ObjectDataRecord::Camera(_) => ObjectKind::Camera,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshRecord {
    pub name: String,
    /// x, y, z per vertex.
    pub vertices: Vec<f64>,
    /// Three vertex indices per triangle.
    pub indices: Vec<u32>,
}

impl MeshRecord {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub energy: f64,
    pub color: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraRecord {
    pub name: String,
    pub fov_vertical: f64,
    pub fov_horizontal: f64,
    pub fov_diagonal: f64,
}

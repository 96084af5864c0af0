use log::debug;

use crate::asset_pipeline::triangulate::{EditMesh, NgonMethod, QuadMethod};
use crate::export::document::{MeshRecord, ObjectKind};
use crate::scene_graph::PolyMesh;

/// Flattens a triangulated copy of `mesh` into vertex and index buffers.
/// Normals and texture coordinates are not written.
pub fn serialize_mesh(
    mesh: &PolyMesh,
    quad_method: QuadMethod,
    ngon_method: NgonMethod,
) -> MeshRecord {
    let mut edit_mesh = EditMesh::from_mesh(mesh);
    let stats = edit_mesh.triangulate(quad_method, ngon_method);

    debug!(
        "Mesh {}: {} faces -> {} triangles ({} dropped)",
        mesh.name,
        mesh.face_count(),
        stats.triangles,
        stats.dropped_faces
    );

    let mut vertices = Vec::with_capacity(edit_mesh.positions.len() * 3);
    let mut indices = Vec::with_capacity(stats.triangles * 3);

    for position in &edit_mesh.positions {
        vertices.extend(position.to_array());
    }

    for face in &edit_mesh.faces {
        indices.extend(face.iter().copied());
    }

    MeshRecord {
        name: ObjectKind::Mesh.data_name(&mesh.name),
        vertices,
        indices,
    }
}

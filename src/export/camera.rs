use crate::export::document::{CameraRecord, ObjectKind};
use crate::scene_graph::Camera;

/// Angles are copied as the host resolved them, in radians.
pub fn serialize_camera(camera: &Camera) -> CameraRecord {
    CameraRecord {
        name: ObjectKind::Camera.data_name(&camera.name),
        fov_vertical: camera.fov_vertical,
        fov_horizontal: camera.fov_horizontal,
        fov_diagonal: camera.fov_diagonal,
    }
}

pub mod data;
pub mod gltf_import;
pub mod object3d;
pub mod scene;

// Re-export main types for convenience
pub use data::{Camera, CameraId, Light, LightId, LightKind, MeshId, PolyMesh};
pub use object3d::{Object3D, ObjectData, ObjectId};
pub use scene::Scene;

//! Exports a 3D scene (meshes, lights, cameras and their local transforms)
//! to the JSON based `.fs` scene format read by the game engine runtime.

pub mod asset_pipeline;
pub mod error;
pub mod export;
pub mod scene_graph;

pub use error::ExportError;
pub use export::{build_document, export_scene, ExportDocument, ExportSettings, ExportSummary};
pub use scene_graph::Scene;

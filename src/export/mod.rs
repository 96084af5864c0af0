pub mod camera;
pub mod document;
pub mod light;
pub mod mesh;
pub mod settings;
pub mod walker;
pub mod writer;

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::ExportError;
use crate::scene_graph::Scene;

pub use document::{
    CameraRecord, ExportDocument, LightRecord, MeshRecord, ObjectDataRecord, ObjectKind,
    ObjectRecord,
};
pub use settings::{
    with_default_extension, ColorSource, ExportSettings, FILE_EXTENSION, FILTER_GLOB,
};
pub use walker::build_document;
pub use writer::write_document;

/// What a finished export wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub objects: usize,
    pub object_data: usize,
}

/// Walks `scene` and writes the result to `path`, replacing any existing file.
/// The path is used as given; see [`with_default_extension`].
pub fn export_scene(
    scene: &Scene,
    path: impl AsRef<Path>,
    settings: &ExportSettings,
) -> Result<ExportSummary, ExportError> {
    let path = path.as_ref();
    info!(
        "Exporting {} to {}",
        if settings.selected_only { "selection" } else { "scene" },
        path.display()
    );
    debug!(
        "Color source {} is reserved and does not affect the export",
        settings.color_source.option_id()
    );

    let document = build_document(scene, settings);
    write_document(&document, path, settings.human_readable)?;

    let summary = ExportSummary {
        path: path.to_path_buf(),
        objects: document.objects.len(),
        object_data: document.objectdata.len(),
    };
    info!(
        "Wrote {} objects and {} data records to {}",
        summary.objects,
        summary.object_data,
        path.display()
    );

    Ok(summary)
}

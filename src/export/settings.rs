use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::asset_pipeline::triangulate::{NgonMethod, QuadMethod};

pub const FILE_EXTENSION: &str = "fs";
pub const FILTER_GLOB: &str = "*.fs";

/// Where vertex colors would come from. Reserved: no serializer reads it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSource {
    #[default]
    MaterialDisplayColor,
    ObjectColor,
    None,
}

impl ColorSource {
    pub fn option_id(self) -> &'static str {
        match self {
            ColorSource::MaterialDisplayColor => "OPT_A",
            ColorSource::ObjectColor => "OPT_B",
            ColorSource::None => "OPT_C",
        }
    }

    pub fn from_option_id(id: &str) -> Option<Self> {
        match id {
            "OPT_A" => Some(ColorSource::MaterialDisplayColor),
            "OPT_B" => Some(ColorSource::ObjectColor),
            "OPT_C" => Some(ColorSource::None),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportSettings {
    /// Indented output instead of compact output.
    pub human_readable: bool,
    /// Export the selection instead of the whole scene.
    pub selected_only: bool,
    pub color_source: ColorSource,
    pub quad_method: QuadMethod,
    pub ngon_method: NgonMethod,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            human_readable: true,
            selected_only: false,
            color_source: ColorSource::default(),
            quad_method: QuadMethod::Beauty,
            ngon_method: NgonMethod::Beauty,
        }
    }
}

/// Appends `.fs` unless the path already ends with it (in any case).
pub fn with_default_extension(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();

    match path.extension() {
        Some(extension) if extension.eq_ignore_ascii_case(FILE_EXTENSION) => path.to_path_buf(),
        _ => {
            let mut with_extension = OsString::from(path.as_os_str());
            with_extension.push(".");
            with_extension.push(FILE_EXTENSION);
            PathBuf::from(with_extension)
        }
    }
}

pub mod triangulate;

pub use triangulate::{EditMesh, NgonMethod, QuadMethod, TriangulateStats};

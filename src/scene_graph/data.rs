use glam::DVec3;
use id_arena::Id;

pub type MeshId = Id<PolyMesh>;
pub type LightId = Id<Light>;
pub type CameraId = Id<Camera>;

/// Polygon mesh as the host stores it: shared vertex positions and faces of
/// any arity, each face listing vertex indices in winding order.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyMesh {
    pub name: String,
    pub positions: Vec<DVec3>,
    pub faces: Vec<Vec<u32>>,
}

impl PolyMesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            positions: Vec::new(),
            faces: Vec::new(),
        }
    }

    pub fn with_geometry(
        name: impl Into<String>,
        positions: Vec<DVec3>,
        faces: Vec<Vec<u32>>,
    ) -> Self {
        Self {
            name: name.into(),
            positions,
            faces,
        }
    }

    /// Axis-aligned cube centered on the origin: 8 vertices, 6 outward-facing quads.
    pub fn cube(name: impl Into<String>, size: f64) -> Self {
        let h = size * 0.5;
        let positions = vec![
            DVec3::new(-h, -h, -h),
            DVec3::new(h, -h, -h),
            DVec3::new(h, h, -h),
            DVec3::new(-h, h, -h),
            DVec3::new(-h, -h, h),
            DVec3::new(h, -h, h),
            DVec3::new(h, h, h),
            DVec3::new(-h, h, h),
        ];

        let faces = vec![
            vec![0, 3, 2, 1],
            vec![4, 5, 6, 7],
            vec![0, 1, 5, 4],
            vec![1, 2, 6, 5],
            vec![2, 3, 7, 6],
            vec![3, 0, 4, 7],
        ];

        Self::with_geometry(name, positions, faces)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LightKind {
    Point,
    Sun,
    Spot,
    Area,
    /// Anything else the host reports; written out verbatim.
    Other(String),
}

impl LightKind {
    pub fn as_str(&self) -> &str {
        match self {
            LightKind::Point => "POINT",
            LightKind::Sun => "SUN",
            LightKind::Spot => "SPOT",
            LightKind::Area => "AREA",
            LightKind::Other(kind) => kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub name: String,
    pub kind: LightKind,
    pub energy: f64,
    pub color: [f64; 3],
}

impl Light {
    pub fn new(name: impl Into<String>, kind: LightKind, energy: f64, color: [f64; 3]) -> Self {
        Self {
            name: name.into(),
            kind,
            energy,
            color,
        }
    }
}

/// Camera with its field of view resolved along three axes, in radians.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub name: String,
    pub fov_vertical: f64,
    pub fov_horizontal: f64,
    pub fov_diagonal: f64,
}

impl Camera {
    pub fn new(
        name: impl Into<String>,
        fov_vertical: f64,
        fov_horizontal: f64,
        fov_diagonal: f64,
    ) -> Self {
        Self {
            name: name.into(),
            fov_vertical,
            fov_horizontal,
            fov_diagonal,
        }
    }

    /// Resolves the horizontal and diagonal angles of a perspective camera
    /// from its vertical field of view and width/height ratio.
    pub fn from_perspective(name: impl Into<String>, yfov: f64, aspect_ratio: f64) -> Self {
        let v = (yfov * 0.5).tan();
        let h = aspect_ratio * v;

        Self::new(
            name,
            yfov,
            2.0 * h.atan(),
            2.0 * (v * v + h * h).sqrt().atan(),
        )
    }
}

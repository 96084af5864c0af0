use std::collections::HashMap;

use glam::{DVec2, DVec3};
use log::warn;

use crate::scene_graph::PolyMesh;

/// How quads are split into two triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuadMethod {
    /// Split along the diagonal giving the better shaped pair of triangles.
    #[default]
    Beauty,
    /// Always split between the first and third corner.
    Fixed,
    /// Split along the shorter diagonal.
    ShortEdge,
}

/// How polygons with more than four corners are triangulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NgonMethod {
    /// Clip the best shaped ear each step, then flip internal diagonals
    /// wherever that improves the worse of the two adjacent triangles.
    #[default]
    Beauty,
    /// Clip the first valid ear each step.
    EarClip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriangulateStats {
    pub triangles: usize,
    pub dropped_faces: usize,
}

/// Editable copy of a polygon mesh. Triangulation rewrites the faces of the
/// copy and never touches the mesh it was built from.
#[derive(Debug, Clone)]
pub struct EditMesh {
    pub name: String,
    pub positions: Vec<DVec3>,
    pub faces: Vec<Vec<u32>>,
}

impl EditMesh {
    pub fn from_mesh(mesh: &PolyMesh) -> Self {
        Self {
            name: mesh.name.clone(),
            positions: mesh.positions.clone(),
            faces: mesh.faces.clone(),
        }
    }

    /// Replaces every face with triangles. Vertices are neither added nor
    /// removed. Faces with fewer than three corners or with out-of-range
    /// vertex indices are dropped.
    pub fn triangulate(
        &mut self,
        quad_method: QuadMethod,
        ngon_method: NgonMethod,
    ) -> TriangulateStats {
        let mut stats = TriangulateStats::default();
        let mut triangles: Vec<[u32; 3]> = Vec::with_capacity(self.faces.len() * 2);

        for (face_index, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                warn!(
                    "Dropping face {} of {}: only {} corners",
                    face_index,
                    self.name,
                    face.len()
                );
                stats.dropped_faces += 1;
                continue;
            }

            if let Some(&index) = face.iter().find(|&&i| i as usize >= self.positions.len()) {
                warn!(
                    "Dropping face {} of {}: vertex {} out of range ({} vertices)",
                    face_index,
                    self.name,
                    index,
                    self.positions.len()
                );
                stats.dropped_faces += 1;
                continue;
            }

            match face.as_slice() {
                &[a, b, c] => triangles.push([a, b, c]),
                &[a, b, c, d] => {
                    triangles.extend(split_quad([a, b, c, d], &self.positions, quad_method))
                }
                _ => triangles.extend(split_ngon(face, &self.positions, ngon_method)),
            }
        }

        stats.triangles = triangles.len();
        self.faces = triangles.into_iter().map(Vec::from).collect();

        stats
    }

    pub fn is_triangulated(&self) -> bool {
        self.faces.iter().all(|face| face.len() == 3)
    }
}

/// Shape quality of a triangle: 1 for equilateral, approaching 0 as it degenerates.
pub fn triangle_quality(a: DVec3, b: DVec3, c: DVec3) -> f64 {
    let area = 0.5 * (b - a).cross(c - a).length();
    let edge_sum = a.distance_squared(b) + b.distance_squared(c) + c.distance_squared(a);

    if edge_sum <= f64::MIN_POSITIVE {
        return 0.0;
    }

    4.0 * 3f64.sqrt() * area / edge_sum
}

/// Newell's method; the length is twice the polygon's area.
fn newell_normal(points: &[DVec3]) -> DVec3 {
    let mut normal = DVec3::ZERO;

    for (i, current) in points.iter().enumerate() {
        let next = points[(i + 1) % points.len()];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }

    normal
}

// Sine of the corner angle below which a triangle counts as flat.
const FLAT_SINE: f64 = 1e-10;

fn faces_along(a: DVec3, b: DVec3, c: DVec3, normal: DVec3) -> bool {
    let ab = b - a;
    let ac = c - a;
    ab.cross(ac).dot(normal) > FLAT_SINE * ab.length() * ac.length() * normal.length()
}

fn is_ccw(a: DVec2, b: DVec2, c: DVec2) -> bool {
    let ab = b - a;
    let ac = c - a;
    ab.perp_dot(ac) > FLAT_SINE * ab.length() * ac.length()
}

fn split_quad(quad: [u32; 4], positions: &[DVec3], method: QuadMethod) -> [[u32; 3]; 2] {
    let [a, b, c, d] = quad;
    let split_ac = [[a, b, c], [a, c, d]];
    let split_bd = [[b, c, d], [b, d, a]];
    let p = |i: u32| positions[i as usize];

    match method {
        QuadMethod::Fixed => split_ac,
        QuadMethod::ShortEdge => {
            if p(b).distance_squared(p(d)) < p(a).distance_squared(p(c)) {
                split_bd
            } else {
                split_ac
            }
        }
        QuadMethod::Beauty => {
            let normal = newell_normal(&[p(a), p(b), p(c), p(d)]);

            let score = |split: &[[u32; 3]; 2]| {
                let valid = split
                    .iter()
                    .all(|&[x, y, z]| faces_along(p(x), p(y), p(z), normal));
                let quality = split
                    .iter()
                    .map(|&[x, y, z]| triangle_quality(p(x), p(y), p(z)))
                    .fold(f64::INFINITY, f64::min);
                (valid, quality)
            };

            let (ac_valid, ac_quality) = score(&split_ac);
            let (bd_valid, bd_quality) = score(&split_bd);

            match (ac_valid, bd_valid) {
                (false, true) => split_bd,
                (true, false) => split_ac,
                _ if bd_quality > ac_quality + 1e-12 => split_bd,
                _ => split_ac,
            }
        }
    }
}

fn fan(face: &[u32]) -> Vec<[u32; 3]> {
    (1..face.len() - 1)
        .map(|i| [face[0], face[i], face[i + 1]])
        .collect()
}

/// Planar projection of a polygon with counter-clockwise winding.
fn project_ccw(points: &[DVec3], normal: DVec3) -> Vec<DVec2> {
    let (u, v) = normal.normalize().any_orthonormal_pair();
    let mut projected: Vec<DVec2> = points
        .iter()
        .map(|p| DVec2::new(p.dot(u), p.dot(v)))
        .collect();

    let doubled_area: f64 = (0..projected.len())
        .map(|i| projected[i].perp_dot(projected[(i + 1) % projected.len()]))
        .sum();

    if doubled_area < 0.0 {
        for point in &mut projected {
            point.y = -point.y;
        }
    }

    projected
}

fn point_in_triangle(point: DVec2, a: DVec2, b: DVec2, c: DVec2) -> bool {
    (b - a).perp_dot(point - a) >= 0.0
        && (c - b).perp_dot(point - b) >= 0.0
        && (a - c).perp_dot(point - c) >= 0.0
}

fn split_ngon(face: &[u32], positions: &[DVec3], method: NgonMethod) -> Vec<[u32; 3]> {
    let points: Vec<DVec3> = face.iter().map(|&i| positions[i as usize]).collect();
    let normal = newell_normal(&points);

    if normal.length_squared() <= f64::MIN_POSITIVE {
        return fan(face);
    }

    let projected = project_ccw(&points, normal);
    let mut triangles = clip_ears(&points, &projected, method);

    if method == NgonMethod::Beauty {
        flip_diagonals(&points, &projected, &mut triangles);
    }

    triangles
        .into_iter()
        .map(|[a, b, c]| [face[a], face[b], face[c]])
        .collect()
}

// Corner positions within the face are linked in a ring. Clipping a corner
// only changes the ear status of its two neighbours, so only those are
// tested again.
struct EarClipper<'a> {
    points: &'a [DVec3],
    projected: &'a [DVec2],
    prev: Vec<usize>,
    next: Vec<usize>,
    reflex: Vec<bool>,
    // Every corner that has been reflex at some point; only these can lie
    // inside a candidate ear.
    reflex_corners: Vec<usize>,
    alive: Vec<bool>,
    ears: Vec<Option<f64>>,
    start: usize,
    remaining: usize,
}

impl<'a> EarClipper<'a> {
    fn new(points: &'a [DVec3], projected: &'a [DVec2]) -> Self {
        let count = points.len();
        let mut clipper = Self {
            points,
            projected,
            prev: (0..count).map(|i| (i + count - 1) % count).collect(),
            next: (0..count).map(|i| (i + 1) % count).collect(),
            reflex: vec![false; count],
            reflex_corners: Vec::new(),
            alive: vec![true; count],
            ears: vec![None; count],
            start: 0,
            remaining: count,
        };

        for corner in 0..count {
            if !clipper.is_convex(corner) {
                clipper.reflex[corner] = true;
                clipper.reflex_corners.push(corner);
            }
        }
        for corner in 0..count {
            clipper.ears[corner] = clipper.ear_quality(corner);
        }

        clipper
    }

    fn is_convex(&self, corner: usize) -> bool {
        let p = self.projected;
        is_ccw(p[self.prev[corner]], p[corner], p[self.next[corner]])
    }

    fn ear_quality(&self, corner: usize) -> Option<f64> {
        if self.reflex[corner] {
            return None;
        }

        let (prev, next) = (self.prev[corner], self.next[corner]);
        let (a, b, c) = (self.projected[prev], self.projected[corner], self.projected[next]);

        let blocked = self
            .reflex_corners
            .iter()
            .filter(|&&i| self.alive[i] && self.reflex[i])
            .filter(|&&i| i != prev && i != corner && i != next)
            .map(|&i| self.projected[i])
            .filter(|&p| p != a && p != b && p != c)
            .any(|p| point_in_triangle(p, a, b, c));

        if blocked {
            return None;
        }

        Some(triangle_quality(
            self.points[prev],
            self.points[corner],
            self.points[next],
        ))
    }

    fn refresh(&mut self, corner: usize) {
        let reflex = !self.is_convex(corner);
        if reflex && !self.reflex[corner] {
            self.reflex_corners.push(corner);
        }
        self.reflex[corner] = reflex;
        self.ears[corner] = self.ear_quality(corner);
    }

    fn ring(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(Some(self.start), |&corner| Some(self.next[corner]))
            .take(self.remaining)
    }

    fn pick(&self, method: NgonMethod) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;

        for corner in self.ring() {
            let Some(quality) = self.ears[corner] else {
                continue;
            };

            if method == NgonMethod::EarClip {
                return Some(corner);
            }

            if best.map_or(true, |(_, best_quality)| quality > best_quality) {
                best = Some((corner, quality));
            }
        }

        best.map(|(corner, _)| corner)
    }

    fn clip(&mut self, corner: usize) -> [usize; 3] {
        let (prev, next) = (self.prev[corner], self.next[corner]);

        self.next[prev] = next;
        self.prev[next] = prev;
        self.alive[corner] = false;
        self.ears[corner] = None;
        self.remaining -= 1;
        if self.start == corner {
            self.start = next;
        }

        self.refresh(prev);
        self.refresh(next);

        [prev, corner, next]
    }
}

fn clip_ears(points: &[DVec3], projected: &[DVec2], method: NgonMethod) -> Vec<[usize; 3]> {
    let mut clipper = EarClipper::new(points, projected);
    let mut triangles = Vec::with_capacity(points.len() - 2);

    while clipper.remaining > 3 {
        let corner = match clipper.pick(method) {
            Some(corner) => corner,
            None => {
                let ring: Vec<usize> = clipper.ring().collect();
                for &corner in &ring {
                    clipper.refresh(corner);
                }

                let Some(corner) = clipper.pick(method) else {
                    // Nothing clippable left (collinear or self-intersecting); fan the rest.
                    triangles.extend((1..ring.len() - 1).map(|i| [ring[0], ring[i], ring[i + 1]]));
                    return triangles;
                };
                corner
            }
        };

        triangles.push(clipper.clip(corner));
    }

    let last = clipper.start;
    triangles.push([clipper.prev[last], last, clipper.next[last]]);
    triangles
}

// Directed edge to the triangle on its left and that triangle's third corner.
type EdgeOwners = HashMap<(usize, usize), (usize, usize)>;

fn link(owners: &mut EdgeOwners, [a, b, c]: [usize; 3], index: usize) {
    owners.insert((a, b), (index, c));
    owners.insert((b, c), (index, a));
    owners.insert((c, a), (index, b));
}

fn unlink(owners: &mut EdgeOwners, [a, b, c]: [usize; 3]) {
    owners.remove(&(a, b));
    owners.remove(&(b, c));
    owners.remove(&(c, a));
}

/// Flips internal diagonals while that improves the worse triangle of the
/// pair. Only the edges around a flipped pair are queued again.
fn flip_diagonals(points: &[DVec3], projected: &[DVec2], triangles: &mut [[usize; 3]]) {
    let quality = |[a, b, c]: [usize; 3]| triangle_quality(points[a], points[b], points[c]);

    let mut owners = EdgeOwners::with_capacity(triangles.len() * 3);
    let mut pending = Vec::with_capacity(triangles.len() * 3);
    for (index, &triangle) in triangles.iter().enumerate() {
        link(&mut owners, triangle, index);
        let [a, b, c] = triangle;
        pending.extend([(a, b), (b, c), (c, a)].into_iter().filter(|&(x, y)| x < y));
    }

    let mut flips_left = triangles.len() * triangles.len();

    while let Some((x, y)) = pending.pop() {
        if flips_left == 0 {
            break;
        }

        let (Some(&(i, o1)), Some(&(j, o2))) = (owners.get(&(x, y)), owners.get(&(y, x))) else {
            continue;
        };

        // The pair spans the quad x, o2, y, o1.
        let first = [x, o2, o1];
        let second = [o2, y, o1];

        let convex = is_ccw(projected[x], projected[o2], projected[o1])
            && is_ccw(projected[o2], projected[y], projected[o1]);
        if !convex {
            continue;
        }

        let before = quality(triangles[i]).min(quality(triangles[j]));
        let after = quality(first).min(quality(second));

        if after > before + 1e-9 {
            unlink(&mut owners, triangles[i]);
            unlink(&mut owners, triangles[j]);
            triangles[i] = first;
            triangles[j] = second;
            link(&mut owners, first, i);
            link(&mut owners, second, j);

            pending.extend([(x, o2), (o2, y), (y, o1), (o1, x)]);
            flips_left -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_mesh(points: &[(f64, f64)]) -> PolyMesh {
        let positions = points.iter().map(|&(x, y)| DVec3::new(x, y, 0.0)).collect();
        let face = (0..points.len() as u32).collect();
        PolyMesh::with_geometry("Flat", positions, vec![face])
    }

    fn signed_area(mesh: &EditMesh, face: &[u32]) -> f64 {
        let p = |i: u32| mesh.positions[i as usize];
        0.5 * (p(face[1]) - p(face[0])).cross(p(face[2]) - p(face[0])).z
    }

    #[test]
    fn cube_becomes_twelve_triangles() {
        let cube = PolyMesh::cube("Cube", 2.0);
        let mut edit = EditMesh::from_mesh(&cube);
        let stats = edit.triangulate(QuadMethod::Beauty, NgonMethod::Beauty);

        assert_eq!(stats.triangles, 12);
        assert_eq!(stats.dropped_faces, 0);
        assert!(edit.is_triangulated());
        assert_eq!(edit.positions.len(), 8);
        assert!(edit.faces.iter().flatten().all(|&i| i < 8));
    }

    #[test]
    fn source_mesh_is_untouched() {
        let cube = PolyMesh::cube("Cube", 1.0);
        let before = cube.clone();
        let mut edit = EditMesh::from_mesh(&cube);
        edit.triangulate(QuadMethod::Beauty, NgonMethod::Beauty);

        assert_eq!(cube, before);
        assert!(cube.faces.iter().all(|face| face.len() == 4));
    }

    #[test]
    fn beauty_picks_the_fatter_split() {
        let mesh = flat_mesh(&[(-2.0, 0.0), (0.0, -0.5), (2.0, 0.0), (0.0, 0.5)]);

        let mut beauty = EditMesh::from_mesh(&mesh);
        beauty.triangulate(QuadMethod::Beauty, NgonMethod::Beauty);
        assert_eq!(beauty.faces, vec![vec![1, 2, 3], vec![1, 3, 0]]);

        let mut fixed = EditMesh::from_mesh(&mesh);
        fixed.triangulate(QuadMethod::Fixed, NgonMethod::Beauty);
        assert_eq!(fixed.faces, vec![vec![0, 1, 2], vec![0, 2, 3]]);

        let mut short = EditMesh::from_mesh(&mesh);
        short.triangulate(QuadMethod::ShortEdge, NgonMethod::Beauty);
        assert_eq!(short.faces, beauty.faces);
    }

    #[test]
    fn beauty_never_splits_a_concave_quad_outside() {
        let mesh = flat_mesh(&[(0.0, 0.0), (2.0, 0.0), (0.5, 0.5), (0.0, 2.0)]);
        let mut edit = EditMesh::from_mesh(&mesh);
        edit.triangulate(QuadMethod::Beauty, NgonMethod::Beauty);

        assert_eq!(edit.faces, vec![vec![0, 1, 2], vec![0, 2, 3]]);
    }

    #[test]
    fn concave_ngon_is_tiled_exactly() {
        let mesh = flat_mesh(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 2.0),
            (0.0, 2.0),
        ]);

        for method in [NgonMethod::Beauty, NgonMethod::EarClip] {
            let mut edit = EditMesh::from_mesh(&mesh);
            let stats = edit.triangulate(QuadMethod::Beauty, method);

            assert_eq!(stats.triangles, 4);
            let areas: Vec<f64> = edit.faces.iter().map(|f| signed_area(&edit, f)).collect();
            assert!(areas.iter().all(|&area| area > 0.0), "{:?}", areas);
            assert!((areas.iter().sum::<f64>() - 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn beauty_avoids_slivers_in_a_regular_polygon() {
        let points: Vec<(f64, f64)> = (0..8)
            .map(|i| {
                let angle = i as f64 * std::f64::consts::TAU / 8.0;
                (angle.cos(), angle.sin())
            })
            .collect();
        let mesh = flat_mesh(&points);

        let worst = |method| {
            let mut edit = EditMesh::from_mesh(&mesh);
            edit.triangulate(QuadMethod::Beauty, method);
            edit.faces
                .iter()
                .map(|f| {
                    let p = |k: usize| edit.positions[f[k] as usize];
                    triangle_quality(p(0), p(1), p(2))
                })
                .fold(f64::INFINITY, f64::min)
        };

        assert!(worst(NgonMethod::Beauty) >= worst(NgonMethod::EarClip));
    }

    #[test]
    fn clockwise_faces_keep_their_winding() {
        let mesh = flat_mesh(&[(0.0, 0.0), (0.0, 1.0), (1.0, 2.0), (2.0, 1.0), (2.0, 0.0)]);
        let mut edit = EditMesh::from_mesh(&mesh);
        edit.triangulate(QuadMethod::Beauty, NgonMethod::Beauty);

        assert_eq!(edit.faces.len(), 3);
        assert!(edit.faces.iter().all(|f| signed_area(&edit, f) < 0.0));
    }

    #[test]
    fn collinear_polygon_falls_back_to_a_fan() {
        let mesh = flat_mesh(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)]);
        let mut edit = EditMesh::from_mesh(&mesh);
        let stats = edit.triangulate(QuadMethod::Beauty, NgonMethod::Beauty);

        assert_eq!(stats.triangles, 3);
        assert_eq!(edit.faces[0], vec![0, 1, 2]);
    }

    #[test]
    fn malformed_faces_are_dropped() {
        let mut mesh = PolyMesh::cube("Cube", 1.0);
        mesh.faces.push(vec![0, 1]);
        mesh.faces.push(vec![0, 1, 99]);

        let mut edit = EditMesh::from_mesh(&mesh);
        let stats = edit.triangulate(QuadMethod::Beauty, NgonMethod::Beauty);

        assert_eq!(stats.dropped_faces, 2);
        assert_eq!(stats.triangles, 12);
    }

    #[test]
    fn empty_mesh_stays_empty() {
        let mut edit = EditMesh::from_mesh(&PolyMesh::new("Empty"));
        let stats = edit.triangulate(QuadMethod::Beauty, NgonMethod::Beauty);

        assert_eq!(stats, TriangulateStats::default());
        assert!(edit.faces.is_empty());
    }

    fn star(corners: usize, inner: f64) -> Vec<(f64, f64)> {
        (0..corners)
            .map(|i| {
                let angle = i as f64 * std::f64::consts::TAU / corners as f64;
                let radius = if i % 2 == 0 { 1.0 } else { inner };
                (radius * angle.cos(), radius * angle.sin())
            })
            .collect()
    }

    fn shoelace(points: &[(f64, f64)]) -> f64 {
        let n = points.len();
        0.5 * (0..n)
            .map(|i| {
                let (x0, y0) = points[i];
                let (x1, y1) = points[(i + 1) % n];
                x0 * y1 - x1 * y0
            })
            .sum::<f64>()
    }

    #[test]
    fn star_polygons_are_tiled_exactly() {
        for (corners, inner) in [(10, 0.4), (24, 0.7), (60, 0.2), (101, 0.9)] {
            let points = star(corners, inner);
            let mesh = flat_mesh(&points);

            for method in [NgonMethod::Beauty, NgonMethod::EarClip] {
                let mut edit = EditMesh::from_mesh(&mesh);
                let stats = edit.triangulate(QuadMethod::Beauty, method);

                assert_eq!(stats.triangles, corners - 2);
                let areas: Vec<f64> = edit.faces.iter().map(|f| signed_area(&edit, f)).collect();
                assert!(areas.iter().all(|&area| area > 0.0), "{} corners", corners);
                let total: f64 = areas.iter().sum();
                assert!((total - shoelace(&points)).abs() < 1e-9, "{} corners", corners);
            }
        }
    }

    #[test]
    fn thousand_corner_polygon_is_fast() {
        let points = star(1000, 0.8);
        let mesh = flat_mesh(&points);

        let started = std::time::Instant::now();
        let mut edit = EditMesh::from_mesh(&mesh);
        let stats = edit.triangulate(QuadMethod::Beauty, NgonMethod::Beauty);
        let elapsed = started.elapsed();

        assert_eq!(stats.triangles, 998);
        let total: f64 = edit.faces.iter().map(|f| signed_area(&edit, f)).sum();
        assert!((total - shoelace(&points)).abs() < 1e-9);
        assert!(elapsed.as_secs_f64() < 2.0, "took {:?}", elapsed);
    }

    #[test]
    fn equilateral_triangle_has_unit_quality() {
        let q = triangle_quality(
            DVec3::ZERO,
            DVec3::X,
            DVec3::new(0.5, 3f64.sqrt() / 2.0, 0.0),
        );
        assert!((q - 1.0).abs() < 1e-12);
    }
}

//! Indexed polygon mesh with a vertex-to-face reverse index.
//!
//! Faces hold vertex handles rather than positions, so merging coincident
//! vertices gives shared corners a single identity. Normals are always
//! derived from the current positions and winding.

use crate::core::types::DVec3;
use crate::core::{Error, Result};
use crate::math::triangle;

/// Distance below which two polygon corners are merged
pub const MERGE_TOLERANCE: f64 = 1e-8;

/// Corner separation below which a triangle counts as degenerate
pub const DEGENERATE_TOLERANCE: f64 = 1e-7;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub usize);

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    positions: Vec<DVec3>,
    faces: Vec<Vec<VertexId>>,
    /// Faces that reference each vertex, in registration order
    containing: Vec<Vec<FaceId>>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a polygon soup; every corner gets its own vertex.
    pub fn from_polygons(polygons: &[Vec<DVec3>]) -> Self {
        let mut mesh = Self::new();
        for polygon in polygons {
            mesh.add_polygon(polygon);
        }
        mesh
    }

    pub fn add_vertex(&mut self, position: DVec3) -> VertexId {
        self.positions.push(position);
        self.containing.push(Vec::new());
        VertexId(self.positions.len() - 1)
    }

    /// Add a face over existing vertices and register it with each of them.
    pub fn add_face(&mut self, vertices: Vec<VertexId>) -> FaceId {
        let face = FaceId(self.faces.len());
        for v in &vertices {
            self.register(*v, face);
        }
        self.faces.push(vertices);
        face
    }

    /// Add a face whose corners are fresh vertices.
    pub fn add_polygon(&mut self, corners: &[DVec3]) -> FaceId {
        let vertices = corners.iter().map(|p| self.add_vertex(*p)).collect();
        self.add_face(vertices)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn position(&self, v: VertexId) -> DVec3 {
        self.positions[v.0]
    }

    pub fn set_position(&mut self, v: VertexId, position: DVec3) {
        self.positions[v.0] = position;
    }

    pub fn face(&self, f: FaceId) -> &[VertexId] {
        &self.faces[f.0]
    }

    pub fn faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len()).map(FaceId)
    }

    pub fn containing_faces(&self, v: VertexId) -> &[FaceId] {
        &self.containing[v.0]
    }

    fn register(&mut self, v: VertexId, face: FaceId) {
        let faces = &mut self.containing[v.0];
        if !faces.contains(&face) {
            faces.push(face);
        }
    }

    fn deregister(&mut self, v: VertexId, face: FaceId) {
        self.containing[v.0].retain(|f| *f != face);
    }

    /// Corner positions of a triangle, or a contract violation for any other polygon.
    pub fn triangle(&self, f: FaceId) -> Result<[DVec3; 3]> {
        match self.faces[f.0].as_slice() {
            &[a, b, c] => Ok([self.position(a), self.position(b), self.position(c)]),
            other => Err(Error::structure(format!(
                "face {} has {} vertices, expected a triangle",
                f.0,
                other.len()
            ))),
        }
    }

    /// Unit normal from the winding order.
    pub fn face_normal(&self, f: FaceId) -> Result<DVec3> {
        let [a, b, c] = self.triangle(f)?;
        Ok((c - b).cross(a - b).normalize_or_zero())
    }

    pub fn face_area(&self, f: FaceId) -> Result<f64> {
        let [a, b, c] = self.triangle(f)?;
        Ok(triangle::area(a, b, c))
    }

    /// Swap the last two corners so the normal flips.
    pub fn invert(&mut self, f: FaceId) -> Result<()> {
        let face = &mut self.faces[f.0];
        if face.len() != 3 {
            return Err(Error::structure(format!("cannot invert face {} with {} vertices", f.0, face.len())));
        }
        face.swap(1, 2);
        Ok(())
    }

    /// Whether a face is not a triangle or any two of its corners coincide.
    pub fn is_degenerate(&self, f: FaceId, tolerance: f64) -> bool {
        match self.faces[f.0].as_slice() {
            &[a, b, c] => triangle::has_coincident_corners(
                self.position(a),
                self.position(b),
                self.position(c),
                tolerance,
            ),
            _ => true,
        }
    }

    /// Sum of all face areas.
    pub fn area(&self) -> Result<f64> {
        self.faces().map(|f| self.face_area(f)).sum()
    }

    /// Average of the normals of every face containing `v`, as a unit vector.
    pub fn vertex_normal(&self, v: VertexId) -> Result<DVec3> {
        let mut sum = DVec3::ZERO;
        for f in &self.containing[v.0] {
            sum += self.face_normal(*f)?;
        }
        Ok(sum.normalize_or_zero())
    }

    /// Outward normal of the edge `v -> other` within the first face both share.
    ///
    /// Zero when the vertices share no face.
    pub fn edge_normal(&self, v: VertexId, other: VertexId) -> Result<DVec3> {
        let Some(common) = self.containing[v.0]
            .iter()
            .find(|f| self.containing[other.0].contains(f))
            .copied()
        else {
            return Ok(DVec3::ZERO);
        };

        let origin = self.position(v);
        let along = (self.position(other) - origin).normalize_or_zero();
        let mut candidate = self.face_normal(common)?.cross(along).normalize_or_zero();

        for corner in &self.faces[common.0] {
            if *corner == v || *corner == other {
                continue;
            }
            // Must point away from the rest of the face
            let inward = (self.position(*corner) - origin).normalize_or_zero();
            if inward.dot(candidate) >= 0.0 {
                candidate = -candidate;
                break;
            }
        }
        Ok(candidate)
    }

    /// Replace every use of `from` in face `f` with `to`.
    pub fn replace_vertex(&mut self, f: FaceId, from: VertexId, to: VertexId) {
        self.deregister(from, f);
        self.register(to, f);
        for v in self.faces[f.0].iter_mut().filter(|v| **v == from) {
            *v = to;
        }
    }

    /// Fold corners closer than `tolerance` onto the first vertex seen at that spot.
    ///
    /// Faces and corners are visited in order. Returns the surviving vertices
    /// in the order they were first met.
    pub fn merge_vertices(&mut self, tolerance: f64) -> Vec<VertexId> {
        let mut unique: Vec<VertexId> = Vec::new();
        for f in 0..self.faces.len() {
            for corner in 0..self.faces[f].len() {
                let v = self.faces[f][corner];
                let position = self.position(v);
                let existing = unique
                    .iter()
                    .copied()
                    .find(|u| (self.position(*u) - position).length() < tolerance);
                match existing {
                    Some(u) if u != v => self.replace_vertex(FaceId(f), v, u),
                    Some(_) => {}
                    None => unique.push(v),
                }
            }
        }
        unique
    }

    /// Move each vertex along its averaged normal by `offset`.
    ///
    /// All normals are taken before any vertex moves.
    pub fn offset_along_normals(&mut self, vertices: &[VertexId], offset: f64) -> Result<()> {
        let moved = vertices
            .iter()
            .map(|v| -> Result<DVec3> { Ok(self.position(*v) + self.vertex_normal(*v)? * offset) })
            .collect::<Result<Vec<_>>>()?;
        for (v, position) in vertices.iter().zip(moved) {
            self.set_position(*v, position);
        }
        Ok(())
    }

    /// Append every face of `other` with its own copies of the vertices.
    pub fn append(&mut self, other: &Mesh) {
        let base = self.positions.len();
        for p in &other.positions {
            self.add_vertex(*p);
        }
        for face in &other.faces {
            self.add_face(face.iter().map(|v| VertexId(v.0 + base)).collect());
        }
    }

    /// Triangles whose corners are all distinct.
    pub fn triangles(&self) -> impl Iterator<Item = [DVec3; 3]> + '_ {
        self.faces()
            .filter(|f| !self.is_degenerate(*f, DEGENERATE_TOLERANCE))
            .filter_map(|f| self.triangle(f).ok())
    }
}

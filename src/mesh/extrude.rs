//! Thickening an open surface into a closed shell.
//!
//! A surface is offset twice along its averaged vertex normals, the back copy
//! has its winding reversed, and a skirt of triangle pairs joins the two
//! copies along every boundary edge.

use super::surface::{DEGENERATE_TOLERANCE, FaceId, MERGE_TOLERANCE, Mesh, VertexId};
use crate::core::Result;
use crate::core::types::DVec3;

/// Offset copy of `surface` with coincident corners merged.
fn offset_copy(surface: &[Vec<DVec3>], offset: f64) -> Result<Mesh> {
    let mut mesh = Mesh::from_polygons(surface);
    let unique = mesh.merge_vertices(MERGE_TOLERANCE);
    mesh.offset_along_normals(&unique, offset)?;
    Ok(mesh)
}

/// Closed shell spanning `front` to `back` along the surface normals.
///
/// Faces are ordered front, back, skirt.
pub fn extrapolate_surface(surface: &[Vec<DVec3>], front: f64, back: f64) -> Result<Mesh> {
    let mut mesh = offset_copy(surface, front)?;

    let mut back_surface = offset_copy(surface, back)?;
    for f in 0..back_surface.face_count() {
        back_surface.invert(FaceId(f))?;
    }
    mesh.append(&back_surface);

    let mut source = Mesh::from_polygons(surface);
    source.merge_vertices(MERGE_TOLERANCE);
    mesh.append(&edge_surface(&source, front, back)?);
    Ok(mesh)
}

/// Area of the front copy plus its skirt, leaving out the back copy.
pub fn extrapolated_surface_area(surface: &[Vec<DVec3>], front: f64, back: f64) -> Result<f64> {
    let front_surface = offset_copy(surface, front)?;
    let mut source = Mesh::from_polygons(surface);
    source.merge_vertices(MERGE_TOLERANCE);
    let skirt = edge_surface(&source, front, back)?;
    Ok(shell_area(&front_surface)? + shell_area(&skirt)?)
}

/// Sum of triangle areas, skipping degenerate triangles.
fn shell_area(mesh: &Mesh) -> Result<f64> {
    let mut total = 0.0;
    for f in mesh.faces() {
        let area = mesh.face_area(f)?;
        if !mesh.is_degenerate(f, DEGENERATE_TOLERANCE) {
            total += area;
        }
    }
    Ok(total)
}

/// Edges of valid triangles that no other edge repeats in either direction.
pub fn boundary_edges(source: &Mesh) -> Vec<(VertexId, VertexId)> {
    let edges: Vec<(VertexId, VertexId)> = source
        .faces()
        .filter(|f| !source.is_degenerate(*f, DEGENERATE_TOLERANCE))
        .flat_map(|f| {
            let v = source.face(f);
            [(v[0], v[1]), (v[1], v[2]), (v[2], v[0])]
        })
        .collect();

    edges
        .iter()
        .enumerate()
        .filter(|(e, (a, b))| {
            !edges
                .iter()
                .enumerate()
                .any(|(c, (x, y))| c != *e && ((x == a && y == b) || (x == b && y == a)))
        })
        .map(|(_, edge)| *edge)
        .collect()
}

/// Skirt triangles closing the gap between the two offset copies of `source`.
///
/// `source` must already have merged vertices so shared edges are recognized.
pub fn edge_surface(source: &Mesh, front: f64, back: f64) -> Result<Mesh> {
    let mut skirt = Mesh::new();
    for (first, second) in boundary_edges(source) {
        let outward = source.edge_normal(first, second)?;
        let (p1, n1) = (source.position(first), source.vertex_normal(first)?);
        let (p2, n2) = (source.position(second), source.vertex_normal(second)?);

        let front1 = p1 + n1 * front;
        let front2 = p2 + n2 * front;
        let back1 = p1 + n1 * back;
        let back2 = p2 + n2 * back;

        for corners in [[front1, back1, front2], [front2, back1, back2]] {
            let face = skirt.add_polygon(&corners);
            if outward.dot(skirt.face_normal(face)?) < 0.0 {
                skirt.invert(face)?;
            }
        }
    }
    Ok(skirt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn square() -> Vec<Vec<DVec3>> {
        let (a, b, c, d) = (
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        );
        vec![vec![a, b, c], vec![a, c, d]]
    }

    fn key(p: DVec3) -> (i64, i64, i64) {
        ((p.x * 1e6).round() as i64, (p.y * 1e6).round() as i64, (p.z * 1e6).round() as i64)
    }

    /// Every directed edge must be matched by exactly one edge running the other way.
    fn assert_closed(mesh: &Mesh) {
        let mut directed: HashMap<((i64, i64, i64), (i64, i64, i64)), i32> = HashMap::new();
        for [a, b, c] in mesh.triangles() {
            for (from, to) in [(a, b), (b, c), (c, a)] {
                *directed.entry((key(from), key(to))).or_default() += 1;
            }
        }
        for ((from, to), count) in &directed {
            assert_eq!(*count, 1, "edge repeated in the same direction");
            assert_eq!(directed.get(&(*to, *from)), Some(&1), "open edge");
        }
    }

    #[test]
    fn test_square_boundary() {
        let mut source = Mesh::from_polygons(&square());
        source.merge_vertices(MERGE_TOLERANCE);
        // The shared diagonal is interior
        assert_eq!(boundary_edges(&source).len(), 4);
    }

    #[test]
    fn test_single_triangle_shell_is_closed() {
        let surface = vec![vec![DVec3::ZERO, DVec3::X, DVec3::Y]];
        let shell = extrapolate_surface(&surface, 0.5, -0.5).unwrap();
        assert_eq!(shell.face_count(), 8);
        assert_closed(&shell);
        // Back copy faces down
        assert!((shell.face_normal(FaceId(1)).unwrap() + DVec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_square_shell_is_closed() {
        let shell = extrapolate_surface(&square(), 0.01, -0.02).unwrap();
        assert_eq!(shell.face_count(), 12);
        assert_closed(&shell);
    }

    #[test]
    fn test_skirt_faces_point_outward() {
        let mut source = Mesh::from_polygons(&square());
        source.merge_vertices(MERGE_TOLERANCE);
        let skirt = edge_surface(&source, 0.1, -0.1).unwrap();
        let center = DVec3::new(0.5, 0.5, 0.0);
        for f in skirt.faces() {
            let [a, b, c] = skirt.triangle(f).unwrap();
            let centroid = (a + b + c) / 3.0;
            assert!(skirt.face_normal(f).unwrap().dot(centroid - center) > 0.0);
        }
    }

    #[test]
    fn test_sensitive_area_counts_front_and_skirt() {
        let area = extrapolated_surface_area(&square(), 0.03, 0.0).unwrap();
        assert!((area - 1.12).abs() < 1e-12);
    }

    #[test]
    fn test_collapsed_neighbor_keeps_shell_closed() {
        let (a, b, c) = (DVec3::ZERO, DVec3::X, DVec3::Y);
        let surface = vec![vec![a, b, c], vec![a, b, b]];

        let mut source = Mesh::from_polygons(&surface);
        source.merge_vertices(MERGE_TOLERANCE);
        assert!(source.is_degenerate(FaceId(1), DEGENERATE_TOLERANCE));
        let edges = boundary_edges(&source);
        assert_eq!(edges.len(), 3);
        assert!(edges.iter().all(|(x, y)| x != y));

        let shell = extrapolate_surface(&surface, 0.5, -0.5).unwrap();
        assert_eq!(shell.triangles().count(), 8);
        assert_closed(&shell);
    }

    #[test]
    fn test_degenerate_triangle_does_not_throw() {
        let mut surface = square();
        surface.push(vec![
            DVec3::new(5.0, 5.0, 0.0),
            DVec3::new(5.0, 5.0, 5e-8),
            DVec3::new(7.0, 5.0, 0.0),
        ]);
        let area = extrapolated_surface_area(&surface, 0.03, 0.0).unwrap();
        assert!((area - 1.12).abs() < 1e-12);
        let shell = extrapolate_surface(&surface, 0.03, 0.0).unwrap();
        assert_eq!(shell.face_count(), 14);
        assert_eq!(shell.triangles().count(), 12);
    }
}

//! Polygon meshes and surface extrusion

pub mod extrude;
pub mod surface;

pub use extrude::{boundary_edges, edge_surface, extrapolate_surface, extrapolated_surface_area};
pub use surface::{DEGENERATE_TOLERANCE, FaceId, MERGE_TOLERANCE, Mesh, VertexId};

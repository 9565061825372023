//! Walkmesh data model
//!
//! A walkmesh is a fixed array of triangles over a deduplicated vertex pool.
//! Triangles reference vertices by pool index, so two triangles meeting at a
//! corner share the same vertex index; index equality is the identity test
//! for "exactly on a vertex" checks. Vertex coordinates are integers, and
//! on-vertex tests compare a ground point's truncated integer coordinates
//! against the vertex, never floating values.
//!
//! Topology is immutable after construction. The only mutable state is the
//! set of disabled triangles, which every traversal must re-read on each call
//! and skip as if those triangles had no neighbors.

use std::collections::HashSet;

use glam::{Vec2, Vec3};
use walkmesh_common::{barycentric, triangle_height, Error, Result};

/// Identifies a triangle by its index in the mesh array, stable for the
/// lifetime of the mesh.
pub type TriId = u16;

/// A vertex of the walkmesh, in integer world units with Z as height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct MeshVertex {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl MeshVertex {
    /// Creates a new vertex
    pub fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// The vertex position with Z as height
    #[inline]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }

    /// The vertex position on the ground plane
    #[inline]
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    /// Whether a ground point sits exactly on this vertex, comparing the
    /// point's truncated integer coordinates.
    #[inline]
    pub fn matches_ground_point(self, p: Vec2) -> bool {
        self.x == p.x as i16 && self.y == p.y as i16
    }
}

/// A walkmesh triangle: three vertex pool indices in fixed winding order and
/// an optional neighbor per edge.
///
/// Neighbor slot `i` covers the edge from `verts[i]` to `verts[(i + 1) % 3]`
/// (V0V1, V1V2, V2V0). `None` marks a mesh boundary. Neighbor links are
/// expected to be symmetric; that is an input requirement, not something the
/// resolver enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Triangle {
    pub verts: [u16; 3],
    pub neighbors: [Option<TriId>; 3],
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(verts: [u16; 3], neighbors: [Option<TriId>; 3]) -> Self {
        Self { verts, neighbors }
    }

    /// Whether the triangle uses the given vertex pool index
    #[inline]
    pub fn contains_vertex(&self, vert: u16) -> bool {
        self.verts.contains(&vert)
    }
}

/// A triangulated 2.5D navigation surface.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Walkmesh {
    verts: Vec<MeshVertex>,
    tris: Vec<Triangle>,
    disabled: HashSet<TriId>,
}

impl Walkmesh {
    /// Creates a walkmesh from a vertex pool and triangle array.
    ///
    /// Validates that every vertex and neighbor index is in range.
    pub fn new(verts: Vec<MeshVertex>, tris: Vec<Triangle>) -> Result<Self> {
        if tris.len() > TriId::MAX as usize {
            return Err(Error::InvalidMesh(format!(
                "too many triangles: {}",
                tris.len()
            )));
        }
        for (i, tri) in tris.iter().enumerate() {
            for &v in &tri.verts {
                if v as usize >= verts.len() {
                    return Err(Error::InvalidMesh(format!(
                        "triangle {i} references vertex {v} of {}",
                        verts.len()
                    )));
                }
            }
            for &n in tri.neighbors.iter().flatten() {
                if n as usize >= tris.len() {
                    return Err(Error::InvalidMesh(format!(
                        "triangle {i} references neighbor {n} of {}",
                        tris.len()
                    )));
                }
            }
        }

        Ok(Self {
            verts,
            tris,
            disabled: HashSet::new(),
        })
    }

    /// Number of triangles in the mesh
    pub fn triangle_count(&self) -> usize {
        self.tris.len()
    }

    /// Whether the mesh has no triangles
    pub fn is_empty(&self) -> bool {
        self.tris.is_empty()
    }

    /// Looks up a triangle by id
    pub fn triangle(&self, id: TriId) -> Option<&Triangle> {
        self.tris.get(id as usize)
    }

    /// Looks up a vertex by pool index
    pub fn vertex(&self, index: u16) -> Option<MeshVertex> {
        self.verts.get(index as usize).copied()
    }

    pub(crate) fn tri(&self, id: TriId) -> &Triangle {
        &self.tris[id as usize]
    }

    pub(crate) fn vert(&self, index: u16) -> MeshVertex {
        self.verts[index as usize]
    }

    /// The three corner positions of a triangle
    pub(crate) fn tri_points(&self, id: TriId) -> [Vec3; 3] {
        let tri = self.tri(id);
        [
            self.vert(tri.verts[0]).to_vec3(),
            self.vert(tri.verts[1]).to_vec3(),
            self.vert(tri.verts[2]).to_vec3(),
        ]
    }

    /// Marks a triangle as impassable, or re-enables it. Disabled triangles
    /// drop out of every traversal without altering the topology.
    pub fn set_disabled(&mut self, id: TriId, disabled: bool) {
        if disabled {
            self.disabled.insert(id);
        } else {
            self.disabled.remove(&id);
        }
    }

    /// Whether a triangle is currently disabled
    #[inline]
    pub fn is_disabled(&self, id: TriId) -> bool {
        self.disabled.contains(&id)
    }

    /// The two vertices of a triangle other than `vert`.
    ///
    /// A triangle that cannot name its own vertex indicates corrupt topology
    /// and is reported as an invariant violation.
    pub fn other_verts(&self, id: TriId, vert: u16) -> Result<(u16, u16)> {
        let tri = self
            .triangle(id)
            .ok_or_else(|| Error::InvalidMesh(format!("triangle {id} out of range")))?;

        if tri.verts[0] == vert {
            Ok((tri.verts[1], tri.verts[2]))
        } else if tri.verts[1] == vert {
            Ok((tri.verts[0], tri.verts[2]))
        } else if tri.verts[2] == vert {
            Ok((tri.verts[0], tri.verts[1]))
        } else {
            Err(Error::InvariantViolation(format!(
                "triangle {id} does not contain vertex {vert}"
            )))
        }
    }

    /// Height of the triangle's plane at ground point (x, y), or `None` when
    /// the point is outside the triangle (or the id is out of range).
    ///
    /// Strict mode is used to decide whether a move stays inside the current
    /// triangle; tolerant mode is for a triangle already confirmed as the
    /// destination, where 2-decimal rounding absorbs floating-point noise at
    /// the edges.
    pub fn height_in_triangle(&self, id: TriId, x: f32, y: f32, tolerant: bool) -> Option<f32> {
        if id as usize >= self.tris.len() {
            return None;
        }
        let [p0, p1, p2] = self.tri_points(id);
        triangle_height(p0, p1, p2, x, y, tolerant)
    }

    /// Clamps a ground point into the triangle: barycentric weights are
    /// clipped to [0, 1], renormalized, and reprojected to Cartesian, which
    /// guarantees the result lies inside even after floating error. Points
    /// already inside come back unchanged (within tolerance).
    pub fn clamp_to_triangle(&self, id: TriId, position: Vec2) -> Result<Vec2> {
        let tri = self
            .triangle(id)
            .ok_or_else(|| Error::InvalidMesh(format!("triangle {id} out of range")))?;
        let v0 = self.vert(tri.verts[0]);
        let v1 = self.vert(tri.verts[1]);
        let v2 = self.vert(tri.verts[2]);

        let (a, b, c) = barycentric(v0.to_vec3(), v1.to_vec3(), v2.to_vec3(), position);

        let a = a.clamp(0.0, 1.0);
        let b = b.clamp(0.0, 1.0);
        let c = c.clamp(0.0, 1.0);

        let norm = a + b + c;
        let (a, b, c) = (a / norm, b / norm, c / norm);

        Ok(Vec2::new(
            v0.x as f32 * a + v1.x as f32 * b + v2.x as f32 * c,
            v0.y as f32 * a + v1.y as f32 * b + v2.y as f32 * c,
        ))
    }

    /// Finds the triangle containing a world position, if any: a linear scan
    /// testing strict height containment with a small vertical window around
    /// the position's own height. Used to re-anchor an entity dropped at an
    /// arbitrary world position.
    pub fn find_triangle_for_position(&self, position: Vec3) -> Option<TriId> {
        for id in 0..self.tris.len() as TriId {
            if let Some(height) = self.height_in_triangle(id, position.x, position.y, false) {
                if (height - 5.0) <= position.z && height > (position.z - 5.0) {
                    return Some(id);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_mesh_helpers::create_two_triangle_square;

    #[test]
    fn test_new_rejects_bad_vertex_index() {
        let verts = vec![
            MeshVertex::new(0, 0, 0),
            MeshVertex::new(10, 0, 0),
            MeshVertex::new(0, 10, 0),
        ];
        let tris = vec![Triangle::new([0, 1, 7], [None, None, None])];
        assert!(Walkmesh::new(verts, tris).is_err());
    }

    #[test]
    fn test_new_rejects_bad_neighbor_index() {
        let verts = vec![
            MeshVertex::new(0, 0, 0),
            MeshVertex::new(10, 0, 0),
            MeshVertex::new(0, 10, 0),
        ];
        let tris = vec![Triangle::new([0, 1, 2], [Some(3), None, None])];
        assert!(Walkmesh::new(verts, tris).is_err());
    }

    #[test]
    fn test_disabled_set_toggles() {
        let mut mesh = create_two_triangle_square();
        assert!(!mesh.is_disabled(1));
        mesh.set_disabled(1, true);
        assert!(mesh.is_disabled(1));
        mesh.set_disabled(1, false);
        assert!(!mesh.is_disabled(1));
    }

    #[test]
    fn test_other_verts() {
        let mesh = create_two_triangle_square();
        let tri = *mesh.triangle(0).unwrap();
        let (a, b) = mesh.other_verts(0, tri.verts[1]).unwrap();
        assert_eq!((a, b), (tri.verts[0], tri.verts[2]));

        // A vertex the triangle does not use is an invariant violation
        let foreign = (0..4).find(|v| !tri.contains_vertex(*v)).unwrap();
        assert!(mesh.other_verts(0, foreign).is_err());
    }

    #[test]
    fn test_clamp_is_idempotent_inside() {
        let mesh = create_two_triangle_square();
        let inside = Vec2::new(2.0, 3.0);
        let clamped = mesh.clamp_to_triangle(0, inside).unwrap();
        assert!((clamped - inside).length() < 1e-4);
        // Clamping the clamped point changes nothing
        let again = mesh.clamp_to_triangle(0, clamped).unwrap();
        assert!((again - clamped).length() < 1e-4);
    }

    #[test]
    fn test_clamp_pulls_outside_point_in() {
        let mesh = create_two_triangle_square();
        let clamped = mesh.clamp_to_triangle(0, Vec2::new(-5.0, -5.0)).unwrap();
        assert!(mesh
            .height_in_triangle(0, clamped.x, clamped.y, true)
            .is_some());
    }

    #[test]
    fn test_find_triangle_for_position() {
        let mesh = create_two_triangle_square();
        assert_eq!(
            mesh.find_triangle_for_position(Vec3::new(2.0, 3.0, 0.0)),
            Some(0)
        );
        assert_eq!(
            mesh.find_triangle_for_position(Vec3::new(8.0, 7.0, 0.0)),
            Some(1)
        );
        // Vertical fudge window: a position well above the plane matches nothing
        assert_eq!(
            mesh.find_triangle_for_position(Vec3::new(2.0, 3.0, 40.0)),
            None
        );
        assert_eq!(
            mesh.find_triangle_for_position(Vec3::new(50.0, 50.0, 0.0)),
            None
        );
    }

    #[test]
    fn test_vertex_ground_point_match_truncates() {
        let v = MeshVertex::new(10, 20, 0);
        assert!(v.matches_ground_point(Vec2::new(10.0, 20.0)));
        // Casting truncates toward zero, exactly like the containment checks
        assert!(v.matches_ground_point(Vec2::new(10.9, 20.9)));
        assert!(!v.matches_ground_point(Vec2::new(9.9, 20.0)));
    }
}

//! Small hand-built meshes used by the test suites
//!
//! All fixtures are tiny enough to verify adjacency by hand. Constructors
//! panic on invalid input, which a fixture never produces.

use crate::mesh::{MeshVertex, Triangle, Walkmesh};

/// A flat 10x10 square split along the diagonal from (10,0) to (0,10).
///
/// Triangle 0 is the lower-left half, triangle 1 the upper-right; they share
/// the diagonal edge (triangle 0 slot 1, triangle 1 slot 2).
pub fn create_two_triangle_square() -> Walkmesh {
    let verts = vec![
        MeshVertex::new(0, 0, 0),
        MeshVertex::new(10, 0, 0),
        MeshVertex::new(10, 10, 0),
        MeshVertex::new(0, 10, 0),
    ];
    let tris = vec![
        Triangle::new([0, 1, 3], [None, Some(1), None]),
        Triangle::new([1, 2, 3], [None, None, Some(0)]),
    ];
    Walkmesh::new(verts, tris).unwrap()
}

/// The same square with the far corner raised to height 20, so triangle 1
/// is a sloped plane while triangle 0 stays flat.
pub fn create_two_triangle_slope() -> Walkmesh {
    let verts = vec![
        MeshVertex::new(0, 0, 0),
        MeshVertex::new(10, 0, 0),
        MeshVertex::new(10, 10, 20),
        MeshVertex::new(0, 10, 0),
    ];
    let tris = vec![
        Triangle::new([0, 1, 3], [None, Some(1), None]),
        Triangle::new([1, 2, 3], [None, None, Some(0)]),
    ];
    Walkmesh::new(verts, tris).unwrap()
}

/// A strip of `quads` unit squares (10 world units each), two triangles per
/// square, chained so triangle i is adjacent to exactly triangles i-1 and
/// i+1. Mesh distance between triangles i and j is |i - j|.
pub fn create_strip(quads: u16) -> Walkmesh {
    let mut verts = Vec::with_capacity(2 * (quads as usize + 1));
    // Bottom row, then top row
    for k in 0..=quads {
        verts.push(MeshVertex::new((10 * k) as i16, 0, 0));
    }
    for k in 0..=quads {
        verts.push(MeshVertex::new((10 * k) as i16, 10, 0));
    }

    let bottom = |k: u16| k;
    let top = |k: u16| quads + 1 + k;

    let mut tris = Vec::with_capacity(2 * quads as usize);
    for k in 0..quads {
        let lower = 2 * k;
        let upper = 2 * k + 1;
        tris.push(Triangle::new(
            [bottom(k), bottom(k + 1), top(k)],
            [
                None,
                Some(upper),
                if k > 0 { Some(lower - 1) } else { None },
            ],
        ));
        tris.push(Triangle::new(
            [bottom(k + 1), top(k + 1), top(k)],
            [
                if k + 1 < quads { Some(upper + 1) } else { None },
                None,
                Some(lower),
            ],
        ));
    }

    Walkmesh::new(verts, tris).unwrap()
}

/// Three triangles fanned around a hub vertex at the origin, with spokes
/// along +X, +Y, -X and -Y. Triangles 1 and 2 share the -X spoke.
pub fn create_vertex_fan() -> Walkmesh {
    let verts = vec![
        MeshVertex::new(0, 0, 0),
        MeshVertex::new(20, 0, 0),
        MeshVertex::new(0, 20, 0),
        MeshVertex::new(-20, 0, 0),
        MeshVertex::new(0, -20, 0),
    ];
    let tris = vec![
        Triangle::new([0, 1, 2], [None, None, Some(1)]),
        Triangle::new([0, 2, 3], [Some(0), None, Some(2)]),
        Triangle::new([0, 3, 4], [Some(1), None, None]),
    ];
    Walkmesh::new(verts, tris).unwrap()
}

/// A flat 40x40 arena centered on the origin, split along the diagonal from
/// (-20,-20) to (20,20). Room to move agents around without leaving the mesh.
pub fn create_flat_arena() -> Walkmesh {
    let verts = vec![
        MeshVertex::new(-20, -20, 0),
        MeshVertex::new(20, -20, 0),
        MeshVertex::new(20, 20, 0),
        MeshVertex::new(-20, 20, 0),
    ];
    let tris = vec![
        Triangle::new([0, 1, 2], [None, None, Some(1)]),
        Triangle::new([0, 2, 3], [Some(0), None, None]),
    ];
    Walkmesh::new(verts, tris).unwrap()
}

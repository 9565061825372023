//! Mesh-distance and path queries over the triangle adjacency graph
//!
//! Used to rank candidate focus targets by how far away they are across the
//! mesh (in triangle hops) and to recover the chain of triangles leading to
//! them. Recomputed on demand, never per frame.

use std::collections::{HashMap, VecDeque};

use glam::Vec3;

use crate::mesh::{TriId, Walkmesh};

/// Summary of a candidate focus target as seen from a reference triangle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct FocusState {
    /// Display name of the target
    pub target_name: String,
    /// World position of the target
    pub target_position: Vec3,
    /// Mesh distance to the target, in triangle hops
    pub distance: u32,
    /// Triangles along a shortest path, target first, reference excluded
    pub path: Vec<TriId>,
}

/// Breadth-first hop counts from `start` to every reachable triangle.
///
/// Disabled triangles are never expanded through, so anything behind them is
/// absent from the map. The disabled set is re-read on every call.
pub fn distances_from(mesh: &Walkmesh, start: TriId) -> HashMap<TriId, u32> {
    let mut calculated = HashMap::new();
    if mesh.triangle(start).is_none() {
        return calculated;
    }

    calculated.insert(start, 0);
    let mut to_consider = VecDeque::from([start]);

    while let Some(t) = to_consider.pop_front() {
        if mesh.is_disabled(t) {
            continue;
        }
        let distance = calculated[&t];
        for &adjacent in mesh.tri(t).neighbors.iter().flatten() {
            if mesh.is_disabled(adjacent) || calculated.contains_key(&adjacent) {
                continue;
            }
            calculated.insert(adjacent, distance + 1);
            to_consider.push_back(adjacent);
        }
    }

    calculated
}

/// Computes the focus summary for a target in `target_tri` as seen from
/// `reference_tri`, or `None` when the target is unreachable.
///
/// The path is reconstructed backward from the target: at each hop, the
/// first neighbor (in edge slot order) whose hop count is exactly one less.
pub fn focus_state(
    mesh: &Walkmesh,
    reference_tri: TriId,
    target_tri: TriId,
    target_name: &str,
    target_position: Vec3,
) -> Option<FocusState> {
    let calculated = distances_from(mesh, reference_tri);
    let distance = *calculated.get(&target_tri)?;

    let mut path = Vec::with_capacity(distance as usize);
    let mut last = target_tri;
    for want in (0..distance).rev() {
        path.push(last);
        last = mesh
            .tri(last)
            .neighbors
            .iter()
            .flatten()
            .copied()
            .find(|adjacent| calculated.get(adjacent) == Some(&want))?;
    }

    Some(FocusState {
        target_name: target_name.to_string(),
        target_position,
        distance,
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_mesh_helpers::{create_strip, create_two_triangle_square};

    #[test]
    fn test_strip_distances_are_hop_counts() {
        // 4 quads -> 8 triangles chained 0-1-2-...-7
        let mesh = create_strip(4);
        let distances = distances_from(&mesh, 0);
        for t in 0..8u16 {
            assert_eq!(distances[&t], t as u32, "triangle {t}");
        }
        // Symmetric under the strip's symmetry
        let back = distances_from(&mesh, 7);
        for t in 0..8u16 {
            assert_eq!(back[&t], (7 - t) as u32, "triangle {t}");
        }
    }

    #[test]
    fn test_disabled_triangle_splits_the_strip() {
        let mut mesh = create_strip(4);
        mesh.set_disabled(4, true);
        let distances = distances_from(&mesh, 0);
        assert_eq!(distances.get(&3), Some(&3));
        assert!(!distances.contains_key(&4));
        assert!(!distances.contains_key(&7));
    }

    #[test]
    fn test_focus_path_walks_back_to_reference() {
        let mesh = create_strip(4);
        let state = focus_state(&mesh, 0, 5, "target", Vec3::ZERO).unwrap();
        assert_eq!(state.distance, 5);
        assert_eq!(state.path, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_focus_same_triangle_is_empty_path() {
        let mesh = create_two_triangle_square();
        let state = focus_state(&mesh, 1, 1, "target", Vec3::ZERO).unwrap();
        assert_eq!(state.distance, 0);
        assert!(state.path.is_empty());
    }

    #[test]
    fn test_unreachable_target_is_none() {
        let mut mesh = create_strip(2);
        mesh.set_disabled(1, true);
        assert!(focus_state(&mesh, 0, 3, "target", Vec3::ZERO).is_none());
    }
}

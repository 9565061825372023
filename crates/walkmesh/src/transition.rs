//! Triangle transition resolution
//!
//! Given a movement segment and the triangle the mover currently occupies,
//! works out whether the move crosses into a neighboring triangle, can be
//! redirected along an edge, or is blocked. This is the piece that keeps an
//! entity's position and triangle id in agreement as it walks the mesh.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use walkmesh_common::{angle_between, segment_intersect, Error, Result};

use crate::mesh::{TriId, Walkmesh};

/// Maximum deviation from the intended heading at which a blocked move is
/// still redirected along an edge. Beyond this, sliding looks wrong and the
/// move is rejected instead.
pub const MAX_SLIDE_ANGLE: f32 = 70.0 * std::f32::consts::PI / 180.0;

/// Outcome of resolving a movement segment against the mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// The move is blocked entirely; nothing changes.
    Failure,
    /// The full move lands at the requested endpoint in a new triangle.
    Success { tri: TriId, dest: Vec2 },
    /// A partial move along an edge of the current triangle.
    SlideCurrentTri { dest: Vec2 },
    /// A partial move that re-anchors at a shared vertex in a new triangle.
    SlideNewTri { tri: TriId, dest: Vec2 },
}

/// The first edge of a triangle crossed by a movement segment.
#[derive(Debug, Clone, Copy)]
pub struct EdgeCrossing {
    /// Parameter along the movement segment where the edge is crossed
    pub t: f32,
    /// Neighbor across the crossed edge, if any
    pub neighbor: Option<TriId>,
    /// Edge start position
    pub a: Vec2,
    /// Edge end position
    pub b: Vec2,
}

/// Tests the movement segment against a triangle's edges in fixed order
/// (V0V1, V1V2, V2V0) and reports the first crossing.
///
/// Also serves as a containment probe: a segment from a point inside the
/// triangle to any far-away point must cross one of its edges.
pub fn find_exit_edge(
    mesh: &Walkmesh,
    id: TriId,
    start: Vec2,
    end: Vec2,
) -> Option<EdgeCrossing> {
    let tri = mesh.triangle(id)?;
    for slot in 0..3 {
        let a = mesh.vert(tri.verts[slot]).to_vec2();
        let b = mesh.vert(tri.verts[(slot + 1) % 3]).to_vec2();
        if let Some(t) = segment_intersect(start, end, a, b) {
            return Some(EdgeCrossing {
                t,
                neighbor: tri.neighbors[slot],
                a,
                b,
            });
        }
    }
    None
}

/// Resolves the movement segment `start -> end` for a mover currently in
/// `current`.
///
/// Resolution order:
/// 1. If `start` sits exactly on a vertex of the current triangle, pick among
///    every enabled triangle sharing that vertex the edge whose direction
///    deviates least from the intended heading, and slide along it.
/// 2. Otherwise scan outward across every edge the segment crosses; a visited
///    triangle crossed exactly once is where the move ends. Exactly one such
///    triangle is the normal case; with several (segment on a shared
///    boundary) the first found wins.
/// 3. Otherwise, when `allow_slide` is set, redirect along the nearest-in-
///    heading endpoint of the crossed edge, within [`MAX_SLIDE_ANGLE`].
pub fn resolve(
    mesh: &Walkmesh,
    start: Vec2,
    end: Vec2,
    current: TriId,
    allow_slide: bool,
) -> Result<Transition> {
    let tri = *mesh
        .triangle(current)
        .ok_or_else(|| Error::InvalidMesh(format!("triangle {current} out of range")))?;

    let orig_delta = end - start;
    let orig_distance = orig_delta.length();
    let orig_dir = orig_delta.normalize();

    // Exactly on a vertex: shift into the best-aligned triangle joined at
    // that vertex so the retried move can make progress.
    for &vi in &tri.verts {
        let vert = mesh.vert(vi);
        if !vert.matches_ground_point(start) {
            continue;
        }

        let mut best: Option<(f32, TriId, Vec2, Vec2)> = None;
        for cand in 0..mesh.triangle_count() as TriId {
            if mesh.is_disabled(cand) || !mesh.tri(cand).contains_vertex(vi) {
                continue;
            }
            let (o1, o2) = mesh.other_verts(cand, vi)?;
            for ov in [o1, o2] {
                let v_start = vert.to_vec2();
                let v_end = mesh.vert(ov).to_vec2();
                let dir = (v_end - v_start).normalize();
                let angle = angle_between(dir, orig_dir).abs();
                if best.map_or(true, |(best_angle, ..)| angle < best_angle) {
                    best = Some((angle, cand, v_start, v_end));
                }
            }
        }

        if let Some((_, cand, v_start, v_end)) = best {
            if cand != current {
                return Ok(Transition::SlideNewTri {
                    tri: cand,
                    dest: v_start,
                });
            }
            let edge = v_end - v_start;
            let edge_len = edge.length();
            let dest = if edge_len < orig_distance {
                v_end
            } else {
                start + edge.normalize() * orig_distance
            };
            return Ok(Transition::SlideCurrentTri { dest });
        }
    }

    // Scan outward over every triangle the segment crosses into, counting
    // edge crossings per triangle. Crossing count 1 means the segment ends
    // inside that triangle.
    let mut considered: HashMap<TriId, u32> = HashMap::new();
    let mut visit_order: Vec<TriId> = Vec::new();
    let mut queued: HashSet<TriId> = HashSet::from([current]);
    let mut pending: Vec<TriId> = vec![current];

    while !pending.is_empty() {
        for t in std::mem::take(&mut pending) {
            let check = mesh.tri(t);
            let [v0, v1, v2] = check.verts.map(|v| mesh.vert(v).to_vec2());
            let edges = [
                (v0, v1, check.neighbors[0]),
                (v0, v2, check.neighbors[2]),
                (v1, v2, check.neighbors[1]),
            ];

            let mut crossings = 0;
            for (a, b, neighbor) in edges {
                if segment_intersect(start, end, a, b).is_none() {
                    continue;
                }
                crossings += 1;

                let Some(next) = neighbor else { continue };
                if mesh.is_disabled(next) || considered.contains_key(&next) {
                    continue;
                }
                if queued.insert(next) {
                    pending.push(next);
                }
            }

            considered.insert(t, crossings);
            visit_order.push(t);
        }
    }

    let mut exits = visit_order
        .iter()
        .copied()
        .filter(|t| *t != current && considered[t] == 1);

    if let Some(exit) = exits.next() {
        if exits.next().is_some() {
            // Segment sits exactly on a boundary shared by several triangles
            log::debug!("movement segment on a multi-triangle boundary, taking triangle {exit}");
        }
        return Ok(Transition::Success {
            tri: exit,
            dest: end,
        });
    }

    // No reachable destination triangle. If the segment does not even leave
    // the current triangle the caller should have committed it directly.
    let Some(crossing) = find_exit_edge(mesh, current, start, end) else {
        return Ok(Transition::Failure);
    };

    if allow_slide {
        // Not on a vertex, but we may still get closer to the goal by
        // sliding toward whichever end of the crossed edge deviates least
        // from the original heading.
        let v0_delta = crossing.a - start;
        let v0_distance = v0_delta.length();
        let v0_dir = v0_delta.normalize();

        let v1_delta = crossing.b - start;
        let v1_distance = v1_delta.length();
        let v1_dir = v1_delta.normalize();

        let v0_angle = angle_between(v0_dir, orig_dir).abs();
        let v1_angle = angle_between(v1_dir, orig_dir).abs();

        if v0_angle < v1_angle && v0_angle < MAX_SLIDE_ANGLE {
            let dest = if v0_distance < orig_distance {
                crossing.a
            } else {
                start + v0_dir * orig_distance
            };
            return Ok(Transition::SlideCurrentTri { dest });
        } else if v1_angle < MAX_SLIDE_ANGLE {
            let dest = if v1_distance < orig_distance {
                crossing.b
            } else {
                start + v1_dir * orig_distance
            };
            return Ok(Transition::SlideCurrentTri { dest });
        }
    }

    Ok(Transition::Failure)
}

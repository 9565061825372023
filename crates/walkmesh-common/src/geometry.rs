//! 2D geometry operations for walkmesh navigation
//!
//! All operations work on the X/Y ground plane; Z carries the per-triangle
//! planar height. Intermediate arithmetic uses f64 to keep edge tests stable
//! on meshes with large integer coordinates.

use glam::{Vec2, Vec3};

/// Rounds a value to 2 decimal places.
///
/// Edge and containment tests round their parameters this way so that a point
/// sitting numerically just outside an edge still counts as touching it.
#[inline]
pub fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

/// Solve for the barycentric weights (a, b, c) of `pos` with respect to the
/// triangle (va, vb, vc), with a + b + c = 1.
///
/// Degenerate (collinear) triangles are not handled here; callers must not
/// pass them.
#[inline]
pub fn barycentric(va: Vec3, vb: Vec3, vc: Vec3, pos: Vec2) -> (f32, f32, f32) {
    let (vax, vay) = (va.x as f64, va.y as f64);
    let (vbx, vby) = (vb.x as f64, vb.y as f64);
    let (vcx, vcy) = (vc.x as f64, vc.y as f64);
    let (px, py) = (pos.x as f64, pos.y as f64);

    let denominator = (vby - vcy) * (vax - vcx) + (vcx - vbx) * (vay - vcy);

    let a = (((vby - vcy) * (px - vcx) + (vcx - vbx) * (py - vcy)) / denominator) as f32;
    let b = (((vcy - vay) * (px - vcx) + (vax - vcx) * (py - vcy)) / denominator) as f32;
    let c = 1.0 - a - b;

    (a, b, c)
}

/// Height of the plane through (p0, p1, p2) at ground point (x, y), or `None`
/// if the point lies outside the triangle.
///
/// In strict mode (`tolerant == false`) the raw barycentric weights must all
/// lie in [0, 1]. Tolerant mode rounds each weight to 2 decimal places before
/// the bounds check; use it only once the triangle has already been confirmed
/// as the destination, to absorb floating-point noise at edges.
pub fn triangle_height(p0: Vec3, p1: Vec3, p2: Vec3, x: f32, y: f32, tolerant: bool) -> Option<f32> {
    let (mut a, mut b, mut c) = barycentric(p0, p1, p2, Vec2::new(x, y));

    if tolerant {
        a = round2(a);
        b = round2(b);
        c = round2(c);
    }

    if !(0.0..=1.0).contains(&a) || !(0.0..=1.0).contains(&b) || !(0.0..=1.0).contains(&c) {
        return None;
    }

    Some(p0.z * a + p1.z * b + p2.z * c)
}

/// Intersect segment (a0, a1) with segment (b0, b1) on the ground plane.
///
/// Returns the parameter along segment A at which the crossing occurs, when
/// both parameters fall within [0, 1] after rounding to 2 decimal places.
/// Parallel segments intersect (at parameter 0) only when both numerators are
/// exactly zero, i.e. the segments are coincident.
pub fn segment_intersect(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> Option<f32> {
    let (a0x, a0y) = (a0.x as f64, a0.y as f64);
    let (a1x, a1y) = (a1.x as f64, a1.y as f64);
    let (b0x, b0y) = (b0.x as f64, b0.y as f64);
    let (b1x, b1y) = (b1.x as f64, b1.y as f64);

    let denominator = (a1x - a0x) * (b1y - b0y) - (a1y - a0y) * (b1x - b0x);
    let numerator1 = (a0y - b0y) * (b1x - b0x) - (a0x - b0x) * (b1y - b0y);
    let numerator2 = (a0y - b0y) * (a1x - a0x) - (a0x - b0x) * (a1y - a0y);

    if denominator == 0.0 {
        if numerator1 == 0.0 && numerator2 == 0.0 {
            return Some(0.0);
        }
        return None;
    }

    let t = round2((numerator1 / denominator) as f32);
    let s = round2((numerator2 / denominator) as f32);

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&s) {
        Some(t)
    } else {
        None
    }
}

/// Signed angle from `v1` to `v0`, normalized into (-PI, PI].
#[inline]
pub fn angle_between(v0: Vec2, v1: Vec2) -> f32 {
    let mut angle =
        (v0.y as f64).atan2(v0.x as f64) - (v1.y as f64).atan2(v1.x as f64);
    while angle > std::f64::consts::PI {
        angle -= 2.0 * std::f64::consts::PI;
    }
    while angle <= -std::f64::consts::PI {
        angle += 2.0 * std::f64::consts::PI;
    }
    angle as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_barycentric_weights_sum_to_one() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(10.0, 0.0, 0.0);
        let c = Vec3::new(0.0, 10.0, 0.0);

        for p in [
            Vec2::new(1.0, 1.0),
            Vec2::new(5.0, 2.5),
            Vec2::new(-3.0, 7.0),
            Vec2::new(20.0, 20.0),
        ] {
            let (wa, wb, wc) = barycentric(a, b, c, p);
            assert!((wa + wb + wc - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_barycentric_at_vertices() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(10.0, 0.0, 0.0);
        let c = Vec3::new(0.0, 10.0, 0.0);

        let (wa, wb, wc) = barycentric(a, b, c, Vec2::new(0.0, 0.0));
        assert!((wa - 1.0).abs() < EPS && wb.abs() < EPS && wc.abs() < EPS);

        let (wa, wb, wc) = barycentric(a, b, c, Vec2::new(10.0, 0.0));
        assert!(wa.abs() < EPS && (wb - 1.0).abs() < EPS && wc.abs() < EPS);
    }

    #[test]
    fn test_triangle_height_interpolates_plane() {
        // Plane z = x + 2y over the triangle
        let p0 = Vec3::new(0.0, 0.0, 0.0);
        let p1 = Vec3::new(10.0, 0.0, 10.0);
        let p2 = Vec3::new(0.0, 10.0, 20.0);

        let h = triangle_height(p0, p1, p2, 2.0, 3.0, false).unwrap();
        assert!((h - (2.0 + 2.0 * 3.0)).abs() < 1e-3);

        // Centroid
        let h = triangle_height(p0, p1, p2, 10.0 / 3.0, 10.0 / 3.0, false).unwrap();
        assert!((h - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_triangle_height_outside_is_none() {
        let p0 = Vec3::new(0.0, 0.0, 0.0);
        let p1 = Vec3::new(10.0, 0.0, 0.0);
        let p2 = Vec3::new(0.0, 10.0, 0.0);

        assert!(triangle_height(p0, p1, p2, 11.0, 0.0, false).is_none());
        assert!(triangle_height(p0, p1, p2, -1.0, -1.0, false).is_none());
        assert!(triangle_height(p0, p1, p2, 8.0, 8.0, false).is_none());
    }

    #[test]
    fn test_triangle_height_tolerant_absorbs_edge_noise() {
        let p0 = Vec3::new(0.0, 0.0, 0.0);
        let p1 = Vec3::new(10.0, 0.0, 0.0);
        let p2 = Vec3::new(0.0, 10.0, 0.0);

        // Just outside the v0-v1 edge; strict rejects, tolerant accepts
        assert!(triangle_height(p0, p1, p2, 5.0, -0.02, false).is_none());
        assert!(triangle_height(p0, p1, p2, 5.0, -0.02, true).is_some());
    }

    #[test]
    fn test_segment_intersect_crossing() {
        let t = segment_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, -5.0),
            Vec2::new(5.0, 5.0),
        )
        .unwrap();
        assert!((t - 0.5).abs() < EPS);
    }

    #[test]
    fn test_segment_intersect_disjoint() {
        assert!(segment_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(20.0, -5.0),
            Vec2::new(20.0, 5.0),
        )
        .is_none());
    }

    #[test]
    fn test_segment_intersect_parallel() {
        // Parallel but offset: no intersection
        assert!(segment_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(10.0, 1.0),
        )
        .is_none());

        // Coincident: reported as intersecting at parameter 0
        let t = segment_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(8.0, 0.0),
        )
        .unwrap();
        assert_eq!(t, 0.0);
    }

    #[test]
    fn test_segment_intersect_endpoint_touch() {
        // Segment B touches A exactly at A's endpoint
        let t = segment_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, -5.0),
            Vec2::new(10.0, 5.0),
        )
        .unwrap();
        assert!((t - 1.0).abs() < EPS);
    }

    #[test]
    fn test_segment_intersect_rounds_near_miss_into_range() {
        // B sits at x = 10.03, just past A's endpoint; the raw parameter
        // 1.003 rounds to 1.0 and the crossing counts
        let t = segment_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.03, -5.0),
            Vec2::new(10.03, 5.0),
        )
        .unwrap();
        assert_eq!(t, 1.0);

        // A full unit further out is a clean miss
        assert!(segment_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(11.0, -5.0),
            Vec2::new(11.0, 5.0),
        )
        .is_none());
    }

    #[test]
    fn test_angle_between_basics() {
        let right = Vec2::new(1.0, 0.0);
        let up = Vec2::new(0.0, 1.0);
        let left = Vec2::new(-1.0, 0.0);

        assert!(angle_between(right, right).abs() < EPS);
        assert!((angle_between(up, right) - std::f32::consts::FRAC_PI_2).abs() < EPS);
        // Opposite directions normalize to +PI, never -PI
        assert!((angle_between(left, right) - std::f32::consts::PI).abs() < EPS);
        assert!((angle_between(right, up) + std::f32::consts::FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.1234), 0.12);
        assert_eq!(round2(-0.006), -0.01);
        assert_eq!(round2(1.0), 1.0);
    }
}

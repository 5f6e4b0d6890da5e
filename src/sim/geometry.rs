//! Line segment geometry and 2D transforms
//!
//! Terrain is a polyline, so every collision query boils down to
//! segment-vs-segment tests between the ball's per-step travel and a
//! landscape edge.

use glam::{Mat3, Vec2};
use serde::{Deserialize, Serialize};

use crate::angle_between;

/// One edge of the terrain polyline (or a ball's travel path)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub p: Vec2,
    pub q: Vec2,
}

impl Segment {
    #[inline]
    pub fn new(p: Vec2, q: Vec2) -> Self {
        Self { p, q }
    }

    /// Vector from `p` to `q`
    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.q - self.p
    }

    /// Direction rotated a quarter turn counter-clockwise.
    ///
    /// For a left-to-right terrain edge this points up, out of the ground.
    #[inline]
    pub fn normal(&self) -> Vec2 {
        self.direction().perp()
    }

    /// Check whether this segment crosses or touches another
    #[inline]
    pub fn intersects(&self, other: &Segment) -> bool {
        segments_intersect(self, other)
    }
}

/// Segment intersection by angle comparison.
///
/// Walk the four endpoints in the cyclic order `a.p, b.p, a.q, b.q`. From each
/// endpoint, the vector to its partner on the same segment must lie angularly
/// between the vectors to the other segment's two endpoints, i.e. the angle
/// spanned by the other segment is at least as wide as either angle to the
/// partner. The segments intersect iff that holds at all four endpoints.
///
/// An endpoint that coincides with another point has no defined angle there
/// and is treated as satisfied, so touching configurations intersect.
pub fn segments_intersect(a: &Segment, b: &Segment) -> bool {
    let points = [a.p, b.p, a.q, b.q];

    for i in 0..4 {
        let origin = points[i];
        let v1 = points[(i + 1) % 4] - origin;
        let vo = points[(i + 2) % 4] - origin;
        let v2 = points[(i + 3) % 4] - origin;

        let (Some(angle12), Some(angle_o1), Some(angle_o2)) = (
            angle_between(v1, v2),
            angle_between(vo, v1),
            angle_between(vo, v2),
        ) else {
            continue;
        };

        if angle12 < angle_o1 || angle12 < angle_o2 {
            return false;
        }
    }

    true
}

/// Translation, rotation and scale for placing a shape in the scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub translation: Vec2,
    /// Radians, counter-clockwise
    pub rotation: f32,
    pub scale: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }
}

impl Transform2D {
    pub fn from_translation(translation: Vec2) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec2::splat(scale);
        self
    }

    /// Homogeneous matrix: scale first, then rotate, then translate
    pub fn matrix(&self) -> Mat3 {
        Mat3::from_translation(self.translation)
            * Mat3::from_angle(self.rotation)
            * Mat3::from_scale(self.scale)
    }

    /// Column-major floats, ready for a `mat3` uniform
    pub fn to_cols_array(&self) -> [f32; 9] {
        self.matrix().to_cols_array()
    }

    #[inline]
    pub fn apply(&self, point: Vec2) -> Vec2 {
        self.matrix().transform_point2(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    fn seg(px: f32, py: f32, qx: f32, qy: f32) -> Segment {
        Segment::new(Vec2::new(px, py), Vec2::new(qx, qy))
    }

    #[test]
    fn test_crossing_segments_intersect() {
        assert!(segments_intersect(&seg(0.0, 0.0, 1.0, 1.0), &seg(0.0, 1.0, 1.0, 0.0)));
    }

    #[test]
    fn test_parallel_segments_miss() {
        assert!(!segments_intersect(&seg(0.0, 0.0, 1.0, 0.0), &seg(0.0, 1.0, 1.0, 1.0)));
    }

    #[test]
    fn test_collinear_disjoint_segments_miss() {
        assert!(!segments_intersect(&seg(0.0, 0.0, 1.0, 0.0), &seg(2.0, 0.0, 3.0, 0.0)));
    }

    #[test]
    fn test_short_segment_above_line_misses() {
        // Ball travel that stops short of the ground
        let ground = seg(0.0, 0.2, 1.0, 0.2);
        let travel = seg(0.5, 0.3, 0.52, 0.25);
        assert!(!segments_intersect(&travel, &ground));
    }

    #[test]
    fn test_travel_through_ground_hits() {
        let ground = seg(0.0, 0.2, 1.0, 0.2);
        let travel = seg(0.5, 0.21, 0.51, 0.19);
        assert!(segments_intersect(&travel, &ground));
    }

    #[test]
    fn test_touching_counts_as_intersection() {
        // T-junction: b starts on a
        assert!(segments_intersect(&seg(0.0, 0.0, 2.0, 0.0), &seg(1.0, 0.0, 1.0, 1.0)));
        // Shared endpoint
        assert!(segments_intersect(&seg(0.0, 0.0, 1.0, 0.0), &seg(1.0, 0.0, 2.0, 1.0)));
    }

    #[test]
    fn test_segment_intersects_itself() {
        // Every endpoint coincides with its twin, so no angle constrains it
        let a = seg(0.0, 0.0, 1.0, 0.5);
        assert!(segments_intersect(&a, &a));
        assert!(a.intersects(&a));
    }

    #[test]
    fn test_intersects_method_matches_free_function() {
        let a = seg(0.0, 0.0, 1.0, 1.0);
        let b = seg(0.0, 1.0, 1.0, 0.0);
        let c = seg(0.0, 2.0, 1.0, 2.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_normal_points_up_for_rightward_edge() {
        let n = seg(0.0, 0.0, 1.0, 0.0).normal();
        assert_eq!(n, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_transform_order() {
        // Scale, then rotate by 90°, then translate
        let t = Transform2D::from_translation(Vec2::new(1.0, 0.0))
            .with_rotation(FRAC_PI_2)
            .with_uniform_scale(2.0);
        let p = t.apply(Vec2::new(1.0, 0.0));
        assert!((p - Vec2::new(1.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn test_identity_transform() {
        let p = Vec2::new(0.3, 0.7);
        assert!((Transform2D::default().apply(p) - p).length() < 1e-6);
    }

    fn coord() -> impl Strategy<Value = f32> {
        -1.0f32..1.0
    }

    proptest! {
        #[test]
        fn prop_intersection_is_symmetric(
            ax in coord(), ay in coord(), bx in coord(), by in coord(),
            cx in coord(), cy in coord(), dx in coord(), dy in coord(),
        ) {
            let a = seg(ax, ay, bx, by);
            let b = seg(cx, cy, dx, dy);
            prop_assert_eq!(segments_intersect(&a, &b), segments_intersect(&b, &a));
        }

        #[test]
        fn prop_vertically_separated_segments_miss(
            ax in coord(), bx in coord(), cx in coord(), dx in coord(),
            low in 0.0f32..0.4, gap in 0.1f32..0.5,
        ) {
            // Both endpoints of `a` strictly below both endpoints of `b`
            let a = seg(ax, low, bx, low);
            let b = seg(cx, low + gap, dx, low + gap + 0.05);
            prop_assert!(!segments_intersect(&a, &b));
        }
    }
}

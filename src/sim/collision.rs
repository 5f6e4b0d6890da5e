//! Collision detection and response against the terrain polyline
//!
//! The ball is treated as a point: each step its travel segment is tested
//! against every landscape edge, and the first edge hit (in landscape order)
//! reflects the velocity.

use glam::Vec2;

use super::geometry::Segment;
use super::terrain::Landscape;
use crate::{rotate_vec, signed_angle_between};

/// First landscape edge crossed by `travel`, in landscape order
pub fn first_intersecting_segment(landscape: &Landscape, travel: &Segment) -> Option<Segment> {
    landscape
        .segments()
        .find(|edge| travel.intersects(edge))
}

/// Reflect velocity off a terrain edge and apply bounce loss.
///
/// The velocity is negated, then rotated by twice its signed angle to the
/// edge normal. The angle comes from an arcsine, so it is folded into
/// `[-π/2, π/2]`; for a ball hitting the top of an edge this is the usual
/// mirror reflection.
pub fn bounce_velocity(velocity: Vec2, surface: &Segment, bounce_loss: f32) -> Vec2 {
    let normal = surface.normal();
    let reversed = -velocity;
    let angle = signed_angle_between(reversed, normal);
    rotate_vec(reversed, 2.0 * angle) * (1.0 - bounce_loss)
}

/// Check if the ball is close enough to the hole bottom to count as sunk
#[inline]
pub fn is_in_hole(ball_pos: Vec2, hole_bottom: Vec2, half_hole_width: f32) -> bool {
    ball_pos.distance(hole_bottom) <= half_hole_width
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn flat_ground() -> Landscape {
        Landscape::new(vec![
            Vec2::new(0.0, 0.2),
            Vec2::new(0.5, 0.2),
            Vec2::new(1.0, 0.2),
        ])
    }

    #[test]
    fn test_bounce_off_flat_ground() {
        let ground = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
        let v = bounce_velocity(Vec2::new(1.0, -1.0), &ground, 0.3);
        assert!((v - Vec2::new(0.7, 0.7)).length() < 1e-5, "{v:?}");
    }

    #[test]
    fn test_bounce_straight_down_goes_straight_up() {
        let ground = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
        let v = bounce_velocity(Vec2::new(0.0, -2.0), &ground, 0.5);
        assert!((v - Vec2::new(0.0, 1.0)).length() < 1e-5, "{v:?}");
    }

    #[test]
    fn test_bounce_off_slope() {
        // 45° slope rising to the right; a ball falling straight down
        // leaves horizontally to the left
        let slope = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let v = bounce_velocity(Vec2::new(0.0, -1.0), &slope, 0.0);
        assert!((v - Vec2::new(-1.0, 0.0)).length() < 1e-5, "{v:?}");
    }

    #[test]
    fn test_first_intersecting_segment_in_order() {
        let land = flat_ground();
        // Travel crossing only the second edge
        let travel = Segment::new(Vec2::new(0.7, 0.25), Vec2::new(0.72, 0.15));
        let hit = first_intersecting_segment(&land, &travel).unwrap();
        assert_eq!(hit.p, Vec2::new(0.5, 0.2));

        let miss = Segment::new(Vec2::new(0.7, 0.25), Vec2::new(0.72, 0.22));
        assert!(first_intersecting_segment(&land, &miss).is_none());
    }

    #[test]
    fn test_in_hole() {
        let bottom = Vec2::new(0.8, 0.15);
        assert!(is_in_hole(bottom, bottom, 0.02));
        assert!(is_in_hole(bottom + Vec2::new(0.0, 0.019), bottom, 0.02));
        assert!(!is_in_hole(bottom + Vec2::new(0.03, 0.0), bottom, 0.02));
    }

    proptest! {
        #[test]
        fn prop_bounce_never_gains_speed(
            vx in -2.0f32..2.0, vy in -2.0f32..2.0,
            px in -1.0f32..1.0, py in -1.0f32..1.0,
            dx in 0.01f32..1.0, dy in -1.0f32..1.0,
            loss in 0.01f32..0.99,
        ) {
            let v = Vec2::new(vx, vy);
            let surface = Segment::new(Vec2::new(px, py), Vec2::new(px + dx, py + dy));
            let after = bounce_velocity(v, &surface, loss);
            prop_assert!(after.length() <= v.length() * (1.0 - loss) + 1e-5);
        }

        #[test]
        fn prop_hole_bottom_is_in_hole(x in 0.0f32..1.0, y in 0.0f32..1.0) {
            let p = Vec2::new(x, y);
            prop_assert!(is_in_hole(p, p, 0.02));
        }
    }
}

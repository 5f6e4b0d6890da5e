//! Procedural terrain and hole placement
//!
//! A landscape is a left-to-right polyline over `[0, 1]`. Each hole gets a
//! freshly generated landscape with a rectangular notch spliced in near the
//! right edge; the ball settles in the notch to finish the hole.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Segment;
use super::rng::RandomSource;
use crate::error::TerrainError;
use crate::tuning::Tuning;

/// Ground height as a polyline, sorted by x outside the hole notch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Landscape {
    pub points: Vec<Vec2>,
}

impl Landscape {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    /// Consecutive vertex pairs, in landscape order
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points.windows(2).map(|w| Segment::new(w[0], w[1]))
    }

    /// Horizontal extent `(first.x, last.x)`
    pub fn span(&self) -> Option<(f32, f32)> {
        Some((self.points.first()?.x, self.points.last()?.x))
    }

    /// True when the polyline reaches from x = 0 to x = 1
    pub fn covers_unit_span(&self) -> bool {
        matches!(self.span(), Some((start, end)) if start <= 0.0 && end >= 1.0)
    }

    /// Interpolated ground height at `x`.
    ///
    /// Uses the first segment with `p.x <= x < q.x`; inside the notch, where x
    /// repeats, that lands on the notch walls' lower edge.
    pub fn height_at(&self, x: f32) -> Result<f32, TerrainError> {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return Err(TerrainError::Degenerate(self.points.len()));
        };
        if self.points.len() < 2 {
            return Err(TerrainError::Degenerate(self.points.len()));
        }
        let out_of_range = TerrainError::OutOfRange {
            x,
            min: first.x,
            max: last.x,
        };
        if x < first.x || x > last.x {
            return Err(out_of_range);
        }
        if x == last.x {
            return Ok(last.y);
        }

        let i = self
            .points
            .iter()
            .position(|p| p.x > x)
            .filter(|&i| i > 0)
            .ok_or(out_of_range)?;
        let p = self.points[i - 1];
        let q = self.points[i];
        Ok(p.y + (x - p.x) / (q.x - p.x) * (q.y - p.y))
    }

    /// Point on the surface directly below (or above) `x`
    pub fn surface_point(&self, x: f32) -> Result<Vec2, TerrainError> {
        Ok(Vec2::new(x, self.height_at(x)?))
    }

    /// Vertical clearance between `point` and the ground.
    ///
    /// Only vertical distance matters for deciding whether the ball rests.
    pub fn distance_to_surface(&self, point: Vec2) -> Result<f32, TerrainError> {
        Ok((point.y - self.height_at(point.x)?).abs())
    }
}

/// Generate a landscape and truncate it at the first vertex with x >= 1.
///
/// Draws all segment endpoints first, then decides flat twins, then
/// accumulates x. The result may fall short of x = 1 with unlucky tuning;
/// check [`Landscape::covers_unit_span`].
pub fn generate_landscape<R: RandomSource + ?Sized>(rng: &mut R, tuning: &Tuning) -> Landscape {
    let count = (1.0 / tuning.min_seg_len).ceil() as usize + 1;

    // (segment length, height) pairs; the anchor's "length" is its own x
    let mut raw = Vec::with_capacity(count + 1);
    raw.push(tuning.landscape_anchor);
    for _ in 0..count {
        let len = rng.rand(tuning.min_seg_len, tuning.max_seg_len);
        let height = rng.rand(tuning.min_ground_height, tuning.max_ground_height);
        raw.push(Vec2::new(len, height));
    }

    let mut with_flats = Vec::with_capacity(raw.len() * 2);
    for p in raw {
        with_flats.push(p);
        if rng.chance(tuning.flat_chance) {
            with_flats.push(Vec2::new(rng.rand(tuning.min_seg_len, tuning.max_seg_len), p.y));
        }
    }

    let mut points = Vec::with_capacity(with_flats.len());
    let mut x = 0.0;
    for p in with_flats {
        x += p.x;
        points.push(Vec2::new(x, p.y));
        if x >= 1.0 {
            break;
        }
    }

    Landscape::new(points)
}

/// Six-point notch relative to the hole's surface point
pub fn hole_pattern(tuning: &Tuning) -> [Vec2; 6] {
    let flat = tuning.hole_flat_width;
    let half = tuning.half_hole_width;
    let depth = tuning.hole_depth;
    [
        Vec2::new(-flat - half, 0.0),
        Vec2::new(-half, 0.0),
        Vec2::new(-half, -depth),
        Vec2::new(half, -depth),
        Vec2::new(half, 0.0),
        Vec2::new(flat + half, 0.0),
    ]
}

/// Splice the hole notch into `landscape` centred at `center_x`.
///
/// Original vertices within the notch footprint are dropped. Returns the new
/// landscape and the bottom-centre of the hole.
pub fn splice_hole(
    landscape: &Landscape,
    center_x: f32,
    tuning: &Tuning,
) -> Result<(Landscape, Vec2), TerrainError> {
    let baseline = landscape.height_at(center_x)?;
    let surface = Vec2::new(center_x, baseline);
    let footprint = tuning.hole_footprint();

    let split = landscape
        .points
        .iter()
        .position(|p| p.x > center_x)
        .unwrap_or(landscape.points.len());
    let (before, after) = landscape.points.split_at(split);

    let keep_before = before
        .iter()
        .rposition(|p| p.x + footprint < center_x)
        .map_or(0, |i| i + 1);
    let skip_after = after
        .iter()
        .position(|p| p.x - footprint > center_x)
        .unwrap_or(after.len());

    if keep_before == 0 || skip_after == after.len() {
        return Err(TerrainError::HoleOutOfBounds { center: center_x });
    }

    let mut points = Vec::with_capacity(keep_before + 6 + after.len() - skip_after);
    points.extend_from_slice(&before[..keep_before]);
    points.extend(hole_pattern(tuning).iter().map(|offset| surface + *offset));
    points.extend_from_slice(&after[skip_after..]);

    let bottom = Vec2::new(center_x, baseline - tuning.hole_depth);
    Ok((Landscape::new(points), bottom))
}

/// One playable hole
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub landscape: Landscape,
    /// Where the ball is placed at the start and after leaving the screen
    pub starting_position: Vec2,
    /// Target point at the bottom-centre of the notch
    pub hole_bottom: Vec2,
}

impl Hole {
    /// X-range occupied by the notch (inclusive)
    pub fn notch_range(&self, tuning: &Tuning) -> (f32, f32) {
        let footprint = tuning.hole_footprint();
        (self.hole_bottom.x - footprint, self.hole_bottom.x + footprint)
    }
}

/// Build a new hole: landscape, ball start, notch.
///
/// Redraws the landscape when the random draws don't cover the screen or the
/// notch can't be placed, up to `tuning.max_generation_attempts` times.
pub fn setup_hole<R: RandomSource + ?Sized>(rng: &mut R, tuning: &Tuning) -> Result<Hole, TerrainError> {
    for attempt in 1..=tuning.max_generation_attempts {
        let landscape = generate_landscape(rng, tuning);
        if !landscape.covers_unit_span() {
            log::warn!(
                "Landscape attempt {} spans {:?}, redrawing",
                attempt,
                landscape.span()
            );
            continue;
        }

        let start = landscape.surface_point(tuning.ball_start_x)?;
        let starting_position = start + Vec2::new(0.0, tuning.ball_start_lift);

        let center_x = rng.rand(tuning.hole_min_x, tuning.hole_max_x);
        match splice_hole(&landscape, center_x, tuning) {
            Ok((landscape, hole_bottom)) => {
                log::debug!(
                    "Hole ready after {} attempt(s): {} vertices, bottom at ({:.3}, {:.3})",
                    attempt,
                    landscape.points.len(),
                    hole_bottom.x,
                    hole_bottom.y
                );
                return Ok(Hole {
                    landscape,
                    starting_position,
                    hole_bottom,
                });
            }
            Err(TerrainError::HoleOutOfBounds { center }) => {
                log::warn!("Hole at x = {:.3} has no room, redrawing", center);
            }
            Err(e) => return Err(e),
        }
    }

    Err(TerrainError::GenerationDidNotConverge {
        attempts: tuning.max_generation_attempts,
    })
}

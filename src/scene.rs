//! Drawable scene description
//!
//! Turns a [`GameState`] into an ordered list of draw commands. Vertices are
//! in shape-local coordinates; each command carries the colour and transform
//! the renderer should apply. Nothing here touches a graphics API.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use std::f32::consts::TAU;

use crate::sim::celebration::Explosion;
use crate::sim::geometry::Transform2D;
use crate::sim::state::GameState;
use crate::sim::terrain::Landscape;

/// Sectors in the ball's triangle fan
pub const BALL_SECTORS: u32 = 16;
/// Side of the square particle sprite, in pixels
pub const PARTICLE_SIZE: u32 = 8;

/// Flag dimensions, relative to the hole bottom
const POLE_HALF_WIDTH: f32 = 0.004;
const POLE_HEIGHT: f32 = 0.09;
const FLAG_HEIGHT: f32 = 0.03;
const FLAG_LENGTH: f32 = 0.04;

/// 2D vertex, layout-compatible with a `vec2<f32>` attribute
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
}

impl Vertex {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { position: [x, y] }
    }
}

impl From<Vec2> for Vertex {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.5, 0.5, 1.0, 1.0];
    pub const GROUND: [f32; 3] = [0.0, 0.9, 0.0];
    pub const FLAG_POLE: [f32; 3] = [0.8, 0.4, 0.2];
    pub const FLAG: [f32; 3] = [1.0, 0.0, 0.0];
    pub const AIM_LINE: [f32; 3] = [1.0, 1.0, 0.0];
    pub const BALL: [f32; 3] = [1.0, 1.0, 1.0];
    pub const PARTICLE: [f32; 3] = [1.0, 1.0, 0.0];
}

/// How a command's vertex list is assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
    TriangleFan,
    Lines,
    /// Textured point sprites, see [`particle_sprite`]
    Points,
}

/// One draw call
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub primitive: Primitive,
    pub vertices: Vec<Vertex>,
    pub color: [f32; 3],
    pub transform: Transform2D,
}

impl DrawCommand {
    fn new(primitive: Primitive, vertices: Vec<Vertex>, color: [f32; 3]) -> Self {
        Self {
            primitive,
            vertices,
            color,
            transform: Transform2D::default(),
        }
    }

    fn at(mut self, translation: Vec2) -> Self {
        self.transform = Transform2D::from_translation(translation);
        self
    }

    /// Raw vertex bytes for upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Everything needed to draw one frame, in draw order
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub clear_color: [f32; 4],
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    /// Ground, flag, aim line (while aiming), ball, then one point list per explosion
    pub fn build(state: &GameState) -> Self {
        let explosions = state
            .celebration
            .as_ref()
            .map_or(&[][..], |c| c.explosions.as_slice());
        let mut commands = Vec::with_capacity(5 + explosions.len());

        commands.push(DrawCommand::new(
            Primitive::Triangles,
            ground(&state.hole.landscape),
            colors::GROUND,
        ));

        let bottom = state.hole.hole_bottom;
        let (pole, flag) = flag();
        commands.push(DrawCommand::new(Primitive::Triangles, pole, colors::FLAG_POLE).at(bottom));
        commands.push(DrawCommand::new(Primitive::Triangles, flag, colors::FLAG).at(bottom));

        if let Some((from, to)) = state.aim_line() {
            commands.push(DrawCommand::new(
                Primitive::Lines,
                vec![from.into(), to.into()],
                colors::AIM_LINE,
            ));
        }

        commands.push(
            DrawCommand::new(
                Primitive::TriangleFan,
                ball_fan(state.ball.radius, BALL_SECTORS),
                colors::BALL,
            )
            .at(state.ball.pos),
        );

        commands.extend(explosions.iter().map(explosion_points));

        Self {
            clear_color: colors::BACKGROUND,
            commands,
        }
    }
}

/// Two triangles per landscape edge, dropped down to y = 0
pub fn ground(landscape: &Landscape) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(landscape.points.len().saturating_sub(1) * 6);

    for segment in landscape.segments() {
        let (p, q) = (segment.p, segment.q);
        let bp = Vec2::new(p.x, 0.0);
        let bq = Vec2::new(q.x, 0.0);

        vertices.extend([p, q, bp, bq, bp, q].map(Vertex::from));
    }

    vertices
}

/// Pole and pennant, with the pole's foot at the origin
pub fn flag() -> (Vec<Vertex>, Vec<Vertex>) {
    let w = POLE_HALF_WIDTH;
    let h = POLE_HEIGHT;
    let pole = vec![
        Vertex::new(-w, h),
        Vertex::new(w, h),
        Vertex::new(-w, 0.0),
        Vertex::new(w, h),
        Vertex::new(-w, 0.0),
        Vertex::new(w, 0.0),
    ];
    let flag = vec![
        Vertex::new(w, h),
        Vertex::new(w + FLAG_LENGTH, h - FLAG_HEIGHT / 2.0),
        Vertex::new(w, h - FLAG_HEIGHT),
    ];
    (pole, flag)
}

/// Rim points of a circle centred on the origin, for a triangle fan
pub fn ball_fan(radius: f32, sectors: u32) -> Vec<Vertex> {
    (0..sectors)
        .map(|i| {
            let theta = TAU * i as f32 / sectors as f32;
            Vertex::new(radius * theta.cos(), radius * theta.sin())
        })
        .collect()
}

fn explosion_points(explosion: &Explosion) -> DrawCommand {
    let vertices = explosion
        .particles
        .iter()
        .map(|particle| Vertex::from(particle.position))
        .collect();
    DrawCommand::new(Primitive::Points, vertices, colors::PARTICLE).at(explosion.position)
}

/// Soft round RGBA sprite for particles, row-major, `size * size` texels.
///
/// Alpha follows a gaussian of the distance from the centre, so particles
/// fade out towards their edges.
pub fn particle_sprite(size: u32) -> Vec<[u8; 4]> {
    let mid = Vec2::splat(size as f32 / 2.0 - 0.5);
    let dist_to_edge = mid.length();

    let mut texels = Vec::with_capacity((size * size) as usize);
    for x in 0..size {
        for y in 0..size {
            let d = if dist_to_edge > 0.0 {
                (Vec2::new(x as f32, y as f32) - mid).length() / dist_to_edge
            } else {
                0.0
            };
            texels.push(sprite_texel(gaussian(d)));
        }
    }
    texels
}

fn gaussian(x: f32) -> f32 {
    const C: f32 = 0.3;
    (-x * x / (2.0 * C * C)).exp()
}

fn sprite_texel(alpha: f32) -> [u8; 4] {
    let alpha = alpha * 0.1;
    let scaled = |v: f32| (v * alpha).floor() as u8;
    [255, 100 + scaled(155.0), scaled(255.0 * alpha), scaled(255.0)]
}

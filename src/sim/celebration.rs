//! Firework celebration after a completed hole
//!
//! Purely time-driven: explosions spawn on a fixed interval, their particles
//! fly outward and slow down, and periodically leave frozen "ghost" copies
//! behind as trails. Nothing here collides with the terrain.
//!
//! Particles and explosions are plain values; each tick builds a new
//! explosion list from the previous one.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::tuning::Tuning;

/// A single spark, positioned relative to its explosion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl Particle {
    /// Random spark near the explosion centre.
    ///
    /// Velocity is the x/y part of a random unit 3D vector, which makes the
    /// burst look spherical rather than like a flat ring.
    pub fn spawn<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let position = Vec2::new(rng.rand(-1.0, 1.0), rng.rand(-1.0, 1.0)) * 0.01;
        let direction = Vec3::new(rng.rand(-1.0, 1.0), rng.rand(-1.0, 1.0), rng.rand(-1.0, 1.0));
        Self {
            position,
            velocity: direction.normalize_or_zero().truncate(),
        }
    }

    /// Advance by `dt` milliseconds for an explosion that is `age` ms old
    pub fn advanced(self, dt: f32, age: f32, tuning: &Tuning) -> Self {
        let speed = explosion_speed_at(age, tuning);
        let delta = dt * tuning.game_speed;

        let mut velocity = self.velocity;
        // Gravity is divided by speed so it doesn't fade along with it
        velocity.y += delta / speed * tuning.gravity.y / 10.0;
        let position = self.position + velocity * (delta * speed);

        Self { position, velocity }
    }
}

/// Outward speed of an explosion's particles, decaying with age
#[inline]
pub fn explosion_speed_at(age: f32, tuning: &Tuning) -> f32 {
    let t = age / 500.0;
    tuning.explosion_speed / (t * t + 1.0)
}

/// Append a frozen copy of the live particles, dropping the oldest trail once
/// the buffer holds `num_trails` generations.
///
/// The first `num_particles` entries are always the live particles.
pub fn with_trails(mut particles: Vec<Particle>, tuning: &Tuning) -> Vec<Particle> {
    let n = tuning.num_particles;
    let live = n.min(particles.len());
    let ghosts: Vec<Particle> = particles[..live]
        .iter()
        .map(|p| Particle {
            position: p.position,
            velocity: Vec2::ZERO,
        })
        .collect();
    particles.extend(ghosts);

    let cap = n * tuning.num_trails;
    if particles.len() > cap {
        let end = ((2 + tuning.num_trails) * n).min(particles.len());
        let start = (2 * n).min(end);
        let mut trimmed = Vec::with_capacity(cap);
        trimmed.extend_from_slice(&particles[..live]);
        trimmed.extend_from_slice(&particles[start..end]);
        particles = trimmed;
    }
    particles
}

/// One burst of particles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub position: Vec2,
    pub particles: Vec<Particle>,
    /// Milliseconds since spawn
    pub age: f32,
    /// Milliseconds left before the particles vanish
    pub time_to_live: f32,
}

impl Explosion {
    pub fn spawn<R: RandomSource + ?Sized>(rng: &mut R, position: Vec2, tuning: &Tuning) -> Self {
        Self {
            position,
            particles: (0..tuning.num_particles).map(|_| Particle::spawn(rng)).collect(),
            age: 0.0,
            time_to_live: tuning.explosion_life,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.time_to_live > 0.0
    }

    /// Advance by `dt` ms. Expired explosions keep their slot but lose their
    /// particles.
    pub fn advanced(self, dt: f32, spawn_trails: bool, tuning: &Tuning) -> Self {
        if !self.is_alive() {
            return Self {
                particles: Vec::new(),
                ..self
            };
        }

        let time_to_live = self.time_to_live - dt;
        let age = self.age + dt;
        let particles = if spawn_trails {
            with_trails(self.particles, tuning)
        } else {
            self.particles
        };
        let particles = particles
            .into_iter()
            .map(|p| p.advanced(dt, age, tuning))
            .collect();

        Self {
            position: self.position,
            particles,
            age,
            time_to_live,
        }
    }
}

/// Whether the celebration is still playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CelebrationStatus {
    Running,
    Finished,
}

/// Timeline of one celebration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Celebration {
    /// Milliseconds since the hole was completed
    pub elapsed: f32,
    /// Explosions spawned so far
    pub spawned: u32,
    trail_timer: f32,
    pub explosions: Vec<Explosion>,
}

impl Celebration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the timeline by `dt` milliseconds.
    ///
    /// Every explosion whose slot `k * explosion_interval` has been passed is
    /// spawned this tick. Once `elapsed` reaches the celebration duration the
    /// explosion list is cleared and `Finished` is returned.
    pub fn advance<R: RandomSource + ?Sized>(
        &mut self,
        dt: f32,
        rng: &mut R,
        tuning: &Tuning,
    ) -> CelebrationStatus {
        self.elapsed += dt;

        while self.spawned < tuning.num_explosions
            && self.elapsed > self.spawned as f32 * tuning.explosion_interval
        {
            let jitter = Vec2::new(
                rng.rand(-tuning.explosion_jitter.x, tuning.explosion_jitter.x),
                rng.rand(-tuning.explosion_jitter.y, tuning.explosion_jitter.y),
            );
            let explosion = Explosion::spawn(rng, tuning.explosion_center + jitter, tuning);
            self.explosions.push(explosion);
            self.spawned += 1;
        }

        self.trail_timer += dt;
        let spawn_trails = self.trail_timer > tuning.trail_interval;
        self.explosions = std::mem::take(&mut self.explosions)
            .into_iter()
            .map(|e| e.advanced(dt, spawn_trails, tuning))
            .collect();
        if spawn_trails {
            self.trail_timer -= tuning.trail_interval;
        }

        if self.elapsed >= tuning.celebration_duration() {
            self.explosions.clear();
            CelebrationStatus::Finished
        } else {
            CelebrationStatus::Running
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::SeededRng;

    #[test]
    fn test_particle_spawn_near_center() {
        let mut rng = SeededRng::new(5);
        for _ in 0..100 {
            let p = Particle::spawn(&mut rng);
            assert!(p.position.abs().max_element() <= 0.01);
            assert!(p.velocity.length() <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn test_speed_decays_with_age() {
        let tuning = Tuning::default();
        assert_eq!(explosion_speed_at(0.0, &tuning), tuning.explosion_speed);
        assert!((explosion_speed_at(500.0, &tuning) - tuning.explosion_speed / 2.0).abs() < 1e-6);
        assert!(explosion_speed_at(1000.0, &tuning) < explosion_speed_at(500.0, &tuning));
    }

    #[test]
    fn test_particle_falls() {
        let tuning = Tuning::default();
        let p = Particle {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
        };
        let p = p.advanced(16.0, 16.0, &tuning);
        assert!(p.velocity.y < 0.0);
        assert!(p.position.y < 0.0);
        assert_eq!(p.position.x, 0.0);
    }

    #[test]
    fn test_trails_are_capped() {
        let tuning = Tuning {
            num_particles: 4,
            num_trails: 3,
            ..Default::default()
        };
        let live: Vec<Particle> = (0..4)
            .map(|i| Particle {
                position: Vec2::splat(i as f32),
                velocity: Vec2::ONE,
            })
            .collect();

        let mut particles = live.clone();
        for _ in 0..10 {
            particles = with_trails(particles, &tuning);
            assert!(particles.len() <= 12);
            assert_eq!(&particles[..4], &live[..]);
        }
        assert_eq!(particles.len(), 12);
        assert!(particles[4..].iter().all(|p| p.velocity == Vec2::ZERO));
    }

    #[test]
    fn test_expired_explosion_drops_particles() {
        let tuning = Tuning::default();
        let mut explosion = Explosion::spawn(&mut SeededRng::new(1), Vec2::new(0.7, 0.8), &tuning);
        assert_eq!(explosion.particles.len(), tuning.num_particles);

        explosion = explosion.advanced(tuning.explosion_life, false, &tuning);
        assert!(!explosion.is_alive());
        assert!(!explosion.particles.is_empty());

        explosion = explosion.advanced(16.0, false, &tuning);
        assert!(explosion.particles.is_empty());
        assert_eq!(explosion.position, Vec2::new(0.7, 0.8));
    }

    #[test]
    fn test_spawn_schedule() {
        let tuning = Tuning::default();
        let mut rng = SeededRng::new(11);
        let mut celebration = Celebration::new();

        let dt = 16.0;
        let mut elapsed = 0.0f32;
        loop {
            let status = celebration.advance(dt, &mut rng, &tuning);
            elapsed += dt;

            // Explosion k is due once elapsed passes k * interval
            let due = (0..tuning.num_explosions)
                .filter(|k| elapsed > *k as f32 * tuning.explosion_interval)
                .count() as u32;
            assert_eq!(celebration.spawned, due, "at {elapsed} ms");

            if status == CelebrationStatus::Finished {
                break;
            }
            assert_eq!(celebration.explosions.len() as u32, celebration.spawned);
        }
        assert_eq!(celebration.spawned, tuning.num_explosions);
        assert!(celebration.explosions.is_empty());
    }

    #[test]
    fn test_finishes_exactly_at_duration() {
        let tuning = Tuning::default();
        let mut rng = SeededRng::new(2);
        let mut celebration = Celebration::new();

        // 2100 ms in 100 ms ticks
        for _ in 0..20 {
            assert_eq!(celebration.advance(100.0, &mut rng, &tuning), CelebrationStatus::Running);
        }
        assert_eq!(celebration.advance(100.0, &mut rng, &tuning), CelebrationStatus::Finished);
        assert_eq!(celebration.spawned, tuning.num_explosions);
    }

    #[test]
    fn test_large_tick_catches_up_spawns() {
        let tuning = Tuning::default();
        let mut celebration = Celebration::new();
        celebration.advance(650.0, &mut SeededRng::new(3), &tuning);
        // Slots at 0, 200, 400, 600 have passed
        assert_eq!(celebration.spawned, 4);
    }

    #[test]
    fn test_explosions_spawn_around_center() {
        let tuning = Tuning::default();
        let mut celebration = Celebration::new();
        celebration.advance(2000.0, &mut SeededRng::new(9), &tuning);
        for e in &celebration.explosions {
            let offset = (e.position - tuning.explosion_center).abs();
            assert!(offset.x <= tuning.explosion_jitter.x + 1e-6);
            assert!(offset.y <= tuning.explosion_jitter.y + 1e-6);
        }
    }
}

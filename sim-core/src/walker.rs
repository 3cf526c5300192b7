use crate::types::Position;
use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

/// Samples a point uniformly over the surface of a sphere of `radius`
/// centred on the origin.
///
/// The polar angle comes from a uniform cosine, so samples do not bunch up
/// at the poles.
pub fn spawn_on_sphere(radius: f32, rng: &mut impl Rng) -> Position {
    let phi = rng.random_range(0.0..TAU);
    let cos_theta: f32 = rng.random_range(-1.0..1.0);
    let theta = cos_theta.acos();
    let sin_theta = theta.sin();

    Vec3::new(
        radius * sin_theta * phi.cos(),
        radius * sin_theta * phi.sin(),
        radius * cos_theta,
    )
}

/// Displacement for one step: drift of length `step_size` toward the
/// origin plus a jitter in `[-jitter / 2, jitter / 2)` on each axis.
pub fn walk_delta(pos: Position, step_size: f32, jitter: f32, rng: &mut impl Rng) -> Vec3 {
    let drift = (-pos).normalize_or_zero() * step_size;
    let noise = Vec3::new(
        (rng.random::<f32>() - 0.5) * jitter,
        (rng.random::<f32>() - 0.5) * jitter,
        (rng.random::<f32>() - 0.5) * jitter,
    );
    drift + noise
}

/// Particles still random-walking toward the aggregate.
#[derive(Debug, Clone, Default)]
pub struct WalkerSet {
    pub points: Vec<Position>,
}

impl WalkerSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    pub fn from_positions(points: Vec<Position>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Spawns walkers on the sphere until there are `target` of them.
    ///
    /// ### Returns
    /// How many walkers were spawned.
    pub fn top_up(&mut self, target: usize, spawn_radius: f32, rng: &mut impl Rng) -> usize {
        let before = self.points.len();
        while self.points.len() < target {
            self.points.push(spawn_on_sphere(spawn_radius, rng));
        }
        self.points.len() - before
    }
}

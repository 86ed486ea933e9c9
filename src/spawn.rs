//! Spawn helpers for particle initialization.
//!
//! [`SpawnContext`] wraps the RNG used to place particles and exposes the
//! distributions the field supports. A seeded context always produces the same
//! sequence, which keeps two mounts with the same seed identical.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::{PI, TAU};

use crate::config::{Distribution, FieldConfig};
use crate::particle::Particle;

/// Number of full turns of the double helix over its height.
const HELIX_TURNS: f32 = 3.0;

/// Context carrying the RNG and bounds while a particle set is spawned.
pub struct SpawnContext {
    /// Index of the particle being spawned (0 to count-1).
    pub index: u32,
    /// Total number of particles being spawned.
    pub count: u32,
    /// Bounding radius of the field.
    pub radius: f32,
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a spawn context. Without a seed the RNG is seeded from the clock.
    pub fn new(count: u32, radius: f32, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        });

        Self {
            index: 0,
            count,
            radius,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Normalized progress through the spawn (0.0 to 1.0).
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.count <= 1 {
            0.0
        } else {
            self.index as f32 / (self.count - 1) as f32
        }
    }

    /// Random f32 in the given range. Returns `min` for an empty range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Random point on a spherical shell between `inner` and `outer` radius.
    ///
    /// Directions are uniform over the sphere (z uniform in [-1, 1]).
    pub fn random_on_shell(&mut self, inner: f32, outer: f32) -> Vec3 {
        let theta = self.rng.gen_range(0.0..TAU);
        let z: f32 = self.rng.gen_range(-1.0..=1.0);
        let r = self.random_range(inner, outer);
        let ring = (1.0 - z * z).max(0.0).sqrt();

        Vec3::new(r * ring * theta.cos(), r * ring * theta.sin(), r * z)
    }

    /// Random point inside a cube of given half-size, centered at origin.
    pub fn random_in_cube(&mut self, half_size: f32) -> Vec3 {
        Vec3::new(
            self.rng.gen_range(-half_size..half_size),
            self.rng.gen_range(-half_size..half_size),
            self.rng.gen_range(-half_size..half_size),
        )
    }

    /// Position on one strand of a double helix along the Y axis.
    ///
    /// Even indices land on the first strand, odd indices on the second one,
    /// half a turn apart. A small jitter keeps the strands from looking ruled.
    pub fn helix_position(&mut self, radius: f32, height: f32) -> Vec3 {
        let strand = (self.index % 2) as f32;
        let t = self.progress();
        let angle = t * TAU * HELIX_TURNS + strand * PI;
        let jitter = radius * 0.08;

        Vec3::new(
            radius * angle.cos() + self.random_range(-jitter, jitter),
            (t - 0.5) * height,
            radius * angle.sin() + self.random_range(-jitter, jitter),
        )
    }

    /// Random unit vector, used as a rotation axis.
    pub fn random_direction(&mut self) -> Vec3 {
        self.random_on_shell(1.0, 1.0).try_normalize().unwrap_or(Vec3::Y)
    }

    /// Random phase triple in [0, TAU).
    pub fn random_phase(&mut self) -> Vec3 {
        Vec3::new(
            self.rng.gen_range(0.0..TAU),
            self.rng.gen_range(0.0..TAU),
            self.rng.gen_range(0.0..TAU),
        )
    }
}

/// Sample a piecewise-linear gradient at `t` (clamped to 0.0-1.0).
pub fn gradient_color(stops: &[[f32; 3]], t: f32) -> Vec3 {
    match stops {
        [] => Vec3::ONE,
        [only] => Vec3::from_array(*only),
        _ => {
            let scaled = t.clamp(0.0, 1.0) * (stops.len() - 1) as f32;
            let i = (scaled.floor() as usize).min(stops.len() - 2);
            let local = scaled - i as f32;
            Vec3::from_array(stops[i]).lerp(Vec3::from_array(stops[i + 1]), local)
        }
    }
}

/// Spawn the full particle set for a configuration.
pub fn spawn_particles(config: &FieldConfig) -> Vec<Particle> {
    let mut ctx = SpawnContext::new(config.particle_count, config.radius, config.seed);
    let radius = config.radius;

    (0..config.particle_count)
        .map(|index| {
            ctx.index = index;
            let origin = match config.distribution {
                Distribution::SphereShell => {
                    ctx.random_on_shell(radius * (1.0 - config.shell_thickness), radius)
                }
                Distribution::Cube => ctx.random_in_cube(radius),
                Distribution::Helix => ctx.helix_position(radius * 0.5, radius * 2.0),
            };
            let axis = ctx.random_direction();
            let speed = ctx.random_range(config.min_speed, config.max_speed);
            let phase = ctx.random_phase();

            let t = origin.y / radius * 0.5 + 0.5;
            let color = gradient_color(&config.gradient, t).extend(1.0);

            Particle::new(origin, axis, speed, phase, color)
        })
        .collect()
}

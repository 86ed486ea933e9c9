//! Field configuration.
//!
//! [`FieldConfig`] holds every tunable of the particle field. It can be built
//! in code with the `with_*` methods or loaded from a JSON file; every field is
//! optional in JSON and falls back to its default.
//!
//! ```ignore
//! let config = FieldConfig::new()
//!     .with_particle_count(150)
//!     .with_distribution(Distribution::Helix)
//!     .with_connection_distance(14.0)
//!     .with_seed(7);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// Initial spatial distribution of the particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distribution {
    /// Spherical shell of outer radius `radius`.
    #[default]
    SphereShell,
    /// Uniform cube of half-size `radius`.
    Cube,
    /// Two interleaved helix strands of radius `radius` along the Y axis.
    Helix,
}

/// Per-frame motion model. Both are pure functions of elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    /// Rotate about a per-particle axis at the particle's angular speed.
    #[default]
    Orbit,
    /// Bounded sinusoidal offset around the origin position.
    Drift,
}

/// Configuration for a [`ParticleField`](crate::ParticleField).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldConfig {
    /// Number of particles, fixed for the lifetime of a mount.
    pub particle_count: u32,
    pub distribution: Distribution,
    pub motion: Motion,
    /// Bounding radius (cube half-size, helix radius).
    pub radius: f32,
    /// Shell thickness as a fraction of `radius`.
    pub shell_thickness: f32,
    /// Angular speed range in radians per second.
    pub min_speed: f32,
    pub max_speed: f32,
    pub drift_amplitude: f32,
    /// Edge threshold in world units. Pairs strictly closer are connected.
    pub connection_distance: f32,
    /// Alpha of a line between two coincident particles.
    pub line_opacity: f32,
    /// Point diameter in logical pixels.
    pub point_size: f32,
    /// Color gradient stops (RGB, 0.0-1.0), sampled by particle height.
    pub gradient: Vec<[f32; 3]>,
    pub fov_degrees: f32,
    pub camera_distance: f32,
    /// Fraction of the remaining distance the camera covers each frame.
    pub camera_damping: f32,
    /// Camera offset in world units per unit of normalized pointer position.
    pub pointer_sway: f32,
    pub auto_rotate_speed: f32,
    /// Seconds without pointer movement before the camera auto-rotates.
    pub idle_timeout: f32,
    /// Ceiling applied to the device pixel ratio.
    pub max_pixel_ratio: f32,
    pub clear_color: [f32; 4],
    /// RNG seed. `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 120,
            distribution: Distribution::SphereShell,
            motion: Motion::Orbit,
            radius: 60.0,
            shell_thickness: 0.25,
            min_speed: 0.05,
            max_speed: 0.25,
            drift_amplitude: 4.0,
            connection_distance: 12.0,
            line_opacity: 0.35,
            point_size: 3.0,
            gradient: vec![
                [0.145, 0.388, 0.922], // blue
                [0.576, 0.200, 0.918], // violet
                [0.925, 0.282, 0.600], // pink
            ],
            fov_degrees: 75.0,
            camera_distance: 150.0,
            camera_damping: 0.05,
            pointer_sway: 30.0,
            auto_rotate_speed: 0.1,
            idle_timeout: 3.0,
            max_pixel_ratio: 2.0,
            clear_color: [0.0, 0.0, 0.0, 0.0],
            seed: None,
        }
    }
}

impl FieldConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FieldError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(text: &str) -> Result<Self, FieldError> {
        let config: FieldConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is in range.
    pub fn validate(&self) -> Result<(), FieldError> {
        let invalid = |msg: &str| Err(FieldError::InvalidConfig(msg.to_string()));

        if self.particle_count == 0 {
            return invalid("particle_count must be at least 1");
        }
        if !(self.radius > 0.0) {
            return invalid("radius must be positive");
        }
        if !(0.0..=1.0).contains(&self.shell_thickness) {
            return invalid("shell_thickness must be within 0.0..=1.0");
        }
        if self.min_speed > self.max_speed {
            return invalid("min_speed must not exceed max_speed");
        }
        if !(self.connection_distance > 0.0) {
            return invalid("connection_distance must be positive");
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return invalid("fov_degrees must be within (0, 180)");
        }
        if !(self.camera_distance > 0.0) {
            return invalid("camera_distance must be positive");
        }
        if !(self.camera_damping > 0.0 && self.camera_damping <= 1.0) {
            return invalid("camera_damping must be within (0, 1]");
        }
        if self.gradient.is_empty() {
            return invalid("gradient needs at least one color stop");
        }
        if !(self.max_pixel_ratio >= 1.0) {
            return invalid("max_pixel_ratio must be at least 1.0");
        }
        Ok(())
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the initial distribution.
    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// Set the motion model.
    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = motion;
        self
    }

    /// Set the bounding radius.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Set the angular speed range (radians per second).
    pub fn with_speed_range(mut self, min: f32, max: f32) -> Self {
        self.min_speed = min;
        self.max_speed = max;
        self
    }

    /// Set the edge threshold.
    pub fn with_connection_distance(mut self, distance: f32) -> Self {
        self.connection_distance = distance;
        self
    }

    /// Set the gradient color stops.
    pub fn with_gradient(mut self, stops: Vec<[f32; 3]>) -> Self {
        self.gradient = stops;
        self
    }

    /// Set the camera rest distance and vertical field of view.
    pub fn with_camera(mut self, distance: f32, fov_degrees: f32) -> Self {
        self.camera_distance = distance;
        self.fov_degrees = fov_degrees;
        self
    }

    /// Set the camera interpolation factor per frame.
    pub fn with_camera_damping(mut self, damping: f32) -> Self {
        self.camera_damping = damping;
        self
    }

    /// Set the device pixel ratio ceiling.
    pub fn with_max_pixel_ratio(mut self, ratio: f32) -> Self {
        self.max_pixel_ratio = ratio;
        self
    }

    /// Seed the RNG so that two mounts spawn identical particles.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

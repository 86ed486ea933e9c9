//! Particle state and motion.

use glam::{Quat, Vec3, Vec4};

use crate::config::Motion;

/// One point of the field.
///
/// Everything except `position` is fixed at spawn time, so the position at
/// any elapsed time is a pure function of the particle and that time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Spawn position.
    pub origin: Vec3,
    /// Position at the last tick.
    pub position: Vec3,
    /// Unit rotation axis for orbit motion.
    pub axis: Vec3,
    /// Angular speed in radians per second.
    pub speed: f32,
    /// Per-axis phase offsets for drift motion.
    pub phase: Vec3,
    /// RGBA color.
    pub color: Vec4,
}

impl Particle {
    pub fn new(origin: Vec3, axis: Vec3, speed: f32, phase: Vec3, color: Vec4) -> Self {
        Self {
            origin,
            position: origin,
            axis,
            speed,
            phase,
            color,
        }
    }

    /// Position at `elapsed` seconds under the given motion model.
    pub fn position_at(&self, motion: Motion, elapsed: f32, drift_amplitude: f32) -> Vec3 {
        let angle = self.speed * elapsed;
        match motion {
            Motion::Orbit => Quat::from_axis_angle(self.axis, angle) * self.origin,
            Motion::Drift => {
                let offset = Vec3::new(
                    (angle + self.phase.x).sin(),
                    (angle * 0.8 + self.phase.y).cos(),
                    (angle * 1.3 + self.phase.z).sin(),
                );
                self.origin + offset * drift_amplitude
            }
        }
    }

    /// Move to the position for `elapsed`.
    #[inline]
    pub fn advance(&mut self, motion: Motion, elapsed: f32, drift_amplitude: f32) {
        self.position = self.position_at(motion, elapsed, drift_amplitude);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn particle() -> Particle {
        Particle::new(Vec3::new(10.0, 0.0, 0.0), Vec3::Y, PI, Vec3::ZERO, Vec4::ONE)
    }

    #[test]
    fn test_orbit_preserves_distance() {
        let p = particle();
        for step in 0..20 {
            let pos = p.position_at(Motion::Orbit, step as f32 * 0.1, 0.0);
            assert!((pos.length() - 10.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_orbit_half_turn() {
        // speed PI rad/s: one second is half a turn about Y
        let pos = particle().position_at(Motion::Orbit, 1.0, 0.0);
        assert!((pos - Vec3::new(-10.0, 0.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn test_drift_is_bounded() {
        let p = particle();
        for step in 0..50 {
            let pos = p.position_at(Motion::Drift, step as f32 * 0.37, 4.0);
            let offset = pos - p.origin;
            assert!(offset.abs().max_element() <= 4.0 + 1e-4);
        }
    }

    #[test]
    fn test_advance_is_stateless() {
        let mut a = particle();
        let mut b = particle();
        a.advance(Motion::Orbit, 0.5, 0.0);
        a.advance(Motion::Orbit, 2.0, 0.0);
        b.advance(Motion::Orbit, 2.0, 0.0);
        assert_eq!(a.position, b.position);
    }
}

//! Perspective camera with damped follow.

use glam::{Mat4, Vec2, Vec3};

use crate::surface::Viewport;

const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;

/// Camera looking at a fixed target, moved smoothly toward a goal position.
#[derive(Debug, Clone)]
pub struct Camera {
    /// World position.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width over height of the viewport used for projection.
    pub aspect: f32,
    /// Rest distance from the target.
    pub distance: f32,
}

impl Camera {
    /// Create a camera at `distance` along +Z, looking at the origin.
    pub fn new(fov_degrees: f32, distance: f32, aspect: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, distance),
            target: Vec3::ZERO,
            fov_y: fov_degrees.to_radians(),
            aspect,
            distance,
        }
    }

    /// Move a fraction `factor` of the way toward `goal`.
    pub fn follow(&mut self, goal: Vec3, factor: f32) {
        self.position += (goal - self.position) * factor;
    }

    /// Goal for a pointer at normalized coordinates `offset` (-1..1 each axis).
    pub fn pointer_goal(&self, offset: Vec2, sway: f32) -> Vec3 {
        Vec3::new(offset.x * sway, offset.y * sway, self.distance)
    }

    /// Goal for the idle auto-rotation at `angle` radians around the Y axis.
    pub fn orbit_goal(&self, angle: f32) -> Vec3 {
        Vec3::new(angle.sin() * self.distance, 0.0, angle.cos() * self.distance)
    }

    /// Calculate the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Calculate the combined view-projection matrix.
    pub fn view_proj(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, NEAR, FAR) * self.view_matrix()
    }

    /// Project a world point to physical pixels (origin top-left, y down).
    ///
    /// Returns the screen position and the view-space depth, or `None` when the
    /// point is behind the camera or outside the depth range.
    pub fn project(&self, view_proj: &Mat4, point: Vec3, viewport: &Viewport) -> Option<(Vec2, f32)> {
        let clip = *view_proj * point.extend(1.0);
        if clip.w <= NEAR || clip.w >= FAR {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let (width, height) = viewport.physical_size();
        let screen = Vec2::new(
            (ndc.x * 0.5 + 0.5) * width as f32,
            (0.5 - ndc.y * 0.5) * height as f32,
        );
        Some((screen, clip.w))
    }
}

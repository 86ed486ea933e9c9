//! Drawing surface port.
//!
//! The field builds a [`FrameData`] every tick and hands it to a
//! [`RenderSurface`] for a full redraw. [`GpuSurface`](crate::gpu::GpuSurface)
//! draws it with wgpu; [`RecordingSurface`] keeps it in memory for headless
//! runs and tests.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Vec2, Vec4};

use crate::error::FieldError;

/// Size of the drawing area in logical pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Pixel ratio after the configured ceiling has been applied.
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Copy with the pixel ratio capped at `max_ratio`.
    pub fn capped(self, max_ratio: f32) -> Self {
        Self {
            pixel_ratio: self.pixel_ratio.min(max_ratio),
            ..self
        }
    }

    /// Width over height. A degenerate viewport reports 1.0.
    pub fn aspect(&self) -> f32 {
        if self.width > 0.0 && self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Size of the backing buffer in physical pixels (at least 1x1).
    pub fn physical_size(&self) -> (u32, u32) {
        (
            ((self.width * self.pixel_ratio).round() as u32).max(1),
            ((self.height * self.pixel_ratio).round() as u32).max(1),
        )
    }
}

/// One particle as submitted to the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointPrimitive {
    /// Screen position in physical pixels, origin top-left.
    pub position: Vec2,
    /// View-space depth.
    pub depth: f32,
    /// Diameter in physical pixels.
    pub size: f32,
    pub color: Vec4,
    /// False when the particle is behind the camera.
    pub visible: bool,
}

/// One edge as submitted to the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrimitive {
    pub from: Vec2,
    pub to: Vec2,
    /// Color with distance-faded alpha.
    pub color: Vec4,
}

/// Everything drawn in one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameData {
    pub points: Vec<PointPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub clear_color: [f32; 4],
}

impl FrameData {
    /// Empty the frame, keeping the allocations.
    pub fn clear(&mut self) {
        self.points.clear();
        self.lines.clear();
    }
}

/// A surface that can redraw a full frame.
pub trait RenderSurface {
    /// Resize the backing buffer to the viewport's physical size.
    fn resize(&mut self, viewport: Viewport);

    /// Redraw everything in `frame`.
    fn draw(&mut self, frame: &FrameData) -> Result<(), FieldError>;

    /// Release all GPU-side resources and the rendering context.
    fn release(&mut self);
}

/// What a [`RecordingSurface`] has been asked to do.
#[derive(Debug, Default)]
struct Recording {
    last_frame: Option<FrameData>,
    draw_count: u64,
    viewport: Option<Viewport>,
    released: bool,
}

/// In-memory surface that records what it was asked to draw.
///
/// Clones share one recording, so a clone kept by the host still observes the
/// surface after the field has taken ownership of it.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    recording: Rc<RefCell<Recording>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last frame submitted, if any.
    pub fn last_frame(&self) -> Option<FrameData> {
        self.recording.borrow().last_frame.clone()
    }

    /// Number of frames drawn.
    pub fn draw_count(&self) -> u64 {
        self.recording.borrow().draw_count
    }

    /// Last viewport applied with `resize`.
    pub fn viewport(&self) -> Option<Viewport> {
        self.recording.borrow().viewport
    }

    /// Whether `release` has been called.
    pub fn released(&self) -> bool {
        self.recording.borrow().released
    }
}

impl RenderSurface for RecordingSurface {
    fn resize(&mut self, viewport: Viewport) {
        self.recording.borrow_mut().viewport = Some(viewport);
    }

    fn draw(&mut self, frame: &FrameData) -> Result<(), FieldError> {
        let mut recording = self.recording.borrow_mut();
        recording.last_frame = Some(frame.clone());
        recording.draw_count += 1;
        Ok(())
    }

    fn release(&mut self) {
        let mut recording = self.recording.borrow_mut();
        recording.last_frame = None;
        recording.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_ratio_capped() {
        let viewport = Viewport::new(1280.0, 720.0, 3.0).capped(2.0);
        assert_eq!(viewport.pixel_ratio, 2.0);
        assert_eq!(viewport.physical_size(), (2560, 1440));

        let low = Viewport::new(1280.0, 720.0, 1.5).capped(2.0);
        assert_eq!(low.pixel_ratio, 1.5);
    }

    #[test]
    fn test_degenerate_viewport() {
        let viewport = Viewport::new(0.0, 0.0, 1.0);
        assert_eq!(viewport.aspect(), 1.0);
        assert_eq!(viewport.physical_size(), (1, 1));
    }

    #[test]
    fn test_recording_surface() {
        let mut surface = RecordingSurface::new();
        let recording = surface.clone();
        surface.resize(Viewport::new(10.0, 10.0, 1.0));
        surface.draw(&FrameData::default()).unwrap();
        assert_eq!(recording.draw_count(), 1);
        assert_eq!(recording.viewport(), Some(Viewport::new(10.0, 10.0, 1.0)));
        surface.release();
        assert!(recording.released());
        assert!(recording.last_frame().is_none());
    }
}

//! Translation of winit window events into field events.
//!
//! The field only cares about three things from the window: where the pointer
//! is in normalized device coordinates, the current viewport, and whether the
//! user asked to close. [`Input`] tracks the window size and scale factor
//! needed to produce those.

use glam::Vec2;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::surface::Viewport;

/// A window event the field reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// Pointer position in -1..1 on both axes, y up.
    PointerMoved(Vec2),
    /// New window size, before the pixel ratio cap.
    Resized(Viewport),
    /// Window close button or Escape.
    CloseRequested,
}

/// Window state needed to interpret pointer and resize events.
#[derive(Debug, Clone)]
pub struct Input {
    physical_size: (u32, u32),
    scale_factor: f64,
    pointer: Option<Vec2>,
}

impl Input {
    pub fn new(size: PhysicalSize<u32>, scale_factor: f64) -> Self {
        Self {
            physical_size: (size.width, size.height),
            scale_factor,
            pointer: None,
        }
    }

    /// Current viewport in logical pixels with the raw scale factor.
    pub fn viewport(&self) -> Viewport {
        let scale = self.scale_factor.max(f64::EPSILON);
        let (width, height) = self.physical_size;
        Viewport::new(
            (width as f64 / scale) as f32,
            (height as f64 / scale) as f32,
            self.scale_factor as f32,
        )
    }

    /// Last pointer position in normalized coordinates.
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<HostEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let ndc = pointer_ndc(position.x, position.y, self.physical_size)?;
                self.pointer = Some(ndc);
                Some(HostEvent::PointerMoved(ndc))
            }
            WindowEvent::Resized(size) => {
                self.physical_size = (size.width, size.height);
                Some(HostEvent::Resized(self.viewport()))
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = *scale_factor;
                Some(HostEvent::Resized(self.viewport()))
            }
            WindowEvent::CloseRequested => Some(HostEvent::CloseRequested),
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && !event.repeat
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                Some(HostEvent::CloseRequested)
            }
            _ => None,
        }
    }
}

/// Map a physical cursor position to -1..1 with y up.
///
/// Returns `None` for a zero-sized window.
pub fn pointer_ndc(x: f64, y: f64, physical_size: (u32, u32)) -> Option<Vec2> {
    let (w, h) = physical_size;
    if w == 0 || h == 0 {
        return None;
    }
    Some(Vec2::new(
        (x as f32 / w as f32) * 2.0 - 1.0,
        1.0 - (y as f32 / h as f32) * 2.0,
    ))
}

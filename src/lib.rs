//! # Particle Field
//!
//! A decorative, continuously animating 3D particle field: a hundred or so
//! colored points (120 by default) drifting around a sphere, a helix or a
//! cube, joined by faint lines whenever two of them come close, seen through
//! a camera that leans toward the pointer and slowly orbits when the pointer
//! is idle.
//!
//! ## Quick Start
//!
//! ```ignore
//! use particle_field::prelude::*;
//!
//! fn main() -> Result<(), FieldError> {
//!     let config = FieldConfig::new()
//!         .with_particle_count(150)
//!         .with_distribution(Distribution::Helix)
//!         .with_connection_distance(14.0);
//!     particle_field::run(config)
//! }
//! ```
//!
//! ## Embedding
//!
//! [`ParticleField`] is generic over its drawing surface and its host, so it
//! can be driven by anything that implements [`RenderSurface`],
//! [`FrameScheduler`] and [`ListenerHost`]. [`run`] wires it to a winit window
//! and a wgpu surface; [`ManualHost`] and [`RecordingSurface`] drive it
//! headless, one frame at a time:
//!
//! ```ignore
//! let surface = RecordingSurface::new();
//! let mut field = ParticleField::new(FieldConfig::new().with_seed(7), ManualHost::new());
//! field.initialize(Viewport::new(800.0, 600.0, 1.0), |_| Ok(surface));
//!
//! let mut elapsed = 0.0;
//! while let Some(token) = field.host_mut().take_due_frame() {
//!     elapsed += 1.0 / 60.0;
//!     field.on_frame(token, elapsed);
//!     if elapsed > 1.0 {
//!         field.teardown();
//!     }
//! }
//! ```
//!
//! ## Frame Order
//!
//! Every tick applies a pending resize, moves the particles, eases the camera
//! toward its goal, rebuilds the proximity edges, redraws the whole frame and
//! finally requests the next frame. Pointer and resize events are only
//! recorded when they arrive.

pub mod camera;
pub mod config;
pub mod edges;
pub mod error;
pub mod gpu;
pub mod input;
pub mod particle;
pub mod renderer;
pub mod scheduler;
pub mod spawn;
pub mod surface;
pub mod time;
mod window;

pub use camera::Camera;
pub use config::{Distribution, FieldConfig, Motion};
pub use edges::{find_edges, Edge};
pub use error::FieldError;
pub use glam::{Vec2, Vec3, Vec4};
pub use gpu::GpuSurface;
pub use particle::Particle;
pub use renderer::{FieldState, FrameStats, ParticleField};
pub use scheduler::{
    FrameScheduler, FrameToken, ListenerHost, ListenerId, ListenerKind, ManualHost,
};
pub use spawn::{spawn_particles, SpawnContext};
pub use surface::{FrameData, LinePrimitive, PointPrimitive, RecordingSurface, RenderSurface, Viewport};
pub use window::{run, App, WinitHost};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use particle_field::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{Distribution, FieldConfig, Motion};
    pub use crate::error::FieldError;
    pub use crate::renderer::{FieldState, ParticleField};
    pub use crate::scheduler::{FrameScheduler, ListenerHost, ManualHost};
    pub use crate::surface::{RecordingSurface, RenderSurface, Viewport};
    pub use crate::time::Time;
    pub use crate::{Vec2, Vec3, Vec4};
}

//! The particle field renderer.
//!
//! [`ParticleField`] owns the particle set, the camera and the lifecycle of one
//! mount. Host events only record state (pointer target, pending viewport);
//! everything is applied inside [`ParticleField::tick`], which runs once per
//! frame callback and schedules the next one.
//!
//! ```text
//! Uninitialized --initialize--> Running --teardown--> TornDown
//!       \_____________________teardown_____________________/
//! ```

use glam::{Vec2, Vec3};
use tracing::{debug, info, trace, warn};

use crate::camera::Camera;
use crate::config::FieldConfig;
use crate::edges::{find_edges, Edge};
use crate::error::FieldError;
use crate::particle::Particle;
use crate::scheduler::{FrameScheduler, FrameToken, ListenerHost, ListenerId, ListenerKind};
use crate::spawn::spawn_particles;
use crate::surface::{FrameData, LinePrimitive, PointPrimitive, RenderSurface, Viewport};

/// Perspective scale applied to point sizes is clamped to this range.
const POINT_SCALE_RANGE: (f32, f32) = (0.25, 4.0);

/// Lifecycle state of a mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Uninitialized,
    Running,
    /// Terminal.
    TornDown,
}

/// Counters for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// Point primitives submitted (always the particle count).
    pub points: usize,
    /// Edges found by the proximity pass.
    pub edges: usize,
    /// Line primitives submitted (edges with both ends in front of the camera).
    pub lines: usize,
}

/// A decorative particle field bound to one drawing surface and host.
pub struct ParticleField<S: RenderSurface, H: FrameScheduler + ListenerHost> {
    config: FieldConfig,
    host: H,
    state: FieldState,
    surface: Option<S>,
    particles: Vec<Particle>,
    edges: Vec<Edge>,
    frame: FrameData,
    camera: Camera,
    viewport: Viewport,
    pending_viewport: Option<Viewport>,
    pointer_target: Option<Vec2>,
    pointer_moved: bool,
    last_pointer_time: Option<f32>,
    pending_frame: Option<FrameToken>,
    listeners: Vec<ListenerId>,
    frames: u64,
}

impl<S: RenderSurface, H: FrameScheduler + ListenerHost> ParticleField<S, H> {
    /// Create an uninitialized field. Nothing is allocated or registered yet.
    pub fn new(config: FieldConfig, host: H) -> Self {
        let camera = Camera::new(config.fov_degrees, config.camera_distance, 1.0);
        Self {
            config,
            host,
            state: FieldState::Uninitialized,
            surface: None,
            particles: Vec::new(),
            edges: Vec::new(),
            frame: FrameData::default(),
            camera,
            viewport: Viewport::new(1.0, 1.0, 1.0),
            pending_viewport: None,
            pointer_target: None,
            pointer_moved: false,
            last_pointer_time: None,
            pending_frame: None,
            listeners: Vec::new(),
            frames: 0,
        }
    }

    /// Acquire a surface, spawn the particles and start ticking.
    ///
    /// `acquire` is called with the capped viewport. If it fails, or the
    /// configuration does not validate, the field stays blank: nothing is
    /// spawned, registered or scheduled, and the error is only logged.
    /// Returns whether the field is now running.
    pub fn initialize<F>(&mut self, viewport: Viewport, acquire: F) -> bool
    where
        F: FnOnce(&Viewport) -> Result<S, FieldError>,
    {
        if self.state != FieldState::Uninitialized {
            debug!(state = ?self.state, "initialize ignored");
            return false;
        }
        if let Err(e) = self.config.validate() {
            warn!(error = %e, "rejected configuration, particle field stays blank");
            return false;
        }

        let viewport = viewport.capped(self.config.max_pixel_ratio);
        let mut surface = match acquire(&viewport) {
            Ok(surface) => surface,
            Err(e) => {
                warn!(error = %e, "no usable rendering context, particle field stays blank");
                return false;
            }
        };
        surface.resize(viewport);

        self.particles = spawn_particles(&self.config);
        self.edges = Vec::with_capacity(self.particles.len() * 4);
        self.frame = FrameData {
            points: Vec::with_capacity(self.particles.len()),
            lines: Vec::with_capacity(self.particles.len() * 4),
            clear_color: self.config.clear_color,
        };
        self.camera = Camera::new(
            self.config.fov_degrees,
            self.config.camera_distance,
            viewport.aspect(),
        );
        self.viewport = viewport;
        self.surface = Some(surface);

        self.listeners = vec![
            self.host.add_listener(ListenerKind::PointerMove),
            self.host.add_listener(ListenerKind::Resize),
        ];
        self.pending_frame = Some(self.host.request_frame());
        self.state = FieldState::Running;

        info!(
            particles = self.particles.len(),
            seed = ?self.config.seed,
            width = viewport.width,
            height = viewport.height,
            pixel_ratio = viewport.pixel_ratio,
            "particle field running"
        );
        true
    }

    /// Record the pointer position in normalized coordinates (-1..1, y up).
    ///
    /// The camera moves toward it on the following ticks. Non-finite samples
    /// are dropped.
    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        if self.state != FieldState::Running {
            return;
        }
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        self.pointer_target = Some(Vec2::new(x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0)));
        self.pointer_moved = true;
    }

    /// Record a new viewport. It takes effect on the next tick.
    pub fn on_resize(&mut self, viewport: Viewport) {
        if self.state != FieldState::Running {
            return;
        }
        self.pending_viewport = Some(viewport.capped(self.config.max_pixel_ratio));
    }

    /// Run a scheduled frame. Tokens other than the pending one are ignored.
    pub fn on_frame(&mut self, token: FrameToken, elapsed: f32) -> Option<FrameStats> {
        if self.pending_frame != Some(token) {
            trace!(token = token.0, "stale frame ignored");
            return None;
        }
        self.tick(elapsed)
    }

    /// Advance to `elapsed` seconds since mount, redraw, and schedule the next
    /// frame. Does nothing unless the field is running.
    pub fn tick(&mut self, elapsed: f32) -> Option<FrameStats> {
        if self.state != FieldState::Running {
            return None;
        }
        self.pending_frame = None;

        if let Some(viewport) = self.pending_viewport.take() {
            self.viewport = viewport;
            self.camera.aspect = viewport.aspect();
            if let Some(surface) = self.surface.as_mut() {
                surface.resize(viewport);
            }
            debug!(
                width = viewport.width,
                height = viewport.height,
                pixel_ratio = viewport.pixel_ratio,
                "viewport resized"
            );
        }

        for particle in &mut self.particles {
            particle.advance(self.config.motion, elapsed, self.config.drift_amplitude);
        }

        let goal = self.camera_goal(elapsed);
        self.camera.follow(goal, self.config.camera_damping);

        find_edges(&self.particles, self.config.connection_distance, &mut self.edges);

        self.build_frame();
        if let Some(surface) = self.surface.as_mut() {
            if let Err(e) = surface.draw(&self.frame) {
                warn!(error = %e, "frame draw failed");
            }
        }
        self.frames += 1;

        self.pending_frame = Some(self.host.request_frame());

        let stats = FrameStats {
            points: self.frame.points.len(),
            edges: self.edges.len(),
            lines: self.frame.lines.len(),
        };
        trace!(frame = self.frames, edges = stats.edges, "tick");
        Some(stats)
    }

    /// Stop ticking and release everything the mount holds.
    ///
    /// Cancels the pending frame, removes the listeners, releases the surface
    /// and drops the particles. Returns `false` if there was nothing running.
    pub fn teardown(&mut self) -> bool {
        let was_running = self.state == FieldState::Running;
        if self.state == FieldState::TornDown {
            return false;
        }

        if let Some(token) = self.pending_frame.take() {
            self.host.cancel_frame(token);
        }
        for id in self.listeners.drain(..) {
            self.host.remove_listener(id);
        }
        if let Some(mut surface) = self.surface.take() {
            surface.release();
        }

        self.particles = Vec::new();
        self.edges = Vec::new();
        self.frame = FrameData::default();
        self.pending_viewport = None;
        self.pointer_target = None;
        self.pointer_moved = false;
        self.state = FieldState::TornDown;

        info!(frames = self.frames, "particle field torn down");
        was_running
    }

    fn camera_goal(&mut self, elapsed: f32) -> Vec3 {
        if self.pointer_moved {
            self.last_pointer_time = Some(elapsed);
            self.pointer_moved = false;
        }

        match (self.pointer_target, self.last_pointer_time) {
            (Some(offset), Some(at)) if elapsed - at <= self.config.idle_timeout => {
                self.camera.pointer_goal(offset, self.config.pointer_sway)
            }
            _ => self.camera.orbit_goal(elapsed * self.config.auto_rotate_speed),
        }
    }

    fn build_frame(&mut self) {
        let view_proj = self.camera.view_proj();
        let ratio = self.viewport.pixel_ratio;
        let base_size = self.config.point_size * ratio;

        self.frame.clear();
        self.frame.clear_color = self.config.clear_color;

        for particle in &self.particles {
            let point = match self.camera.project(&view_proj, particle.position, &self.viewport) {
                Some((position, depth)) => {
                    let scale = (self.camera.distance / depth)
                        .clamp(POINT_SCALE_RANGE.0, POINT_SCALE_RANGE.1);
                    PointPrimitive {
                        position,
                        depth,
                        size: base_size * scale,
                        color: particle.color,
                        visible: true,
                    }
                }
                None => PointPrimitive {
                    position: Vec2::ZERO,
                    depth: 0.0,
                    size: 0.0,
                    color: particle.color,
                    visible: false,
                },
            };
            self.frame.points.push(point);
        }

        let threshold = self.config.connection_distance;
        for edge in &self.edges {
            let a = &self.frame.points[edge.a as usize];
            let b = &self.frame.points[edge.b as usize];
            if !(a.visible && b.visible) {
                continue;
            }
            let alpha = self.config.line_opacity * (1.0 - edge.distance / threshold);
            let color = a.color.lerp(b.color, 0.5).truncate().extend(alpha);
            self.frame.lines.push(LinePrimitive {
                from: a.position,
                to: b.position,
                color,
            });
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> FieldState {
        self.state
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Particles as of the last tick. Empty unless running.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Edges found by the last tick.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The frame submitted by the last tick.
    pub fn frame(&self) -> &FrameData {
        &self.frame
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Viewport used by the last tick.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of ticks run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// The frame the field is waiting for, if any.
    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.pending_frame
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<S: RenderSurface, H: FrameScheduler + ListenerHost> Drop for ParticleField<S, H> {
    fn drop(&mut self) {
        if self.state == FieldState::Running {
            warn!("particle field dropped while running, tearing down");
            self.teardown();
        }
    }
}

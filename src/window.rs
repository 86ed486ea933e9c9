//! Native window host built on winit.
//!
//! [`WinitHost`] implements the host ports on top of a window: a frame request
//! becomes `request_redraw`, and listener registration decides which window
//! events are forwarded to the field. [`App`] owns the field for the lifetime
//! of the event loop.

use std::sync::Arc;

use tracing::{debug, error, info};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::FieldConfig;
use crate::error::FieldError;
use crate::gpu::GpuSurface;
use crate::input::{HostEvent, Input};
use crate::renderer::ParticleField;
use crate::scheduler::{
    FrameScheduler, FrameToken, ListenerHost, ListenerId, ListenerKind, ListenerSet,
};
use crate::time::Time;

const WINDOW_TITLE: &str = "Particle Field";
const WINDOW_SIZE: (u32, u32) = (1280, 720);

/// Host ports backed by a winit window.
pub struct WinitHost {
    window: Arc<Window>,
    pending: Option<FrameToken>,
    next_token: u64,
    listeners: ListenerSet,
}

impl WinitHost {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            pending: None,
            next_token: 0,
            listeners: ListenerSet::new(),
        }
    }

    /// Take the frame due at this redraw, if one was requested and not
    /// cancelled.
    pub fn due_frame(&mut self) -> Option<FrameToken> {
        self.pending.take()
    }
}

impl FrameScheduler for WinitHost {
    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.next_token);
        self.next_token += 1;
        self.pending = Some(token);
        self.window.request_redraw();
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if self.pending == Some(token) {
            self.pending = None;
        }
    }
}

impl ListenerHost for WinitHost {
    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
        self.listeners.add(kind)
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.remove(id);
    }

    fn is_listening(&self, kind: ListenerKind) -> bool {
        self.listeners.contains_kind(kind)
    }
}

type WindowField = ParticleField<GpuSurface, WinitHost>;

/// Event loop handler that mounts one field in one window.
pub struct App {
    config: FieldConfig,
    window: Option<Arc<Window>>,
    input: Option<Input>,
    field: Option<WindowField>,
    time: Time,
    error: Option<FieldError>,
}

impl App {
    pub fn new(config: FieldConfig) -> Self {
        Self {
            config,
            window: None,
            input: None,
            field: None,
            time: Time::new(),
            error: None,
        }
    }

    fn mount(&mut self, event_loop: &ActiveEventLoop) -> Result<(), FieldError> {
        let window_attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(WINDOW_SIZE.0, WINDOW_SIZE.1));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let input = Input::new(window.inner_size(), window.scale_factor());
        let particle_count = self.config.particle_count as usize;

        let mut field = ParticleField::new(self.config.clone(), WinitHost::new(window.clone()));
        let surface_window = window.clone();
        field.initialize(input.viewport(), move |viewport| {
            pollster::block_on(GpuSurface::new(surface_window, viewport, particle_count))
        });

        self.time = Time::new();
        self.window = Some(window);
        self.input = Some(input);
        self.field = Some(field);
        Ok(())
    }

    fn unmount(&mut self) {
        if let Some(mut field) = self.field.take() {
            field.teardown();
        }
    }

    fn redraw(&mut self) {
        let Some(field) = self.field.as_mut() else {
            return;
        };
        let Some(token) = field.host_mut().due_frame() else {
            return;
        };

        let elapsed = self.time.update();
        field.on_frame(token, elapsed);

        if self.time.fps_updated() {
            debug!(
                fps = %format!("{:.1}", self.time.fps()),
                frame = self.time.frame(),
                "frame rate"
            );
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.mount(event_loop) {
            error!(error = %e, "failed to open window");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let WindowEvent::RedrawRequested = event {
            self.redraw();
            return;
        }

        let Some(host_event) = self.input.as_mut().and_then(|input| input.handle_event(&event)) else {
            return;
        };
        match host_event {
            HostEvent::CloseRequested => {
                info!("close requested");
                self.unmount();
                event_loop.exit();
            }
            HostEvent::PointerMoved(ndc) => {
                if let Some(field) = self.field.as_mut() {
                    if field.host().is_listening(ListenerKind::PointerMove) {
                        field.on_pointer_move(ndc.x, ndc.y);
                    }
                }
            }
            HostEvent::Resized(viewport) => {
                if let Some(field) = self.field.as_mut() {
                    if field.host().is_listening(ListenerKind::Resize) {
                        field.on_resize(viewport);
                    }
                }
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.unmount();
    }
}

/// Open a window and run the field until it is closed.
pub fn run(config: FieldConfig) -> Result<(), FieldError> {
    config.validate()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

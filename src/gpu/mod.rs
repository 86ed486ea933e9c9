//! wgpu implementation of [`RenderSurface`].
//!
//! Points are drawn as alpha-blended quads clipped to a circle in the fragment
//! shader, lines as a `LineList`. Vertices are rebuilt on the CPU every frame
//! and uploaded with `write_buffer`; the buffers only grow when a frame
//! outgrows them.

mod mesh;

use std::sync::Arc;

use tracing::{debug, info};
use winit::window::Window;

pub use mesh::{build_line_vertices, build_point_vertices, PixelSpace, Vertex, POINT_VERTICES};

use crate::edges::max_edges;
use crate::error::FieldError;
use crate::surface::{FrameData, RenderSurface, Viewport};

/// WGSL source for both pipelines.
pub const SHADER_SOURCE: &str = include_str!("field.wgsl");

/// Line vertices reserved per particle before the buffer has to grow.
const LINE_VERTICES_PER_PARTICLE: usize = 8;

/// A window surface with the two field pipelines.
pub struct GpuSurface {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    point_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    point_buffer: wgpu::Buffer,
    point_capacity: usize,
    line_buffer: wgpu::Buffer,
    line_capacity: usize,
    point_vertices: Vec<Vertex>,
    line_vertices: Vec<Vertex>,
    released: bool,
}

impl GpuSurface {
    /// Create a surface for `window` sized for `particle_count` points.
    pub async fn new(
        window: Arc<Window>,
        viewport: &Viewport,
        particle_count: usize,
    ) -> Result<Self, FieldError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(FieldError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        info!(
            adapter = %adapter_info.name,
            backend = ?adapter_info.backend,
            "GPU adapter selected"
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Particle Field Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::MemoryUsage,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Gradient colors are authored in sRGB, so write them through unconverted
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(FieldError::NoSurface)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let (width, height) = viewport.physical_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Particle Field Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Particle Field Pipeline Layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let point_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            "fs_point",
            wgpu::PrimitiveTopology::TriangleList,
        );
        let line_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            "fs_line",
            wgpu::PrimitiveTopology::LineList,
        );

        let point_capacity = particle_count.max(1) * POINT_VERTICES;
        let line_capacity =
            (max_edges(particle_count) * 2).clamp(2, particle_count.max(1) * LINE_VERTICES_PER_PARTICLE);
        let point_buffer = create_vertex_buffer(&device, "Point Vertex Buffer", point_capacity);
        let line_buffer = create_vertex_buffer(&device, "Line Vertex Buffer", line_capacity);

        debug!(
            format = ?config.format,
            width,
            height,
            point_capacity,
            line_capacity,
            "GPU surface configured"
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            point_pipeline,
            line_pipeline,
            point_buffer,
            point_capacity,
            line_buffer,
            line_capacity,
            point_vertices: Vec::with_capacity(point_capacity),
            line_vertices: Vec::with_capacity(line_capacity),
            released: false,
        })
    }

    fn upload(&mut self) {
        if self.point_vertices.len() > self.point_capacity {
            self.point_capacity = self.point_vertices.len().next_power_of_two();
            self.point_buffer.destroy();
            self.point_buffer =
                create_vertex_buffer(&self.device, "Point Vertex Buffer", self.point_capacity);
            debug!(capacity = self.point_capacity, "point buffer grown");
        }
        if self.line_vertices.len() > self.line_capacity {
            self.line_capacity = self.line_vertices.len().next_power_of_two();
            self.line_buffer.destroy();
            self.line_buffer =
                create_vertex_buffer(&self.device, "Line Vertex Buffer", self.line_capacity);
            debug!(capacity = self.line_capacity, "line buffer grown");
        }

        if !self.point_vertices.is_empty() {
            self.queue
                .write_buffer(&self.point_buffer, 0, bytemuck::cast_slice(&self.point_vertices));
        }
        if !self.line_vertices.is_empty() {
            self.queue
                .write_buffer(&self.line_buffer, 0, bytemuck::cast_slice(&self.line_vertices));
        }
    }
}

impl RenderSurface for GpuSurface {
    fn resize(&mut self, viewport: Viewport) {
        if self.released {
            return;
        }
        let (width, height) = viewport.physical_size();
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    fn draw(&mut self, frame: &FrameData) -> Result<(), FieldError> {
        if self.released {
            return Ok(());
        }

        let space = PixelSpace::new(self.config.width, self.config.height);
        build_point_vertices(frame, space, &mut self.point_vertices);
        build_line_vertices(frame, space, &mut self.line_vertices);
        self.upload();

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Particle Field Encoder"),
            });

        {
            let [r, g, b, a] = frame.clear_color;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Particle Field Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Lines first so points sit on top of them
            if !self.line_vertices.is_empty() {
                render_pass.set_pipeline(&self.line_pipeline);
                render_pass.set_vertex_buffer(0, self.line_buffer.slice(..));
                render_pass.draw(0..self.line_vertices.len() as u32, 0..1);
            }
            if !self.point_vertices.is_empty() {
                render_pass.set_pipeline(&self.point_pipeline);
                render_pass.set_vertex_buffer(0, self.point_buffer.slice(..));
                render_pass.draw(0..self.point_vertices.len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.point_buffer.destroy();
        self.line_buffer.destroy();
        self.point_vertices = Vec::new();
        self.line_vertices = Vec::new();
        self.device.destroy();
        self.released = true;
        debug!("GPU surface released");
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    fragment_entry: &str,
    topology: wgpu::PrimitiveTopology,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(fragment_entry),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_vertex_buffer(device: &wgpu::Device, label: &str, vertices: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (vertices * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

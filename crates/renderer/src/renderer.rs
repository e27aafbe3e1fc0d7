//! Main renderer managing wgpu state and rendering.

use crate::{
    camera::{CameraUniform, Lighting, OrbitCamera},
    mesh::{Mesh, MeshData},
    pipeline::{create_camera_bind_group_layout, create_line_pipeline, create_mesh_pipeline},
    scene::SceneGraph,
    texture::Texture,
    vertex::{InstanceData, LineVertex},
};
use anyhow::Result;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// Instances the renderer can draw per frame across all meshes.
const MAX_INSTANCES: u32 = 4096;
/// Initial line-vertex capacity; the buffer grows on demand.
const INITIAL_LINE_VERTICES: u64 = 8192;

/// Errors raised while bringing up the GPU.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no suitable GPU adapter")]
    NoAdapter,
    #[error("surface does not support any texture format")]
    NoSurfaceFormat,
}

/// Main renderer state.
pub struct Renderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    pub window: Arc<Window>,

    // Pipelines
    mesh_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,

    camera_bind_group: wgpu::BindGroup,
    camera_buffer: wgpu::Buffer,
    camera_uniform: CameraUniform,

    // Depth buffer
    depth_texture: Texture,

    sphere_mesh: Mesh,
    cube_mesh: Mesh,

    // Instance buffer for batched rendering
    instance_buffer: wgpu::Buffer,

    line_buffer: wgpu::Buffer,
    line_capacity: u64,

    clear_color: wgpu::Color,
}

impl Renderer {
    /// Create a new renderer for the given window.
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        log::info!("Using GPU: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::NoSurfaceFormat)?;

        let present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let camera_uniform = CameraUniform::new();
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout = create_camera_bind_group_layout(&device);
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let mesh_pipeline = create_mesh_pipeline(&device, &config, &camera_bind_group_layout);
        let line_pipeline = create_line_pipeline(&device, &config, &camera_bind_group_layout);

        let depth_texture =
            Texture::create_depth_texture(&device, config.width, config.height, "Depth Texture");

        let sphere_mesh = MeshData::sphere(32, 32).upload(&device);
        let cube_mesh = MeshData::cube().upload(&device);

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: MAX_INSTANCES as u64 * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let line_buffer = create_line_buffer(&device, INITIAL_LINE_VERTICES);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
            mesh_pipeline,
            line_pipeline,
            camera_bind_group,
            camera_buffer,
            camera_uniform,
            depth_texture,
            sphere_mesh,
            cube_mesh,
            instance_buffer,
            line_buffer,
            line_capacity: INITIAL_LINE_VERTICES,
            clear_color: wgpu::Color {
                r: 0.0,
                g: 0.0,
                b: 0.02,
                a: 1.0,
            },
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = Texture::create_depth_texture(
                &self.device,
                self.config.width,
                self.config.height,
                "Depth Texture",
            );
        }
    }

    /// Update camera and lighting uniform.
    pub fn update_camera(&mut self, camera: &OrbitCamera, lighting: &Lighting) {
        self.camera_uniform.update(camera, lighting);
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );
    }

    /// Draw every visible object in the scene and present.
    pub fn render(&mut self, scene: &SceneGraph) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
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
                label: Some("Render Encoder"),
            });

        let batches = scene.instance_batches();
        let sphere_count = batches.spheres.len().min(MAX_INSTANCES as usize);
        let cube_count = batches
            .cubes
            .len()
            .min(MAX_INSTANCES as usize - sphere_count);
        if sphere_count + cube_count < batches.spheres.len() + batches.cubes.len() {
            log::warn!("Instance budget exceeded, dropping objects this frame");
        }
        let mut instances = Vec::with_capacity(sphere_count + cube_count);
        instances.extend_from_slice(&batches.spheres[..sphere_count]);
        instances.extend_from_slice(&batches.cubes[..cube_count]);
        if !instances.is_empty() {
            self.queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let lines = scene.line_vertices();
        self.upload_lines(&lines);

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.mesh_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            let sphere_range = 0..sphere_count as u32;
            let cube_range = sphere_count as u32..(sphere_count + cube_count) as u32;
            for (mesh, range) in [(&self.sphere_mesh, sphere_range), (&self.cube_mesh, cube_range)] {
                if range.is_empty() {
                    continue;
                }
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.num_indices, 0, range);
            }

            if !lines.is_empty() {
                render_pass.set_pipeline(&self.line_pipeline);
                render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.line_buffer.slice(..));
                render_pass.draw(0..lines.len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Upload line vertices, growing the buffer when needed.
    fn upload_lines(&mut self, lines: &[LineVertex]) {
        if lines.is_empty() {
            return;
        }
        let needed = lines.len() as u64;
        if needed > self.line_capacity {
            let capacity = needed.next_power_of_two();
            log::debug!("Growing line buffer to {} vertices", capacity);
            self.line_buffer = create_line_buffer(&self.device, capacity);
            self.line_capacity = capacity;
        }
        self.queue
            .write_buffer(&self.line_buffer, 0, bytemuck::cast_slice(lines));
    }

    /// Get window dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}

fn create_line_buffer(device: &wgpu::Device, vertices: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Line Buffer"),
        size: vertices * std::mem::size_of::<LineVertex>() as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

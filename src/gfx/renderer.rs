//! WGPU-based renderer for the effect stage
//!
//! One surface serves the whole window. Each effect instance gets its own
//! camera uniform, bind group and viewport rectangle, so its drawables are
//! only ever rendered through its own camera. The surface clears to a fully
//! transparent color; effects are a decorative layer over whatever the host
//! composites underneath.

use std::collections::HashMap;
use std::sync::Arc;

use cgmath::{Matrix4, Vector3};
use wgpu::util::DeviceExt;

use crate::effect::{EffectId, EffectStage};
use crate::error::VitrineError;
use crate::gfx::vertex::LineVertex;
use crate::scene::{CameraUniform, Drawable, Scene};
use crate::viewport::Region;

/// Per-instance GPU state: one camera uniform and its bind group
struct InstanceGpu {
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Pixel rectangle an instance renders into
#[derive(Debug, Clone, Copy)]
struct PixelRect {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

/// Vertex batches prepared for one instance this frame
struct DrawBatch {
    id: EffectId,
    rect: PixelRect,
    lines: Option<(wgpu::Buffer, u32)>,
    points: Option<(wgpu::Buffer, u32)>,
}

/// Core rendering engine managing GPU resources and draw calls
pub struct StageRenderer {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: wgpu::TextureFormat,
    line_pipeline: wgpu::RenderPipeline,
    point_pipeline: wgpu::RenderPipeline,
    camera_layout: wgpu::BindGroupLayout,
    instance_gpu: HashMap<EffectId, InstanceGpu>,
}

impl StageRenderer {
    /// Creates a renderer for the given window
    ///
    /// Initializes wgpu, configures a transparent-capable surface and builds
    /// the line and point pipelines. There is no fallback path: a host
    /// without a usable adapter gets the error propagated, not a retry.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<StageRenderer, VitrineError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| VitrineError::AdapterRequest)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        // Prefer an alpha mode that lets the host show through
        let alpha_mode = surface_capabilities
            .alpha_modes
            .iter()
            .copied()
            .find(|mode| {
                matches!(
                    mode,
                    wgpu::CompositeAlphaMode::PreMultiplied
                        | wgpu::CompositeAlphaMode::PostMultiplied
                )
            })
            .unwrap_or(surface_capabilities.alpha_modes[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            // Bound by display refresh; effects never cap frames themselves
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Camera Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Line Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("line.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Effect Pipeline Layout"),
            bind_group_layouts: &[&camera_layout],
            push_constant_ranges: &[],
        });

        let make_pipeline = |label: &str, topology: wgpu::PrimitiveTopology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[LineVertex::layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
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
        };

        let line_pipeline = make_pipeline("Line Pipeline", wgpu::PrimitiveTopology::LineList);
        let point_pipeline = make_pipeline("Point Pipeline", wgpu::PrimitiveTopology::PointList);

        Ok(StageRenderer {
            surface,
            device: Arc::new(device),
            queue: Arc::new(queue),
            config,
            format,
            line_pipeline,
            point_pipeline,
            camera_layout,
            instance_gpu: HashMap::new(),
        })
    }

    /// Renders every live instance into its viewport rectangle
    pub fn render_frame(&mut self, stage: &EffectStage) {
        let batches = self.prepare_batches(stage);

        let surface_texture = self
            .surface
            .get_current_texture()
            .expect("Failed to get surface texture!");
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Effect Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            for batch in &batches {
                let Some(gpu) = self.instance_gpu.get(&batch.id) else {
                    continue;
                };
                if batch.rect.width == 0 || batch.rect.height == 0 {
                    continue;
                }

                render_pass.set_viewport(
                    batch.rect.x as f32,
                    batch.rect.y as f32,
                    batch.rect.width as f32,
                    batch.rect.height as f32,
                    0.0,
                    1.0,
                );
                render_pass.set_scissor_rect(
                    batch.rect.x,
                    batch.rect.y,
                    batch.rect.width,
                    batch.rect.height,
                );
                render_pass.set_bind_group(0, &gpu.bind_group, &[]);

                if let Some((buffer, count)) = &batch.lines {
                    render_pass.set_pipeline(&self.line_pipeline);
                    render_pass.set_vertex_buffer(0, buffer.slice(..));
                    render_pass.draw(0..*count, 0..1);
                }
                if let Some((buffer, count)) = &batch.points {
                    render_pass.set_pipeline(&self.point_pipeline);
                    render_pass.set_vertex_buffer(0, buffer.slice(..));
                    render_pass.draw(0..*count, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    /// Uploads per-instance uniforms and vertex data for this frame
    fn prepare_batches(&mut self, stage: &EffectStage) -> Vec<DrawBatch> {
        let mut batches = Vec::new();
        let mut live = Vec::new();

        for (id, instance) in stage.iter() {
            live.push(id);
            self.ensure_instance_gpu(id);
            let gpu = &self.instance_gpu[&id];
            self.queue.write_buffer(
                &gpu.uniform,
                0,
                bytemuck::bytes_of(&instance.scene().camera.uniform),
            );

            let (line_vertices, point_vertices) = flatten_scene(instance.scene());
            let rect = stage
                .viewports()
                .resolve(instance.viewport())
                .map(|v| self.pixel_rect(v.region()))
                .unwrap_or(PixelRect {
                    x: 0,
                    y: 0,
                    width: self.config.width,
                    height: self.config.height,
                });

            batches.push(DrawBatch {
                id,
                rect,
                lines: self.vertex_buffer("Line Vertices", &line_vertices),
                points: self.vertex_buffer("Point Vertices", &point_vertices),
            });
        }

        // Drop GPU state for destroyed instances
        self.instance_gpu.retain(|id, _| live.contains(id));
        batches
    }

    fn vertex_buffer(&self, label: &str, vertices: &[LineVertex]) -> Option<(wgpu::Buffer, u32)> {
        if vertices.is_empty() {
            return None;
        }
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        Some((buffer, vertices.len() as u32))
    }

    fn ensure_instance_gpu(&mut self, id: EffectId) {
        if self.instance_gpu.contains_key(&id) {
            return;
        }
        let uniform = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Effect Camera Uniform"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Effect Camera Bind Group"),
            layout: &self.camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            }],
        });
        self.instance_gpu
            .insert(id, InstanceGpu { uniform, bind_group });
    }

    fn pixel_rect(&self, region: Region) -> PixelRect {
        let x = (region.x * self.config.width as f32).round() as u32;
        let y = (region.y * self.config.height as f32).round() as u32;
        let width = ((region.width * self.config.width as f32).round() as u32)
            .min(self.config.width.saturating_sub(x));
        let height = ((region.height * self.config.height as f32).round() as u32)
            .min(self.config.height.saturating_sub(y));
        PixelRect {
            x,
            y,
            width,
            height,
        }
    }

    /// Resizes the surface, ignoring degenerate dimensions wgpu rejects
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Returns current surface dimensions
    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

/// Flattens a scene's visible drawables into world-space vertex lists
fn flatten_scene(scene: &Scene) -> (Vec<LineVertex>, Vec<LineVertex>) {
    let mut lines = Vec::new();
    let mut points = Vec::new();

    for node in scene.nodes() {
        if !node.visible {
            continue;
        }
        let matrix = node.transform.matrix();
        match &node.drawable {
            Drawable::Lines(set) => {
                for segment in &set.segments {
                    for endpoint in segment {
                        lines.push(LineVertex {
                            position: transform_point(&matrix, *endpoint),
                            color: set.color,
                        });
                    }
                }
            }
            Drawable::Points(set) => {
                for position in &set.positions {
                    points.push(LineVertex {
                        position: transform_point(&matrix, *position),
                        color: set.color,
                    });
                }
            }
        }
    }

    (lines, points)
}

fn transform_point(matrix: &Matrix4<f32>, point: Vector3<f32>) -> [f32; 3] {
    let v = matrix * point.extend(1.0);
    [v.x, v.y, v.z]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{EffectCamera, LineSet, PointSet};
    use cgmath::Vector3;

    #[test]
    fn test_flatten_counts_match_scene() {
        let mut scene = Scene::new(EffectCamera::new(6.0, 1.0));
        scene.add_lines(LineSet {
            segments: vec![
                [Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)],
                [Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 2.0, 0.0)],
            ],
            color: [1.0, 1.0, 1.0],
        });
        scene.add_points(PointSet {
            positions: vec![Vector3::new(0.0, 0.0, 1.0); 5],
            color: [0.5, 0.5, 0.5],
        });

        let (lines, points) = flatten_scene(&scene);
        assert_eq!(lines.len(), 4);
        assert_eq!(points.len(), 5);
    }

    #[test]
    fn test_flatten_applies_transforms() {
        let mut scene = Scene::new(EffectCamera::new(6.0, 1.0));
        let id = scene.add_points(PointSet {
            positions: vec![Vector3::new(1.0, 0.0, 0.0)],
            color: [1.0, 1.0, 1.0],
        });
        scene.node_mut(id).unwrap().transform.translation = Vector3::new(0.0, 2.0, 0.0);

        let (_, points) = flatten_scene(&scene);
        assert!((points[0].position[0] - 1.0).abs() < 1e-6);
        assert!((points[0].position[1] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_flatten_skips_hidden_nodes() {
        let mut scene = Scene::new(EffectCamera::new(6.0, 1.0));
        let id = scene.add_points(PointSet {
            positions: vec![Vector3::new(0.0, 0.0, 0.0)],
            color: [1.0, 1.0, 1.0],
        });
        scene.node_mut(id).unwrap().visible = false;

        let (lines, points) = flatten_scene(&scene);
        assert!(lines.is_empty());
        assert!(points.is_empty());
    }
}

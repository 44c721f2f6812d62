//! Shape Renderer - replays a recorded draw list as filled circles and lines
//!
//! Both shapes share one pipeline: the circle uses a unit triangle fan and a
//! line uses a unit quad, each placed by a per-draw transform written into a
//! paged uniform buffer and bound with a dynamic offset. Vertex data is
//! uploaded once at creation. Text commands are left to the caller.

use std::num::NonZeroU64;
use std::sync::Arc;

use bodyview_core::{Color, DrawCommand, DrawList};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};
use tracing::{debug, info};
use wgpu::util::DeviceExt;

use crate::pipeline::UniformBufferAllocator;
use crate::primitives::{CircleStencil, LineSprite};

/// Uniforms for one shape (matches shape.wgsl)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable, PartialEq)]
struct ShapeUniforms {
    transform: [[f32; 4]; 4], // 64 bytes
    color: [f32; 4],          // 16 bytes
}

const UNIT_QUAD: [[f32; 2]; 6] = [
    [0.0, 0.0],
    [1.0, 0.0],
    [1.0, 1.0],
    [0.0, 0.0],
    [1.0, 1.0],
    [0.0, 1.0],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Circle,
    Quad,
}

struct PreparedDraw {
    shape: Shape,
    page_index: usize,
    offset: u32,
}

/// Draws [`DrawList`] circles and lines into a render pass
pub struct ShapeRenderer {
    device: Arc<wgpu::Device>,
    pipeline: wgpu::RenderPipeline,
    uniform_bind_group_layout: wgpu::BindGroupLayout,
    circle_buffer: wgpu::Buffer,
    circle_vertex_count: u32,
    quad_buffer: wgpu::Buffer,
    stencil: CircleStencil,
    allocator: UniformBufferAllocator,
    // One bind group per allocator page, indexed by page
    page_bind_groups: Vec<wgpu::BindGroup>,
    draws: Vec<PreparedDraw>,
}

impl ShapeRenderer {
    /// Create a renderer for a `width` x `height` target
    pub fn new(
        device: Arc<wgpu::Device>,
        target_format: wgpu::TextureFormat,
        circle_segments: u32,
        width: u32,
        height: u32,
    ) -> Self {
        info!(
            "Creating shape renderer ({} circle segments, {}x{})",
            circle_segments, width, height
        );

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Shape Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: NonZeroU64::new(
                            std::mem::size_of::<ShapeUniforms>() as u64
                        ),
                    },
                    count: None,
                }],
            });

        let shader_source = include_str!("../../../shaders/shape.wgsl");
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shape Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shape Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shape Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x2],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let stencil = CircleStencil::new(circle_segments, width as f32, height as f32);
        let geometry = stencil.geometry().clone();
        let circle_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Circle Vertex Buffer"),
            contents: bytemuck::cast_slice(geometry.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Line Quad Vertex Buffer"),
            contents: bytemuck::cast_slice(&UNIT_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let allocator = UniformBufferAllocator::new(device.clone(), "Shape Uniforms");

        Self {
            device,
            pipeline,
            uniform_bind_group_layout,
            circle_buffer,
            circle_vertex_count: geometry.vertex_count(),
            quad_buffer,
            stencil,
            allocator,
            page_bind_groups: Vec::new(),
            draws: Vec::new(),
        }
    }

    /// Follow a target size change
    pub fn resize(&mut self, width: u32, height: u32) {
        debug!("Shape renderer resized to {}x{}", width, height);
        self.stencil.resize(width as f32, height as f32);
    }

    /// Current viewport in pixels
    pub fn viewport(&self) -> Vec2 {
        self.stencil.viewport()
    }

    /// Drop the previous frame's draws and rewind uniform storage
    pub fn begin_frame(&mut self) {
        self.draws.clear();
        self.allocator.reset();
    }

    /// Number of shapes queued for the next [`ShapeRenderer::draw`]
    pub fn queued(&self) -> usize {
        self.draws.len()
    }

    /// Queue a filled circle
    pub fn draw_circle(&mut self, queue: &wgpu::Queue, center: Vec2, radius: f32, color: Color) {
        let transform = self.stencil.transform(center, radius);
        self.push(queue, Shape::Circle, transform, color);
    }

    /// Queue a line of the given width
    pub fn draw_line(
        &mut self,
        queue: &wgpu::Queue,
        start: Vec2,
        end: Vec2,
        color: Color,
        width: f32,
    ) {
        let sprite = LineSprite::new(start, end, width);
        let transform = self.stencil.projection() * sprite.transform();
        self.push(queue, Shape::Quad, transform, color);
    }

    /// Start a frame and queue every circle and line of `list`, in order
    ///
    /// Returns the clear color recorded in the list, if any.
    pub fn submit(&mut self, queue: &wgpu::Queue, list: &DrawList) -> Option<Color> {
        self.begin_frame();
        for command in list.commands() {
            match command {
                DrawCommand::Circle {
                    center,
                    radius,
                    color,
                } => self.draw_circle(queue, *center, *radius, *color),
                DrawCommand::Line {
                    start,
                    end,
                    color,
                    width,
                } => self.draw_line(queue, *start, *end, *color, *width),
                DrawCommand::Clear(_) | DrawCommand::Text { .. } => {}
            }
        }
        list.clear_color()
    }

    /// Record the queued shapes into `pass`
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.draws.is_empty() {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        for draw in &self.draws {
            pass.set_bind_group(0, &self.page_bind_groups[draw.page_index], &[draw.offset]);
            match draw.shape {
                Shape::Circle => {
                    pass.set_vertex_buffer(0, self.circle_buffer.slice(..));
                    pass.draw(0..self.circle_vertex_count, 0..1);
                }
                Shape::Quad => {
                    pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
                    pass.draw(0..UNIT_QUAD.len() as u32, 0..1);
                }
            }
        }
    }

    fn push(&mut self, queue: &wgpu::Queue, shape: Shape, transform: Mat4, color: Color) {
        let uniforms = ShapeUniforms {
            transform: transform.to_cols_array_2d(),
            color: color.to_array(),
        };
        let allocation = self.allocator.allocate(queue, bytemuck::bytes_of(&uniforms));
        let (page_index, offset) = (allocation.page_index, allocation.offset);

        // Pages are created one at a time and never freed
        if page_index == self.page_bind_groups.len() {
            let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Shape Uniform Bind Group"),
                layout: &self.uniform_bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: allocation.buffer,
                        offset: 0,
                        size: NonZeroU64::new(std::mem::size_of::<ShapeUniforms>() as u64),
                    }),
                }],
            });
            self.page_bind_groups.push(bind_group);
        }

        self.draws.push(PreparedDraw {
            shape,
            page_index,
            offset: offset as u32,
        });
    }
}

//! Instanced renderer for the morph scene
//!
//! One draw per render group plus one for the star topper. Each draw binds
//! the group's mesh, a per-instance transform buffer, a per-instance colour
//! buffer and a small uniform holding the group's rotation about Y.

use crate::camera::{Camera, CameraUniform};
use crate::mesh::{Mesh, MeshVertex};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use particle_layout::{Color, GroupLayout, InstanceColor, InstanceTransform, RenderGroup, WHITE};
use particle_simulation::InstanceSink;
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Scene background, #050103
pub const BACKGROUND: Color = Color::from_hex(0x050103);

const STAR_OUTER_RADIUS: f32 = 0.6;
const STAR_INNER_RADIUS: f32 = 0.25;
const STAR_DEPTH: f32 = 0.1;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct GroupUniform {
    rotation: [[f32; 4]; 4],
}

impl GroupUniform {
    fn from_rotation_y(angle: f32) -> Self {
        Self {
            rotation: Mat4::from_rotation_y(angle).to_cols_array_2d(),
        }
    }
}

const TRANSFORM_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    2 => Float32x4,
    3 => Float32x4,
    4 => Float32x4,
    5 => Float32x4,
];

const COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![6 => Float32x4];

fn transform_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<InstanceTransform>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &TRANSFORM_ATTRIBUTES,
    }
}

fn color_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<InstanceColor>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &COLOR_ATTRIBUTES,
    }
}

/// GPU resources for one instanced draw
struct GroupDraw {
    vertices: wgpu::Buffer,
    vertex_count: u32,
    transforms: wgpu::Buffer,
    colors: wgpu::Buffer,
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    capacity: usize,
    instance_count: u32,
}

impl GroupDraw {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        mesh: &Mesh,
        capacity: usize,
    ) -> Self {
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertices")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // Empty groups still get a one-slot buffer; they are never drawn.
        let slots = capacity.max(1) as u64;
        let transforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label} Transforms")),
            size: slots * std::mem::size_of::<InstanceTransform>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let colors = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label} Colors")),
            size: slots * std::mem::size_of::<InstanceColor>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Uniform")),
            contents: bytemuck::cast_slice(&[GroupUniform::from_rotation_y(0.0)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} Bind Group")),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            }],
        });

        Self {
            vertices,
            vertex_count: mesh.vertex_count(),
            transforms,
            colors,
            uniform,
            bind_group,
            capacity,
            instance_count: 0,
        }
    }

    fn write_colors(&self, queue: &wgpu::Queue, colors: &[InstanceColor]) {
        let count = colors.len().min(self.capacity);
        if count > 0 {
            queue.write_buffer(&self.colors, 0, bytemuck::cast_slice(&colors[..count]));
        }
    }

    fn write_transforms(
        &mut self,
        queue: &wgpu::Queue,
        rotation_y: f32,
        transforms: &[InstanceTransform],
    ) {
        let count = transforms.len().min(self.capacity);
        if count > 0 {
            queue.write_buffer(
                &self.transforms,
                0,
                bytemuck::cast_slice(&transforms[..count]),
            );
        }
        queue.write_buffer(
            &self.uniform,
            0,
            bytemuck::cast_slice(&[GroupUniform::from_rotation_y(rotation_y)]),
        );
        self.instance_count = count as u32;
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.instance_count == 0 {
            return;
        }
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertices.slice(..));
        pass.set_vertex_buffer(1, self.transforms.slice(..));
        pass.set_vertex_buffer(2, self.colors.slice(..));
        pass.draw(0..self.vertex_count, 0..self.instance_count);
    }
}

pub struct MorphRenderer {
    queue: wgpu::Queue,
    render_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    groups: Vec<GroupDraw>,
    topper: GroupDraw,
    pub depth_texture: wgpu::TextureView,
}

impl MorphRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_config: &wgpu::SurfaceConfiguration,
        layout: &GroupLayout,
    ) -> Self {
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(device, surface_config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Instanced Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/instanced.wgsl").into()),
        });

        let uniform_entry = |visibility| wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Camera Bind Group Layout"),
            entries: &[uniform_entry(
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Group Bind Group Layout"),
            entries: &[uniform_entry(wgpu::ShaderStages::VERTEX)],
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&camera_layout, &group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Instanced Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vertex"),
                buffers: &[MeshVertex::desc(), transform_layout(), color_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fragment"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let groups = RenderGroup::ALL
            .iter()
            .map(|&group| {
                GroupDraw::new(
                    device,
                    &group_layout,
                    group.name(),
                    &Mesh::for_group(group),
                    layout.len(group),
                )
            })
            .collect();

        let topper = GroupDraw::new(
            device,
            &group_layout,
            "Star",
            &Mesh::star(STAR_OUTER_RADIUS, STAR_INNER_RADIUS, STAR_DEPTH),
            1,
        );
        topper.write_colors(queue, &[InstanceColor::from(WHITE)]);

        Self {
            queue: queue.clone(),
            render_pipeline,
            camera_buffer,
            camera_bind_group,
            groups,
            topper,
            depth_texture,
        }
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
    ) -> wgpu::TextureView {
        let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: config.width.max(1),
                height: config.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        depth_texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn resize(&mut self, device: &wgpu::Device, new_config: &wgpu::SurfaceConfiguration) {
        self.depth_texture = Self::create_depth_texture(device, new_config);
    }

    /// Instances currently drawn per group, in [`RenderGroup::ALL`] order
    pub fn instance_counts(&self) -> [u32; RenderGroup::COUNT] {
        std::array::from_fn(|i| self.groups[i].instance_count)
    }

    pub fn render(
        &self,
        device: &wgpu::Device,
        surface_view: &wgpu::TextureView,
        camera: &Camera,
        time: f32,
    ) {
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera.to_uniform(time)]),
        );

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let [r, g, b, _] = BACKGROUND.to_linear_rgba();
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            for group in &self.groups {
                group.draw(&mut render_pass);
            }
            self.topper.draw(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

impl InstanceSink for MorphRenderer {
    fn upload_colors(&mut self, group: RenderGroup, colors: &[InstanceColor]) {
        let draw = &self.groups[group.index()];
        if colors.len() != draw.capacity {
            log::warn!(
                "{} colour upload has {} entries for {} instances",
                group.name(),
                colors.len(),
                draw.capacity
            );
        }
        draw.write_colors(&self.queue, colors);
    }

    fn upload_transforms(
        &mut self,
        group: RenderGroup,
        group_rotation_y: f32,
        transforms: &[InstanceTransform],
    ) {
        self.groups[group.index()].write_transforms(&self.queue, group_rotation_y, transforms);
    }

    fn upload_topper(&mut self, transform: &InstanceTransform) {
        self.topper
            .write_transforms(&self.queue, 0.0, std::slice::from_ref(transform));
    }
}

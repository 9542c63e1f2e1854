//! Post-effect compositor
//!
//! Owns a fixed six-vertex screen quad built once at creation and blits the
//! composite framebuffer onto the back buffer through the active effect.
//! GPU buffers are freed when the compositor is dropped.

use wgpu::util::DeviceExt;

use super::targets::Framebuffer;
use super::uniforms::PostUniform;
use super::vertex::QuadVertex;
use crate::settings::PostEffectKind;

/// Two triangles covering NDC, V flipped so the texture reads upright
pub const QUAD_VERTICES: [QuadVertex; 6] = [
    QuadVertex::new(-1.0, 1.0, 0.0, 0.0),
    QuadVertex::new(-1.0, -1.0, 0.0, 1.0),
    QuadVertex::new(1.0, 1.0, 1.0, 0.0),
    QuadVertex::new(1.0, 1.0, 1.0, 0.0),
    QuadVertex::new(-1.0, -1.0, 0.0, 1.0),
    QuadVertex::new(1.0, -1.0, 1.0, 1.0),
];

pub struct PostEffect {
    pipeline: wgpu::RenderPipeline,
    quad_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    kind: PostEffectKind,
}

impl PostEffect {
    pub fn new(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
        source: &Framebuffer,
        kind: PostEffectKind,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_effect_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("post_effect.wgsl").into()),
        });

        let quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("post_effect_quad"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("post_effect_uniform"),
            contents: bytemuck::bytes_of(&PostUniform {
                mode: kind.shader_mode(),
                _pad: [0; 3],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_effect_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("post_effect_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&source.color_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&source.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("post_effect_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("post_effect_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[QuadVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            quad_buffer,
            uniform_buffer,
            bind_group,
            kind,
        }
    }

    pub fn kind(&self) -> PostEffectKind {
        self.kind
    }

    pub fn set_kind(&mut self, queue: &wgpu::Queue, kind: PostEffectKind) {
        self.kind = kind;
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&PostUniform {
                mode: kind.shader_mode(),
                _pad: [0; 3],
            }),
        );
        log::info!("Post effect: {}", kind.as_str());
    }

    /// Draw the quad into `target`, sampling the framebuffer bound at creation
    pub fn blit(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("post_effect_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
        pass.draw(0..QUAD_VERTICES.len() as u32, 0..1);
    }
}

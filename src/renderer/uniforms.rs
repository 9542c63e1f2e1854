//! GPU uniform layouts (must match the WGSL structs)

use bytemuck::{Pod, Zeroable};

use crate::scene::Frame;
use crate::settings::Settings;
use crate::sim::DrawItem;

/// Object slots allocated up front; the buffer doubles past this
pub const INITIAL_DRAW_CAPACITY: usize = 256;

/// Light-space transform for the depth pass
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ShadowUniform {
    pub light_view_proj: [[f32; 4]; 4],
}

impl ShadowUniform {
    pub fn from_frame(frame: &Frame) -> Self {
        Self {
            light_view_proj: frame.light_view_projection.to_cols_array_2d(),
        }
    }
}

/// Per-frame data for the lit pass
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],       // offset 0
    pub light_view_proj: [[f32; 4]; 4], // offset 64
    pub light_position: [f32; 4],       // offset 128
    pub camera_position: [f32; 4],      // offset 144
    pub light_color: [f32; 4],          // offset 160
    /// x = shadow texel size, y = 1 for PCF, z = depth bias
    pub shadow_params: [f32; 4], // offset 176
}

impl FrameUniform {
    pub fn new(frame: &Frame, settings: &Settings, shadow_size: u32) -> Self {
        Self {
            view_proj: (frame.projection * frame.view).to_cols_array_2d(),
            light_view_proj: frame.light_view_projection.to_cols_array_2d(),
            light_position: frame.light_position.extend(1.0).to_array(),
            camera_position: frame.camera_position.extend(1.0).to_array(),
            light_color: frame.light_color.extend(1.0).to_array(),
            shadow_params: [
                1.0 / shadow_size as f32,
                if settings.soft_shadows { 1.0 } else { 0.0 },
                0.002,
                0.0,
            ],
        }
    }
}

/// Per-draw data, bound with a dynamic offset
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ObjectUniform {
    pub world: [[f32; 4]; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    /// w = shininess
    pub specular: [f32; 4],
}

impl ObjectUniform {
    pub fn from_draw(draw: &DrawItem) -> Self {
        let m = &draw.material;
        Self {
            world: draw.world.to_cols_array_2d(),
            ambient: m.ambient.extend(1.0).to_array(),
            diffuse: m.diffuse.extend(1.0).to_array(),
            specular: m.specular.extend(m.shininess).to_array(),
        }
    }
}

/// Post-effect selection
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PostUniform {
    pub mode: u32,
    pub _pad: [u32; 3],
}

/// Round `size` up to the device's dynamic offset alignment
pub fn aligned_stride(size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}

/// Slot count that fits `needed` draws, growing `current` by powers of two
pub fn grown_capacity(current: usize, needed: usize) -> usize {
    if needed <= current {
        current
    } else {
        needed.next_power_of_two().max(current)
    }
}

/// One slot per draw in a single dynamic-offset uniform buffer
pub struct ObjectBuffer {
    pub buffer: wgpu::Buffer,
    pub layout: wgpu::BindGroupLayout,
    pub bind_group: wgpu::BindGroup,
    stride: u64,
    capacity: usize,
}

impl ObjectBuffer {
    pub fn new(device: &wgpu::Device) -> Self {
        let stride = aligned_stride(
            std::mem::size_of::<ObjectUniform>() as u64,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ObjectUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });
        let (buffer, bind_group) =
            Self::allocate(device, &layout, stride, INITIAL_DRAW_CAPACITY);
        Self {
            buffer,
            layout,
            bind_group,
            stride,
            capacity: INITIAL_DRAW_CAPACITY,
        }
    }

    fn allocate(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("objects"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object_bind_group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ObjectUniform>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Reallocate (keeping the layout) when a frame has more draws than slots
    pub fn reserve(&mut self, device: &wgpu::Device, draws: usize) {
        let capacity = grown_capacity(self.capacity, draws);
        if capacity == self.capacity {
            return;
        }
        let (buffer, bind_group) = Self::allocate(device, &self.layout, self.stride, capacity);
        log::debug!("Object buffer grown from {} to {} slots", self.capacity, capacity);
        self.buffer = buffer;
        self.bind_group = bind_group;
        self.capacity = capacity;
    }

    /// Upload every draw's uniform into its slot
    pub fn write(&self, queue: &wgpu::Queue, draws: &[DrawItem]) {
        debug_assert!(draws.len() <= self.capacity, "reserve before write");
        let stride = self.stride as usize;
        let mut bytes = vec![0u8; stride * draws.len()];
        for (i, draw) in draws.iter().enumerate() {
            let uniform = ObjectUniform::from_draw(draw);
            let src = bytemuck::bytes_of(&uniform);
            bytes[i * stride..i * stride + src.len()].copy_from_slice(src);
        }
        if !bytes.is_empty() {
            queue.write_buffer(&self.buffer, 0, &bytes);
        }
    }

    /// Dynamic offset of draw `index`
    pub fn offset(&self, index: usize) -> u32 {
        (self.stride * index as u64) as u32
    }
}

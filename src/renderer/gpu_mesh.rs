//! GPU copies of cached meshes
//!
//! Uploaded lazily the first time a mesh key is drawn, then reused for the
//! rest of the session. The CPU side stays in the `ResourceCache`.

use std::collections::HashMap;
use wgpu::util::DeviceExt;

use crate::error::RenderError;
use crate::mesh::MeshData;
use crate::resources::ResourceCache;

pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, name: &str, mesh: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(name),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(name),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count(),
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[derive(Default)]
pub struct GpuMeshCache {
    meshes: HashMap<&'static str, GpuMesh>,
}

impl GpuMeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `key` is resident, uploading it from `cache` if needed
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        cache: &ResourceCache,
        key: &'static str,
    ) -> Result<(), RenderError> {
        if self.meshes.contains_key(key) {
            return Ok(());
        }
        let mesh = cache
            .get::<MeshData>(key)
            .ok_or_else(|| RenderError::MissingMesh(key.to_string()))?;
        log::debug!(
            "Uploading mesh {} ({} vertices, {} indices)",
            key,
            mesh.vertices.len(),
            mesh.indices.len()
        );
        self.meshes.insert(key, GpuMesh::upload(device, key, &mesh));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&GpuMesh> {
        self.meshes.get(key)
    }
}

//! CPU-side mesh data and procedural geometry
//!
//! Meshes are generated once, registered in the resource cache, and uploaded
//! to the GPU lazily by the renderer.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Vertex with position, normal and texture coordinate
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Indexed triangle list
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Push a vertex and return its index
    fn push(&mut self, vertex: Vertex) -> u32 {
        self.vertices.push(vertex);
        (self.vertices.len() - 1) as u32
    }
}

/// Generate a Y-axis cylinder centered at the origin, with caps
pub fn create_cylinder(radius: f32, height: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let half = height / 2.0;
    let mut mesh = MeshData::default();

    // Side: duplicate seam column so UVs wrap cleanly
    let side_start = mesh.vertices.len() as u32;
    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let theta = t * TAU;
        let (s, c) = theta.sin_cos();
        let normal = [c, 0.0, s];
        mesh.push(Vertex::new([radius * c, half, radius * s], normal, [t, 0.0]));
        mesh.push(Vertex::new([radius * c, -half, radius * s], normal, [t, 1.0]));
    }
    for i in 0..segments {
        let top0 = side_start + i * 2;
        let bottom0 = top0 + 1;
        let top1 = top0 + 2;
        let bottom1 = top0 + 3;
        mesh.indices
            .extend_from_slice(&[top0, top1, bottom0, bottom0, top1, bottom1]);
    }

    // Caps
    for (y, ny) in [(half, 1.0_f32), (-half, -1.0_f32)] {
        let center = mesh.push(Vertex::new([0.0, y, 0.0], [0.0, ny, 0.0], [0.5, 0.5]));
        let ring_start = mesh.vertices.len() as u32;
        for i in 0..segments {
            let theta = i as f32 / segments as f32 * TAU;
            let (s, c) = theta.sin_cos();
            mesh.push(Vertex::new(
                [radius * c, y, radius * s],
                [0.0, ny, 0.0],
                [0.5 + 0.5 * c, 0.5 + 0.5 * s],
            ));
        }
        for i in 0..segments {
            let a = ring_start + i;
            let b = ring_start + (i + 1) % segments;
            if ny > 0.0 {
                mesh.indices.extend_from_slice(&[center, b, a]);
            } else {
                mesh.indices.extend_from_slice(&[center, a, b]);
            }
        }
    }

    mesh
}

/// Generate an axis-aligned box centered at the origin
pub fn create_cuboid(half_extents: Vec3) -> MeshData {
    let h = half_extents;
    // (normal, tangent u, tangent v) per face; corners are n ± u ± v
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut mesh = MeshData::default();
    for (n, u, v) in faces {
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
        let base = mesh.vertices.len() as u32;
        for (cu, cv) in corners {
            let p = (n + u * cu + v * cv) * h;
            mesh.push(Vertex::new(
                p.to_array(),
                n.to_array(),
                [(cu + 1.0) / 2.0, 1.0 - (cv + 1.0) / 2.0],
            ));
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// Generate a UV sphere centered at the origin
pub fn create_sphere(radius: f32, rings: u32, segments: u32) -> MeshData {
    let rings = rings.max(2);
    let segments = segments.max(3);
    let mut mesh = MeshData::default();

    for r in 0..=rings {
        let v = r as f32 / rings as f32;
        let phi = v * PI;
        let (sp, cp) = phi.sin_cos();
        for s in 0..=segments {
            let u = s as f32 / segments as f32;
            let theta = u * TAU;
            let (st, ct) = theta.sin_cos();
            let normal = Vec3::new(sp * ct, cp, sp * st);
            mesh.push(Vertex::new(
                (normal * radius).to_array(),
                normal.to_array(),
                [u, v],
            ));
        }
    }

    let stride = segments + 1;
    for r in 0..rings {
        for s in 0..segments {
            let a = r * stride + s;
            let b = a + stride;
            mesh.indices
                .extend_from_slice(&[a, a + 1, b, b, a + 1, b + 1]);
        }
    }
    mesh
}

//! Shape generation for 2D overlay primitives
//!
//! All shapes are emitted as triangle lists in NDC. `x_scale` squeezes the
//! horizontal axis so circles stay round on non-square targets.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::OverlayVertex;

/// Generate vertices for an axis-aligned rectangle
pub fn quad(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<OverlayVertex> {
    vec![
        OverlayVertex::new(min.x, max.y, color),
        OverlayVertex::new(min.x, min.y, color),
        OverlayVertex::new(max.x, max.y, color),
        OverlayVertex::new(max.x, max.y, color),
        OverlayVertex::new(min.x, min.y, color),
        OverlayVertex::new(max.x, min.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(
    center: Vec2,
    radius: f32,
    x_scale: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<OverlayVertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(OverlayVertex::new(center.x, center.y, color));
        vertices.push(OverlayVertex::new(
            center.x + radius * x_scale * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(OverlayVertex::new(
            center.x + radius * x_scale * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    x_scale: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<OverlayVertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);
    let point = |r: f32, theta: f32| {
        Vec2::new(
            center.x + r * x_scale * theta.cos(),
            center.y + r * theta.sin(),
        )
    };

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let inner1 = point(inner_radius, theta1);
        let outer1 = point(outer_radius, theta1);
        let inner2 = point(inner_radius, theta2);
        let outer2 = point(outer_radius, theta2);

        // Two triangles per segment
        vertices.push(OverlayVertex::new(inner1.x, inner1.y, color));
        vertices.push(OverlayVertex::new(outer1.x, outer1.y, color));
        vertices.push(OverlayVertex::new(inner2.x, inner2.y, color));

        vertices.push(OverlayVertex::new(inner2.x, inner2.y, color));
        vertices.push(OverlayVertex::new(outer1.x, outer1.y, color));
        vertices.push(OverlayVertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

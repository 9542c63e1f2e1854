//! Per-frame player input

use glam::Vec3;

/// Movement intent for a single frame, in room axes (+X east, +Z south)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub move_x: f32,
    pub move_z: f32,
}

impl TickInput {
    pub fn new(move_x: f32, move_z: f32) -> Self {
        Self { move_x, move_z }
    }

    /// Planar movement direction, length clamped to 1 so diagonals aren't faster
    pub fn direction(&self) -> Vec3 {
        Vec3::new(self.move_x, 0.0, self.move_z).clamp_length_max(1.0)
    }
}

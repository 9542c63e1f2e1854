//! Phong material parameters

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Ambient/diffuse/specular coefficients plus a shininess exponent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
}

impl Material {
    pub const fn new(ambient: Vec3, diffuse: Vec3, specular: Vec3, shininess: f32) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            shininess,
        }
    }

    /// Red gem material used by spawners
    pub const RUBY: Self = Self::new(
        Vec3::new(0.1745, 0.01175, 0.01175),
        Vec3::new(0.61424, 0.04136, 0.04136),
        Vec3::new(0.727811, 0.626959, 0.626959),
        0.6 * 128.0,
    );

    /// Polished metal used by projectiles
    pub const CHROME: Self = Self::new(
        Vec3::new(0.25, 0.25, 0.25),
        Vec3::new(0.4, 0.4, 0.4),
        Vec3::new(0.774597, 0.774597, 0.774597),
        0.6 * 128.0,
    );

    /// Green gem used for the player avatar
    pub const EMERALD: Self = Self::new(
        Vec3::new(0.0215, 0.1745, 0.0215),
        Vec3::new(0.07568, 0.61424, 0.07568),
        Vec3::new(0.633, 0.727811, 0.633),
        0.6 * 128.0,
    );

    /// Dull stone for floor and walls
    pub const STONE: Self = Self::new(
        Vec3::new(0.2, 0.2, 0.2),
        Vec3::new(0.55, 0.55, 0.5),
        Vec3::new(0.1, 0.1, 0.1),
        8.0,
    );

    /// Warm wall plaster
    pub const PLASTER: Self = Self::new(
        Vec3::new(0.22, 0.2, 0.18),
        Vec3::new(0.7, 0.62, 0.5),
        Vec3::new(0.05, 0.05, 0.05),
        4.0,
    );

    /// Emissive-looking light gizmo (all ambient)
    pub const LIGHT_BULB: Self = Self::new(Vec3::ONE, Vec3::ZERO, Vec3::ZERO, 1.0);
}

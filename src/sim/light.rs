//! The scene's single static light
//!
//! Acts as a point light for shading and as an orthographic shadow caster
//! looking at the room center.

use glam::{Mat4, Quat, Vec3};

use super::lifecycle::Lifecycle;
use super::object::{DrawItem, GameObject, MeshMaterial};
use crate::consts::*;
use crate::error::ResourceError;
use crate::material::Material;
use crate::mesh::create_sphere;
use crate::resources::ResourceCache;

/// Half size of the orthographic shadow frustum
const SHADOW_HALF_SIZE: f32 = ROOM_HALF_EXTENT + 6.0;
const SHADOW_NEAR: f32 = 1.0;
const SHADOW_FAR: f32 = 40.0;

#[derive(Debug)]
pub struct StaticLight {
    lifecycle: Lifecycle,
    position: Vec3,
    target: Vec3,
    color: Vec3,
    look: Option<MeshMaterial>,
}

impl Default for StaticLight {
    fn default() -> Self {
        Self {
            lifecycle: Lifecycle::Uninitialized,
            position: Vec3::from_array(LIGHT_POSITION),
            target: Vec3::ZERO,
            color: Vec3::ONE,
            look: None,
        }
    }
}

impl StaticLight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initialize(
        &mut self,
        position: Vec3,
        color: Vec3,
        cache: &mut ResourceCache,
    ) -> Result<(), ResourceError> {
        let look = MeshMaterial::resolve(
            cache,
            LIGHT_MESH_KEY,
            LIGHT_MATERIAL_KEY,
            || create_sphere(1.0, 8, 12),
            Material::LIGHT_BULB,
        )?;
        self.lifecycle.initialize(self.kind());
        self.position = position;
        self.color = color;
        self.look = Some(look);
        Ok(())
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn color(&self) -> Vec3 {
        self.color
    }

    pub fn view(&self) -> Mat4 {
        // Straight-down lights need a different up vector
        let forward = (self.target - self.position).normalize_or_zero();
        let up = if forward.cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        Mat4::look_at_rh(self.position, self.target, up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::orthographic_rh(
            -SHADOW_HALF_SIZE,
            SHADOW_HALF_SIZE,
            -SHADOW_HALF_SIZE,
            SHADOW_HALF_SIZE,
            SHADOW_NEAR,
            SHADOW_FAR,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

impl GameObject for StaticLight {
    fn kind(&self) -> &'static str {
        "static light"
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn tick(&mut self, _delta_seconds: f32) {
        self.lifecycle.expect_live(self.kind());
    }

    fn draw(&self) -> Option<DrawItem> {
        self.lifecycle.expect_live(self.kind());
        let look = self.look.as_ref()?;
        let world = Mat4::from_scale_rotation_translation(
            Vec3::splat(LIGHT_GIZMO_RADIUS),
            Quat::IDENTITY,
            self.position,
        );
        Some(look.draw(world, true))
    }

    fn release(&mut self) {
        self.lifecycle.release(self.kind());
        self.look = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_center_inside_shadow_frustum() {
        let mut cache = ResourceCache::new();
        let mut light = StaticLight::new();
        light
            .initialize(Vec3::from_array(LIGHT_POSITION), Vec3::ONE, &mut cache)
            .unwrap();
        let clip = light.view_projection() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn test_room_corners_inside_shadow_frustum() {
        let light = StaticLight::new();
        let vp = light.view_projection();
        let h = ROOM_HALF_EXTENT;
        for corner in [
            Vec3::new(-h, 0.0, -h),
            Vec3::new(h, 0.0, -h),
            Vec3::new(-h, WALL_HEIGHT, h),
            Vec3::new(h, WALL_HEIGHT, h),
        ] {
            let ndc = vp.project_point3(corner);
            assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0, "{corner:?} -> {ndc:?}");
            assert!((0.0..=1.0).contains(&ndc.z), "{corner:?} -> {ndc:?}");
        }
    }

    #[test]
    fn test_straight_down_light_has_valid_view() {
        let light = StaticLight {
            position: Vec3::new(0.0, 10.0, 0.0),
            ..Default::default()
        };
        assert!(light.view().is_finite());
    }

    #[test]
    #[should_panic(expected = "already initialized")]
    fn test_double_initialize_panics() {
        let mut cache = ResourceCache::new();
        let mut light = StaticLight::new();
        light.initialize(Vec3::Y, Vec3::ONE, &mut cache).unwrap();
        let _ = light.initialize(Vec3::Y, Vec3::ONE, &mut cache);
    }

    #[test]
    #[should_panic(expected = "has already been released")]
    fn test_tick_after_release_panics() {
        let mut cache = ResourceCache::new();
        let mut light = StaticLight::new();
        light.initialize(Vec3::Y, Vec3::ONE, &mut cache).unwrap();
        light.release();
        light.tick(0.1);
    }
}

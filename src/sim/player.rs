//! The player-controlled avatar

use glam::{Mat4, Quat, Vec3};

use super::input::TickInput;
use super::lifecycle::Lifecycle;
use super::object::{DrawItem, GameObject, MeshMaterial};
use super::sphere::BoundingSphere;
use crate::consts::{PLAYER_MATERIAL_KEY, PLAYER_MESH_KEY};
use crate::error::ResourceError;
use crate::material::Material;
use crate::mesh::create_sphere;
use crate::resources::ResourceCache;

#[derive(Debug, Default)]
pub struct Player {
    lifecycle: Lifecycle,
    sphere: BoundingSphere,
    speed: f32,
    /// Max |x| and |z| of the center
    limit: f32,
    /// Latest movement intent
    intent: Vec3,
    look: Option<MeshMaterial>,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initialize(
        &mut self,
        start: Vec3,
        radius: f32,
        speed: f32,
        limit: f32,
        cache: &mut ResourceCache,
    ) -> Result<(), ResourceError> {
        let look = MeshMaterial::resolve(
            cache,
            PLAYER_MESH_KEY,
            PLAYER_MATERIAL_KEY,
            || create_sphere(1.0, 16, 24),
            Material::EMERALD,
        )?;
        self.lifecycle.initialize(self.kind());
        self.sphere = BoundingSphere::new(start, radius);
        self.speed = speed;
        self.limit = limit;
        self.intent = Vec3::ZERO;
        self.look = Some(look);
        self.clamp_to_room();
        Ok(())
    }

    pub fn set_input(&mut self, input: &TickInput) {
        self.intent = input.direction();
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.sphere.center
    }

    #[inline]
    pub fn sphere(&self) -> &BoundingSphere {
        &self.sphere
    }

    fn clamp_to_room(&mut self) {
        let c = &mut self.sphere.center;
        c.x = c.x.clamp(-self.limit, self.limit);
        c.z = c.z.clamp(-self.limit, self.limit);
    }
}

impl GameObject for Player {
    fn kind(&self) -> &'static str {
        "player"
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn tick(&mut self, delta_seconds: f32) {
        self.lifecycle.expect_live(self.kind());
        self.sphere.center += self.intent * self.speed * delta_seconds;
        self.clamp_to_room();
    }

    fn draw(&self) -> Option<DrawItem> {
        self.lifecycle.expect_live(self.kind());
        let look = self.look.as_ref()?;
        let world = Mat4::from_scale_rotation_translation(
            Vec3::splat(self.sphere.radius()),
            Quat::IDENTITY,
            self.sphere.center,
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

    fn player() -> Player {
        let mut cache = ResourceCache::new();
        let mut p = Player::new();
        p.initialize(Vec3::new(0.0, 0.5, 0.0), 0.5, 2.0, 4.0, &mut cache)
            .unwrap();
        p
    }

    #[test]
    fn test_moves_with_input() {
        let mut p = player();
        p.set_input(&TickInput::new(1.0, 0.0));
        p.tick(0.5);
        assert!((p.position().x - 1.0).abs() < 0.001);
        assert_eq!(p.sphere().center, p.position());
    }

    #[test]
    fn test_clamped_to_room() {
        let mut p = player();
        p.set_input(&TickInput::new(0.0, -1.0));
        p.tick(10.0);
        assert!((p.position().z - (-4.0)).abs() < 0.001);
    }

    #[test]
    fn test_stays_put_without_input() {
        let mut p = player();
        p.tick(1.0);
        assert_eq!(p.position(), Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    #[should_panic(expected = "not initialized")]
    fn test_tick_uninitialized_panics() {
        let mut p = Player::new();
        p.tick(0.1);
    }

    #[test]
    #[should_panic(expected = "already initialized")]
    fn test_double_initialize_panics() {
        let mut cache = ResourceCache::new();
        let mut p = player();
        let _ = p.initialize(Vec3::ZERO, 0.5, 2.0, 4.0, &mut cache);
    }

    #[test]
    #[should_panic(expected = "has already been released")]
    fn test_tick_after_release_panics() {
        let mut p = player();
        p.release();
        p.tick(0.1);
    }
}

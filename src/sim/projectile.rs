//! Projectiles fired by spawners
//!
//! A projectile flies in a straight line at constant speed until it has
//! covered its maximum distance, leaves the room, or hits the player.

use glam::{Mat4, Quat, Vec3};

use super::lifecycle::Lifecycle;
use super::object::{DrawItem, GameObject, MeshMaterial};
use super::sphere::BoundingSphere;
use crate::tuning::ProjectileParams;

#[derive(Debug, Default)]
pub struct Projectile {
    lifecycle: Lifecycle,
    sphere: BoundingSphere,
    /// Unit travel direction
    direction: Vec3,
    speed: f32,
    traveled: f32,
    max_distance: f32,
    /// Set by the scene when this projectile hit the player
    collided: bool,
    look: Option<MeshMaterial>,
}

impl Projectile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initialize(
        &mut self,
        origin: Vec3,
        direction: Vec3,
        params: ProjectileParams,
        look: MeshMaterial,
    ) {
        self.lifecycle.initialize(self.kind());
        debug_assert!(direction.length_squared() > 0.0, "projectile needs a direction");
        self.sphere = BoundingSphere::new(origin, params.radius);
        self.direction = direction.normalize_or_zero();
        self.speed = params.speed;
        self.traveled = 0.0;
        self.max_distance = params.max_distance;
        self.collided = false;
        self.look = Some(look);
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.sphere.center
    }

    #[inline]
    pub fn sphere(&self) -> &BoundingSphere {
        &self.sphere
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn traveled(&self) -> f32 {
        self.traveled
    }

    /// Covered at least its maximum distance
    pub fn is_expired(&self) -> bool {
        self.traveled >= self.max_distance
    }

    /// Center outside the room footprint
    pub fn is_out_of_bounds(&self, half_extent: f32) -> bool {
        let p = self.sphere.center;
        p.x.abs() > half_extent || p.z.abs() > half_extent
    }

    pub fn mark_collided(&mut self) {
        self.collided = true;
    }

    pub fn has_collided(&self) -> bool {
        self.collided
    }

    /// Removal predicate for the per-frame sweep
    pub fn should_evict(&self, half_extent: f32) -> bool {
        self.is_expired() || self.collided || self.is_out_of_bounds(half_extent)
    }
}

impl GameObject for Projectile {
    fn kind(&self) -> &'static str {
        "bullet"
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn tick(&mut self, delta_seconds: f32) {
        self.lifecycle.expect_live(self.kind());
        let step = self.speed * delta_seconds;
        self.sphere.center += self.direction * step;
        self.traveled += step;
    }

    fn draw(&self) -> Option<DrawItem> {
        self.lifecycle.expect_live(self.kind());
        let look = self.look.as_ref()?;
        // Shared bullet mesh is a unit sphere
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
    use crate::material::Material;
    use crate::mesh::create_sphere;
    use crate::resources::ResourceCache;

    fn look() -> MeshMaterial {
        let mut cache = ResourceCache::new();
        MeshMaterial::resolve(
            &mut cache,
            "TestBullet",
            "TestBulletMaterial",
            || create_sphere(0.2, 4, 6),
            Material::CHROME,
        )
        .unwrap()
    }

    fn projectile(speed: f32, max_distance: f32) -> Projectile {
        let mut p = Projectile::new();
        p.initialize(
            Vec3::ZERO,
            Vec3::X,
            ProjectileParams {
                speed,
                max_distance,
                radius: 0.2,
            },
            look(),
        );
        p
    }

    #[test]
    fn test_expires_on_exact_distance() {
        let mut p = projectile(5.0, 10.0);
        p.tick(1.0);
        assert!(!p.is_expired());
        assert!((p.traveled() - 5.0).abs() < 0.001);
        p.tick(1.0);
        assert!(p.is_expired());
        assert!((p.position().x - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_sphere_follows_position() {
        let mut p = projectile(2.0, 100.0);
        p.tick(0.5);
        assert_eq!(p.sphere().center, p.position());
        assert!((p.position() - Vec3::new(1.0, 0.0, 0.0)).length() < 0.001);
    }

    #[test]
    fn test_direction_normalized() {
        let mut p = Projectile::new();
        p.initialize(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 3.0),
            ProjectileParams {
                speed: 1.0,
                max_distance: 1.0,
                radius: 0.1,
            },
            look(),
        );
        assert!((p.direction().length() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut p = projectile(4.0, 100.0);
        assert!(!p.is_out_of_bounds(3.0));
        p.tick(1.0);
        assert!(p.is_out_of_bounds(3.0));
        assert!(p.should_evict(3.0));
    }

    #[test]
    fn test_collided_evicts() {
        let mut p = projectile(1.0, 100.0);
        assert!(!p.should_evict(50.0));
        p.mark_collided();
        assert!(p.should_evict(50.0));
    }

    #[test]
    #[should_panic(expected = "already initialized")]
    fn test_double_initialize_panics() {
        let mut p = projectile(1.0, 1.0);
        p.initialize(
            Vec3::ZERO,
            Vec3::X,
            ProjectileParams {
                speed: 1.0,
                max_distance: 1.0,
                radius: 0.1,
            },
            look(),
        );
    }

    #[test]
    #[should_panic(expected = "has already been released")]
    fn test_tick_after_release_panics() {
        let mut p = projectile(1.0, 1.0);
        p.release();
        p.tick(0.1);
    }
}

//! Stationary projectile spawners
//!
//! A spawner accumulates time and owes one projectile per interval crossed.
//! The remainder is carried over so cadence does not drift with frame jitter.
//! The scene collects owed spawns with `take_pending` and asks the spawner
//! to `emit` them, since only the scene knows where the player is.

use glam::{Mat4, Vec3};

use super::census::{LiveCount, LiveToken};
use super::lifecycle::Lifecycle;
use super::object::{DrawItem, GameObject, MeshMaterial};
use super::projectile::Projectile;
use crate::consts::*;
use crate::error::ResourceError;
use crate::material::Material;
use crate::mesh::{create_cylinder, create_sphere};
use crate::resources::ResourceCache;
use crate::tuning::{ProjectileParams, SpawnPolicy};

/// Resources a spawner holds only while live
#[derive(Debug)]
struct Armed {
    body: MeshMaterial,
    bullet: MeshMaterial,
    _census: LiveToken,
}

#[derive(Debug)]
enum SpawnerState {
    Uninitialized,
    Live(Armed),
    Released,
}

#[derive(Debug)]
pub struct Spawner {
    state: SpawnerState,
    position: Vec3,
    /// Seconds accumulated since the last spawn
    elapsed: f32,
    /// Seconds between spawns
    interval: f32,
    /// Spawns owed but not yet emitted
    pending: u32,
}

impl Spawner {
    pub fn new(interval: f32) -> Self {
        assert!(interval > 0.0, "spawn interval must be positive, got {interval}");
        Self {
            state: SpawnerState::Uninitialized,
            position: Vec3::ZERO,
            elapsed: 0.0,
            interval,
            pending: 0,
        }
    }

    /// Resolve the shared spawner and bullet resources (building them on
    /// first use), place the spawner, and register it with `census`.
    pub fn initialize(
        &mut self,
        position: Vec3,
        cache: &mut ResourceCache,
        census: &LiveCount,
    ) -> Result<(), ResourceError> {
        self.lifecycle().initialize(self.kind());
        let body = MeshMaterial::resolve(
            cache,
            SPAWNER_MESH_KEY,
            SPAWNER_MATERIAL_KEY,
            || create_cylinder(SPAWNER_MESH_RADIUS, SPAWNER_MESH_HEIGHT, SPAWNER_MESH_SEGMENTS),
            Material::RUBY,
        )?;
        let bullet = MeshMaterial::resolve(
            cache,
            BULLET_MESH_KEY,
            BULLET_MATERIAL_KEY,
            || create_sphere(1.0, 12, 16),
            Material::CHROME,
        )?;

        self.position = position;
        self.elapsed = 0.0;
        self.pending = 0;
        self.state = SpawnerState::Live(Armed {
            body,
            bullet,
            _census: census.acquire(),
        });
        Ok(())
    }

    #[track_caller]
    fn armed(&self) -> &Armed {
        match &self.state {
            SpawnerState::Live(armed) => armed,
            _ => self.lifecycle().not_live(self.kind()),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Time accumulated toward the next spawn
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Shared body mesh/material, while live
    pub fn body(&self) -> Option<&MeshMaterial> {
        match &self.state {
            SpawnerState::Live(armed) => Some(&armed.body),
            _ => None,
        }
    }

    /// Spawns owed since the last call
    pub fn take_pending(&mut self) -> u32 {
        std::mem::take(&mut self.pending)
    }

    /// Build one initialized projectile at this spawner's position
    pub fn emit(&self, player: Vec3, policy: &SpawnPolicy, params: ProjectileParams) -> Projectile {
        let look = self.armed().bullet.clone();
        let direction = policy.direction(self.position, player);
        let mut projectile = Projectile::new();
        projectile.initialize(self.position, direction, params, look);
        log::debug!(
            "Spawned bullet at {:?} heading {:?}",
            self.position,
            direction
        );
        projectile
    }
}

impl GameObject for Spawner {
    fn kind(&self) -> &'static str {
        "bullet spawner"
    }

    fn lifecycle(&self) -> Lifecycle {
        match self.state {
            SpawnerState::Uninitialized => Lifecycle::Uninitialized,
            SpawnerState::Live(_) => Lifecycle::Initialized,
            SpawnerState::Released => Lifecycle::Released,
        }
    }

    fn tick(&mut self, delta_seconds: f32) {
        self.armed();
        self.elapsed += delta_seconds;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            self.pending += 1;
        }
    }

    fn draw(&self) -> Option<DrawItem> {
        let body = &self.armed().body;
        Some(body.draw(Mat4::from_translation(self.position), true))
    }

    /// Leaves the shared mesh/material in the cache
    fn release(&mut self) {
        self.armed();
        self.state = SpawnerState::Released;
    }
}

impl Drop for Spawner {
    fn drop(&mut self) {
        if self.is_live() {
            self.release();
        }
    }
}

//! Data-driven game balance
//!
//! Loaded from JSON when present; defaults reproduce the stock room with four
//! corner spawners aiming at the player.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{PLAY_HEIGHT, ROOM_HALF_EXTENT, WALL_THICKNESS};
use crate::error::SceneError;

/// How a spawner picks the travel direction of a new projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum SpawnPolicy {
    /// Aim at the player's position at spawn time
    #[default]
    AimAtPlayer,
    /// Always fire along a fixed direction
    Fixed { direction: Vec3 },
}

impl SpawnPolicy {
    /// Unit travel direction for a projectile leaving `origin`
    ///
    /// Degenerate aims (player exactly on the spawner, zero fixed vector) fall
    /// back to heading for the room center, then to -Z.
    pub fn direction(&self, origin: Vec3, player: Vec3) -> Vec3 {
        let wanted = match self {
            SpawnPolicy::AimAtPlayer => player - origin,
            SpawnPolicy::Fixed { direction } => *direction,
        };
        wanted
            .try_normalize()
            .or_else(|| Vec3::new(-origin.x, 0.0, -origin.z).try_normalize())
            .unwrap_or(Vec3::NEG_Z)
    }
}

/// Projectile constants handed from spawner to projectile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileParams {
    pub speed: f32,
    pub max_distance: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Seconds between projectiles from one spawner
    pub spawn_interval: f32,
    pub spawn_policy: SpawnPolicy,
    /// Spawner world positions
    pub spawners: Vec<Vec3>,

    pub projectile_speed: f32,
    pub projectile_max_distance: f32,
    pub projectile_radius: f32,

    pub player_start: Vec3,
    pub player_speed: f32,
    pub player_radius: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        let corner = ROOM_HALF_EXTENT - 2.0;
        Self {
            spawn_interval: 1.5,
            spawn_policy: SpawnPolicy::AimAtPlayer,
            spawners: vec![
                Vec3::new(-corner, PLAY_HEIGHT, -corner),
                Vec3::new(corner, PLAY_HEIGHT, -corner),
                Vec3::new(-corner, PLAY_HEIGHT, corner),
                Vec3::new(corner, PLAY_HEIGHT, corner),
            ],
            projectile_speed: 6.0,
            projectile_max_distance: 30.0,
            projectile_radius: 0.2,
            player_start: Vec3::new(0.0, PLAY_HEIGHT, 0.0),
            player_speed: 5.0,
            player_radius: 0.5,
        }
    }
}

impl Tuning {
    pub fn projectile_params(&self) -> ProjectileParams {
        ProjectileParams {
            speed: self.projectile_speed,
            max_distance: self.projectile_max_distance,
            radius: self.projectile_radius,
        }
    }

    /// Furthest the player center may go from the room center on X/Z
    pub fn player_limit(&self) -> f32 {
        (ROOM_HALF_EXTENT - WALL_THICKNESS / 2.0 - self.player_radius).max(0.0)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SceneError> {
        let positive = [
            ("spawn_interval", self.spawn_interval),
            ("projectile_speed", self.projectile_speed),
            ("projectile_max_distance", self.projectile_max_distance),
            ("projectile_radius", self.projectile_radius),
            ("player_speed", self.player_speed),
            ("player_radius", self.player_radius),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SceneError::InvalidTuning(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.spawners.is_empty() {
            return Err(SceneError::InvalidTuning("no spawners".to_string()));
        }
        Ok(())
    }

    /// Parse from JSON, keeping defaults for missing fields
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Bad tuning file {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default tuning");
                Self::default()
            }
        }
    }
}

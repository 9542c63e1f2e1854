//! Dodge Room - A shadow-mapped 3D room where the player dodges projectiles
//!
//! Core modules:
//! - `sim`: GPU-free game objects (spheres, lifecycle, player, spawners, projectiles)
//! - `scene`: Per-frame orchestrator (update, collision, sweep, frame description)
//! - `renderer`: WebGPU pipeline (depth pass, lit pass, post effect)
//! - `resources`: Name-keyed cache for shared meshes and materials
//! - `tuning`: Data-driven game balance

pub mod camera;
pub mod demo;
pub mod error;
pub mod material;
pub mod mesh;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use error::{RenderError, ResourceError, SceneError};
pub use resources::ResourceCache;
pub use scene::{Frame, FrameRenderer, Scene, ScenePhase};
pub use settings::{PostEffectKind, Settings};
pub use tuning::{SpawnPolicy, Tuning};

/// Game configuration constants
pub mod consts {
    /// Largest frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Room footprint is [-ROOM_HALF_EXTENT, ROOM_HALF_EXTENT] on X and Z
    pub const ROOM_HALF_EXTENT: f32 = 10.0;
    pub const WALL_HEIGHT: f32 = 3.0;
    pub const WALL_THICKNESS: f32 = 0.5;
    pub const FLOOR_THICKNESS: f32 = 0.2;

    /// Square shadow map resolution (fixed for the scene lifetime)
    pub const SHADOW_WIDTH: u32 = 1024;

    /// Spawner body: a short cylinder
    pub const SPAWNER_MESH_RADIUS: f32 = 0.25;
    pub const SPAWNER_MESH_HEIGHT: f32 = 1.0;
    pub const SPAWNER_MESH_SEGMENTS: u32 = 40;

    /// Height at which spawners sit and the player moves
    pub const PLAY_HEIGHT: f32 = 0.5;

    /// Static light hangs above one corner of the room
    pub const LIGHT_POSITION: [f32; 3] = [4.0, 12.0, 4.0];
    pub const LIGHT_GIZMO_RADIUS: f32 = 0.25;

    /// Well-known resource cache keys
    pub const SPAWNER_MESH_KEY: &str = "BulletSpawnerMesh";
    pub const SPAWNER_MATERIAL_KEY: &str = "BulletSpawnerMaterial";
    pub const BULLET_MESH_KEY: &str = "BulletMesh";
    pub const BULLET_MATERIAL_KEY: &str = "BulletMaterial";
    pub const PLAYER_MESH_KEY: &str = "PlayerMesh";
    pub const PLAYER_MATERIAL_KEY: &str = "PlayerMaterial";
    pub const FLOOR_MESH_KEY: &str = "FloorMesh";
    pub const FLOOR_MATERIAL_KEY: &str = "FloorMaterial";
    pub const WALL_X_MESH_KEY: &str = "WallMeshX";
    pub const WALL_Z_MESH_KEY: &str = "WallMeshZ";
    pub const WALL_MATERIAL_KEY: &str = "WallMaterial";
    pub const LIGHT_MESH_KEY: &str = "LightMesh";
    pub const LIGHT_MATERIAL_KEY: &str = "LightMaterial";
}

//! Scene orchestrator
//!
//! Owns every object in the room and drives one frame at a time:
//! update, collision, removal sweep, then hands a `Frame` description to a
//! `FrameRenderer` for the depth, lit and post-effect passes.
//!
//! Phases run Loading -> Running -> Done. The only way into Done is a
//! projectile touching the player; the flag recording that is never reset.

use glam::{Mat4, Vec3};

use crate::camera::MovableCamera;
use crate::consts::*;
use crate::error::SceneError;
use crate::renderer::vertex::OverlayVertex;
use crate::resources::ResourceCache;
use crate::sim::{
    DrawItem, GameObject, LiveCount, Lifecycle, Player, Projectile, PropKind, Spawner,
    StaticLight, StaticProp, TickInput,
};
use crate::tuning::Tuning;
use crate::ui::UiBoard;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePhase {
    Loading,
    Running,
    Done,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
    pub light_view_projection: Mat4,
    pub light_position: Vec3,
    pub light_color: Vec3,
    /// Lit pass draws, in slot order then projectiles
    pub draws: Vec<DrawItem>,
    /// UI board triangles, drawn last in the lit pass
    pub overlay: Vec<OverlayVertex>,
}

impl Frame {
    /// Draws that go into the depth pass
    pub fn shadow_casters(&self) -> impl Iterator<Item = &DrawItem> {
        self.draws.iter().filter(|d| d.casts_shadow)
    }
}

/// Render seam between the scene and the GPU
pub trait FrameRenderer {
    type Error;

    /// Depth pass, lit pass (+ overlay), post-effect blit and present
    fn render_frame(&mut self, frame: &Frame, cache: &ResourceCache) -> Result<(), Self::Error>;
}

/// Evict expired, collided and out-of-bounds projectiles in one pass,
/// releasing each evicted one. Returns how many were removed.
pub fn sweep_projectiles(projectiles: &mut Vec<Projectile>, half_extent: f32) -> usize {
    let before = projectiles.len();
    *projectiles = std::mem::take(projectiles)
        .into_iter()
        .filter_map(|mut projectile| {
            if projectile.should_evict(half_extent) {
                projectile.release();
                None
            } else {
                Some(projectile)
            }
        })
        .collect();
    before - projectiles.len()
}

pub struct Scene {
    phase: ScenePhase,
    lifecycle: Lifecycle,
    tuning: Tuning,

    player: Player,
    light: StaticLight,
    props: [StaticProp; 5],
    spawners: Vec<Spawner>,
    projectiles: Vec<Projectile>,
    board: UiBoard,
    camera: MovableCamera,

    /// Terminal: set on the first player hit, never cleared
    collided_with_player: bool,
    live_spawners: LiveCount,
    projectiles_spawned: u64,
    projectiles_evicted: u64,
    elapsed: f32,
}

impl Scene {
    pub fn new(tuning: Tuning, aspect: f32) -> Self {
        Self {
            phase: ScenePhase::Loading,
            lifecycle: Lifecycle::Uninitialized,
            tuning,
            player: Player::new(),
            light: StaticLight::new(),
            props: PropKind::ALL.map(StaticProp::new),
            spawners: Vec::new(),
            projectiles: Vec::new(),
            board: UiBoard::new(),
            camera: MovableCamera::new(aspect),
            collided_with_player: false,
            live_spawners: LiveCount::new(),
            projectiles_spawned: 0,
            projectiles_evicted: 0,
            elapsed: 0.0,
        }
    }

    /// Build every object, resolving shared meshes and materials through
    /// `cache`, then start running. Loading twice panics.
    ///
    /// Objects are built off to the side and only installed once all of
    /// them succeed, so a failed load leaves the scene untouched.
    pub fn load(&mut self, cache: &mut ResourceCache) -> Result<(), SceneError> {
        let mut lifecycle = self.lifecycle;
        lifecycle.initialize("scene");
        self.tuning.validate()?;

        let tuning = &self.tuning;
        let mut player = Player::new();
        player.initialize(
            tuning.player_start,
            tuning.player_radius,
            tuning.player_speed,
            tuning.player_limit(),
            cache,
        )?;
        let mut props = PropKind::ALL.map(StaticProp::new);
        for prop in &mut props {
            prop.initialize(cache)?;
        }
        let mut light = StaticLight::new();
        light.initialize(Vec3::from_array(LIGHT_POSITION), Vec3::ONE, cache)?;
        let mut spawners = Vec::with_capacity(tuning.spawners.len());
        for &position in &tuning.spawners {
            let mut spawner = Spawner::new(tuning.spawn_interval);
            spawner.initialize(position, cache, &self.live_spawners)?;
            spawners.push(spawner);
        }

        self.player = player;
        self.props = props;
        self.light = light;
        self.spawners = spawners;
        self.board.initialize(self.camera.aspect());
        self.camera.follow(self.player.position());
        self.lifecycle = lifecycle;

        self.phase = ScenePhase::Running;
        log::info!(
            "Scene loaded: {} spawners, {} cached resources",
            self.live_spawners.get(),
            cache.len()
        );
        Ok(())
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.camera.set_aspect(aspect);
        self.board.set_aspect(aspect);
    }

    /// Advance the simulation one frame. Does nothing unless running.
    pub fn update(&mut self, delta_seconds: f32, input: &TickInput) {
        if self.phase != ScenePhase::Running {
            return;
        }
        let dt = delta_seconds.clamp(0.0, MAX_FRAME_DT);
        self.elapsed += dt;

        // Update
        self.player.set_input(input);
        self.player.tick(dt);
        for prop in &mut self.props {
            prop.tick(dt);
        }
        self.light.tick(dt);
        self.board.tick(dt);

        let player_position = self.player.position();
        let params = self.tuning.projectile_params();
        for spawner in &mut self.spawners {
            spawner.tick(dt);
            for _ in 0..spawner.take_pending() {
                let projectile = spawner.emit(player_position, &self.tuning.spawn_policy, params);
                self.projectiles.push(projectile);
                self.projectiles_spawned += 1;
            }
        }
        for projectile in &mut self.projectiles {
            projectile.tick(dt);
        }
        self.camera.follow(player_position);

        // Collision
        let player_sphere = *self.player.sphere();
        let mut hit = false;
        for projectile in &mut self.projectiles {
            if projectile.sphere().intersects(&player_sphere) {
                projectile.mark_collided();
                hit = true;
            }
        }
        if hit && !self.collided_with_player {
            self.collided_with_player = true;
            self.phase = ScenePhase::Done;
            log::info!(
                "Player hit after {:.2}s, {} projectiles spawned",
                self.elapsed,
                self.projectiles_spawned
            );
        }

        // Removal
        let evicted = sweep_projectiles(&mut self.projectiles, ROOM_HALF_EXTENT);
        if evicted > 0 {
            self.projectiles_evicted += evicted as u64;
            log::debug!(
                "Swept {} projectiles, {} still live",
                evicted,
                self.projectiles.len()
            );
        }

        self.board
            .set_status(self.projectiles.len(), self.collided_with_player);
    }

    /// Describe the current state for the render passes
    pub fn frame(&self) -> Frame {
        assert!(
            self.lifecycle.is_live(),
            "scene must be loaded and not released to build a frame"
        );
        let mut draws = Vec::with_capacity(
            1 + self.props.len() + 1 + self.spawners.len() + self.projectiles.len(),
        );
        draws.extend(self.player.draw());
        draws.extend(self.props.iter().filter_map(|p| p.draw()));
        draws.extend(self.light.draw());
        draws.extend(self.spawners.iter().filter_map(|s| s.draw()));
        draws.extend(self.projectiles.iter().filter_map(|p| p.draw()));

        Frame {
            view: self.camera.view(),
            projection: self.camera.projection(),
            camera_position: self.camera.eye(),
            light_view_projection: self.light.view_projection(),
            light_position: self.light.position(),
            light_color: self.light.color(),
            draws,
            overlay: self.board.overlay_vertices(),
        }
    }

    /// One full frame: update then render
    pub fn tick<R: FrameRenderer>(
        &mut self,
        delta_seconds: f32,
        input: &TickInput,
        cache: &ResourceCache,
        renderer: &mut R,
    ) -> Result<(), R::Error> {
        self.update(delta_seconds, input);
        renderer.render_frame(&self.frame(), cache)
    }

    /// Tear down every object, in reverse of load order
    pub fn release(&mut self) {
        self.lifecycle.release("scene");
        self.board.release();
        for mut projectile in self.projectiles.drain(..).rev() {
            projectile.release();
        }
        for mut spawner in self.spawners.drain(..).rev() {
            spawner.release();
        }
        self.light.release();
        for prop in self.props.iter_mut().rev() {
            prop.release();
        }
        self.player.release();
        if self.phase == ScenePhase::Running {
            self.phase = ScenePhase::Done;
        }
        log::info!(
            "Scene released after {:.2}s ({} spawned, {} evicted)",
            self.elapsed,
            self.projectiles_spawned,
            self.projectiles_evicted
        );
    }

    pub fn phase(&self) -> ScenePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == ScenePhase::Running
    }

    pub fn collided_with_player(&self) -> bool {
        self.collided_with_player
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn spawners(&self) -> &[Spawner] {
        &self.spawners
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn board(&self) -> &UiBoard {
        &self.board
    }

    pub fn live_spawners(&self) -> usize {
        self.live_spawners.get()
    }

    pub fn projectiles_spawned(&self) -> u64 {
        self.projectiles_spawned
    }

    pub fn projectiles_evicted(&self) -> u64 {
        self.projectiles_evicted
    }

    /// Simulated seconds while running
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResourceError;
    use crate::material::Material;
    use crate::mesh::create_sphere;
    use crate::sim::MeshMaterial;
    use crate::tuning::ProjectileParams;

    fn bullet(cache: &mut ResourceCache, origin: Vec3, speed: f32, max_distance: f32) -> Projectile {
        let look = MeshMaterial::resolve(
            cache,
            BULLET_MESH_KEY,
            BULLET_MATERIAL_KEY,
            || create_sphere(1.0, 4, 4),
            Material::CHROME,
        )
        .unwrap();
        let mut projectile = Projectile::new();
        projectile.initialize(
            origin,
            Vec3::X,
            ProjectileParams {
                speed,
                max_distance,
                radius: 0.2,
            },
            look,
        );
        projectile
    }

    #[test]
    fn test_sweep_keeps_only_live() {
        let mut cache = ResourceCache::new();
        let mut expired = bullet(&mut cache, Vec3::ZERO, 5.0, 1.0);
        expired.tick(1.0);
        let mut collided = bullet(&mut cache, Vec3::ZERO, 1.0, 10.0);
        collided.mark_collided();
        let live = bullet(&mut cache, Vec3::new(-2.0, 0.0, 1.0), 1.0, 10.0);

        let mut projectiles = vec![expired, collided, live];
        assert_eq!(sweep_projectiles(&mut projectiles, ROOM_HALF_EXTENT), 2);
        assert_eq!(projectiles.len(), 1);
        assert!(projectiles[0].is_live());
        assert!((projectiles[0].position().x + 2.0).abs() < 0.001);
    }

    #[test]
    fn test_sweep_evicts_out_of_bounds() {
        let mut cache = ResourceCache::new();
        let outside = bullet(&mut cache, Vec3::new(ROOM_HALF_EXTENT + 1.0, 0.0, 0.0), 1.0, 100.0);
        let mut projectiles = vec![outside];
        assert_eq!(sweep_projectiles(&mut projectiles, ROOM_HALF_EXTENT), 1);
        assert!(projectiles.is_empty());
    }

    #[test]
    fn test_load_runs_and_counts_spawners() {
        let mut cache = ResourceCache::new();
        let mut scene = Scene::new(Tuning::default(), 16.0 / 9.0);
        assert_eq!(scene.phase(), ScenePhase::Loading);
        scene.load(&mut cache).unwrap();
        assert_eq!(scene.phase(), ScenePhase::Running);
        assert_eq!(scene.live_spawners(), 4);
        assert!((scene.board().aspect() - 16.0 / 9.0).abs() < 0.001);

        scene.release();
        assert_eq!(scene.live_spawners(), 0);
        assert_eq!(scene.phase(), ScenePhase::Done);
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let mut cache = ResourceCache::new();
        let tuning = Tuning {
            spawn_interval: 0.0,
            ..Default::default()
        };
        let mut scene = Scene::new(tuning, 1.0);
        assert!(matches!(
            scene.load(&mut cache),
            Err(SceneError::InvalidTuning(_))
        ));
        assert_eq!(scene.phase(), ScenePhase::Loading);
    }

    #[test]
    fn test_failed_load_leaves_scene_untouched() {
        let mut bad_cache = ResourceCache::new();
        // Wrong type under the spawner mesh key fails after player, props and light
        bad_cache.create(SPAWNER_MESH_KEY, 7u32).unwrap();
        let mut scene = Scene::new(Tuning::default(), 1.0);
        assert!(matches!(
            scene.load(&mut bad_cache),
            Err(SceneError::Resource(ResourceError::TypeMismatch { .. }))
        ));
        assert_eq!(scene.phase(), ScenePhase::Loading);
        assert_eq!(scene.live_spawners(), 0);
        assert!(!scene.player().is_live());

        // Nothing was half-installed, so a retry succeeds and releases cleanly
        let mut cache = ResourceCache::new();
        scene.load(&mut cache).unwrap();
        assert_eq!(scene.phase(), ScenePhase::Running);
        assert_eq!(scene.live_spawners(), 4);
        scene.release();
    }

    #[test]
    fn test_release_mid_volley_drops_every_handle() {
        let mut cache = ResourceCache::new();
        let tuning = Tuning {
            spawn_interval: 0.05,
            ..Default::default()
        };
        let mut scene = Scene::new(tuning, 1.0);
        scene.load(&mut cache).unwrap();
        for _ in 0..5 {
            scene.update(0.05, &TickInput::default());
        }
        assert!(!scene.projectiles().is_empty());

        scene.release();
        assert!(scene.projectiles().is_empty());
        assert!(scene.spawners().is_empty());
        assert_eq!(scene.live_spawners(), 0);
        // Only the cache still holds the shared bullet and spawner meshes
        let bullet = cache.get::<crate::mesh::MeshData>(BULLET_MESH_KEY).unwrap();
        let body = cache.get::<crate::mesh::MeshData>(SPAWNER_MESH_KEY).unwrap();
        assert_eq!(std::rc::Rc::strong_count(&bullet), 2);
        assert_eq!(std::rc::Rc::strong_count(&body), 2);
    }

    #[test]
    #[should_panic(expected = "already initialized")]
    fn test_double_load_panics() {
        let mut cache = ResourceCache::new();
        let mut scene = Scene::new(Tuning::default(), 1.0);
        scene.load(&mut cache).unwrap();
        let _ = scene.load(&mut cache);
    }

    #[test]
    fn test_update_ignored_while_loading() {
        let mut scene = Scene::new(Tuning::default(), 1.0);
        scene.update(0.05, &TickInput::default());
        assert_eq!(scene.elapsed(), 0.0);
        assert!(scene.projectiles().is_empty());
    }

    #[test]
    fn test_frame_delta_clamped() {
        let mut cache = ResourceCache::new();
        let mut scene = Scene::new(Tuning::default(), 1.0);
        scene.load(&mut cache).unwrap();
        scene.update(5.0, &TickInput::default());
        assert!((scene.elapsed() - MAX_FRAME_DT).abs() < 0.0001);
    }
}

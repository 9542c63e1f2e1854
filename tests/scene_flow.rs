//! Scene flow driven through a recording renderer (no GPU)

use std::convert::Infallible;
use std::rc::Rc;

use glam::Vec3;

use dodge_room::consts::*;
use dodge_room::mesh::MeshData;
use dodge_room::sim::TickInput;
use dodge_room::{Frame, FrameRenderer, ResourceCache, Scene, ScenePhase, Tuning};

/// Power-of-two step so positions stay exact
const DT: f32 = 0.0625;

#[derive(Default)]
struct Recorder {
    frames: Vec<Frame>,
}

impl FrameRenderer for Recorder {
    type Error = Infallible;

    fn render_frame(&mut self, frame: &Frame, _cache: &ResourceCache) -> Result<(), Infallible> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

/// One spawner three units east of a stationary player
fn head_on_tuning() -> Tuning {
    Tuning {
        spawn_interval: 1.0,
        spawners: vec![Vec3::new(3.0, PLAY_HEIGHT, 0.0)],
        projectile_speed: 1.0,
        projectile_max_distance: 30.0,
        projectile_radius: 0.25,
        player_start: Vec3::new(0.0, PLAY_HEIGHT, 0.0),
        player_radius: 0.5,
        ..Default::default()
    }
}

fn loaded(tuning: Tuning, cache: &mut ResourceCache) -> Scene {
    let mut scene = Scene::new(tuning, 16.0 / 9.0);
    scene.load(cache).unwrap();
    scene
}

#[test]
fn collision_flag_flips_on_exact_tick_and_stays() {
    let mut cache = ResourceCache::new();
    let mut scene = loaded(head_on_tuning(), &mut cache);
    let mut recorder = Recorder::default();
    let idle = TickInput::default();

    // Spawn at tick 16, then 36 steps of 1/16 cover the 2.25 gap
    for tick in 1..=50 {
        scene.tick(DT, &idle, &cache, &mut recorder).unwrap();
        assert!(!scene.collided_with_player(), "early hit on tick {tick}");
        assert_eq!(scene.phase(), ScenePhase::Running);
    }
    assert_eq!(scene.projectiles_spawned(), 3);

    scene.tick(DT, &idle, &cache, &mut recorder).unwrap();
    assert!(scene.collided_with_player());
    assert_eq!(scene.phase(), ScenePhase::Done);
    assert_eq!(scene.projectiles_evicted(), 1);
    assert_eq!(scene.projectiles().len(), 2);

    // Terminal: further ticks change nothing but still render
    let elapsed = scene.elapsed();
    for _ in 0..10 {
        scene.tick(DT, &idle, &cache, &mut recorder).unwrap();
        assert!(scene.collided_with_player());
    }
    assert_eq!(scene.phase(), ScenePhase::Done);
    assert_eq!(scene.elapsed(), elapsed);
    assert_eq!(recorder.frames.len(), 61);

    scene.release();
}

#[test]
fn first_projectile_spawns_on_interval() {
    let mut cache = ResourceCache::new();
    let mut scene = loaded(head_on_tuning(), &mut cache);
    let idle = TickInput::default();

    for _ in 0..15 {
        scene.update(DT, &idle);
    }
    assert!(scene.projectiles().is_empty());
    scene.update(DT, &idle);
    assert_eq!(scene.projectiles().len(), 1);

    // Advanced in its spawn frame, heading at the player
    let projectile = &scene.projectiles()[0];
    assert!((projectile.position().x - (3.0 - DT)).abs() < 1e-6);
    assert!((projectile.direction() - Vec3::NEG_X).length() < 1e-6);
}

#[test]
fn frame_lists_every_renderable_and_excludes_board_from_depth() {
    let mut cache = ResourceCache::new();
    let mut scene = loaded(head_on_tuning(), &mut cache);
    for _ in 0..16 {
        scene.update(DT, &TickInput::default());
    }

    let frame = scene.frame();
    // player + floor + 4 walls + light + spawner + projectile
    assert_eq!(frame.draws.len(), 9);
    assert_eq!(frame.shadow_casters().count(), 9);
    assert!(frame.draws.iter().all(|d| cache.contains(d.mesh)));
    assert!(!frame.overlay.is_empty());
    assert_eq!(frame.draws[0].mesh, PLAYER_MESH_KEY);
    assert_eq!(frame.draws[8].mesh, BULLET_MESH_KEY);
}

#[test]
fn spawners_share_cached_resources() {
    let mut single_cache = ResourceCache::new();
    let single = loaded(head_on_tuning(), &mut single_cache);

    let mut cache = ResourceCache::new();
    let tuning = Tuning {
        spawners: vec![
            Vec3::new(3.0, PLAY_HEIGHT, 0.0),
            Vec3::new(-3.0, PLAY_HEIGHT, 0.0),
        ],
        ..head_on_tuning()
    };
    let scene = loaded(tuning, &mut cache);

    let a = scene.spawners()[0].body().unwrap();
    let b = scene.spawners()[1].body().unwrap();
    assert!(Rc::ptr_eq(&a.mesh, &b.mesh));
    assert!(Rc::ptr_eq(&a.material, &b.material));
    let cached = cache.get::<MeshData>(SPAWNER_MESH_KEY).unwrap();
    assert!(Rc::ptr_eq(&a.mesh, &cached));

    // A second spawner constructs nothing new
    assert_eq!(cache.created(), single_cache.created());
    assert_eq!(scene.live_spawners(), 2);
    assert_eq!(single.live_spawners(), 1);
}

#[test]
fn dense_volleys_keep_rendering() {
    let mut cache = ResourceCache::new();
    let tuning = Tuning {
        spawn_interval: 0.01,
        projectile_speed: 0.1,
        projectile_radius: 0.1,
        player_start: Vec3::new(-8.0, PLAY_HEIGHT, 8.0),
        ..head_on_tuning()
    };
    let mut scene = loaded(tuning, &mut cache);
    let mut recorder = Recorder::default();

    for _ in 0..40 {
        scene.tick(0.1, &TickInput::default(), &cache, &mut recorder).unwrap();
    }
    assert_eq!(scene.phase(), ScenePhase::Running);
    assert_eq!(recorder.frames.len(), 40);
    let last = recorder.frames.last().unwrap();
    assert!(last.draws.len() > 300, "only {} draws", last.draws.len());
    assert_eq!(last.draws.len(), 8 + scene.projectiles().len());
}

#[test]
fn expired_projectiles_are_swept() {
    let mut cache = ResourceCache::new();
    let tuning = Tuning {
        projectile_max_distance: 0.5,
        ..head_on_tuning()
    };
    let mut scene = loaded(tuning, &mut cache);
    let idle = TickInput::default();

    for _ in 0..16 {
        scene.update(DT, &idle);
    }
    assert_eq!(scene.projectiles().len(), 1);
    // 0.5 of travel at 1/16 per tick: gone on the 8th step
    for _ in 0..6 {
        scene.update(DT, &idle);
    }
    assert_eq!(scene.projectiles().len(), 1);
    scene.update(DT, &idle);
    assert!(scene.projectiles().is_empty());
    assert_eq!(scene.projectiles_evicted(), 1);
    assert!(!scene.collided_with_player());
}

#[test]
fn release_tears_everything_down() {
    let mut cache = ResourceCache::new();
    let mut scene = loaded(Tuning::default(), &mut cache);
    for _ in 0..100 {
        scene.update(0.05, &TickInput::new(1.0, 0.0));
    }
    assert_eq!(scene.live_spawners(), 4);

    scene.release();
    assert_eq!(scene.live_spawners(), 0);
    assert!(scene.spawners().is_empty());
    assert!(scene.projectiles().is_empty());
    // Shared resources outlive the scene
    assert!(cache.contains(SPAWNER_MESH_KEY));
}

#[test]
#[should_panic(expected = "already been released")]
fn release_twice_panics() {
    let mut cache = ResourceCache::new();
    let mut scene = loaded(Tuning::default(), &mut cache);
    scene.release();
    scene.release();
}

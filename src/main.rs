//! Dodge Room entry point
//!
//! Web: canvas + WebGPU with keyboard input and a requestAnimationFrame loop.
//! Native: a headless autopilot session that runs the full scene update and
//! frame description without a window.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use dodge_room::demo::DemoPilot;
    use dodge_room::renderer::ScenePipeline;
    use dodge_room::sim::TickInput;
    use dodge_room::{
        PostEffectKind, RenderError, ResourceCache, Scene, ScenePhase, Settings, Tuning,
    };

    /// Held movement keys
    #[derive(Default)]
    struct Keys {
        left: bool,
        right: bool,
        up: bool,
        down: bool,
    }

    impl Keys {
        fn set(&mut self, key: &str, down: bool) {
            match key {
                "a" | "A" | "ArrowLeft" => self.left = down,
                "d" | "D" | "ArrowRight" => self.right = down,
                "w" | "W" | "ArrowUp" => self.up = down,
                "s" | "S" | "ArrowDown" => self.down = down,
                _ => {}
            }
        }

        fn input(&self) -> TickInput {
            let axis = |neg: bool, pos: bool| (pos as i32 - neg as i32) as f32;
            TickInput::new(axis(self.left, self.right), axis(self.up, self.down))
        }
    }

    /// Game instance holding all state
    struct Game {
        scene: Scene,
        cache: ResourceCache,
        renderer: Option<ScenePipeline>,
        tuning: Tuning,
        keys: Keys,
        pilot: Option<DemoPilot>,
        last_time: f64,
    }

    impl Game {
        fn new(tuning: Tuning, aspect: f32) -> Result<Self, dodge_room::SceneError> {
            let mut cache = ResourceCache::new();
            let mut scene = Scene::new(tuning.clone(), aspect);
            scene.load(&mut cache)?;
            Ok(Self {
                scene,
                cache,
                renderer: None,
                tuning,
                keys: Keys::default(),
                pilot: None,
                last_time: 0.0,
            })
        }

        fn restart(&mut self) {
            let aspect = self
                .renderer
                .as_ref()
                .map(|r| r.aspect())
                .unwrap_or(16.0 / 9.0);
            let mut scene = Scene::new(self.tuning.clone(), aspect);
            match scene.load(&mut self.cache) {
                Ok(()) => {
                    std::mem::replace(&mut self.scene, scene).release();
                    log::info!("Restarted");
                }
                Err(e) => log::error!("Restart failed: {}", e),
            }
        }

        /// Switch to the next post effect and remember it
        fn cycle_post_effect(&mut self) {
            if let Some(renderer) = self.renderer.as_mut() {
                let kind = renderer.settings().post_effect.next();
                renderer.set_post_effect(kind);
                renderer.settings().save();
            }
        }

        /// Track a canvas size change
        fn resize(&mut self, width: u32, height: u32) {
            if let Some(renderer) = self.renderer.as_mut() {
                renderer.resize(width, height);
                self.scene.set_aspect(renderer.aspect());
            }
        }

        /// Update and render one frame
        fn frame(&mut self, dt: f32) {
            let input = match self.pilot.as_mut() {
                Some(pilot) => pilot.steer(
                    dt,
                    self.scene.player().position(),
                    self.scene.projectiles(),
                ),
                None => self.keys.input(),
            };
            let Some(renderer) = self.renderer.as_mut() else {
                self.scene.update(dt, &input);
                return;
            };
            match self.scene.tick(dt, &input, &self.cache, renderer) {
                Ok(()) => {}
                Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {}", e),
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Dodge Room starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (width, height) = fit_canvas(&canvas);

        let mut settings = Settings::load();
        let query = window.location().search().unwrap_or_default();
        if let Some(effect) = PostEffectKind::from_query(&query) {
            settings.post_effect = effect;
        }
        let game = match Game::new(Tuning::default(), width as f32 / height as f32) {
            Ok(game) => Rc::new(RefCell::new(game)),
            Err(e) => {
                log::error!("Scene failed to load: {}", e);
                return;
            }
        };

        match create_renderer(canvas.clone(), width, height, settings).await {
            Ok(renderer) => game.borrow_mut().renderer = Some(renderer),
            Err(e) => {
                log::error!("WebGPU setup failed: {}", e);
                return;
            }
        }

        setup_input_handlers(&canvas, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Dodge Room running!");
    }

    /// Match the canvas backing store to its CSS size
    fn fit_canvas(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    async fn create_renderer(
        canvas: HtmlCanvasElement,
        width: u32,
        height: u32,
        settings: Settings,
    ) -> Result<ScenePipeline, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        ScenePipeline::new(surface, &adapter, width, height, settings).await
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Window resize
        {
            let game = game.clone();
            let canvas = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let (width, height) = fit_canvas(&canvas);
                game.borrow_mut().resize(width, height);
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                match key.as_str() {
                    "Enter" | "r" | "R" if g.scene.phase() == ScenePhase::Done => g.restart(),
                    "p" | "P" => g.cycle_post_effect(),
                    "i" | "I" => {
                        g.pilot = match g.pilot {
                            Some(_) => None,
                            None => Some(DemoPilot::new(js_sys::Date::now() as u64)),
                        };
                        log::info!("Idle mode: {}", g.pilot.is_some());
                    }
                    _ => g.keys.set(&key, true),
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().keys.set(&event.key(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.frame(dt);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::convert::Infallible;
    use std::path::PathBuf;

    use dodge_room::demo::DemoPilot;
    use dodge_room::{Frame, FrameRenderer, PostEffectKind, ResourceCache, Scene, Settings, Tuning};

    /// Simulated frame rate
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Session cap in simulated seconds
    const MAX_SECONDS: f32 = 300.0;

    /// Stands in for the GPU: checks every draw resolves and keeps totals
    #[derive(Default)]
    struct FrameStats {
        frames: u64,
        draws: u64,
        shadow_draws: u64,
        most_draws: usize,
    }

    impl FrameRenderer for FrameStats {
        type Error = Infallible;

        fn render_frame(&mut self, frame: &Frame, cache: &ResourceCache) -> Result<(), Infallible> {
            for draw in &frame.draws {
                debug_assert!(cache.contains(draw.mesh), "unknown mesh {}", draw.mesh);
            }
            self.frames += 1;
            self.draws += frame.draws.len() as u64;
            self.shadow_draws += frame.shadow_casters().count() as u64;
            self.most_draws = self.most_draws.max(frame.draws.len());
            Ok(())
        }
    }

    /// Usage: dodge-room [seed] [tuning.json] [settings.json] [effect]
    ///
    /// A named effect overrides the settings file and is written back to it.
    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let mut args = std::env::args().skip(1);
        let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
        let tuning = args
            .next()
            .map(|p| Tuning::load(&PathBuf::from(p)))
            .unwrap_or_default();
        let settings_path = args.next().map(PathBuf::from);
        let mut settings = settings_path
            .as_deref()
            .map(Settings::load_from)
            .unwrap_or_default();
        if let Some(name) = args.next() {
            let effect = PostEffectKind::from_str(&name)
                .ok_or_else(|| format!("unknown post effect `{}`", name))?;
            settings.post_effect = effect;
            if let Some(path) = &settings_path {
                settings.save_to(path)?;
            }
        }
        log::info!(
            "Headless session: seed {}, post effect {}",
            seed,
            settings.post_effect.as_str()
        );

        let mut cache = ResourceCache::new();
        let mut scene = Scene::new(tuning, 16.0 / 9.0);
        scene.load(&mut cache)?;

        let mut pilot = DemoPilot::new(seed);
        let mut stats = FrameStats::default();
        while scene.is_running() && scene.elapsed() < MAX_SECONDS {
            let input = pilot.steer(
                FRAME_DT,
                scene.player().position(),
                scene.projectiles(),
            );
            let Ok(()) = scene.tick(FRAME_DT, &input, &cache, &mut stats);
        }

        println!(
            "Survived {:.2}s{}",
            scene.elapsed(),
            if scene.collided_with_player() {
                ""
            } else {
                " (time limit)"
            }
        );
        println!(
            "{} frames, {} draws ({} into the shadow map), peak {} per frame",
            stats.frames, stats.draws, stats.shadow_draws, stats.most_draws
        );
        println!(
            "{} projectiles spawned, {} evicted, {} resources cached",
            scene.projectiles_spawned(),
            scene.projectiles_evicted(),
            cache.len()
        );

        scene.release();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Dodge Room (native) starting...");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

//! Arcade Cabinet entry point
//!
//! Browser: drives the shooter on a 2D canvas and exposes the puzzle cube to
//! the page's 3D renderer. Native: runs a short headless demo of both.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use arcade_cabinet::audio::{Volume, WebAudioSink};
    use arcade_cabinet::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
    use arcade_cabinet::cube::{Camera, CubeEngine, Viewport};
    use arcade_cabinet::persistence::{LocalStorageStore, platform_store};
    use arcade_cabinet::platform::{KeyState, now_ms};
    use arcade_cabinet::shooter::{Color, DrawSurface};
    use arcade_cabinet::{ArcadeSession, Settings};

    /// Canvas 2D context as a shooter draw target
    struct CanvasSurface {
        ctx: CanvasRenderingContext2d,
    }

    impl DrawSurface for CanvasSurface {
        fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
            self.ctx.set_fill_style_str(&color.to_css());
            self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
        }

        fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
            self.ctx.set_fill_style_str(&color.to_css());
            self.ctx.begin_path();
            self.ctx.move_to(a.x as f64, a.y as f64);
            self.ctx.line_to(b.x as f64, b.y as f64);
            self.ctx.line_to(c.x as f64, c.y as f64);
            self.ctx.close_path();
            self.ctx.fill();
        }

        fn fill_text(&mut self, text: &str, x: f32, y: f32, color: Color) {
            self.ctx.set_fill_style_str(&color.to_css());
            let _ = self.ctx.fill_text(text, x as f64, y as f64);
        }

        fn set_alpha(&mut self, alpha: f32) {
            self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
        }

        fn set_glow(&mut self, color: Color, blur: f32) {
            self.ctx.set_shadow_color(&color.to_css());
            self.ctx.set_shadow_blur(blur as f64);
        }
    }

    struct Game {
        session: ArcadeSession<LocalStorageStore, WebAudioSink>,
        keys: KeyState,
        settings: Settings,
        surface: CanvasSurface,
        exit_reported: bool,
    }

    impl Game {
        fn frame(&mut self, time: f64) {
            let input = self.keys.to_tick_input(&self.settings.keys, time);
            self.session.tick(&input);
            self.session.render(&mut self.surface, time);

            if !self.exit_reported && self.session.ready_to_exit(time) {
                self.exit_reported = true;
                notify_game_over(self.session.engine().score());
            }
        }
    }

    /// Tell the page the game is finished
    fn notify_game_over(score: u64) {
        let Some(window) = web_sys::window() else { return };
        match web_sys::CustomEvent::new("arcade-game-over") {
            Ok(event) => {
                log::info!("Returning to cabinet (score {score})");
                if let Err(err) = window.dispatch_event(&event) {
                    log::warn!("Could not signal game over: {err:?}");
                }
            }
            Err(err) => log::warn!("Could not signal game over: {err:?}"),
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game.borrow_mut().frame(time);
            request_animation_frame(game);
        });
        if let Err(err) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed, game loop stopped: {err:?}");
            return;
        }
        closure.forget();
    }

    fn setup_keyboard(game: &Rc<RefCell<Game>>, window: &web_sys::Window) -> Result<(), JsValue> {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let Game { keys, settings, session, .. } = &mut *g;
                if keys.key_down(&event.key(), &settings.keys) {
                    event.prevent_default();
                    session.sound_mut().resume();
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let Game { keys, settings, .. } = &mut *g;
                if keys.key_up(&event.key(), &settings.keys) {
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            // Keys released while unfocused never send keyup
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().keys.release_all();
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(err) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger init failed: {err}").into());
        }

        log::info!("Arcade cabinet starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("shooter-canvas")
            .ok_or_else(|| JsValue::from_str("no #shooter-canvas"))?
            .dyn_into()?;
        canvas.set_width(PLAYFIELD_WIDTH as u32);
        canvas.set_height(PLAYFIELD_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        ctx.set_font("bold 16px monospace");

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let sound = WebAudioSink::new(Volume::from_settings(&settings));
        let session = ArcadeSession::new(seed, platform_store(), sound, &settings);
        log::info!("Game initialized with seed: {seed}");

        let game = Rc::new(RefCell::new(Game {
            session,
            keys: KeyState::new(),
            settings,
            surface: CanvasSurface { ctx },
            exit_reported: false,
        }));

        setup_keyboard(&game, &window)?;
        GAME.with(|slot| *slot.borrow_mut() = Some(game.clone()));
        request_animation_frame(game);
        Ok(())
    }

    thread_local! {
        /// The running shooter, for the page-facing exports below
        static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
    }

    fn with_game(f: impl FnOnce(&mut Game)) {
        GAME.with(|slot| match slot.borrow().as_ref() {
            Some(game) => f(&mut game.borrow_mut()),
            None => log::warn!("Shooter not started"),
        });
    }

    /// On-screen joystick deflection, -1.0 (left) to 1.0 (right)
    #[wasm_bindgen]
    pub fn set_joystick(x: f32) {
        with_game(|g| g.keys.set_joystick(x));
    }

    /// On-screen fire button held or released
    #[wasm_bindgen]
    pub fn set_fire_button(down: bool) {
        with_game(|g| {
            g.keys.set_fire_button(down);
            if down {
                g.session.sound_mut().resume();
            }
        });
    }

    /// Mute toggle from the cabinet UI; remembered across visits
    #[wasm_bindgen]
    pub fn set_muted(muted: bool) {
        with_game(|g| {
            g.settings.muted = muted;
            g.session.sound_mut().volume = Volume::from_settings(&g.settings);
            if let Err(err) = g.settings.save() {
                log::warn!("Failed to save settings: {err}");
            }
        });
    }

    /// New run after game over, picking up settings changed meanwhile
    #[wasm_bindgen]
    pub fn restart() {
        with_game(|g| {
            g.settings = Settings::load();
            g.session.sound_mut().volume = Volume::from_settings(&g.settings);
            g.session.apply_settings(&g.settings);
            g.session.restart(js_sys::Date::now() as u64);
            g.keys.release_all();
            g.exit_reported = false;
        });
    }

    /// Puzzle cube handle for the page's 3D renderer
    #[wasm_bindgen]
    pub struct CubeHandle {
        engine: CubeEngine,
        camera: Camera,
        last_time: f64,
    }

    #[wasm_bindgen]
    impl CubeHandle {
        #[wasm_bindgen(constructor)]
        pub fn new() -> CubeHandle {
            let settings = Settings::load();
            CubeHandle {
                engine: CubeEngine::with_turn_speed(settings.effective_turn_speed()),
                camera: Camera::default(),
                last_time: 0.0,
            }
        }

        /// Camera position as orbited by the page
        pub fn set_camera(&mut self, x: f32, y: f32, z: f32) {
            self.camera.position = glam::Vec3::new(x, y, z);
        }

        /// Pointer click in canvas pixels. Returns true if a turn started.
        pub fn click(&mut self, x: f32, y: f32, width: f32, height: f32) -> bool {
            self.engine
                .click(x, y, &self.camera, Viewport::new(width, height))
                .is_some()
        }

        /// Advance by wall-clock time
        pub fn update(&mut self) {
            let now = now_ms();
            let dt = if self.last_time > 0.0 {
                ((now - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = now;
            self.engine.update(dt.min(0.1));
        }

        pub fn is_turning(&self) -> bool {
            self.engine.is_turning()
        }

        pub fn is_solved(&self) -> bool {
            self.engine.is_solved()
        }

        /// 27 × (translation xyz, rotation xyzw), world space
        pub fn transforms(&self) -> Vec<f32> {
            self.engine
                .world_transforms()
                .flat_map(|t| {
                    let [x, y, z] = t.translation.to_array();
                    let [qx, qy, qz, qw] = t.rotation.to_array();
                    [x, y, z, qx, qy, qz, qw]
                })
                .collect()
        }

        /// Sticker colors per cubelet, six per piece (+X,-X,+Y,-Y,+Z,-Z)
        pub fn face_colors(&self) -> Vec<u32> {
            self.engine
                .cubelets()
                .iter()
                .flat_map(|c| c.faces.0)
                .collect()
        }

        pub fn scramble(&mut self, moves: usize) {
            use rand::SeedableRng;
            let mut rng = rand_pcg::Pcg32::seed_from_u64(js_sys::Date::now() as u64);
            self.engine.scramble(&mut rng, moves);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Arcade cabinet (native) starting...");
    log::info!("Native mode is headless - serve the wasm build for the playable version");

    let settings = arcade_cabinet::Settings::load_from(std::path::Path::new("settings.json"));
    headless::shooter_demo(&settings, 0xA5C4DE);
    headless::cube_demo(&settings, 2024);
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use arcade_cabinet::audio::NullSink;
    use arcade_cabinet::consts::{PLAYER_WIDTH, PLAYER_SPEED};
    use arcade_cabinet::cube::{Camera, CubeEngine, Viewport};
    use arcade_cabinet::persistence::MemoryStore;
    use arcade_cabinet::shooter::{ShooterEvent, ShooterState, TickInput};
    use arcade_cabinet::{ArcadeSession, Settings};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_FRAMES: u64 = 60 * 60 * 5;

    /// Steer under the lowest enemy and keep firing
    fn autopilot(state: &ShooterState, time_ms: f64) -> TickInput {
        let ship_center = state.player.x + PLAYER_WIDTH / 2.0;
        let target = state
            .enemies
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|e| e.bounds().center().x);
        let (left, right) = match target {
            Some(x) if x < ship_center - PLAYER_SPEED => (true, false),
            Some(x) if x > ship_center + PLAYER_SPEED => (false, true),
            _ => (false, false),
        };
        TickInput {
            left,
            right,
            fire: true,
            pause: false,
            time_ms,
        }
    }

    pub fn shooter_demo(settings: &Settings, seed: u64) {
        let mut session = ArcadeSession::new(seed, MemoryStore::default(), NullSink, settings);
        let mut kills = 0u32;
        let mut frame = 0u64;

        while frame < MAX_FRAMES {
            let time_ms = frame as f64 * FRAME_MS;
            let input = autopilot(session.engine().state(), time_ms);
            for event in session.tick(&input) {
                if let ShooterEvent::EnemyDestroyed { .. } = event {
                    kills += 1;
                }
            }
            if session.ready_to_exit(time_ms) {
                break;
            }
            frame += 1;
        }

        println!(
            "Shooter: {} frames, {} kills, score {}, lives {}, best {}",
            frame,
            kills,
            session.engine().score(),
            session.engine().lives(),
            session.high_score().best
        );
    }

    pub fn cube_demo(settings: &Settings, seed: u64) {
        let mut cube = CubeEngine::with_turn_speed(settings.effective_turn_speed());
        let mut rng = Pcg32::seed_from_u64(seed);
        cube.scramble(&mut rng, 20);
        println!("Cube: scrambled 20 moves, solved = {}", cube.is_solved());

        let camera = Camera::default();
        let viewport = Viewport::new(800.0, 600.0);
        // Slightly off-center so the click lands on a face, not a corner edge
        for (x, y) in [(420.0, 250.0), (350.0, 380.0), (460.0, 380.0)] {
            let Some(turn) = cube.click(x, y, &camera, viewport) else {
                println!("Cube: click at ({x}, {y}) did nothing");
                continue;
            };
            let mut frames = 0;
            while cube.update(1.0 / 60.0).is_none() {
                frames += 1;
            }
            println!(
                "Cube: {:?} layer {} direction {} landed after {} frames",
                turn.axis, turn.layer, turn.direction, frames
            );
        }
    }
}

//! Lander entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use lander::renderer::{RenderState, scene_vertices, shapes};
    use lander::sim::{Bounds, FrameLimiter, InputState, TOUCH_EVENTS};
    use lander::world::World;
    use lander::{SceneKind, Settings};

    /// Game instance holding all state
    struct Game {
        world: World,
        settings: Settings,
        input: InputState,
        camera: Bounds,
        limiter: FrameLimiter,
        render_state: Option<RenderState>,
    }

    impl Game {
        fn new(world: World, settings: Settings, aspect: f32) -> Self {
            Self {
                camera: Bounds::look_at(settings.view, aspect),
                limiter: FrameLimiter::new(settings.physics.fps),
                world,
                settings,
                input: InputState::default(),
                render_state: None,
            }
        }

        /// Run at most one tick if the frame interval has passed
        fn update(&mut self, time: f64) {
            if self.limiter.advance(time) {
                self.world
                    .tick(&self.input, &mut self.camera, &self.settings.thrust);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(ref mut render_state) = self.render_state else {
                return;
            };

            let mut vertices = scene_vertices(&self.world.shapes());
            if let Some(out) = &self.world.last_step {
                vertices.extend(shapes::flames(&self.world.ship_pose(), out));
            }

            match render_state.render(&vertices, &self.camera) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        fn resize(&mut self, width: u32, height: u32) {
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height);
            }
            self.camera.fit_height(width as f32, height as f32);
            log::info!("Resized to {}x{}", width, height);
        }
    }

    /// Scene named by `?scene=` in the page URL, if any
    fn scene_from_url(window: &web_sys::Window) -> Option<SceneKind> {
        let search = window.location().search().ok()?;
        search
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "scene")
            .and_then(|(_, value)| SceneKind::from_str(value))
    }

    /// Canvas pixel size: window inner size times device pixel ratio
    fn canvas_pixels(window: &web_sys::Window) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let inner = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let width = (inner(window.inner_width()) * dpr) as u32;
        let height = (inner(window.inner_height()) * dpr) as u32;
        (width.max(1), height.max(1))
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Lander starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let (width, height) = canvas_pixels(&window);
        canvas.set_width(width);
        canvas.set_height(height);

        let mut settings = Settings::load();
        if let Some(scene) = scene_from_url(&window) {
            if scene != settings.scene {
                settings.scene = scene;
                settings.save();
            }
        }

        let seed = settings
            .terrain_seed
            .unwrap_or_else(|| js_sys::Date::now() as u64);
        log::info!("Scene {} with seed {}", settings.scene.as_str(), seed);

        let world = World::new(&settings, seed).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let game = Rc::new(RefCell::new(Game::new(
            world,
            settings,
            width as f32 / height as f32,
        )));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&window, &canvas, game.clone());
        setup_window_handlers(&window, &canvas, game.clone());

        request_animation_frame(game);

        log::info!("Lander running!");
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) {
        // Keyboard
        for (event_name, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().input.key(&event.key(), pressed) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch, one flag per changed touch
        for (event_name, pressed) in TOUCH_EVENTS {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let width = canvas_clone.client_width() as f32;
                let touches = event.changed_touches();
                let mut g = game.borrow_mut();
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i) {
                        g.input.touch(touch.client_x() as f32, width, pressed);
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_window_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) {
        // Resize
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let (width, height) = canvas_pixels(&window);
                canvas_clone.set_width(width);
                canvas_clone.set_height(height);
                game.borrow_mut().resize(width, height);
            });
            let _ =
                window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: keyup never arrives, so let go of both thrusters
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.input.any() {
                    log::info!("Thrusters released (window blur)");
                }
                g.input.release_all();
                g.limiter.reset();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Lander failed to start: {:?}", e);
    }
}

/// Ticks flown by the native build
#[cfg(not(target_arch = "wasm32"))]
const NATIVE_TICKS: u64 = 600;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lander::sim::{Bounds, InputState};
    use lander::world::World;
    use lander::{SceneKind, Settings};

    env_logger::init();
    log::info!("Lander (native) starting...");
    log::info!("Rendering needs the browser build; flying headless");

    let mut settings = Settings::load();
    if let Some(arg) = std::env::args().nth(1) {
        match SceneKind::from_str(&arg) {
            Some(scene) => settings.scene = scene,
            None => log::warn!("Unknown scene {:?}, using {}", arg, settings.scene.as_str()),
        }
    }
    let seed = settings.terrain_seed.unwrap_or(42);

    let mut world = match World::new(&settings, seed) {
        Ok(world) => world,
        Err(e) => {
            log::error!("Could not build world: {}", e);
            std::process::exit(1);
        }
    };
    let mut camera = Bounds::look_at(settings.view, 4.0 / 3.0);

    // Hop, drift left, drift right, then fall
    for t in 0..NATIVE_TICKS {
        let input = InputState {
            thrust_left: t < 200 || (200..300).contains(&t),
            thrust_right: t < 200 || (300..400).contains(&t),
        };
        world.tick(&input, &mut camera, &settings.thrust);

        if t % 60 == 0 {
            let pose = world.ship_pose();
            log::info!(
                "tick {:>3}: ship=({:7.1}, {:7.1}) angle={:+.3} view centre=({:.1}, {:.1})",
                t,
                pose.position.x,
                pose.position.y,
                pose.angle,
                camera.center().x,
                camera.center().y
            );
        }
    }

    let pose = world.ship_pose();
    println!(
        "Flew {} ticks in the {} scene, ship at ({:.1}, {:.1})",
        world.tick_count,
        settings.scene.as_str(),
        pose.position.x,
        pose.position.y
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

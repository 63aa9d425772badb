use std::sync::Arc;
use web_time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

#[cfg(target_arch = "wasm32")]
mod audio;
mod collectible;
mod collision;
mod config;
mod game;
#[cfg(target_arch = "wasm32")]
mod game_ui;
mod input;
mod level;
mod player;
mod themes;

use game::{GameCallbacks, GameManager, GamePhase};
use input::InputState;

#[cfg(target_arch = "wasm32")]
type Ui = game_ui::DomUi;
#[cfg(not(target_arch = "wasm32"))]
type Ui = log_ui::LogUi;

/// Headless frontend for the native build: every callback goes to the log.
#[cfg(not(target_arch = "wasm32"))]
mod log_ui {
    use crate::game::{CompletionStats, GameCallbacks, Severity};

    pub struct LogUi;

    impl LogUi {
        pub fn new() -> Self {
            Self
        }
    }

    impl GameCallbacks for LogUi {
        fn update_score(&mut self, score: u32) {
            log::debug!("score: {score}");
        }
        fn update_items(&mut self, collected: usize, total: usize) {
            log::debug!("items: {collected}/{total}");
        }
        fn update_timer(&mut self, seconds: u32, counting_down: bool) {
            if counting_down && seconds % 10 == 0 {
                log::debug!("time left: {seconds}s");
            }
        }
        fn update_level(&mut self, index: usize, name: &str) {
            log::info!("level {index}: {name}");
        }
        fn show_notification(&mut self, text: &str, severity: Severity) {
            log::info!("[{severity:?}] {text}");
        }
        fn show_completion(&mut self, stats: &CompletionStats) {
            log::info!(
                "{} clear: {} relics, bonus {}, score {}",
                stats.level_name,
                stats.items,
                stats.time_bonus,
                stats.score
            );
        }
        fn show_menu(&mut self, can_continue: bool) {
            log::info!(
                "menu (Enter: new game{})",
                if can_continue { ", C: continue" } else { "" }
            );
        }
        fn hide_menu(&mut self) {}
        fn show_hud(&mut self) {}
        fn hide_hud(&mut self) {}
    }
}

struct ClientState {
    window: Arc<Window>,
    game: GameManager,
    input: InputState,
    ui: Ui,
    last_frame: Instant,
}

struct App {
    state: Option<ClientState>,
}

impl App {
    fn new() -> Self {
        Self { state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let window = Arc::new(
            event_loop
                .create_window(Window::default_attributes().with_title("Relic Hunt"))
                .unwrap(),
        );

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowExtWebSys;
            let canvas = window.canvas().expect("No canvas");

            let web_window = web_sys::window().expect("No window");
            let dpr = web_window.device_pixel_ratio();
            let (w, h) = (
                (web_window.inner_width().unwrap().as_f64().unwrap() * dpr) as u32,
                (web_window.inner_height().unwrap().as_f64().unwrap() * dpr) as u32,
            );
            canvas.set_width(w);
            canvas.set_height(h);
            canvas
                .style()
                .set_css_text("width: 100%; height: 100%; display: block;");

            web_sys::window()
                .and_then(|win| win.document())
                .and_then(|doc| {
                    doc.get_element_by_id("wasm-container")?
                        .append_child(&canvas)
                        .ok()
                })
                .expect("Couldn't append canvas");
        }

        let game = GameManager::new();
        let mut ui = Ui::new();
        ui.show_menu(game.has_checkpoint());

        self.state = Some(ClientState {
            window: window.clone(),
            game,
            input: InputState::new(),
            ui,
            last_frame: Instant::now(),
        });
        window.request_redraw();
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: winit::event::DeviceId, event: DeviceEvent) {
        let DeviceEvent::MouseMotion { delta } = event else {
            return;
        };
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if state.input.cursor_grabbed {
            state
                .input
                .handle_mouse_move(delta.0 as f32, delta.1 as f32);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed if event.repeat => {}
                        ElementState::Pressed => match key {
                            KeyCode::Escape => {
                                release_cursor(state);
                                state.game.toggle_pause(&mut state.ui);
                                state.input.clear();
                            }
                            KeyCode::Enter => match state.game.phase() {
                                GamePhase::Menu => state.game.start_game(&mut state.ui),
                                GamePhase::LevelComplete => {
                                    state.game.advance_level(&mut state.ui)
                                }
                                _ => {}
                            },
                            KeyCode::KeyC if state.game.phase() == GamePhase::Menu => {
                                state.game.continue_game(&mut state.ui);
                            }
                            KeyCode::Space => state.game.jump(),
                            _ => state.input.handle_key_press(key),
                        },
                        ElementState::Released => state.input.handle_key_release(key),
                    }
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => grab_cursor(state),
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = now.duration_since(state.last_frame).as_secs_f32();
                state.last_frame = now;

                let (dx, dy) = state.input.consume_mouse_delta();
                state.game.look(dx, dy);
                state
                    .game
                    .update(dt, &state.input.move_input(), &mut state.ui);

                // A game over or completion deactivates the player; drop the
                // pointer capture with it.
                if state.game.phase() != GamePhase::Playing && state.input.cursor_grabbed {
                    release_cursor(state);
                    state.input.clear();
                }

                #[cfg(target_arch = "wasm32")]
                state.ui.tick();

                state.window.request_redraw();
            }
            _ => {}
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn grab_cursor(state: &mut ClientState) {
    if let Some(canvas) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("wasm-container"))
        .and_then(|c| c.first_element_child())
    {
        canvas.request_pointer_lock();
        state.input.cursor_grabbed = true;
    }
}

#[cfg(target_arch = "wasm32")]
fn release_cursor(state: &mut ClientState) {
    if let Some(d) = web_sys::window().and_then(|w| w.document()) {
        d.exit_pointer_lock();
    }
    state.input.cursor_grabbed = false;
}

#[cfg(not(target_arch = "wasm32"))]
fn grab_cursor(state: &mut ClientState) {
    use winit::window::CursorGrabMode;
    let grabbed = state
        .window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| state.window.set_cursor_grab(CursorGrabMode::Confined))
        .is_ok();
    if grabbed {
        state.window.set_cursor_visible(false);
        state.input.cursor_grabbed = true;
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn release_cursor(state: &mut ClientState) {
    use winit::window::CursorGrabMode;
    let _ = state.window.set_cursor_grab(CursorGrabMode::None);
    state.window.set_cursor_visible(true);
    state.input.cursor_grabbed = false;
}

#[cfg(target_arch = "wasm32")]
mod wasm_entry {
    use super::*;
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen(start)]
    pub fn run() {
        std::panic::set_hook(Box::new(|info| {
            web_sys::console::error_1(&info.to_string().into())
        }));
        console_log::init_with_level(log::Level::Info).expect("Logger init failed");

        let event_loop = EventLoop::new().unwrap();
        #[allow(clippy::let_underscore_future)]
        let _ = event_loop.run_app(&mut App::new());
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        env_logger::init();
        let event_loop = EventLoop::new().unwrap();
        let _ = event_loop.run_app(&mut App::new());
    }
    #[cfg(target_arch = "wasm32")]
    wasm_entry::run();
}

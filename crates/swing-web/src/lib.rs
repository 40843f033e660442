pub mod runner;

pub use runner::GameRunner;

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (game_init, game_tick, input handlers, draw list accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use swing_engine::*;
///
/// mod game;
/// use game::MyGame;
///
/// swing_web::export_game!(MyGame, "my-game");
/// ```
///
/// # Arguments
///
/// - `$game_type`: The game struct type that implements `swing_engine::Game`
///   and has an inherent `new()` constructor
/// - `$game_name`: A string literal used in the initialization log message
///
/// The host may call `game_configure(json)` before `game_init()` to override
/// the game's config.
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
            static PENDING_CONFIG: RefCell<Option<String>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Game not initialized. Call game_init() first.");
                f(runner)
            })
        }

        #[wasm_bindgen]
        pub fn game_configure(json: &str) {
            PENDING_CONFIG.with(|cell| {
                *cell.borrow_mut() = Some(json.to_owned());
            });
        }

        #[wasm_bindgen]
        pub fn game_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let game = <$game_type>::new();
            let mut runner = $crate::GameRunner::new(game);
            if let Some(json) = PENDING_CONFIG.with(|cell| cell.borrow_mut().take()) {
                runner.configure(&json);
            }

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            if with_runner(|r| r.init()).is_ok() {
                log::info!("{}: initialized", $game_name);
            }
        }

        #[wasm_bindgen]
        pub fn game_tick(frame_ms: f64) {
            with_runner(|r| r.tick(frame_ms));
        }

        #[wasm_bindgen]
        pub fn game_key_down(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_key_up(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyUp { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        #[wasm_bindgen]
        pub fn game_should_quit() -> bool {
            with_runner(|r| r.should_quit())
        }

        // ---- Draw list accessors ----

        #[wasm_bindgen]
        pub fn get_lines_ptr() -> *const f32 {
            with_runner(|r| r.lines_ptr())
        }

        #[wasm_bindgen]
        pub fn get_line_count() -> u32 {
            with_runner(|r| r.line_count())
        }

        #[wasm_bindgen]
        pub fn get_quads_ptr() -> *const f32 {
            with_runner(|r| r.quads_ptr())
        }

        #[wasm_bindgen]
        pub fn get_quad_count() -> u32 {
            with_runner(|r| r.quad_count())
        }

        #[wasm_bindgen]
        pub fn get_images_ptr() -> *const f32 {
            with_runner(|r| r.images_ptr())
        }

        #[wasm_bindgen]
        pub fn get_image_count() -> u32 {
            with_runner(|r| r.image_count())
        }

        #[wasm_bindgen]
        pub fn get_world_width() -> f32 {
            with_runner(|r| r.world_width())
        }

        #[wasm_bindgen]
        pub fn get_world_height() -> f32 {
            with_runner(|r| r.world_height())
        }
    };
}

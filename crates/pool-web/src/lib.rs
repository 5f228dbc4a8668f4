pub mod runner;

pub use pool_engine::InputEvent;
pub use runner::GameRunner;

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (game_init, game_tick, input handlers, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// pool_web::export_game!(MyGame, "my-game", MyGame::new);
/// ```
///
/// # Arguments
///
/// - `$game_type`: The game struct type that implements `pool_engine::Game`
/// - `$game_name`: A string literal used in log messages
/// - `$ctor`: A function returning `Result<$game_type, E>` where `E: Display`
///
/// The `json = $from_json` variant additionally exports `game_init_from_json`,
/// which builds the game from a preset string via
/// `$from_json(&str) -> Result<$game_type, E>`.
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal, $ctor:path) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        /// Run `f` against the live runner. `None` when no game is loaded.
        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f))
        }

        fn install<E: std::fmt::Display>(game: Result<$game_type, E>) -> bool {
            match game {
                Ok(game) => {
                    RUNNER.with(|cell| {
                        *cell.borrow_mut() = Some($crate::GameRunner::new(game));
                    });
                    log::info!("{}: initialized", $game_name);
                    true
                }
                Err(e) => {
                    log::error!("{}: failed to start: {}", $game_name, e);
                    false
                }
            }
        }

        #[wasm_bindgen]
        pub fn game_init() -> bool {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);
            install($ctor())
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input($crate::InputEvent::PointerDown { x, y }));
        }

        /// Release ends the drag and fires the shot.
        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            with_runner(|r| {
                r.push_input($crate::InputEvent::PointerUp { x, y });
                r.push_input($crate::InputEvent::Shoot);
            });
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input($crate::InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_drag(x: f32, y: f32) {
            with_runner(|r| r.push_input($crate::InputEvent::PointerDrag { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_shoot() {
            with_runner(|r| r.push_input($crate::InputEvent::Shoot));
        }

        #[wasm_bindgen]
        pub fn game_key_down(key_code: u32) {
            with_runner(|r| r.push_input($crate::InputEvent::KeyDown { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_key_up(key_code: u32) {
            with_runner(|r| r.push_input($crate::InputEvent::KeyUp { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input($crate::InputEvent::Custom { kind, a, b, c }));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_vector_vertices_ptr() -> *const f32 {
            with_runner(|r| r.vector_vertices_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_vector_vertex_count() -> u32 {
            with_runner(|r| r.vector_vertex_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_vector_vertices() -> u32 {
            with_runner(|r| r.max_vector_vertices()).unwrap_or(0)
        }

        /// Text labels of the last render pass as a JSON array.
        #[wasm_bindgen]
        pub fn get_text_labels() -> String {
            with_runner(|r| r.labels_json()).unwrap_or_else(|| String::from("[]"))
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(|r| r.game_events_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_world_width() -> f32 {
            with_runner(|r| r.world_width()).unwrap_or(0.0)
        }

        #[wasm_bindgen]
        pub fn get_world_height() -> f32 {
            with_runner(|r| r.world_height()).unwrap_or(0.0)
        }

        #[wasm_bindgen]
        pub fn is_game_halted() -> bool {
            with_runner(|r| r.is_halted()).unwrap_or(true)
        }
    };

    ($game_type:ty, $game_name:literal, $ctor:path, json = $from_json:path) => {
        $crate::export_game!($game_type, $game_name, $ctor);

        /// Replace the running game with one built from a preset JSON string.
        #[wasm_bindgen]
        pub fn game_init_from_json(json: &str) -> bool {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);
            install($from_json(json))
        }
    };
}

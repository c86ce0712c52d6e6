//! Words Rain core crate.
//!
//! A vocabulary typing game: words from a server-side wordbook fall toward the
//! ground and the player types them before they land. Each solved word freezes
//! play while it is pronounced and dissolved. `start_game()` mounts the browser
//! UI; the [`engine`] module holds all gameplay and runs on the host as well.

use wasm_bindgen::prelude::*;

pub mod api;
pub mod capability;
pub mod engine;
pub mod error;
mod web;

pub use api::{Accent, Settings};
pub use capability::{Capabilities, MonospaceMeasure, Signal, Speaker, TextMeasure};
pub use engine::{Engine, EngineConfig, Frame, InputOutcome, Key, Phase, Playfield, SessionOptions};
pub use error::{ApiError, AppError, EngineError};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::mount().map_err(JsValue::from)
}

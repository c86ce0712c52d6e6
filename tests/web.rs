// Browser-only checks. Run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;
use words_rain::{AppError, EngineError};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn app_errors_cross_the_boundary_as_strings() {
    let js: JsValue = AppError::from(EngineError::EmptyWordList).into();
    assert_eq!(
        js.as_string().as_deref(),
        Some("the selected wordbook has no words")
    );
}

#[wasm_bindgen_test]
fn js_exceptions_become_app_errors() {
    let err = AppError::from(JsValue::from_str("boom"));
    assert!(matches!(err, AppError::Js(ref text) if text == "boom"));

    let err = AppError::from(JsValue::from(42));
    assert!(matches!(err, AppError::Js(ref text) if text == "42"));
}

#[wasm_bindgen_test]
fn start_game_mounts_the_setup_panel() {
    words_rain::start_game().unwrap();
    let doc = web_sys::window().unwrap().document().unwrap();
    assert!(doc.get_element_by_id("wr-canvas").is_some());
    assert!(doc.get_element_by_id("wr-setup").is_some());
    assert!(doc.get_element_by_id("wr-start").is_some());
    // mounting twice is a no-op
    words_rain::start_game().unwrap();
}

//! Browser shell: setup panel, keyboard listener and the animation-frame driver.
//!
//! Everything browser-facing lives here. The engine is owned by a single
//! thread-local [`App`]; DOM callbacks and the frame loop borrow it briefly and
//! never across an `await`.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    CanvasRenderingContext2d, Document, Event, EventTarget, HtmlButtonElement, HtmlCanvasElement,
    HtmlElement, HtmlInputElement, HtmlOptionElement, HtmlSelectElement, KeyboardEvent, Window,
};

use crate::api::{self, Accent};
use crate::capability::Capabilities;
use crate::engine::{Engine, Key, Playfield, SessionOptions, speed};
use crate::error::{AppError, EngineError};

pub mod http;
pub mod render;
pub mod speech;

const CANVAS_WIDTH: u32 = 800;
const CANVAS_HEIGHT: u32 = 600;
/// Lifetime of a transient status message.
const MESSAGE_MS: f64 = 3000.0;

const CANVAS_ID: &str = "wr-canvas";
const SETUP_ID: &str = "wr-setup";
const WORDBOOK_ID: &str = "wr-wordbook";
const ACCENT_ID: &str = "wr-accent";
const LEVEL_ID: &str = "wr-level";
const LEVEL_VALUE_ID: &str = "wr-level-value";
const START_ID: &str = "wr-start";
const RELOAD_ID: &str = "wr-reload";
const CONTROLS_ID: &str = "wr-controls";
const RESTART_ID: &str = "wr-restart";
const BACK_ID: &str = "wr-back";
const MESSAGE_ID: &str = "wr-message";

struct App {
    engine: Engine,
    ctx: CanvasRenderingContext2d,
    message_until: Option<f64>,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|cell| cell.borrow_mut().as_mut().map(f))
}

// --- DOM helpers ----------------------------------------------------------------

pub(crate) fn window() -> Result<Window, AppError> {
    web_sys::window().ok_or(AppError::MissingDom("window"))
}

fn document() -> Result<Document, AppError> {
    window()?.document().ok_or(AppError::MissingDom("document"))
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn element<T: JsCast>(doc: &Document, id: &'static str) -> Result<T, AppError> {
    doc.get_element_by_id(id)
        .ok_or(AppError::MissingDom(id))?
        .dyn_into::<T>()
        .map_err(|_| AppError::MissingDom(id))
}

fn on_event(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), AppError> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

// --- Mount ----------------------------------------------------------------------

/// Build the page, wire listeners, load wordbooks and start the frame loop.
/// Calling it again after a successful mount does nothing.
pub fn mount() -> Result<(), AppError> {
    if APP.with(|cell| cell.borrow().is_some()) {
        return Ok(());
    }
    let win = window()?;
    let doc = document()?;
    let body = doc.body().ok_or(AppError::MissingDom("body"))?;

    let canvas: HtmlCanvasElement = match doc.get_element_by_id(CANVAS_ID) {
        Some(_) => element(&doc, CANVAS_ID)?,
        None => {
            let c: HtmlCanvasElement = doc
                .create_element("canvas")?
                .dyn_into()
                .map_err(|_| AppError::MissingDom(CANVAS_ID))?;
            c.set_id(CANVAS_ID);
            c.set_width(CANVAS_WIDTH);
            c.set_height(CANVAS_HEIGHT);
            c.set_attribute("style", "position:fixed; left:50%; top:50%; transform:translate(-50%,-50%); border-radius:14px; border:2px solid #222; background:#181818; z-index:20;").ok();
            body.append_child(&c)?;
            c
        }
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or(AppError::MissingDom("2d context"))?
        .dyn_into()
        .map_err(|_| AppError::MissingDom("2d context"))?;

    let playfield = Playfield::new(f64::from(canvas.width()), f64::from(canvas.height()))?;
    let mut caps = Capabilities::new(render::CanvasMeasure::new(ctx.clone()));
    match speech::WebSpeech::detect(&win) {
        Some(speaker) => caps = caps.with_speech(speaker),
        None => log::warn!("speech synthesis unavailable; words will not be spoken"),
    }

    build_setup_panel(&doc, &body)?;
    build_controls(&doc, &body)?;
    wire_listeners(&doc)?;

    APP.with(|cell| {
        *cell.borrow_mut() = Some(App {
            engine: Engine::new(caps, playfield),
            ctx,
            message_until: None,
        });
    });
    show_game(false);
    start_loop()?;
    spawn_local(load_setup());
    log::info!("mounted {}x{} playfield", playfield.width, playfield.height);
    Ok(())
}

fn build_setup_panel(doc: &Document, body: &HtmlElement) -> Result<(), AppError> {
    if doc.get_element_by_id(SETUP_ID).is_some() {
        return Ok(());
    }
    let accents: String = Accent::ALL
        .iter()
        .map(|a| format!("<option value='{}'>{}</option>", a.code(), a.label()))
        .collect();
    let row = "display:flex; justify-content:space-between; align-items:center; gap:12px; margin:10px 0;";
    let panel = doc.create_element("div")?;
    panel.set_id(SETUP_ID);
    panel.set_attribute("style", "position:fixed; left:50%; top:50%; transform:translate(-50%,-50%); min-width:360px; font-family:'Fira Code', monospace; font-size:15px; padding:20px 24px; background:rgba(0,0,0,0.82); border:1px solid #333; border-radius:10px; color:#f0f0f0; z-index:40;").ok();
    panel.set_inner_html(&format!(
        "<div style='font-size:22px; color:#ffd166; margin-bottom:12px;'>Words Rain</div>\
         <label style=\"{row}\">Wordbook <select id='{WORDBOOK_ID}'></select></label>\
         <label style=\"{row}\">Accent <select id='{ACCENT_ID}'>{accents}</select></label>\
         <label style=\"{row}\">Level <span><input id='{LEVEL_ID}' type='range' min='{min}' max='{max}' value='{default}'> <span id='{LEVEL_VALUE_ID}'>{default}</span></span></label>\
         <div style=\"{row}\"><button id='{RELOAD_ID}'>Reload</button><button id='{START_ID}' disabled>Start</button></div>",
        min = speed::MIN_LEVEL,
        max = speed::MAX_LEVEL,
        default = speed::DEFAULT_LEVEL,
    ));
    body.append_child(&panel)?;

    if doc.get_element_by_id(MESSAGE_ID).is_none() {
        let div = doc.create_element("div")?;
        div.set_id(MESSAGE_ID);
        div.set_attribute("style", "position:fixed; bottom:24px; left:50%; transform:translateX(-50%); font-family:'Fira Code', monospace; font-size:15px; color:#ffd166; z-index:50;").ok();
        body.append_child(&div)?;
    }
    Ok(())
}

fn build_controls(doc: &Document, body: &HtmlElement) -> Result<(), AppError> {
    if doc.get_element_by_id(CONTROLS_ID).is_some() {
        return Ok(());
    }
    let div = doc.create_element("div")?;
    div.set_id(CONTROLS_ID);
    div.set_attribute("style", "position:fixed; top:10px; right:12px; font-family:'Fira Code', monospace; z-index:45;").ok();
    div.set_inner_html(&format!(
        "<button id='{RESTART_ID}'>Restart</button> <button id='{BACK_ID}'>Back</button>"
    ));
    body.append_child(&div)?;
    Ok(())
}

fn wire_listeners(doc: &Document) -> Result<(), AppError> {
    let start: HtmlButtonElement = element(doc, START_ID)?;
    let start_btn = start.clone();
    on_event(&start, "click", move |_| {
        start_btn.blur().ok();
        let button = start_btn.clone();
        spawn_local(async move {
            if let Err(err) = start_session().await {
                log::warn!("cannot start: {err}");
                if button.disabled() {
                    pin_message(&format!("{err}. Press Reload to try again"));
                } else {
                    pin_message(&err.to_string());
                }
            }
        });
    })?;

    let reload: HtmlButtonElement = element(doc, RELOAD_ID)?;
    on_event(&reload, "click", |_| spawn_local(load_setup()))?;

    let accent: HtmlSelectElement = element(doc, ACCENT_ID)?;
    let accent_select = accent.clone();
    on_event(&accent, "change", move |_| {
        let accent = match accent_select.value().parse::<Accent>() {
            Ok(accent) => accent,
            Err(err) => {
                flash(&err.to_string());
                return;
            }
        };
        spawn_local(async move {
            if let Err(err) = http::put_accent(accent).await {
                log::warn!("accent not saved: {err}");
                flash("Could not save accent");
            }
        });
    })?;

    let level: HtmlInputElement = element(doc, LEVEL_ID)?;
    let level_input = level.clone();
    on_event(&level, "input", move |_| {
        if let Ok(doc) = document() {
            if let Some(el) = doc.get_element_by_id(LEVEL_VALUE_ID) {
                el.set_text_content(Some(&level_input.value()));
            }
        }
    })?;

    let restart: HtmlButtonElement = element(doc, RESTART_ID)?;
    let restart_btn = restart.clone();
    on_event(&restart, "click", move |_| {
        restart_btn.blur().ok();
        if let Some(Err(err)) = with_app(|app| app.engine.restart(now_ms())) {
            flash(&err.to_string());
        }
    })?;

    let back: HtmlButtonElement = element(doc, BACK_ID)?;
    on_event(&back, "click", |_| {
        with_app(|app| app.engine.reset());
        show_game(false);
    })?;

    // Keyboard listener for typing
    {
        let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
            if evt.ctrl_key() || evt.meta_key() || evt.alt_key() {
                return;
            }
            let Some(key) = Key::from_dom(&evt.key()) else {
                return;
            };
            let consumed = with_app(|app| {
                if !app.engine.is_running() {
                    return false;
                }
                app.engine.handle_key(key, now_ms());
                true
            })
            .unwrap_or(false);
            if consumed {
                evt.prevent_default();
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

// --- Setup flow -----------------------------------------------------------------

async fn load_setup() {
    set_start_enabled(false);
    pin_message("Loading wordbooks...");

    let settings = match http::get_settings().await {
        Ok(settings) => settings,
        Err(err) => {
            log::warn!("settings unavailable, using defaults: {err}");
            api::Settings::default()
        }
    };
    if let Err(err) = select_accent(settings.accent()) {
        log::warn!("{err}");
    }

    match http::get_wordbooks().await {
        Ok(books) if books.is_empty() => pin_message("No wordbooks available"),
        Ok(books) => match fill_wordbooks(&books, settings.wordbook()) {
            Ok(()) => {
                log::info!("{} wordbooks available", books.len());
                set_start_enabled(true);
                pin_message("");
            }
            Err(err) => pin_message(&err.to_string()),
        },
        Err(err) => {
            log::warn!("wordbook list failed: {err}");
            pin_message(&format!("Could not load wordbooks: {err}"));
        }
    }
}

fn fill_wordbooks(books: &[String], preferred: Option<&str>) -> Result<(), AppError> {
    let doc = document()?;
    let select: HtmlSelectElement = element(&doc, WORDBOOK_ID)?;
    select.set_inner_html("");
    for name in books {
        let option = HtmlOptionElement::new_with_text_and_value(name, name)?;
        select.add_with_html_option_element(&option)?;
    }
    if let Some(name) = preferred.filter(|p| books.iter().any(|b| b.as_str() == *p)) {
        select.set_value(name);
    }
    Ok(())
}

fn select_accent(accent: Accent) -> Result<(), AppError> {
    let select: HtmlSelectElement = element(&document()?, ACCENT_ID)?;
    select.set_value(accent.code());
    Ok(())
}

fn read_options() -> Result<(String, SessionOptions), AppError> {
    let doc = document()?;
    let wordbook: HtmlSelectElement = element(&doc, WORDBOOK_ID)?;
    let name = api::validate_wordbook_name(&wordbook.value())?.to_string();
    let accent: Accent = element::<HtmlSelectElement>(&doc, ACCENT_ID)?
        .value()
        .parse()?;
    let level = element::<HtmlInputElement>(&doc, LEVEL_ID)?
        .value()
        .parse::<u8>()
        .map(speed::clamp_level)
        .unwrap_or(speed::DEFAULT_LEVEL);
    Ok((name, SessionOptions { level, accent }))
}

async fn start_session() -> Result<(), AppError> {
    let (name, options) = read_options()?;

    set_start_enabled(false);
    // a failed fetch leaves Start disabled until Reload succeeds
    let words = http::get_words(&name).await?;
    set_start_enabled(true);
    if words.is_empty() {
        return Err(EngineError::EmptyWordList.into());
    }

    with_app(|app| app.engine.start(words, options, now_ms()))
        .ok_or(AppError::MissingDom(CANVAS_ID))??;
    pin_message("");
    show_game(true);

    spawn_local(async move {
        if let Err(err) = http::put_wordbook(&name).await {
            log::warn!("wordbook choice not saved: {err}");
            flash("Could not save wordbook choice");
        }
    });
    Ok(())
}

// --- Status / visibility --------------------------------------------------------

fn set_message(text: &str) {
    if let Some(el) = document()
        .ok()
        .and_then(|doc| doc.get_element_by_id(MESSAGE_ID))
    {
        el.set_text_content(Some(text));
    }
}

/// Message that stays until replaced.
fn pin_message(text: &str) {
    set_message(text);
    with_app(|app| app.message_until = None);
}

/// Message cleared by the frame loop after [`MESSAGE_MS`].
fn flash(text: &str) {
    set_message(text);
    with_app(|app| app.message_until = Some(now_ms() + MESSAGE_MS));
}

fn set_start_enabled(enabled: bool) {
    if let Ok(button) = document().and_then(|doc| element::<HtmlButtonElement>(&doc, START_ID)) {
        button.set_disabled(!enabled);
    }
}

fn show_game(playing: bool) {
    let Ok(doc) = document() else {
        return;
    };
    for (id, visible) in [(SETUP_ID, !playing), (CONTROLS_ID, playing), (CANVAS_ID, playing)] {
        if let Ok(el) = element::<HtmlElement>(&doc, id) {
            el.set_hidden(!visible);
        }
    }
}

// --- Frame loop -----------------------------------------------------------------

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_loop() -> Result<(), AppError> {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        on_frame(ts);
        if let (Some(w), Some(cb)) = (web_sys::window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(cb) = g.borrow().as_ref() {
        window()?.request_animation_frame(cb.as_ref().unchecked_ref())?;
    }
    Ok(())
}

fn on_frame(ts: f64) {
    let message_expired = with_app(|app| {
        app.engine.tick(ts);
        if let Some(frame) = app.engine.frame(ts) {
            render::draw_frame(&app.ctx, &frame);
        }
        let expired = app.message_until.is_some_and(|until| ts >= until);
        if expired {
            app.message_until = None;
        }
        expired
    })
    .unwrap_or(false);
    if message_expired {
        set_message("");
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn start_disabled() -> bool {
        document()
            .and_then(|doc| element::<HtmlButtonElement>(&doc, START_ID))
            .map(|button| button.disabled())
            .unwrap_or(false)
    }

    #[wasm_bindgen_test]
    async fn failed_word_fetch_keeps_start_disabled() {
        mount().unwrap();
        fill_wordbooks(&["no-such-book".to_string()], None).unwrap();
        set_start_enabled(true);

        assert!(start_session().await.is_err());
        assert!(start_disabled());
    }
}

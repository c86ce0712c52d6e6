//! Canvas drawing of an engine [`Frame`].

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::capability::TextMeasure;
use crate::engine::{EffectStyle, Frame, Summary, WordSprite};

// --- Style ----------------------------------------------------------------------

const WORD_FONT_PX: f64 = 26.0;
const WORD_FONT_FAMILY: &str = "'Fira Code', monospace";
const HUD_FONT: &str = "16px 'Fira Code', monospace";
const INPUT_FONT: &str = "22px 'Fira Code', monospace";

const BACKGROUND: &str = "#181818";
const GROUND: &str = "#3a3a3a";
const WORD: &str = "#f0f0f0";
const WORD_TARGETED: &str = "#ffffff";
const TYPED: &str = "#ffd166";
const POPUP: &str = "#06d6a0";
const DISSOLVE: &str = "#9ab";
const HUD: &str = "#ffd166";

fn word_font(scale: f64) -> String {
    format!("{}px {}", (WORD_FONT_PX * scale).round(), WORD_FONT_FAMILY)
}

/// Measures with the same font words are drawn in, so spawn positions keep
/// whole words on screen.
pub struct CanvasMeasure {
    ctx: CanvasRenderingContext2d,
}

impl CanvasMeasure {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl TextMeasure for CanvasMeasure {
    fn text_width(&self, text: &str) -> f64 {
        self.ctx.set_font(&word_font(1.0));
        self.ctx
            .measure_text(text)
            .map(|m| m.width())
            .unwrap_or(text.chars().count() as f64 * WORD_FONT_PX * 0.6)
    }
}

pub fn clear(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    ctx.set_global_alpha(1.0);
    ctx.set_fill_style(&JsValue::from_str(BACKGROUND));
    ctx.fill_rect(0.0, 0.0, width, height);
}

pub fn draw_frame(ctx: &CanvasRenderingContext2d, frame: &Frame) {
    let field = &frame.playfield;
    clear(ctx, field.width, field.height);

    ctx.set_stroke_style(&JsValue::from_str(GROUND));
    ctx.set_line_width(2.0);
    ctx.begin_path();
    ctx.move_to(0.0, field.ground);
    ctx.line_to(field.width, field.ground);
    ctx.stroke();

    ctx.set_text_align("left");
    ctx.set_text_baseline("alphabetic");
    ctx.set_font(&word_font(1.0));
    for word in &frame.words {
        draw_word(ctx, word);
    }

    for fx in &frame.effects {
        ctx.set_global_alpha(fx.alpha.clamp(0.0, 1.0));
        ctx.set_font(&word_font(fx.scale));
        let color = match fx.style {
            EffectStyle::Popup => POPUP,
            EffectStyle::Dissolve => DISSOLVE,
        };
        ctx.set_fill_style(&JsValue::from_str(color));
        ctx.fill_text(&fx.text, fx.x, fx.y).ok();
    }
    ctx.set_global_alpha(1.0);

    draw_hud(ctx, frame);
    if let Some(summary) = &frame.summary {
        draw_summary(ctx, field.width, field.height, summary);
    }
}

fn draw_word(ctx: &CanvasRenderingContext2d, word: &WordSprite) {
    let n = word.typed.min(word.text.len());
    let (typed, rest) = if word.text.is_char_boundary(n) {
        word.text.split_at(n)
    } else {
        ("", word.text.as_str())
    };
    let mut x = word.x;
    if !typed.is_empty() {
        ctx.set_fill_style(&JsValue::from_str(TYPED));
        ctx.fill_text(typed, x, word.y).ok();
        x += ctx.measure_text(typed).map(|m| m.width()).unwrap_or(0.0);
    }
    let color = if word.targeted { WORD_TARGETED } else { WORD };
    ctx.set_fill_style(&JsValue::from_str(color));
    ctx.fill_text(rest, x, word.y).ok();
    if word.targeted {
        ctx.set_stroke_style(&JsValue::from_str(TYPED));
        ctx.set_line_width(1.0);
        ctx.begin_path();
        ctx.move_to(word.x, word.y + 5.0);
        ctx.line_to(x + ctx.measure_text(rest).map(|m| m.width()).unwrap_or(0.0), word.y + 5.0);
        ctx.stroke();
    }
}

fn draw_hud(ctx: &CanvasRenderingContext2d, frame: &Frame) {
    let hud = &frame.hud;
    ctx.set_font(HUD_FONT);
    ctx.set_fill_style(&JsValue::from_str(HUD));
    ctx.set_text_align("left");
    let line = format!(
        "Score {}   Combo x{}   Left {}   Level {}   {}",
        hud.score, hud.combo, hud.remaining, hud.level, hud.accent
    );
    ctx.fill_text(&line, 12.0, 22.0).ok();

    ctx.set_font(INPUT_FONT);
    ctx.set_text_align("center");
    let cx = frame.playfield.width / 2.0;
    let y = frame.playfield.ground + 32.0;
    if hud.input.is_empty() {
        ctx.set_global_alpha(0.35);
        ctx.fill_text("type a falling word", cx, y).ok();
        ctx.set_global_alpha(1.0);
    } else {
        ctx.fill_text(&hud.input, cx, y).ok();
    }
    ctx.set_text_align("left");
}

fn draw_summary(ctx: &CanvasRenderingContext2d, width: f64, height: f64, s: &Summary) {
    ctx.set_fill_style(&JsValue::from_str("rgba(0,0,0,0.72)"));
    ctx.fill_rect(0.0, 0.0, width, height);

    ctx.set_text_align("center");
    ctx.set_fill_style(&JsValue::from_str(HUD));
    ctx.set_font("36px 'Fira Code', monospace");
    let cx = width / 2.0;
    let mut y = height / 2.0 - 60.0;
    ctx.fill_text("All words solved", cx, y).ok();

    ctx.set_font(INPUT_FONT);
    ctx.set_fill_style(&JsValue::from_str(WORD));
    y += 48.0;
    ctx.fill_text(&format!("Final score {}", s.score), cx, y).ok();
    y += 30.0;
    ctx.fill_text(&format!("Best combo x{}", s.best_combo), cx, y).ok();
    y += 30.0;
    ctx.fill_text(
        &format!("{} solved, {} missed, {} chain breaks", s.solved, s.missed, s.chain_breaks),
        cx,
        y,
    )
    .ok();
    ctx.set_text_align("left");
}

//! Render mapping: turns a session into a flat, backend-agnostic draw list.

use super::effects::{DISSOLVE_DRIFT, EffectKind, POPUP_RISE};
use super::speed::Playfield;
use super::word::WordId;
use super::{Phase, Session};
use crate::api::Accent;
use crate::capability::TextMeasure;

#[derive(Clone, Debug, PartialEq)]
pub struct WordSprite {
    pub id: WordId,
    pub text: String,
    pub x: f64,
    pub y: f64,
    /// Byte length of the typed prefix; non-zero only for the target.
    pub typed: usize,
    pub targeted: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectStyle {
    Popup,
    Dissolve,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EffectSprite {
    pub style: EffectStyle,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub alpha: f64,
    pub scale: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    pub score: u32,
    pub combo: u32,
    pub remaining: usize,
    pub input: String,
    pub level: u8,
    pub accent: Accent,
}

/// End-of-game numbers shown on the completion screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub score: u32,
    pub solved: u32,
    pub missed: u32,
    pub chain_breaks: u32,
    pub best_combo: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub playfield: Playfield,
    pub words: Vec<WordSprite>,
    pub effects: Vec<EffectSprite>,
    pub hud: Hud,
    pub frozen: bool,
    pub summary: Option<Summary>,
}

pub fn build_frame(session: &Session, measure: &dyn TextMeasure, now_ms: f64) -> Frame {
    let target = session.target();
    let words = session
        .active_words()
        .iter()
        .map(|w| {
            let targeted = target == Some(w.id);
            WordSprite {
                id: w.id,
                text: w.text.clone(),
                x: w.x,
                y: w.y,
                typed: if targeted { session.input().len() } else { 0 },
                targeted,
            }
        })
        .collect();

    let effects = session
        .effects()
        .iter()
        .map(|e| {
            let p = e.progress(now_ms);
            match &e.kind {
                EffectKind::ScorePopup { points } => {
                    let text = format!("+{points}");
                    EffectSprite {
                        style: EffectStyle::Popup,
                        x: e.x - measure.text_width(&text) / 2.0,
                        y: e.y - POPUP_RISE * p,
                        alpha: 1.0 - p,
                        scale: 1.0 + 0.25 * (1.0 - p),
                        text,
                    }
                }
                EffectKind::Dissolve { text } => EffectSprite {
                    style: EffectStyle::Dissolve,
                    text: text.clone(),
                    x: e.x,
                    y: e.y - DISSOLVE_DRIFT * p,
                    alpha: (1.0 - p) * (1.0 - p),
                    scale: 1.0 + 0.4 * p,
                },
            }
        })
        .collect();

    let stats = session.stats();
    let summary = match session.phase() {
        Phase::Complete { final_score } => Some(Summary {
            score: final_score,
            solved: stats.solved,
            missed: stats.missed,
            chain_breaks: stats.chain_breaks,
            best_combo: stats.best_combo,
        }),
        Phase::Running => None,
    };

    let options = session.options();
    Frame {
        playfield: *session.playfield(),
        words,
        effects,
        hud: Hud {
            score: session.score(),
            combo: session.combo(),
            remaining: session.remaining(),
            input: session.input().to_string(),
            level: options.level,
            accent: options.accent,
        },
        frozen: session.is_frozen(),
        summary,
    }
}

//! Host capabilities consumed by the engine.
//!
//! The engine never talks to the canvas or the speech synthesizer directly. It is
//! handed a [`TextMeasure`] (always present) and an optional [`Speaker`]; absence
//! of speech is a supported configuration, not an error.

use std::cell::Cell;
use std::rc::Rc;

use crate::api::Accent;

/// One-shot completion flag shared between an external operation and its waiter.
///
/// Clones observe the same flag. Firing is idempotent.
#[derive(Clone, Debug, Default)]
pub struct Signal(Rc<Cell<bool>>);

impl Signal {
    pub fn new() -> Self {
        Self::default()
    }

    /// A signal that is already complete.
    pub fn done() -> Self {
        let s = Self::new();
        s.fire();
        s
    }

    pub fn fire(&self) {
        self.0.set(true);
    }

    pub fn is_set(&self) -> bool {
        self.0.get()
    }
}

/// Pixel width of a word as it will be drawn.
pub trait TextMeasure {
    fn text_width(&self, text: &str) -> f64;
}

/// Text-to-speech. `speak` starts narration and returns a signal that fires when
/// the utterance ends (or errors). The signal may never fire; callers bound it.
pub trait Speaker {
    fn speak(&self, text: &str, accent: Accent) -> Signal;
}

/// Fixed advance per character. Used on the host and whenever no canvas context
/// is available to measure with.
#[derive(Clone, Copy, Debug)]
pub struct MonospaceMeasure {
    pub char_width: f64,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { char_width: 16.0 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.char_width
    }
}

/// The set of capabilities injected into an [`Engine`](crate::engine::Engine).
pub struct Capabilities {
    pub measure: Box<dyn TextMeasure>,
    pub speech: Option<Box<dyn Speaker>>,
}

impl Capabilities {
    pub fn new(measure: impl TextMeasure + 'static) -> Self {
        Self {
            measure: Box::new(measure),
            speech: None,
        }
    }

    pub fn with_speech(mut self, speaker: impl Speaker + 'static) -> Self {
        self.speech = Some(Box::new(speaker));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_clones_share_state() {
        let a = Signal::new();
        let b = a.clone();
        assert!(!b.is_set());
        a.fire();
        assert!(b.is_set());
        a.fire();
        assert!(b.is_set());
    }

    #[test]
    fn monospace_counts_chars_not_bytes() {
        let m = MonospaceMeasure { char_width: 10.0 };
        assert_eq!(m.text_width("café"), 40.0);
        assert_eq!(m.text_width(""), 0.0);
    }
}

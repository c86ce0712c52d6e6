//! Pronunciation through `window.speechSynthesis`.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{SpeechSynthesis, SpeechSynthesisUtterance, SpeechSynthesisVoice, Window};

use crate::api::Accent;
use crate::capability::{Signal, Speaker};

pub struct WebSpeech {
    synth: SpeechSynthesis,
}

impl WebSpeech {
    /// `None` when the browser has no speech synthesis.
    pub fn detect(win: &Window) -> Option<Self> {
        let present = js_sys::Reflect::get(win, &JsValue::from_str("speechSynthesis"))
            .map(|v| !v.is_undefined() && !v.is_null())
            .unwrap_or(false);
        if !present {
            return None;
        }
        win.speech_synthesis().ok().map(|synth| Self { synth })
    }

    /// An installed voice for the accent's language tag. Some platforms report
    /// `en_GB` instead of `en-GB`.
    fn voice_for(&self, accent: Accent) -> Option<SpeechSynthesisVoice> {
        self.synth
            .get_voices()
            .iter()
            .filter_map(|v| v.dyn_into::<SpeechSynthesisVoice>().ok())
            .find(|v| v.lang().replace('_', "-").eq_ignore_ascii_case(accent.code()))
    }
}

impl Speaker for WebSpeech {
    fn speak(&self, text: &str, accent: Accent) -> Signal {
        let utterance = match SpeechSynthesisUtterance::new_with_text(text) {
            Ok(u) => u,
            Err(err) => {
                log::warn!("cannot create utterance: {err:?}");
                return Signal::done();
            }
        };
        utterance.set_lang(accent.code());
        if let Some(voice) = self.voice_for(accent) {
            utterance.set_voice(Some(&voice));
        }

        let signal = Signal::new();
        let on_end = signal.clone();
        let on_error = signal.clone();
        let end_cb = Closure::once_into_js(move || on_end.fire());
        let error_cb = Closure::once_into_js(move || on_error.fire());
        utterance.set_onend(Some(end_cb.unchecked_ref()));
        utterance.set_onerror(Some(error_cb.unchecked_ref()));

        // a queued utterance from an earlier word would delay this one
        self.synth.cancel();
        self.synth.speak(&utterance);
        signal
    }
}

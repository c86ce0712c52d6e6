//! Transient cosmetic effects. They are never cancelled explicitly: each carries a
//! start time and is dropped once its lifetime has elapsed.

pub const POPUP_MS: f64 = 900.0;
pub const POPUP_RISE: f64 = 36.0;
pub const DISSOLVE_DRIFT: f64 = 28.0;

#[derive(Clone, Debug, PartialEq)]
pub enum EffectKind {
    /// "+N" floating up from where a word was solved.
    ScorePopup { points: u32 },
    /// The solved word fading and drifting away.
    Dissolve { text: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Effect {
    pub kind: EffectKind,
    pub x: f64,
    pub y: f64,
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl Effect {
    pub fn popup(points: u32, x: f64, y: f64, now_ms: f64) -> Self {
        Self {
            kind: EffectKind::ScorePopup { points },
            x,
            y,
            start_ms: now_ms,
            duration_ms: POPUP_MS,
        }
    }

    pub fn dissolve(text: impl Into<String>, x: f64, y: f64, now_ms: f64, duration_ms: f64) -> Self {
        Self {
            kind: EffectKind::Dissolve { text: text.into() },
            x,
            y,
            start_ms: now_ms,
            duration_ms,
        }
    }

    /// Normalised age in [0, 1].
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn is_expired(&self, now_ms: f64) -> bool {
        now_ms - self.start_ms >= self.duration_ms
    }
}

/// Drop effects whose lifetime is over.
pub fn expire(effects: &mut Vec<Effect>, now_ms: f64) {
    effects.retain(|e| !e.is_expired(now_ms));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expire_filters_by_elapsed_time() {
        let mut effects = vec![
            Effect::popup(3, 10.0, 10.0, 0.0),
            Effect::dissolve("cat", 10.0, 10.0, 0.0, 600.0),
        ];
        expire(&mut effects, 599.0);
        assert_eq!(effects.len(), 2);
        expire(&mut effects, 600.0);
        assert_eq!(effects.len(), 1);
        assert!(matches!(effects[0].kind, EffectKind::ScorePopup { points: 3 }));
        expire(&mut effects, POPUP_MS);
        assert!(effects.is_empty());
    }

    #[test]
    fn progress_is_clamped() {
        let e = Effect::dissolve("go", 0.0, 0.0, 100.0, 600.0);
        assert_eq!(e.progress(0.0), 0.0);
        assert!((e.progress(400.0) - 0.5).abs() < 1e-9);
        assert_eq!(e.progress(10_000.0), 1.0);
    }
}

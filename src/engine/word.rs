/// Identifier assigned at spawn. Monotonically increasing per session, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WordId(pub u32);

/// A falling word in the active set.
#[derive(Clone, Debug, PartialEq)]
pub struct Word {
    pub id: WordId,
    pub text: String,
    /// Left edge, fixed at spawn.
    pub x: f64,
    /// Baseline; grows while the word falls.
    pub y: f64,
}

impl Word {
    pub fn new(id: WordId, text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id,
            text: text.into(),
            x,
            y,
        }
    }

    pub fn matches_prefix(&self, prefix: &str) -> bool {
        self.text.starts_with(prefix)
    }

    /// True when `self` should win a targeting tie against `other`: nearer the ground,
    /// then the earlier spawn.
    pub fn outranks(&self, other: &Word) -> bool {
        self.y > other.y || (self.y == other.y && self.id < other.id)
    }
}

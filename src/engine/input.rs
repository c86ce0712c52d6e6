//! Keystroke resolution: mapping typed characters onto at most one falling word.
//!
//! The buffer always holds a prefix of the targeted word. When several active words
//! share that prefix the one nearest the ground wins (ties go to the earlier
//! spawn), so the most urgent word is always the one being typed.

use super::Session;
use super::word::{Word, WordId};
use crate::capability::Capabilities;

/// Keys the engine understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Escape,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value. Named keys other than Backspace and
    /// Escape (Shift, ArrowLeft, F5, ...) are not game input.
    pub fn from_dom(key: &str) -> Option<Key> {
        match key {
            "Backspace" => Some(Key::Backspace),
            "Escape" | "Esc" => Some(Key::Escape),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => Some(Key::Char(c)),
                    _ => None,
                }
            }
        }
    }
}

/// What a keystroke did to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    /// Frozen, not running, or nothing to act on.
    Ignored,
    /// The buffer is a prefix of this word.
    Tracking(WordId),
    /// The word was completed and the freeze sequence started.
    Solved { id: WordId, points: u32 },
    /// Buffer and target were cleared.
    Cleared,
}

/// Best candidate among `words` for `prefix`.
pub fn nearest_match<'a>(words: &'a [Word], prefix: &str) -> Option<&'a Word> {
    words
        .iter()
        .filter(|w| w.matches_prefix(prefix))
        .fold(None, |best: Option<&Word>, w| match best {
            Some(b) if !w.outranks(b) => Some(b),
            _ => Some(w),
        })
}

impl Session {
    pub fn accepts_input(&self) -> bool {
        self.is_running() && !self.is_frozen()
    }

    pub fn handle_key(&mut self, caps: &Capabilities, key: Key, now_ms: f64) -> InputOutcome {
        if !self.accepts_input() {
            return InputOutcome::Ignored;
        }
        match key {
            Key::Char(c) => self.type_char(c, caps, now_ms),
            Key::Backspace => self.backspace(),
            Key::Escape => {
                self.clear_tracking();
                InputOutcome::Cleared
            }
        }
    }

    fn type_char(&mut self, c: char, caps: &Capabilities, now_ms: f64) -> InputOutcome {
        let typed: String = c.to_lowercase().collect();

        let mut candidate = format!("{}{}", self.input, typed);
        let mut found = nearest_match(&self.active, &candidate).map(|w| w.id);
        if found.is_none() && !self.input.is_empty() {
            self.break_chain();
            candidate = typed;
            found = nearest_match(&self.active, &candidate).map(|w| w.id);
        }
        let Some(id) = found else {
            self.clear_tracking();
            return InputOutcome::Cleared;
        };

        self.input = candidate;
        self.target = Some(id);
        let complete = self.word(id).is_some_and(|w| w.text == self.input);
        if !complete {
            return InputOutcome::Tracking(id);
        }

        let Some(pos) = self.active.iter().position(|w| w.id == id) else {
            self.clear_tracking();
            return InputOutcome::Cleared;
        };
        let word = self.active.remove(pos);
        self.clear_tracking();
        let points = self.begin_solve(word, caps, now_ms);
        InputOutcome::Solved { id, points }
    }

    fn backspace(&mut self) -> InputOutcome {
        if self.input.pop().is_none() {
            return InputOutcome::Ignored;
        }
        if self.input.is_empty() {
            self.target = None;
            return InputOutcome::Cleared;
        }
        match nearest_match(&self.active, &self.input).map(|w| w.id) {
            Some(id) => {
                self.target = Some(id);
                InputOutcome::Tracking(id)
            }
            None => {
                self.clear_tracking();
                InputOutcome::Cleared
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{EngineConfig, Playfield, SessionOptions};
    use super::*;
    use crate::capability::MonospaceMeasure;

    fn word(id: u32, text: &str, y: f64) -> Word {
        Word::new(WordId(id), text, 0.0, y)
    }

    fn session_with(active: Vec<Word>) -> Session {
        let mut s = Session::new(
            vec!["unused".into()],
            SessionOptions::default(),
            Playfield::new(800.0, 600.0).unwrap(),
            EngineConfig::default(),
            5,
            0.0,
        )
        .unwrap();
        s.next_id = active.iter().map(|w| w.id.0).max().unwrap_or(0) + 1;
        s.active = active;
        s
    }

    fn caps() -> Capabilities {
        Capabilities::new(MonospaceMeasure::default())
    }

    #[test]
    fn dom_keys_map_to_game_keys() {
        assert_eq!(Key::from_dom("a"), Some(Key::Char('a')));
        assert_eq!(Key::from_dom("Q"), Some(Key::Char('Q')));
        assert_eq!(Key::from_dom("'"), Some(Key::Char('\'')));
        assert_eq!(Key::from_dom("Backspace"), Some(Key::Backspace));
        assert_eq!(Key::from_dom("Escape"), Some(Key::Escape));
        assert_eq!(Key::from_dom("Shift"), None);
        assert_eq!(Key::from_dom("ArrowLeft"), None);
        assert_eq!(Key::from_dom(""), None);
    }

    #[test]
    fn nearest_to_ground_wins() {
        let words = vec![word(1, "cat", 100.0), word(2, "car", 250.0), word(3, "dog", 400.0)];
        assert_eq!(nearest_match(&words, "c").map(|w| w.id), Some(WordId(2)));
        assert_eq!(nearest_match(&words, "cat").map(|w| w.id), Some(WordId(1)));
        assert_eq!(nearest_match(&words, "x").map(|w| w.id), None);
    }

    #[test]
    fn equal_height_prefers_earlier_spawn() {
        let words = vec![word(4, "cab", 200.0), word(2, "cap", 200.0)];
        assert_eq!(nearest_match(&words, "ca").map(|w| w.id), Some(WordId(2)));
        let reversed: Vec<Word> = words.into_iter().rev().collect();
        assert_eq!(nearest_match(&reversed, "ca").map(|w| w.id), Some(WordId(2)));
    }

    #[test]
    fn uppercase_input_is_lowercased() {
        let mut s = session_with(vec![word(1, "dog", 100.0)]);
        let out = s.handle_key(&caps(), Key::Char('D'), 0.0);
        assert_eq!(out, InputOutcome::Tracking(WordId(1)));
        assert_eq!(s.input(), "d");
    }

    #[test]
    fn broken_chain_restarts_from_the_new_character() {
        let mut s = session_with(vec![word(1, "cat", 100.0), word(2, "dog", 50.0)]);
        s.combo = 3;
        s.handle_key(&caps(), Key::Char('c'), 0.0);
        let out = s.handle_key(&caps(), Key::Char('d'), 0.0);
        assert_eq!(out, InputOutcome::Tracking(WordId(2)));
        assert_eq!(s.input(), "d");
        assert_eq!(s.combo(), 0);
        assert_eq!(s.stats().chain_breaks, 1);
    }

    #[test]
    fn unmatched_restart_clears_everything() {
        let mut s = session_with(vec![word(1, "cat", 100.0)]);
        s.combo = 2;
        s.handle_key(&caps(), Key::Char('c'), 0.0);
        let out = s.handle_key(&caps(), Key::Char('z'), 0.0);
        assert_eq!(out, InputOutcome::Cleared);
        assert_eq!(s.input(), "");
        assert_eq!(s.target(), None);
        assert_eq!(s.combo(), 0);
    }

    #[test]
    fn stray_key_on_empty_buffer_keeps_combo() {
        let mut s = session_with(vec![word(1, "cat", 100.0)]);
        s.combo = 2;
        assert_eq!(s.handle_key(&caps(), Key::Char('z'), 0.0), InputOutcome::Cleared);
        assert_eq!(s.combo(), 2);
        assert_eq!(s.stats().chain_breaks, 0);
    }

    #[test]
    fn backspace_retargets_against_shorter_buffer() {
        let mut s = session_with(vec![word(1, "cart", 100.0), word(2, "cast", 300.0)]);
        for c in ['c', 'a', 'r'] {
            s.handle_key(&caps(), Key::Char(c), 0.0);
        }
        assert_eq!(s.handle_key(&caps(), Key::Backspace, 0.0), InputOutcome::Tracking(WordId(2)));
        assert_eq!(s.input(), "ca");
        assert_eq!(s.handle_key(&caps(), Key::Backspace, 0.0), InputOutcome::Tracking(WordId(2)));
        assert_eq!(s.handle_key(&caps(), Key::Backspace, 0.0), InputOutcome::Cleared);
        assert_eq!(s.target(), None);
        assert_eq!(s.handle_key(&caps(), Key::Backspace, 0.0), InputOutcome::Ignored);
    }

    #[test]
    fn escape_clears_without_touching_score() {
        let mut s = session_with(vec![word(1, "cat", 100.0)]);
        s.combo = 2;
        s.score = 3;
        s.handle_key(&caps(), Key::Char('c'), 0.0);
        assert_eq!(s.handle_key(&caps(), Key::Escape, 0.0), InputOutcome::Cleared);
        assert_eq!(s.input(), "");
        assert_eq!(s.target(), None);
        assert_eq!((s.combo(), s.score()), (2, 3));
    }

    #[test]
    fn completing_a_word_removes_it_and_freezes() {
        let mut s = session_with(vec![word(1, "go", 100.0), word(2, "goat", 50.0)]);
        s.handle_key(&caps(), Key::Char('g'), 0.0);
        let out = s.handle_key(&caps(), Key::Char('o'), 0.0);
        assert_eq!(out, InputOutcome::Solved { id: WordId(1), points: 1 });
        assert!(s.word(WordId(1)).is_none());
        assert!(s.is_frozen());
        assert_eq!(s.input(), "");
        assert_eq!(s.target(), None);
        assert_eq!((s.combo(), s.score()), (1, 1));
    }
}

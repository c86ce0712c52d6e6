//! Populating the active set and moving words toward the ground.

use super::Session;
use super::word::{Word, WordId};
use crate::capability::TextMeasure;

impl Session {
    /// Move the next pending word into the active set.
    ///
    /// Refills the pending queue from a reshuffled missed pool when it runs dry.
    /// Returns false when the active set is full or nothing is left to show.
    pub fn spawn(&mut self, measure: &dyn TextMeasure) -> bool {
        if self.active.len() >= self.config.max_active_words {
            return false;
        }
        if self.pending.is_empty() && !self.missed.is_empty() {
            let mut requeue = std::mem::take(&mut self.missed);
            self.rng.shuffle(&mut requeue);
            log::debug!("requeueing {} missed words", requeue.len());
            self.pending.extend(requeue);
        }
        let Some(text) = self.pending.pop_front() else {
            return false;
        };

        let width = measure.text_width(&text);
        let x = self.rng.next_f64() * self.playfield.max_x(width);
        let id = WordId(self.next_id);
        self.next_id += 1;
        self.active.push(Word::new(id, text, x, self.playfield.top));
        true
    }

    /// Accumulate `dt` and attempt one spawn per elapsed interval.
    pub(super) fn advance_spawn(&mut self, measure: &dyn TextMeasure, dt: f64) {
        let interval = self.config.spawn_interval_secs;
        if interval <= 0.0 {
            return;
        }
        self.spawn_timer += dt;
        while self.spawn_timer >= interval {
            self.spawn_timer -= interval;
            self.spawn(measure);
        }
    }

    /// Move every active word down and turn the ones that reached the ground
    /// into misses.
    pub(super) fn advance_fall(&mut self, dt: f64) {
        let speed = self.playfield.fall_speed(self.options.level);
        for word in &mut self.active {
            word.y += speed * dt;
        }

        let ground = self.playfield.ground;
        let (landed, falling): (Vec<Word>, Vec<Word>) = std::mem::take(&mut self.active)
            .into_iter()
            .partition(|w| w.y >= ground);
        self.active = falling;
        for word in landed {
            self.miss(word);
        }
    }

    fn miss(&mut self, word: Word) {
        if self.target == Some(word.id) {
            self.clear_tracking();
        }
        if self.combo > 0 {
            log::debug!("missed {:?}, combo {} lost", word.text, self.combo);
        }
        self.combo = 0;
        self.stats.missed += 1;
        self.missed.push(word.text);
    }
}

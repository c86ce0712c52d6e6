//! Falling-words game engine.
//!
//! All gameplay lives here and is independent of the browser: the frame driver
//! calls [`Engine::tick`] once per display refresh and forwards keystrokes to
//! [`Engine::handle_key`]; the renderer reads a [`Frame`] from
//! [`Engine::frame`]. Time is always passed in (milliseconds, same clock as
//! `performance.now()`), which keeps sessions replayable on the host.
//!
//! Lifecycle: no session (setup) -> running <-> frozen -> complete. Frozen is the
//! post-solve pause in which the solved word is spoken and dissolved; the fall,
//! spawn and miss simulation is suspended and keystrokes are dropped.

use std::collections::VecDeque;

use crate::api::{self, Accent};
use crate::capability::Capabilities;
use crate::error::EngineError;

pub mod effects;
pub mod input;
pub mod rng;
pub mod solve;
pub mod spawn;
pub mod speed;
pub mod view;
pub mod word;

pub use effects::{Effect, EffectKind};
pub use input::{InputOutcome, Key};
pub use rng::Rng;
pub use solve::{SolveSequence, Task};
pub use speed::Playfield;
pub use view::{EffectSprite, EffectStyle, Frame, Hud, Summary, WordSprite};
pub use word::{Word, WordId};

// --- Tunables -----------------------------------------------------------------

pub const MAX_ACTIVE_WORDS: usize = 8;
pub const SPAWN_INTERVAL_SECS: f64 = 1.0;
pub const DISSOLVE_MS: f64 = 600.0;
pub const SPEECH_TIMEOUT_MS: f64 = 2500.0;
pub const NO_SPEECH_DELAY_MS: f64 = 500.0;
pub const MAX_FRAME_DT_SECS: f64 = 0.25;

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub max_active_words: usize,
    pub spawn_interval_secs: f64,
    pub dissolve_ms: f64,
    pub speech_timeout_ms: f64,
    /// Pause used in place of narration when no speech capability exists.
    pub no_speech_delay_ms: f64,
    /// Upper bound on a single frame's simulated time.
    pub max_frame_dt_secs: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_active_words: MAX_ACTIVE_WORDS,
            spawn_interval_secs: SPAWN_INTERVAL_SECS,
            dissolve_ms: DISSOLVE_MS,
            speech_timeout_ms: SPEECH_TIMEOUT_MS,
            no_speech_delay_ms: NO_SPEECH_DELAY_MS,
            max_frame_dt_secs: MAX_FRAME_DT_SECS,
        }
    }
}

/// Per-session choices made on the setup screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionOptions {
    pub level: u8,
    pub accent: Accent,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            level: speed::DEFAULT_LEVEL,
            accent: Accent::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    Complete { final_score: u32 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub solved: u32,
    pub missed: u32,
    pub chain_breaks: u32,
    pub best_combo: u32,
}

// --- Session ------------------------------------------------------------------

/// The single owned context for one game. Every engine operation goes through it.
pub struct Session {
    config: EngineConfig,
    playfield: Playfield,
    options: SessionOptions,
    words: Vec<String>,
    rng: Rng,

    score: u32,
    combo: u32,
    input: String,
    /// Lookup key into `active`; revalidated every tick.
    target: Option<WordId>,
    pending: VecDeque<String>,
    missed: Vec<String>,
    active: Vec<Word>,
    next_id: u32,
    spawn_timer: f64,
    /// Present while frozen.
    solving: Option<SolveSequence>,
    effects: Vec<Effect>,
    phase: Phase,
    stats: Stats,
    last_tick_ms: f64,
}

impl Session {
    pub fn new(
        words: Vec<String>,
        options: SessionOptions,
        playfield: Playfield,
        config: EngineConfig,
        seed: u64,
        now_ms: f64,
    ) -> Result<Self, EngineError> {
        let words = api::normalize_words(&words);
        if words.is_empty() {
            return Err(EngineError::EmptyWordList);
        }
        let mut rng = Rng::new(seed);
        let mut shuffled = words.clone();
        rng.shuffle(&mut shuffled);

        Ok(Self {
            spawn_timer: config.spawn_interval_secs,
            config,
            playfield,
            options: SessionOptions {
                level: speed::clamp_level(options.level),
                accent: options.accent,
            },
            words,
            rng,
            score: 0,
            combo: 0,
            input: String::new(),
            target: None,
            pending: shuffled.into(),
            missed: Vec::new(),
            active: Vec::new(),
            next_id: 1,
            solving: None,
            effects: Vec::new(),
            phase: Phase::Running,
            stats: Stats::default(),
            last_tick_ms: now_ms,
        })
    }

    // ---- Accessors ----

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn target(&self) -> Option<WordId> {
        self.target
    }

    pub fn active_words(&self) -> &[Word] {
        &self.active
    }

    pub fn word(&self, id: WordId) -> Option<&Word> {
        self.active.iter().find(|w| w.id == id)
    }

    pub fn pending_words(&self) -> impl Iterator<Item = &str> {
        self.pending.iter().map(String::as_str)
    }

    pub fn missed_words(&self) -> &[String] {
        &self.missed
    }

    /// Words not yet solved in this pass: pending, falling and missed.
    pub fn remaining(&self) -> usize {
        self.pending.len() + self.active.len() + self.missed.len()
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, Phase::Complete { .. })
    }

    pub fn is_frozen(&self) -> bool {
        self.solving.is_some()
    }

    pub fn solving(&self) -> Option<&SolveSequence> {
        self.solving.as_ref()
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    /// The word list this session was started with, in wordbook order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    // ---- Simulation ----

    /// Advance one frame.
    pub fn tick(&mut self, caps: &Capabilities, now_ms: f64) {
        // a NaN or negative cap means no simulated time
        let max_dt = self.config.max_frame_dt_secs.max(0.0);
        let dt = ((now_ms - self.last_tick_ms) / 1000.0).max(0.0).min(max_dt);
        self.last_tick_ms = now_ms;
        effects::expire(&mut self.effects, now_ms);

        if !self.is_running() {
            return;
        }
        if let Some(seq) = self.solving.as_mut() {
            if !seq.poll(now_ms) {
                return;
            }
            log::debug!("resume after {:?}", seq.text);
            self.solving = None;
            if self.check_completion() {
                return;
            }
        }

        self.advance_spawn(caps.measure.as_ref(), dt);
        self.advance_fall(dt);
        self.validate_target();
        self.check_completion();
    }

    /// Transition to complete once pending, active and missed are all empty.
    /// Idempotent; never touches score or combo. Returns whether the game is over.
    pub fn check_completion(&mut self) -> bool {
        if self.is_running()
            && self.solving.is_none()
            && self.pending.is_empty()
            && self.active.is_empty()
            && self.missed.is_empty()
        {
            self.phase = Phase::Complete {
                final_score: self.score,
            };
            log::info!(
                "session complete: score {} ({} solved, {} missed)",
                self.score,
                self.stats.solved,
                self.stats.missed
            );
        }
        self.is_game_over()
    }

    /// Clear the target if it left the active set or no longer fits the buffer.
    fn validate_target(&mut self) {
        let valid = match self.target {
            Some(id) => self
                .active
                .iter()
                .any(|w| w.id == id && w.matches_prefix(&self.input)),
            None => self.input.is_empty(),
        };
        if !valid {
            self.clear_tracking();
        }
    }

    fn clear_tracking(&mut self) {
        self.input.clear();
        self.target = None;
    }

    fn break_chain(&mut self) {
        if self.combo > 0 {
            log::debug!("chain broken at combo {}", self.combo);
        }
        self.combo = 0;
        self.stats.chain_breaks += 1;
    }

    /// Start the freeze sequence for a word already removed from the active set.
    fn begin_solve(&mut self, word: Word, caps: &Capabilities, now_ms: f64) -> u32 {
        self.combo += 1;
        self.score += self.combo;
        self.stats.solved += 1;
        self.stats.best_combo = self.stats.best_combo.max(self.combo);

        let center_x = word.x + caps.measure.text_width(&word.text) / 2.0;
        self.effects
            .push(Effect::popup(self.combo, center_x, word.y, now_ms));
        self.effects.push(Effect::dissolve(
            word.text.as_str(),
            word.x,
            word.y,
            now_ms,
            self.config.dissolve_ms,
        ));

        let speech = match caps.speech.as_deref() {
            Some(speaker) => Task::signalled(
                speaker.speak(&word.text, self.options.accent),
                now_ms,
                self.config.speech_timeout_ms,
            ),
            None => Task::timer(now_ms, self.config.no_speech_delay_ms),
        };
        let dissolve = Task::timer(now_ms, self.config.dissolve_ms);
        log::debug!("solved {:?} combo {} score {}", word.text, self.combo, self.score);
        self.solving = Some(SolveSequence::new(word.text, dissolve, speech));
        self.combo
    }
}

// --- Engine -------------------------------------------------------------------

/// Owns the injected capabilities and at most one session.
pub struct Engine {
    caps: Capabilities,
    config: EngineConfig,
    playfield: Playfield,
    seed: Option<u64>,
    session: Option<Session>,
}

impl Engine {
    pub fn new(caps: Capabilities, playfield: Playfield) -> Self {
        Self {
            caps,
            config: EngineConfig::default(),
            playfield,
            seed: None,
            session: None,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Fix the shuffle/placement seed (every session uses it).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    pub fn is_running(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_running)
    }

    pub fn is_frozen(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_frozen)
    }

    pub fn is_game_over(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_game_over)
    }

    /// Setup -> running. Replaces any existing session.
    pub fn start(
        &mut self,
        words: Vec<String>,
        options: SessionOptions,
        now_ms: f64,
    ) -> Result<(), EngineError> {
        let seed = self.seed.unwrap_or_else(|| rng::entropy_seed(now_ms));
        let session = Session::new(
            words,
            options,
            self.playfield,
            self.config.clone(),
            seed,
            now_ms,
        )?;
        log::info!(
            "session started: {} words, level {}, accent {}",
            session.words.len(),
            session.options.level,
            session.options.accent
        );
        self.session = Some(session);
        Ok(())
    }

    /// Start over with the same words and options; nothing carries over.
    pub fn restart(&mut self, now_ms: f64) -> Result<(), EngineError> {
        let Some(previous) = self.session.take() else {
            return Err(EngineError::NoSession);
        };
        self.start(previous.words, previous.options, now_ms)
    }

    /// Back to setup, discarding the session and any in-flight solve sequence.
    pub fn reset(&mut self) {
        if self.session.take().is_some() {
            log::info!("session discarded");
        }
    }

    pub fn tick(&mut self, now_ms: f64) {
        if let Some(session) = self.session.as_mut() {
            session.tick(&self.caps, now_ms);
        }
    }

    pub fn handle_key(&mut self, key: Key, now_ms: f64) -> InputOutcome {
        match self.session.as_mut() {
            Some(session) => session.handle_key(&self.caps, key, now_ms),
            None => InputOutcome::Ignored,
        }
    }

    pub fn frame(&self, now_ms: f64) -> Option<Frame> {
        self.session
            .as_ref()
            .map(|s| view::build_frame(s, self.caps.measure.as_ref(), now_ms))
    }
}

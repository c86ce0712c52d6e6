//! Post-solve "bullet-time" sequence.
//!
//! Two independently timed tasks run while the session is frozen: the dissolve
//! animation and the spoken word. Each task carries its own deadline, and the
//! sequence is finished only once both report done.

use crate::capability::Signal;

/// A single timed operation. Done when its signal fires or its deadline passes,
/// whichever comes first. Once done it stays done.
#[derive(Clone, Debug)]
pub struct Task {
    signal: Option<Signal>,
    deadline_ms: f64,
    done: bool,
}

impl Task {
    /// Completes only by elapsing `duration_ms`.
    pub fn timer(now_ms: f64, duration_ms: f64) -> Self {
        Self {
            signal: None,
            deadline_ms: now_ms + duration_ms,
            done: false,
        }
    }

    /// Completes when `signal` fires, or after `timeout_ms` at the latest.
    pub fn signalled(signal: Signal, now_ms: f64, timeout_ms: f64) -> Self {
        Self {
            signal: Some(signal),
            deadline_ms: now_ms + timeout_ms,
            done: false,
        }
    }

    pub fn poll(&mut self, now_ms: f64) -> bool {
        if !self.done {
            let fired = self.signal.as_ref().is_some_and(Signal::is_set);
            self.done = fired || now_ms >= self.deadline_ms;
        }
        self.done
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

/// Dissolve + speech, joined.
#[derive(Clone, Debug)]
pub struct SolveSequence {
    pub text: String,
    pub dissolve: Task,
    pub speech: Task,
}

impl SolveSequence {
    pub fn new(text: impl Into<String>, dissolve: Task, speech: Task) -> Self {
        Self {
            text: text.into(),
            dissolve,
            speech,
        }
    }

    /// Poll both tasks; true once both are done.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        let dissolved = self.dissolve.poll(now_ms);
        let spoken = self.speech.poll(now_ms);
        dissolved && spoken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_task_finishes_at_deadline() {
        let mut t = Task::timer(1000.0, 600.0);
        assert!(!t.poll(1599.0));
        assert!(t.poll(1600.0));
        // latched
        assert!(t.poll(0.0));
    }

    #[test]
    fn signalled_task_finishes_early_on_signal() {
        let sig = Signal::new();
        let mut t = Task::signalled(sig.clone(), 0.0, 2500.0);
        assert!(!t.poll(100.0));
        sig.fire();
        assert!(t.poll(101.0));
    }

    #[test]
    fn signalled_task_times_out_without_signal() {
        let mut t = Task::signalled(Signal::new(), 0.0, 2500.0);
        assert!(!t.poll(2499.0));
        assert!(t.poll(2500.0));
    }

    #[test]
    fn sequence_waits_for_both() {
        let sig = Signal::new();
        let mut seq = SolveSequence::new(
            "cat",
            Task::timer(0.0, 600.0),
            Task::signalled(sig.clone(), 0.0, 2500.0),
        );
        assert!(!seq.poll(700.0), "speech still pending");
        assert!(seq.dissolve.is_done());
        sig.fire();
        assert!(seq.poll(710.0));

        let mut seq = SolveSequence::new(
            "dog",
            Task::timer(0.0, 600.0),
            Task::signalled(Signal::done(), 0.0, 2500.0),
        );
        assert!(!seq.poll(10.0), "dissolve still running");
        assert!(seq.poll(600.0));
    }
}

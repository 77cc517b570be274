use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::feedback::Feedback;
use crate::formatter::ResultDisplay;
use crate::highlight::{Highlight, HighlightTicket};
use crate::metrics::Metrics;
use crate::session::{Phase, SessionState};
use crate::texts::{Difficulty, TextRotation};
use crate::typing_policy::{apply_keystroke, Decision};

/// Everything the typing session reacts to
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    SelectDifficulty(Difficulty),
    /// Single-character insertion, validated against the reference
    Keystroke(char),
    /// Any other edit (deletion, paste); replaces the buffer unvalidated
    BufferChanged(String),
    End,
    Retry,
    ClearHighlight(u64),
}

/// What the presentation layer needs after each event
#[derive(Clone, Debug, PartialEq)]
pub struct Render {
    pub decision: Option<Decision>,
    pub feedback: Feedback,
    pub metrics: Metrics,
    pub display: ResultDisplay,
    pub input_enabled: bool,
    pub retry_enabled: bool,
    pub highlight_active: bool,
    /// Set when a rejection raised the highlight; the caller fires it at `due`
    pub highlight_ticket: Option<HighlightTicket>,
}

/// One typist working through rounds of sample text
#[derive(Debug, Clone)]
pub struct Session {
    rotation: TextRotation,
    difficulty: Difficulty,
    reference: String,
    state: SessionState,
    highlight: Highlight,
    final_metrics: Option<Metrics>,
}

impl Session {
    /// Starts idle on the next sentence of `difficulty`
    pub fn new(mut rotation: TextRotation, difficulty: Difficulty, highlight: Duration) -> Self {
        let reference = rotation.next_text(difficulty);
        info!(target: "session", %difficulty, %reference, "session created");
        Self {
            rotation,
            difficulty,
            reference: reference.trim().to_string(),
            state: SessionState::default(),
            highlight: Highlight::new(highlight),
            final_metrics: None,
        }
    }

    /// Pure transition: consumes the session and returns its successor with the render
    pub fn handle(mut self, event: SessionEvent, now: Instant) -> (Self, Render) {
        let render = self.apply(event, now);
        (self, render)
    }

    /// In-place form of [`Session::handle`]
    pub fn apply(&mut self, event: SessionEvent, now: Instant) -> Render {
        match event {
            SessionEvent::SelectDifficulty(difficulty) => {
                self.select_difficulty(difficulty);
                self.render(now)
            }
            SessionEvent::Keystroke(c) => self.keystroke(c, now),
            SessionEvent::BufferChanged(buffer) => {
                self.buffer_changed(buffer);
                self.render(now)
            }
            SessionEvent::End => {
                self.end(now);
                self.render(now)
            }
            SessionEvent::Retry => {
                self.retry();
                self.render(now)
            }
            SessionEvent::ClearHighlight(generation) => {
                self.highlight.clear(generation);
                self.render(now)
            }
        }
    }

    fn select_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.reference = self.rotation.next_text(difficulty).trim().to_string();
        info!(target: "session", %difficulty, reference = %self.reference, "difficulty selected");
    }

    fn keystroke(&mut self, c: char, now: Instant) -> Render {
        let was_idle = self.state.phase == Phase::Idle;
        let decision = apply_keystroke(&mut self.state, &self.reference, c, now);

        let ticket = match decision {
            Decision::Rejected { .. } => Some(self.highlight.raise(now)),
            Decision::Accepted if was_idle => {
                info!(target: "session", "session started");
                None
            }
            _ => None,
        };

        Render {
            decision: Some(decision),
            highlight_ticket: ticket,
            ..self.render(now)
        }
    }

    fn buffer_changed(&mut self, buffer: String) {
        if self.state.has_finished() {
            debug!(target: "session", "buffer change ignored after finish");
            return;
        }
        self.state.buffer = buffer;
    }

    fn end(&mut self, now: Instant) {
        if self.state.phase != Phase::Running {
            debug!(target: "session", phase = ?self.state.phase, "end ignored");
            return;
        }
        self.state.finish(now);
        let metrics = Metrics::finished(
            &self.reference,
            &self.state.buffer,
            self.state.elapsed_secs(now),
            self.state.correct_keystrokes,
            self.state.mistakes,
        );
        info!(
            target: "session",
            wpm = metrics.wpm,
            accuracy = metrics.accuracy,
            mistakes = metrics.mistakes,
            elapsed_secs = metrics.elapsed_secs,
            "session finished"
        );
        self.final_metrics = Some(metrics);
    }

    fn retry(&mut self) {
        self.reference = self.rotation.next_text(self.difficulty).trim().to_string();
        self.state = SessionState::default();
        self.highlight.reset();
        self.final_metrics = None;
        info!(target: "session", difficulty = %self.difficulty, reference = %self.reference, "retry");
    }

    /// Current feedback and metrics without applying any event
    pub fn render(&self, now: Instant) -> Render {
        let metrics = self.metrics(now);
        let finished = self.state.has_finished();
        Render {
            decision: None,
            feedback: Feedback::render(&self.reference, &self.state.buffer, self.state.mistake_marker),
            display: ResultDisplay::new(&metrics, self.difficulty),
            metrics,
            input_enabled: !finished,
            retry_enabled: self.state.phase != Phase::Running,
            highlight_active: self.highlight.is_active(),
            highlight_ticket: None,
        }
    }

    /// Live metrics while typing, frozen final metrics once finished
    pub fn metrics(&self, now: Instant) -> Metrics {
        match self.final_metrics {
            Some(metrics) => metrics,
            None => Metrics::live(
                &self.reference,
                &self.state.buffer,
                self.state.elapsed_secs(now),
                self.state.correct_keystrokes,
                self.state.mistakes,
            ),
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn buffer(&self) -> &str {
        &self.state.buffer
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn rotation(&self) -> &TextRotation {
        &self.rotation
    }

    pub fn highlight(&self) -> &Highlight {
        &self.highlight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texts::SamplePool;
    use assert_matches::assert_matches;

    fn pool(sentences: &[&str]) -> SamplePool {
        SamplePool {
            name: "test".to_string(),
            sentences: sentences.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn session() -> Session {
        let rotation = TextRotation::new(
            pool(&["The cat sat", "ab cd"]),
            pool(&["medium one", "medium two"]),
            pool(&["hard"]),
        )
        .unwrap();
        Session::new(rotation, Difficulty::Easy, Duration::from_millis(400))
    }

    fn type_str(session: &mut Session, text: &str, now: Instant) {
        for c in text.chars() {
            session.apply(SessionEvent::Keystroke(c), now);
        }
    }

    #[test]
    fn test_new_session_is_idle_on_first_sentence() {
        let s = session();
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.reference(), "The cat sat");
        assert_eq!(s.rotation().cursor(Difficulty::Easy), 1);

        let render = s.render(Instant::now());
        assert!(render.input_enabled);
        assert!(render.retry_enabled);
        assert_eq!(render.display.time, "0.00");
        assert_eq!(render.display.accuracy, "100");
    }

    #[test]
    fn test_handle_is_a_pure_transition() {
        let t0 = Instant::now();
        let (s, render) = session().handle(SessionEvent::Keystroke('T'), t0);
        assert_eq!(render.decision, Some(Decision::Accepted));
        assert_eq!(s.buffer(), "T");
        assert_eq!(s.phase(), Phase::Running);
        assert!(!render.retry_enabled);
    }

    #[test]
    fn test_rejection_returns_ticket() {
        let t0 = Instant::now();
        let mut s = session();
        type_str(&mut s, "Th", t0);
        let render = s.apply(SessionEvent::Keystroke('x'), t0);
        assert_matches!(render.decision, Some(Decision::Rejected { position: 2 }));
        assert!(render.highlight_active);
        let ticket = render.highlight_ticket.unwrap();
        assert_eq!(ticket.due, t0 + Duration::from_millis(400));

        let render = s.apply(SessionEvent::ClearHighlight(ticket.generation), t0);
        assert!(!render.highlight_active);
    }

    #[test]
    fn test_end_freezes_metrics() {
        let t0 = Instant::now();
        let mut s = session();
        type_str(&mut s, "The cat sat", t0);
        let render = s.apply(SessionEvent::End, t0 + Duration::from_secs(6));
        assert_eq!(s.phase(), Phase::Finished);
        assert!(!render.input_enabled);
        assert!(render.retry_enabled);
        assert_eq!(render.metrics.correct_words, 3);
        assert_eq!(render.metrics.wpm, 30);
        assert_eq!(render.display.time, "6.00");

        let later = s.render(t0 + Duration::from_secs(60));
        assert_eq!(later.metrics, render.metrics);
    }

    #[test]
    fn test_end_while_idle_is_ignored() {
        let mut s = session();
        s.apply(SessionEvent::End, Instant::now());
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn test_buffer_change_after_finish_is_ignored() {
        let t0 = Instant::now();
        let mut s = session();
        type_str(&mut s, "The", t0);
        s.apply(SessionEvent::End, t0);
        s.apply(SessionEvent::BufferChanged(String::new()), t0);
        assert_eq!(s.buffer(), "The");
    }

    #[test]
    fn test_deletion_bypasses_gate() {
        let t0 = Instant::now();
        let mut s = session();
        type_str(&mut s, "The c", t0);
        let render = s.apply(SessionEvent::BufferChanged("The".to_string()), t0);
        assert_eq!(s.buffer(), "The");
        assert_eq!(render.metrics.correct_words, 1);
        assert_eq!(s.state().correct_keystrokes, 5);
    }

    #[test]
    fn test_retry_resets_and_advances_current_pool() {
        let t0 = Instant::now();
        let mut s = session();
        type_str(&mut s, "Tx", t0);
        let render = s.apply(SessionEvent::Retry, t0);
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.reference(), "ab cd");
        assert_eq!(s.buffer(), "");
        assert_eq!(s.state().mistakes, 0);
        assert_eq!(s.state().correct_keystrokes, 0);
        assert_eq!(s.state().mistake_marker, None);
        assert!(!render.highlight_active);
        assert_eq!(s.rotation().cursor(Difficulty::Easy), 0);
        assert_eq!(s.rotation().cursor(Difficulty::Medium), 0);
    }
}

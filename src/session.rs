use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub phase: Phase,
    pub started_at: Option<Instant>,
    pub ended_at: Option<Instant>,
    // Typing state
    pub buffer: String,
    pub mistakes: usize,
    pub correct_keystrokes: usize,
    /// Buffer length at the most recent rejected keystroke
    pub mistake_marker: Option<usize>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            started_at: None,
            ended_at: None,
            buffer: String::new(),
            mistakes: 0,
            correct_keystrokes: 0,
            mistake_marker: None,
        }
    }
}

impl SessionState {
    pub fn start(&mut self, now: Instant) {
        self.phase = Phase::Running;
        self.started_at = Some(now);
    }

    pub fn finish(&mut self, now: Instant) {
        self.phase = Phase::Finished;
        self.ended_at = Some(now);
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn has_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Length of the buffer in characters
    pub fn cursor_pos(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Seconds since the first accepted keystroke, frozen once finished
    pub fn elapsed_secs(&self, now: Instant) -> f64 {
        match (self.started_at, self.phase) {
            (None, _) => 0.0,
            (Some(start), Phase::Finished) => self
                .ended_at
                .unwrap_or(now)
                .saturating_duration_since(start)
                .as_secs_f64(),
            (Some(start), _) => now.saturating_duration_since(start).as_secs_f64(),
        }
    }
}

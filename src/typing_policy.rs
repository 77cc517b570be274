use std::time::Instant;

use tracing::debug;

use crate::session::{Phase, SessionState};

/// Outcome of a single-character insertion attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Accepted,
    Rejected { position: usize },
    /// Input is disabled once the session has finished
    Ignored,
}

/// Pre-insertion check: `c` must equal the reference character at `position`.
/// A position past the end of the reference never matches.
pub fn check(reference: &str, position: usize, c: char) -> Decision {
    match reference.chars().nth(position) {
        Some(expected) if expected == c => Decision::Accepted,
        _ => Decision::Rejected { position },
    }
}

/// Gates `c` against the reference and applies the result to `state`.
///
/// Accepted characters are appended and clear the mistake marker; the first
/// one also starts the clock. Rejected characters leave the buffer alone and
/// move the marker to the current buffer length.
pub fn apply_keystroke(state: &mut SessionState, reference: &str, c: char, now: Instant) -> Decision {
    if state.phase == Phase::Finished {
        return Decision::Ignored;
    }

    let idx = state.cursor_pos();
    let decision = check(reference, idx, c);

    match decision {
        Decision::Accepted => {
            if state.phase == Phase::Idle {
                state.start(now);
            }
            state.buffer.push(c);
            state.correct_keystrokes += 1;
            state.mistake_marker = None;
        }
        Decision::Rejected { position } => {
            state.mistakes += 1;
            state.mistake_marker = Some(position);
        }
        Decision::Ignored => {}
    }

    debug!(target: "session", ?decision, char = %c, idx, "keystroke");
    decision
}

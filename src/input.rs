use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::controller::{Session, SessionEvent};
use crate::session::Phase;

/// What a key press asks of the application
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Session(SessionEvent),
    Quit,
}

/// Maps a terminal key press onto a session event.
///
/// Printable characters go through the keystroke gate. Deletions are sent as
/// whole-buffer replacements so they bypass it.
pub fn translate(key: KeyEvent, session: &Session) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let finished = session.phase() == Phase::Finished;

    match key.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('c') if ctrl => Some(Action::Quit),
        KeyCode::Char('r') if ctrl => Some(Action::Session(SessionEvent::Retry)),
        KeyCode::Char('w') if ctrl => {
            Some(Action::Session(SessionEvent::BufferChanged(delete_word(session.buffer()))))
        }
        KeyCode::Char('r') if finished => Some(Action::Session(SessionEvent::Retry)),
        KeyCode::Enter => Some(Action::Session(SessionEvent::End)),
        KeyCode::Tab => Some(Action::Session(SessionEvent::SelectDifficulty(
            session.difficulty().next(),
        ))),
        KeyCode::Backspace => {
            let mut buffer = session.buffer().to_string();
            buffer.pop();
            Some(Action::Session(SessionEvent::BufferChanged(buffer)))
        }
        KeyCode::Char(c) if !ctrl => Some(Action::Session(SessionEvent::Keystroke(c))),
        _ => None,
    }
}

/// Drops trailing spaces and then the last word
fn delete_word(buffer: &str) -> String {
    let trimmed = buffer.trim_end_matches(' ');
    match trimmed.rfind(' ') {
        Some(idx) => trimmed[..=idx].to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texts::{Difficulty, SamplePool, TextRotation};
    use std::time::{Duration, Instant};

    fn session() -> Session {
        let pool = |s: &str| SamplePool {
            name: "test".to_string(),
            sentences: vec![s.to_string()],
        };
        let rotation = TextRotation::new(pool("The cat sat"), pool("m"), pool("h")).unwrap();
        Session::new(rotation, Difficulty::Easy, Duration::from_millis(400))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_printable_char_is_keystroke() {
        let s = session();
        assert_eq!(
            translate(key(KeyCode::Char('T')), &s),
            Some(Action::Session(SessionEvent::Keystroke('T')))
        );
    }

    #[test]
    fn test_quit_keys() {
        let s = session();
        assert_eq!(translate(key(KeyCode::Esc), &s), Some(Action::Quit));
        assert_eq!(translate(ctrl('c'), &s), Some(Action::Quit));
    }

    #[test]
    fn test_enter_ends_and_tab_cycles_difficulty() {
        let s = session();
        assert_eq!(
            translate(key(KeyCode::Enter), &s),
            Some(Action::Session(SessionEvent::End))
        );
        assert_eq!(
            translate(key(KeyCode::Tab), &s),
            Some(Action::Session(SessionEvent::SelectDifficulty(Difficulty::Medium)))
        );
    }

    #[test]
    fn test_backspace_sends_shortened_buffer() {
        let mut s = session();
        let now = Instant::now();
        for c in "The".chars() {
            s.apply(SessionEvent::Keystroke(c), now);
        }
        assert_eq!(
            translate(key(KeyCode::Backspace), &s),
            Some(Action::Session(SessionEvent::BufferChanged("Th".to_string())))
        );
    }

    #[test]
    fn test_plain_r_retries_only_when_finished() {
        let mut s = session();
        let now = Instant::now();
        assert_eq!(
            translate(key(KeyCode::Char('r')), &s),
            Some(Action::Session(SessionEvent::Keystroke('r')))
        );
        s.apply(SessionEvent::Keystroke('T'), now);
        s.apply(SessionEvent::End, now);
        assert_eq!(
            translate(key(KeyCode::Char('r')), &s),
            Some(Action::Session(SessionEvent::Retry))
        );
        assert_eq!(
            translate(ctrl('r'), &s),
            Some(Action::Session(SessionEvent::Retry))
        );
    }

    #[test]
    fn test_delete_word() {
        assert_eq!(delete_word("The cat"), "The ");
        assert_eq!(delete_word("The cat "), "The ");
        assert_eq!(delete_word("The"), "");
        assert_eq!(delete_word(""), "");
    }
}

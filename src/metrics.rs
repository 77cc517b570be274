/// Splits on single spaces, so consecutive spaces produce empty words
pub fn split_words(text: &str) -> Vec<&str> {
    text.split(' ').collect()
}

/// Number of reference words matched exactly by the typed word at the same position.
///
/// A partial trailing word never counts and typed words beyond the end of the
/// reference are ignored.
pub fn correct_word_count(reference: &str, typed: &str) -> usize {
    let typed_words = split_words(typed);
    split_words(reference)
        .iter()
        .enumerate()
        .filter(|(i, word)| typed_words.get(*i) == Some(*word))
        .count()
}

/// Percentage of accepted keystrokes, 100 before anything was typed
pub fn accuracy(correct_keystrokes: usize, mistakes: usize) -> u32 {
    let total = correct_keystrokes + mistakes;
    if total == 0 {
        return 100;
    }
    ((correct_keystrokes as f64 / total as f64) * 100.0).round() as u32
}

pub fn wpm(correct_words: usize, elapsed_secs: f64) -> u32 {
    if elapsed_secs > 0.0 {
        ((correct_words as f64 / elapsed_secs) * 60.0).round() as u32
    } else {
        0
    }
}

/// Snapshot of the scores shown to the typist
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub elapsed_secs: f64,
    pub correct_words: usize,
    pub total_words: usize,
    pub wpm: u32,
    pub accuracy: u32,
    pub mistakes: usize,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            elapsed_secs: 0.0,
            correct_words: 0,
            total_words: 0,
            wpm: 0,
            accuracy: 100,
            mistakes: 0,
        }
    }
}

impl Metrics {
    /// Recomputed after every buffer change. The buffer is used as typed.
    pub fn live(
        reference: &str,
        buffer: &str,
        elapsed_secs: f64,
        correct_keystrokes: usize,
        mistakes: usize,
    ) -> Self {
        Self::compute(reference.trim(), buffer, elapsed_secs, correct_keystrokes, mistakes)
    }

    /// Computed once when the session ends. Both texts are trimmed first.
    pub fn finished(
        reference: &str,
        buffer: &str,
        elapsed_secs: f64,
        correct_keystrokes: usize,
        mistakes: usize,
    ) -> Self {
        Self::compute(
            reference.trim(),
            buffer.trim(),
            elapsed_secs,
            correct_keystrokes,
            mistakes,
        )
    }

    fn compute(
        reference: &str,
        buffer: &str,
        elapsed_secs: f64,
        correct_keystrokes: usize,
        mistakes: usize,
    ) -> Self {
        let correct_words = correct_word_count(reference, buffer);
        Self {
            elapsed_secs,
            correct_words,
            total_words: split_words(reference).len(),
            wpm: wpm(correct_words, elapsed_secs),
            accuracy: accuracy(correct_keystrokes, mistakes),
            mistakes,
        }
    }
}

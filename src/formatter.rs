use std::fmt;

use crate::metrics::Metrics;
use crate::texts::Difficulty;

/// Display strings for the score line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultDisplay {
    pub time: String,
    pub wpm: String,
    pub accuracy: String,
    pub mistakes: String,
    pub level: String,
}

impl ResultDisplay {
    pub fn new(metrics: &Metrics, difficulty: Difficulty) -> Self {
        Self {
            time: format!("{:.2}", metrics.elapsed_secs),
            wpm: metrics.wpm.to_string(),
            accuracy: metrics.accuracy.to_string(),
            mistakes: metrics.mistakes.to_string(),
            level: difficulty.label(),
        }
    }
}

impl fmt::Display for ResultDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}s   {} wpm   {}% acc   {} mistakes   {}",
            self.time, self.wpm, self.accuracy, self.mistakes, self.level
        )
    }
}

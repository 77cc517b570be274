use tracing::debug;

use crate::error::{Error, Result};
use crate::texts::{Difficulty, SamplePool};

#[derive(Debug, Clone, PartialEq)]
struct PoolCursor {
    sentences: Vec<String>,
    cursor: usize,
}

impl PoolCursor {
    fn new(difficulty: Difficulty, pool: SamplePool) -> Result<Self> {
        if pool.is_empty() {
            return Err(Error::PoolEmpty(difficulty));
        }
        debug!(
            target: "texts",
            %difficulty,
            pool = %pool.name,
            sentences = pool.sentences.len(),
            "pool loaded"
        );
        Ok(Self {
            sentences: pool.sentences,
            cursor: 0,
        })
    }

    fn advance(&mut self) -> String {
        let sentence = self.sentences[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.sentences.len();
        sentence
    }
}

/// Round-robin selection over the three sample pools.
///
/// Each difficulty keeps its own cursor, so drawing from one pool never
/// disturbs where the others will resume.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRotation {
    easy: PoolCursor,
    medium: PoolCursor,
    hard: PoolCursor,
}

impl TextRotation {
    pub fn new(easy: SamplePool, medium: SamplePool, hard: SamplePool) -> Result<Self> {
        Ok(Self {
            easy: PoolCursor::new(Difficulty::Easy, easy)?,
            medium: PoolCursor::new(Difficulty::Medium, medium)?,
            hard: PoolCursor::new(Difficulty::Hard, hard)?,
        })
    }

    /// Rotation over the pools compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::new(
            SamplePool::embedded(Difficulty::Easy)?,
            SamplePool::embedded(Difficulty::Medium)?,
            SamplePool::embedded(Difficulty::Hard)?,
        )
    }

    /// Returns the next sentence of `difficulty` and advances only that pool's cursor
    pub fn next_text(&mut self, difficulty: Difficulty) -> String {
        let text = self.pool_mut(difficulty).advance();
        debug!(target: "texts", %difficulty, cursor = self.cursor(difficulty), "rotated");
        text
    }

    /// Index of the sentence the next call to `next_text` will return
    pub fn cursor(&self, difficulty: Difficulty) -> usize {
        self.pool(difficulty).cursor
    }

    fn pool(&self, difficulty: Difficulty) -> &PoolCursor {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    fn pool_mut(&mut self, difficulty: Difficulty) -> &mut PoolCursor {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }
}

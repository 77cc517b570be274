use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;

use crate::error::{Error, Result};
use crate::texts::Difficulty;

static POOL_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/texts/pools");

/// A fixed list of sample sentences for one difficulty
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct SamplePool {
    pub name: String,
    pub sentences: Vec<String>,
}

impl SamplePool {
    /// Loads the pool embedded in the binary for `difficulty`
    pub fn embedded(difficulty: Difficulty) -> Result<Self> {
        let pool = read_pool_from_file(&difficulty.file_name())?;
        if pool.sentences.is_empty() {
            return Err(Error::PoolEmpty(difficulty));
        }
        Ok(pool)
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

fn read_pool_from_file(file_name: &str) -> Result<SamplePool> {
    let file = POOL_DIR
        .get_file(file_name)
        .ok_or_else(|| Error::PoolMissing(file_name.to_string()))?;

    let file_as_str = file.contents_utf8().ok_or_else(|| Error::PoolEncoding {
        file: file_name.to_string(),
    })?;

    from_str(file_as_str).map_err(|source| Error::PoolParse {
        file: file_name.to_string(),
        source,
    })
}

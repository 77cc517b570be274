use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which sentence pool a round draws its reference text from
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Capitalized label shown next to the results, e.g. "Medium"
    pub fn label(&self) -> String {
        self.to_string()
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.to_string().to_lowercase())
    }

    /// Cycles easy -> medium -> hard -> easy
    pub fn next(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }
}

pub mod difficulty;
pub mod pool;
pub mod rotation;

pub use difficulty::Difficulty;
pub use pool::SamplePool;
pub use rotation::TextRotation;

mod error;
pub use error::AppError;

mod env;
pub use env::AiEnv;

pub mod group;
pub use group::{MAX_GROUPS, group_key, parse_group_key};

pub mod similarity;
pub use similarity::cosine_similarity;

pub mod stats;

/// A single embedding vector.
pub type Embedding = Vec<f32>;

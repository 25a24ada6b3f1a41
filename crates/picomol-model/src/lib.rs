//! Picomol Model - Pre-trained scoring model loading, prediction, and ranking.

pub mod artifact;
pub mod predict;

pub use artifact::ScoringModel;
pub use predict::{predict, rank_predictions};

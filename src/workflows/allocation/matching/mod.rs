mod config;
mod grouping;
mod scorer;

pub use config::MatchingConfig;
pub use grouping::{GroupFormer, RoommateGroup};
pub use scorer::CompatibilityScorer;

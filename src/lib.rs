pub mod linking;
pub mod matching;
pub mod models;
pub mod pipeline;
pub mod resolution;
pub mod utils;

pub use linking::decision::decide;
pub use matching::index::EntityIndex;
pub use matching::normalize::normalize;
pub use matching::ranker::rank;
pub use matching::similarity::similarity;
pub use models::core::{Alias, AliasKind, EntityId, EntityRecord};
pub use models::matching::{ConfidenceBand, LinkProposal, MatchCandidate, MatchKind};
pub use utils::config::{LinkConfig, MatchConfig};
pub use utils::error::ConfigError;

pub mod aggregator;
pub mod candidate;
pub mod prioritizer;

mod error;

pub use aggregator::CandidateAggregator;
pub use candidate::{RankedCandidate, ScoredCandidate, Target};
pub use error::{Error, Result};
pub use prioritizer::Prioritizer;

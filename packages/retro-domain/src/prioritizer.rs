use crate::{Result, candidate::ScoredCandidate};

/// Scoring strategy consulted once per distinct candidate.
///
/// Implementations must be deterministic for identical inputs. A failure is reported as
/// [`crate::Error::ScoringUnavailable`] and is recoverable by the caller.
pub trait Prioritizer
where
	Self: Send + Sync,
{
	fn name(&self) -> &str;

	fn score(&self, candidate: &ScoredCandidate) -> Result<f64>;
}

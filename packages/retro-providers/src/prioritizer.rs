use std::sync::Arc;

use retro_domain::{Error as DomainError, Prioritizer, Result as DomainResult, ScoredCandidate};

use crate::{Error, Result};

/// Favors precursor sets supported by many examples.
#[derive(Clone, Debug)]
pub struct PopularityPrioritizer {
	/// Subtracted when the candidate needs an extra reagent.
	pub auxiliary_penalty: f64,
}
impl Default for PopularityPrioritizer {
	fn default() -> Self {
		Self { auxiliary_penalty: 0.1 }
	}
}
impl Prioritizer for PopularityPrioritizer {
	fn name(&self) -> &str {
		"popularity"
	}

	fn score(&self, candidate: &ScoredCandidate) -> DomainResult<f64> {
		let mut score = (candidate.occurrence_count as f64).ln_1p();

		if candidate.required_auxiliary.is_some() {
			score -= self.auxiliary_penalty;
		}
		if !score.is_finite() {
			return Err(DomainError::ScoringUnavailable {
				message: format!("Popularity score for {} is not finite.", candidate.joined()),
			});
		}

		Ok(score)
	}
}

/// Scores everything zero, leaving the ranking to occurrence counts.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPrioritizer;
impl Prioritizer for NoPrioritizer {
	fn name(&self) -> &str {
		"none"
	}

	fn score(&self, _candidate: &ScoredCandidate) -> DomainResult<f64> {
		Ok(0.0)
	}
}

pub fn prioritizer_by_name(name: &str) -> Result<Arc<dyn Prioritizer>> {
	match name {
		"popularity" => Ok(Arc::new(PopularityPrioritizer::default())),
		"none" => Ok(Arc::new(NoPrioritizer)),
		other => Err(Error::UnknownPrioritizer { name: other.to_string() }),
	}
}

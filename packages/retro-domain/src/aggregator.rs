use std::cmp::Ordering;

use ahash::AHashMap;

use crate::{
	Error, Result,
	candidate::{RankedCandidate, ScoredCandidate, Target},
	prioritizer::Prioritizer,
};

/// Request-scoped result set for one target.
///
/// Candidates must be added in the order the enumeration source produces them: the first-seen
/// entry keeps its score and required auxiliary for the life of the aggregator.
#[derive(Debug)]
pub struct CandidateAggregator {
	target: Target,
	candidates: Vec<ScoredCandidate>,
	index: AHashMap<Vec<String>, usize>,
}
impl CandidateAggregator {
	pub fn new(target: Target) -> Self {
		Self { target, candidates: Vec::new(), index: AHashMap::new() }
	}

	pub fn len(&self) -> usize {
		self.candidates.len()
	}

	pub fn is_empty(&self) -> bool {
		self.candidates.is_empty()
	}

	/// Insertion order.
	pub fn candidates(&self) -> &[ScoredCandidate] {
		&self.candidates
	}

	/// Merges `candidate` into an equal-key entry, or scores it and appends it.
	///
	/// A merge never rescores the existing entry. On a scoring failure the aggregator is left
	/// exactly as it was before the call.
	pub fn add_candidate(
		&mut self,
		mut candidate: ScoredCandidate,
		prioritizer: &dyn Prioritizer,
	) -> Result<()> {
		if let Some(&pos) = self.index.get(&candidate.components) {
			self.candidates[pos].absorb(candidate);

			return Ok(());
		}

		let score = prioritizer.score(&candidate)?;

		if !score.is_finite() {
			return Err(Error::ScoringUnavailable {
				message: format!(
					"Prioritizer {} returned a non-finite score for {} while decomposing {}.",
					prioritizer.name(),
					candidate.joined(),
					self.target
				),
			});
		}

		candidate.assign_score(score);
		self.index.insert(candidate.components.clone(), self.candidates.len());
		self.candidates.push(candidate);

		Ok(())
	}

	/// Up to `n` entries by descending score, then descending occurrence count, then insertion
	/// order.
	pub fn top_n(&self, n: usize) -> Vec<RankedCandidate> {
		if n == 0 {
			return Vec::new();
		}

		let mut order: Vec<&ScoredCandidate> = self.candidates.iter().collect();

		order.sort_by(|lhs, rhs| compare_rank(lhs, rhs));

		order
			.into_iter()
			.take(n)
			.enumerate()
			.map(|(pos, candidate)| RankedCandidate::project(pos + 1, candidate))
			.collect()
	}
}

fn compare_rank(lhs: &ScoredCandidate, rhs: &ScoredCandidate) -> Ordering {
	rhs.score()
		.total_cmp(&lhs.score())
		.then_with(|| rhs.occurrence_count.cmp(&lhs.occurrence_count))
}

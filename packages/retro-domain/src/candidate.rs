use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

/// Separator used when a precursor set is rendered as a single identifier.
pub const COMPONENT_SEPARATOR: &str = ".";

/// Canonical identifier of the molecule being decomposed. Never inspected here.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Target(String);
impl Target {
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl fmt::Display for Target {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// One proposed precursor set for a target.
///
/// Two candidates are the same candidate iff their `components` are equal element-wise and in
/// order. The score is written once by the aggregator when the candidate is first seen.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredCandidate {
	pub components: Vec<String>,
	pub source_ids: BTreeSet<i64>,
	pub occurrence_count: u64,
	pub required_auxiliary: Option<String>,
	score: f64,
}
impl ScoredCandidate {
	pub fn new(components: Vec<String>, source_id: i64, occurrence_count: u64) -> Self {
		Self {
			components,
			source_ids: BTreeSet::from([source_id]),
			occurrence_count,
			required_auxiliary: None,
			score: 0.0,
		}
	}

	pub fn with_source_ids(mut self, source_ids: impl IntoIterator<Item = i64>) -> Self {
		self.source_ids = source_ids.into_iter().collect();

		self
	}

	/// Blank auxiliaries are treated as absent.
	pub fn with_required_auxiliary(mut self, auxiliary: impl Into<String>) -> Self {
		let auxiliary = auxiliary.into();

		self.required_auxiliary = if auxiliary.trim().is_empty() { None } else { Some(auxiliary) };

		self
	}

	pub fn score(&self) -> f64 {
		self.score
	}

	pub fn joined(&self) -> String {
		self.components.join(COMPONENT_SEPARATOR)
	}

	pub(crate) fn assign_score(&mut self, score: f64) {
		self.score = score;
	}

	pub(crate) fn absorb(&mut self, duplicate: ScoredCandidate) {
		self.source_ids.extend(duplicate.source_ids);
		self.occurrence_count = self.occurrence_count.saturating_add(duplicate.occurrence_count);
	}
}

/// Rank-labelled projection of a candidate, as returned to callers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
	/// 1-based.
	pub rank: usize,
	pub joined: String,
	pub components: Vec<String>,
	pub score: f64,
	pub occurrence_count: u64,
	/// Ascending.
	pub source_ids: Vec<i64>,
	pub required_auxiliary: Option<String>,
}
impl RankedCandidate {
	pub(crate) fn project(rank: usize, candidate: &ScoredCandidate) -> Self {
		Self {
			rank,
			joined: candidate.joined(),
			components: candidate.components.clone(),
			score: candidate.score,
			occurrence_count: candidate.occurrence_count,
			source_ids: candidate.source_ids.iter().copied().collect(),
			required_auxiliary: candidate.required_auxiliary.clone(),
		}
	}
}

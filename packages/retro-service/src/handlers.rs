use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use retro_config::{Conditions, ResourceConfig, Retro};
use retro_domain::{CandidateAggregator, Prioritizer, RankedCandidate, Target};
use retro_fabric::{
	QueueName, QueueSet, ResourceSlot, SlotStatus, TaskFailure, TaskHandler, task::INTERNAL,
};
use retro_providers::{ContextModel, PrecursorLibrary, Recommendation};

use crate::{
	Error, Result,
	payload::{ConditionsRequest, PrecursorsRequest},
};

pub const CONTEXT_RECOMMENDER: &str = "context recommender";
pub const RETRO_TRANSFORMER: &str = "retro transformer";

/// Serves reaction condition recommendations from a lazily loaded nearest-neighbour model.
pub struct ContextRecommenderHandler {
	resource: ResourceConfig,
	slot: ResourceSlot<ContextModel>,
	defaults: Conditions,
}
impl ContextRecommenderHandler {
	pub fn new(resource: ResourceConfig, defaults: Conditions) -> Self {
		let slot = ResourceSlot::new(CONTEXT_RECOMMENDER, QueueName::new(resource.queue.clone()));

		Self { resource, slot, defaults }
	}

	pub fn queue(&self) -> &QueueName {
		self.slot.queue()
	}

	pub fn status(&self) -> SlotStatus {
		self.slot.status()
	}

	/// Loads the model from the configured paths if `announced` includes this queue.
	pub fn initialize(&self, announced: &QueueSet) -> SlotStatus {
		self.slot.initialize(announced, || {
			ContextModel::load(&self.resource.model_path, &self.resource.info_path).map_err(
				|err| Error::LoadFailure {
					resource: CONTEXT_RECOMMENDER.to_string(),
					message: err.to_string(),
				},
			)
		})
	}

	pub fn get_conditions(&self, request: &ConditionsRequest) -> Result<Vec<Recommendation>> {
		if request.reaction.reactants.is_empty() || request.reaction.products.is_empty() {
			return Err(Error::InvalidRequest {
				message: "reaction must list at least one reactant and one product.".to_string(),
			});
		}

		let model = self.slot.get()?;
		let count = request.count.unwrap_or(self.defaults.default_count).min(self.defaults.max_count);
		let single_solvent = request.single_solvent.unwrap_or(self.defaults.single_solvent);
		let with_smiles = request.with_smiles.unwrap_or(self.defaults.with_smiles);

		tracing::debug!(
			reactants = request.reaction.reactants.len(),
			products = request.reaction.products.len(),
			count,
			single_solvent,
			with_smiles,
			"Recommending conditions."
		);

		Ok(model.recommend(&request.reaction, count as usize, single_solvent, with_smiles))
	}
}
impl TaskHandler for ContextRecommenderHandler {
	fn handle(&self, payload: Value) -> std::result::Result<Value, TaskFailure> {
		let request: ConditionsRequest = decode(payload)?;

		Ok(encode(&self.get_conditions(&request)?)?)
	}
}

/// Enumerates one-step precursors for a target and ranks them.
pub struct RetroTransformerHandler {
	resource: ResourceConfig,
	slot: ResourceSlot<PrecursorLibrary>,
	prioritizer: Arc<dyn Prioritizer>,
	limits: Retro,
}
impl RetroTransformerHandler {
	pub fn new(resource: ResourceConfig, limits: Retro, prioritizer: Arc<dyn Prioritizer>) -> Self {
		let slot = ResourceSlot::new(RETRO_TRANSFORMER, QueueName::new(resource.queue.clone()));

		Self { resource, slot, prioritizer, limits }
	}

	pub fn queue(&self) -> &QueueName {
		self.slot.queue()
	}

	pub fn status(&self) -> SlotStatus {
		self.slot.status()
	}

	pub fn initialize(&self, announced: &QueueSet) -> SlotStatus {
		self.slot.initialize(announced, || {
			PrecursorLibrary::load(&self.resource.model_path, &self.resource.info_path).map_err(
				|err| Error::LoadFailure {
					resource: RETRO_TRANSFORMER.to_string(),
					message: err.to_string(),
				},
			)
		})
	}

	/// A fresh aggregator per call; nothing carries over between requests.
	pub fn enumerate_precursors(&self, request: &PrecursorsRequest) -> Result<Vec<RankedCandidate>> {
		let target = request.target.trim();

		if target.is_empty() {
			return Err(Error::InvalidRequest { message: "target must be non-empty.".to_string() });
		}

		let library = self.slot.get()?;
		let max = self.limits.max_top_n;
		let requested = match request.requested_count {
			None => self.limits.default_top_n.min(max),
			Some(count) if count <= 0 => 0,
			Some(count) => count.min(i64::from(max)) as u32,
		};
		let target = Target::new(target);
		let mut aggregator = CandidateAggregator::new(target.clone());

		for candidate in library.enumerate(&target) {
			aggregator.add_candidate(candidate, self.prioritizer.as_ref())?;
		}

		tracing::debug!(
			target = %target,
			distinct = aggregator.len(),
			requested,
			prioritizer = self.prioritizer.name(),
			"Precursors aggregated."
		);

		Ok(aggregator.top_n(requested as usize))
	}
}
impl TaskHandler for RetroTransformerHandler {
	fn handle(&self, payload: Value) -> std::result::Result<Value, TaskFailure> {
		let request: PrecursorsRequest = decode(payload)?;

		Ok(encode(&self.enumerate_precursors(&request)?)?)
	}
}

fn decode<T>(payload: Value) -> Result<T>
where
	T: DeserializeOwned,
{
	serde_json::from_value(payload)
		.map_err(|err| Error::InvalidRequest { message: format!("Malformed payload: {err}.") })
}

fn encode<T>(value: &T) -> Result<Value>
where
	T: Serialize,
{
	serde_json::to_value(value)
		.map_err(|err| Error::TaskFailed { kind: INTERNAL.to_string(), message: err.to_string() })
}

use std::sync::Arc;

use retro_config::Config;
use retro_domain::Prioritizer;
use retro_fabric::{QueueSet, SlotStatus, Worker};

use crate::{
	Error, Result,
	handlers::{ContextRecommenderHandler, RetroTransformerHandler},
};

/// Per-worker state: the announced queues plus one handler (and slot) per resource.
pub struct WorkerRuntime {
	name: String,
	announced: QueueSet,
	context: Arc<ContextRecommenderHandler>,
	retro: Arc<RetroTransformerHandler>,
}
impl WorkerRuntime {
	/// Builds the runtime and loads only the resources whose queue was announced.
	///
	/// A failed load leaves the worker running with that slot in `Failed`; requests to it are
	/// refused with `ResourceUnavailable`.
	pub fn bootstrap(name: impl Into<String>, cfg: &Config, announced: QueueSet) -> Result<Self> {
		let prioritizer =
			retro_providers::prioritizer_by_name(&cfg.retro.prioritizer).map_err(|err| {
				Error::LoadFailure { resource: "prioritizer".to_string(), message: err.to_string() }
			})?;

		Ok(Self::bootstrap_with_prioritizer(name, cfg, announced, prioritizer))
	}

	pub fn bootstrap_with_prioritizer(
		name: impl Into<String>,
		cfg: &Config,
		announced: QueueSet,
		prioritizer: Arc<dyn Prioritizer>,
	) -> Self {
		let name = name.into();
		let context = Arc::new(ContextRecommenderHandler::new(
			cfg.resources.context_recommender.clone(),
			cfg.conditions.clone(),
		));
		let retro = Arc::new(RetroTransformerHandler::new(
			cfg.resources.retro_transformer.clone(),
			cfg.retro.clone(),
			prioritizer,
		));

		tracing::info!(worker = %name, queues = %announced, "Bootstrapping worker.");

		context.initialize(&announced);
		retro.initialize(&announced);

		for queue in announced.iter() {
			if queue != context.queue() && queue != retro.queue() {
				tracing::warn!(worker = %name, queue = %queue, "No resource serves this queue.");
			}
		}

		Self { name, announced, context, retro }
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn context_status(&self) -> SlotStatus {
		self.context.status()
	}

	pub fn retro_status(&self) -> SlotStatus {
		self.retro.status()
	}

	pub fn context_handler(&self) -> &ContextRecommenderHandler {
		&self.context
	}

	pub fn retro_handler(&self) -> &RetroTransformerHandler {
		&self.retro
	}

	/// A fabric worker bound to every announced queue that has a handler.
	pub fn into_worker(self) -> Worker {
		let mut worker = Worker::new(self.name);

		if self.announced.contains(self.context.queue()) {
			worker = worker.bind(self.context.queue().clone(), self.context.clone());
		}
		if self.announced.contains(self.retro.queue()) {
			worker = worker.bind(self.retro.queue().clone(), self.retro.clone());
		}

		worker
	}
}

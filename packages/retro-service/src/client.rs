use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use retro_config::Config;
use retro_domain::RankedCandidate;
use retro_fabric::{Fabric, QueueName};
use retro_providers::Recommendation;

use crate::{
	Error, Result,
	payload::{ConditionsRequest, PrecursorsRequest, Request},
};

/// Caller side of the fabric: typed requests in, typed results or typed errors out.
#[derive(Clone)]
pub struct RetroClient {
	fabric: Fabric,
	context_queue: QueueName,
	retro_queue: QueueName,
	timeout: Duration,
}
impl RetroClient {
	pub fn new(fabric: Fabric, cfg: &Config) -> Self {
		Self {
			fabric,
			context_queue: QueueName::new(cfg.resources.context_recommender.queue.clone()),
			retro_queue: QueueName::new(cfg.resources.retro_transformer.queue.clone()),
			timeout: Duration::from_millis(cfg.fabric.result_timeout_ms),
		}
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	pub async fn recommend_conditions(
		&self,
		request: &ConditionsRequest,
	) -> Result<Vec<Recommendation>> {
		let payload = to_payload(request)?;

		decode_reply(self.call(&self.context_queue, payload).await?)
	}

	pub async fn enumerate_precursors(
		&self,
		request: &PrecursorsRequest,
	) -> Result<Vec<RankedCandidate>> {
		let payload = to_payload(request)?;

		decode_reply(self.call(&self.retro_queue, payload).await?)
	}

	/// Routes a tagged request and returns the raw JSON result.
	pub async fn dispatch(&self, request: Request) -> Result<Value> {
		match request {
			Request::GetConditions(request) => {
				self.call(&self.context_queue, to_payload(&request)?).await
			},
			Request::EnumeratePrecursors(request) => {
				self.call(&self.retro_queue, to_payload(&request)?).await
			},
		}
	}

	/// The timeout covers enqueueing as well as the reply, so a full queue cannot stall a call.
	async fn call(&self, queue: &QueueName, payload: Value) -> Result<Value> {
		let round_trip = async {
			match self.fabric.submit(queue, payload).await {
				Ok(handle) => {
					tracing::debug!(task_id = %handle.id(), queue = %queue, "Task submitted.");

					handle.await
				},
				Err(err) => Err(err),
			}
		};

		match tokio::time::timeout(self.timeout, round_trip).await {
			Ok(Ok(value)) => Ok(value),
			Ok(Err(retro_fabric::Error::Task(failure))) => {
				tracing::debug!(queue = %queue, kind = %failure.kind, "Task returned a failure.");

				Err(Error::from_failure(queue.as_str(), failure))
			},
			Ok(Err(err)) => Err(err.into()),
			Err(_) => {
				tracing::warn!(
					queue = %queue,
					timeout_ms = self.timeout.as_millis() as u64,
					"Task timed out."
				);

				Err(Error::TransportFailure {
					message: format!(
						"No reply from queue {queue} within {} ms.",
						self.timeout.as_millis()
					),
				})
			},
		}
	}
}

fn to_payload<T>(request: &T) -> Result<Value>
where
	T: serde::Serialize,
{
	serde_json::to_value(request)
		.map_err(|err| Error::InvalidRequest { message: format!("Unserializable request: {err}.") })
}

fn decode_reply<T>(value: Value) -> Result<T>
where
	T: DeserializeOwned,
{
	serde_json::from_value(value)
		.map_err(|err| Error::TransportFailure { message: format!("Malformed reply: {err}.") })
}

use std::{fmt::Display, sync::OnceLock};

use crate::{
	Error, Result,
	queue::{QueueName, QueueSet},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotStatus {
	Uninitialized,
	Ready,
	Failed { reason: String },
}

/// Worker-scoped handle to an expensive resource, loaded at most once.
///
/// Lifecycle is `Uninitialized -> Ready | Failed`, both terminal. The transition happens only
/// through [`ResourceSlot::initialize`], and only when the worker was launched with this slot's
/// queue. A failed load is recorded, never retried.
#[derive(Debug)]
pub struct ResourceSlot<R> {
	label: &'static str,
	queue: QueueName,
	state: OnceLock<std::result::Result<R, String>>,
}
impl<R> ResourceSlot<R> {
	pub fn new(label: &'static str, queue: QueueName) -> Self {
		Self { label, queue, state: OnceLock::new() }
	}

	pub fn label(&self) -> &'static str {
		self.label
	}

	pub fn queue(&self) -> &QueueName {
		&self.queue
	}

	/// Runs `load` if `announced` includes this slot's queue and the slot is still
	/// uninitialized. Concurrent callers observe a single load.
	pub fn initialize<F, E>(&self, announced: &QueueSet, load: F) -> SlotStatus
	where
		F: FnOnce() -> std::result::Result<R, E>,
		E: Display,
	{
		if !announced.contains(&self.queue) {
			tracing::debug!(
				resource = self.label,
				queue = %self.queue,
				announced = %announced,
				"Queue not announced; leaving resource unloaded."
			);

			return self.status();
		}

		self.state.get_or_init(|| {
			tracing::info!(resource = self.label, queue = %self.queue, "Loading resource.");

			match load() {
				Ok(resource) => {
					tracing::info!(resource = self.label, queue = %self.queue, "Resource ready.");

					Ok(resource)
				},
				Err(err) => {
					tracing::error!(
						resource = self.label,
						queue = %self.queue,
						error = %err,
						"Resource load failed; requests on this queue will be refused."
					);

					Err(err.to_string())
				},
			}
		});

		self.status()
	}

	pub fn status(&self) -> SlotStatus {
		match self.state.get() {
			None => SlotStatus::Uninitialized,
			Some(Ok(_)) => SlotStatus::Ready,
			Some(Err(reason)) => SlotStatus::Failed { reason: reason.clone() },
		}
	}

	/// The only accessor for the resource.
	pub fn get(&self) -> Result<&R> {
		match self.state.get() {
			Some(Ok(resource)) => Ok(resource),
			Some(Err(reason)) => Err(Error::ResourceUnavailable {
				queue: self.queue.to_string(),
				reason: format!("{} failed to load: {reason}", self.label),
			}),
			None => Err(Error::ResourceUnavailable {
				queue: self.queue.to_string(),
				reason: format!("{} is not loaded on this worker", self.label),
			}),
		}
	}
}

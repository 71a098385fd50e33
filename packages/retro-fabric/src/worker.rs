use std::{collections::HashMap, sync::Arc};

use serde_json::Value;
use tokio::{
	sync::mpsc,
	task::{self, JoinHandle},
};

use crate::{
	Result,
	fabric::Fabric,
	queue::QueueName,
	task::{Task, TaskFailure, TaskOutcome},
};

/// Synchronous request handler bound to one queue. Runs to completion before the worker pulls
/// its next task.
pub trait TaskHandler
where
	Self: Send + Sync,
{
	fn handle(&self, payload: Value) -> std::result::Result<Value, TaskFailure>;
}

/// Single-threaded executor over one or more bound queues.
pub struct Worker {
	name: String,
	handlers: HashMap<QueueName, Arc<dyn TaskHandler>>,
}
impl Worker {
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into(), handlers: HashMap::new() }
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn bind(mut self, queue: QueueName, handler: Arc<dyn TaskHandler>) -> Self {
		self.handlers.insert(queue, handler);

		self
	}

	/// Binds every queue and starts pulling. The worker exits once the fabric is shut down and
	/// all bound queues are drained.
	pub fn spawn(self, fabric: &Fabric) -> Result<WorkerHandle> {
		// Each puller holds at most one task while the executor is busy.
		let (inbox_tx, inbox_rx) = mpsc::channel::<Task>(1);
		let mut pullers = Vec::with_capacity(self.handlers.len());

		for queue in self.handlers.keys() {
			let consumer = fabric.bind(queue)?;
			let inbox_tx = inbox_tx.clone();

			pullers.push(tokio::spawn(async move {
				while let Some(task) = consumer.next().await {
					if inbox_tx.send(task).await.is_err() {
						break;
					}
				}
			}));
		}

		drop(inbox_tx);

		tracing::info!(
			worker = %self.name,
			queues = ?self.handlers.keys().map(QueueName::as_str).collect::<Vec<_>>(),
			"Worker started."
		);

		let executor = tokio::spawn(self.execute(inbox_rx));

		Ok(WorkerHandle { executor, pullers })
	}

	async fn execute(self, mut inbox: mpsc::Receiver<Task>) {
		while let Some(mut task) = inbox.recv().await {
			let task_id = task.id;
			let queue = task.queue.clone();

			tracing::debug!(worker = %self.name, queue = %queue, task_id = %task_id, "Task received.");

			let payload = std::mem::take(&mut task.payload);
			let outcome = self.run_one(&queue, payload).await;

			if let Err(failure) = &outcome {
				tracing::warn!(
					worker = %self.name,
					queue = %queue,
					task_id = %task_id,
					kind = %failure.kind,
					error = %failure.message,
					"Task failed."
				);
			}
			if !task.complete(outcome) {
				tracing::debug!(
					worker = %self.name,
					task_id = %task_id,
					"Submitter went away; result discarded."
				);
			}
		}

		tracing::info!(worker = %self.name, "Worker stopped.");
	}

	async fn run_one(&self, queue: &QueueName, payload: Value) -> TaskOutcome {
		let Some(handler) = self.handlers.get(queue).cloned() else {
			return Err(TaskFailure::internal(format!(
				"Worker {} has no handler for queue {queue}.",
				self.name
			)));
		};

		match task::spawn_blocking(move || handler.handle(payload)).await {
			Ok(outcome) => outcome,
			Err(err) => Err(TaskFailure::internal(format!("Handler aborted: {err}."))),
		}
	}
}

pub struct WorkerHandle {
	executor: JoinHandle<()>,
	pullers: Vec<JoinHandle<()>>,
}
impl WorkerHandle {
	/// Waits until the worker has drained its queues.
	pub async fn join(self) {
		for puller in self.pullers {
			let _ = puller.await;
		}

		let _ = self.executor.await;
	}
}

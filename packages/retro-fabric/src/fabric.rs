use std::{
	collections::HashMap,
	sync::{Arc, Mutex},
};

use serde_json::Value;
use tokio::sync::{Mutex as AsyncMutex, mpsc};

use crate::{
	Error, Result,
	queue::QueueName,
	task::{Task, TaskHandle},
};

struct Channel {
	tx: mpsc::Sender<Task>,
	rx: Arc<AsyncMutex<mpsc::Receiver<Task>>>,
}

#[derive(Default)]
struct Registry {
	closed: bool,
	channels: HashMap<QueueName, Channel>,
}

/// In-memory broker: one bounded, multi-consumer queue per name.
///
/// Queues are created on first submit or bind, so work submitted before any worker binds waits
/// in the queue. Delivery is at-least-once to exactly one bound consumer; there is no ordering
/// guarantee across submissions.
#[derive(Clone)]
pub struct Fabric {
	capacity: usize,
	registry: Arc<Mutex<Registry>>,
}
impl Fabric {
	pub fn new(capacity: usize) -> Self {
		Self { capacity: capacity.max(1), registry: Arc::new(Mutex::new(Registry::default())) }
	}

	pub async fn submit(&self, queue: &QueueName, payload: Value) -> Result<TaskHandle> {
		let tx = self.channel(queue)?.0;
		let (task, handle) = Task::new(queue.clone(), payload);

		tracing::debug!(queue = %queue, task_id = %task.id, "Submitting task.");

		tx.send(task).await.map_err(|_| Error::TransportFailure {
			message: format!("Queue {queue} closed before the task was enqueued."),
		})?;

		Ok(handle)
	}

	pub fn bind(&self, queue: &QueueName) -> Result<QueueConsumer> {
		let rx = self.channel(queue)?.1;

		Ok(QueueConsumer { queue: queue.clone(), rx })
	}

	/// Closes every queue. Buffered tasks are still delivered; later submissions fail.
	pub fn shutdown(&self) {
		let mut registry = self.registry.lock().unwrap_or_else(|err| err.into_inner());

		registry.closed = true;
		registry.channels.clear();

		tracing::info!("Fabric shut down.");
	}

	pub fn is_closed(&self) -> bool {
		self.registry.lock().unwrap_or_else(|err| err.into_inner()).closed
	}

	fn channel(
		&self,
		queue: &QueueName,
	) -> Result<(mpsc::Sender<Task>, Arc<AsyncMutex<mpsc::Receiver<Task>>>)> {
		let mut registry = self.registry.lock().unwrap_or_else(|err| err.into_inner());

		if registry.closed {
			return Err(Error::TransportFailure { message: "Fabric is shut down.".to_string() });
		}

		let channel = registry.channels.entry(queue.clone()).or_insert_with(|| {
			let (tx, rx) = mpsc::channel(self.capacity);

			Channel { tx, rx: Arc::new(AsyncMutex::new(rx)) }
		});

		Ok((channel.tx.clone(), channel.rx.clone()))
	}
}

/// Competing-consumer view of one queue.
#[derive(Clone)]
pub struct QueueConsumer {
	queue: QueueName,
	rx: Arc<AsyncMutex<mpsc::Receiver<Task>>>,
}
impl QueueConsumer {
	pub fn queue(&self) -> &QueueName {
		&self.queue
	}

	/// `None` once the fabric is shut down and the queue is drained.
	pub async fn next(&self) -> Option<Task> {
		self.rx.lock().await.recv().await
	}
}

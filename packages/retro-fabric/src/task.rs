use std::{
	future::Future,
	pin::Pin,
	task::{Context, Poll},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::{Error, Result, queue::QueueName};

pub const INTERNAL: &str = "INTERNAL";
pub const RESOURCE_UNAVAILABLE: &str = "RESOURCE_UNAVAILABLE";

pub type TaskOutcome = std::result::Result<Value, TaskFailure>;

/// Serialized failure returned by a handler in place of a value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFailure {
	/// Stable SCREAMING_SNAKE_CASE code.
	pub kind: String,
	pub message: String,
}
impl TaskFailure {
	pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
		Self { kind: kind.into(), message: message.into() }
	}

	pub fn internal(message: impl Into<String>) -> Self {
		Self::new(INTERNAL, message)
	}
}
impl From<Error> for TaskFailure {
	fn from(err: Error) -> Self {
		match err {
			Error::Task(failure) => failure,
			Error::ResourceUnavailable { reason, .. } => Self::new(RESOURCE_UNAVAILABLE, reason),
			Error::TransportFailure { message } => Self::internal(message),
		}
	}
}

/// One unit of work in flight between a submitter and a worker.
#[derive(Debug)]
pub struct Task {
	pub id: Uuid,
	pub queue: QueueName,
	pub payload: Value,
	reply: oneshot::Sender<TaskOutcome>,
}
impl Task {
	pub(crate) fn new(queue: QueueName, payload: Value) -> (Self, TaskHandle) {
		let id = Uuid::new_v4();
		let (reply, rx) = oneshot::channel();

		(Self { id, queue, payload, reply }, TaskHandle { id, rx })
	}

	/// Returns `false` when the submitter already dropped its handle.
	pub fn complete(self, outcome: TaskOutcome) -> bool {
		self.reply.send(outcome).is_ok()
	}
}

/// Resolves to the handler's value or failure. Dropping it abandons the result; the worker
/// still runs the task to completion.
#[derive(Debug)]
pub struct TaskHandle {
	id: Uuid,
	rx: oneshot::Receiver<TaskOutcome>,
}
impl TaskHandle {
	pub fn id(&self) -> Uuid {
		self.id
	}
}
impl Future for TaskHandle {
	type Output = Result<Value>;

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		match Pin::new(&mut self.rx).poll(cx) {
			Poll::Pending => Poll::Pending,
			Poll::Ready(Ok(Ok(value))) => Poll::Ready(Ok(value)),
			Poll::Ready(Ok(Err(failure))) => Poll::Ready(Err(Error::Task(failure))),
			Poll::Ready(Err(_)) => Poll::Ready(Err(Error::TransportFailure {
				message: format!("Task {} was dropped before a reply was sent.", self.id),
			})),
		}
	}
}
